pub mod item;
pub mod playlist;
pub mod title;
pub mod track;
