pub mod error;
pub mod fs;
pub mod library;
pub mod playlist;
