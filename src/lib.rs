//! Console front-end for a synchronized light show player.
//!
//! Browses audio tracks and playlists, hands the selected one to the external
//! player process and authors new playlists.

pub mod cli;
pub mod config;
pub mod domain;
pub mod menu;
pub mod playback;
pub mod storage;
