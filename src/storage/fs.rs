//! Module to discover library files in the file system

use log::debug;
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

use crate::domain::{title::TitleRule, track::Track};

/// Whether `path` ends in exactly `.{extension}`.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == extension)
        .unwrap_or(false)
}

/// Lists the regular files directly inside `dir` carrying `extension`, sorted by path.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let dir_str = dir.to_string_lossy();

    let mut paths = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("error while listing dir {dir_str}, skipping an entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_extension(p, extension))
        .collect::<Vec<_>>();

    paths.sort();
    paths
}

/// Builds the track catalog: one `Track` per audio file in `dir`.
pub fn discover_tracks(dir: &Path, rule: &TitleRule) -> Vec<Track> {
    let tracks: Vec<Track> = list_files(dir, rule.extension())
        .into_iter()
        .map(|path| Track::new(path, rule))
        .collect();
    debug!("discovered {} tracks in {}", tracks.len(), dir.display());
    tracks
}
