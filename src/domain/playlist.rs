use std::path::{Path, PathBuf};

use super::{
    item::{ItemKind, Playable},
    title::TitleRule,
    track::Track,
};

/// Named, ordered collection of tracks backed by a playlist file.
///
/// `dirty` tracks whether `entries` differ from what was last loaded or saved.
/// Reading and writing the file lives in `storage::playlist`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    path: PathBuf,
    title: String,
    entries: Vec<Track>,
    dirty: bool,
}

impl Playlist {
    /// Creates an in-memory playlist with no entries. Nothing is written.
    pub fn new(path: PathBuf, rule: &TitleRule) -> Self {
        let title = rule.derive(&path);
        Self {
            path,
            title,
            entries: Vec::new(),
            dirty: true,
        }
    }

    pub fn entries(&self) -> &[Track] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn contains(&self, track_path: &Path) -> bool {
        self.entries.iter().any(|t| t.path() == track_path)
    }

    /// Appends `track`. Duplicates are allowed here; the authoring flow checks
    /// `contains` first.
    pub fn add(&mut self, track: Track) {
        self.entries.push(track);
        self.dirty = true;
    }

    /// Removes the first entry with `track_path`. Returns whether one was removed.
    pub fn remove(&mut self, track_path: &Path) -> bool {
        match self.entries.iter().position(|t| t.path() == track_path) {
            Some(index) => self.remove_at(index).is_some(),
            None => false,
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Track> {
        if index >= self.entries.len() {
            return None;
        }
        self.dirty = true;
        Some(self.entries.remove(index))
    }

    /// Replaces all entries with freshly loaded ones and marks the playlist clean.
    pub(crate) fn set_loaded(&mut self, entries: Vec<Track>) {
        self.entries = entries;
        self.dirty = false;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

impl Playable for Playlist {
    fn kind(&self) -> ItemKind {
        ItemKind::Playlist
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
