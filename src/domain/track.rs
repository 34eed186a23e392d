use std::path::{Path, PathBuf};

use super::{
    item::{ItemKind, Playable},
    title::TitleRule,
};

/// Represent a playable audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    path: PathBuf,
    title: String,
}

impl Track {
    pub fn new(path: PathBuf, rule: &TitleRule) -> Self {
        let title = rule.derive(&path);
        Self { path, title }
    }
}

impl Playable for Track {
    fn kind(&self) -> ItemKind {
        ItemKind::Track
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
