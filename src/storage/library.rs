use std::path::PathBuf;

use log::info;

use crate::{
    config,
    domain::{item::Playable, playlist::Playlist, title::TitleRule, track::Track},
    storage::{error::StorageError, fs::discover_tracks, playlist::PlaylistStore},
};

/// In-memory view of the track catalog and the playlist store.
///
/// Playlists hold their own `Track` values resolved at load time, so they may
/// disagree with `tracks` until the next `reload`.
#[derive(Debug)]
pub struct Library {
    music_dir: PathBuf,
    track_rule: TitleRule,
    store: PlaylistStore,
    pub tracks: Vec<Track>,
    pub playlists: Vec<Playlist>,
}

impl Library {
    /// Builds an empty library for `config`. Call `reload` to populate it.
    pub fn new(config: &config::Library) -> Self {
        let track_rule = config.track_rule();
        Self {
            music_dir: config.music_dir.clone(),
            store: PlaylistStore::new(
                config.playlist_dir.clone(),
                config.playlist_rule(),
                track_rule.clone(),
            ),
            track_rule,
            tracks: Vec::new(),
            playlists: Vec::new(),
        }
    }

    /// Ensures the playlist directory exists, then discovers everything.
    pub fn open(
        config: &config::Library,
    ) -> Result<(Self, Vec<(PathBuf, StorageError)>), StorageError> {
        std::fs::create_dir_all(&config.playlist_dir)?;
        let mut library = Self::new(config);
        let failures = library.reload();
        Ok((library, failures))
    }

    pub fn store(&self) -> &PlaylistStore {
        &self.store
    }

    /// Re-runs track and playlist discovery, replacing both collections.
    ///
    /// Returns the playlist files that failed to load.
    pub fn reload(&mut self) -> Vec<(PathBuf, StorageError)> {
        self.tracks = discover_tracks(&self.music_dir, &self.track_rule);
        let discovery = self.store.discover();
        self.playlists = discovery.playlists;
        info!(
            "library holds {} tracks and {} playlists",
            self.tracks.len(),
            self.playlists.len()
        );
        discovery.failures
    }

    /// Adds `playlist` to the collection, replacing one with the same path.
    pub fn upsert_playlist(&mut self, playlist: Playlist) {
        match self
            .playlists
            .iter_mut()
            .find(|p| p.path() == playlist.path())
        {
            Some(existing) => *existing = playlist,
            None => self.playlists.push(playlist),
        }
    }

    pub fn find_playlist(&self, name: &str) -> Option<&Playlist> {
        let path = self.store.path_for(name);
        self.playlists.iter().find(|p| p.path() == path)
    }
}
