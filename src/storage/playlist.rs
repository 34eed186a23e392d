//! Playlist files: one `<title>\t<path>` line per entry.
//!
//! Only the path is read back; titles are recomputed on load, so the title
//! column is informational and never escaped.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
#[cfg(unix)]
use std::{fs::Permissions, os::unix::fs::PermissionsExt};

use log::{debug, info, warn};

use crate::{
    domain::{item::Playable, playlist::Playlist, title::TitleRule, track::Track},
    storage::{error::StorageError, fs::list_files},
};

/// Playlists found in a directory, plus the files that could not be loaded.
#[derive(Debug, Default)]
pub struct Discovery {
    pub playlists: Vec<Playlist>,
    pub failures: Vec<(PathBuf, StorageError)>,
}

/// Reads and writes the playlist files of one directory.
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    dir: PathBuf,
    playlist_rule: TitleRule,
    track_rule: TitleRule,
}

impl PlaylistStore {
    pub fn new(dir: PathBuf, playlist_rule: TitleRule, track_rule: TitleRule) -> Self {
        Self {
            dir,
            playlist_rule,
            track_rule,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the playlist called `name` in this store.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{name}.{}", self.playlist_rule.extension()))
    }

    /// Opens every playlist file in the directory, sorted by path.
    ///
    /// Files that fail to load are reported in `failures` and left out.
    pub fn discover(&self) -> Discovery {
        let mut discovery = Discovery::default();

        for path in list_files(&self.dir, self.playlist_rule.extension()) {
            match self.open(path.clone()) {
                Ok(playlist) => discovery.playlists.push(playlist),
                Err(err) => {
                    warn!("skipping playlist {}: {err}", path.display());
                    discovery.failures.push((path, err));
                }
            }
        }

        debug!(
            "discovered {} playlists in {}",
            discovery.playlists.len(),
            self.dir.display()
        );
        discovery
    }

    /// Loads the playlist at `path`, creating an empty file if there is none.
    pub fn open(&self, path: PathBuf) -> Result<Playlist, StorageError> {
        let mut playlist = Playlist::new(path, &self.playlist_rule);
        match self.load(&mut playlist) {
            Ok(()) => Ok(playlist),
            Err(err) if err.is_not_found() => self.create_empty(playlist.path().to_path_buf()),
            Err(err) => Err(err),
        }
    }

    /// Replaces the entries of `playlist` with the contents of its file.
    ///
    /// Any line without a tab fails the whole load; nothing is skipped.
    pub fn load(&self, playlist: &mut Playlist) -> Result<(), StorageError> {
        let contents = std::fs::read_to_string(playlist.path())?;
        let entries = parse(playlist.path(), &contents, &self.track_rule)?;
        debug!(
            "loaded {} entries from {}",
            entries.len(),
            playlist.path().display()
        );
        playlist.set_loaded(entries);
        Ok(())
    }

    /// Overwrites the playlist file with the current entries.
    ///
    /// Writes to a temporary file in the same directory and renames it over
    /// the old one, so a crash never leaves a half-written playlist. An
    /// existing file keeps its permission bits; a new one gets the umask
    /// default. Ownership is that of the writing user either way.
    pub fn save(&self, playlist: &mut Playlist) -> Result<(), StorageError> {
        let contents = render(playlist)?;
        let path = playlist.path();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        builder.permissions(Permissions::from_mode(0o666));
        let mut tmp = builder.tempfile_in(dir)?;
        match std::fs::metadata(path) {
            Ok(existing) => tmp.as_file().set_permissions(existing.permissions())?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StorageError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        playlist.mark_saved();
        info!(
            "saved playlist '{}' ({} entries) to {}",
            playlist.title(),
            playlist.len(),
            playlist.path().display()
        );
        Ok(())
    }

    /// Writes a zero-entry playlist file at `path`.
    pub fn create_empty(&self, path: PathBuf) -> Result<Playlist, StorageError> {
        let mut playlist = Playlist::new(path, &self.playlist_rule);
        self.save(&mut playlist)?;
        info!("created empty playlist {}", playlist.path().display());
        Ok(playlist)
    }
}

/// Parses playlist file contents into tracks, recomputing titles from paths.
pub fn parse(path: &Path, contents: &str, rule: &TitleRule) -> Result<Vec<Track>, StorageError> {
    contents
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let parse_error = |reason: &str| StorageError::Parse {
                path: path.to_path_buf(),
                line: i + 1,
                reason: reason.to_string(),
            };

            let (_title, track_path) = line
                .split_once('\t')
                .ok_or_else(|| parse_error("missing tab between title and path"))?;
            if track_path.is_empty() {
                return Err(parse_error("empty track path"));
            }
            Ok(Track::new(PathBuf::from(track_path), rule))
        })
        .collect()
}

/// Renders the file contents for `playlist`.
pub fn render(playlist: &Playlist) -> Result<String, StorageError> {
    let mut out = String::new();

    for track in playlist.entries() {
        let track_path = track
            .path()
            .to_str()
            .filter(|p| !p.contains(['\n', '\r']))
            .ok_or_else(|| StorageError::UnrepresentablePath(track.path().to_path_buf()))?;
        let title = track.title().replace(['\t', '\n', '\r'], " ");
        out.push_str(&format!("{title}\t{track_path}\n"));
    }

    Ok(out)
}
