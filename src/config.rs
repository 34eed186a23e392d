use anyhow::{Context, bail};
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::title::TitleRule;

const DEFAULT_WORKING_DIR: &str = "/home/pi/lightshowpi";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub library: Library,
    pub player: Player,
    pub menu: Menu,
}

impl Config {
    /// Reads the TOML config at `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let cfg = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Config> {
        let cfg: Config = toml::from_str(contents).with_context(|| "Failed to parse config TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.player.command.is_empty() {
            bail!("player.command must name the player program");
        }
        if self.library.title_delimiter.chars().count() != 1 {
            bail!("library.title_delimiter must be a single character");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Library {
    pub music_dir: PathBuf,
    pub playlist_dir: PathBuf,
    pub track_extension: String,
    pub playlist_extension: String,
    pub title_delimiter: String,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            music_dir: Path::new(DEFAULT_WORKING_DIR).join("music"),
            playlist_dir: Path::new(DEFAULT_WORKING_DIR).join("playlists"),
            track_extension: "mp3".to_string(),
            playlist_extension: "playlist".to_string(),
            title_delimiter: "-".to_string(),
        }
    }
}

impl Library {
    fn delimiter(&self) -> char {
        self.title_delimiter
            .chars()
            .next()
            .unwrap_or(crate::domain::title::DEFAULT_DELIMITER)
    }

    pub fn track_rule(&self) -> TitleRule {
        TitleRule::new(&self.track_extension, self.delimiter())
    }

    pub fn playlist_rule(&self) -> TitleRule {
        TitleRule::new(&self.playlist_extension, self.delimiter())
    }

    /// Makes both directories absolute so every discovered path is absolute.
    pub fn absolutize(&mut self) -> anyhow::Result<()> {
        self.music_dir = std::path::absolute(&self.music_dir)
            .with_context(|| format!("Invalid music dir {}", self.music_dir.display()))?;
        self.playlist_dir = std::path::absolute(&self.playlist_dir)
            .with_context(|| format!("Invalid playlist dir {}", self.playlist_dir.display()))?;
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Player {
    /// Program and leading arguments; the item argument is appended.
    pub command: Vec<String>,
    /// How long `stop` waits after asking the player to terminate before killing it.
    /// Zero only sends the request.
    pub stop_grace_ms: u64,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            command: vec![
                "sudo".to_string(),
                format!("{DEFAULT_WORKING_DIR}/py/synchronized_lights.py"),
            ],
            stop_grace_ms: 2000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Menu {
    pub column_width: usize,
}

impl Default for Menu {
    fn default() -> Self {
        Self { column_width: 50 }
    }
}
