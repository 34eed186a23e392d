use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::{io, path::PathBuf, process::ExitCode};

use crate::config;
use crate::domain::item::Playable;
use crate::menu::{AppState, Menu, listing};
use crate::playback::PlaybackController;
use crate::storage::library::Library;

#[derive(Parser)]
#[command(name = "lightdeck")]
#[command(version = "0.1")]
#[command(about = "Console menu for a synchronized light show player")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "lightdeck.toml")]
    pub config: PathBuf,

    /// Directory holding the audio tracks (overrides the config file)
    #[arg(long)]
    pub music_dir: Option<PathBuf>,

    /// Directory holding the playlist files (overrides the config file)
    #[arg(long)]
    pub playlist_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive menu (default)
    Menu,
    /// List the tracks in the music directory
    Tracks,
    /// List the playlists with their track counts
    Playlists,
    /// Show the tracks of one playlist
    Show {
        /// Playlist file name without extension
        name: String,
    },
}

/// Entrypoint for CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<config::Config> {
    let mut cfg = config::Config::load(&cli.config)?;
    if let Some(dir) = &cli.music_dir {
        cfg.library.music_dir = dir.clone();
    }
    if let Some(dir) = &cli.playlist_dir {
        cfg.library.playlist_dir = dir.clone();
    }
    cfg.library.absolutize()?;
    Ok(cfg)
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let cfg = load_config(&cli)?;

    let (library, failures) = Library::open(&cfg.library).with_context(|| {
        format!(
            "Failed to prepare playlist directory {}",
            cfg.library.playlist_dir.display()
        )
    })?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let state = AppState {
                library,
                player: PlaybackController::new(&cfg.player),
                column_width: cfg.menu.column_width,
            };
            let stdin = io::stdin();
            let mut menu = Menu::new(stdin.lock(), io::stdout(), state);
            menu.report_load_failures(&failures)?;
            menu.run()?;
        }

        Commands::Tracks => {
            let titles: Vec<&str> = library.tracks.iter().map(|t| t.title()).collect();
            print!("{}", listing::render(&titles, cfg.menu.column_width));
            println!("{} tracks in {}", titles.len(), cfg.library.music_dir.display());
        }

        Commands::Playlists => {
            for playlist in &library.playlists {
                println!("{} ({} tracks)", playlist.title(), playlist.len());
            }
            for (path, err) in &failures {
                println!("  [BROKEN]  {}: {err}", path.display());
            }
        }

        Commands::Show { name } => {
            let Some(playlist) = library.find_playlist(&name) else {
                if let Some((_, err)) = failures
                    .iter()
                    .find(|(path, _)| *path == library.store().path_for(&name))
                {
                    bail!("Playlist '{name}' could not be loaded: {err}");
                }
                bail!("No playlist named '{name}'");
            };

            println!("{}:", playlist.title());
            for (i, track) in playlist.entries().iter().enumerate() {
                println!("  {}. {}", i + 1, track.title());
                println!("     {}", track.path().display());
            }
        }
    }

    Ok(())
}
