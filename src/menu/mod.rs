//! The interactive console menu.
//!
//! A small state machine over line-based input. Invalid input never leaves
//! the current state; it is reported and the prompt is shown again.

pub mod input;
pub mod listing;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use log::debug;

use crate::{
    domain::{item::Playable, playlist::Playlist},
    menu::input::{is_cancel, is_valid_playlist_name, parse_choice},
    playback::PlaybackController,
    storage::{error::StorageError, library::Library},
};

const PROMPT: &str = ">>>";

const MAIN_MENU: &str = "
---LightShowPi Menu---
 0. See what's playing
 1. Play a track
 2. Play a playlist
 3. Stop playing
 4. Make a playlist
 5. Refresh file index
 6. Exit
";

/// Top-level actions, numbered as shown in the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    Status,
    PlayTrack,
    PlayPlaylist,
    Stop,
    MakePlaylist,
    Reload,
    Exit,
}

impl MainChoice {
    pub const ALL: [MainChoice; 7] = [
        MainChoice::Status,
        MainChoice::PlayTrack,
        MainChoice::PlayPlaylist,
        MainChoice::Stop,
        MainChoice::MakePlaylist,
        MainChoice::Reload,
        MainChoice::Exit,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        parse_choice(input, 0, Self::ALL.len() - 1).map(|i| Self::ALL[i])
    }
}

/// Where the menu is. `retry` remembers that the previous input was rejected.
#[derive(Debug)]
pub enum MenuState {
    MainMenu,
    ChoosingTrack { retry: bool },
    ChoosingPlaylist { retry: bool },
    AuthoringPlaylist(Authoring),
}

#[derive(Debug)]
pub enum Authoring {
    Naming,
    Adding { playlist: Playlist, retry: bool },
}

/// Everything the menu mutates between transitions.
pub struct AppState {
    pub library: Library,
    pub player: PlaybackController,
    pub column_width: usize,
}

pub struct Menu<R, W> {
    input: R,
    out: W,
    state: AppState,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, out: W, state: AppState) -> Self {
        Self { input, out, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_parts(self) -> (AppState, W) {
        (self.state, self.out)
    }

    /// Runs until the operator exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        let mut state = MenuState::MainMenu;
        while let Some(next) = self.advance(state)? {
            state = next;
        }
        writeln!(self.out, "Goodbye!")?;
        self.out.flush()
    }

    /// Performs one transition. `None` means the menu is finished.
    pub fn advance(&mut self, state: MenuState) -> io::Result<Option<MenuState>> {
        debug!("menu state: {state:?}");
        match state {
            MenuState::MainMenu => self.main_menu(),
            MenuState::ChoosingTrack { retry } => self.choose_track(retry),
            MenuState::ChoosingPlaylist { retry } => self.choose_playlist(retry),
            MenuState::AuthoringPlaylist(Authoring::Naming) => self.name_playlist(),
            MenuState::AuthoringPlaylist(Authoring::Adding { playlist, retry }) => {
                self.add_to_playlist(playlist, retry)
            }
        }
    }

    /// Prints playlists that could not be loaded.
    pub fn report_load_failures(&mut self, failures: &[(PathBuf, StorageError)]) -> io::Result<()> {
        for (path, err) in failures {
            writeln!(self.out, "Skipped playlist {}: {err}", path.display())?;
        }
        Ok(())
    }

    fn main_menu(&mut self) -> io::Result<Option<MenuState>> {
        writeln!(self.out, "{MAIN_MENU}")?;
        writeln!(self.out, "What to do?")?;
        let Some(line) = self.read_line()? else {
            return self.exit();
        };

        let Some(choice) = MainChoice::parse(&line) else {
            writeln!(self.out, "Invalid.")?;
            return Ok(Some(MenuState::MainMenu));
        };

        let next = match choice {
            MainChoice::Status => {
                let status = self.state.player.status();
                writeln!(self.out, "{status}")?;
                MenuState::MainMenu
            }
            MainChoice::PlayTrack => MenuState::ChoosingTrack { retry: false },
            MainChoice::PlayPlaylist => MenuState::ChoosingPlaylist { retry: false },
            MainChoice::Stop => {
                self.stop()?;
                MenuState::MainMenu
            }
            MainChoice::MakePlaylist => MenuState::AuthoringPlaylist(Authoring::Naming),
            MainChoice::Reload => {
                self.reload()?;
                MenuState::MainMenu
            }
            MainChoice::Exit => return self.exit(),
        };
        Ok(Some(next))
    }

    fn choose_track(&mut self, retry: bool) -> io::Result<Option<MenuState>> {
        let titles = titles(&self.state.library.tracks);
        match self.choose("track", &titles, retry)? {
            Choice::Ended => self.exit(),
            Choice::Cancelled | Choice::Empty => Ok(Some(MenuState::MainMenu)),
            Choice::Invalid => Ok(Some(MenuState::ChoosingTrack { retry: true })),
            Choice::Picked(index) => {
                let AppState {
                    library, player, ..
                } = &mut self.state;
                let result = player.play(&library.tracks[index]);
                self.report_play(result, &titles[index])?;
                Ok(Some(MenuState::ChoosingTrack { retry: false }))
            }
        }
    }

    fn choose_playlist(&mut self, retry: bool) -> io::Result<Option<MenuState>> {
        let titles = titles(&self.state.library.playlists);
        match self.choose("playlist", &titles, retry)? {
            Choice::Ended => self.exit(),
            Choice::Cancelled | Choice::Empty => Ok(Some(MenuState::MainMenu)),
            Choice::Invalid => Ok(Some(MenuState::ChoosingPlaylist { retry: true })),
            Choice::Picked(index) => {
                let AppState {
                    library, player, ..
                } = &mut self.state;
                let result = player.play(&library.playlists[index]);
                self.report_play(result, &titles[index])?;
                Ok(Some(MenuState::ChoosingPlaylist { retry: false }))
            }
        }
    }

    fn choose(&mut self, item_desc: &str, titles: &[String], retry: bool) -> io::Result<Choice> {
        if titles.is_empty() {
            writeln!(self.out, "There are no {item_desc}s to choose from.")?;
            return Ok(Choice::Empty);
        }

        write!(self.out, "{}", listing::render(titles, self.state.column_width))?;
        if retry {
            writeln!(self.out, "Previous input was invalid. Try again.")?;
        }
        writeln!(
            self.out,
            "\nWhich {item_desc} to play? (type 'done' to return to menu)"
        )?;

        let Some(line) = self.read_line()? else {
            return Ok(Choice::Ended);
        };
        if let Some(n) = parse_choice(&line, 1, titles.len()) {
            Ok(Choice::Picked(n - 1))
        } else if is_cancel(&line) {
            Ok(Choice::Cancelled)
        } else {
            writeln!(self.out, "Invalid.")?;
            Ok(Choice::Invalid)
        }
    }

    fn name_playlist(&mut self) -> io::Result<Option<MenuState>> {
        writeln!(
            self.out,
            "\nEnter a name for this playlist. (alphanumeric characters legal)"
        )?;
        let Some(name) = self.read_line()? else {
            return self.exit();
        };
        if !is_valid_playlist_name(&name) {
            writeln!(self.out, "Invalid.")?;
            return Ok(Some(MenuState::AuthoringPlaylist(Authoring::Naming)));
        }

        let store = self.state.library.store();
        match store.open(store.path_for(&name)) {
            Ok(playlist) => Ok(Some(MenuState::AuthoringPlaylist(Authoring::Adding {
                playlist,
                retry: false,
            }))),
            Err(err) => {
                writeln!(self.out, "Could not open playlist {name}: {err}")?;
                Ok(Some(MenuState::MainMenu))
            }
        }
    }

    fn add_to_playlist(
        &mut self,
        mut playlist: Playlist,
        retry: bool,
    ) -> io::Result<Option<MenuState>> {
        let tracks = &self.state.library.tracks;
        if tracks.is_empty() {
            writeln!(self.out, "There are no tracks to add.")?;
            self.finish_playlist(playlist)?;
            return Ok(Some(MenuState::MainMenu));
        }

        write!(
            self.out,
            "{}",
            listing::render(&titles(tracks), self.state.column_width)
        )?;
        if retry {
            writeln!(self.out, "ERROR: previous choice invalid.")?;
            writeln!(
                self.out,
                "  Either it was already on the playlist, or choice not on list."
            )?;
        }
        writeln!(self.out, "\nWhich track to add? (type 'done' when finished)")?;

        let Some(line) = self.read_line()? else {
            self.finish_playlist(playlist)?;
            return self.exit();
        };

        let tracks = &self.state.library.tracks;
        let retry = match parse_choice(&line, 1, tracks.len()) {
            Some(n) if !playlist.contains(tracks[n - 1].path()) => {
                let track = tracks[n - 1].clone();
                writeln!(self.out, "Added {}.", track.title())?;
                playlist.add(track);
                false
            }
            Some(_) => true,
            None if is_cancel(&line) => {
                self.finish_playlist(playlist)?;
                return Ok(Some(MenuState::MainMenu));
            }
            None => true,
        };

        Ok(Some(MenuState::AuthoringPlaylist(Authoring::Adding {
            playlist,
            retry,
        })))
    }

    fn finish_playlist(&mut self, mut playlist: Playlist) -> io::Result<()> {
        match self.state.library.store().save(&mut playlist) {
            Ok(()) => {
                writeln!(
                    self.out,
                    "Saved playlist \"{}\" with {} tracks.",
                    playlist.title(),
                    playlist.len()
                )?;
                self.state.library.upsert_playlist(playlist);
            }
            Err(err) => {
                writeln!(self.out, "Could not save playlist \"{}\": {err}", playlist.title())?;
            }
        }
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        let title = self
            .state
            .player
            .now_playing()
            .map(|n| n.title().to_string());
        match (self.state.player.stop(), title) {
            (Ok(true), Some(title)) => writeln!(self.out, "Stopped \"{title}\"."),
            (Ok(_), _) => writeln!(self.out, "Nothing is playing!"),
            (Err(err), _) => writeln!(self.out, "Could not stop the player: {err}"),
        }
    }

    fn reload(&mut self) -> io::Result<()> {
        let failures = self.state.library.reload();
        writeln!(
            self.out,
            "Found {} tracks and {} playlists.",
            self.state.library.tracks.len(),
            self.state.library.playlists.len()
        )?;
        self.report_load_failures(&failures)
    }

    fn exit(&mut self) -> io::Result<Option<MenuState>> {
        if let Err(err) = self.state.player.stop() {
            writeln!(self.out, "Could not stop the player: {err}")?;
        }
        Ok(None)
    }

    fn report_play<E: std::fmt::Display>(
        &mut self,
        result: Result<(), E>,
        title: &str,
    ) -> io::Result<()> {
        match result {
            Ok(()) => writeln!(self.out, "Now playing \"{title}\"."),
            Err(err) => writeln!(self.out, "Could not start the player: {err}"),
        }
    }

    /// Prompts and reads one line without its line ending. `None` on end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        write!(self.out, "{PROMPT}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

enum Choice {
    Picked(usize),
    Cancelled,
    Invalid,
    Empty,
    Ended,
}

fn titles<P: Playable>(items: &[P]) -> Vec<String> {
    items.iter().map(|i| i.title().to_string()).collect()
}

#[cfg(test)]
mod tests;
