use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use super::*;
use crate::config;

struct Fixture {
    tmp: TempDir,
    library: config::Library,
}

impl Fixture {
    fn new(tracks: &[&str]) -> Self {
        let tmp = TempDir::new().unwrap();
        let library = config::Library {
            music_dir: tmp.path().join("music"),
            playlist_dir: tmp.path().join("playlists"),
            ..config::Library::default()
        };
        std::fs::create_dir(&library.music_dir).unwrap();
        for name in tracks {
            std::fs::write(library.music_dir.join(name), b"not really audio").unwrap();
        }
        Self { tmp, library }
    }

    fn music(&self, name: &str) -> PathBuf {
        self.library.music_dir.join(name)
    }

    fn playlist_path(&self, name: &str) -> PathBuf {
        self.library.playlist_dir.join(format!("{name}.playlist"))
    }

    fn state(&self, player: &config::Player) -> AppState {
        let (library, failures) = Library::open(&self.library).unwrap();
        assert!(failures.is_empty());
        AppState {
            library,
            player: PlaybackController::new(player),
            column_width: 50,
        }
    }

    fn menu(&self, input: &str) -> Menu<Cursor<Vec<u8>>, Vec<u8>> {
        self.menu_with_player(input, &unreachable_player())
    }

    fn menu_with_player(
        &self,
        input: &str,
        player: &config::Player,
    ) -> Menu<Cursor<Vec<u8>>, Vec<u8>> {
        Menu::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            self.state(player),
        )
    }
}

/// A player command that can never start, for sessions that must not play.
fn unreachable_player() -> config::Player {
    config::Player {
        command: vec!["/nonexistent/lightdeck-test-player".to_string()],
        stop_grace_ms: 0,
    }
}

fn run(menu: &mut Menu<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    menu.run().unwrap();
    let out = std::mem::take(&mut menu.out);
    String::from_utf8(out).unwrap()
}

fn paths(playlist: &Playlist) -> Vec<&Path> {
    playlist.entries().iter().map(|t| t.path()).collect()
}

#[test]
fn main_choice_covers_zero_to_six() {
    assert_eq!(MainChoice::parse("0"), Some(MainChoice::Status));
    assert_eq!(MainChoice::parse("3"), Some(MainChoice::Stop));
    assert_eq!(MainChoice::parse("6"), Some(MainChoice::Exit));
    assert_eq!(MainChoice::parse("7"), None);
    assert_eq!(MainChoice::parse("-1"), None);
    assert_eq!(MainChoice::parse(""), None);
}

#[test]
fn exit_says_goodbye() {
    let fixture = Fixture::new(&[]);
    let mut menu = fixture.menu("6\n");
    let out = run(&mut menu);

    assert!(out.contains("---LightShowPi Menu---"));
    assert!(out.ends_with("Goodbye!\n"));
}

#[test]
fn end_of_input_exits() {
    let fixture = Fixture::new(&[]);
    let mut menu = fixture.menu("");
    assert!(run(&mut menu).ends_with("Goodbye!\n"));
}

#[test]
fn invalid_main_choice_reprompts() {
    let fixture = Fixture::new(&[]);
    let mut menu = fixture.menu("9\nhello\n6\n");
    let out = run(&mut menu);

    assert_eq!(out.matches("Invalid.").count(), 2);
    assert_eq!(out.matches("What to do?").count(), 3);
}

#[test]
fn status_with_nothing_playing() {
    let fixture = Fixture::new(&[]);
    let mut menu = fixture.menu("0\n6\n");
    assert!(run(&mut menu).contains("Nothing is playing!"));
}

#[test]
fn stop_with_nothing_playing_is_harmless() {
    let fixture = Fixture::new(&[]);
    let mut menu = fixture.menu("3\n6\n");
    let out = run(&mut menu);
    assert!(out.contains("Nothing is playing!"));
    assert!(out.ends_with("Goodbye!\n"));
}

#[test]
fn choosing_from_empty_catalog_returns_to_main_menu() {
    let fixture = Fixture::new(&[]);
    let mut menu = fixture.menu("1\n2\n6\n");
    let out = run(&mut menu);
    assert!(out.contains("There are no tracks to choose from."));
    assert!(out.contains("There are no playlists to choose from."));
}

#[test]
fn track_listing_rejects_out_of_range_then_cancels() {
    let fixture = Fixture::new(&["01-intro.mp3", "02-drop.mp3"]);
    let mut menu = fixture.menu("1\n3\nDONE\n6\n");
    let out = run(&mut menu);

    assert!(out.contains("1. 01 Intro"));
    assert!(out.contains("2. 02 Drop"));
    assert!(out.contains("Previous input was invalid. Try again."));
    assert!(menu.state().player.now_playing().is_none());
}

#[test]
fn spawn_failure_is_reported_and_menu_continues() {
    let fixture = Fixture::new(&["01-intro.mp3"]);
    let mut menu = fixture.menu("1\n1\ndone\n0\n6\n");
    let out = run(&mut menu);

    assert!(out.contains("Could not start the player"));
    assert!(out.contains("Nothing is playing!"));
    assert!(out.ends_with("Goodbye!\n"));
}

#[test]
fn authoring_rejects_bad_names_and_duplicates() {
    let fixture = Fixture::new(&["01-intro.mp3", "02-drop.mp3"]);
    let mut menu = fixture.menu("4\nnew mix\nnewmix\n2\n2\n5\n1\ndone\n6\n");
    let out = run(&mut menu);

    // bad name, then a duplicate and an out-of-range pick
    assert_eq!(out.matches("Invalid.").count(), 1);
    assert_eq!(out.matches("ERROR: previous choice invalid.").count(), 2);
    assert!(out.contains("Saved playlist \"Newmix\" with 2 tracks."));

    let playlists = &menu.state().library.playlists;
    assert_eq!(playlists.len(), 1);
    assert_eq!(
        paths(&playlists[0]),
        vec![fixture.music("02-drop.mp3"), fixture.music("01-intro.mp3")]
    );
    assert!(!playlists[0].is_dirty());

    let contents = std::fs::read_to_string(fixture.playlist_path("newmix")).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.starts_with("02 Drop\t"));
}

#[test]
fn duplicate_pick_leaves_entry_count_unchanged() {
    let fixture = Fixture::new(&["01-intro.mp3"]);
    let mut menu = fixture.menu("solo\n1\n1\n");

    let mut state = MenuState::AuthoringPlaylist(Authoring::Naming);
    for _ in 0..2 {
        state = menu.advance(state).unwrap().unwrap();
    }
    match &state {
        MenuState::AuthoringPlaylist(Authoring::Adding { playlist, retry }) => {
            assert_eq!(playlist.len(), 1);
            assert!(!*retry);
        }
        other => panic!("unexpected state {other:?}"),
    }

    let state = menu.advance(state).unwrap().unwrap();
    match &state {
        MenuState::AuthoringPlaylist(Authoring::Adding { playlist, retry }) => {
            assert_eq!(playlist.len(), 1);
            assert!(*retry);
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn authoring_an_existing_name_extends_it_in_place() {
    let fixture = Fixture::new(&["a.mp3", "b.mp3"]);
    std::fs::create_dir_all(&fixture.library.playlist_dir).unwrap();
    std::fs::write(
        fixture.playlist_path("mix"),
        format!("A\t{}\n", fixture.music("a.mp3").display()),
    )
    .unwrap();

    let mut menu = fixture.menu("4\nmix\n1\n2\ndone\n6\n");
    let out = run(&mut menu);

    assert!(out.contains("ERROR: previous choice invalid."));
    let playlists = &menu.state().library.playlists;
    assert_eq!(playlists.len(), 1);
    assert_eq!(
        paths(&playlists[0]),
        vec![fixture.music("a.mp3"), fixture.music("b.mp3")]
    );
}

#[test]
fn end_of_input_while_authoring_saves_the_playlist() {
    let fixture = Fixture::new(&["a.mp3"]);
    let mut menu = fixture.menu("4\nlate\n1\n");
    let out = run(&mut menu);

    assert!(out.contains("Saved playlist \"Late\" with 1 tracks."));
    let contents = std::fs::read_to_string(fixture.playlist_path("late")).unwrap();
    assert_eq!(contents.lines().count(), 1);
}

#[test]
fn reload_picks_up_new_files_and_reports_broken_playlists() {
    let fixture = Fixture::new(&[]);
    let mut menu = fixture.menu("5\n6\n");

    std::fs::write(fixture.music("fresh-cut.mp3"), b"x").unwrap();
    std::fs::write(fixture.playlist_path("ok"), "").unwrap();
    std::fs::write(fixture.playlist_path("broken"), "no tab\n").unwrap();

    let out = run(&mut menu);
    assert!(out.contains("Found 1 tracks and 1 playlists."));
    assert!(out.contains("Skipped playlist"));
    assert_eq!(menu.state().library.tracks[0].title(), "Fresh Cut");
}

#[cfg(unix)]
mod with_player {
    use super::*;
    use crate::{
        domain::item::ItemKind,
        playback::testing::{recording_player, wait_for_file},
    };

    #[test]
    fn play_track_then_stop_clears_now_playing() {
        let fixture = Fixture::new(&["01-intro.mp3", "02-drop.mp3"]);
        let (player, log) = recording_player(fixture.tmp.path());
        let mut menu = fixture.menu_with_player("1\n1\ndone\n3\n6\n", &player);

        let state = menu.advance(MenuState::MainMenu).unwrap().unwrap();
        assert!(matches!(state, MenuState::ChoosingTrack { retry: false }));

        let state = menu.advance(state).unwrap().unwrap();
        assert!(matches!(state, MenuState::ChoosingTrack { retry: false }));
        let playing = menu.state().player.now_playing().unwrap();
        assert_eq!(playing.kind(), ItemKind::Track);
        assert_eq!(playing.path(), fixture.music("01-intro.mp3"));
        assert_eq!(
            wait_for_file(&log),
            format!("--file={}\n", fixture.music("01-intro.mp3").display())
        );

        let state = menu.advance(state).unwrap().unwrap();
        assert!(matches!(state, MenuState::MainMenu));
        assert!(menu.state().player.now_playing().is_some());

        let state = menu.advance(state).unwrap().unwrap();
        assert!(matches!(state, MenuState::MainMenu));
        assert!(menu.state().player.now_playing().is_none());

        assert!(menu.advance(state).unwrap().is_none());

        let out = String::from_utf8(menu.into_parts().1).unwrap();
        assert!(out.contains("1. 01 Intro"));
        assert!(out.contains("Now playing \"01 Intro\"."));
        assert!(out.contains("Stopped \"01 Intro\"."));
    }

    #[test]
    fn play_playlist_and_query_status() {
        let fixture = Fixture::new(&[]);
        std::fs::create_dir_all(&fixture.library.playlist_dir).unwrap();
        std::fs::write(fixture.playlist_path("party-time"), "").unwrap();
        let (player, log) = recording_player(fixture.tmp.path());
        let mut menu = fixture.menu_with_player("2\n1\ndone\n0\n6\n", &player);

        let state = menu.advance(MenuState::MainMenu).unwrap().unwrap();
        let state = menu.advance(state).unwrap().unwrap();
        assert!(matches!(state, MenuState::ChoosingPlaylist { retry: false }));
        assert_eq!(
            wait_for_file(&log),
            format!("--playlist{}\n", fixture.playlist_path("party-time").display())
        );

        let state = menu.advance(state).unwrap().unwrap();
        assert!(matches!(state, MenuState::MainMenu));
        let state = menu.advance(state).unwrap().unwrap();
        assert!(matches!(state, MenuState::MainMenu));
        assert!(menu.state().player.now_playing().is_some());

        // exit stops playback
        assert!(menu.advance(state).unwrap().is_none());
        assert!(menu.state().player.now_playing().is_none());

        let out = String::from_utf8(menu.into_parts().1).unwrap();
        assert!(out.contains("1. Party Time"));
        assert!(out.contains("Now playing \"Party Time\"."));
        assert!(out.contains("The playlist entitled \"Party Time\" is playing."));
    }
}
