//! Stand-in players for tests that exercise the real process lifecycle.

use std::{
    fs,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use crate::config;

/// Writes a stand-in player script and returns a config that runs it.
///
/// The script is run through `sh` so it never needs to be executable.
pub(crate) fn fake_player(dir: &Path, script_body: &str) -> config::Player {
    let script = dir.join("fake_player.sh");
    fs::write(&script, script_body).unwrap();
    config::Player {
        command: vec!["sh".to_string(), script.to_string_lossy().into_owned()],
        stop_grace_ms: 2000,
    }
}

/// A player that appends its arguments to a log file, then sleeps.
pub(crate) fn recording_player(dir: &Path) -> (config::Player, PathBuf) {
    let log = dir.join("argv.log");
    let body = format!(
        "printf '%s\\n' \"$@\" >> '{}'\nexec sleep 30\n",
        log.display()
    );
    (fake_player(dir, &body), log)
}

/// Waits until `path` holds at least one complete line and returns it.
pub(crate) fn wait_for_file(path: &Path) -> String {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Ok(contents) = fs::read_to_string(path) {
            if contents.ends_with('\n') {
                return contents;
            }
        }
        thread::sleep(Duration::from_millis(20));
    }
    panic!("{} was never written", path.display());
}

/// Whether `pid` names a live process. Zombies count as gone.
#[cfg(target_os = "linux")]
pub(crate) fn is_running(pid: u32) -> bool {
    super::signal::proc_stat(pid).is_some_and(|stat| stat.state != 'Z')
}
