//! Starting and stopping the external light show player.
//!
//! The player runs as a child process that owns audio and lighting output.
//! At most one child is tracked at a time; the controller never blocks on it
//! except for the bounded wait in `stop`.

pub mod error;
mod signal;
#[cfg(all(test, unix))]
pub(crate) mod testing;

use std::{
    fmt::{self, Display},
    io,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus},
    thread,
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use crate::{
    config,
    domain::item::{ItemKind, Playable},
    playback::{
        error::PlaybackError,
        signal::{ProcessGroup, Signals},
    },
};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long to wait for the kernel to confirm a SIGKILL.
const KILL_CONFIRM: Duration = Duration::from_millis(500);

/// The item currently handed to the player, with its process.
#[derive(Debug)]
pub struct NowPlaying {
    kind: ItemKind,
    title: String,
    path: PathBuf,
    child: Child,
}

impl NowPlaying {
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }
}

/// Result of polling the now-playing process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running { kind: ItemKind, title: String },
    Exited {
        kind: ItemKind,
        title: String,
        status: Option<ExitStatus>,
    },
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "Nothing is playing!"),
            Status::Running { kind, title } => {
                write!(f, "The {kind} entitled \"{title}\" is playing.")
            }
            Status::Exited { kind, title, .. } => {
                write!(f, "The {kind} entitled \"{title}\" has finished.")
            }
        }
    }
}

pub struct PlaybackController {
    command: Vec<String>,
    stop_grace: Duration,
    now_playing: Option<NowPlaying>,
    signals: Box<dyn Signals>,
}

impl PlaybackController {
    pub fn new(config: &config::Player) -> Self {
        Self {
            command: config.command.clone(),
            stop_grace: Duration::from_millis(config.stop_grace_ms),
            now_playing: None,
            signals: Box::new(ProcessGroup),
        }
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    /// Starts the player for `item`.
    ///
    /// Whatever was playing is stopped first; if that fails the old player
    /// stays tracked and nothing new is started. If the player cannot be
    /// started, nothing is left playing.
    pub fn play(&mut self, item: &dyn Playable) -> Result<(), PlaybackError> {
        self.stop()?;

        let (program, args) = self
            .command
            .split_first()
            .ok_or(PlaybackError::EmptyCommand)?;

        let mut command = Command::new(program);
        command.args(args).arg(item.player_arg());
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);

        let child = command.spawn().map_err(|source| PlaybackError::Spawn {
            program: program.clone(),
            source,
        })?;

        info!(
            "started player (pid {}) for {} '{}': {} {:?}",
            child.id(),
            item.kind(),
            item.title(),
            self.command.join(" "),
            item.player_arg()
        );

        self.now_playing = Some(NowPlaying {
            kind: item.kind(),
            title: item.title().to_string(),
            path: item.path().to_path_buf(),
            child,
        });
        Ok(())
    }

    /// Asks the player and everything it started to terminate, then forgets it.
    ///
    /// With a non-zero grace period the player gets that long to exit before
    /// its whole process group is killed. The player is only forgotten once
    /// it is gone; on error it stays tracked so `stop` can be retried.
    /// Returns whether anything was playing.
    pub fn stop(&mut self) -> Result<bool, PlaybackError> {
        let Some(playing) = self.now_playing.as_mut() else {
            return Ok(false);
        };
        shut_down(self.signals.as_ref(), &mut playing.child, self.stop_grace)?;
        self.now_playing = None;
        Ok(true)
    }

    /// Polls the player without blocking.
    ///
    /// The player counts as running while any process it started is alive,
    /// even after the direct child has exited.
    pub fn status(&mut self) -> Status {
        let Some(playing) = self.now_playing.as_mut() else {
            return Status::Idle;
        };

        let kind = playing.kind;
        let title = playing.title.clone();
        match self.signals.alive(&mut playing.child) {
            Ok(true) => Status::Running { kind, title },
            Ok(false) => Status::Exited {
                kind,
                title,
                status: playing.child.try_wait().ok().flatten(),
            },
            Err(err) => {
                warn!("failed to poll player (pid {}): {err}", playing.child.id());
                Status::Exited {
                    kind,
                    title,
                    status: None,
                }
            }
        }
    }
}

/// Sends SIGTERM so the player can shut its lights down, then SIGKILL once
/// `grace` runs out. A zero grace sends SIGTERM only.
fn shut_down(
    signals: &dyn Signals,
    child: &mut Child,
    grace: Duration,
) -> Result<(), PlaybackError> {
    let pid = child.id();
    let signal_error = |source: io::Error| PlaybackError::Signal { pid, source };

    if !signals.alive(child).map_err(signal_error)? {
        debug!("player (pid {pid}) had already exited");
        return Ok(());
    }

    signals.terminate(child).map_err(signal_error)?;
    info!("requested termination of player (pid {pid})");

    if grace.is_zero() {
        return Ok(());
    }
    if wait_until_gone(signals, child, grace).map_err(signal_error)? {
        debug!("player (pid {pid}) exited");
        return Ok(());
    }

    warn!("player (pid {pid}) still running after {grace:?}, killing it");
    signals.kill(child).map_err(signal_error)?;
    if wait_until_gone(signals, child, KILL_CONFIRM).map_err(signal_error)? {
        return Ok(());
    }
    Err(PlaybackError::StillRunning { pid })
}

/// Polls until nothing of the player is alive. `false` if `timeout` passed first.
fn wait_until_gone(
    signals: &dyn Signals,
    child: &mut Child,
    timeout: Duration,
) -> io::Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if !signals.alive(child)? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
