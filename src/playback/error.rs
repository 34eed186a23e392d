use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("player command is empty")]
    EmptyCommand,

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stop player (pid {pid}): {source}")]
    Signal {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("player (pid {pid}) or a process it started is still running after kill")]
    StillRunning { pid: u32 },
}
