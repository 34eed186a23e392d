//! Signals for the player and everything it starts.
//!
//! The player is spawned as the leader of its own process group, so a
//! wrapper such as `sudo` and the real player behind it are signalled
//! together.

use std::{io, process::Child};

/// How the controller reaches the player's processes.
pub(crate) trait Signals {
    /// Asks every process of the player to exit.
    fn terminate(&self, child: &mut Child) -> io::Result<()>;

    /// Ends every process of the player without asking.
    fn kill(&self, child: &mut Child) -> io::Result<()>;

    /// Whether the player or anything it started is still alive.
    /// Reaps the direct child once it has exited.
    fn alive(&self, child: &mut Child) -> io::Result<bool>;
}

pub(crate) struct ProcessGroup;

#[cfg(unix)]
impl Signals for ProcessGroup {
    fn terminate(&self, child: &mut Child) -> io::Result<()> {
        signal_group(child, libc::SIGTERM)
    }

    fn kill(&self, child: &mut Child) -> io::Result<()> {
        signal_group(child, libc::SIGKILL)
    }

    fn alive(&self, child: &mut Child) -> io::Result<bool> {
        if child.try_wait()?.is_none() {
            return Ok(true);
        }
        group_alive(pgid(child)?)
    }
}

#[cfg(not(unix))]
impl Signals for ProcessGroup {
    fn terminate(&self, child: &mut Child) -> io::Result<()> {
        child.kill()
    }

    fn kill(&self, child: &mut Child) -> io::Result<()> {
        child.kill()
    }

    fn alive(&self, child: &mut Child) -> io::Result<bool> {
        Ok(child.try_wait()?.is_none())
    }
}

/// The child leads its own group, so its pid is the group id.
#[cfg(unix)]
fn pgid(child: &Child) -> io::Result<libc::pid_t> {
    libc::pid_t::try_from(child.id()).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

/// A group that is already gone counts as signalled.
#[cfg(unix)]
fn signal_group(child: &Child, signal: libc::c_int) -> io::Result<()> {
    let rc = unsafe { libc::kill(-pgid(child)?, signal) };
    if rc == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        Ok(())
    } else {
        Err(err)
    }
}

/// Zombies waiting to be reaped by init do not count.
#[cfg(target_os = "linux")]
fn group_alive(pgid: libc::pid_t) -> io::Result<bool> {
    let alive = std::fs::read_dir("/proc")?
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
        .filter_map(proc_stat)
        .any(|stat| stat.pgrp == pgid && stat.state != 'Z');
    Ok(alive)
}

#[cfg(all(unix, not(target_os = "linux")))]
fn group_alive(pgid: libc::pid_t) -> io::Result<bool> {
    let rc = unsafe { libc::kill(-pgid, 0) };
    if rc == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Ok(false),
        Some(libc::EPERM) => Ok(true),
        _ => Err(err),
    }
}

/// The fields of `/proc/<pid>/stat` the group check needs.
#[cfg(target_os = "linux")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProcStat {
    pub state: char,
    pub pgrp: libc::pid_t,
}

#[cfg(target_os = "linux")]
pub(crate) fn proc_stat(pid: u32) -> Option<ProcStat> {
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    parse_stat(&stat)
}

/// Parses `pid (comm) state ppid pgrp ...`. `comm` may itself hold `)`.
#[cfg(target_os = "linux")]
fn parse_stat(stat: &str) -> Option<ProcStat> {
    let (_, rest) = stat.rsplit_once(')')?;
    let mut fields = rest.split_whitespace();
    let state = fields.next()?.chars().next()?;
    let _ppid = fields.next()?;
    let pgrp = fields.next()?.parse().ok()?;
    Some(ProcStat { state, pgrp })
}
