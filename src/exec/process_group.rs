// src/exec/process_group.rs

//! Whole-group termination for build processes.
//!
//! The build script is started as the leader of a new process group, so
//! every command it runs (compilers, bundlers, `sleep`, ...) shares that
//! group. Killing only the interpreter would orphan those commands; killing
//! the group takes all of them down.
//!
//! The group is also out of reach of the terminal's Ctrl-C, which only hits
//! the foreground group (the watcher itself). The watcher cancels the build
//! by dropping it, and [`GroupKillGuard`] delivers the signal.

/// Sends `SIGKILL` to a build's process group when dropped, unless the build
/// already finished on its own.
#[derive(Debug)]
pub struct GroupKillGuard {
    pgid: Option<u32>,
}

impl GroupKillGuard {
    /// `leader_pid` is the pid of a child spawned with `process_group(0)`,
    /// which is also its group id. `None` (child already reaped) makes the
    /// guard inert.
    pub fn new(leader_pid: Option<u32>) -> Self {
        Self { pgid: leader_pid }
    }

    /// The build completed; leave whatever it left behind alone.
    pub fn disarm(&mut self) {
        self.pgid = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pgid.is_some()
    }
}

impl Drop for GroupKillGuard {
    fn drop(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_group(pgid);
        }
    }
}

#[cfg(unix)]
fn kill_group(pgid: u32) {
    use tracing::{debug, warn};

    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        warn!(pgid, "process group id out of range; not signalling");
        return;
    };
    // Never signal our own group or "every process we may signal".
    if pgid <= 1 {
        return;
    }

    // SAFETY: killpg takes plain integers and touches no memory of ours.
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc == 0 {
        debug!(pgid, "killed build process group");
    } else {
        debug!(
            pgid,
            error = %std::io::Error::last_os_error(),
            "could not signal build process group"
        );
    }
}

#[cfg(not(unix))]
fn kill_group(_pgid: u32) {}
