// src/engine/mod.rs

//! Watch loop for autobuild.
//!
//! The loop is split in two:
//! - [`core`]: a synchronous, deterministic state machine that consumes
//!   [`WatchEvent`]s, owns the baseline snapshot, and decides what happens
//!   next (build, capture, poll, exit).
//! - [`runtime`]: the async IO shell that sleeps, captures snapshots, runs
//!   the build, and races every wait against the shutdown signal.

use crate::watch::{Snapshot, SnapshotDiff};

/// Outcome of one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    /// The script ran and exited non-zero (`-1` when killed by a signal).
    Failed(i32),
    /// The interpreter could not be started at all.
    LaunchFailed(String),
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Success)
    }
}

/// Why a build was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildReason {
    /// Unconditional build at startup.
    Initial,
    /// A poll found differences against the baseline.
    Changed(SnapshotDiff),
}

/// Phase of the watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Between polls (also the phase before `Started`).
    Idle,
    /// The build command is running.
    Building,
    /// Terminal.
    Stopped,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, stop after the initial build instead of watching
    /// (used for `--once`).
    pub exit_after_initial_build: bool,
}

/// Events flowing into the core.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// The loop is starting.
    Started,
    /// The build command returned.
    BuildFinished(BuildOutcome),
    /// First snapshot after the initial build.
    BaselineCaptured(Snapshot),
    /// Snapshot taken after a poll interval.
    PollCaptured(Snapshot),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Build counters, reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub started: usize,
    pub succeeded: usize,
    pub failed: usize,
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreCommand, CoreStep, WatchCore};
pub use runtime::Runtime;
