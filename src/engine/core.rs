// src/engine/core.rs

//! Pure core state machine.
//!
//! This module contains a synchronous, deterministic "core" that consumes
//! [`WatchEvent`]s and produces:
//! - an updated phase and baseline
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for sleeping,
//! capturing snapshots, running the build, and listening for shutdown.
//!
//! The core has no Tokio types, no channels, and does not perform any IO.

use tracing::{debug, info};

use crate::engine::{BuildOutcome, BuildReason, Phase, RuntimeOptions, WatchEvent, WatchStats};
use crate::watch::{changed, Snapshot};

/// Command produced by the core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Run the build command once and report `BuildFinished`.
    RunBuild(BuildReason),
    /// Capture a snapshot right away and report `BaselineCaptured`.
    CaptureBaseline,
    /// Sleep one interval, capture, and report `PollCaptured`.
    SchedulePoll,
    /// The loop is done (`--once`).
    RequestExit,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn run(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    fn stop(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: false,
        }
    }
}

/// Core watch-loop state: phase, baseline snapshot, and build counters.
#[derive(Debug)]
pub struct WatchCore {
    phase: Phase,
    baseline: Option<Snapshot>,
    options: RuntimeOptions,
    stats: WatchStats,
}

impl WatchCore {
    pub fn new(options: RuntimeOptions) -> Self {
        Self {
            phase: Phase::Idle,
            baseline: None,
            options,
            stats: WatchStats::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The snapshot the next poll is compared against.
    pub fn baseline(&self) -> Option<&Snapshot> {
        self.baseline.as_ref()
    }

    pub fn stats(&self) -> WatchStats {
        self.stats
    }

    /// Handle a single event, updating state and returning the commands for
    /// the IO shell.
    pub fn step(&mut self, event: WatchEvent) -> CoreStep {
        if self.phase == Phase::Stopped {
            debug!(?event, "core already stopped; ignoring event");
            return CoreStep::stop(Vec::new());
        }

        match event {
            WatchEvent::Started => self.start_build(BuildReason::Initial),
            WatchEvent::BuildFinished(outcome) => self.handle_build_finished(outcome),
            WatchEvent::BaselineCaptured(snapshot) => {
                debug!(files = snapshot.len(), "baseline captured");
                self.baseline = Some(snapshot);
                CoreStep::run(vec![CoreCommand::SchedulePoll])
            }
            WatchEvent::PollCaptured(snapshot) => self.handle_poll(snapshot),
            WatchEvent::ShutdownRequested => {
                info!(phase = ?self.phase, "shutdown requested");
                self.phase = Phase::Stopped;
                CoreStep::stop(Vec::new())
            }
        }
    }

    fn start_build(&mut self, reason: BuildReason) -> CoreStep {
        self.phase = Phase::Building;
        self.stats.started += 1;
        CoreStep::run(vec![CoreCommand::RunBuild(reason)])
    }

    fn handle_build_finished(&mut self, outcome: BuildOutcome) -> CoreStep {
        if self.phase != Phase::Building {
            debug!(?outcome, phase = ?self.phase, "build result outside of a build; ignoring");
            return CoreStep::run(Vec::new());
        }

        if outcome.is_success() {
            self.stats.succeeded += 1;
        } else {
            self.stats.failed += 1;
        }

        if self.options.exit_after_initial_build {
            self.phase = Phase::Stopped;
            return CoreStep::stop(vec![CoreCommand::RequestExit]);
        }

        self.phase = Phase::Idle;
        if self.baseline.is_none() {
            CoreStep::run(vec![CoreCommand::CaptureBaseline])
        } else {
            CoreStep::run(vec![CoreCommand::SchedulePoll])
        }
    }

    fn handle_poll(&mut self, snapshot: Snapshot) -> CoreStep {
        if self.phase != Phase::Idle {
            debug!(phase = ?self.phase, "poll result while not idle; ignoring");
            return CoreStep::run(Vec::new());
        }

        let Some(baseline) = self.baseline.as_ref() else {
            self.baseline = Some(snapshot);
            return CoreStep::run(vec![CoreCommand::SchedulePoll]);
        };

        if !changed(baseline, &snapshot) {
            return CoreStep::run(vec![CoreCommand::SchedulePoll]);
        }

        let diff = baseline.diff(&snapshot);
        debug!(
            created = ?diff.created,
            modified = ?diff.modified,
            removed = ?diff.removed,
            "change detected"
        );

        // The new snapshot becomes the baseline whatever the build outcome.
        self.baseline = Some(snapshot);
        self.start_build(BuildReason::Changed(diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};

    fn snap(entries: &[(&str, u64)]) -> Snapshot {
        entries
            .iter()
            .map(|(p, s)| (PathBuf::from(p), UNIX_EPOCH + Duration::from_secs(*s)))
            .collect()
    }

    /// Drive a watching core through the initial build and baseline capture.
    fn started_core(baseline: Snapshot) -> WatchCore {
        let mut core = WatchCore::new(RuntimeOptions::default());
        core.step(WatchEvent::Started);
        core.step(WatchEvent::BuildFinished(BuildOutcome::Success));
        core.step(WatchEvent::BaselineCaptured(baseline));
        core
    }

    #[test]
    fn start_always_builds_first() {
        let mut core = WatchCore::new(RuntimeOptions::default());

        let step = core.step(WatchEvent::Started);

        assert_eq!(step.commands, vec![CoreCommand::RunBuild(BuildReason::Initial)]);
        assert!(step.keep_running);
        assert_eq!(core.phase(), Phase::Building);
        assert!(core.baseline().is_none());
    }

    #[test]
    fn initial_build_is_followed_by_baseline_capture() {
        let mut core = WatchCore::new(RuntimeOptions::default());
        core.step(WatchEvent::Started);

        let step = core.step(WatchEvent::BuildFinished(BuildOutcome::Failed(1)));
        assert_eq!(step.commands, vec![CoreCommand::CaptureBaseline]);
        assert_eq!(core.phase(), Phase::Idle);

        let step = core.step(WatchEvent::BaselineCaptured(snap(&[("/g/a", 1)])));
        assert_eq!(step.commands, vec![CoreCommand::SchedulePoll]);
        assert_eq!(core.baseline().map(Snapshot::len), Some(1));
    }

    #[test]
    fn unchanged_poll_keeps_polling() {
        let mut core = started_core(snap(&[("/g/a", 1)]));

        let step = core.step(WatchEvent::PollCaptured(snap(&[("/g/a", 1)])));

        assert_eq!(step.commands, vec![CoreCommand::SchedulePoll]);
        assert_eq!(core.phase(), Phase::Idle);
        assert_eq!(core.stats().started, 1);
    }

    #[test]
    fn created_file_triggers_one_build_and_new_baseline() {
        let mut core = started_core(Snapshot::default());
        let after = snap(&[("/g/a.txt", 5)]);

        let step = core.step(WatchEvent::PollCaptured(after.clone()));

        match step.commands.as_slice() {
            [CoreCommand::RunBuild(BuildReason::Changed(diff))] => {
                assert_eq!(diff.created, vec![PathBuf::from("/g/a.txt")]);
            }
            other => panic!("expected a single change build, got {other:?}"),
        }
        assert_eq!(core.phase(), Phase::Building);
        assert_eq!(core.baseline(), Some(&after));
    }

    #[test]
    fn deleted_file_triggers_build() {
        let mut core = started_core(snap(&[("/g/a", 1), ("/g/b", 1)]));

        let step = core.step(WatchEvent::PollCaptured(snap(&[("/g/a", 1)])));

        assert!(matches!(
            step.commands.as_slice(),
            [CoreCommand::RunBuild(BuildReason::Changed(_))]
        ));
    }

    #[test]
    fn failed_build_still_advances_baseline() {
        let mut core = started_core(Snapshot::default());
        let after = snap(&[("/g/a.txt", 5)]);

        core.step(WatchEvent::PollCaptured(after.clone()));
        let step = core.step(WatchEvent::BuildFinished(BuildOutcome::Failed(2)));

        assert_eq!(step.commands, vec![CoreCommand::SchedulePoll]);
        assert!(step.keep_running);
        assert_eq!(core.baseline(), Some(&after));

        // Same state again: no rebuild.
        let step = core.step(WatchEvent::PollCaptured(after));
        assert_eq!(step.commands, vec![CoreCommand::SchedulePoll]);

        assert_eq!(
            core.stats(),
            WatchStats {
                started: 2,
                succeeded: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn shutdown_is_terminal_from_any_phase() {
        let mut idle = started_core(Snapshot::default());
        let step = idle.step(WatchEvent::ShutdownRequested);
        assert!(!step.keep_running);
        assert_eq!(idle.phase(), Phase::Stopped);

        let mut building = WatchCore::new(RuntimeOptions::default());
        building.step(WatchEvent::Started);
        let step = building.step(WatchEvent::ShutdownRequested);
        assert!(!step.keep_running);
        assert_eq!(building.phase(), Phase::Stopped);

        // Nothing restarts a stopped core.
        let step = building.step(WatchEvent::Started);
        assert!(step.commands.is_empty());
        assert!(!step.keep_running);
    }

    #[test]
    fn once_mode_exits_after_initial_build() {
        let mut core = WatchCore::new(RuntimeOptions {
            exit_after_initial_build: true,
        });
        core.step(WatchEvent::Started);

        let step = core.step(WatchEvent::BuildFinished(BuildOutcome::Failed(3)));

        assert_eq!(step.commands, vec![CoreCommand::RequestExit]);
        assert!(!step.keep_running);
        assert_eq!(core.stats().failed, 1);
    }

    #[test]
    fn stray_events_are_ignored() {
        let mut core = started_core(Snapshot::default());
        let before = core.stats();

        let step = core.step(WatchEvent::BuildFinished(BuildOutcome::Success));
        assert!(step.commands.is_empty());
        assert!(step.keep_running);
        assert_eq!(core.stats(), before);
    }
}
