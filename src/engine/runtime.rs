// src/engine/runtime.rs

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::console::Console;
use crate::errors::Result;
use crate::exec::BuildRunner;
use crate::watch::SnapshotSource;

use super::core::WatchCore;
use super::{CoreCommand, WatchEvent, WatchStats};

/// Drives the core watch loop: sleeps, captures snapshots, runs builds.
///
/// This is a pure IO shell around `WatchCore`, which contains all the loop
/// semantics. Every wait (poll sleep and build) is raced against the shutdown
/// channel, so a shutdown request is honoured immediately:
/// - while idle, the sleep is abandoned;
/// - while building, the build future is dropped, which kills the build
///   process group. No further builds are started.
pub struct Runtime<R: BuildRunner, S: SnapshotSource> {
    core: WatchCore,
    runner: R,
    source: S,
    interval: Duration,
    shutdown_rx: mpsc::Receiver<()>,
    console: Console,
}

impl<R: BuildRunner, S: SnapshotSource> fmt::Debug for Runtime<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl<R: BuildRunner, S: SnapshotSource> Runtime<R, S> {
    pub fn new(
        core: WatchCore,
        runner: R,
        source: S,
        interval: Duration,
        shutdown_rx: mpsc::Receiver<()>,
        console: Console,
    ) -> Self {
        Self {
            core,
            runner,
            source,
            interval,
            shutdown_rx,
            console,
        }
    }

    /// Main loop.
    ///
    /// - Feeds events into the core, starting with `Started`.
    /// - Executes the commands returned by the core, each of which yields
    ///   the next event.
    /// - Returns the build counters once the core stops.
    pub async fn run(mut self) -> Result<WatchStats> {
        info!(interval = ?self.interval, "watch loop started");

        let mut pending = VecDeque::from([WatchEvent::Started]);

        while let Some(event) = pending.pop_front() {
            debug!(?event, "core received event");
            let step = self.core.step(event);

            for command in step.commands {
                if let Some(next) = self.execute_command(command).await? {
                    pending.push_back(next);
                }
            }

            if !step.keep_running {
                info!("core requested exit; stopping watch loop");
                break;
            }
        }

        let stats = self.core.stats();
        info!(
            started = stats.started,
            succeeded = stats.succeeded,
            failed = stats.failed,
            "watch loop exiting"
        );
        Ok(stats)
    }

    /// Execute a single command from the core, returning the event it
    /// produced (if any).
    async fn execute_command(&mut self, command: CoreCommand) -> Result<Option<WatchEvent>> {
        match command {
            CoreCommand::RunBuild(reason) => {
                self.console.build_started(&reason);

                tokio::select! {
                    biased;
                    _ = wait_for_shutdown(&mut self.shutdown_rx) => {
                        warn!("shutdown requested during build; aborting build");
                        Ok(Some(self.shutdown()))
                    }
                    outcome = self.runner.run_build() => {
                        let outcome = outcome?;
                        self.console.build_finished(&outcome);
                        Ok(Some(WatchEvent::BuildFinished(outcome)))
                    }
                }
            }
            CoreCommand::CaptureBaseline => {
                Ok(Some(WatchEvent::BaselineCaptured(self.source.capture())))
            }
            CoreCommand::SchedulePoll => {
                tokio::select! {
                    biased;
                    _ = wait_for_shutdown(&mut self.shutdown_rx) => Ok(Some(self.shutdown())),
                    _ = tokio::time::sleep(self.interval) => {
                        Ok(Some(WatchEvent::PollCaptured(self.source.capture())))
                    }
                }
            }
            CoreCommand::RequestExit => {
                debug!("core issued RequestExit command");
                Ok(None)
            }
        }
    }

    fn shutdown(&mut self) -> WatchEvent {
        self.console.shutting_down();
        WatchEvent::ShutdownRequested
    }
}

/// Resolve when a shutdown request arrives.
///
/// If every sender is gone no request can ever arrive, so this never
/// resolves rather than being mistaken for one.
async fn wait_for_shutdown(rx: &mut mpsc::Receiver<()>) {
    if rx.recv().await.is_none() {
        std::future::pending::<()>().await;
    }
}
