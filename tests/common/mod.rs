#![allow(dead_code)]

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use autobuild::console::Console;
use autobuild::engine::{Runtime, RuntimeOptions, WatchCore, WatchStats};
use autobuild::errors::Result;
use autobuild::exec::BuildRunner;
use autobuild::watch::SnapshotSource;
use autobuild_test_utils::buffer::SharedBuffer;
use autobuild_test_utils::with_timeout;

pub use autobuild_test_utils::init_tracing;

/// Poll interval used by runtime tests.
pub const POLL: Duration = Duration::from_millis(5);

/// A watch loop running on a background task, plus handles to steer it.
pub struct Harness {
    pub shutdown_tx: mpsc::Sender<()>,
    pub output: SharedBuffer,
    pub handle: JoinHandle<Result<WatchStats>>,
}

impl Harness {
    /// Request shutdown and wait for the loop to finish.
    pub async fn stop(self) -> Result<WatchStats> {
        self.shutdown_tx
            .send(())
            .await
            .expect("runtime dropped its shutdown receiver");
        self.join().await
    }

    /// Wait for the loop to finish on its own.
    pub async fn join(self) -> Result<WatchStats> {
        with_timeout(self.handle)
            .await
            .expect("runtime task panicked")
    }
}

/// Spawn a runtime with plain (uncolored) console output captured in memory.
pub fn spawn_runtime<R, S>(runner: R, source: S, options: RuntimeOptions) -> Harness
where
    R: BuildRunner + 'static,
    S: SnapshotSource + 'static,
{
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let output = SharedBuffer::new();
    let console = Console::new(Box::new(output.clone()), false);

    let runtime = Runtime::new(
        WatchCore::new(options),
        runner,
        source,
        POLL,
        shutdown_rx,
        console,
    );

    Harness {
        shutdown_tx,
        output,
        handle: tokio::spawn(runtime.run()),
    }
}
