use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use autobuild::engine::BuildOutcome;
use autobuild::errors::Result;
use autobuild::exec::BuildRunner;

/// A fake build runner that:
/// - counts how many builds were started
/// - returns scripted outcomes in order, then `Success` forever.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    builds: Arc<AtomicUsize>,
    outcomes: Arc<Mutex<VecDeque<BuildOutcome>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(outcomes: impl IntoIterator<Item = BuildOutcome>) -> Self {
        Self {
            builds: Arc::new(AtomicUsize::new(0)),
            outcomes: Arc::new(Mutex::new(outcomes.into_iter().collect())),
        }
    }

    /// Number of builds started so far (shared across clones).
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl BuildRunner for FakeRunner {
    fn run_build(&mut self) -> Pin<Box<dyn Future<Output = Result<BuildOutcome>> + Send + '_>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(BuildOutcome::Success);

        Box::pin(async move { Ok(outcome) })
    }
}

/// A build runner whose builds never finish.
///
/// Used to check that shutdown during a build aborts it. `dropped()` tells
/// whether the in-flight build future was dropped (i.e. the build aborted).
#[derive(Debug, Clone, Default)]
pub struct HangingRunner {
    builds: Arc<AtomicUsize>,
    dropped: Arc<AtomicUsize>,
}

impl HangingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }
}

struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl BuildRunner for HangingRunner {
    fn run_build(&mut self) -> Pin<Box<dyn Future<Output = Result<BuildOutcome>> + Send + '_>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let guard = DropCounter(Arc::clone(&self.dropped));

        Box::pin(async move {
            let _guard = guard;
            std::future::pending::<()>().await;
            Ok(BuildOutcome::Success)
        })
    }
}
