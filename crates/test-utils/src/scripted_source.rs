use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use autobuild::watch::{Snapshot, SnapshotSource};

/// Snapshot source that hands out a fixed sequence of snapshots.
///
/// Once the sequence is exhausted the last snapshot is repeated, i.e. the
/// directory "stops changing".
#[derive(Debug, Clone, Default)]
pub struct ScriptedSnapshots {
    queue: Arc<Mutex<VecDeque<Snapshot>>>,
    last: Arc<Mutex<Snapshot>>,
    captures: Arc<AtomicUsize>,
}

impl ScriptedSnapshots {
    pub fn new(snapshots: impl IntoIterator<Item = Snapshot>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(snapshots.into_iter().collect())),
            last: Arc::new(Mutex::new(Snapshot::default())),
            captures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A directory that never changes (every capture is empty).
    pub fn unchanging() -> Self {
        Self::new(Vec::new())
    }

    /// Number of captures so far (shared across clones).
    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

impl SnapshotSource for ScriptedSnapshots {
    fn capture(&mut self) -> Snapshot {
        self.captures.fetch_add(1, Ordering::SeqCst);
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.queue.lock().unwrap().pop_front() {
            *last = next;
        }
        last.clone()
    }
}
