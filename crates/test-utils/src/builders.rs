use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use autobuild::watch::Snapshot;

/// Builder for `Snapshot` to simplify test setup.
///
/// Timestamps are given as seconds after the Unix epoch.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    entries: Vec<(PathBuf, SystemTime)>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(self, path: &str, secs: u64) -> Self {
        self.file_at(path, UNIX_EPOCH + Duration::from_secs(secs))
    }

    pub fn file_at(mut self, path: &str, modified: SystemTime) -> Self {
        self.entries.push((PathBuf::from(path), modified));
        self
    }

    pub fn build(self) -> Snapshot {
        self.entries.into_iter().collect()
    }
}
