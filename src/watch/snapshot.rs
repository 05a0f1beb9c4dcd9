// src/watch/snapshot.rs

//! Point-in-time view of a directory tree and the change detector.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, trace};

use crate::fs::FileSystem;
use crate::watch::path_utils::{is_hidden, relative_str};
use crate::watch::patterns::PathFilter;

/// Mapping from file path to last-modification time.
///
/// A snapshot is never mutated after construction; every poll captures a
/// fresh one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: HashMap<PathBuf, SystemTime>,
}

impl Snapshot {
    /// Walk `root` recursively and record the mtime of every regular file.
    ///
    /// - Directories whose name starts with `.` are skipped at every depth,
    ///   together with their whole subtree.
    /// - Entries matched by `filter` are skipped.
    /// - A file whose mtime cannot be read, or a directory that cannot be
    ///   listed, is silently left out. Capture never fails.
    pub fn capture(fs: &dyn FileSystem, root: &Path, filter: &PathFilter) -> Self {
        let mut files = HashMap::new();
        let mut stack = vec![root.to_path_buf()];

        while let Some(dir) = stack.pop() {
            let entries = match fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(dir = ?dir, error = %err, "skipping unreadable directory");
                    continue;
                }
            };

            for path in entries {
                if is_filtered(filter, root, &path) {
                    trace!(path = ?path, "excluded by pattern");
                    continue;
                }

                if fs.is_dir(&path) {
                    if is_hidden(&path) {
                        trace!(path = ?path, "skipping hidden directory");
                    } else {
                        stack.push(path);
                    }
                } else if fs.is_file(&path) {
                    match fs.modified(&path) {
                        Ok(mtime) => {
                            files.insert(path, mtime);
                        }
                        Err(err) => {
                            trace!(path = ?path, error = %err, "omitting file without readable mtime");
                        }
                    }
                }
            }
        }

        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Recorded modification time for `path`, if it is part of the snapshot.
    pub fn modified(&self, path: &Path) -> Option<SystemTime> {
        self.files.get(path).copied()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Detailed comparison against a later snapshot.
    ///
    /// Only used for reporting; the rebuild decision uses [`changed`].
    pub fn diff(&self, current: &Snapshot) -> SnapshotDiff {
        let mut diff = SnapshotDiff::default();

        for (path, mtime) in &current.files {
            match self.files.get(path) {
                None => diff.created.push(path.clone()),
                Some(prev) if prev != mtime => diff.modified.push(path.clone()),
                Some(_) => {}
            }
        }
        for path in self.files.keys() {
            if !current.files.contains_key(path) {
                diff.removed.push(path.clone());
            }
        }

        diff.created.sort();
        diff.modified.sort();
        diff.removed.sort();
        diff
    }
}

impl FromIterator<(PathBuf, SystemTime)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (PathBuf, SystemTime)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

fn is_filtered(filter: &PathFilter, root: &Path, path: &Path) -> bool {
    if filter.is_empty() {
        return false;
    }
    relative_str(root, path)
        .map(|rel| filter.is_excluded(&rel))
        .unwrap_or(false)
}

/// Returns true if anything was created, removed or modified between
/// `previous` and `current`.
///
/// Timestamps are compared exactly; any difference counts.
pub fn changed(previous: &Snapshot, current: &Snapshot) -> bool {
    if previous.files.len() != current.files.len() {
        return true;
    }
    // Same size: any created path implies a removed one, so checking one
    // direction covers all three cases.
    current
        .files
        .iter()
        .any(|(path, mtime)| previous.files.get(path) != Some(mtime))
}

/// Paths that differ between two snapshots, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub created: Vec<PathBuf>,
    pub modified: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.created.len() + self.modified.len() + self.removed.len()
    }
}
