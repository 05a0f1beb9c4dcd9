// src/watch/mod.rs

//! Change detection by polling.
//!
//! This module is responsible for:
//! - Capturing [`Snapshot`]s (path -> mtime) of the watched directory.
//! - Deciding whether two snapshots differ ([`changed`]).
//! - Compiling `--exclude` glob patterns.
//!
//! It does **not** know about builds or timing; the engine decides when to
//! capture and what to do with the result.

pub mod path_utils;
pub mod patterns;
pub mod snapshot;

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

pub use patterns::PathFilter;
pub use snapshot::{changed, Snapshot, SnapshotDiff};

use crate::fs::FileSystem;

/// Something the runtime can ask for a fresh snapshot.
///
/// Production code uses [`DirectorySource`]; tests can hand out scripted
/// snapshots instead of touching the filesystem.
pub trait SnapshotSource: Send {
    fn capture(&mut self) -> Snapshot;
}

/// Captures snapshots of a directory tree through a [`FileSystem`].
#[derive(Debug, Clone)]
pub struct DirectorySource {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    filter: PathFilter,
}

impl DirectorySource {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, filter: PathFilter) -> Self {
        Self {
            fs,
            root: root.into(),
            filter,
        }
    }
}

impl SnapshotSource for DirectorySource {
    fn capture(&mut self) -> Snapshot {
        Snapshot::capture(self.fs.as_ref(), &self.root, &self.filter)
    }
}
