// src/watch/patterns.rs

use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{AutobuildError, Result};

/// Compiled `--exclude` glob patterns.
///
/// The patterns are relative to the watched directory. The snapshotter passes
/// relative paths with forward slashes (e.g. `"assets/tmp/x.png"`) into
/// [`PathFilter::is_excluded`], for files as well as for directories (an
/// excluded directory is pruned together with its subtree).
///
/// An empty filter excludes nothing.
#[derive(Clone, Default)]
pub struct PathFilter {
    patterns: Vec<String>,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathFilter")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl PathFilter {
    /// Compile the given exclude patterns.
    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }

        Ok(Self {
            patterns: patterns.to_vec(),
            exclude_set: Some(build_globset(patterns)?),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.exclude_set.is_none()
    }

    /// Returns true if the given path (relative to the watched directory)
    /// should be left out of snapshots.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        match &self.exclude_set {
            Some(set) => set.is_match(rel_path),
            None => false,
        }
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .map_err(|e| AutobuildError::InvalidPattern(format!("{pat}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| AutobuildError::InvalidPattern(e.to_string()))
}
