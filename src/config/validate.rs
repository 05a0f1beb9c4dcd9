// src/config/validate.rs

use std::path::PathBuf;

use tracing::debug;

use crate::config::model::WatchSettings;
use crate::errors::{AutobuildError, Result};
use crate::fs::FileSystem;

/// Check that the watch directory and build script exist.
///
/// Returns the settings with `watch_dir` canonicalized, so every snapshot key
/// is an absolute path without `..` or symlinked prefixes.
pub fn validate(fs: &dyn FileSystem, settings: WatchSettings) -> Result<WatchSettings> {
    let mut settings = settings;

    settings.watch_dir = resolve_watch_dir(fs, &settings)?;
    debug!(watch_dir = ?settings.watch_dir, "resolved watch directory");

    ensure_build_script(fs, &settings)?;

    Ok(settings)
}

fn resolve_watch_dir(fs: &dyn FileSystem, settings: &WatchSettings) -> Result<PathBuf> {
    if !fs.exists(&settings.watch_dir) {
        return Err(AutobuildError::WatchDirMissing(settings.watch_dir.clone()));
    }
    // Canonicalize first so a symlinked watch root is accepted.
    let canonical = fs.canonicalize(&settings.watch_dir)?;
    if !fs.is_dir(&canonical) {
        return Err(AutobuildError::WatchDirNotADirectory(
            settings.watch_dir.clone(),
        ));
    }
    Ok(canonical)
}

fn ensure_build_script(fs: &dyn FileSystem, settings: &WatchSettings) -> Result<()> {
    if !fs.is_file(&settings.build_script) {
        return Err(AutobuildError::BuildScriptMissing(
            settings.build_script.clone(),
        ));
    }
    Ok(())
}
