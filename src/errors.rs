// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutobuildError {
    #[error("watch directory not found: {}", .0.display())]
    WatchDirMissing(PathBuf),

    #[error("watch path is not a directory: {}", .0.display())]
    WatchDirNotADirectory(PathBuf),

    #[error("build script not found: {}", .0.display())]
    BuildScriptMissing(PathBuf),

    #[error("invalid poll interval: {0}")]
    InvalidInterval(String),

    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(String),

    #[error("could not locate the executable's directory: {0}")]
    ExecutableDirUnavailable(String),

    #[error("build failed: {0}")]
    BuildFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AutobuildError>;
