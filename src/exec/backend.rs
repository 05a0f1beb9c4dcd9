// src/exec/backend.rs

//! Pluggable build runner abstraction.
//!
//! The runtime talks to a `BuildRunner` instead of spawning processes
//! itself. Production code uses [`ScriptRunner`](super::ScriptRunner); tests
//! provide runners that record invocations and return scripted outcomes, or
//! that never finish (to exercise shutdown during a build).

use std::future::Future;
use std::pin::Pin;

use crate::engine::BuildOutcome;
use crate::errors::Result;

/// Trait abstracting how the build command is run.
///
/// The returned future resolves when the build has fully finished. Dropping
/// it before then must abort the build (the real runner kills the script's
/// whole process group).
///
/// - `Ok(outcome)` covers success, non-zero exit, and failure to launch;
///   none of these stop the watcher.
/// - `Err(_)` is fatal (e.g. the build script disappeared).
pub trait BuildRunner: Send {
    fn run_build(&mut self) -> Pin<Box<dyn Future<Output = Result<BuildOutcome>> + Send + '_>>;
}
