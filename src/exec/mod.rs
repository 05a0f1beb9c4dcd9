// src/exec/mod.rs

//! Build execution layer.
//!
//! - [`backend`] provides the `BuildRunner` trait the runtime depends on.
//! - [`process_group`] kills a cancelled build together with its children.
//! - [`script_runner`] is the production runner: it runs the build script
//!   with `tokio::process::Command` and maps the exit status to a
//!   [`BuildOutcome`](crate::engine::BuildOutcome).

pub mod backend;
pub mod process_group;
pub mod script_runner;

pub use backend::BuildRunner;
pub use script_runner::ScriptRunner;
