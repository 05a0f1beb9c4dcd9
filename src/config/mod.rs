// src/config/mod.rs

//! Runtime settings.
//!
//! There is no configuration file: everything comes from the command line
//! (see [`crate::cli`]), with conventional defaults for a project laid out as
//! `<base>/game` + `<base>/compile.sh`.
//!
//! - [`model`] resolves CLI arguments into [`WatchSettings`].
//! - [`validate`] performs the startup checks (watch dir and script exist).

pub mod model;
pub mod validate;

pub use model::{parse_interval, WatchSettings};
pub use validate::validate;
