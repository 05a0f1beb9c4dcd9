// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every flag is optional: a bare `autobuild` watches `game/` next to the
//! executable and runs `compile.sh` from the same place.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::ColorMode;

/// Command-line arguments for `autobuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "autobuild",
    version,
    about = "Re-run a build script whenever files in a directory change.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory that relative paths are resolved against.
    ///
    /// Default: the directory containing the `autobuild` executable.
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Directory to watch (relative to the base directory).
    #[arg(long, value_name = "DIR", default_value = "game")]
    pub watch_dir: PathBuf,

    /// Build script to run on changes (relative to the base directory).
    #[arg(long, value_name = "PATH", default_value = "compile.sh")]
    pub build_script: PathBuf,

    /// Interpreter used to run the build script.
    #[arg(long, value_name = "PROGRAM", default_value = "bash")]
    pub shell: String,

    /// Poll interval, e.g. `500ms`, `1s`, `2m`.
    #[arg(long, value_name = "DURATION", default_value = "1s")]
    pub interval: String,

    /// Glob (relative to the watch directory) for files to ignore.
    /// May be given multiple times.
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Run the build once and exit with its status, no watching.
    #[arg(long)]
    pub once: bool,

    /// Validate the setup and print what would be watched, without building.
    #[arg(long)]
    pub dry_run: bool,

    /// When to color status output.
    #[arg(long, value_enum, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `AUTOBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
