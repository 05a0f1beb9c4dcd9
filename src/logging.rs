// src/logging.rs

//! Diagnostic logging.
//!
//! autobuild has two output channels. Stdout belongs to the person watching
//! the build: the emoji status lines from [`crate::console`] and whatever the
//! build script prints. Stderr carries `tracing` diagnostics about the
//! watcher itself (skipped entries, poll decisions, process lifecycle).
//!
//! Diagnostics are quiet by default (`warn`), since the status lines already
//! narrate a normal session. `--log-level` wins over `AUTOBUILD_LOG`.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

const LOG_ENV: &str = "AUTOBUILD_LOG";
const DEFAULT_LEVEL: Level = Level::WARN;

/// Install the global stderr subscriber. Call once, before the watcher starts.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_level = std::env::var(LOG_ENV).ok();
    let level = resolve_level(cli_level, env_level.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Pick the effective level: flag, then environment, then the default.
/// An unrecognised environment value falls back to the default.
fn resolve_level(cli_level: Option<LogLevel>, env_level: Option<&str>) -> Level {
    cli_level
        .map(Level::from)
        .or_else(|| env_level.and_then(parse_level_str))
        .unwrap_or(DEFAULT_LEVEL)
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
