// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::CliArgs;
use crate::errors::{AutobuildError, Result};
use crate::types::ColorMode;

pub const DEFAULT_WATCH_DIR: &str = "game";
pub const DEFAULT_BUILD_SCRIPT: &str = "compile.sh";
pub const DEFAULT_SHELL: &str = "bash";
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Fully resolved settings for one watcher process.
///
/// Paths are absolute (joined onto `base_dir`) but not yet checked for
/// existence; see [`crate::config::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    pub base_dir: PathBuf,
    pub watch_dir: PathBuf,
    pub build_script: PathBuf,
    pub shell: String,
    pub interval: Duration,
    pub exclude: Vec<String>,
    pub color: ColorMode,
}

impl WatchSettings {
    /// Settings for the conventional layout under `base_dir`:
    /// `<base>/game` watched, `<base>/compile.sh` run with `bash` every second.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            watch_dir: base_dir.join(DEFAULT_WATCH_DIR),
            build_script: base_dir.join(DEFAULT_BUILD_SCRIPT),
            base_dir,
            shell: DEFAULT_SHELL.to_string(),
            interval: DEFAULT_INTERVAL,
            exclude: Vec::new(),
            color: ColorMode::default(),
        }
    }

    /// Resolve settings from the command line.
    ///
    /// Without `--base-dir`, relative paths are resolved against the
    /// directory holding the running executable.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let base_dir = match &args.base_dir {
            Some(dir) => dir.clone(),
            None => executable_dir()?,
        };

        Ok(Self {
            watch_dir: base_dir.join(&args.watch_dir),
            build_script: base_dir.join(&args.build_script),
            base_dir,
            shell: args.shell.clone(),
            interval: parse_interval(&args.interval)?,
            exclude: args.exclude.clone(),
            color: args.color,
        })
    }

    /// Working directory for the build script: the watched directory's parent.
    pub fn working_dir(&self) -> PathBuf {
        self.watch_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone())
    }
}

fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| AutobuildError::ExecutableDirUnavailable(e.to_string()))?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        AutobuildError::ExecutableDirUnavailable(format!("{} has no parent", exe.display()))
    })
}

/// Parse a poll interval such as `500ms`, `1s`, `2m` or `1h`.
///
/// Zero is rejected: it would turn the poll loop into a busy loop.
pub fn parse_interval(s: &str) -> Result<Duration> {
    let duration = parse_duration(s).map_err(AutobuildError::InvalidInterval)?;
    if duration.is_zero() {
        return Err(AutobuildError::InvalidInterval(format!(
            "'{}' must be greater than zero",
            s.trim()
        )));
    }
    Ok(duration)
}

fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| format!("duration '{}' is missing a unit suffix", s))?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' is too large", s))
}
