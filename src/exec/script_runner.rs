// src/exec/script_runner.rs

//! Runs the build script as a child process.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::engine::BuildOutcome;
use crate::errors::{AutobuildError, Result};
use crate::exec::process_group::GroupKillGuard;
use crate::exec::BuildRunner;
use crate::fs::FileSystem;

/// Runs `<shell> <script>` in a fixed working directory.
///
/// The child's stdin/stdout/stderr are inherited, so build output appears
/// directly in the watcher's terminal. On Unix the child leads its own
/// process group (see [`crate::exec::process_group`]).
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    fs: Arc<dyn FileSystem>,
    shell: String,
    script: PathBuf,
    working_dir: PathBuf,
}

impl ScriptRunner {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        shell: impl Into<String>,
        script: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            shell: shell.into(),
            script: script.into(),
            working_dir: working_dir.into(),
        }
    }

    async fn run(&self) -> Result<BuildOutcome> {
        // Checked on every invocation: the script may have been deleted
        // since startup.
        if !self.fs.is_file(&self.script) {
            return Err(AutobuildError::BuildScriptMissing(self.script.clone()));
        }

        info!(
            shell = %self.shell,
            script = ?self.script,
            cwd = ?self.working_dir,
            "starting build process"
        );

        let mut cmd = Command::new(&self.shell);
        cmd.arg(&self.script)
            .current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                warn!(shell = %self.shell, error = %err, "failed to spawn build process");
                return Ok(BuildOutcome::LaunchFailed(format!(
                    "{}: {}",
                    self.shell, err
                )));
            }
        };

        // Dropping this future (shutdown during a build) kills the whole
        // group: the interpreter and every command the script started.
        let mut group = GroupKillGuard::new(child.id());

        let status = match child.wait().await {
            Ok(status) => {
                group.disarm();
                status
            }
            Err(err) => {
                warn!(error = %err, "failed waiting for build process");
                return Ok(BuildOutcome::LaunchFailed(err.to_string()));
            }
        };

        let code = status.code().unwrap_or(-1);
        info!(exit_code = code, success = status.success(), "build process exited");

        if status.success() {
            Ok(BuildOutcome::Success)
        } else {
            debug!(?status, "build reported failure");
            Ok(BuildOutcome::Failed(code))
        }
    }
}

impl BuildRunner for ScriptRunner {
    fn run_build(&mut self) -> Pin<Box<dyn Future<Output = Result<BuildOutcome>> + Send + '_>> {
        Box::pin(self.run())
    }
}
