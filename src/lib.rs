// src/lib.rs

pub mod cli;
pub mod config;
pub mod console;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::WatchSettings;
use crate::console::Console;
use crate::engine::{Runtime, RuntimeOptions, WatchCore};
use crate::errors::{AutobuildError, Result};
use crate::exec::ScriptRunner;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{DirectorySource, PathFilter, SnapshotSource};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings resolution and startup checks
/// - the snapshot source and build runner
/// - the watch loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let settings = config::validate(fs.as_ref(), WatchSettings::from_args(&args)?)?;
    let filter = PathFilter::new(&settings.exclude)?;
    let mut source = DirectorySource::new(Arc::clone(&fs), settings.watch_dir.clone(), filter);

    if args.dry_run {
        print_dry_run(&settings, &mut source);
        return Ok(());
    }

    let runner = ScriptRunner::new(
        Arc::clone(&fs),
        settings.shell.clone(),
        settings.build_script.clone(),
        settings.working_dir(),
    );

    let mut console = Console::stdout(settings.color);
    console.watching(&settings.watch_dir);
    if !args.once {
        console.stop_hint();
    }

    // Ctrl-C → graceful shutdown.
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            // Keep the sender alive; a closed channel is not a shutdown.
            std::future::pending::<()>().await;
        }
        let _ = shutdown_tx.send(()).await;
    });

    let options = RuntimeOptions {
        exit_after_initial_build: args.once,
    };

    let core = WatchCore::new(options);
    let runtime = Runtime::new(core, runner, source, settings.interval, shutdown_rx, console);
    let stats = runtime.run().await?;

    info!(?stats, "autobuild finished");

    if args.once && stats.failed > 0 {
        return Err(AutobuildError::BuildFailed(format!(
            "{} did not succeed",
            settings.build_script.display()
        )));
    }

    Ok(())
}

/// Dry-run output: resolved settings plus what a snapshot would track.
fn print_dry_run(settings: &WatchSettings, source: &mut DirectorySource) {
    let snapshot = source.capture();

    println!("autobuild dry-run");
    println!("  watch_dir    = {}", settings.watch_dir.display());
    println!("  build_script = {}", settings.build_script.display());
    println!("  shell        = {}", settings.shell);
    println!("  working_dir  = {}", settings.working_dir().display());
    println!("  interval     = {:?}", settings.interval);
    if !settings.exclude.is_empty() {
        println!("  exclude      = {:?}", settings.exclude);
    }
    println!();
    println!("tracked files: {}", snapshot.len());

    debug!("dry-run complete (no build)");
}
