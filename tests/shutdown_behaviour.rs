// tests/shutdown_behaviour.rs

mod common;
use crate::common::{init_tracing, spawn_runtime, POLL};

use std::error::Error;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use autobuild::engine::RuntimeOptions;
use autobuild::errors::AutobuildError;
use autobuild::exec::ScriptRunner;
use autobuild::fs::mock::MockFileSystem;
use autobuild_test_utils::fake_runner::{FakeRunner, HangingRunner};
use autobuild_test_utils::scripted_source::ScriptedSnapshots;
use autobuild_test_utils::wait_until;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn shutdown_while_idle_stops_cleanly() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new();
    let source = ScriptedSnapshots::unchanging();
    let harness = spawn_runtime(runner.clone(), source.clone(), RuntimeOptions::default());

    wait_until(|| source.captures() >= 2).await;
    let output = harness.output.clone();
    let stats = harness.stop().await?;

    assert_eq!(stats.started, 1);
    assert!(output.contents().contains("Stopping file watcher"));

    // Nothing keeps running after the loop returned.
    let captures = source.captures();
    tokio::time::sleep(POLL * 4).await;
    assert_eq!(source.captures(), captures);
    assert_eq!(runner.builds(), 1);
    Ok(())
}

#[tokio::test]
async fn shutdown_during_build_aborts_it() -> TestResult {
    init_tracing();

    let runner = HangingRunner::new();
    let source = ScriptedSnapshots::unchanging();
    let harness = spawn_runtime(runner.clone(), source.clone(), RuntimeOptions::default());

    wait_until(|| runner.builds() == 1).await;
    let output = harness.output.clone();
    let stats = harness.stop().await?;

    // The in-flight build was dropped, not awaited to completion.
    assert_eq!(runner.dropped(), 1);
    assert_eq!(stats.started, 1);
    assert_eq!(stats.succeeded + stats.failed, 0);
    // No baseline was captured and no other build started.
    assert_eq!(source.captures(), 0);
    assert_eq!(runner.builds(), 1);
    assert!(output.contents().contains("Stopping file watcher"));
    Ok(())
}

#[tokio::test]
async fn build_script_vanishing_is_fatal() -> TestResult {
    init_tracing();

    // The mock filesystem has no build script at all.
    let fs = Arc::new(MockFileSystem::new());
    fs.add_file("/proj/game/a.js", UNIX_EPOCH);
    let runner = ScriptRunner::new(fs, "sh", "/proj/compile.sh", "/proj");
    let source = ScriptedSnapshots::unchanging();
    let harness = spawn_runtime(runner, source, RuntimeOptions::default());

    match harness.join().await {
        Err(AutobuildError::BuildScriptMissing(path)) => {
            assert!(path.ends_with("compile.sh"));
        }
        other => panic!("Expected BuildScriptMissing, got: {:?}", other),
    }
    Ok(())
}

/// Live (non-zombie) processes whose process group is `pgid`.
#[cfg(target_os = "linux")]
fn live_group_members(pgid: u32) -> Vec<u32> {
    let Ok(entries) = std::fs::read_dir("/proc") else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().to_str()?.parse::<u32>().ok())
        .filter(|pid| {
            let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
                return false;
            };
            // "<pid> (<comm>) <state> <ppid> <pgrp> ..."; comm may contain spaces.
            let Some((_, rest)) = stat.rsplit_once(')') else {
                return false;
            };
            let fields: Vec<&str> = rest.split_whitespace().collect();
            matches!(fields.as_slice(), [state, _ppid, pgrp, ..]
                if *state != "Z" && pgrp.parse::<u32>().ok() == Some(pgid))
        })
        .collect()
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn shutdown_kills_every_process_the_build_started() -> TestResult {
    use autobuild::fs::RealFileSystem;
    use std::time::{Duration, Instant};

    init_tracing();

    let dir = tempfile::tempdir()?;
    let script = dir.path().join("compile.sh");
    let pid_file = dir.path().join("build.pid");
    // No `exec`: the shell stays alive with `sleep` as its child.
    std::fs::write(
        &script,
        "echo $$ > build.pid\nsleep 30\necho finished > after.txt\n",
    )?;

    let runner = ScriptRunner::new(Arc::new(RealFileSystem), "sh", &script, dir.path());
    let source = ScriptedSnapshots::unchanging();
    let harness = spawn_runtime(runner, source.clone(), RuntimeOptions::default());

    let read_pgid = || {
        std::fs::read_to_string(&pid_file)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
    };
    wait_until(|| read_pgid().is_some()).await;
    let pgid = read_pgid().expect("build wrote its pid");
    // Shell and `sleep` are both running.
    wait_until(|| live_group_members(pgid).len() >= 2).await;

    let started = Instant::now();
    let stats = harness.stop().await?;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(stats.started, 1);
    assert_eq!(stats.succeeded + stats.failed, 0);
    assert_eq!(source.captures(), 0);

    wait_until(|| live_group_members(pgid).is_empty()).await;
    assert!(!dir.path().join("after.txt").exists());
    Ok(())
}
