#![cfg(unix)]

mod common;
use crate::common::builders::{ProcessBuilder, fast_settings, tree_of};
use crate::common::{init_tracing, wait_until, with_timeout};

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use procmgr::config::SupervisorSettings;
use procmgr::engine::Supervisor;
use procmgr::errors::SupervisorError;

type TestResult = Result<(), Box<dyn Error>>;

fn dir_str(dir: &TempDir) -> &str {
    dir.path().to_str().expect("temp dir path is utf-8")
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

#[tokio::test]
async fn chain_of_real_processes_runs_in_order() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let wd = dir_str(&dir);

    let tree = tree_of(vec![
        ProcessBuilder::new("A", r#"sh -c "echo A >> order.log""#).work_dir(wd).build(),
        ProcessBuilder::new("B", r#"sh -c "echo B >> order.log""#)
            .after("A")
            .work_dir(wd)
            .build(),
        ProcessBuilder::new("C", r#"sh -c "echo C >> order.log""#)
            .after("B")
            .work_dir(wd)
            .build(),
    ]);

    let sup = Supervisor::with_real_backend(tree, fast_settings());
    with_timeout(sup.start_processes(CancellationToken::new())).await?;

    assert_eq!(fs::read_to_string(dir.path().join("order.log"))?, "A\nB\nC\n");
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_reported_and_dependents_never_start() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let wd = dir_str(&dir);

    let tree = tree_of(vec![
        ProcessBuilder::new("fails", r#"sh -c "exit 3""#).work_dir(wd).build(),
        ProcessBuilder::new("never", "touch never.txt")
            .after("fails")
            .work_dir(wd)
            .build(),
    ]);

    let sup = Supervisor::with_real_backend(tree, fast_settings());
    let err = with_timeout(sup.start_processes(CancellationToken::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, SupervisorError::ProcessExit { code: 3, .. }));
    assert!(!dir.path().join("never.txt").exists());
    Ok(())
}

#[tokio::test]
async fn unresolvable_command_fails_without_launching_dependents() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let wd = dir_str(&dir);

    let tree = tree_of(vec![
        ProcessBuilder::new("ghost", "procmgr-definitely-not-installed --flag")
            .work_dir(wd)
            .build(),
        ProcessBuilder::new("child", "touch child.txt")
            .after("ghost")
            .work_dir(wd)
            .build(),
    ]);

    let sup = Supervisor::with_real_backend(tree, fast_settings());
    let err = with_timeout(sup.start_processes(CancellationToken::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, SupervisorError::ExecutableNotFound { .. }));
    assert!(!dir.path().join("child.txt").exists());
    Ok(())
}

#[tokio::test]
async fn cancel_stops_long_running_process_gracefully() -> TestResult {
    init_tracing();

    let tree = tree_of(vec![
        ProcessBuilder::new("sleeper", "sleep 30").build(),
        ProcessBuilder::new("after-sleeper", "sleep 30").after("sleeper").build(),
    ]);
    let settings = SupervisorSettings {
        grace_period: Duration::from_secs(2),
        restart_delay: Duration::ZERO,
    };
    let sup = Supervisor::with_real_backend(tree, settings);

    let cancel = CancellationToken::new();
    let run = {
        let cancel = cancel.clone();
        tokio::spawn(async move { sup.start_processes(cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    let started = Instant::now();
    cancel.cancel();
    with_timeout(run).await??;

    // Stopped well before `sleep 30` would have ended, and the dependent
    // never got a 30s run of its own.
    assert!(started.elapsed() < Duration::from_secs(5));
    Ok(())
}

#[tokio::test]
async fn process_ignoring_interrupt_is_killed() -> TestResult {
    init_tracing();

    let tree = tree_of(vec![ProcessBuilder::new(
        "stubborn",
        r#"sh -c "trap '' INT; while true; do sleep 0.1; done""#,
    )
    .build()]);
    let settings = SupervisorSettings {
        grace_period: Duration::from_millis(300),
        restart_delay: Duration::ZERO,
    };
    let sup = Supervisor::with_real_backend(tree, settings);

    let cancel = CancellationToken::new();
    let run = {
        let cancel = cancel.clone();
        tokio::spawn(async move { sup.start_processes(cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    let started = Instant::now();
    cancel.cancel();
    with_timeout(run).await??;

    assert!(started.elapsed() >= Duration::from_millis(300));
    Ok(())
}

#[tokio::test]
async fn auto_restart_relaunches_until_cancelled() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let wd = dir_str(&dir);
    let runs = dir.path().join("runs.log");

    let tree = tree_of(vec![ProcessBuilder::new(
        "looper",
        r#"sh -c "echo run >> runs.log; sleep 0.05""#,
    )
    .auto_restart(true)
    .work_dir(wd)
    .build()]);
    let sup = Supervisor::with_real_backend(tree, fast_settings());

    let cancel = CancellationToken::new();
    let run = {
        let cancel = cancel.clone();
        tokio::spawn(async move { sup.start_processes(cancel).await })
    };

    wait_until(|| line_count(&runs) >= 3).await;
    cancel.cancel();
    with_timeout(run).await??;

    let after_stop = line_count(&runs);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(line_count(&runs), after_stop);
    Ok(())
}
