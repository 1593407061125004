//! # Command Execution Tests / 命令执行测试
//!
//! Real child processes through `ProcessRunner`: exit classification, output
//! capture, launch errors, time limits and artifact directories.
//!
//! 通过 `ProcessRunner` 运行真实子进程：退出分类、输出捕获、启动错误、
//! 时间限制以及产物目录。

#![cfg(unix)]

use std::fs;
use std::io;
use std::time::{Duration, Instant};
use tempfile::tempdir;

use em_matrix_runner::infra::command::{CommandRunner, ProcessRunner, classify, spawn_and_capture};
use em_matrix_runner::infra::fs::{ArtifactDir, remove_stale};
use em_matrix_runner::models::{ExitOutcome, Invocation};

fn sh(script: &str) -> Invocation {
    Invocation::new("sh").arg("-c").arg(script)
}

#[tokio::test]
async fn test_zero_exit_is_success() {
    let dir = tempdir().unwrap();
    let runner = ProcessRunner::new(dir.path());
    assert!(runner.run(&Invocation::new("true"), None).await.is_success());
}

#[tokio::test]
async fn test_non_zero_exit_keeps_code_and_output() {
    let dir = tempdir().unwrap();
    let runner = ProcessRunner::new(dir.path());

    let outcome = runner.run(&sh("echo out; echo err >&2; exit 3"), None).await;
    match outcome {
        ExitOutcome::Failed { code, output } => {
            assert_eq!(code, Some(3));
            assert!(output.contains("out"));
            assert!(output.contains("err"));
        }
        other => panic!("expected a failed exit, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_executable_is_a_launch_error() {
    let dir = tempdir().unwrap();
    let runner = ProcessRunner::new(dir.path());

    let outcome = runner
        .run(&Invocation::new("em-matrix-no-such-tool-4711"), None)
        .await;
    assert!(matches!(outcome, ExitOutcome::LaunchError { .. }));
    assert_eq!(outcome.output(), "");
}

#[tokio::test]
async fn test_slow_process_times_out() {
    let dir = tempdir().unwrap();
    let runner = ProcessRunner::new(dir.path());

    let outcome = runner
        .run(&Invocation::new("sleep").arg("5"), Some(Duration::from_millis(200)))
        .await;
    match outcome {
        ExitOutcome::TimedOut { limit, .. } => assert_eq!(limit, Duration::from_millis(200)),
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_utf8_output_does_not_break_capture() {
    let dir = tempdir().unwrap();
    let runner = ProcessRunner::new(dir.path());

    let outcome = runner
        .run(&sh("printf 'x\\377\\n'; sleep 0.3; echo done; exit 0"), None)
        .await;
    assert!(outcome.is_success(), "got {outcome:?}");
    assert!(outcome.output().contains("done"));

    let outcome = runner.run(&sh("printf 'before\\n\\377\\nafter\\n'"), None).await;
    assert!(outcome.is_success(), "got {outcome:?}");
    assert!(outcome.output().contains("before\n"));
    assert!(outcome.output().contains("after\n"));
    assert!(outcome.output().contains('\u{FFFD}'));
}

#[tokio::test]
async fn test_timeout_keeps_output_printed_so_far() {
    let dir = tempdir().unwrap();
    let runner = ProcessRunner::new(dir.path());

    let outcome = runner
        .run(&sh("echo started; sleep 5"), Some(Duration::from_secs(1)))
        .await;
    match outcome {
        ExitOutcome::TimedOut { limit, output } => {
            assert_eq!(limit, Duration::from_secs(1));
            assert!(output.contains("started"));
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_returns_while_a_grandchild_holds_the_pipes() {
    let dir = tempdir().unwrap();
    let runner = ProcessRunner::new(dir.path());

    let start = Instant::now();
    let outcome = runner
        .run(&sh("sleep 4 & echo started; sleep 5"), Some(Duration::from_millis(300)))
        .await;

    assert!(start.elapsed() < Duration::from_secs(3));
    match outcome {
        ExitOutcome::TimedOut { output, .. } => assert!(output.contains("started")),
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fast_process_beats_its_time_limit() {
    let dir = tempdir().unwrap();
    let runner = ProcessRunner::new(dir.path());
    let outcome = runner
        .run(&sh("echo done"), Some(Duration::from_secs(10)))
        .await;
    assert_eq!(
        outcome,
        ExitOutcome::Success {
            output: "done\n".to_string()
        }
    );
}

#[tokio::test]
async fn test_runs_inside_the_working_directory() {
    let dir = tempdir().unwrap();
    let runner = ProcessRunner::new(dir.path());
    assert_eq!(runner.working_dir(), dir.path());

    let outcome = runner.run(&Invocation::new("pwd").arg("-P"), None).await;
    let reported = outcome.output().trim().to_string();
    assert_eq!(
        fs::canonicalize(reported).unwrap(),
        fs::canonicalize(dir.path()).unwrap()
    );
}

#[tokio::test]
async fn test_spawn_and_capture_collects_both_streams() {
    let mut cmd = tokio::process::Command::new("sh");
    cmd.arg("-c").arg("echo one; echo two >&2");
    let (status, output) = spawn_and_capture(cmd).await;

    assert!(status.unwrap().success());
    assert!(output.contains("one\n"));
    assert!(output.contains("two\n"));
}

#[test]
fn test_classify_spawn_error() {
    let outcome = classify(
        Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
        String::new(),
    );
    assert_eq!(
        outcome,
        ExitOutcome::LaunchError {
            message: "no such file".to_string()
        }
    );
}

#[test]
fn test_temporary_artifact_dir_is_cleaned_up() {
    let base = tempdir().unwrap();
    let artifacts = ArtifactDir::prepare(None, base.path()).unwrap();
    let path = artifacts.path().to_path_buf();
    assert!(path.is_dir());

    drop(artifacts);
    assert!(!path.exists());
}

#[test]
fn test_configured_artifact_dir_is_created_and_kept() {
    let base = tempdir().unwrap();
    let artifacts = ArtifactDir::prepare(Some(std::path::Path::new("build/em")), base.path()).unwrap();
    let path = artifacts.path().to_path_buf();

    assert!(path.is_dir());
    assert!(path.ends_with("build/em"));
    drop(artifacts);
    assert!(path.is_dir());
}

#[test]
fn test_remove_stale() {
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("a.js");

    remove_stale(&artifact).unwrap();
    fs::write(&artifact, "old").unwrap();
    remove_stale(&artifact).unwrap();
    assert!(!artifact.exists());
}
