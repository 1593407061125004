//! # Command Execution Module / 命令执行模块
//!
//! Runs external tools (compiler, console engine, browser harness) as child
//! processes, capturing their combined output and classifying how they ended.
//!
//! 以子进程方式运行外部工具（编译器、控制台引擎、浏览器启动工具），
//! 捕获其合并输出并对其结束方式进行分类。

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

use crate::core::models::{ExitOutcome, Invocation};

/// The capability of running one external command to completion.
/// The pipeline only talks to external tools through this trait.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation, timeout: Option<Duration>) -> impl Future<Output = ExitOutcome>;
}

/// Runs commands as real child processes inside a working directory.
/// 在工作目录中以真实子进程运行命令。
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    working_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl CommandRunner for ProcessRunner {
    /// Runs `invocation` to completion or until `timeout` elapses.
    ///
    /// On timeout only the direct child is killed. Processes it started
    /// itself (such as the browser behind `emrun`) are not reaped, and output
    /// they write after the kill is not captured.
    async fn run(&self, invocation: &Invocation, timeout: Option<Duration>) -> ExitOutcome {
        tracing::debug!(command = %invocation, dir = %self.working_dir.display(), "spawning");

        let mut cmd = tokio::process::Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .kill_on_drop(true)
            .current_dir(&self.working_dir);

        let mut child = match spawn_piped(&mut cmd) {
            Ok(child) => child,
            Err(e) => return classify(Err(e), String::new()),
        };
        let output = Arc::new(Mutex::new(String::new()));
        let readers = attach_readers(&mut child, &output);

        let status = match timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    if let Err(e) = child.kill().await {
                        tracing::warn!(command = %invocation, error = %e, "failed to kill timed-out process");
                    }
                    drain_readers(readers, Some(DRAIN_GRACE)).await;
                    let output = output.lock().await.clone();
                    return ExitOutcome::TimedOut { limit, output };
                }
            },
            None => child.wait().await,
        };

        drain_readers(readers, None).await;
        let output = output.lock().await.clone();
        classify(status, output)
    }
}

/// How long the output readers may keep draining after a timed-out process
/// was killed. A pipe still held open by a grandchild would otherwise block
/// forever.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Maps a process status and its output to an [`ExitOutcome`].
pub fn classify(status: std::io::Result<ExitStatus>, output: String) -> ExitOutcome {
    match status {
        Ok(status) if status.success() => ExitOutcome::Success { output },
        Ok(status) => ExitOutcome::Failed {
            code: status.code(),
            output,
        },
        Err(e) => ExitOutcome::LaunchError {
            message: e.to_string(),
        },
    }
}

/// Spawns a command, captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined stdout and stderr as a `String`.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<ExitStatus>, String) {
    let mut child = match spawn_piped(&mut cmd) {
        Ok(child) => child,
        // If spawning fails, we return the error and an empty string for the output.
        // 如果派生失败，我们返回错误和空字符串作为输出。
        Err(e) => return (Err(e), String::new()),
    };

    let output = Arc::new(Mutex::new(String::new()));
    let readers = attach_readers(&mut child, &output);
    let status = child.wait().await;
    drain_readers(readers, None).await;

    let output = output.lock().await.clone();
    (status, output)
}

fn spawn_piped(cmd: &mut tokio::process::Command) -> std::io::Result<Child> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
}

/// Starts one reader task per captured stream, all appending to `output`.
fn attach_readers(child: &mut Child, output: &Arc<Mutex<String>>) -> Vec<JoinHandle<()>> {
    let stdout = child
        .stdout
        .take()
        .map(|stdout| tokio::spawn(collect_output(stdout, Arc::clone(output))));
    let stderr = child
        .stderr
        .take()
        .map(|stderr| tokio::spawn(collect_output(stderr, Arc::clone(output))));
    [stdout, stderr].into_iter().flatten().collect()
}

/// Waits for the readers so no trailing output is lost, at most `grace` when
/// given; readers still running after that are aborted.
/// 等待读取任务完成，以确保所有输出都被捕获。
async fn drain_readers(readers: Vec<JoinHandle<()>>, grace: Option<Duration>) {
    let aborts: Vec<AbortHandle> = readers.iter().map(JoinHandle::abort_handle).collect();
    let join_all = async move {
        for handle in readers {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "failed to join output reader");
                }
            }
        }
    };

    match grace {
        Some(limit) => {
            if tokio::time::timeout(limit, join_all).await.is_err() {
                tracing::debug!("output pipes still open after kill, abandoning readers");
                aborts.iter().for_each(AbortHandle::abort);
            }
        }
        None => join_all.await,
    }
}

/// Copies a stream into `sink` until end of file.
///
/// Bytes are read raw and converted lossily, so invalid UTF-8 never stops the
/// draining; a closed pipe would make the child die of SIGPIPE.
async fn collect_output<R>(stream: R, sink: Arc<Mutex<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => sink.lock().await.push_str(&String::from_utf8_lossy(&buf)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read child output");
                break;
            }
        }
    }
}
