//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures flowing through the pipeline:
//! invocations, the outcome of external processes, per-invocation results and
//! the derived report.
//!
//! 此模块定义了流经流水线的数据结构：调用命令、外部进程的结果、
//! 每次调用的结果以及派生的报告。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::directives::RunMode;
use crate::core::matrix::Configuration;
use crate::infra::t;

/// A fully materialized external command.
/// 一个完全展开的外部命令。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program followed by its arguments.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }

    /// The command line as it would be typed in a shell.
    pub fn command_line(&self) -> String {
        shlex::try_join(self.tokens()).unwrap_or_else(|_| self.tokens().collect::<Vec<_>>().join(" "))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// How an external process ended.
/// 外部进程的结束方式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exit status zero.
    Success { output: String },
    /// Non-zero exit status. `code` is `None` when the process was killed by a signal.
    Failed { code: Option<i32>, output: String },
    /// The process could not be started at all.
    LaunchError { message: String },
    /// The process outlived its time limit and was killed.
    TimedOut { limit: Duration, output: String },
}

impl ExitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExitOutcome::Success { .. })
    }

    /// Captured stdout and stderr, empty when the process never started.
    pub fn output(&self) -> &str {
        match self {
            ExitOutcome::Success { output }
            | ExitOutcome::Failed { output, .. }
            | ExitOutcome::TimedOut { output, .. } => output,
            ExitOutcome::LaunchError { .. } => "",
        }
    }

    /// Classifies a non-successful outcome. Returns `None` for success.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            ExitOutcome::Success { .. } => None,
            ExitOutcome::Failed { code, .. } => Some(FailureReason::ExitStatus(*code)),
            ExitOutcome::LaunchError { message } => Some(FailureReason::Launch(message.clone())),
            ExitOutcome::TimedOut { limit, .. } => Some(FailureReason::Timeout(limit.as_secs())),
        }
    }
}

/// The pipeline step a failure happened in.
/// 失败发生的流水线阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// The compiler failed; the runtime was never started.
    /// 编译器失败；运行时从未启动。
    Compile,
    /// The artifact compiled but the runtime failed.
    /// 产物编译成功，但运行时失败。
    Execution,
}

/// Why a stage failed.
/// 阶段失败的原因。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Non-zero exit status (`None` when terminated by a signal).
    ExitStatus(Option<i32>),
    /// The executable could not be launched.
    Launch(String),
    /// Killed after exceeding the limit, in seconds.
    Timeout(u64),
}

impl FailureReason {
    pub fn describe(&self, locale: &str) -> String {
        match self {
            FailureReason::ExitStatus(Some(code)) => {
                t!("reason.exit_status", locale = locale, code = code).to_string()
            }
            FailureReason::ExitStatus(None) => t!("reason.signal", locale = locale).to_string(),
            FailureReason::Launch(message) => {
                t!("reason.launch", locale = locale, message = message).to_string()
            }
            FailureReason::Timeout(secs) => {
                t!("reason.timeout", locale = locale, secs = secs).to_string()
            }
        }
    }
}

/// The outcome of one (configuration, test) invocation. Never mutated once created.
///
/// Both variants carry the compile invocation, which is the unit of work and
/// the command a developer reruns to reproduce the result.
///
/// 一次（配置，测试）调用的结果。创建后不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionResult {
    Passed {
        test: PathBuf,
        configuration: Configuration,
        invocation: Invocation,
        run_mode: RunMode,
        duration: Duration,
    },
    Failed {
        test: PathBuf,
        configuration: Configuration,
        invocation: Invocation,
        stage: Stage,
        reason: FailureReason,
        /// Captured output of the failing step, prefixed by the runtime
        /// command line for execution failures.
        output: String,
        duration: Duration,
    },
}

impl ExecutionResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, ExecutionResult::Passed { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionResult::Failed { .. })
    }

    pub fn invocation(&self) -> &Invocation {
        match self {
            ExecutionResult::Passed { invocation, .. } | ExecutionResult::Failed { invocation, .. } => {
                invocation
            }
        }
    }

    pub fn test(&self) -> &PathBuf {
        match self {
            ExecutionResult::Passed { test, .. } | ExecutionResult::Failed { test, .. } => test,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        match self {
            ExecutionResult::Passed { configuration, .. }
            | ExecutionResult::Failed { configuration, .. } => configuration,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            ExecutionResult::Passed { duration, .. } | ExecutionResult::Failed { duration, .. } => {
                *duration
            }
        }
    }

    /// Gets the status of the result as a string for display.
    /// 以字符串形式获取结果的状态以供显示。
    pub fn get_status_str(&self, locale: &str) -> String {
        match self {
            ExecutionResult::Passed { .. } => t!("report.status_passed", locale = locale).to_string(),
            ExecutionResult::Failed {
                stage: Stage::Compile,
                ..
            } => t!("report.status_compile_failed", locale = locale).to_string(),
            ExecutionResult::Failed {
                stage: Stage::Execution,
                ..
            } => t!("report.status_run_failed", locale = locale).to_string(),
        }
    }

    /// Gets the appropriate CSS class for the result status.
    pub fn get_status_class(&self) -> &'static str {
        match self {
            ExecutionResult::Passed { .. } => "status-passed",
            ExecutionResult::Failed {
                reason: FailureReason::Timeout(_),
                ..
            } => "status-timeout",
            ExecutionResult::Failed { .. } => "status-failed",
        }
    }
}

/// Totals of a finished run. Derived from the aggregator, never stored.
/// 运行结束后的统计。由汇总器派生，从不单独存储。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub passes: usize,
    pub failures: Vec<Invocation>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.passes + self.failures.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// The closing summary line, e.g. `5/6 tests passed.`
    pub fn summary_line(&self) -> String {
        format!("{}/{} tests passed.", self.passes, self.total())
    }
}
