//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! This module walks the execution plan: for every (configuration, test) pair
//! it compiles the test, runs the artifact in the runtime its directives ask
//! for, and records exactly one result. A failing pair never stops the run.
//!
//! 此模块遍历执行计划：对每个（配置，测试）组合编译测试，
//! 在其指令要求的运行时中运行产物，并且只记录一个结果。失败的组合不会中断运行。

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::core::aggregator::ResultAggregator;
use crate::core::config::ExecutorConfig;
use crate::core::discovery::TestCase;
use crate::core::matrix::Configuration;
use crate::core::models::{ExecutionResult, ExitOutcome, FailureReason, Invocation, Stage};
use crate::core::planner::ExecutionPlan;
use crate::infra::command::CommandRunner;
use crate::infra::fs;
use crate::reporting::console;

/// Everything a single invocation needs besides the pair itself.
/// 单次调用除组合本身之外所需的全部上下文。
pub struct PipelineContext<'a, R> {
    pub executor: &'a ExecutorConfig,
    pub runner: &'a R,
    /// Directory compiled artifacts are written to.
    pub artifact_dir: &'a Path,
    /// Time limit applied separately to the compile and to the run.
    pub timeout: Option<Duration>,
    pub locale: &'a str,
}

/// One (configuration, test) pair with its compile command materialized.
/// 一个已生成编译命令的（配置，测试）组合。
#[derive(Debug, Clone)]
pub struct Job<'p> {
    pub configuration: &'p Configuration,
    pub test: &'p TestCase,
    pub invocation: Invocation,
    pub artifact: PathBuf,
}

impl<'p> Job<'p> {
    pub fn prepare<R>(
        ctx: &PipelineContext<'_, R>,
        configuration: &'p Configuration,
        test: &'p TestCase,
    ) -> Self {
        let artifact = ctx
            .artifact_dir
            .join(ctx.executor.artifact_name(test.directives.run_mode));
        let invocation = ctx.executor.compile_invocation(
            configuration,
            &test.directives.extra_flags,
            &test.path,
            &artifact,
        );
        Self {
            configuration,
            test,
            invocation,
            artifact,
        }
    }

    fn failed(self, stage: Stage, reason: FailureReason, output: String, duration: Duration) -> ExecutionResult {
        ExecutionResult::Failed {
            test: self.test.path.clone(),
            configuration: self.configuration.clone(),
            invocation: self.invocation,
            stage,
            reason,
            output,
            duration,
        }
    }
}

/// Compiles the job's test.
///
/// Any artifact left over from a previous job is removed first, so the
/// runtime can only ever see output of this compile.
pub async fn compile<R: CommandRunner>(ctx: &PipelineContext<'_, R>, job: &Job<'_>) -> ExitOutcome {
    if let Err(e) = fs::remove_stale(&job.artifact) {
        return ExitOutcome::LaunchError {
            message: format!("cannot remove stale artifact {}: {e}", job.artifact.display()),
        };
    }
    ctx.runner.run(&job.invocation, ctx.timeout).await
}

/// Runs the job's artifact with the console engine or the browser harness.
pub async fn execute<R: CommandRunner>(
    ctx: &PipelineContext<'_, R>,
    job: &Job<'_>,
) -> (Invocation, ExitOutcome) {
    let invocation = ctx
        .executor
        .run_invocation(job.test.directives.run_mode, &job.artifact);
    let outcome = ctx.runner.run(&invocation, ctx.timeout).await;
    (invocation, outcome)
}

/// Compiles then, only if the compile succeeded, runs one job.
pub async fn run_job<R: CommandRunner>(ctx: &PipelineContext<'_, R>, job: Job<'_>) -> ExecutionResult {
    let start_time = Instant::now();

    let compile_outcome = compile(ctx, &job).await;
    if let Some(reason) = compile_outcome.failure_reason() {
        let output = compile_outcome.output().to_string();
        console::print_failure_echo(Stage::Compile, &reason, &output, ctx.locale);
        return job.failed(Stage::Compile, reason, output, start_time.elapsed());
    }
    console::print_tool_output(compile_outcome.output());

    let (run_invocation, run_outcome) = execute(ctx, &job).await;
    match run_outcome.failure_reason() {
        None => {
            console::print_tool_output(run_outcome.output());
            ExecutionResult::Passed {
                test: job.test.path.clone(),
                configuration: job.configuration.clone(),
                invocation: job.invocation,
                run_mode: job.test.directives.run_mode,
                duration: start_time.elapsed(),
            }
        }
        Some(reason) => {
            let output = format!("$ {}\n{}", run_invocation, run_outcome.output());
            console::print_failure_echo(Stage::Execution, &reason, &output, ctx.locale);
            job.failed(Stage::Execution, reason, output, start_time.elapsed())
        }
    }
}

/// Walks the whole plan sequentially, configurations outermost.
///
/// Every job's compile command is printed before it starts. The returned
/// aggregator holds exactly `plan.total_invocations()` results.
pub async fn run_matrix<R: CommandRunner>(
    plan: &ExecutionPlan,
    ctx: &PipelineContext<'_, R>,
) -> ResultAggregator {
    let total = plan.total_invocations();
    let mut aggregator = ResultAggregator::with_capacity(total);

    for (index, (configuration, test)) in plan.pairs().enumerate() {
        let job = Job::prepare(ctx, configuration, test);
        console::print_progress(index + 1, total, &job.invocation);

        let result = run_job(ctx, job).await;
        console::print_result_line(&result, ctx.locale);
        aggregator.record(result);
    }

    aggregator
}
