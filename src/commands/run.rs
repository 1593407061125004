//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: load the configuration, plan
//! the matrix, walk every (configuration, test) pair and report.
//!
//! 此模块实现了 `run` 命令：加载配置、规划矩阵、
//! 遍历每个（配置，测试）组合并生成报告。

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{
    core::{
        config::MatrixConfig,
        execution::{PipelineContext, run_matrix},
        planner,
    },
    infra::{command::ProcessRunner, fs, t},
    reporting::{
        console::{print_final_report, print_plan_header, print_plan_listing, print_summary},
        html::generate_html_report,
        json::generate_json_report,
    },
};

/// Everything the `run` command takes from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Literal substring selecting test paths.
    pub filter: Option<String>,
    pub config: PathBuf,
    /// Whether `config` was given explicitly; a missing explicit file is an error.
    pub config_explicit: bool,
    pub project_dir: Option<PathBuf>,
    pub override_flags: Option<String>,
    pub timeout_secs: Option<u64>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub list_only: bool,
    pub lang: Option<String>,
}

/// Executes the run command with the provided options.
///
/// # Returns
/// `Ok(())` when every invocation passed; an error when any invocation
/// failed or the run could not be set up.
pub async fn execute(options: RunOptions) -> Result<()> {
    let config = load_config(&options.config, options.config_explicit)?;

    let locale = match options.lang.as_deref().or(config.language.as_deref()) {
        Some(lang) => lang.to_string(),
        None => crate::resolve_locale(None),
    };
    rust_i18n::set_locale(&locale);

    let project_dir = options
        .project_dir
        .clone()
        .or_else(|| config.project_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let project_root = fs::absolute_path(&project_dir)
        .with_context(|| t!("project_dir_not_found", locale = locale, path = project_dir.display()))?;

    println!(
        "{}",
        t!("project_root_detected", locale = locale, path = project_root.display())
    );

    let plan = planner::plan_execution(
        &config,
        &project_root,
        options.override_flags.as_deref(),
        options.filter.as_deref(),
    )?;

    print_plan_header(&plan, &locale);

    if options.list_only {
        print_plan_listing(&plan, &locale);
        return Ok(());
    }

    if plan.is_empty() {
        println!("{}", t!("no_cases_to_run", locale = locale).green());
    }

    let artifact_dir = fs::ArtifactDir::prepare(config.executor.artifact_dir.as_deref(), &project_root)?;
    let runner = ProcessRunner::new(&project_root);
    let ctx = PipelineContext {
        executor: &config.executor,
        runner: &runner,
        artifact_dir: artifact_dir.path(),
        timeout: options
            .timeout_secs
            .or(config.timeout_secs)
            .map(Duration::from_secs),
        locale: &locale,
    };

    let aggregator = run_matrix(&plan, &ctx).await;
    let report = aggregator.report();

    if !aggregator.results().is_empty() {
        print_summary(aggregator.results(), &locale);
    }

    if let Some(report_path) = &options.html {
        println!("\n{}", t!("html_report_generating", locale = locale, path = report_path.display()));
        if let Err(e) = generate_html_report(aggregator.results(), report_path, &locale) {
            eprintln!("{} {:#}", t!("report_write_failed", locale = locale).red(), e);
        }
    }
    if let Some(report_path) = &options.json {
        println!("\n{}", t!("json_report_generating", locale = locale, path = report_path.display()));
        if let Err(e) = generate_json_report(&report, aggregator.results(), report_path) {
            eprintln!("{} {:#}", t!("report_write_failed", locale = locale).red(), e);
        }
    }

    print_final_report(&report);

    if report.all_passed() {
        Ok(())
    } else {
        anyhow::bail!(t!("matrix_failed", locale = locale, count = report.failures.len()).to_string());
    }
}

/// Loads the configuration file, falling back to the built-in settings when
/// the default file name is absent.
pub fn load_config(path: &Path, explicit: bool) -> Result<MatrixConfig> {
    if !explicit && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using built-in defaults");
        return Ok(MatrixConfig::default());
    }
    MatrixConfig::load(path)
}
