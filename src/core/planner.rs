//! # Test Execution Planner Module / 测试执行计划模块
//!
//! This module joins the configuration matrix with the discovered tests into
//! the plan the pipeline walks through.
//!
//! 此模块将配置矩阵与发现的测试合并为流水线要执行的计划。

use anyhow::Result;
use std::path::Path;

use crate::core::config::MatrixConfig;
use crate::core::directives::DirectiveSyntax;
use crate::core::discovery::{self, TestCase};
use crate::core::matrix::Configuration;

/// Represents a complete execution plan for a test matrix.
/// 表示测试矩阵的完整执行计划。
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    /// Configurations in generation order (outer loop).
    /// 按生成顺序排列的配置（外层循环）。
    pub configurations: Vec<Configuration>,
    /// Filtered tests in sorted order (inner loop).
    /// 排序后的已过滤测试（内层循环）。
    pub tests: Vec<TestCase>,
    /// Whether the matrix was replaced by a single explicit configuration.
    /// 矩阵是否被单一的显式配置替换。
    pub is_override: bool,
}

impl ExecutionPlan {
    /// Number of invocations the plan will attempt.
    pub fn total_invocations(&self) -> usize {
        self.configurations.len() * self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_invocations() == 0
    }

    /// Every (configuration, test) pair, configurations outermost.
    pub fn pairs(&self) -> impl Iterator<Item = (&Configuration, &TestCase)> {
        self.configurations
            .iter()
            .flat_map(move |configuration| self.tests.iter().map(move |test| (configuration, test)))
    }
}

/// Creates an execution plan for the given configuration.
///
/// # Arguments
/// * `config` - The loaded matrix configuration
/// * `project_root` - Directory `config.test_dir` is relative to
/// * `cli_override` - Optional single configuration replacing the matrix
/// * `filter` - Optional literal substring selecting test paths
///
/// # Errors
/// Fails when discovery fails or the override cannot be parsed.
pub fn plan_execution(
    config: &MatrixConfig,
    project_root: &Path,
    cli_override: Option<&str>,
    filter: Option<&str>,
) -> Result<ExecutionPlan> {
    let source = config.matrix_source(cli_override)?;
    let configurations = source.configurations();

    // Test paths stay relative to the project root so command lines match
    // what a developer would type from there.
    let tests = discovery::discover_tests(
        project_root,
        &config.test_dir,
        &config.patterns,
        filter,
        &DirectiveSyntax::default(),
    )?;

    Ok(ExecutionPlan {
        configurations,
        tests,
        is_override: source.is_override(),
    })
}
