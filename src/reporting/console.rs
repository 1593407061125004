//! # Console Reporting Module / 控制台报告模块
//!
//! Progress lines while the matrix runs, immediate failure echoes, and the
//! closing report: a per-test summary table, one `FAIL: <command>` line per
//! failing invocation and the `<passes>/<total> tests passed.` line.
//!
//! 运行矩阵时的进度行、即时的失败回显，以及最终报告。

use colored::*;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use crate::core::models::{ExecutionResult, FailureReason, Invocation, Report, Stage};
use crate::core::planner::ExecutionPlan;
use crate::infra::t;

/// Prefix of every line in the closing failure block.
pub const FAIL_PREFIX: &str = "FAIL:";

/// Prints what is about to run: matrix size, test count and mode.
pub fn print_plan_header(plan: &ExecutionPlan, locale: &str) {
    if plan.is_override {
        println!(
            "{}",
            t!(
                "run.override_active",
                locale = locale,
                flags = plan.configurations.first().map(ToString::to_string).unwrap_or_default()
            )
            .yellow()
        );
    }
    println!(
        "{}",
        t!(
            "run.plan",
            locale = locale,
            configurations = plan.configurations.len(),
            tests = plan.tests.len(),
            total = plan.total_invocations()
        )
        .bold()
    );
}

/// Prints the plan without running it (`--list`).
pub fn print_plan_listing(plan: &ExecutionPlan, locale: &str) {
    println!("\n{}", t!("list.configurations", locale = locale).bold());
    for (i, configuration) in plan.configurations.iter().enumerate() {
        println!("  {:>4}  {}", i + 1, configuration);
    }
    println!("\n{}", t!("list.tests", locale = locale).bold());
    for test in &plan.tests {
        let mut line = format!("  {}", test.path.display());
        if !test.directives.extra_flags.is_empty() {
            line.push_str(&format!("  [flags: {}]", test.directives.extra_flags.join(" ")));
        }
        line.push_str(&format!("  [run: {}]", test.directives.run_mode));
        println!("{}", line);
    }
}

/// Emits the exact compile command line before it runs.
pub fn print_progress(index: usize, total: usize, invocation: &Invocation) {
    println!("{} {}", format!("[{}/{}]", index, total).dimmed(), invocation);
}

/// Echoes captured compiler or runtime output, if any.
pub fn print_tool_output(output: &str) {
    let output = output.trim_end();
    if !output.is_empty() {
        println!("{}", output);
    }
}

/// Describes a failure as soon as it happens, so nothing is lost if the
/// closing report never gets printed.
pub fn print_failure_echo(stage: Stage, reason: &FailureReason, output: &str, locale: &str) {
    let stage_str = match stage {
        Stage::Compile => t!("run.compile_failed", locale = locale),
        Stage::Execution => t!("run.execution_failed", locale = locale),
    };
    println!("{} {}", stage_str.red().bold(), reason.describe(locale).red());
    print_tool_output(output);
}

/// One line per finished invocation: status and duration.
pub fn print_result_line(result: &ExecutionResult, locale: &str) {
    let status = result.get_status_str(locale);
    let status = if result.is_pass() {
        status.green()
    } else {
        status.red()
    };
    println!(
        "  -> {} ({:.2?})",
        status,
        result.duration()
    );
}

/// Prints a per-test table: how many configurations passed for each test.
///
/// ```text
/// --- Test Summary ---
///   - Passed           | test/global.c                           |   384/384
///   - Failed           | test/weak_ptr.c                         |   380/384
/// ```
pub fn print_summary(results: &[ExecutionResult], locale: &str) {
    println!("\n{}", t!("test_summary_banner", locale = locale).bold());

    for (test, (passed, total)) in tally_by_test(results) {
        let status_colored = if passed == total {
            t!("report.status_passed", locale = locale).green()
        } else {
            t!("report.status_failed", locale = locale).red()
        };
        println!(
            "  - {:<18} | {:<40} | {:>5}/{:<5}",
            status_colored,
            test.display(),
            passed,
            total
        );
    }
}

/// Passed and attempted counts per test, ordered by path.
pub fn tally_by_test(results: &[ExecutionResult]) -> BTreeMap<&Path, (usize, usize)> {
    let mut tally: BTreeMap<&Path, (usize, usize)> = BTreeMap::new();
    for result in results {
        let entry = tally.entry(result.test().as_path()).or_default();
        if result.is_pass() {
            entry.0 += 1;
        }
        entry.1 += 1;
    }
    tally
}

/// Writes the closing block: every failing command, then the summary line.
pub fn write_final_report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    if !report.failures.is_empty() {
        writeln!(out)?;
    }
    for invocation in &report.failures {
        writeln!(out, "{} {}", FAIL_PREFIX, invocation)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", report.summary_line())
}

/// Prints the closing block to stdout.
pub fn print_final_report(report: &Report) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_final_report(&mut out, report) {
        eprintln!("Failed to write report: {}", e);
    }
}
