//! # Models and Reporting Tests / 模型与报告测试
//!
//! Invocation rendering, outcome classification, aggregation and the three
//! report formats.
//!
//! 调用命令的渲染、结果分类、汇总以及三种报告格式。

use std::path::PathBuf;
use std::time::Duration;

use em_matrix_runner::core::ResultAggregator;
use em_matrix_runner::core::directives::RunMode;
use em_matrix_runner::core::matrix::Configuration;
use em_matrix_runner::models::{
    ExecutionResult, ExitOutcome, FailureReason, Invocation, Report, Stage,
};
use em_matrix_runner::reporting::console::{tally_by_test, write_final_report};
use em_matrix_runner::reporting::html::{escape_html, render_html_report};
use em_matrix_runner::reporting::json::generate_json_report;

fn compile_command(test: &str, opt: &str) -> Invocation {
    Invocation::new("emcc")
        .args(["emgc.cpp", "-o", "a.js", opt])
        .arg(test)
}

fn passed(test: &str, opt: &str) -> ExecutionResult {
    ExecutionResult::Passed {
        test: PathBuf::from(test),
        configuration: Configuration::new([opt]),
        invocation: compile_command(test, opt),
        run_mode: RunMode::Console,
        duration: Duration::from_millis(120),
    }
}

fn failed(test: &str, opt: &str, stage: Stage, reason: FailureReason) -> ExecutionResult {
    ExecutionResult::Failed {
        test: PathBuf::from(test),
        configuration: Configuration::new([opt]),
        invocation: compile_command(test, opt),
        stage,
        reason,
        output: "boom <here>".to_string(),
        duration: Duration::from_millis(80),
    }
}

fn render(report: &Report) -> String {
    let mut out = Vec::new();
    write_final_report(&mut out, report).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_command_line_is_shell_ready() {
    let plain = Invocation::new("emcc").args(["-O2", "test/a.c"]);
    assert_eq!(plain.command_line(), "emcc -O2 test/a.c");
    assert_eq!(plain.to_string(), plain.command_line());

    let quoted = Invocation::new("emcc").args(["-DNAME=a b", "test/a.c"]);
    let split = shlex::split(&quoted.command_line()).unwrap();
    assert_eq!(split, ["emcc", "-DNAME=a b", "test/a.c"]);
}

#[test]
fn test_outcome_classification() {
    assert_eq!(
        ExitOutcome::Success {
            output: "ok".into()
        }
        .failure_reason(),
        None
    );
    assert_eq!(
        ExitOutcome::Failed {
            code: Some(2),
            output: String::new()
        }
        .failure_reason(),
        Some(FailureReason::ExitStatus(Some(2)))
    );
    assert_eq!(
        ExitOutcome::LaunchError {
            message: "No such file".into()
        }
        .failure_reason(),
        Some(FailureReason::Launch("No such file".into()))
    );
    assert_eq!(
        ExitOutcome::TimedOut {
            limit: Duration::from_secs(30),
            output: String::new()
        }
        .failure_reason(),
        Some(FailureReason::Timeout(30))
    );
}

#[test]
fn test_failure_reasons_are_described() {
    assert_eq!(FailureReason::ExitStatus(Some(1)).describe("en"), "exit status 1");
    assert_eq!(FailureReason::ExitStatus(None).describe("en"), "terminated by a signal");
    assert_eq!(FailureReason::Timeout(9).describe("en"), "timed out after 9s");
    assert!(FailureReason::Launch("not found".into()).describe("en").contains("not found"));
    assert_eq!(FailureReason::Timeout(9).describe("zh-CN"), "9 秒后超时");
}

#[test]
fn test_aggregator_keeps_attempt_order() {
    let mut aggregator = ResultAggregator::new();
    aggregator.record(failed("test/b.c", "-O0", Stage::Compile, FailureReason::ExitStatus(Some(1))));
    aggregator.record(passed("test/a.c", "-O0"));
    aggregator.record(failed("test/a.c", "-O2", Stage::Execution, FailureReason::ExitStatus(Some(3))));

    assert_eq!(aggregator.attempted(), 3);
    assert_eq!(aggregator.passes(), 1);
    assert_eq!(
        aggregator.failures(),
        vec![
            &compile_command("test/b.c", "-O0"),
            &compile_command("test/a.c", "-O2"),
        ]
    );

    let report = aggregator.report();
    assert_eq!(report.total(), 3);
    assert!(!report.all_passed());
    assert_eq!(report.summary_line(), "1/3 tests passed.");
    assert_eq!(aggregator.into_results().len(), 3);
}

#[test]
fn test_final_report_layout() {
    let report = Report {
        passes: 1,
        failures: vec![
            compile_command("test/a.c", "-O0"),
            compile_command("test/b.c", "-O3"),
        ],
    };
    assert_eq!(
        render(&report),
        "\nFAIL: emcc emgc.cpp -o a.js -O0 test/a.c\nFAIL: emcc emgc.cpp -o a.js -O3 test/b.c\n\n1/3 tests passed.\n"
    );

    let clean = Report {
        passes: 6,
        failures: Vec::new(),
    };
    assert_eq!(render(&clean), "\n6/6 tests passed.\n");
}

#[test]
fn test_status_strings() {
    assert_eq!(passed("test/a.c", "-O0").get_status_str("en"), "Passed");
    assert_eq!(
        failed("test/a.c", "-O0", Stage::Compile, FailureReason::ExitStatus(Some(1))).get_status_str("en"),
        "Compile Failure"
    );
    assert_eq!(passed("test/a.c", "-O0").get_status_class(), "status-passed");
    assert_eq!(
        failed("test/a.c", "-O0", Stage::Compile, FailureReason::ExitStatus(Some(1))).get_status_class(),
        "status-failed"
    );
}

#[test]
fn test_tally_by_test() {
    let results = vec![
        passed("test/b.c", "-O0"),
        passed("test/a.c", "-O0"),
        failed("test/a.c", "-O2", Stage::Execution, FailureReason::ExitStatus(Some(1))),
    ];
    let tally: Vec<_> = tally_by_test(&results).into_iter().collect();
    assert_eq!(tally.len(), 2);
    assert_eq!(tally[0].0.to_str(), Some("test/a.c"));
    assert_eq!(tally[0].1, (1, 2));
    assert_eq!(tally[1].1, (1, 1));
}

#[test]
fn test_html_report_escapes_content() {
    assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");

    let results = vec![
        passed("test/a.c", "-O0"),
        failed("test/<b>.c", "-O2", Stage::Compile, FailureReason::ExitStatus(Some(1))),
    ];
    let html = render_html_report(&results, "en");

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Test Matrix Report"));
    assert!(html.contains("boom &lt;here&gt;"));
    assert!(html.contains("&lt;b&gt;.c"));
    assert!(!html.contains("<b>"));
    assert!(html.contains("Failing invocations"));
    assert!(html.contains("<em>-O2</em>"));
}

#[test]
fn test_json_report_contents() {
    let results = vec![
        passed("test/a.c", "-O0"),
        failed("test/a.c", "-O2", Stage::Execution, FailureReason::Timeout(10)),
    ];
    let report = Report {
        passes: 1,
        failures: vec![compile_command("test/a.c", "-O2")],
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    generate_json_report(&report, &results, &path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(json["passes"], 1);
    assert_eq!(json["total"], 2);
    assert_eq!(json["failures"][0], "emcc emgc.cpp -o a.js -O2 test/a.c");
    assert_eq!(json["results"][0]["status"], "passed");
    assert_eq!(json["results"][0]["configuration"][0], "-O0");
    assert_eq!(json["results"][1]["status"], "failed");
    assert_eq!(json["results"][1]["stage"], "execution");
    assert_eq!(json["results"][1]["reason"]["timeout"], 10);
}
