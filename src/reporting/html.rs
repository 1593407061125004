//! # HTML Reporting Module / HTML 报告模块
//!
//! This module writes a standalone HTML report: totals, a per-test table and
//! every failing invocation with its captured output.
//!
//! 此模块生成独立的 HTML 报告：总计、按测试分组的表格，
//! 以及每个失败调用及其捕获的输出。

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::models::ExecutionResult;
use crate::infra::t;
use crate::reporting::console::tally_by_test;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #222; }
h1 { margin-bottom: 0.2em; }
.summary span { display: inline-block; margin-right: 1.5em; font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1em 0; }
th, td { border: 1px solid #ddd; padding: 6px 10px; text-align: left; vertical-align: top; }
th { background: #f4f4f4; }
code, pre { font-family: Menlo, Consolas, monospace; font-size: 0.9em; }
pre { background: #f8f8f8; padding: 0.8em; overflow-x: auto; white-space: pre-wrap; }
.status-passed { color: #1a7f37; }
.status-failed { color: #cf222e; }
.status-timeout { color: #9a6700; }
details { margin: 0.6em 0; }
"#;

/// Escapes text for safe inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the report as an HTML document.
pub fn render_html_report(results: &[ExecutionResult], locale: &str) -> String {
    let total = results.len();
    let passed = results.iter().filter(|r| r.is_pass()).count();
    let failed = total - passed;

    let mut html = String::new();
    html.push_str(&format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>",
        escape_html(&t!("html_report.title", locale = locale))
    ));
    html.push_str("<style>");
    html.push_str(HTML_STYLE);
    html.push_str("</style></head><body>");
    html.push_str(&format!(
        "<h1>{}</h1>",
        escape_html(&t!("html_report.main_header", locale = locale))
    ));
    html.push_str(&format!(
        "<p>{}</p>",
        escape_html(&t!(
            "html_report.generated_at",
            locale = locale,
            time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ))
    ));

    // Summary statistics
    html.push_str("<div class=\"summary\">");
    html.push_str(&format!(
        "<span>{}: {}</span><span class=\"status-passed\">{}: {}</span><span class=\"status-failed\">{}: {}</span>",
        escape_html(&t!("html_report.total", locale = locale)),
        total,
        escape_html(&t!("html_report.passed", locale = locale)),
        passed,
        escape_html(&t!("html_report.failed", locale = locale)),
        failed
    ));
    html.push_str("</div>");

    // Per-test table
    html.push_str(&format!(
        "<table><thead><tr><th>{}</th><th>{}</th></tr></thead><tbody>",
        escape_html(&t!("html_report.col_test", locale = locale)),
        escape_html(&t!("html_report.col_passed", locale = locale))
    ));
    for (test, (test_passed, test_total)) in tally_by_test(results) {
        let class = if test_passed == test_total {
            "status-passed"
        } else {
            "status-failed"
        };
        html.push_str(&format!(
            "<tr><td><code>{}</code></td><td class=\"{}\">{}/{}</td></tr>",
            escape_html(&test.display().to_string()),
            class,
            test_passed,
            test_total
        ));
    }
    html.push_str("</tbody></table>");

    // Failure details
    if failed > 0 {
        html.push_str(&format!(
            "<h2>{}</h2>",
            escape_html(&t!("html_report.failures_header", locale = locale))
        ));
        for result in results.iter().filter(|r| r.is_failure()) {
            if let ExecutionResult::Failed {
                invocation,
                reason,
                output,
                ..
            } = result
            {
                html.push_str(&format!(
                    "<details><summary class=\"{}\">{} <em>{}</em> &mdash; <code>{}</code></summary><pre>{}</pre></details>",
                    result.get_status_class(),
                    escape_html(&result.get_status_str(locale)),
                    escape_html(&result.configuration().to_string()),
                    escape_html(&invocation.to_string()),
                    escape_html(&format!("{}\n{}", reason.describe(locale), output))
                ));
            }
        }
    }

    html.push_str("</body></html>");
    html
}

/// Generates the HTML report and writes it to `output_path`.
///
/// # Errors
/// Fails when the file cannot be written.
pub fn generate_html_report(results: &[ExecutionResult], output_path: &Path, locale: &str) -> Result<()> {
    let html = render_html_report(results, locale);
    fs::write(output_path, html)
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))
}
