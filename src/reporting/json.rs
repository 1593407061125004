//! Machine-readable report of a finished run.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::models::{ExecutionResult, Report};

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Local>,
    pub passes: usize,
    pub total: usize,
    /// Failing compile command lines, in attempt order.
    pub failures: Vec<String>,
    pub results: &'a [ExecutionResult],
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &Report, results: &'a [ExecutionResult]) -> Self {
        Self {
            generated_at: Local::now(),
            passes: report.passes,
            total: report.total(),
            failures: report.failures.iter().map(ToString::to_string).collect(),
            results,
        }
    }
}

pub fn generate_json_report(report: &Report, results: &[ExecutionResult], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::new(report, results))
        .context("Failed to serialize JSON report")?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))
}
