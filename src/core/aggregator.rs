//! Append-only collection of per-invocation results.
//!
//! Exactly one result is recorded per attempted invocation, in attempt order.
//! Recording takes `&mut self`; there is a single owner.

use crate::core::models::{ExecutionResult, Invocation, Report};

#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Vec<ExecutionResult>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, result: ExecutionResult) {
        self.results.push(result);
    }

    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn passes(&self) -> usize {
        self.results.iter().filter(|r| r.is_pass()).count()
    }

    /// Failing invocations, in the order they were attempted.
    pub fn failures(&self) -> Vec<&Invocation> {
        self.results
            .iter()
            .filter(|r| r.is_failure())
            .map(ExecutionResult::invocation)
            .collect()
    }

    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ExecutionResult> {
        self.results
    }

    pub fn report(&self) -> Report {
        Report {
            passes: self.passes(),
            failures: self.failures().into_iter().cloned().collect(),
        }
    }
}
