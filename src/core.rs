//! # Core Module / 核心模块
//!
//! This module contains the test-matrix engine: configuration generation,
//! test discovery with directive extraction, the compile/run pipeline and
//! result aggregation.
//!
//! 此模块包含测试矩阵引擎：配置生成、带指令提取的测试发现、
//! 编译/运行流水线以及结果汇总。

pub mod aggregator;
pub mod config;
pub mod directives;
pub mod discovery;
pub mod error;
pub mod execution;
pub mod matrix;
pub mod models;
pub mod planner;

// Re-exports
pub use aggregator::ResultAggregator;
pub use config::{ExecutorConfig, MatrixConfig};
pub use error::MatrixError;
pub use execution::run_matrix;
pub use models::ExecutionResult;
