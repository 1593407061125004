//! Fatal errors of the matrix engine.
//!
//! Compile and execution failures are not errors: they are recorded as
//! [`ExecutionResult::Failed`](crate::core::models::ExecutionResult::Failed)
//! and the matrix keeps going. Everything here aborts before the first
//! invocation runs.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    /// The test directory is missing or is not a directory.
    #[error("test directory not found: {}", .path.display())]
    MissingTestDir { path: PathBuf },

    /// A glob pattern could not be compiled.
    #[error("invalid test pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A matched test file could not be enumerated or read.
    #[error("failed to read test file {}: {source}", .path.display())]
    UnreadableTest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The same flag token appears in two axes, which would produce duplicate configurations.
    #[error("flag `{token}` appears in both axis `{first}` and axis `{second}`")]
    DuplicateToken {
        token: String,
        first: String,
        second: String,
    },

    /// An override configuration could not be split into shell words.
    #[error("invalid configuration override `{0}`")]
    InvalidOverride(String),
}
