//! # Test Discovery Module / 测试发现模块
//!
//! Enumerates test sources under the test directory, applies the optional
//! substring filter and reads each surviving file exactly once, extracting its
//! directives on the way.
//!
//! 枚举测试目录下的测试源文件，应用可选的子串过滤器，
//! 并对每个保留下来的文件只读取一次，同时提取其指令。

use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::directives::{DirectiveSyntax, Directives};
use crate::core::error::MatrixError;

/// A discovered test source. Immutable once discovered.
/// 已发现的测试源文件。发现后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub path: PathBuf,
    #[serde(skip)]
    pub content: String,
    pub directives: Directives,
}

impl TestCase {
    /// Builds a test case from already-loaded content.
    pub fn from_source(path: impl Into<PathBuf>, content: impl Into<String>, syntax: &DirectiveSyntax) -> Self {
        let content = content.into();
        let directives = syntax.parse(&content);
        Self {
            path: path.into(),
            content,
            directives,
        }
    }

    /// The test's file name, used as a short label in console output.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Keeps only the paths that contain `filter` as a literal substring.
///
/// `None` and the empty string keep everything.
pub fn apply_filter(paths: Vec<PathBuf>, filter: Option<&str>) -> Vec<PathBuf> {
    match filter.filter(|f| !f.is_empty()) {
        Some(needle) => paths
            .into_iter()
            .filter(|path| path.to_string_lossy().contains(needle))
            .collect(),
        None => paths,
    }
}

/// Lists every file under `test_dir` matching one of `patterns`, sorted.
///
/// Fails when the directory does not exist or a pattern is malformed.
pub fn enumerate(test_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, MatrixError> {
    if !test_dir.is_dir() {
        return Err(MatrixError::MissingTestDir {
            path: test_dir.to_path_buf(),
        });
    }

    let escaped_dir = glob::Pattern::escape(&test_dir.to_string_lossy());
    let mut found = BTreeSet::new();

    for pattern in patterns {
        let full_pattern = format!("{}/{}", escaped_dir.trim_end_matches('/'), pattern);
        let entries = glob::glob(&full_pattern).map_err(|source| MatrixError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        for entry in entries {
            let path = entry.map_err(|err| MatrixError::UnreadableTest {
                path: err.path().to_path_buf(),
                source: err.into_error(),
            })?;
            if path.is_file() {
                found.insert(path);
            }
        }
    }

    Ok(found.into_iter().collect())
}

/// Discovers, filters and loads the tests of one run.
///
/// `test_dir` is resolved against `root`. Discovered paths are reported
/// relative to `root` when possible, and the filter is matched against that
/// relative form, so a filter never accidentally matches a parent directory.
pub fn discover_tests(
    root: &Path,
    test_dir: &Path,
    patterns: &[String],
    filter: Option<&str>,
    syntax: &DirectiveSyntax,
) -> Result<Vec<TestCase>, MatrixError> {
    let paths = enumerate(&root.join(test_dir), patterns)?
        .into_iter()
        .map(|path| match path.strip_prefix(root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => path,
        })
        .collect();
    let paths = apply_filter(paths, filter);
    tracing::debug!(count = paths.len(), dir = %test_dir.display(), "discovered tests");

    paths
        .into_iter()
        .map(|path| {
            let content = fs::read_to_string(root.join(&path)).map_err(|source| {
                MatrixError::UnreadableTest {
                    path: path.clone(),
                    source,
                }
            })?;
            Ok(TestCase::from_source(path, content, syntax))
        })
        .collect()
}
