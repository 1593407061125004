//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the artifact directory compiled tests are written to,
//! plus small path helpers.
//!
//! 此模块提供已编译测试的产物目录，以及一些路径辅助函数。

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The directory artifacts are written to for the whole run.
///
/// When no directory is configured a temporary one is created; it is deleted
/// when this value is dropped.
/// 整个运行期间写入产物的目录。未配置时会创建临时目录，并在此值被丢弃时删除。
pub struct ArtifactDir {
    _temp_root: Option<TempDir>,
    path: PathBuf,
}

impl ArtifactDir {
    /// Uses `dir` (created if missing, resolved against `base` when relative),
    /// or a fresh temporary directory when `dir` is `None`.
    pub fn prepare(dir: Option<&Path>, base: &Path) -> Result<Self> {
        match dir {
            Some(dir) => {
                let path = if dir.is_absolute() {
                    dir.to_path_buf()
                } else {
                    base.join(dir)
                };
                fs::create_dir_all(&path).with_context(|| {
                    format!("Failed to create artifact directory: {}", path.display())
                })?;
                let path = absolute_path(&path)?;
                Ok(Self {
                    _temp_root: None,
                    path,
                })
            }
            None => {
                let temp_dir = tempfile::Builder::new()
                    .prefix("em_matrix_")
                    .tempdir()
                    .context("Failed to create temporary artifact directory")?;
                let path = temp_dir.path().to_path_buf();
                Ok(Self {
                    _temp_root: Some(temp_dir),
                    path,
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for ArtifactDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactDir")
            .field("path", &self.path)
            .field("temporary", &self._temp_root.is_some())
            .finish()
    }
}

/// Deletes a stale artifact so a failed compile can never leave an old one to run.
pub fn remove_stale(artifact: &Path) -> io::Result<()> {
    match fs::remove_file(artifact) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Gets the absolute path from a potentially relative path.
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}
