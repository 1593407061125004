//! # Configuration Module / 配置模块
//!
//! `EmMatrix.toml` describes the toolchain to drive and the matrix to
//! exercise. Every field has a default matching the stock emgc layout, so the
//! runner also works without any configuration file.
//!
//! `EmMatrix.toml` 描述要驱动的工具链以及要测试的矩阵。
//! 每个字段都有与默认 emgc 布局相匹配的默认值，因此即使没有配置文件也能运行。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::directives::RunMode;
use crate::core::matrix::{self, Axis, Configuration, MatrixSource};
use crate::core::models::Invocation;

/// Default configuration file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "EmMatrix.toml";

/// The external tools and the fixed part of every compiler command.
/// 外部工具以及每条编译命令中固定的部分。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// The compiler executable. `~` and environment variables are expanded.
    /// 编译器可执行文件。会展开 `~` 和环境变量。
    pub compiler: String,
    /// Support sources compiled together with every test (the library under test).
    /// 与每个测试一起编译的支持源文件（被测库）。
    pub sources: Vec<String>,
    /// Include directories, passed as `-I<dir>`.
    pub include_dirs: Vec<String>,
    /// JavaScript library hooks, each passed as `--js-library <path>`.
    pub js_libraries: Vec<String>,
    /// Runtime for console-mode tests.
    /// 控制台模式测试的运行时。
    pub console_engine: String,
    /// Browser-launching harness for browser-mode tests.
    /// 浏览器模式测试的启动工具。
    pub browser_harness: String,
    /// Extra arguments placed before the artifact in browser runs.
    pub browser_args: Vec<String>,
    /// Where artifacts are written. A fresh temporary directory when unset.
    /// 产物的写入位置。未设置时使用新的临时目录。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_dir: Option<PathBuf>,
    pub console_artifact: String,
    pub browser_artifact: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            compiler: default_compiler(),
            sources: vec!["emgc.cpp".to_string()],
            include_dirs: vec![".".to_string()],
            js_libraries: vec!["test/library_test.js".to_string()],
            console_engine: "node".to_string(),
            browser_harness: "emrun".to_string(),
            browser_args: Vec::new(),
            artifact_dir: None,
            console_artifact: "a.js".to_string(),
            browser_artifact: "a.html".to_string(),
        }
    }
}

fn default_compiler() -> String {
    if cfg!(windows) {
        "em++.bat".to_string()
    } else {
        "em++".to_string()
    }
}

/// Expands `~` and `$VAR` in a tool path, leaving it untouched if expansion fails.
fn expand_tool(tool: &str) -> String {
    match shellexpand::full(tool) {
        Ok(expanded) => expanded.into_owned(),
        Err(e) => {
            tracing::warn!(tool, error = %e, "could not expand tool path");
            tool.to_string()
        }
    }
}

impl ExecutorConfig {
    /// File name of the artifact produced for `run_mode`.
    pub fn artifact_name(&self, run_mode: RunMode) -> &str {
        match run_mode {
            RunMode::Console => &self.console_artifact,
            RunMode::Browser => &self.browser_artifact,
        }
    }

    /// The compiler command for one (configuration, test) pair:
    /// compiler, sources, `-o <artifact>`, includes, library hooks, the
    /// configuration's flags, the test's directive flags, then the test path.
    pub fn compile_invocation(
        &self,
        configuration: &Configuration,
        extra_flags: &[String],
        test: &Path,
        artifact: &Path,
    ) -> Invocation {
        Invocation::new(expand_tool(&self.compiler))
            .args(self.sources.iter().cloned())
            .arg("-o")
            .arg(artifact.to_string_lossy())
            .args(self.include_dirs.iter().map(|dir| format!("-I{dir}")))
            .args(
                self.js_libraries
                    .iter()
                    .flat_map(|lib| ["--js-library".to_string(), lib.clone()]),
            )
            .args(configuration.flags.iter().cloned())
            .args(extra_flags.iter().cloned())
            .arg(test.to_string_lossy())
    }

    /// The runtime command for a compiled artifact.
    pub fn run_invocation(&self, run_mode: RunMode, artifact: &Path) -> Invocation {
        match run_mode {
            RunMode::Console => {
                Invocation::new(expand_tool(&self.console_engine)).arg(artifact.to_string_lossy())
            }
            RunMode::Browser => Invocation::new(expand_tool(&self.browser_harness))
                .args(self.browser_args.iter().cloned())
                .arg(artifact.to_string_lossy()),
        }
    }
}

/// The entire matrix configuration, loaded from a TOML file.
/// 从 TOML 文件加载的完整矩阵配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// The language for console messages (e.g., "en", "zh-CN"). Detected when unset.
    /// 控制台消息的语言（例如 "en", "zh-CN"）。未设置时自动检测。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Working directory of the compiler and the runtimes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_dir: Option<PathBuf>,
    /// Directory holding the test sources, relative to the project directory.
    /// 存放测试源文件的目录，相对于项目目录。
    pub test_dir: PathBuf,
    /// Glob patterns selecting test sources inside `test_dir`.
    pub patterns: Vec<String>,
    /// Per-invocation time limit for each external process.
    /// 每个外部进程的单次调用时间限制。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// A single configuration replacing the whole matrix, e.g. `"-O0 -g"`.
    /// 替换整个矩阵的单一配置，例如 `"-O0 -g"`。
    #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_flags: Option<String>,
    pub executor: ExecutorConfig,
    pub axes: Vec<Axis>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            language: None,
            project_dir: None,
            test_dir: PathBuf::from("test"),
            patterns: vec!["*.c".to_string(), "*.cpp".to_string()],
            timeout_secs: None,
            override_flags: None,
            executor: ExecutorConfig::default(),
            axes: matrix::default_axes(),
        }
    }
}

impl MatrixConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MatrixConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn validate(&self) -> Result<()> {
        matrix::validate_axes(&self.axes)?;
        if let Some(flags) = &self.override_flags {
            Configuration::parse(flags)?;
        }
        Ok(())
    }

    /// Where the configurations of this run come from; `cli_override` wins
    /// over the file's `override` key.
    pub fn matrix_source(&self, cli_override: Option<&str>) -> Result<MatrixSource> {
        match cli_override.or(self.override_flags.as_deref()) {
            Some(flags) => Ok(MatrixSource::Override(Configuration::parse(flags)?)),
            None => Ok(MatrixSource::Exhaustive(self.axes.clone())),
        }
    }
}
