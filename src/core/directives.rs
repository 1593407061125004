//! # Test Directives Module / 测试指令模块
//!
//! Test sources carry per-test build and run overrides in their comments:
//!
//! ```c
//! // flags: -sALLOW_MEMORY_GROWTH -sMAXIMUM_MEMORY=4GB
//! // run: browser
//! ```
//!
//! `flags:` lines append extra compiler flags after the configuration's own
//! flags, `run:` lines choose the runtime. Directives do not depend on the
//! active configuration, so they are parsed once per test at discovery time.
//!
//! 测试源文件在注释中携带针对单个测试的构建和运行覆盖项。
//! 指令与当前配置无关，因此在发现测试时每个测试只解析一次。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which runtime executes a compiled test.
/// 由哪个运行时执行已编译的测试。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Headless script engine (node) against the `.js` artifact.
    /// 无头脚本引擎（node），运行 `.js` 产物。
    #[default]
    Console,
    /// Browser-launching harness (emrun) against the `.html` artifact.
    /// 启动浏览器的工具（emrun），运行 `.html` 产物。
    Browser,
}

impl RunMode {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "console" => Some(RunMode::Console),
            "browser" => Some(RunMode::Browser),
            _ => None,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Console => f.write_str("console"),
            RunMode::Browser => f.write_str("browser"),
        }
    }
}

/// Overrides extracted from one test source.
/// 从单个测试源文件中提取的覆盖项。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directives {
    pub run_mode: RunMode,
    /// Extra compiler flags, in the order their lines appear in the file.
    /// 额外的编译器标志，按其所在行在文件中出现的顺序排列。
    pub extra_flags: Vec<String>,
}

/// The marker syntax recognized inside test sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveSyntax {
    pub comment_prefix: String,
    pub flags_marker: String,
    pub run_marker: String,
}

impl Default for DirectiveSyntax {
    fn default() -> Self {
        Self {
            comment_prefix: "//".to_string(),
            flags_marker: "flags:".to_string(),
            run_marker: "run:".to_string(),
        }
    }
}

impl DirectiveSyntax {
    /// Scans `content` line by line and collects every directive.
    ///
    /// Lines that are not comments are ignored, as are comments that carry
    /// neither marker. An unknown `run:` keyword is logged and ignored; the
    /// last recognized `run:` line wins.
    pub fn parse(&self, content: &str) -> Directives {
        let mut directives = Directives::default();

        for (index, line) in content.lines().enumerate() {
            let Some(comment) = line.trim().strip_prefix(self.comment_prefix.as_str()) else {
                continue;
            };
            let comment = comment.trim();

            if let Some(flags) = comment.strip_prefix(self.flags_marker.as_str()) {
                directives
                    .extra_flags
                    .extend(flags.split_whitespace().map(str::to_string));
            } else if let Some(mode) = comment.strip_prefix(self.run_marker.as_str()) {
                let keyword = mode.trim();
                match RunMode::from_keyword(keyword) {
                    Some(run_mode) => directives.run_mode = run_mode,
                    None => tracing::warn!(
                        line = index + 1,
                        keyword,
                        "ignoring unknown run-mode directive"
                    ),
                }
            }
        }

        tracing::debug!(?directives, "parsed test directives");
        directives
    }
}

/// Parses directives with the default `// flags:` / `// run:` syntax.
pub fn extract(content: &str) -> Directives {
    DirectiveSyntax::default().parse(content)
}

