//! # Em Matrix Runner Library / Em Matrix Runner 库
//!
//! This library provides the core functionality for the `em-matrix` tool,
//! a combinatorial test-matrix runner for Emscripten test programs. Every
//! discovered test is compiled under every build configuration and the
//! resulting artifact is executed in node or in the browser.
//!
//! 此库为 `em-matrix` 工具提供核心功能，
//! 这是一个面向 Emscripten 测试程序的组合测试矩阵运行器。
//!
//! ## Modules / 模块
//!
//! - `core` - Matrix generation, test discovery, directives and the compile/run pipeline
//! - `infra` - Infrastructure services like command execution and file system operations
//! - `reporting` - Console, HTML and JSON reporting
//! - `cli` - Command-line interface
//! - `commands` - Implementations of the `run` and `init` commands
//!
//! - `core` - 矩阵生成、测试发现、指令解析以及编译/运行流水线
//! - `infra` - 基础设施服务，如命令执行和文件系统操作
//! - `reporting` - 控制台、HTML 和 JSON 报告
//! - `cli` - 命令行接口
//! - `commands` - `run` 和 `init` 命令的实现

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

/// Picks the language used for console messages.
///
/// An explicit language wins. Otherwise the system locale is detected and
/// matched first as a full locale (e.g. "zh-CN"), then by its language part
/// (e.g. "en" from "en-US"), and finally falls back to "en".
pub fn resolve_locale(explicit: Option<&str>) -> String {
    if let Some(lang) = explicit.filter(|l| !l.is_empty()) {
        return lang.to_string();
    }

    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale.as_str()) {
        return locale;
    }
    locale
        .split('-')
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
        .to_string()
}

/// Installs a `tracing` subscriber writing diagnostics to stderr.
///
/// Diagnostics are opt-in: nothing is installed unless `RUST_LOG` is set, so
/// regular console output stays clean.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .try_init();
    }
}
