//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the runner,
//! including external command execution, artifact directories and i18n.
//!
//! 此模块为运行器提供基础设施服务，
//! 包括外部命令执行、产物目录和国际化支持。

pub mod command;
pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
