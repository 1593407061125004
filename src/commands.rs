//! # Commands Module / 命令模块
//!
//! Implementations of the `run` and `init` commands.
//!
//! `run` 和 `init` 命令的实现。

pub mod init;
pub mod run;
