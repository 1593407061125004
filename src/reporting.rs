//! # Reporting Module / 报告模块
//!
//! This module handles the display of progress and results on the console, as
//! well as the optional HTML and JSON report files.
//!
//! 此模块负责在控制台上显示进度和结果，以及可选的 HTML 和 JSON 报告文件。

pub mod console;
pub mod html;
pub mod json;

// Re-export common reporting functions
pub use console::{print_final_report, print_summary};
pub use html::generate_html_report;
pub use json::generate_json_report;
