//! # Matrix Initialization Module / 矩阵初始化模块
//!
//! Writes a starter `EmMatrix.toml`, either straight from the built-in
//! defaults or through a short interactive wizard asking for the toolchain
//! paths and which axes to exercise.
//!
//! 生成初始的 `EmMatrix.toml`，可以直接使用内置默认值，
//! 也可以通过简短的交互式向导询问工具链路径以及要测试的轴。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::MatrixConfig;
use crate::core::matrix;
use crate::infra::t;

/// Runs the wizard (or its non-interactive shortcut) and writes `config_path`.
///
/// An existing file is only replaced with `force` or after confirmation.
pub fn run_init_wizard(language: &str, config_path: &Path, non_interactive: bool, force: bool) -> Result<()> {
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!("\n{}", t!("init_wizard_welcome", locale = language).cyan().bold());
        println!("{}", t!("init_wizard_description", locale = language));
    }

    if config_path.exists() && !force {
        if non_interactive {
            anyhow::bail!(t!(
                "init_file_exists",
                locale = language,
                path = config_path.display()
            )
            .to_string());
        }
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init_overwrite_prompt", locale = language, path = config_path.display()))
            .default(false)
            .interact()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init_aborted", locale = language));
            return Ok(());
        }
    }

    let mut config = MatrixConfig::default();

    if !non_interactive {
        prompt_toolchain(&theme, &mut config, language)?;
        prompt_axes(&theme, &mut config, language)?;
    }

    write_config(config_path, &config, language)
}

fn prompt_text(theme: &ColorfulTheme, prompt: String, default: String) -> Result<String> {
    Input::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .context("Failed to read input")
}

fn prompt_toolchain(theme: &ColorfulTheme, config: &mut MatrixConfig, language: &str) -> Result<()> {
    let executor = &mut config.executor;
    executor.compiler = prompt_text(
        theme,
        t!("init_compiler_prompt", locale = language).to_string(),
        executor.compiler.clone(),
    )?;
    executor.console_engine = prompt_text(
        theme,
        t!("init_console_engine_prompt", locale = language).to_string(),
        executor.console_engine.clone(),
    )?;
    executor.browser_harness = prompt_text(
        theme,
        t!("init_browser_harness_prompt", locale = language).to_string(),
        executor.browser_harness.clone(),
    )?;
    let test_dir = prompt_text(
        theme,
        t!("init_test_dir_prompt", locale = language).to_string(),
        config.test_dir.display().to_string(),
    )?;
    config.test_dir = PathBuf::from(test_dir);
    Ok(())
}

fn prompt_axes(theme: &ColorfulTheme, config: &mut MatrixConfig, language: &str) -> Result<()> {
    let axes = matrix::default_axes();
    let labels: Vec<String> = axes
        .iter()
        .map(|axis| format!("{} ({})", axis.name, axis.distinct_choices().len()))
        .collect();
    let defaults = vec![true; axes.len()];

    let selections = MultiSelect::with_theme(theme)
        .with_prompt(t!("init_axes_prompt", locale = language))
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;

    if selections.is_empty() {
        println!("{}", t!("init_no_axes_selected", locale = language).yellow());
    }

    config.axes = selections.into_iter().map(|i| axes[i].clone()).collect();
    println!(
        "{}",
        t!(
            "init_matrix_size",
            locale = language,
            count = matrix::matrix_size(&config.axes)
        )
    );
    Ok(())
}

/// Serializes `config` to `path`.
pub fn write_config(path: &Path, config: &MatrixConfig, language: &str) -> Result<()> {
    let toml_string = config.to_toml()?;
    fs::write(path, toml_string)
        .with_context(|| t!("init_write_failed", locale = language, path = path.display()).to_string())?;
    println!(
        "{}",
        t!("init_success", locale = language, path = path.display()).green()
    );
    Ok(())
}
