//! # Configuration Matrix Module / 配置矩阵模块
//!
//! Build configurations are the Cartesian product of independent flag axes
//! (optimization level, inlining, allocator, SIMD, LTO, debug info). The
//! product is exhaustive; nothing is sampled.
//!
//! 构建配置是多个独立标志轴的笛卡尔积（优化级别、内联、分配器、SIMD、LTO、调试信息）。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::core::error::MatrixError;

/// One independent dimension of build flags.
///
/// An empty choice means "flag absent" and contributes no token to the
/// command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    pub choices: Vec<String>,
}

impl Axis {
    pub fn new<I, S>(name: &str, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Choices with duplicates removed, first occurrence kept.
    pub fn distinct_choices(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.choices.len());
        for choice in &self.choices {
            let choice = choice.trim();
            if !seen.contains(&choice) {
                seen.push(choice);
            }
        }
        seen
    }
}

/// One point in the build-flag space: an ordered list of flag tokens.
/// 构建标志空间中的一个点：有序的标志列表。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    pub flags: Vec<String>,
}

impl Configuration {
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: flags
                .into_iter()
                .map(Into::into)
                .filter(|flag: &String| !flag.is_empty())
                .collect(),
        }
    }

    /// Parses a single explicit configuration such as `"-O0 -g"`.
    ///
    /// Shell quoting rules apply, so a flag containing spaces can be quoted.
    pub fn parse(text: &str) -> Result<Self, MatrixError> {
        shlex::split(text)
            .map(Configuration::new)
            .ok_or_else(|| MatrixError::InvalidOverride(text.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flags.is_empty() {
            f.write_str("(no flags)")
        } else {
            f.write_str(&self.flags.join(" "))
        }
    }
}

/// The axes exercised when no configuration file overrides them.
pub fn default_axes() -> Vec<Axis> {
    vec![
        Axis::new("optimization", ["-O0", "-O1", "-O2", "-O3", "-Os", "-Oz"]),
        Axis::new("inlining", ["", "-fno-inline-functions"]),
        Axis::new("allocator", ["-sMALLOC=dlmalloc", "-sMALLOC=emmalloc"]),
        Axis::new("simd", ["", "-msimd128"]),
        Axis::new("lto", ["", "-flto"]),
        Axis::new("debug", ["", "-g"]),
    ]
}

/// Rejects axis sets where one non-empty token belongs to two axes.
///
/// Such a set would let different choice combinations collapse into the same
/// flag list.
pub fn validate_axes(axes: &[Axis]) -> Result<(), MatrixError> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for axis in axes {
        for choice in axis.distinct_choices() {
            if choice.is_empty() {
                continue;
            }
            if let Some(first) = owners.insert(choice, &axis.name) {
                return Err(MatrixError::DuplicateToken {
                    token: choice.to_string(),
                    first: first.to_string(),
                    second: axis.name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Number of configurations `generate` will produce.
pub fn matrix_size(axes: &[Axis]) -> usize {
    axes.iter().map(|axis| axis.distinct_choices().len()).product()
}

/// Produces the full Cartesian product of `axes`.
///
/// The first axis varies slowest, the last axis fastest, and tokens appear in
/// axis order inside each configuration. No axes yields a single empty
/// configuration; an axis without choices yields none.
pub fn generate(axes: &[Axis]) -> Vec<Configuration> {
    let mut partials: Vec<Vec<String>> = vec![Vec::new()];

    for axis in axes {
        let choices = axis.distinct_choices();
        let mut next = Vec::with_capacity(partials.len() * choices.len());
        for partial in &partials {
            for choice in &choices {
                let mut flags = partial.clone();
                if !choice.is_empty() {
                    flags.push((*choice).to_string());
                }
                next.push(flags);
            }
        }
        partials = next;
    }

    partials.into_iter().map(|flags| Configuration { flags }).collect()
}

/// Where the configurations of a run come from.
///
/// This is the only place the exhaustive matrix can be swapped for a single
/// hand-picked configuration during fast iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixSource {
    Exhaustive(Vec<Axis>),
    Override(Configuration),
}

impl MatrixSource {
    pub fn configurations(&self) -> Vec<Configuration> {
        match self {
            MatrixSource::Exhaustive(axes) => generate(axes),
            MatrixSource::Override(configuration) => vec![configuration.clone()],
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, MatrixSource::Override(_))
    }
}
