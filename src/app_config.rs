use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::timecode::SampleRate;

/// Application configuration module
/// This module handles the configuration of the parser and of the
/// command line tool, loaded from a JSON file.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Parser behaviour on malformed input
    #[serde(default)]
    pub parser: ParserConfig,

    /// What to do with a parsed document before writing it
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How the section parser reacts to structural errors
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    // @field: Fail the whole parse on the first structural error
    #[serde(default)]
    pub strict: bool,

    // @field: Stop reading a section at its first structural error
    #[serde(default)]
    pub stop_on_error: bool,
}

impl ParserConfig {
    // @returns: Config that escalates structural errors
    pub fn strict() -> Self {
        Self { strict: true, stop_on_error: false }
    }
}

/// Event list ordering applied before writing
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    // @order: Keep document order
    #[default]
    None,
    // @order: Destination channel, then destination-in
    Channel,
    // @order: Destination-in
    Time,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Channel => "channel",
            Self::Time => "time",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "channel" => Ok(Self::Channel),
            "time" => Ok(Self::Time),
            _ => Err(anyhow!("Invalid sort order: {}", s)),
        }
    }
}

/// Output settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    // @field: Event list ordering
    #[serde(default)]
    pub sort: SortOrder,

    // @field: Sample rate name to convert every position to, e.g. S96000
    #[serde(default)]
    pub resample_to: Option<String>,

    // @field: Appended to the input file stem for rewritten files
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sort: SortOrder::default(),
            resample_to: None,
            output_suffix: default_output_suffix(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_output_suffix() -> String {
    "normalized".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.target_sample_rate()?;

        if self.output.output_suffix.trim().is_empty() {
            return Err(anyhow!("Output suffix must not be empty"));
        }

        if self.output.output_suffix.contains(['/', '\\']) {
            return Err(anyhow!("Output suffix must not contain path separators: {}", self.output.output_suffix));
        }

        Ok(())
    }

    /// Sample rate named by `output.resample_to`, if any
    pub fn target_sample_rate(&self) -> Result<Option<SampleRate>> {
        match &self.output.resample_to {
            Some(name) => SampleRate::from_name(name)
                .map(Some)
                .ok_or_else(|| anyhow!("Unknown sample rate name: {}", name)),
            None => Ok(None),
        }
    }
}
