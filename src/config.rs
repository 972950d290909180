//! Replay Configuration
//!
//! Defaults, overridden by environment variables, overridden by CLI flags.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do with events that arrive after MATCH_END.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterEnd {
    /// Apply them like any other event.
    #[default]
    Apply,
    /// Drop them; only a new MATCH_START is accepted.
    Ignore,
}

impl FromStr for AfterEnd {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apply" => Ok(AfterEnd::Apply),
            "ignore" => Ok(AfterEnd::Ignore),
            _ => Err(ConfigError::InvalidAfterEnd(s.to_string())),
        }
    }
}

impl fmt::Display for AfterEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AfterEnd::Apply => f.write_str("apply"),
            AfterEnd::Ignore => f.write_str("ignore"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Unknown after-end policy.
    #[error("invalid after-end policy {0:?} (expected \"apply\" or \"ignore\")")]
    InvalidAfterEnd(String),
    /// Boolean variable with an unusable value.
    #[error("invalid boolean {value:?} for {var}")]
    InvalidBool {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}

/// Replay configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Directory holding numbered `*.json` event files.
    pub data_dir: PathBuf,
    /// Post-end event policy.
    pub after_end: AfterEnd,
    /// Pretty-print the final report.
    pub pretty: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            after_end: AfterEnd::Apply,
            pretty: true,
        }
    }
}

impl ReplayConfig {
    /// Data directory variable.
    pub const ENV_DATA_DIR: &'static str = "MATCH_REPLAY_DATA_DIR";
    /// After-end policy variable.
    pub const ENV_AFTER_END: &'static str = "MATCH_REPLAY_AFTER_END";
    /// Pretty-print variable.
    pub const ENV_PRETTY: &'static str = "MATCH_REPLAY_PRETTY";

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(Self::ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(policy) = lookup(Self::ENV_AFTER_END).filter(|v| !v.is_empty()) {
            config.after_end = policy.parse()?;
        }
        if let Some(pretty) = lookup(Self::ENV_PRETTY).filter(|v| !v.is_empty()) {
            config.pretty = parse_bool(Self::ENV_PRETTY, &pretty)?;
        }

        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
