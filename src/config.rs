//! Engine configuration
//!
//! Settings come from, in increasing priority:
//! - Defaults
//! - A serialized `FsmConfig` (any serde format the host uses)
//! - Environment variables (`STATEMAP_DEBUG`, `STATEMAP_HISTORY`,
//!   `STATEMAP_HISTORY_LIMIT`)

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEBUG_VAR: &str = "STATEMAP_DEBUG";
pub const HISTORY_VAR: &str = "STATEMAP_HISTORY";
pub const HISTORY_LIMIT_VAR: &str = "STATEMAP_HISTORY_LIMIT";

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}")]
    InvalidValue { var: String, value: String },
}

/// Per-machine settings applied by [`StateMachine::with_config`](crate::engine::StateMachine::with_config).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FsmConfig {
    /// Initial value of the debug flag
    #[serde(default)]
    pub debug: bool,

    /// Keep an in-memory log of committed transitions
    #[serde(default)]
    pub record_history: bool,

    /// Upper bound on retained history records
    #[serde(default)]
    pub history_limit: Option<usize>,
}

impl FsmConfig {
    /// Overlay settings from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_lookup(|var| std::env::var(var).ok())
    }

    /// Overlay settings from an arbitrary variable lookup.
    pub fn with_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(DEBUG_VAR) {
            self.debug = parse_flag(DEBUG_VAR, &value)?;
        }
        if let Some(value) = lookup(HISTORY_VAR) {
            self.record_history = parse_flag(HISTORY_VAR, &value)?;
        }
        if let Some(value) = lookup(HISTORY_LIMIT_VAR) {
            let limit = value
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid(HISTORY_LIMIT_VAR, &value))?;
            self.history_limit = Some(limit);
            self.record_history = true;
        }
        Ok(self)
    }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(var, value)),
    }
}

fn invalid(var: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.to_string(),
        value: value.to_string(),
    }
}
