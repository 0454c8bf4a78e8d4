//! Configuration loading from disk and the process environment.
//!
//! # Responsibilities
//! - Parse a TOML file into [`GracefulConfig`]
//! - Overlay the `*_SECONDS` / `ENABLE_METRICS` environment variables
//!
//! Environment values that fail to parse, or fall outside the accepted range,
//! are ignored and the previous value is kept.

use std::fs;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::config::schema::GracefulConfig;

pub const DRAIN_TIMEOUT_VAR: &str = "DRAIN_TIMEOUT_SECONDS";
pub const HARD_STOP_TIMEOUT_VAR: &str = "HARD_STOP_TIMEOUT_SECONDS";
pub const LOAD_BALANCER_DELAY_VAR: &str = "LOAD_BALANCER_DELAY_SECONDS";
pub const ENABLE_METRICS_VAR: &str = "ENABLE_METRICS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GracefulConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GracefulConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

impl GracefulConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay environment-style settings read through `lookup`.
    ///
    /// Drain and hard-stop timeouts must be positive integers; the load
    /// balancer delay may be zero. `ENABLE_METRICS` accepts the usual boolean
    /// spellings (`1`, `t`, `TRUE`, `false`, ...).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = lookup(DRAIN_TIMEOUT_VAR).and_then(|v| parse_secs(&v)) {
            if secs > 0 {
                self.drain_timeout = Duration::from_secs(secs);
            }
        }

        if let Some(secs) = lookup(HARD_STOP_TIMEOUT_VAR).and_then(|v| parse_secs(&v)) {
            if secs > 0 {
                self.hard_stop_timeout = Duration::from_secs(secs);
            }
        }

        if let Some(secs) = lookup(LOAD_BALANCER_DELAY_VAR).and_then(|v| parse_secs(&v)) {
            self.load_balancer_delay = Duration::from_secs(secs);
        }

        if let Some(enable) = lookup(ENABLE_METRICS_VAR).and_then(|v| parse_bool(&v)) {
            self.enable_metrics = enable;
        }

        self
    }
}

/// Longest accepted environment duration: whole seconds whose nanosecond
/// count still fits in an `i64` (about 292 years).
const MAX_ENV_SECS: u64 = i64::MAX as u64 / 1_000_000_000;

/// Non-negative whole seconds up to [`MAX_ENV_SECS`]. Negative numbers parse
/// but are rejected here.
fn parse_secs(value: &str) -> Option<u64> {
    let secs: i64 = value.parse().ok()?;
    u64::try_from(secs).ok().filter(|secs| *secs <= MAX_ENV_SECS)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
