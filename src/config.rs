//! Runtime configuration: data URL, refresh interval, request timeout
//!
//! Native builds read `FORK_CHOICE_*` environment variables and CLI flags,
//! the browser build reads `window.__fork_choice_url`.

use crate::core::DEFAULT_REFRESH_INTERVAL;
#[cfg(feature = "cli")]
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default snapshot endpoint (override with FORK_CHOICE_URL)
pub const DEFAULT_DATA_URL: &str = "http://127.0.0.1:5000/data";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_URL: &str = "FORK_CHOICE_URL";
pub const ENV_REFRESH_MS: &str = "FORK_CHOICE_REFRESH_MS";
pub const ENV_TIMEOUT_MS: &str = "FORK_CHOICE_TIMEOUT_MS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name}: expected a positive number of milliseconds, got {value:?}")]
    InvalidMillis { name: String, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub data_url: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_URL).filter(|u| !u.trim().is_empty()) {
            config.data_url = url.trim().to_string();
        }
        if let Some(ms) = lookup(ENV_REFRESH_MS) {
            config.refresh_interval = parse_millis(ENV_REFRESH_MS, &ms)?;
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS) {
            config.request_timeout = parse_millis(ENV_TIMEOUT_MS, &ms)?;
        }
        Ok(config)
    }

    /// Request timeout for APIs that take whole milliseconds, saturating
    pub fn request_timeout_ms(&self) -> u32 {
        u32::try_from(self.request_timeout.as_millis()).unwrap_or(u32::MAX)
    }

    /// Data endpoint for a dashboard served from `origin`
    pub fn for_origin(origin: &str) -> Self {
        Self {
            data_url: format!("{}/data", origin.trim_end_matches('/')),
            ..Self::default()
        }
    }
}

/// Headless CLI invocation
#[cfg(feature = "cli")]
#[derive(clap::Parser, Clone, Debug, PartialEq)]
#[command(name = "fcv-cli")]
#[command(about = "Headless fork-choice tree monitor")]
pub struct CliArgs {
    /// Snapshot endpoint
    #[arg(long, env = ENV_URL, default_value = DEFAULT_DATA_URL)]
    pub url: String,

    /// Refresh interval in milliseconds
    #[arg(long, env = ENV_REFRESH_MS, default_value = "6000", value_parser = millis_arg)]
    pub interval_ms: Duration,

    /// Per-request timeout in milliseconds
    #[arg(long, env = ENV_TIMEOUT_MS, default_value = "10000", value_parser = millis_arg)]
    pub timeout_ms: Duration,

    /// Write the rendered scene here after every refresh
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Exit after the first applied snapshot
    #[arg(long)]
    pub once: bool,
}

#[cfg(feature = "cli")]
impl CliArgs {
    pub fn config(&self) -> Config {
        let url = self.url.trim();
        Config {
            data_url: if url.is_empty() { DEFAULT_DATA_URL } else { url }.to_string(),
            refresh_interval: self.interval_ms,
            request_timeout: self.timeout_ms,
        }
    }
}

#[cfg(feature = "cli")]
fn millis_arg(value: &str) -> Result<Duration, ConfigError> {
    parse_millis("milliseconds", value)
}

fn parse_millis(name: &str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidMillis {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
