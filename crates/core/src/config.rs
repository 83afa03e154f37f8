// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide configuration
//!
//! Built once at startup from `UPEM_*` variables. Loading goes through a
//! lookup function so callers (and tests) decide where values come from.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const ENV_DEFAULT_PAST_MINUTES: &str = "UPEM_DEFAULT_PAST_MINUTES";
pub const ENV_DEFAULT_FUTURE_MINUTES: &str = "UPEM_DEFAULT_FUTURE_MINUTES";
pub const ENV_LOG_INTERVAL: &str = "UPEM_LOG_INTERVAL";
pub const ENV_MAX_RETRIES: &str = "UPEM_MAX_RETRIES";
pub const ENV_RETRY_DELAY: &str = "UPEM_RETRY_DELAY";
pub const ENV_EXPORT_TIMEOUT: &str = "UPEM_EXPORT_TIMEOUT";
pub const ENV_KEEP_SPLIT_FILES: &str = "UPEM_KEEP_SPLIT_FILES";
pub const ENV_DOWNLOADS_DIR: &str = "UPEM_DOWNLOADS_DIR";
pub const ENV_LISTEN_ADDR: &str = "UPEM_LISTEN_ADDR";
pub const ENV_ARCHIVER_BIN: &str = "UPEM_ARCHIVER_BIN";
pub const ENV_FFMPEG_BIN: &str = "UPEM_FFMPEG_BIN";
pub const ENV_LOG_PATH: &str = "UPEM_LOG_PATH";
pub const ENV_ADDRESS: &str = "UPEM_UNIFI_PROTECT_ADDRESS";
pub const ENV_USERNAME: &str = "UPEM_UNIFI_PROTECT_USERNAME";
pub const ENV_PASSWORD: &str = "UPEM_UNIFI_PROTECT_PASSWORD";

const DEFAULT_PORT: u16 = 8888;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
}

/// Credentials for the archive tool
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub address: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Window sizes applied when a signal omits them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDefaults {
    pub past_minutes: i64,
    pub future_minutes: i64,
}

impl Default for EventDefaults {
    fn default() -> Self {
        Self {
            past_minutes: 5,
            future_minutes: 5,
        }
    }
}

/// Bounds for the export attempt loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, always at least one
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one
    pub delay: Duration,
    /// Upper bound on a single attempt's runtime
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
            attempt_timeout: Duration::from_secs(300),
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub defaults: EventDefaults,
    /// Interval of the background logging sweep
    pub log_interval: Duration,
    pub retry: RetryPolicy,
    /// Keep the per-clip files after a successful concatenation
    pub keep_split_files: bool,
    /// Root of the export directory tree
    pub downloads_root: PathBuf,
    pub listen_addr: SocketAddr,
    pub archiver_bin: PathBuf,
    pub ffmpeg_bin: PathBuf,
    /// Optional log file, in addition to stdout
    pub log_path: Option<PathBuf>,
    pub credentials: Credentials,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    ///
    /// Empty values count as unset. All missing credentials are reported
    /// together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |key: &str| match get(key) {
            Some(value) => value,
            None => {
                missing.push(key.to_string());
                String::new()
            }
        };
        let credentials = Credentials {
            address: required(ENV_ADDRESS),
            username: required(ENV_USERNAME),
            password: required(ENV_PASSWORD),
        };
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        let defaults = EventDefaults {
            past_minutes: parsed(&get, ENV_DEFAULT_PAST_MINUTES, 5)?,
            future_minutes: parsed(&get, ENV_DEFAULT_FUTURE_MINUTES, 5)?,
        };

        let max_retries: u32 = parsed(&get, ENV_MAX_RETRIES, 3)?;
        let retry = RetryPolicy {
            max_attempts: max_retries.max(1),
            delay: Duration::from_secs(parsed(&get, ENV_RETRY_DELAY, 5)?),
            attempt_timeout: Duration::from_secs(parsed(&get, ENV_EXPORT_TIMEOUT, 300)?),
        };

        let keep_split_files = match get(ENV_KEEP_SPLIT_FILES) {
            Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::Invalid {
                var: ENV_KEEP_SPLIT_FILES.to_string(),
                value,
            })?,
            None => true,
        };

        let listen_addr = match get(ENV_LISTEN_ADDR) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: ENV_LISTEN_ADDR.to_string(),
                value,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        };

        Ok(Self {
            defaults,
            log_interval: Duration::from_secs(parsed(&get, ENV_LOG_INTERVAL, 10)?),
            retry,
            keep_split_files,
            downloads_root: get(ENV_DOWNLOADS_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("downloads")),
            listen_addr,
            archiver_bin: get(ENV_ARCHIVER_BIN)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("protect-archiver")),
            ffmpeg_bin: get(ENV_FFMPEG_BIN)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("ffmpeg")),
            log_path: get(ENV_LOG_PATH).map(PathBuf::from),
            credentials,
        })
    }

    /// Log the loaded configuration, masking the password
    pub fn log_summary(&self) {
        tracing::info!("{}: {}", ENV_ADDRESS, self.credentials.address);
        tracing::info!("{}: {}", ENV_USERNAME, self.credentials.username);
        tracing::info!(
            "{}: {}",
            ENV_PASSWORD,
            if self.credentials.password.is_empty() {
                "Not Set"
            } else {
                "***"
            }
        );
        tracing::info!(
            past_minutes = self.defaults.past_minutes,
            future_minutes = self.defaults.future_minutes,
            log_interval_secs = self.log_interval.as_secs(),
            max_attempts = self.retry.max_attempts,
            retry_delay_secs = self.retry.delay.as_secs(),
            export_timeout_secs = self.retry.attempt_timeout.as_secs(),
            keep_split_files = self.keep_split_files,
            downloads_root = %self.downloads_root.display(),
            "configuration loaded"
        );
    }
}

fn parsed<G, T>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
