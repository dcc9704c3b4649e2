// crates/scaffold-config/src/config.rs
// ============================================================================
// Module: Schema Scaffold Configuration
// Description: Configuration loading and validation for the pipeline.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: scaffold-core, scaffold-store-http, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file resolved from an explicit path,
//! the `SCAFFOLD_CONFIG` environment variable, or the default filename, in
//! that order. Every numeric knob is validated against a bounded range and
//! unknown fields are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use scaffold_core::PacerConfig;
use scaffold_store_http::HttpRecordStoreConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "scaffold.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SCAFFOLD_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;
/// Default environment variable holding the store auth token.
pub(crate) const DEFAULT_AUTH_TOKEN_ENV: &str = "SCAFFOLD_STORE_TOKEN";
/// Minimum allowed spacing between store calls in milliseconds.
pub(crate) const MIN_CALL_INTERVAL_MS: u64 = 50;
/// Maximum allowed spacing between store calls in milliseconds.
pub(crate) const MAX_CALL_INTERVAL_MS: u64 = 10_000;
/// Default spacing between store calls in milliseconds.
pub(crate) const DEFAULT_CALL_INTERVAL_MS: u64 = 350;
/// Maximum allowed retries for a throttled store call.
pub(crate) const MAX_RETRY_ATTEMPTS: u32 = 8;
/// Default retries for a throttled store call.
pub(crate) const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
/// Minimum store connect timeout in milliseconds.
pub(crate) const MIN_CONNECT_TIMEOUT_MS: u64 = 100;
/// Maximum store connect timeout in milliseconds.
pub(crate) const MAX_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// Default store connect timeout in milliseconds.
pub(crate) const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 1_000;
/// Minimum store request timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 500;
/// Maximum store request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 60_000;
/// Default store request timeout in milliseconds.
pub(crate) const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;
/// Maximum progress event buffer capacity.
pub(crate) const MAX_EVENT_BUFFER: usize = 1_024;
/// Default progress event buffer capacity.
pub(crate) const DEFAULT_EVENT_BUFFER: usize = 32;
/// Default user agent for store requests.
pub(crate) const DEFAULT_USER_AGENT: &str = "scaffold/0.1";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Schema Scaffold configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaffoldConfig {
    /// Record store connection settings.
    #[serde(default)]
    pub store: StoreSettings,
    /// Outbound call pacing settings.
    #[serde(default)]
    pub pacing: PacingSettings,
    /// Progress event stream settings.
    #[serde(default)]
    pub events: EventSettings,
}

/// Record store connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSettings {
    /// Base URL of the record store API.
    #[serde(default)]
    pub base_url: String,
    /// Environment variable holding the bearer token.
    #[serde(default = "default_auth_token_env")]
    pub auth_token_env: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Full-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_token_env: DEFAULT_AUTH_TOKEN_ENV.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// Outbound call pacing settings.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PacingSettings {
    /// Minimum spacing between store calls in milliseconds.
    #[serde(default = "default_call_interval_ms")]
    pub min_interval_ms: u64,
    /// Retries granted to a throttled store call.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_CALL_INTERVAL_MS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }
}

/// Progress event stream settings.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventSettings {
    /// Bounded channel capacity for progress events.
    #[serde(default = "default_event_buffer")]
    pub buffer: usize,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

// ============================================================================
// SECTION: Serde Defaults
// ============================================================================

/// Default for [`StoreSettings::auth_token_env`].
fn default_auth_token_env() -> String {
    DEFAULT_AUTH_TOKEN_ENV.to_string()
}

/// Default for [`StoreSettings::connect_timeout_ms`].
const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Default for [`StoreSettings::request_timeout_ms`].
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Default for [`PacingSettings::min_interval_ms`].
const fn default_call_interval_ms() -> u64 {
    DEFAULT_CALL_INTERVAL_MS
}

/// Default for [`PacingSettings::retry_attempts`].
const fn default_retry_attempts() -> u32 {
    DEFAULT_RETRY_ATTEMPTS
}

/// Default for [`EventSettings::buffer`].
const fn default_event_buffer() -> usize {
    DEFAULT_EVENT_BUFFER
}

// ============================================================================
// SECTION: Loading and Validation
// ============================================================================

/// Loads and validates configuration.
///
/// The path is resolved from `path`, then [`CONFIG_ENV_VAR`], then
/// [`DEFAULT_CONFIG_NAME`] in the working directory.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file is missing, oversized, malformed,
/// or fails validation.
pub fn load(path: Option<&Path>) -> Result<ScaffoldConfig, ConfigError> {
    let path = resolve_path(path);
    let metadata = fs::metadata(&path).map_err(|err| ConfigError::Read {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::TooLarge {
            size: metadata.len(),
            limit: MAX_CONFIG_FILE_SIZE,
        });
    }
    let raw = fs::read_to_string(&path).map_err(|err| ConfigError::Read {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    let config: ScaffoldConfig =
        toml::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Resolves the configuration path from argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    if let Some(path) = path {
        return path.to_path_buf();
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR)
        && !env_path.is_empty()
    {
        return PathBuf::from(env_path);
    }
    PathBuf::from(DEFAULT_CONFIG_NAME)
}

impl ScaffoldConfig {
    /// Validates every setting against its bounded range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        let url = Url::parse(&self.store.base_url)
            .map_err(|err| ConfigError::InvalidBaseUrl(err.to_string()))?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }
        if self.store.auth_token_env.is_empty() {
            return Err(ConfigError::MissingAuthTokenEnv);
        }
        check_range(
            "store.connect_timeout_ms",
            self.store.connect_timeout_ms,
            MIN_CONNECT_TIMEOUT_MS,
            MAX_CONNECT_TIMEOUT_MS,
        )?;
        check_range(
            "store.request_timeout_ms",
            self.store.request_timeout_ms,
            MIN_REQUEST_TIMEOUT_MS,
            MAX_REQUEST_TIMEOUT_MS,
        )?;
        check_range(
            "pacing.min_interval_ms",
            self.pacing.min_interval_ms,
            MIN_CALL_INTERVAL_MS,
            MAX_CALL_INTERVAL_MS,
        )?;
        check_range(
            "pacing.retry_attempts",
            u64::from(self.pacing.retry_attempts),
            1,
            u64::from(MAX_RETRY_ATTEMPTS),
        )?;
        if self.events.buffer < 1 || self.events.buffer > MAX_EVENT_BUFFER {
            return Err(ConfigError::OutOfRange {
                name: "events.buffer".to_string(),
                value: u64::try_from(self.events.buffer).unwrap_or(u64::MAX),
                min: 1,
                max: u64::try_from(MAX_EVENT_BUFFER).unwrap_or(u64::MAX),
            });
        }
        Ok(())
    }

    /// Returns the pacer configuration derived from pacing settings.
    #[must_use]
    pub const fn pacer_config(&self) -> PacerConfig {
        PacerConfig {
            min_interval: Duration::from_millis(self.pacing.min_interval_ms),
            max_retries: self.pacing.retry_attempts,
        }
    }

    /// Returns the HTTP store configuration with the resolved auth token.
    #[must_use]
    pub fn store_config(&self, auth_token: Option<String>) -> HttpRecordStoreConfig {
        HttpRecordStoreConfig {
            base_url: self.store.base_url.clone(),
            auth_token,
            connect_timeout: Duration::from_millis(self.store.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.store.request_timeout_ms),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Resolves the store auth token from the configured environment variable.
    #[must_use]
    pub fn resolve_auth_token(&self) -> Option<String> {
        env::var(&self.store.auth_token_env).ok().filter(|token| !token.is_empty())
    }
}

/// Checks one numeric setting against an inclusive range.
fn check_range(name: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name: name.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Config Errors
// ============================================================================

/// Configuration loading and validation failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {message}")]
    Read {
        /// Path that failed to load.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Config file exceeds the size limit.
    #[error("config file is {size} bytes; limit is {limit}")]
    TooLarge {
        /// Observed file size.
        size: u64,
        /// Maximum allowed size.
        limit: u64,
    },
    /// Config file failed to parse.
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// Store base URL is missing.
    #[error("store.base_url is required")]
    MissingBaseUrl,
    /// Store base URL is malformed or uses an unsupported scheme.
    #[error("store.base_url is invalid: {0}")]
    InvalidBaseUrl(String),
    /// Auth token environment variable name is empty.
    #[error("store.auth_token_env must not be empty")]
    MissingAuthTokenEnv,
    /// A numeric setting is outside its allowed range.
    #[error("{name} = {value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        /// Setting name.
        name: String,
        /// Observed value.
        value: u64,
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
    },
}
