// crates/scaffold-config/tests/config_validation.rs
// ============================================================================
// Module: Config Validation Tests
// Description: Parsing, defaulting, and bounds tests for ScaffoldConfig.
// Purpose: Pin the fail-closed behavior of configuration loading.
// Dependencies: scaffold-config, tempfile, toml
// ============================================================================

//! ## Overview
//! Exercises [`scaffold_config::load`] and [`scaffold_config::ScaffoldConfig`]
//! validation: defaults, bounded ranges, unknown-field rejection, and size
//! limits.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::io::Write;
use std::time::Duration;

use scaffold_config::ConfigError;
use scaffold_config::ScaffoldConfig;
use scaffold_config::load;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a TOML string into a config for tests.
fn config_from_toml(toml_str: &str) -> Result<ScaffoldConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal valid config body.
fn minimal_toml() -> &'static str {
    "[store]\nbase_url = \"https://store.example.com\"\n"
}

/// Writes a config body to a temporary file and loads it.
fn load_from_temp(body: &str) -> Result<ScaffoldConfig, ConfigError> {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(body.as_bytes()).expect("write config");
    load(Some(file.path()))
}

// ============================================================================
// SECTION: Defaults Tests
// ============================================================================

/// Tests a minimal config picks up every documented default.
#[test]
fn minimal_config_applies_defaults() {
    let config = config_from_toml(minimal_toml()).expect("config parses");
    config.validate().expect("config is valid");

    assert_eq!(config.store.auth_token_env, "SCAFFOLD_STORE_TOKEN");
    assert_eq!(config.store.connect_timeout_ms, 1_000);
    assert_eq!(config.store.request_timeout_ms, 15_000);
    assert_eq!(config.pacing.min_interval_ms, 350);
    assert_eq!(config.pacing.retry_attempts, 5);
    assert_eq!(config.events.buffer, 32);
}

/// Tests derived pacer and store configs carry the settings through.
#[test]
fn derived_configs_reflect_settings() {
    let config = config_from_toml(
        "[store]\nbase_url = \"https://store.example.com/\"\n\
         [pacing]\nmin_interval_ms = 500\nretry_attempts = 3\n",
    )
    .expect("config parses");
    config.validate().expect("config is valid");

    let pacer = config.pacer_config();
    assert_eq!(pacer.min_interval, Duration::from_millis(500));
    assert_eq!(pacer.max_retries, 3);

    let store = config.store_config(Some("token".to_string()));
    assert_eq!(store.base_url, "https://store.example.com/");
    assert_eq!(store.auth_token.as_deref(), Some("token"));
    assert_eq!(store.connect_timeout, Duration::from_millis(1_000));
}

// ============================================================================
// SECTION: Rejection Tests
// ============================================================================

/// Tests an empty config fails closed on the missing base URL.
#[test]
fn missing_base_url_is_rejected() {
    let config = config_from_toml("").expect("empty config parses");
    assert!(matches!(config.validate(), Err(ConfigError::MissingBaseUrl)));
}

/// Tests unsupported base URL schemes are rejected.
#[test]
fn non_http_base_url_is_rejected() {
    let config =
        config_from_toml("[store]\nbase_url = \"ftp://store.example.com\"\n").expect("parses");
    assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl(_))));
}

/// Tests unknown fields are rejected rather than ignored.
#[test]
fn unknown_fields_are_rejected() {
    let result = config_from_toml("[store]\nbase_url = \"https://x\"\nunknown_knob = 1\n");
    assert!(result.is_err());
}

/// Tests pacing interval bounds fail closed on both ends.
#[test]
fn pacing_interval_out_of_range_is_rejected() {
    for interval in ["10", "60000"] {
        let body = format!(
            "[store]\nbase_url = \"https://store.example.com\"\n\
             [pacing]\nmin_interval_ms = {interval}\n"
        );
        let config = config_from_toml(&body).expect("config parses");
        match config.validate() {
            Err(ConfigError::OutOfRange {
                name, ..
            }) => assert_eq!(name, "pacing.min_interval_ms"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

/// Tests zero retry attempts are rejected.
#[test]
fn zero_retry_attempts_is_rejected() {
    let config = config_from_toml(
        "[store]\nbase_url = \"https://store.example.com\"\n[pacing]\nretry_attempts = 0\n",
    )
    .expect("config parses");
    assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));
}

/// Tests a zero event buffer is rejected.
#[test]
fn zero_event_buffer_is_rejected() {
    let config = config_from_toml(
        "[store]\nbase_url = \"https://store.example.com\"\n[events]\nbuffer = 0\n",
    )
    .expect("config parses");
    assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));
}

// ============================================================================
// SECTION: File Loading Tests
// ============================================================================

/// Tests loading a valid file from an explicit path.
#[test]
fn load_reads_explicit_path() {
    let config = load_from_temp(minimal_toml()).expect("config loads");
    assert_eq!(config.store.base_url, "https://store.example.com");
}

/// Tests a missing file fails with a read error.
#[test]
fn load_missing_file_is_rejected() {
    let result = load(Some(std::path::Path::new("/nonexistent/scaffold.toml")));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

/// Tests malformed TOML fails with a parse error.
#[test]
fn load_malformed_toml_is_rejected() {
    let result = load_from_temp("[store\nbase_url = ");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

/// Tests an oversized config file fails closed.
#[test]
fn load_oversized_file_is_rejected() {
    let mut body = String::from(minimal_toml());
    body.push_str(&"# padding\n".repeat(10_000));
    let result = load_from_temp(&body);
    assert!(matches!(result, Err(ConfigError::TooLarge { .. })));
}
