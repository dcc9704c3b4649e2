// crates/scaffold-store-http/src/tests.rs
// ============================================================================
// Module: HTTP Store Unit Tests
// Description: Tests for header parsing and error-body extraction.
// Purpose: Pin the retry-hint and rejection-message edge cases.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Unit tests for the pure helpers of the HTTP client. Endpoint behavior is
//! exercised by the integration tests under `tests/`.

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

use std::time::Duration;

use crate::client::extract_message;
use crate::client::parse_retry_after;

// ============================================================================
// SECTION: Retry-After Parsing Tests
// ============================================================================

/// Tests numeric retry hints parse as whole seconds.
#[test]
fn retry_after_parses_whole_seconds() {
    assert_eq!(parse_retry_after(Some("7")), Some(Duration::from_secs(7)));
    assert_eq!(parse_retry_after(Some(" 12 ")), Some(Duration::from_secs(12)));
    assert_eq!(parse_retry_after(Some("0")), Some(Duration::ZERO));
}

/// Tests missing hints yield no duration.
#[test]
fn retry_after_absent_yields_none() {
    assert_eq!(parse_retry_after(None), None);
}

/// Tests non-numeric hints degrade to no duration.
#[test]
fn retry_after_malformed_yields_none() {
    assert_eq!(parse_retry_after(Some("soon")), None);
    assert_eq!(parse_retry_after(Some("1.5")), None);
    assert_eq!(parse_retry_after(Some("-3")), None);
    assert_eq!(parse_retry_after(Some("Wed, 21 Oct 2026 07:28:00 GMT")), None);
}

// ============================================================================
// SECTION: Error Message Extraction Tests
// ============================================================================

/// Tests JSON bodies surface their message field.
#[test]
fn extract_message_prefers_json_message_field() {
    let body = r#"{"code":"validation_error","message":"title is required"}"#;
    assert_eq!(extract_message(body), "title is required");
}

/// Tests non-JSON bodies pass through trimmed.
#[test]
fn extract_message_falls_back_to_body_text() {
    assert_eq!(extract_message("  upstream unavailable \n"), "upstream unavailable");
}

/// Tests empty bodies yield a placeholder.
#[test]
fn extract_message_handles_empty_bodies() {
    assert_eq!(extract_message(""), "no error detail");
    assert_eq!(extract_message("   "), "no error detail");
}

/// Tests JSON bodies without a message field fall back to raw text.
#[test]
fn extract_message_handles_json_without_message() {
    let body = r#"{"code":"oops"}"#;
    assert_eq!(extract_message(body), body);
}
