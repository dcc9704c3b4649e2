// crates/scaffold-config/src/lib.rs
// ============================================================================
// Module: Schema Scaffold Config Library
// Description: Strict TOML configuration for the provisioning pipeline.
// Purpose: Load and validate store, pacing, and event-stream settings.
// Dependencies: scaffold-core, scaffold-store-http, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits and
//! bounded ranges for every knob. Missing or invalid configuration fails
//! closed. Secrets never live in the file: the store auth token is resolved
//! from the environment variable the config names.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::EventSettings;
pub use config::PacingSettings;
pub use config::ScaffoldConfig;
pub use config::StoreSettings;
pub use config::load;
