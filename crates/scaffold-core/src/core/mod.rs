// crates/scaffold-core/src/core/mod.rs
// ============================================================================
// Module: Schema Scaffold Core Types
// Description: Blueprint model, identifiers, progress events, and translation.
// Purpose: Group the pure data and translation layers of the pipeline.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The `core` module holds everything that is pure data or pure computation:
//! the schema blueprint supplied by the caller, the opaque identifier types,
//! the runtime registry filled in during provisioning, the progress event
//! contract, and the property translator.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod blueprint;
pub mod identifiers;
pub mod progress;
pub mod registry;
pub mod translate;
