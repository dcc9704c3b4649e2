// crates/scaffold-store-http/src/lib.rs
// ============================================================================
// Module: Schema Scaffold HTTP Store Library
// Description: HTTP record-store client for the provisioning pipeline.
// Purpose: Implement the RecordStore interface over the store's network API.
// Dependencies: async-trait, reqwest, scaffold-core, serde, serde_json
// ============================================================================

//! ## Overview
//! This crate provides [`HttpRecordStore`], the production implementation of
//! [`scaffold_core::RecordStore`] over the record store's HTTP API.
//! Invariants:
//! - Every response status is classified into the [`scaffold_core::StoreError`]
//!   taxonomy; HTTP 429 becomes `Throttled` with the parsed `Retry-After`
//!   hint, everything else non-successful becomes `Rejected`.
//! - The client performs no retries of its own; pacing and retry policy
//!   belong to the pipeline's pacer.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::HttpRecordStore;
pub use client::HttpRecordStoreConfig;

#[cfg(test)]
mod tests;
