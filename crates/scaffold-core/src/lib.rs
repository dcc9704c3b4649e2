// crates/scaffold-core/src/lib.rs
// ============================================================================
// Module: Schema Scaffold Core Library
// Description: Schema model, property translation, pacing, and provisioning.
// Purpose: Provide the record-store-agnostic provisioning pipeline.
// Dependencies: async-trait, serde, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! Schema Scaffold Core turns a [`SchemaBlueprint`] into live databases inside
//! an external record store. The pipeline is split into a pure translation
//! layer, a paced FIFO executor for outbound calls, and a three-phase
//! provisioning engine that emits an ordered [`ProgressEvent`] stream.
//! Invariants:
//! - Relation properties are never part of initial database creation.
//! - Phase 3 starts only after every Phase 2 step succeeded.
//! - No compensating rollback is performed on failure.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::blueprint::BlueprintError;
pub use core::blueprint::DatabaseDefinition;
pub use core::blueprint::PropertyDefinition;
pub use core::blueprint::PropertyKind;
pub use core::blueprint::RelationConfig;
pub use core::blueprint::SchemaBlueprint;
pub use core::blueprint::SelectOption;
pub use core::identifiers::ContainerId;
pub use core::identifiers::DataSourceId;
pub use core::identifiers::DatabaseId;
pub use core::identifiers::DatabaseKey;
pub use core::progress::ProgressEvent;
pub use core::progress::ProvisionPhase;
pub use core::progress::StepStatus;
pub use core::registry::RuntimeHandle;
pub use core::registry::RuntimeRegistry;
pub use core::translate::DEFAULT_OPTION_COLOR;
pub use core::translate::InvalidRelationError;
pub use core::translate::creation_payload;
pub use core::translate::creation_properties;
pub use core::translate::relation_patch;
pub use interfaces::CreatedDatabase;
pub use interfaces::RecordStore;
pub use interfaces::StoreError;
pub use runtime::engine::ProvisionEngine;
pub use runtime::engine::ProvisionError;
pub use runtime::engine::ProvisionSummary;
pub use runtime::pacer::PacerConfig;
pub use runtime::pacer::RequestPacer;
