// crates/scaffold-core/src/interfaces/mod.rs
// ============================================================================
// Module: Schema Scaffold Interfaces
// Description: Backend-agnostic record-store interface and error taxonomy.
// Purpose: Define the contract surface the provisioning pipeline consumes.
// Dependencies: async-trait, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The pipeline talks to the record store exclusively through the
//! [`RecordStore`] trait: create a container, create a database, patch a
//! database schema. Implementations classify every failure into the
//! [`StoreError`] taxonomy; only [`StoreError::Throttled`] is retryable and
//! the pacer is the sole component that retries it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::ContainerId;
use crate::core::identifiers::DataSourceId;
use crate::core::identifiers::DatabaseId;

// ============================================================================
// SECTION: Record Store Results
// ============================================================================

/// Identifiers the record store assigned to a newly created database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDatabase {
    /// Identifier of the created database.
    pub database_id: DatabaseId,
    /// Identifier of the database's data source, when distinct.
    pub data_source_id: Option<DataSourceId>,
}

// ============================================================================
// SECTION: Record Store Trait
// ============================================================================

/// Backend-agnostic client for the external record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates the top-level container that will hold every database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store rejects or cannot be reached.
    async fn create_container(
        &self,
        title: &str,
        icon: Option<&str>,
    ) -> Result<ContainerId, StoreError>;

    /// Creates one database under `parent` with the given initial properties.
    ///
    /// `properties` must not contain relation properties; those are wired
    /// later through [`RecordStore::patch_database_schema`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store rejects or cannot be reached.
    async fn create_database(
        &self,
        parent: &ContainerId,
        title: &str,
        icon: Option<&str>,
        properties: &Map<String, Value>,
    ) -> Result<CreatedDatabase, StoreError>;

    /// Adds properties to an existing database's schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store rejects or cannot be reached.
    async fn patch_database_schema(
        &self,
        database_id: &DatabaseId,
        properties: &Map<String, Value>,
    ) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Failures reported by record-store implementations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Only [`StoreError::Throttled`] is retryable; all others are fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected the request for exceeding its rate limit.
    #[error("record store throttled the request")]
    Throttled {
        /// Server-supplied wait hint, when the response carried one.
        retry_after: Option<Duration>,
    },
    /// The store rejected the request as invalid or unauthorized.
    #[error("record store rejected the request (status {status}): {message}")]
    Rejected {
        /// HTTP status code of the rejection.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
    /// The request never produced a usable response.
    #[error("record store transport failure: {0}")]
    Transport(String),
    /// The store answered with a body the client could not interpret.
    #[error("record store returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// Returns true when the error is retryable throttling.
    #[must_use]
    pub const fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }
}
