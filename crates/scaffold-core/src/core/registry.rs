// crates/scaffold-core/src/core/registry.rs
// ============================================================================
// Module: Schema Scaffold Runtime Registry
// Description: Key-to-runtime-identifier map filled in during provisioning.
// Purpose: Resolve forward references between databases created in one run.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Blueprint databases reference each other by [`DatabaseKey`] before any of
//! them exist in the record store. The registry maps each key to the
//! identifiers the store assigned when the database was created, which is
//! what lets relation patches run after every endpoint exists regardless of
//! creation order or cycles in the relation graph.
//! Invariants:
//! - Owned exclusively by one engine run; never shared across runs.
//! - A key is registered exactly once, when its Phase 2 step succeeds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::identifiers::DataSourceId;
use crate::core::identifiers::DatabaseId;
use crate::core::identifiers::DatabaseKey;

// ============================================================================
// SECTION: Runtime Handle
// ============================================================================

/// Record-store identifiers assigned to one created database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeHandle {
    /// Identifier of the created database.
    pub database_id: DatabaseId,
    /// Identifier of the database's data source, when the store reports one.
    pub data_source_id: Option<DataSourceId>,
}

impl RuntimeHandle {
    /// Returns the identifier relation payloads must reference.
    ///
    /// The data source identifier takes precedence when the store
    /// distinguishes it from the database identifier.
    #[must_use]
    pub fn relation_target_id(&self) -> &str {
        self.data_source_id
            .as_ref()
            .map_or_else(|| self.database_id.as_str(), DataSourceId::as_str)
    }
}

// ============================================================================
// SECTION: Runtime Registry
// ============================================================================

/// Map from blueprint key to record-store identifiers for one run.
#[derive(Debug, Default)]
pub struct RuntimeRegistry {
    /// Registered handles keyed by blueprint database key.
    entries: BTreeMap<DatabaseKey, RuntimeHandle>,
}

impl RuntimeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handle assigned to a database key.
    pub fn register(&mut self, key: DatabaseKey, handle: RuntimeHandle) {
        self.entries.insert(key, handle);
    }

    /// Looks up the handle registered for a key, if any.
    #[must_use]
    pub fn lookup(&self, key: &DatabaseKey) -> Option<&RuntimeHandle> {
        self.entries.get(key)
    }

    /// Returns the number of registered databases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no database has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
