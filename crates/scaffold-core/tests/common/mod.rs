// crates/scaffold-core/tests/common/mod.rs
// ============================================================================
// Module: Provisioning Test Helpers
// Description: Recording record-store mock and blueprint fixtures.
// Purpose: Reduce duplication across engine integration tests.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use scaffold_core::ContainerId;
use scaffold_core::CreatedDatabase;
use scaffold_core::DataSourceId;
use scaffold_core::DatabaseDefinition;
use scaffold_core::DatabaseId;
use scaffold_core::DatabaseKey;
use scaffold_core::PropertyDefinition;
use scaffold_core::PropertyKind;
use scaffold_core::RecordStore;
use scaffold_core::RelationConfig;
use scaffold_core::SchemaBlueprint;
use scaffold_core::StoreError;
use serde_json::Map;
use serde_json::Value;

/// One outbound call recorded by the mock store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// Container creation request.
    CreateContainer {
        /// Requested container title.
        title: String,
    },
    /// Database creation request.
    CreateDatabase {
        /// Parent container identifier.
        parent: String,
        /// Requested database title.
        title: String,
        /// Initial (non-relation) properties.
        properties: Map<String, Value>,
    },
    /// Schema patch request.
    PatchDatabase {
        /// Target database identifier.
        database_id: String,
        /// Patched properties.
        properties: Map<String, Value>,
    },
}

/// Scripted failure the mock store injects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// No failure; every call succeeds.
    None,
    /// Fail the container creation call.
    Container,
    /// Fail the creation of the database with the given title.
    Database(String),
    /// Fail the patch against the database with the given identifier.
    Patch(String),
}

/// Recording mock implementation of the record store.
pub struct RecordingStore {
    /// Calls observed, in arrival order.
    calls: Mutex<Vec<StoreCall>>,
    /// Scripted failure, if any.
    failure: ScriptedFailure,
    /// Per-prefix monotonic counters used to mint identifiers.
    sequences: Mutex<HashMap<String, u64>>,
    /// Whether created databases report a distinct data source identifier.
    emit_data_sources: bool,
}

impl Default for RecordingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingStore {
    /// Creates a mock store where every call succeeds.
    pub fn new() -> Self {
        Self::with_failure(ScriptedFailure::None)
    }

    /// Creates a mock store with the provided scripted failure.
    pub fn with_failure(failure: ScriptedFailure) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure,
            sequences: Mutex::new(HashMap::new()),
            emit_data_sources: true,
        }
    }

    /// Creates a mock store whose databases have no distinct data source.
    pub fn without_data_sources() -> Self {
        Self {
            emit_data_sources: false,
            ..Self::new()
        }
    }

    /// Returns a snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Records one call.
    fn record(&self, call: StoreCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    /// Mints the next identifier with the given prefix.
    fn next_id(&self, prefix: &str) -> String {
        let seq = self
            .sequences
            .lock()
            .map(|mut sequences| {
                let counter = sequences.entry(prefix.to_string()).or_insert(0);
                *counter += 1;
                *counter
            })
            .unwrap_or(1);
        format!("{prefix}-{seq}")
    }

    /// Builds the rejection used for scripted failures.
    fn rejection() -> StoreError {
        StoreError::Rejected {
            status: 400,
            message: "scripted failure".to_string(),
        }
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn create_container(
        &self,
        title: &str,
        _icon: Option<&str>,
    ) -> Result<ContainerId, StoreError> {
        self.record(StoreCall::CreateContainer {
            title: title.to_string(),
        });
        if matches!(self.failure, ScriptedFailure::Container) {
            return Err(Self::rejection());
        }
        Ok(ContainerId::new(self.next_id("container")))
    }

    async fn create_database(
        &self,
        parent: &ContainerId,
        title: &str,
        _icon: Option<&str>,
        properties: &Map<String, Value>,
    ) -> Result<CreatedDatabase, StoreError> {
        self.record(StoreCall::CreateDatabase {
            parent: parent.as_str().to_string(),
            title: title.to_string(),
            properties: properties.clone(),
        });
        if matches!(&self.failure, ScriptedFailure::Database(name) if name == title) {
            return Err(Self::rejection());
        }
        let database_id = DatabaseId::new(self.next_id("db"));
        let data_source_id = self
            .emit_data_sources
            .then(|| DataSourceId::new(self.next_id("ds")));
        Ok(CreatedDatabase {
            database_id,
            data_source_id,
        })
    }

    async fn patch_database_schema(
        &self,
        database_id: &DatabaseId,
        properties: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::PatchDatabase {
            database_id: database_id.as_str().to_string(),
            properties: properties.clone(),
        });
        if matches!(&self.failure, ScriptedFailure::Patch(id) if id == database_id.as_str()) {
            return Err(Self::rejection());
        }
        Ok(())
    }
}

/// Shared handle to a recording store, usable as the engine's store while the
/// test keeps its own handle for inspection.
pub struct SharedStore(pub std::sync::Arc<RecordingStore>);

#[async_trait]
impl RecordStore for SharedStore {
    async fn create_container(
        &self,
        title: &str,
        icon: Option<&str>,
    ) -> Result<ContainerId, StoreError> {
        self.0.create_container(title, icon).await
    }

    async fn create_database(
        &self,
        parent: &ContainerId,
        title: &str,
        icon: Option<&str>,
        properties: &Map<String, Value>,
    ) -> Result<CreatedDatabase, StoreError> {
        self.0.create_database(parent, title, icon, properties).await
    }

    async fn patch_database_schema(
        &self,
        database_id: &DatabaseId,
        properties: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.0.patch_database_schema(database_id, properties).await
    }
}

/// Builds the two-database CRM blueprint used by the end-to-end tests:
/// accounts (title, two text properties, relation to contacts) and contacts
/// (title, email, relation to accounts).
pub fn crm_blueprint() -> SchemaBlueprint {
    SchemaBlueprint {
        title: "CRM".to_string(),
        icon: None,
        databases: vec![
            DatabaseDefinition {
                key: DatabaseKey::new("accounts"),
                name: "Accounts".to_string(),
                icon: None,
                properties: vec![
                    PropertyDefinition {
                        name: "Name".to_string(),
                        kind: PropertyKind::Title,
                    },
                    PropertyDefinition {
                        name: "Industry".to_string(),
                        kind: PropertyKind::Text,
                    },
                    PropertyDefinition {
                        name: "Notes".to_string(),
                        kind: PropertyKind::Text,
                    },
                    PropertyDefinition {
                        name: "Contacts".to_string(),
                        kind: PropertyKind::Relation {
                            relation: RelationConfig {
                                target: DatabaseKey::new("contacts"),
                                reciprocal_name: "Account".to_string(),
                            },
                        },
                    },
                ],
            },
            DatabaseDefinition {
                key: DatabaseKey::new("contacts"),
                name: "Contacts".to_string(),
                icon: None,
                properties: vec![
                    PropertyDefinition {
                        name: "Name".to_string(),
                        kind: PropertyKind::Title,
                    },
                    PropertyDefinition {
                        name: "Email".to_string(),
                        kind: PropertyKind::Email,
                    },
                    PropertyDefinition {
                        name: "Account".to_string(),
                        kind: PropertyKind::Relation {
                            relation: RelationConfig {
                                target: DatabaseKey::new("accounts"),
                                reciprocal_name: "Contacts".to_string(),
                            },
                        },
                    },
                ],
            },
        ],
    }
}
