// crates/scaffold-core/src/runtime/engine.rs
// ============================================================================
// Module: Schema Scaffold Provisioning Engine
// Description: Three-phase provisioning state machine with progress events.
// Purpose: Materialize a blueprint inside the record store in dependency order.
// Dependencies: crate::{core, interfaces, runtime}, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! The engine walks a [`SchemaBlueprint`] through three strictly sequential
//! phases: create the parent container, create every database without its
//! relation properties, then patch every relation once all targets exist and
//! their runtime identifiers are registered. Deferring relations turns the
//! inter-database dependency graph into two flat sweeps, so no topological
//! sort is needed even when relations form cycles.
//! Invariants:
//! - One unit of work is in flight at a time; the pacer is the only
//!   suspension point.
//! - Events are emitted in exactly the order work is attempted, ending in a
//!   single `complete` or `error` event.
//! - Failures abort the run immediately; nothing already created is rolled
//!   back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Map;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::blueprint::PropertyKind;
use crate::core::blueprint::SchemaBlueprint;
use crate::core::identifiers::ContainerId;
use crate::core::identifiers::DatabaseKey;
use crate::core::progress::ProgressEvent;
use crate::core::progress::ProvisionPhase;
use crate::core::registry::RuntimeHandle;
use crate::core::registry::RuntimeRegistry;
use crate::core::translate::InvalidRelationError;
use crate::core::translate::creation_properties;
use crate::core::translate::relation_patch;
use crate::interfaces::RecordStore;
use crate::interfaces::StoreError;
use crate::runtime::pacer::RequestPacer;

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Failures that abort a provisioning run.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The record store reported a fatal error (or exhausted retries).
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The translator rejected a relation patch request.
    #[error(transparent)]
    Relation(#[from] InvalidRelationError),
    /// A relation points at a database key with no registered identifier.
    #[error("relation {property} on {database} points at unknown database {target}")]
    UnknownRelationTarget {
        /// Database owning the relation.
        database: DatabaseKey,
        /// Relation property name.
        property: String,
        /// Key that was never registered.
        target: DatabaseKey,
    },
    /// A database created in this run is missing from the registry.
    #[error("database {key} has no registered runtime identifier")]
    Unregistered {
        /// Key that should have been registered in Phase 2.
        key: DatabaseKey,
    },
}

// ============================================================================
// SECTION: Run Summary
// ============================================================================

/// Counts and identifiers reported after a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSummary {
    /// Identifier of the created top-level container.
    pub container_id: ContainerId,
    /// Number of databases created.
    pub databases_created: usize,
    /// Number of relation properties wired.
    pub relations_created: usize,
}

impl ProvisionSummary {
    /// Returns the one-line human-readable summary used in the terminal
    /// complete event.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "created {} databases and {} relations",
            self.databases_created, self.relations_created
        )
    }
}

// ============================================================================
// SECTION: Provisioning Engine
// ============================================================================

/// Three-phase provisioning engine over a [`RecordStore`] implementation.
pub struct ProvisionEngine<S> {
    /// Record-store client used for every outbound call.
    store: Arc<S>,
    /// Pacer serializing and spacing outbound calls.
    pacer: Arc<RequestPacer>,
}

impl<S> Clone for ProvisionEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            pacer: Arc::clone(&self.pacer),
        }
    }
}

impl<S> ProvisionEngine<S>
where
    S: RecordStore,
{
    /// Creates an engine from a store client and a pacer.
    #[must_use]
    pub fn new(store: S, pacer: RequestPacer) -> Self {
        Self {
            store: Arc::new(store),
            pacer: Arc::new(pacer),
        }
    }

    /// Returns the fixed step count for a blueprint: one container step,
    /// one step per database, one step per relation property.
    #[must_use]
    pub fn total_steps(blueprint: &SchemaBlueprint) -> usize {
        1 + blueprint.database_count() + blueprint.relation_count()
    }

    /// Runs provisioning to completion, emitting events along the way.
    ///
    /// The blueprint is treated as read-only and is not validated here; run
    /// [`SchemaBlueprint::validate`] beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] after emitting the terminal error event.
    /// Work completed before the failure is not rolled back.
    pub async fn run(
        &self,
        blueprint: &SchemaBlueprint,
        events: &mpsc::Sender<ProgressEvent>,
    ) -> Result<ProvisionSummary, ProvisionError> {
        let total_steps = Self::total_steps(blueprint);
        let mut registry = RuntimeRegistry::new();
        let mut step = 0_usize;

        // Phase 1: create the parent container.
        step += 1;
        Self::emit(
            events,
            ProgressEvent::in_progress(
                step,
                total_steps,
                ProvisionPhase::CreatingParent,
                "creating workspace container",
                None,
            ),
        )
        .await;
        let container_id = match self
            .pacer
            .execute(|| self.store.create_container(&blueprint.title, blueprint.icon.as_deref()))
            .await
        {
            Ok(container_id) => container_id,
            Err(err) => {
                return Self::abort(
                    events,
                    step,
                    total_steps,
                    "failed to create workspace container",
                    err.into(),
                )
                .await;
            }
        };
        Self::emit(
            events,
            ProgressEvent::success(
                step,
                total_steps,
                ProvisionPhase::CreatingParent,
                "created workspace container",
                None,
            ),
        )
        .await;

        // Phase 2: create every database without relation properties.
        for database in &blueprint.databases {
            step += 1;
            Self::emit(
                events,
                ProgressEvent::in_progress(
                    step,
                    total_steps,
                    ProvisionPhase::CreatingDatabases,
                    "creating database",
                    Some(database.name.clone()),
                ),
            )
            .await;
            let properties = creation_properties(database);
            let created = match self
                .pacer
                .execute(|| {
                    self.store.create_database(
                        &container_id,
                        &database.name,
                        database.icon.as_deref(),
                        &properties,
                    )
                })
                .await
            {
                Ok(created) => created,
                Err(err) => {
                    return Self::abort(
                        events,
                        step,
                        total_steps,
                        format!("failed to create database {}", database.name),
                        err.into(),
                    )
                    .await;
                }
            };
            registry.register(database.key.clone(), RuntimeHandle {
                database_id: created.database_id,
                data_source_id: created.data_source_id,
            });
            Self::emit(
                events,
                ProgressEvent::success(
                    step,
                    total_steps,
                    ProvisionPhase::CreatingDatabases,
                    "created database",
                    Some(database.name.clone()),
                ),
            )
            .await;
        }

        // Phase 3: wire relations now that every target is registered.
        let mut relations_created = 0_usize;
        for database in &blueprint.databases {
            for property in &database.properties {
                let PropertyKind::Relation {
                    relation,
                } = &property.kind
                else {
                    continue;
                };
                step += 1;
                Self::emit(
                    events,
                    ProgressEvent::in_progress(
                        step,
                        total_steps,
                        ProvisionPhase::AddingRelations,
                        format!("wiring relation {}", property.name),
                        Some(database.name.clone()),
                    ),
                )
                .await;
                let Some(owner) = registry.lookup(&database.key) else {
                    return Self::abort(
                        events,
                        step,
                        total_steps,
                        format!("failed to wire relation {}", property.name),
                        ProvisionError::Unregistered {
                            key: database.key.clone(),
                        },
                    )
                    .await;
                };
                let Some(target) = registry.lookup(&relation.target) else {
                    return Self::abort(
                        events,
                        step,
                        total_steps,
                        format!("failed to wire relation {}", property.name),
                        ProvisionError::UnknownRelationTarget {
                            database: database.key.clone(),
                            property: property.name.clone(),
                            target: relation.target.clone(),
                        },
                    )
                    .await;
                };
                let patch = match relation_patch(property, target) {
                    Ok(patch) => patch,
                    Err(err) => {
                        return Self::abort(
                            events,
                            step,
                            total_steps,
                            format!("failed to wire relation {}", property.name),
                            err.into(),
                        )
                        .await;
                    }
                };
                let mut patch_properties = Map::new();
                patch_properties.insert(property.name.clone(), patch);
                let database_id = owner.database_id.clone();
                match self
                    .pacer
                    .execute(|| self.store.patch_database_schema(&database_id, &patch_properties))
                    .await
                {
                    Ok(()) => {
                        relations_created += 1;
                        Self::emit(
                            events,
                            ProgressEvent::success(
                                step,
                                total_steps,
                                ProvisionPhase::AddingRelations,
                                format!("wired relation {}", property.name),
                                Some(database.name.clone()),
                            ),
                        )
                        .await;
                    }
                    Err(err) => {
                        return Self::abort(
                            events,
                            step,
                            total_steps,
                            format!("failed to wire relation {}", property.name),
                            err.into(),
                        )
                        .await;
                    }
                }
            }
        }

        let summary = ProvisionSummary {
            container_id,
            databases_created: blueprint.database_count(),
            relations_created,
        };
        Self::emit(events, ProgressEvent::complete(total_steps, summary.describe())).await;
        Ok(summary)
    }

    /// Emits the terminal error event and surfaces the failure.
    async fn abort(
        events: &mpsc::Sender<ProgressEvent>,
        step: usize,
        total_steps: usize,
        message: impl Into<String>,
        err: ProvisionError,
    ) -> Result<ProvisionSummary, ProvisionError> {
        Self::emit(events, ProgressEvent::failure(step, total_steps, message, err.to_string()))
            .await;
        Err(err)
    }

    /// Sends one event, discarding it when the receiver has gone away.
    ///
    /// A dropped receiver does not abort the run.
    async fn emit(events: &mpsc::Sender<ProgressEvent>, event: ProgressEvent) {
        let _ = events.send(event).await;
    }
}

impl<S> ProvisionEngine<S>
where
    S: RecordStore + 'static,
{
    /// Spawns the run on its own task and returns the bounded event stream.
    ///
    /// The channel closes after the terminal event, once the task drops its
    /// sender. A zero `event_buffer` is treated as one.
    #[must_use]
    pub fn start(
        &self,
        blueprint: SchemaBlueprint,
        event_buffer: usize,
    ) -> (JoinHandle<Result<ProvisionSummary, ProvisionError>>, mpsc::Receiver<ProgressEvent>) {
        let (events, receiver) = mpsc::channel(event_buffer.max(1));
        let engine = self.clone();
        let handle = tokio::spawn(async move { engine.run(&blueprint, &events).await });
        (handle, receiver)
    }
}
