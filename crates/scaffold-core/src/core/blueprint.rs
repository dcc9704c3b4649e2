// crates/scaffold-core/src/core/blueprint.rs
// ============================================================================
// Module: Schema Scaffold Blueprint Model
// Description: Caller-supplied description of the schemas to provision.
// Purpose: Provide the immutable input contract of the provisioning pipeline.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`SchemaBlueprint`] is the abstract, in-memory description of every
//! database the pipeline must materialize in the record store. It is built
//! once by the caller and never mutated during a run.
//! Invariants:
//! - Each database carries exactly one title property (checked by
//!   [`SchemaBlueprint::validate`], assumed by the translator).
//! - Relation targets reference a [`DatabaseKey`] present in the same
//!   blueprint; the relation graph may contain cycles.
//!
//! The provisioning engine performs no structural validation of its own:
//! callers run [`SchemaBlueprint::validate`] before starting a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::DatabaseKey;

// ============================================================================
// SECTION: Blueprint Types
// ============================================================================

/// Complete description of the schemas to provision in one run.
///
/// # Invariants
/// - `databases` order is caller-controlled and preserved by the pipeline.
/// - Immutable for the duration of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaBlueprint {
    /// Display title of the top-level container.
    pub title: String,
    /// Optional icon for the top-level container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Databases to create, in creation order.
    pub databases: Vec<DatabaseDefinition>,
}

/// One database schema inside a blueprint.
///
/// # Invariants
/// - `key` is unique within the blueprint.
/// - `properties` order is preserved when translating and patching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseDefinition {
    /// Stable key other databases use to reference this one.
    pub key: DatabaseKey,
    /// Display name of the database.
    pub name: String,
    /// Optional icon for the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Typed properties, in definition order.
    pub properties: Vec<PropertyDefinition>,
}

/// One named, typed property of a database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Property display name, unique within its database.
    pub name: String,
    /// Property type and type-specific payload.
    #[serde(flatten)]
    pub kind: PropertyKind,
}

/// Closed set of property types understood by the record store.
///
/// # Invariants
/// - Wire tags are stable; the UI and blueprint files depend on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PropertyKind {
    /// Primary title property; exactly one per database.
    Title,
    /// Free-form rich text.
    Text,
    /// Numeric value.
    Number,
    /// Single-choice select with a fixed option list.
    SingleSelect {
        /// Selectable options, in display order.
        options: Vec<SelectOption>,
    },
    /// Multi-choice select with a fixed option list.
    MultiSelect {
        /// Selectable options, in display order.
        options: Vec<SelectOption>,
    },
    /// Calendar date.
    Date,
    /// Reference to a workspace person.
    PersonReference,
    /// URL value.
    Url,
    /// Email address value.
    Email,
    /// Phone number value.
    Phone,
    /// Reference to rows of another database in the same blueprint.
    Relation {
        /// Relation wiring configuration.
        relation: RelationConfig,
    },
}

impl PropertyKind {
    /// Returns true when the property is a relation.
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        matches!(self, Self::Relation { .. })
    }
}

/// One option of a select or multi-select property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectOption {
    /// Option display name.
    pub name: String,
    /// Option color; the translator substitutes a sentinel when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Wiring configuration for a relation property.
///
/// # Invariants
/// - `target` names a database key present in the same blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationConfig {
    /// Key of the database this relation points at.
    pub target: DatabaseKey,
    /// Name given to the auto-generated reciprocal property on the target.
    pub reciprocal_name: String,
}

// ============================================================================
// SECTION: Step Accounting
// ============================================================================

impl SchemaBlueprint {
    /// Returns the number of databases in the blueprint.
    #[must_use]
    pub fn database_count(&self) -> usize {
        self.databases.len()
    }

    /// Returns the number of relation properties across all databases.
    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.databases
            .iter()
            .flat_map(|database| database.properties.iter())
            .filter(|property| property.kind.is_relation())
            .count()
    }

    /// Validates blueprint structure ahead of provisioning.
    ///
    /// This is the pre-flight check the pipeline itself deliberately does not
    /// run; invoke it before starting an engine run.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError`] describing the first violation found.
    pub fn validate(&self) -> Result<(), BlueprintError> {
        if self.databases.is_empty() {
            return Err(BlueprintError::NoDatabases);
        }
        let mut keys = BTreeSet::new();
        for database in &self.databases {
            if !keys.insert(database.key.clone()) {
                return Err(BlueprintError::DuplicateDatabaseKey {
                    key: database.key.clone(),
                });
            }
        }
        for database in &self.databases {
            validate_database(database, &keys)?;
        }
        Ok(())
    }
}

/// Validates one database definition against the blueprint key set.
fn validate_database(
    database: &DatabaseDefinition,
    keys: &BTreeSet<DatabaseKey>,
) -> Result<(), BlueprintError> {
    let mut names = BTreeSet::new();
    let mut title_count = 0usize;
    for property in &database.properties {
        if !names.insert(property.name.as_str()) {
            return Err(BlueprintError::DuplicatePropertyName {
                database: database.key.clone(),
                property: property.name.clone(),
            });
        }
        match &property.kind {
            PropertyKind::Title => title_count += 1,
            PropertyKind::Relation {
                relation,
            } => {
                if !keys.contains(&relation.target) {
                    return Err(BlueprintError::UnknownRelationTarget {
                        database: database.key.clone(),
                        property: property.name.clone(),
                        target: relation.target.clone(),
                    });
                }
            }
            _ => {}
        }
    }
    match title_count {
        0 => Err(BlueprintError::MissingTitleProperty {
            database: database.key.clone(),
        }),
        1 => Ok(()),
        _ => Err(BlueprintError::MultipleTitleProperties {
            database: database.key.clone(),
        }),
    }
}

// ============================================================================
// SECTION: Blueprint Errors
// ============================================================================

/// Structural blueprint violations found by pre-flight validation.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// Blueprint contains no databases.
    #[error("blueprint contains no databases")]
    NoDatabases,
    /// Two databases share the same key.
    #[error("duplicate database key: {key}")]
    DuplicateDatabaseKey {
        /// Duplicated key.
        key: DatabaseKey,
    },
    /// Two properties of one database share a name.
    #[error("duplicate property name {property} in database {database}")]
    DuplicatePropertyName {
        /// Database containing the duplicate.
        database: DatabaseKey,
        /// Duplicated property name.
        property: String,
    },
    /// Database has no title property.
    #[error("database {database} has no title property")]
    MissingTitleProperty {
        /// Offending database key.
        database: DatabaseKey,
    },
    /// Database has more than one title property.
    #[error("database {database} has more than one title property")]
    MultipleTitleProperties {
        /// Offending database key.
        database: DatabaseKey,
    },
    /// Relation points at a key absent from the blueprint.
    #[error("relation {property} on {database} points at unknown database {target}")]
    UnknownRelationTarget {
        /// Database owning the relation.
        database: DatabaseKey,
        /// Relation property name.
        property: String,
        /// Missing target key.
        target: DatabaseKey,
    },
}
