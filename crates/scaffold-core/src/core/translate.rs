// crates/scaffold-core/src/core/translate.rs
// ============================================================================
// Module: Schema Scaffold Property Translator
// Description: Converts abstract property definitions into store payloads.
// Purpose: Build creation payloads and deferred relation patches.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! The translator is a pure function layer between the blueprint model and
//! the record store's native property representation. Relation properties
//! are deliberately omitted from creation payloads — both endpoints must
//! exist before a relation can be wired — and are expressed instead as
//! separate patch payloads built once the target's runtime identifier is
//! known.
//! Invariants:
//! - [`creation_payload`] returns `None` exactly for relation properties.
//! - Translation never fails for well-formed input; malformed blueprints are
//!   a pre-flight validation concern.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::core::blueprint::DatabaseDefinition;
use crate::core::blueprint::PropertyDefinition;
use crate::core::blueprint::PropertyKind;
use crate::core::blueprint::SelectOption;
use crate::core::registry::RuntimeHandle;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Sentinel color applied to select options that specify none.
pub const DEFAULT_OPTION_COLOR: &str = "default";

// ============================================================================
// SECTION: Creation Payloads
// ============================================================================

/// Returns the native creation payload for a property, or `None` for
/// relations.
#[must_use]
pub fn creation_payload(property: &PropertyDefinition) -> Option<Value> {
    match &property.kind {
        PropertyKind::Title => Some(json!({ "title": {} })),
        PropertyKind::Text => Some(json!({ "rich_text": {} })),
        PropertyKind::Number => Some(json!({ "number": {} })),
        PropertyKind::SingleSelect {
            options,
        } => Some(json!({ "select": { "options": option_payloads(options) } })),
        PropertyKind::MultiSelect {
            options,
        } => Some(json!({ "multi_select": { "options": option_payloads(options) } })),
        PropertyKind::Date => Some(json!({ "date": {} })),
        PropertyKind::PersonReference => Some(json!({ "people": {} })),
        PropertyKind::Url => Some(json!({ "url": {} })),
        PropertyKind::Email => Some(json!({ "email": {} })),
        PropertyKind::Phone => Some(json!({ "phone_number": {} })),
        PropertyKind::Relation {
            ..
        } => None,
    }
}

/// Builds the full non-relation property map for one database, keyed by
/// property name.
#[must_use]
pub fn creation_properties(database: &DatabaseDefinition) -> Map<String, Value> {
    let mut properties = Map::new();
    for property in &database.properties {
        if let Some(payload) = creation_payload(property) {
            properties.insert(property.name.clone(), payload);
        }
    }
    properties
}

/// Translates select options, substituting the sentinel color when absent.
fn option_payloads(options: &[SelectOption]) -> Vec<Value> {
    options
        .iter()
        .map(|option| {
            json!({
                "name": option.name,
                "color": option.color.as_deref().unwrap_or(DEFAULT_OPTION_COLOR),
            })
        })
        .collect()
}

// ============================================================================
// SECTION: Relation Patches
// ============================================================================

/// Builds the patch payload wiring a relation property to its target.
///
/// Called only after the target database exists; `target` carries the
/// identifiers the store assigned to it.
///
/// # Errors
///
/// Returns [`InvalidRelationError`] when `property` is not a relation — a
/// programmer error, unreachable when the engine drives translation.
pub fn relation_patch(
    property: &PropertyDefinition,
    target: &RuntimeHandle,
) -> Result<Value, InvalidRelationError> {
    let PropertyKind::Relation {
        relation,
    } = &property.kind
    else {
        return Err(InvalidRelationError {
            property: property.name.clone(),
        });
    };
    Ok(json!({
        "relation": {
            "data_source_id": target.relation_target_id(),
            "dual_property": { "synced_property_name": relation.reciprocal_name },
        }
    }))
}

// ============================================================================
// SECTION: Translator Errors
// ============================================================================

/// Relation patch requested for a property that is not a relation.
///
/// # Invariants
/// - Indicates a defect in the caller, not a runtime condition to recover
///   from.
#[derive(Debug, Error)]
#[error("property {property} is not a relation")]
pub struct InvalidRelationError {
    /// Name of the offending property.
    pub property: String,
}
