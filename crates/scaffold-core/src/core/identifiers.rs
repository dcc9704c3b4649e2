// crates/scaffold-core/src/core/identifiers.rs
// ============================================================================
// Module: Schema Scaffold Identifiers
// Description: Opaque identifiers for blueprint keys and record-store objects.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the identifiers used throughout Schema Scaffold.
//! [`DatabaseKey`] is chosen by the caller and stable across a blueprint;
//! the remaining identifiers are assigned by the record store and unknown
//! until the corresponding object has been created.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Caller-chosen key identifying a database inside a blueprint.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
/// - Stable for the lifetime of a blueprint; relation targets reference it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseKey(String);

impl DatabaseKey {
    /// Creates a new database key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for DatabaseKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DatabaseKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Record-store identifier of the top-level container.
///
/// # Invariants
/// - Opaque UTF-8 string assigned by the record store; never synthesized locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ContainerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContainerId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Record-store identifier of a created database.
///
/// # Invariants
/// - Opaque UTF-8 string assigned by the record store; never synthesized locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseId(String);

impl DatabaseId {
    /// Creates a new database identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for DatabaseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DatabaseId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Record-store identifier of a database's data source, when distinct.
///
/// # Invariants
/// - Opaque UTF-8 string assigned by the record store; never synthesized locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSourceId(String);

impl DataSourceId {
    /// Creates a new data source identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for DataSourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DataSourceId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
