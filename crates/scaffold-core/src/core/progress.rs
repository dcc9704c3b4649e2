// crates/scaffold-core/src/core/progress.rs
// ============================================================================
// Module: Schema Scaffold Progress Events
// Description: Ordered progress event contract emitted by the engine.
// Purpose: Give callers a determinate, renderable view of a provisioning run.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The engine emits one [`ProgressEvent`] before and after every unit of
//! work, in exactly the order work is attempted, terminating in a single
//! `complete` or `error` event. Events are produced once and never mutated;
//! wire tags are kebab-case and stable for UI consumption.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Phase and Status Tags
// ============================================================================

/// Phase of the provisioning run an event belongs to.
///
/// # Invariants
/// - Variants are stable for event-stream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProvisionPhase {
    /// Creating the top-level container.
    CreatingParent,
    /// Creating databases without relation properties.
    CreatingDatabases,
    /// Patching relation properties onto created databases.
    AddingRelations,
    /// Terminal success marker.
    Complete,
    /// Terminal failure marker.
    Error,
}

impl ProvisionPhase {
    /// Returns a stable label for the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatingParent => "creating-parent",
            Self::CreatingDatabases => "creating-databases",
            Self::AddingRelations => "adding-relations",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

/// Status of the unit of work an event describes.
///
/// # Invariants
/// - Variants are stable for event-stream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    /// Work not yet attempted.
    Pending,
    /// Work attempt has started.
    InProgress,
    /// Work attempt finished successfully.
    Success,
    /// Work attempt failed; the run is aborting.
    Error,
}

impl StepStatus {
    /// Returns a stable label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

// ============================================================================
// SECTION: Progress Event
// ============================================================================

/// One entry of the ordered progress stream.
///
/// # Invariants
/// - `step` is 1-based and never exceeds `total_steps`.
/// - Exactly one terminal event (`Complete` or `Error` phase) ends a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 1-based index of the unit of work this event describes.
    pub step: usize,
    /// Total number of units of work in the run, fixed up front.
    pub total_steps: usize,
    /// Phase the unit of work belongs to.
    pub phase: ProvisionPhase,
    /// Human-readable description of the unit of work.
    pub message: String,
    /// Optional free-form detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Optional unit-of-work label, typically a database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Status of the unit of work.
    pub status: StepStatus,
    /// Error message when `status` is [`StepStatus::Error`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressEvent {
    /// Builds the event announcing a unit of work has started.
    #[must_use]
    pub fn in_progress(
        step: usize,
        total_steps: usize,
        phase: ProvisionPhase,
        message: impl Into<String>,
        label: Option<String>,
    ) -> Self {
        Self {
            step,
            total_steps,
            phase,
            message: message.into(),
            detail: None,
            label,
            status: StepStatus::InProgress,
            error: None,
        }
    }

    /// Builds the event recording a unit of work succeeded.
    #[must_use]
    pub fn success(
        step: usize,
        total_steps: usize,
        phase: ProvisionPhase,
        message: impl Into<String>,
        label: Option<String>,
    ) -> Self {
        Self {
            step,
            total_steps,
            phase,
            message: message.into(),
            detail: None,
            label,
            status: StepStatus::Success,
            error: None,
        }
    }

    /// Builds the terminal event for a failed run.
    #[must_use]
    pub fn failure(
        step: usize,
        total_steps: usize,
        message: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            step,
            total_steps,
            phase: ProvisionPhase::Error,
            message: message.into(),
            detail: None,
            label: None,
            status: StepStatus::Error,
            error: Some(error.into()),
        }
    }

    /// Builds the terminal event for a completed run.
    #[must_use]
    pub fn complete(total_steps: usize, detail: impl Into<String>) -> Self {
        Self {
            step: total_steps,
            total_steps,
            phase: ProvisionPhase::Complete,
            message: "provisioning complete".to_string(),
            detail: Some(detail.into()),
            label: None,
            status: StepStatus::Success,
            error: None,
        }
    }

    /// Attaches a detail string to the event.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
