// crates/tagwarden-core/src/interfaces/mod.rs
// ============================================================================
// Module: Tagwarden Interfaces
// Description: Engine-agnostic interfaces for taggability and violation sinks.
// Purpose: Define the contract surfaces between the engine and its host.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the tag-compliance engine integrates with the
//! provisioning host without embedding host-specific details. The taggability
//! oracle answers classification queries; the violation reporter is an
//! append-only sink the engine writes findings into and never reads back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ResourceType;
use crate::core::Violation;

// ============================================================================
// SECTION: Taggability Oracle
// ============================================================================

/// Classifier answering whether a resource type can carry metadata tags.
///
/// Implementations are consulted once per resource before any rule check
/// runs; non-taggable types are skipped entirely.
pub trait TaggabilityOracle: Send + Sync {
    /// Returns true when the resource type can carry key/value tags.
    fn is_taggable(&self, resource_type: &ResourceType) -> bool;
}

// ============================================================================
// SECTION: Violation Reporter
// ============================================================================

/// Reporter sink errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The sink failed to accept a violation.
    #[error("violation sink write failed: {0}")]
    SinkWrite(String),
}

/// Append-only violation sink supplied by the caller.
///
/// Multiple checks may report multiple times per resource. Implementations
/// must support concurrent appends without losing or duplicating messages.
pub trait ViolationReporter: Send + Sync {
    /// Accepts one violation.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the sink cannot accept the violation.
    fn report(&self, violation: Violation) -> Result<(), ReportError>;
}
