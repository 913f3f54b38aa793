// crates/tagwarden-core/src/core/violation.rs
// ============================================================================
// Module: Tagwarden Violations
// Description: Structured advisory findings and their message rendering.
// Purpose: Keep rule logic free of string formatting; messages are the contract.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A [`Violation`] pairs a resource urn with a structured [`ViolationKind`]
//! carrying the offending key, value, or shape. Rendering to the
//! human-readable message contract is a separate [`std::fmt::Display`] step,
//! so rule logic stays testable by structure rather than substring matching.
//! Invariants:
//! - Violations are append-only per evaluation; absence of violations is the
//!   compliant state.
//! - All findings are advisory; no violation blocks provisioning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ResourceUrn;

// ============================================================================
// SECTION: Enforcement Level
// ============================================================================

/// Enforcement level of a policy pack.
///
/// # Invariants
/// - Only `Advisory` reporting semantics exist today; violations never block
///   the provisioning action regardless of level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementLevel {
    /// Report violations without blocking.
    #[default]
    Advisory,
    /// Report violations as errors to the reporting surface (still non-blocking).
    Mandatory,
    /// Skip evaluation entirely.
    Disabled,
}

// ============================================================================
// SECTION: Violation Kinds
// ============================================================================

/// Structured advisory finding kinds.
///
/// # Invariants
/// - Variants are stable for programmatic handling; the rendered message is
///   the external contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The taggable resource carries no tag storage at all.
    NoTags,
    /// Tag storage was present but not a recognized shape.
    UnsupportedTagShape {
        /// Name of the unrecognized raw value type.
        found: String,
    },
    /// A required tag is missing.
    MissingRequiredTag {
        /// Canonical name of the missing tag.
        tag: String,
    },
    /// A derivative alias stands in for an absent canonical tag.
    AliasedTag {
        /// Canonical tag name that should be used.
        canonical: String,
        /// Offending alias key in its original casing.
        alias: String,
    },
    /// A derivative alias coexists with its canonical tag.
    RedundantAlias {
        /// Canonical tag name already present.
        canonical: String,
        /// Offending alias key in its original casing.
        alias: String,
    },
    /// The environment tag value is outside the allowed set.
    InvalidEnvironmentValue {
        /// Offending value as rendered text.
        value: String,
        /// Allowed environment values.
        allowed: Vec<String>,
    },
    /// A lifecycle tag value is not a calendar date or permitted sentinel.
    InvalidDateValue {
        /// Tag carrying the offending value.
        tag: String,
        /// Offending value as rendered text.
        value: String,
    },
    /// A rule check failed internally and was converted to a diagnostic.
    CheckFailed {
        /// Name of the failed check.
        check: String,
        /// Failure detail text.
        detail: String,
    },
}

// ============================================================================
// SECTION: Violation
// ============================================================================

/// One advisory finding attributed to a resource urn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Urn of the resource the finding is attributed to.
    pub urn: ResourceUrn,
    /// Structured finding kind.
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    /// Creates a violation attributed to a resource urn.
    #[must_use]
    pub const fn new(urn: ResourceUrn, kind: ViolationKind) -> Self {
        Self {
            urn,
            kind,
        }
    }

    /// Renders the human-readable message contract.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let urn = &self.urn;
        match &self.kind {
            ViolationKind::NoTags => {
                write!(f, "Taggable resource '{urn}' does not have any tags")
            }
            ViolationKind::UnsupportedTagShape {
                found,
            } => {
                write!(f, "Taggable resource '{urn}' has tags of unsupported type '{found}'")
            }
            ViolationKind::MissingRequiredTag {
                tag,
            } => {
                write!(f, "Taggable resource '{urn}' is missing required tag '{tag}'")
            }
            ViolationKind::AliasedTag {
                canonical,
                alias,
            } => {
                write!(
                    f,
                    "Taggable resource '{urn}' uses tag '{alias}' instead of canonical tag \
                     '{canonical}'"
                )
            }
            ViolationKind::RedundantAlias {
                canonical,
                alias,
            } => {
                write!(
                    f,
                    "Taggable resource '{urn}' carries redundant tag '{alias}'; use canonical \
                     tag '{canonical}'"
                )
            }
            ViolationKind::InvalidEnvironmentValue {
                value,
                allowed,
            } => {
                write!(
                    f,
                    "Taggable resource '{urn}' has invalid environment value '{value}' \
                     (allowed: {})",
                    allowed.join(", ")
                )
            }
            ViolationKind::InvalidDateValue {
                tag,
                value,
            } => {
                write!(f, "Taggable resource '{urn}' has invalid value '{value}' for tag '{tag}'")
            }
            ViolationKind::CheckFailed {
                check,
                detail,
            } => {
                write!(f, "Error evaluating rule '{check}' on resource '{urn}': {detail}")
            }
        }
    }
}
