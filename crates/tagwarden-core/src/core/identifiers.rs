// crates/tagwarden-core/src/core/identifiers.rs
// ============================================================================
// Module: Tagwarden Identifiers
// Description: Canonical opaque identifiers for evaluated resources.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers attached to resources under
//! evaluation. Identifiers are opaque strings and serialize transparently on
//! the wire; no normalization or validation is applied by these types.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Unique resource identifier used for violation attribution.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceUrn(String);

impl ResourceUrn {
    /// Creates a new resource urn.
    #[must_use]
    pub fn new(urn: impl Into<String>) -> Self {
        Self(urn.into())
    }

    /// Returns the urn as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ResourceUrn {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceUrn {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Provider-qualified resource type token (for example `aws:ec2/instance:Instance`).
///
/// # Invariants
/// - Opaque UTF-8 string; substring classification is a caller concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceType(String);

impl ResourceType {
    /// Creates a new resource type token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the type token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the type token contains the marker substring (case-sensitive).
    #[must_use]
    pub fn contains_marker(&self, marker: &str) -> bool {
        self.0.contains(marker)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
