// crates/tagwarden-core/src/core/descriptor.rs
// ============================================================================
// Module: Tagwarden Resource Descriptor
// Description: One infrastructure resource declaration under evaluation.
// Purpose: Carry the type token, urn, and opaque property bag into the engine.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`ResourceDescriptor`] is constructed by the external provisioning
//! engine once per resource per evaluation pass and is read-only to the
//! engine. The property bag is opaque; the only property the engine reads is
//! `tags`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::ResourceType;
use crate::core::identifiers::ResourceUrn;

// ============================================================================
// SECTION: Resource Descriptor
// ============================================================================

/// Resource declaration supplied by the provisioning engine.
///
/// # Invariants
/// - `resource_type` is immutable for the descriptor's lifetime.
/// - `urn` is used only for violation attribution.
/// - `properties` is an opaque snapshot; the engine must not mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Provider-qualified resource type token.
    pub resource_type: ResourceType,
    /// Unique resource identifier.
    pub urn: ResourceUrn,
    /// Opaque structured property bag.
    pub properties: Value,
}

impl ResourceDescriptor {
    /// Creates a descriptor from a type token, urn, and property bag.
    #[must_use]
    pub fn new(
        resource_type: impl Into<ResourceType>,
        urn: impl Into<ResourceUrn>,
        properties: Value,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            urn: urn.into(),
            properties,
        }
    }
}
