// crates/tagwarden-core/src/core/mod.rs
// ============================================================================
// Module: Tagwarden Core Data Model
// Description: Descriptors, tag storage, policy configuration, and violations.
// Purpose: Define the canonical types consumed by the rule-check runtime.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The core data model covers the lifecycle of one evaluation pass: a
//! [`ResourceDescriptor`] arrives from the provisioning engine, its raw tag
//! storage is normalized into a [`TagStorage`] variant, rule checks consult
//! the immutable [`TagPolicy`], and findings are recorded as [`Violation`]
//! values attributed to the resource urn.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod descriptor;
pub mod identifiers;
pub mod policy;
pub mod tags;
pub mod violation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use descriptor::ResourceDescriptor;
pub use identifiers::ResourceType;
pub use identifiers::ResourceUrn;
pub use policy::ENVIRONMENT_TAG;
pub use policy::PolicyValidationError;
pub use policy::TagPolicy;
pub use tags::TagEntry;
pub use tags::TagSet;
pub use tags::TagStorage;
pub use tags::extract_tags;
pub use violation::EnforcementLevel;
pub use violation::Violation;
pub use violation::ViolationKind;
