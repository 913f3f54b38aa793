// crates/tagwarden-taxonomy/src/lib.rs
// ============================================================================
// Module: Tagwarden Taxonomy
// Description: Taggability classification for resource type tokens.
// Purpose: Provide the rule-table oracle consumed by the evaluation facade.
// Dependencies: tagwarden-core, serde
// ============================================================================

//! ## Overview
//! This crate ships the taggability oracle: a rule-table classifier over
//! provider-qualified resource type tokens implementing the core
//! [`tagwarden_core::TaggabilityOracle`] interface, plus a builtin table of
//! common AWS taggable types. Classification is deterministic and
//! default-deny: unknown types are treated as non-taggable so no spurious
//! violations are reported for resources that cannot carry tags.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod registry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use registry::TaggableRegistry;
pub use registry::TypeRule;
