// crates/tagwarden-core/src/lib.rs
// ============================================================================
// Module: Tagwarden Core Library
// Description: Tag-compliance rule engine for infrastructure resources.
// Purpose: Evaluate resource declarations against a required-tag policy.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! `tagwarden-core` evaluates cloud infrastructure resource declarations
//! against a required-tag policy during provisioning dry-runs. The engine
//! normalizes heterogeneous tag storage shapes, reconciles required tags
//! against aliased/derivative key names, validates structured tag values, and
//! reports advisory violations through a caller-supplied sink.
//! Invariants:
//! - Evaluation is deterministic and side-effect-free except for reporting.
//! - Violations are advisory; evaluation never blocks the provisioning run.
//! - A fault in one rule check never suppresses other checks or resources.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::EnforcementLevel;
pub use crate::core::PolicyValidationError;
pub use crate::core::ResourceDescriptor;
pub use crate::core::ResourceType;
pub use crate::core::ResourceUrn;
pub use crate::core::TagEntry;
pub use crate::core::TagPolicy;
pub use crate::core::TagSet;
pub use crate::core::TagStorage;
pub use crate::core::Violation;
pub use crate::core::ViolationKind;
pub use crate::core::extract_tags;
pub use crate::interfaces::ReportError;
pub use crate::interfaces::TaggabilityOracle;
pub use crate::interfaces::ViolationReporter;
pub use crate::runtime::CheckFault;
pub use crate::runtime::CollectingReporter;
pub use crate::runtime::LogReporter;
pub use crate::runtime::RuleCheck;
pub use crate::runtime::TagPolicyPack;
