// crates/tagwarden-core/src/core/policy.rs
// ============================================================================
// Module: Tagwarden Tag Policy
// Description: Static required-tag policy consumed by the rule checks.
// Purpose: Provide one immutable, validated configuration object per pack.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`TagPolicy`] is constructed once at initialization, validated loudly,
//! and passed read-only into the evaluation facade. Changing the policy
//! changes evaluated behavior without code changes elsewhere; nothing in the
//! engine mutates it after construction.
//! Invariants:
//! - Every `tag_derivatives` key names an entry of `required_tags`.
//! - Names, aliases, markers, and allowed values are non-empty strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ResourceType;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Canonical tag whose value is checked against the allowed environment set.
pub const ENVIRONMENT_TAG: &str = "environment";

/// Default required tag names, in declaration order.
const DEFAULT_REQUIRED_TAGS: [&str; 5] =
    ["application", "cost-center", "environment", "product", "product-area"];
/// Default derivative aliases for the `application` tag.
const DEFAULT_APPLICATION_ALIASES: [&str; 1] = ["app"];
/// Default lifecycle tags required for timed resources.
const DEFAULT_TIME_TAGS: [&str; 2] = ["backup-by", "delete-after"];
/// Default type-token markers identifying timed resources.
const DEFAULT_TIMED_TYPE_MARKERS: [&str; 2] = ["ec2", "ebs"];
/// Default provisioning-stack bookkeeping tags.
const DEFAULT_STACK_TAGS: [&str; 2] = ["project", "stack"];
/// Default allowed values for the environment tag.
const DEFAULT_ENVIRONMENT_VALUES: [&str; 7] =
    ["sandbox", "dev", "test", "staging", "alpha", "alpha2", "prod"];

// ============================================================================
// SECTION: Policy Errors
// ============================================================================

/// Policy configuration inconsistencies detected at initialization.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyValidationError {
    /// The required-tag list is empty.
    #[error("required_tags must not be empty")]
    NoRequiredTags,
    /// The allowed environment value set is empty.
    #[error("environment_values must not be empty")]
    NoEnvironmentValues,
    /// A name list contains an empty string.
    #[error("{field} must not contain empty names")]
    EmptyName {
        /// Policy field holding the empty name.
        field: &'static str,
    },
    /// A derivative entry references a tag outside the required set.
    #[error("tag derivative '{canonical}' is not a required tag")]
    DerivativeNotRequired {
        /// Canonical tag name of the offending derivative entry.
        canonical: String,
    },
    /// A derivative entry carries no alias substrings.
    #[error("tag derivative '{canonical}' has no alias entries")]
    EmptyDerivativeSet {
        /// Canonical tag name of the offending derivative entry.
        canonical: String,
    },
}

// ============================================================================
// SECTION: Tag Policy
// ============================================================================

/// Static required-tag policy.
///
/// # Invariants
/// - Immutable after validation; the engine only reads it.
/// - Iteration order of `required_tags` fixes violation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPolicy {
    /// Canonical tag names that must be present on taggable resources.
    pub required_tags: Vec<String>,
    /// Alias substrings per canonical tag name.
    pub tag_derivatives: BTreeMap<String, Vec<String>>,
    /// Lifecycle tags required only for timed resources.
    pub time_tags: Vec<String>,
    /// Case-sensitive type-token substrings identifying timed resources.
    pub timed_type_markers: Vec<String>,
    /// Provisioning-stack bookkeeping tags (checked only when enabled).
    pub stack_tags: Vec<String>,
    /// Allowed values for the environment tag.
    pub environment_values: Vec<String>,
    /// Enables the stack-tags check.
    pub check_stack_tags: bool,
    /// Enables the calendar-date format check for lifecycle tags.
    pub check_date_formats: bool,
}

impl TagPolicy {
    /// Validates the policy for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyValidationError`] on the first inconsistency found;
    /// this is a setup-time failure, never an evaluation-time one.
    pub fn validate(&self) -> Result<(), PolicyValidationError> {
        if self.required_tags.is_empty() {
            return Err(PolicyValidationError::NoRequiredTags);
        }
        if self.environment_values.is_empty() {
            return Err(PolicyValidationError::NoEnvironmentValues);
        }
        Self::check_names("required_tags", &self.required_tags)?;
        Self::check_names("time_tags", &self.time_tags)?;
        Self::check_names("timed_type_markers", &self.timed_type_markers)?;
        Self::check_names("stack_tags", &self.stack_tags)?;
        Self::check_names("environment_values", &self.environment_values)?;
        for (canonical, aliases) in &self.tag_derivatives {
            if !self.required_tags.iter().any(|name| name == canonical) {
                return Err(PolicyValidationError::DerivativeNotRequired {
                    canonical: canonical.clone(),
                });
            }
            if aliases.is_empty() {
                return Err(PolicyValidationError::EmptyDerivativeSet {
                    canonical: canonical.clone(),
                });
            }
            if aliases.iter().any(String::is_empty) {
                return Err(PolicyValidationError::EmptyName {
                    field: "tag_derivatives",
                });
            }
        }
        Ok(())
    }

    /// Returns the configured aliases for a canonical tag name.
    #[must_use]
    pub fn aliases_of(&self, canonical: &str) -> &[String] {
        self.tag_derivatives.get(canonical).map_or(&[], Vec::as_slice)
    }

    /// Returns true when the type token matches a timed-resource marker.
    #[must_use]
    pub fn is_timed_type(&self, resource_type: &ResourceType) -> bool {
        self.timed_type_markers.iter().any(|marker| resource_type.contains_marker(marker))
    }

    /// Rejects empty names within one policy field.
    fn check_names(field: &'static str, names: &[String]) -> Result<(), PolicyValidationError> {
        if names.iter().any(String::is_empty) {
            return Err(PolicyValidationError::EmptyName {
                field,
            });
        }
        Ok(())
    }
}

impl Default for TagPolicy {
    fn default() -> Self {
        let mut tag_derivatives = BTreeMap::new();
        tag_derivatives.insert(
            "application".to_string(),
            DEFAULT_APPLICATION_ALIASES.map(str::to_string).to_vec(),
        );
        Self {
            required_tags: DEFAULT_REQUIRED_TAGS.map(str::to_string).to_vec(),
            tag_derivatives,
            time_tags: DEFAULT_TIME_TAGS.map(str::to_string).to_vec(),
            timed_type_markers: DEFAULT_TIMED_TYPE_MARKERS.map(str::to_string).to_vec(),
            stack_tags: DEFAULT_STACK_TAGS.map(str::to_string).to_vec(),
            environment_values: DEFAULT_ENVIRONMENT_VALUES.map(str::to_string).to_vec(),
            check_stack_tags: false,
            check_date_formats: false,
        }
    }
}
