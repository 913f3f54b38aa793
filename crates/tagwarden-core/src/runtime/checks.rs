// crates/tagwarden-core/src/runtime/checks.rs
// ============================================================================
// Module: Tagwarden Rule Checks
// Description: The fixed set of independent tag-compliance predicates.
// Purpose: Convert one resource and its tag storage into advisory violations.
// Dependencies: crate::core, crate::runtime::derivative, serde_json, time
// ============================================================================

//! ## Overview
//! Each rule check consumes a resource descriptor, its extracted tag storage,
//! and the immutable policy, and emits zero or more violations. Checks are
//! independent and pure; a [`CheckFault`] is the isolation boundary the
//! facade converts into a single diagnostic violation so one failing check
//! never aborts the rest.
//! Invariants:
//! - Violation order follows required-tag declaration order, then key-scan
//!   order, per check.
//! - Unsupported tag storage suppresses only the required-tag logic; other
//!   checks still run against whatever was extractable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;
use time::Date;

use crate::core::ResourceDescriptor;
use crate::core::TagPolicy;
use crate::core::TagStorage;
use crate::core::Violation;
use crate::core::ViolationKind;
use crate::core::policy::ENVIRONMENT_TAG;
use crate::runtime::derivative::all_derivatives;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Lifecycle tag naming the date a resource must be backed up by.
const BACKUP_BY_TAG: &str = "backup-by";
/// Lifecycle tag naming the date a resource may be deleted after.
const DELETE_AFTER_TAG: &str = "delete-after";
/// Sentinel value exempting a resource from deletion scheduling.
const NEVER_SENTINEL: &str = "Never";

// ============================================================================
// SECTION: Check Faults
// ============================================================================

/// Internal failure raised while evaluating a single check on a single resource.
///
/// # Invariants
/// - Faults never escape the facade; they become diagnostic violations.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("rule '{check}' failed: {detail}")]
pub struct CheckFault {
    /// Name of the failed check.
    pub check: &'static str,
    /// Failure detail text.
    pub detail: String,
}

// ============================================================================
// SECTION: Rule Checks
// ============================================================================

/// The fixed, ordered set of tag-compliance predicates.
///
/// # Invariants
/// - Checks are independent and pure with respect to shared state.
/// - Declared order fixes violation order; it carries no semantic precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCheck {
    /// Flags taggable resources with no tag storage at all.
    Presence,
    /// Reconciles the required-tag list against present and aliased keys.
    RequiredTags,
    /// Requires lifecycle tags on timed resource types.
    TimedTags,
    /// Requires provisioning-stack bookkeeping tags.
    StackTags,
    /// Validates the environment tag value against the allowed set.
    EnvironmentValue,
    /// Validates lifecycle tag values as calendar dates.
    DateFormat,
}

impl RuleCheck {
    /// Returns the stable check name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Presence => "has-tags",
            Self::RequiredTags => "required-tags",
            Self::TimedTags => "time-tags",
            Self::StackTags => "stack-tags",
            Self::EnvironmentValue => "environment-value",
            Self::DateFormat => "date-format",
        }
    }

    /// Runs the check against one resource.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFault`] when the check fails internally; the facade
    /// converts faults into diagnostic violations.
    pub fn run(
        self,
        resource: &ResourceDescriptor,
        storage: &TagStorage,
        policy: &TagPolicy,
    ) -> Result<Vec<Violation>, CheckFault> {
        let violations = match self {
            Self::Presence => check_presence(resource, storage),
            Self::RequiredTags => check_required_tags(resource, storage, policy),
            Self::TimedTags => check_timed_tags(resource, storage, policy),
            Self::StackTags => check_stack_tags(resource, storage, policy),
            Self::EnvironmentValue => check_environment_value(resource, storage, policy),
            Self::DateFormat => check_date_formats(resource, storage),
        };
        Ok(violations)
    }
}

// ============================================================================
// SECTION: Check Implementations
// ============================================================================

/// Flags resources whose property bag carries no tag storage.
fn check_presence(resource: &ResourceDescriptor, storage: &TagStorage) -> Vec<Violation> {
    if storage.is_absent() {
        return vec![Violation::new(resource.urn.clone(), ViolationKind::NoTags)];
    }
    Vec::new()
}

/// Reconciles required tags against present keys and derivative aliases.
///
/// Unsupported storage yields one shape violation and skips the required-tag
/// logic; absent storage yields nothing (presence already covers it).
fn check_required_tags(
    resource: &ResourceDescriptor,
    storage: &TagStorage,
    policy: &TagPolicy,
) -> Vec<Violation> {
    let tags = match storage {
        TagStorage::Unsupported {
            found,
        } => {
            return vec![Violation::new(
                resource.urn.clone(),
                ViolationKind::UnsupportedTagShape {
                    found: found.clone(),
                },
            )];
        }
        TagStorage::Absent => return Vec::new(),
        TagStorage::Mapping {
            tags,
        }
        | TagStorage::OrderedPairs {
            tags,
        } => tags,
    };

    let mut violations = Vec::new();
    for required in &policy.required_tags {
        let aliases = policy.aliases_of(required);
        if tags.contains_key(required) {
            // Canonical tag present: flag legacy aliases coexisting with it.
            for alias_key in all_derivatives(aliases, tags) {
                if !policy.required_tags.iter().any(|name| name == alias_key) {
                    violations.push(Violation::new(
                        resource.urn.clone(),
                        ViolationKind::RedundantAlias {
                            canonical: required.clone(),
                            alias: alias_key.to_string(),
                        },
                    ));
                }
            }
        } else {
            let alias_keys = all_derivatives(aliases, tags);
            if alias_keys.is_empty() {
                violations.push(Violation::new(
                    resource.urn.clone(),
                    ViolationKind::MissingRequiredTag {
                        tag: required.clone(),
                    },
                ));
            } else {
                for alias_key in alias_keys {
                    violations.push(Violation::new(
                        resource.urn.clone(),
                        ViolationKind::AliasedTag {
                            canonical: required.clone(),
                            alias: alias_key.to_string(),
                        },
                    ));
                }
            }
        }
    }
    violations
}

/// Requires lifecycle tags on resource types matching a timed marker.
fn check_timed_tags(
    resource: &ResourceDescriptor,
    storage: &TagStorage,
    policy: &TagPolicy,
) -> Vec<Violation> {
    if !policy.is_timed_type(&resource.resource_type) {
        return Vec::new();
    }
    missing_from_set(resource, storage, &policy.time_tags)
}

/// Requires provisioning-stack bookkeeping tags.
fn check_stack_tags(
    resource: &ResourceDescriptor,
    storage: &TagStorage,
    policy: &TagPolicy,
) -> Vec<Violation> {
    missing_from_set(resource, storage, &policy.stack_tags)
}

/// Emits one missing-tag violation per absent name when a tag set exists.
fn missing_from_set(
    resource: &ResourceDescriptor,
    storage: &TagStorage,
    names: &[String],
) -> Vec<Violation> {
    let Some(tags) = storage.tag_set() else {
        return Vec::new();
    };
    names
        .iter()
        .filter(|name| !tags.contains_key(name))
        .map(|name| {
            Violation::new(
                resource.urn.clone(),
                ViolationKind::MissingRequiredTag {
                    tag: name.clone(),
                },
            )
        })
        .collect()
}

/// Validates the environment tag value against the allowed set.
fn check_environment_value(
    resource: &ResourceDescriptor,
    storage: &TagStorage,
    policy: &TagPolicy,
) -> Vec<Violation> {
    let Some(tags) = storage.tag_set() else {
        return Vec::new();
    };
    let Some(value) = tags.value_of(ENVIRONMENT_TAG) else {
        return Vec::new();
    };
    let allowed = value
        .as_str()
        .is_some_and(|text| policy.environment_values.iter().any(|member| member == text));
    if allowed {
        return Vec::new();
    }
    vec![Violation::new(
        resource.urn.clone(),
        ViolationKind::InvalidEnvironmentValue {
            value: render_tag_value(value),
            allowed: policy.environment_values.clone(),
        },
    )]
}

/// Validates lifecycle tag values as calendar dates.
///
/// `delete-after` additionally accepts the `Never` sentinel. Absent lifecycle
/// tags are not this check's concern; the timed-tags check owns presence.
fn check_date_formats(resource: &ResourceDescriptor, storage: &TagStorage) -> Vec<Violation> {
    let Some(tags) = storage.tag_set() else {
        return Vec::new();
    };
    let mut violations = Vec::new();
    for tag in [BACKUP_BY_TAG, DELETE_AFTER_TAG] {
        let Some(value) = tags.value_of(tag) else {
            continue;
        };
        if date_value_is_valid(tag, value) {
            continue;
        }
        violations.push(Violation::new(
            resource.urn.clone(),
            ViolationKind::InvalidDateValue {
                tag: tag.to_string(),
                value: render_tag_value(value),
            },
        ));
    }
    violations
}

/// Returns true when a lifecycle tag value is a calendar date or permitted sentinel.
fn date_value_is_valid(tag: &str, value: &Value) -> bool {
    let Some(text) = value.as_str() else {
        return false;
    };
    if tag == DELETE_AFTER_TAG && text == NEVER_SENTINEL {
        return true;
    }
    parse_calendar_date(text).is_some()
}

/// Parses a calendar-date value (YYYY-MM-DD).
fn parse_calendar_date(value: &str) -> Option<Date> {
    let mut parts = value.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let month = time::Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// Renders a tag value for violation messages (strings stay bare).
fn render_tag_value(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}
