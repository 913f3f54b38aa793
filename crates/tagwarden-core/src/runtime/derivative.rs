// crates/tagwarden-core/src/runtime/derivative.rs
// ============================================================================
// Module: Tagwarden Derivative Resolver
// Description: Alias detection for canonical tag names over extracted keys.
// Purpose: Find derivative/legacy tag keys by case-insensitive containment.
// Dependencies: crate::core::tags
// ============================================================================

//! ## Overview
//! Derivative resolution scans the lowercase key view of a [`TagSet`] for
//! case-insensitive substring containment of any configured alias. Matching
//! is intentionally loose ("App-Owner" matches alias "app") and may
//! over-match; callers treat results as hints, not proof. Both a first-match
//! and an all-matches query mode exist because downstream logic reports every
//! matching alias occurrence, not just the first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::TagSet;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Returns the original-cased key of the first alias match, if any.
///
/// Scans `lower_keys` in entry order; an empty alias list never matches.
#[must_use]
pub fn first_derivative<'a>(aliases: &[String], tags: &'a TagSet) -> Option<&'a str> {
    tags.lower_keys()
        .iter()
        .position(|lower_key| alias_matches(aliases, lower_key))
        .and_then(|index| tags.entries().get(index).map(|entry| entry.key.as_str()))
}

/// Returns the original-cased keys of every alias match, in key-scan order.
#[must_use]
pub fn all_derivatives<'a>(aliases: &[String], tags: &'a TagSet) -> Vec<&'a str> {
    tags.lower_keys()
        .iter()
        .zip(tags.entries())
        .filter(|(lower_key, _)| alias_matches(aliases, lower_key))
        .map(|(_, entry)| entry.key.as_str())
        .collect()
}

/// Tests case-insensitive substring containment of any alias in a key.
fn alias_matches(aliases: &[String], lower_key: &str) -> bool {
    aliases.iter().any(|alias| lower_key.contains(&alias.to_lowercase()))
}
