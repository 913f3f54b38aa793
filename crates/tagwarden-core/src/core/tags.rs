// crates/tagwarden-core/src/core/tags.rs
// ============================================================================
// Module: Tagwarden Tag Storage
// Description: Canonical tag set and the raw tag-storage extractor.
// Purpose: Normalize heterogeneous tag storage shapes into ordered entries.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Provisioning declarations store tags either as a key-to-value mapping or
//! as an ordered sequence of key/value records; both normalize into a
//! [`TagSet`] of ordered entries. Unrecognized shapes surface as
//! [`TagStorage::Unsupported`] so rule checks can report them instead of
//! guessing. Extraction is a pure function of the property bag.
//! Invariants:
//! - Entry order follows raw storage order; duplicate keys are preserved.
//! - `lower_keys[i]` is the lowercase form of `keys[i]` for all `i`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Tag Entries
// ============================================================================

/// Property key holding raw tag storage in a resource declaration.
pub const TAGS_PROPERTY: &str = "tags";
/// Record field holding the tag name in sequence-shaped storage.
const RECORD_KEY_FIELD: &str = "key";
/// Record field holding the tag value in sequence-shaped storage.
const RECORD_VALUE_FIELD: &str = "value";

/// One tag as extracted from raw storage.
///
/// # Invariants
/// - `key` retains its original casing; values are opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    /// Tag key in its original casing.
    pub key: String,
    /// Opaque tag value.
    pub value: Value,
}

impl TagEntry {
    /// Creates a tag entry from a key and value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

// ============================================================================
// SECTION: Tag Set
// ============================================================================

/// Canonical ordered tag collection produced by extraction.
///
/// # Invariants
/// - Duplicate keys are preserved; exact-match lookup returns the first entry.
/// - The lowercase key view is index-aligned with the entry list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    /// Ordered tag entries.
    entries: Vec<TagEntry>,
    /// Index-aligned lowercase key view.
    lower_keys: Vec<String>,
}

impl TagSet {
    /// Builds a tag set, deriving the lowercase key view.
    #[must_use]
    pub fn new(entries: Vec<TagEntry>) -> Self {
        let lower_keys = entries.iter().map(|entry| entry.key.to_lowercase()).collect();
        Self {
            entries,
            lower_keys,
        }
    }

    /// Returns the ordered tag entries.
    #[must_use]
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Returns the ordered tag keys in their original casing.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    /// Returns the index-aligned lowercase key view.
    #[must_use]
    pub fn lower_keys(&self) -> &[String] {
        &self.lower_keys
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true when a key is present (exact, case-sensitive match).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    /// Returns the value of the first entry with the key (exact match).
    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|entry| entry.key == key).map(|entry| &entry.value)
    }
}

// ============================================================================
// SECTION: Tag Storage Variants
// ============================================================================

/// Normalized tag storage extracted from a resource property bag.
///
/// # Invariants
/// - `Absent` (no `tags` property) is distinct from an empty `Mapping`.
/// - `Unsupported` names the unrecognized raw shape for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TagStorage {
    /// The property bag has no `tags` property.
    Absent,
    /// Tags were stored as a key-to-value mapping.
    Mapping {
        /// Extracted tag set in insertion order.
        tags: TagSet,
    },
    /// Tags were stored as an ordered sequence of key/value records.
    OrderedPairs {
        /// Extracted tag set in sequence order.
        tags: TagSet,
    },
    /// Tag storage was present but not a recognized shape.
    Unsupported {
        /// Name of the unrecognized raw value type.
        found: String,
    },
}

impl TagStorage {
    /// Returns the extracted tag set for the recognized shapes.
    #[must_use]
    pub const fn tag_set(&self) -> Option<&TagSet> {
        match self {
            Self::Mapping {
                tags,
            }
            | Self::OrderedPairs {
                tags,
            } => Some(tags),
            Self::Absent
            | Self::Unsupported {
                ..
            } => None,
        }
    }

    /// Returns true when the property bag carried no tag storage at all.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Extracts raw tag storage from a resource property bag.
///
/// Mapping-shaped storage preserves insertion order. Sequence-shaped storage
/// contributes one entry per record carrying a string `key` field (value
/// defaults to JSON null); records without one are silently skipped. Any
/// other shape is reported as unsupported.
#[must_use]
pub fn extract_tags(properties: &Value) -> TagStorage {
    let Value::Object(bag) = properties else {
        return TagStorage::Absent;
    };
    match bag.get(TAGS_PROPERTY) {
        None => TagStorage::Absent,
        Some(Value::Object(map)) => {
            let entries =
                map.iter().map(|(key, value)| TagEntry::new(key.clone(), value.clone())).collect();
            TagStorage::Mapping {
                tags: TagSet::new(entries),
            }
        }
        Some(Value::Array(records)) => {
            let entries = records
                .iter()
                .filter_map(|record| {
                    let Value::Object(fields) = record else {
                        return None;
                    };
                    let key = fields.get(RECORD_KEY_FIELD)?.as_str()?;
                    let value = fields.get(RECORD_VALUE_FIELD).cloned().unwrap_or(Value::Null);
                    Some(TagEntry::new(key, value))
                })
                .collect();
            TagStorage::OrderedPairs {
                tags: TagSet::new(entries),
            }
        }
        Some(other) => TagStorage::Unsupported {
            found: json_type_name(other).to_string(),
        },
    }
}

/// Returns the JSON type name of a value for unsupported-shape reporting.
const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
