//! Completeness predicate and merge rule
//!
//! Merge strategy: external value wins when it is authentic, otherwise the
//! original is kept as read. An authentic original is never downgraded to a
//! placeholder.

use crate::types::{Field, MetadataRecord, PLACEHOLDERS};

/// Which placeholders count as "missing" for a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceholderMatch {
    /// A field equal to any of the four placeholders is missing
    #[default]
    Lenient,
    /// A field is missing only when equal to its own placeholder
    Strict,
}

/// True when `value` is empty or a placeholder for `field`
pub fn is_missing(field: Field, value: &str, mode: PlaceholderMatch) -> bool {
    if value.trim().is_empty() {
        return true;
    }

    match mode {
        PlaceholderMatch::Lenient => PLACEHOLDERS.contains(&value),
        PlaceholderMatch::Strict => value == field.placeholder(),
    }
}

/// Fields of `record` that still need resolving, in field order
pub fn missing_fields(record: &MetadataRecord, mode: PlaceholderMatch) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|&field| is_missing(field, record.get(field), mode))
        .collect()
}

/// Combine the read record with the externally resolved one
///
/// With no external record (COMPLETE or LOOKUP_FAILED) the original is
/// returned unchanged. Otherwise each authentic external field replaces the
/// original one; a blank original field becomes its own placeholder.
pub fn merge(
    original: &MetadataRecord,
    external: Option<&MetadataRecord>,
    mode: PlaceholderMatch,
) -> MetadataRecord {
    let Some(external) = external else {
        return original.clone();
    };

    let mut merged = original.clone();

    for field in Field::ALL {
        let value = external.get(field);
        if !is_missing(field, value, mode) {
            merged.set(field, value);
        } else if original.get(field).trim().is_empty() {
            merged.set(field, field.placeholder());
        }
    }

    merged
}
