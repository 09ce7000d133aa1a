//! JSON interchange for export and bulk import.
//!
//! The interchange format is a flat JSON array of bookmark objects. Any `id`
//! field present on an imported object is ignored — the store assigns fresh
//! identifiers. A payload that is not valid JSON, not an array, or contains a
//! non-object element rejects the whole batch with `MalformedInterchange`.

use serde_json::Value;

use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::StoreError;

/// Serializes the full record set as a JSON array for export.
pub fn export_json(records: &[Bookmark]) -> Result<String, StoreError> {
    serde_json::to_string_pretty(records)
        .map_err(|e| StoreError::MalformedInterchange(format!("export failed: {}", e)))
}

/// Parses an import payload into records ready for `bulk_import`.
pub fn parse_import(payload: &str) -> Result<Vec<NewBookmark>, StoreError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| StoreError::MalformedInterchange(format!("not valid JSON: {}", e)))?;
    let items = value.as_array().ok_or_else(|| {
        StoreError::MalformedInterchange("expected a JSON array of bookmark objects".to_string())
    })?;
    from_values(items)
}

/// Converts already-parsed JSON values into import records, rejecting the whole
/// batch on the first malformed element.
pub fn from_values(items: &[Value]) -> Result<Vec<NewBookmark>, StoreError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(StoreError::MalformedInterchange(format!(
                    "element {} is not an object",
                    i
                )));
            }
            serde_json::from_value::<NewBookmark>(item.clone()).map_err(|e| {
                StoreError::MalformedInterchange(format!("element {}: {}", i, e))
            })
        })
        .collect()
}
