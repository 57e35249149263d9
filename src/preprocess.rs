//! Whole-record helpers run on a source record before interpretation.
//!
//! Each helper returns a new record; the caller's record is left untouched.

use serde_json::Value;

use crate::Record;

/// Fills in `name` from `firstName` and `lastName` when it is missing.
///
/// `name` counts as missing when absent, `null`, or an empty string. Blank
/// name parts are skipped; if both are blank the record is returned as is.
pub fn derive_name(source: &Record) -> Record {
    let mut record = source.clone();

    let has_name = match source.get("name") {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    };
    if has_name {
        return record;
    }

    let parts: Vec<&str> = ["firstName", "lastName"]
        .iter()
        .filter_map(|key| source.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if !parts.is_empty() {
        record.insert("name".to_string(), Value::String(parts.join(" ")));
    }
    record
}

/// Moves the entries of the object at `key` to the record root.
///
/// The nested object itself is removed. Keys already present at the root
/// keep their root value. A non-object value at `key` is removed and ignored.
pub fn hoist_properties(source: &Record, key: &str) -> Record {
    let mut record: Record = source
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    if let Some(Value::Object(nested)) = source.get(key) {
        for (k, v) in nested {
            if !record.contains_key(k) {
                record.insert(k.clone(), v.clone());
            }
        }
    }
    record
}
