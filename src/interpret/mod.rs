use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::event_map::{ArraySpec, EventMap, FieldSpec, FieldTable, UnmappedPolicy};
use crate::path::{write, FieldPath};
use crate::Record;


/// Maps `source` to a fresh output record and runs the map's finalizer.
///
/// Pure: neither the map nor the source is modified, and nothing is retained
/// between calls.
pub fn interpret(map: &EventMap, source: &Record) -> Record {
    let output = interpret_fields(map.fields(), source, map.unmapped_policy());
    match map.finalizer() {
        Some(finalizer) => finalizer.finalize(output),
        None => output,
    }
}

/// Applies one level of field specs to `source`.
///
/// Declared specs are written first; pass-through fields are copied to the
/// root afterwards and never overwrite a declared write, so the result does
/// not depend on source key order.
pub fn interpret_fields(
    fields: &FieldTable,
    source: &Record,
    unmapped: UnmappedPolicy,
) -> Record {
    let mut output = Record::new();
    let mut passed = Vec::new();

    for (key, value) in source {
        match fields.get(key) {
            Some(spec) => apply(&mut output, key, spec, value),
            None if unmapped == UnmappedPolicy::PassThroughToRoot => passed.push((key, value)),
            None => trace!(field = %key, "Unmapped field dropped"),
        }
    }

    for (key, value) in passed {
        if output.contains_key(key) {
            debug!(field = %key, "Pass-through field shadowed by mapped output");
            continue;
        }
        output.insert(key.clone(), value.clone());
    }

    output
}

fn apply(output: &mut Record, key: &str, spec: &FieldSpec, value: &Value) {
    match spec {
        FieldSpec::Drop => trace!(field = %key, "Field dropped"),
        FieldSpec::Copy => {
            write(output, &FieldPath::Name(key.to_string()), Some(value.clone()))
        }
        FieldSpec::Rename { path } => write(output, path, Some(value.clone())),
        FieldSpec::Convert { path, convert } => {
            let converted = convert.apply(value);
            if converted.is_none() {
                debug!(
                    field = %key,
                    conversion = %convert,
                    "Conversion produced no value, field omitted"
                );
                return;
            }
            match path {
                Some(path) => write(output, path, converted),
                None => write(output, &FieldPath::Name(key.to_string()), converted),
            }
        }
        FieldSpec::Array(array) => apply_array(output, key, array, value),
    }
}

fn apply_array(output: &mut Record, key: &str, array: &ArraySpec, value: &Value) {
    let elements = match value {
        Value::Array(elements) => elements,
        Value::Null => return,
        other => {
            shape_mismatch(key, "array", other);
            return;
        }
    };

    let mapped = map_array(elements, &array.default_object, &array.fields);
    if mapped.is_empty() {
        trace!(field = %key, "Empty array omitted");
        return;
    }
    output.insert(key.to_string(), Value::Array(mapped));
}

/// Maps each element of a source array through `fields`.
///
/// Every element is overlaid on `default_object` (element keys win) and then
/// interpreted with unmapped fields dropped. Order is preserved; an empty
/// input yields an empty output.
pub fn map_array(
    elements: &[Value],
    default_object: &Record,
    fields: &FieldTable,
) -> Vec<Value> {
    elements
        .iter()
        .filter_map(|element| {
            let Value::Object(element) = element else {
                shape_mismatch("array element", "object", element);
                return None;
            };

            let mut merged = default_object.clone();
            for (k, v) in element {
                merged.insert(k.clone(), v.clone());
            }

            Some(Value::Object(interpret_fields(
                fields,
                &merged,
                UnmappedPolicy::Drop,
            )))
        })
        .collect()
}

/// A value whose shape the event map cannot handle.
///
/// Upstream schema validation makes this unreachable for well-formed maps, so
/// debug builds panic; release builds log and skip the value.
fn shape_mismatch(field: &str, expected: &str, found: &Value) {
    warn!(
        field = %field,
        expected = %expected,
        found = %kind(found),
        "Value shape does not match event map"
    );
    debug_assert!(
        false,
        "{}: expected {}, found {}",
        field,
        expected,
        kind(found)
    );
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
