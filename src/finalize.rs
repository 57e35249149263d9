//! Whole-record post-processing applied once after interpretation.
//!
//! Per-field rules only ever see one source value. A finalizer sees the
//! assembled output and can enforce invariants that span several fields.

use serde_json::Value;
use tracing::debug;

use crate::Record;

/// Post-processing hook run on the assembled output record.
///
/// Implemented for any `Fn(Record) -> Record` closure, so ad-hoc finalizers
/// can be passed straight to [`EventMapBuilder::finalize`].
///
/// [`EventMapBuilder::finalize`]: crate::EventMapBuilder::finalize
pub trait Finalizer: Send + Sync {
    fn finalize(&self, output: Record) -> Record;
}

impl<F> Finalizer for F
where
    F: Fn(Record) -> Record + Send + Sync,
{
    fn finalize(&self, output: Record) -> Record {
        self(output)
    }
}

/// Drops a nested object that lacks its identifying key.
///
/// Partner APIs reject partial identity data, so an `object` without `key`
/// (or with `key: null`) is removed entirely. Non-object values at `object`
/// are left alone.
#[derive(Clone, Debug, PartialEq)]
pub struct RequireKey {
    object: String,
    key: String,
}

impl RequireKey {
    pub fn new(object: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            key: key.into(),
        }
    }
}

impl Finalizer for RequireKey {
    fn finalize(&self, mut output: Record) -> Record {
        let incomplete = match output.get(&self.object) {
            Some(Value::Object(obj)) => obj.get(&self.key).map_or(true, Value::is_null),
            _ => false,
        };

        if incomplete {
            debug!(
                object = %self.object,
                key = %self.key,
                "Dropping object without its required key"
            );
            output.retain(|k, _| k != &self.object);
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_require_key_drops_incomplete_object() {
        let finalizer = RequireKey::new("customer", "id");
        let output = finalizer.finalize(record(json!({
            "id": "order-1",
            "customer": {"email": "a@b.com"}
        })));
        assert_eq!(Value::Object(output), json!({"id": "order-1"}));
    }

    #[test]
    fn test_require_key_drops_null_key() {
        let finalizer = RequireKey::new("customer", "id");
        let output = finalizer.finalize(record(json!({"customer": {"id": null}})));
        assert!(output.get("customer").is_none());
    }

    #[test]
    fn test_require_key_keeps_complete_object() {
        let finalizer = RequireKey::new("customer", "id");
        let input = json!({"customer": {"id": "42", "email": "a@b.com"}});
        let output = finalizer.finalize(record(input.clone()));
        assert_eq!(Value::Object(output), input);
    }

    #[test]
    fn test_require_key_ignores_absent_and_non_object() {
        let finalizer = RequireKey::new("customer", "id");

        let output = finalizer.finalize(record(json!({"amount": 5})));
        assert_eq!(Value::Object(output), json!({"amount": 5}));

        let output = finalizer.finalize(record(json!({"customer": "guest"})));
        assert_eq!(Value::Object(output), json!({"customer": "guest"}));
    }

    #[test]
    fn test_closure_finalizer() {
        let finalizer = |mut output: Record| {
            output.insert("finalized".to_string(), json!(true));
            output
        };
        let output = finalizer.finalize(Record::new());
        assert_eq!(output["finalized"], true);
    }
}
