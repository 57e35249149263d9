use serde_json::{Map, Value};
use std::fmt;

use crate::Record;

/// Destination of a mapped value in the output record.
///
/// Only one level of nesting is supported: either a top-level field or a
/// field inside a top-level object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldPath {
    /// `output[name]`
    Name(String),
    /// `output[outer][inner]`
    Nested(String, String),
}

impl FieldPath {
    /// The top-level output key this path writes under.
    pub fn root(&self) -> &str {
        match self {
            FieldPath::Name(name) => name,
            FieldPath::Nested(outer, _) => outer,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Name(name) => write!(f, "{}", name),
            FieldPath::Nested(outer, inner) => write!(f, "{}.{}", outer, inner),
        }
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        FieldPath::Name(name.to_string())
    }
}

impl From<String> for FieldPath {
    fn from(name: String) -> Self {
        FieldPath::Name(name)
    }
}

impl From<[&str; 2]> for FieldPath {
    fn from([outer, inner]: [&str; 2]) -> Self {
        FieldPath::Nested(outer.to_string(), inner.to_string())
    }
}

/// Writes `value` into `tree` at `path`.
///
/// A `None` value is a no-op: the key (and any containing object) is never
/// created. For nested paths the outer object is created when absent, and
/// replaced by an empty object when it holds a non-object value.
pub fn write(tree: &mut Record, path: &FieldPath, value: Option<Value>) {
    let Some(value) = value else {
        return;
    };

    match path {
        FieldPath::Name(name) => {
            tree.insert(name.clone(), value);
        }
        FieldPath::Nested(outer, inner) => {
            let slot = tree
                .entry(outer.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(obj) = slot {
                obj.insert(inner.clone(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_simple_name() {
        let mut tree = Record::new();
        write(&mut tree, &"email".into(), Some(json!("a@b.com")));
        assert_eq!(Value::Object(tree), json!({"email": "a@b.com"}));
    }

    #[test]
    fn test_write_overwrites_existing() {
        let mut tree = Record::new();
        write(&mut tree, &"email".into(), Some(json!("old")));
        write(&mut tree, &"email".into(), Some(json!("new")));
        assert_eq!(tree["email"], "new");
    }

    #[test]
    fn test_write_nested_creates_outer() {
        let mut tree = Record::new();
        write(&mut tree, &["customer", "id"].into(), Some(json!("42")));
        write(&mut tree, &["customer", "email"].into(), Some(json!("a@b.com")));
        assert_eq!(
            Value::Object(tree),
            json!({"customer": {"id": "42", "email": "a@b.com"}})
        );
    }

    #[test]
    fn test_write_nested_replaces_non_object_outer() {
        let mut tree = Record::new();
        tree.insert("customer".to_string(), json!("not an object"));
        write(&mut tree, &["customer", "id"].into(), Some(json!("42")));
        assert_eq!(Value::Object(tree), json!({"customer": {"id": "42"}}));
    }

    #[test]
    fn test_write_none_is_noop() {
        let mut tree = Record::new();
        write(&mut tree, &"age".into(), None);
        write(&mut tree, &["customer", "age"].into(), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_display_and_root() {
        let nested: FieldPath = ["customer", "id"].into();
        assert_eq!(nested.to_string(), "customer.id");
        assert_eq!(nested.root(), "customer");

        let name: FieldPath = "id".into();
        assert_eq!(name.to_string(), "id");
        assert_eq!(name.root(), "id");
    }
}
