//! Resolution of an action's field defaults against a raw event.
//!
//! Actions declare where each of their fields comes from in the incoming
//! event, e.g. `{"customerId": {"@path": "$.userId"}}`. Resolving those
//! directives yields the source record the mapping engine works on.
//!
//! Supported directives:
//! - `{"@path": "$.a.b"}` looks a value up by dotted path from the event root
//! - `{"@literal": value}` yields `value`
//! - any other object is resolved member by member, and is absent when
//!   none of its members resolve
//! - any other value is used as is

use serde_json::Value;
use std::fmt;

use crate::Record;

const PATH: &str = "@path";
const LITERAL: &str = "@literal";

/// Directive resolution errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// A `@path` that is not a string starting with `$`.
    InvalidPath(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::InvalidPath(path) => {
                write!(f, "invalid @path '{}': must start with '$'", path)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Resolves every directive in `directives` against `event`.
///
/// Fields whose directive resolves to nothing are omitted from the result.
pub fn resolve_fields(directives: &Record, event: &Value) -> Result<Record, ExtractError> {
    let mut resolved = Record::new();
    for (field, directive) in directives {
        if let Some(value) = resolve(directive, event)? {
            resolved.insert(field.clone(), value);
        }
    }
    Ok(resolved)
}

/// Resolves a single directive; `None` means the referenced value is absent.
pub fn resolve(directive: &Value, event: &Value) -> Result<Option<Value>, ExtractError> {
    let Value::Object(obj) = directive else {
        return Ok(Some(directive.clone()));
    };

    if obj.len() == 1 {
        if let Some(path) = obj.get(PATH) {
            return match path {
                Value::String(path) => lookup(event, path),
                other => Err(ExtractError::InvalidPath(other.to_string())),
            };
        }
        if let Some(literal) = obj.get(LITERAL) {
            return Ok(Some(literal.clone()));
        }
    }

    let mut resolved = Record::new();
    for (key, member) in obj {
        if let Some(value) = resolve(member, event)? {
            resolved.insert(key.clone(), value);
        }
    }
    if resolved.is_empty() && !obj.is_empty() {
        return Ok(None);
    }
    Ok(Some(Value::Object(resolved)))
}

/// Looks up a `$`-rooted dotted path.
///
/// Numeric segments index into arrays. Any missing segment yields `None`.
pub fn lookup(event: &Value, path: &str) -> Result<Option<Value>, ExtractError> {
    let rest = path
        .strip_prefix('$')
        .ok_or_else(|| ExtractError::InvalidPath(path.to_string()))?;

    if rest.is_empty() {
        return Ok(Some(event.clone()));
    }
    let rest = rest
        .strip_prefix('.')
        .ok_or_else(|| ExtractError::InvalidPath(path.to_string()))?;

    let mut current = event;
    for segment in rest.split('.') {
        if segment.is_empty() {
            return Err(ExtractError::InvalidPath(path.to_string()));
        }
        let next = match current {
            Value::Object(obj) => obj.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Ok(None),
        }
    }
    Ok(Some(current.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event() -> Value {
        json!({
            "userId": "12345",
            "traits": {
                "age": "44",
                "address": {"postalCode": 90210}
            },
            "properties": {
                "products": [{"sku": "a"}, {"sku": "b"}]
            }
        })
    }

    #[test]
    fn test_lookup_paths() {
        let event = event();
        assert_eq!(lookup(&event, "$.userId").unwrap(), Some(json!("12345")));
        assert_eq!(
            lookup(&event, "$.traits.address.postalCode").unwrap(),
            Some(json!(90210))
        );
        assert_eq!(
            lookup(&event, "$.properties.products.1.sku").unwrap(),
            Some(json!("b"))
        );
        assert_eq!(lookup(&event, "$").unwrap(), Some(event.clone()));
    }

    #[test]
    fn test_lookup_missing() {
        let event = event();
        assert_eq!(lookup(&event, "$.anonymousId").unwrap(), None);
        assert_eq!(lookup(&event, "$.traits.age.value").unwrap(), None);
        assert_eq!(lookup(&event, "$.properties.products.9").unwrap(), None);
    }

    #[test]
    fn test_lookup_invalid() {
        let event = event();
        assert!(matches!(lookup(&event, "userId"), Err(ExtractError::InvalidPath(_))));
        assert!(matches!(lookup(&event, "$userId"), Err(ExtractError::InvalidPath(_))));
        assert!(matches!(lookup(&event, "$.traits..age"), Err(ExtractError::InvalidPath(_))));
    }

    #[test]
    fn test_resolve_fields() {
        let directives = json!({
            "customerId": {"@path": "$.userId"},
            "age": {"@path": "$.traits.age"},
            "anonymousId": {"@path": "$.anonymousId"},
            "source": {"@literal": "segment"},
            "channel": "web",
            "address": {
                "postalCode": {"@path": "$.traits.address.postalCode"},
                "country": {"@path": "$.traits.address.country"}
            }
        });
        let resolved = resolve_fields(directives.as_object().unwrap(), &event()).unwrap();
        assert_eq!(
            Value::Object(resolved),
            json!({
                "customerId": "12345",
                "age": "44",
                "source": "segment",
                "channel": "web",
                "address": {"postalCode": 90210}
            })
        );
    }

    #[test]
    fn test_object_with_no_resolved_members_absent() {
        let directives = json!({
            "userId": {"@path": "$.userId"},
            "address": {
                "city": {"@path": "$.traits.address.city"},
                "country": {"@path": "$.traits.address.country"}
            },
            "empty": {}
        });
        let resolved = resolve_fields(directives.as_object().unwrap(), &event()).unwrap();
        assert_eq!(
            Value::Object(resolved),
            json!({"userId": "12345", "empty": {}})
        );
    }

    #[test]
    fn test_literal_object_not_resolved() {
        let directive = json!({"@literal": {"@path": "$.userId"}});
        assert_eq!(
            resolve(&directive, &event()).unwrap(),
            Some(json!({"@path": "$.userId"}))
        );
    }

    #[test]
    fn test_non_string_path_rejected() {
        let directive = json!({"@path": 5});
        assert_eq!(
            resolve(&directive, &event()),
            Err(ExtractError::InvalidPath("5".to_string()))
        );
    }
}
