use super::*;
use crate::finalize::RequireKey;
use serde_json::json;

#[test]
fn test_build_valid_map() {
    let map = EventMap::builder()
        .field("type", FieldSpec::Drop)
        .field("email", FieldSpec::Copy)
        .field("customerId", FieldSpec::convert_to(["customer", "id"], Conversion::ToString))
        .field("firstName", FieldSpec::rename(["customer", "firstName"]))
        .pass_through()
        .finalize(RequireKey::new("customer", "id"))
        .build()
        .unwrap();

    assert_eq!(map.fields().len(), 4);
    assert_eq!(map.unmapped_policy(), UnmappedPolicy::PassThroughToRoot);
    assert!(map.finalizer().is_some());
    assert_eq!(map.fields()["type"], FieldSpec::Drop);
}

#[test]
fn test_default_policy_is_drop() {
    let map = EventMap::builder().build().unwrap();
    assert_eq!(map.unmapped_policy(), UnmappedPolicy::Drop);
    assert!(map.finalizer().is_none());
    assert!(map.fields().is_empty());
}

#[test]
fn test_duplicate_field_rejected() {
    let result = EventMap::builder()
        .field("email", FieldSpec::Copy)
        .field("email", FieldSpec::Drop)
        .build();
    assert_eq!(
        result.unwrap_err(),
        EventMapError::DuplicateField("email".to_string())
    );
}

#[test]
fn test_duplicate_target_rejected() {
    let result = EventMap::builder()
        .field("orderId", FieldSpec::rename("id"))
        .field("id", FieldSpec::Copy)
        .build();
    assert_eq!(
        result.unwrap_err(),
        EventMapError::DuplicateTarget {
            target: "id".to_string(),
            first: "orderId".to_string(),
            second: "id".to_string(),
        }
    );
}

#[test]
fn test_duplicate_nested_target_rejected() {
    let result = EventMap::builder()
        .field("customerId", FieldSpec::rename(["customer", "id"]))
        .field("userId", FieldSpec::convert_to(["customer", "id"], Conversion::ToString))
        .build();
    assert!(matches!(
        result,
        Err(EventMapError::DuplicateTarget { ref target, .. }) if target == "customer.id"
    ));
}

#[test]
fn test_name_shadowing_nested_outer_rejected() {
    // A plain "customer" field would clobber the nested customer object
    let result = EventMap::builder()
        .field("email", FieldSpec::rename(["customer", "email"]))
        .field("customer", FieldSpec::Copy)
        .build();
    assert!(matches!(result, Err(EventMapError::DuplicateTarget { .. })));

    let result = EventMap::builder()
        .field("customer", FieldSpec::Copy)
        .field("email", FieldSpec::rename(["customer", "email"]))
        .build();
    assert!(matches!(result, Err(EventMapError::DuplicateTarget { .. })));
}

#[test]
fn test_sibling_nested_targets_allowed() {
    let result = EventMap::builder()
        .field("customerId", FieldSpec::rename(["customer", "id"]))
        .field("email", FieldSpec::rename(["customer", "email"]))
        .build();
    assert!(result.is_ok());
}

#[test]
fn test_dropped_fields_claim_nothing() {
    let result = EventMap::builder()
        .field("id", FieldSpec::Drop)
        .field("orderId", FieldSpec::rename("id"))
        .build();
    assert!(result.is_ok());
}

#[test]
fn test_nested_array_rejected() {
    let inner = ArraySpec::new().field("sku", FieldSpec::Copy);
    let outer = ArraySpec::new().field("variants", FieldSpec::Array(inner));
    let result = EventMap::builder()
        .field("products", FieldSpec::Array(outer))
        .build();
    assert_eq!(
        result.unwrap_err(),
        EventMapError::NestedArray("products.variants".to_string())
    );
}

#[test]
fn test_array_targets_checked() {
    let array = ArraySpec::new()
        .field("productId", FieldSpec::rename("sku"))
        .field("sku", FieldSpec::convert(Conversion::ToString));
    let result = EventMap::builder()
        .field("products", FieldSpec::Array(array))
        .build();
    assert!(matches!(result, Err(EventMapError::DuplicateTarget { .. })));
}

#[test]
fn test_array_spec_builder() {
    let array = ArraySpec::new()
        .default_value("quantity", json!(1))
        .field("quantity", FieldSpec::convert(Conversion::ToInteger));
    assert_eq!(array.default_object["quantity"], 1);
    assert_eq!(
        array.fields["quantity"],
        FieldSpec::Convert {
            path: None,
            convert: Conversion::ToInteger
        }
    );
}

#[test]
fn test_spec_targets() {
    assert_eq!(FieldSpec::Drop.target("a"), None);
    assert_eq!(FieldSpec::Copy.target("a"), Some(FieldPath::Name("a".to_string())));
    assert_eq!(
        FieldSpec::convert(Conversion::ToNumber).target("amount"),
        Some(FieldPath::Name("amount".to_string()))
    );
    assert_eq!(
        FieldSpec::rename(["customer", "id"]).target("customerId"),
        Some(FieldPath::Nested("customer".to_string(), "id".to_string()))
    );
}

#[test]
fn test_error_display() {
    let err = EventMapError::DuplicateTarget {
        target: "customer.id".to_string(),
        first: "customerId".to_string(),
        second: "userId".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "fields 'customerId' and 'userId' both write output 'customer.id'"
    );
}

#[test]
fn test_event_map_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EventMap>();
}
