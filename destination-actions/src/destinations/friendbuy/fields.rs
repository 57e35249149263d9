//! Field defaults for the Friendbuy actions: where each payload field is read
//! from in a raw analytics event.

use eventmap::Record;
use once_cell::sync::Lazy;
use serde_json::json;

/// Builds a directive record of `{"field": {"@path": path}}` entries.
fn paths(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(field, path)| (field.to_string(), json!({ "@path": path })))
        .collect()
}

/// Customer identity fields shared by every action.
///
/// `traits` is the identify-call location; track calls carry the same data
/// under `properties`.
fn customer_paths(scope: &str) -> Vec<(String, String)> {
    [
        "email",
        "isNewCustomer",
        "loyaltyStatus",
        "firstName",
        "lastName",
        "name",
        "age",
        "birthday",
        "friendbuyAttributes",
    ]
    .iter()
    .map(|field| (field.to_string(), format!("$.{}.{}", scope, field)))
    .collect()
}

fn with_customer(mut record: Record, scope: &str) -> Record {
    record.insert("customerId".to_string(), json!({"@path": "$.userId"}));
    record.insert("anonymousId".to_string(), json!({"@path": "$.anonymousId"}));
    for (field, path) in customer_paths(scope) {
        record.insert(field, json!({ "@path": path }));
    }
    record
}

pub static TRACK_CUSTOMER: Lazy<Record> = Lazy::new(|| {
    let mut record = with_customer(Record::new(), "traits");
    record.extend(paths(&[
        ("language", "$.context.locale"),
        ("addressCountry", "$.traits.address.country"),
        ("addressState", "$.traits.address.state"),
        ("addressCity", "$.traits.address.city"),
        ("addressPostalCode", "$.traits.address.postalCode"),
    ]));
    record
});

pub static TRACK_PURCHASE: Lazy<Record> = Lazy::new(|| {
    let record = paths(&[
        ("orderId", "$.properties.order_id"),
        ("amount", "$.properties.total"),
        ("currency", "$.properties.currency"),
        ("coupon", "$.properties.coupon"),
        ("giftCardCodes", "$.properties.giftCardCodes"),
        ("products", "$.properties.products"),
    ]);
    with_customer(record, "properties")
});

pub static TRACK_SIGN_UP: Lazy<Record> = Lazy::new(|| {
    let mut record = with_customer(Record::new(), "properties");
    record.insert("language".to_string(), json!({"@path": "$.context.locale"}));
    record
});

pub static TRACK_CUSTOM_EVENT: Lazy<Record> = Lazy::new(|| {
    let record = paths(&[
        ("eventType", "$.event"),
        ("eventProperties", "$.properties"),
        ("deduplicationId", "$.properties.deduplicationId"),
    ]);
    with_customer(record, "properties")
});
