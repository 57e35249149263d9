//! Friendbuy payload shapes, one event map per action.

use eventmap::{
    ArraySpec, Conversion, EventMap, EventMapBuilder, FieldPath, FieldSpec, RequireKey,
};
use once_cell::sync::Lazy;
use serde_json::json;

/// Where customer fields land: the payload root, or a nested object.
#[derive(Clone, Copy)]
enum Placement {
    Root,
    Nested(&'static str),
}

impl Placement {
    fn path(self, name: &str) -> FieldPath {
        match self {
            Placement::Root => FieldPath::Name(name.to_string()),
            Placement::Nested(outer) => [outer, name].into(),
        }
    }

    /// Unchanged value under its own name at this placement.
    fn same_name(self, name: &str) -> FieldSpec {
        match self {
            Placement::Root => FieldSpec::Copy,
            Placement::Nested(_) => FieldSpec::rename(self.path(name)),
        }
    }
}

fn customer_fields(builder: EventMapBuilder, placement: Placement) -> EventMapBuilder {
    let copied = [
        "anonymousId",
        "email",
        "isNewCustomer",
        "loyaltyStatus",
        "firstName",
        "lastName",
        "name",
        "language",
    ];

    let builder = copied.iter().fold(builder, |b, name| {
        b.field(*name, placement.same_name(name))
    });

    builder
        .field(
            "customerId",
            FieldSpec::convert_to(placement.path("id"), Conversion::ToString),
        )
        .field(
            "age",
            FieldSpec::convert_to(placement.path("age"), Conversion::ToInteger),
        )
        .field(
            "birthday",
            FieldSpec::convert_to(placement.path("birthday"), Conversion::PartialDate),
        )
}

fn products() -> ArraySpec {
    ArraySpec::new()
        .default_value("sku", json!("unknown"))
        .default_value("name", json!("unknown"))
        .default_value("quantity", json!(1))
        .field("sku", FieldSpec::convert(Conversion::ToString))
        .field("name", FieldSpec::Copy)
        .field("quantity", FieldSpec::convert(Conversion::ToInteger))
        .field("price", FieldSpec::convert(Conversion::ToNumber))
        .field("description", FieldSpec::Copy)
        .field("category", FieldSpec::Copy)
        .field("url", FieldSpec::Copy)
        .field("image_url", FieldSpec::rename("imageUrl"))
}

pub static TRACK_CUSTOMER: Lazy<EventMap> = Lazy::new(|| {
    customer_fields(EventMap::builder(), Placement::Root)
        .field("addressCountry", FieldSpec::rename("country"))
        .field("addressState", FieldSpec::rename("state"))
        .field("addressCity", FieldSpec::rename("city"))
        .field(
            "addressPostalCode",
            FieldSpec::convert_to("zipCode", Conversion::ToString),
        )
        .pass_through()
        .build()
        .expect("trackCustomer event map is well formed")
});

pub static TRACK_PURCHASE: Lazy<EventMap> = Lazy::new(|| {
    let builder = EventMap::builder()
        .field("orderId", FieldSpec::convert_to("id", Conversion::ToString))
        .field("amount", FieldSpec::convert(Conversion::ToNumber))
        .field("currency", FieldSpec::Copy)
        .field("coupon", FieldSpec::rename("couponCode"))
        .field("giftCardCodes", FieldSpec::Copy)
        .field("products", FieldSpec::Array(products()));

    customer_fields(builder, Placement::Nested("customer"))
        .pass_through()
        .finalize(RequireKey::new("customer", "id"))
        .build()
        .expect("trackPurchase event map is well formed")
});

pub static TRACK_SIGN_UP: Lazy<EventMap> = Lazy::new(|| {
    customer_fields(EventMap::builder(), Placement::Root)
        .pass_through()
        .build()
        .expect("trackSignUp event map is well formed")
});

pub static TRACK_CUSTOM_EVENT: Lazy<EventMap> = Lazy::new(|| {
    let builder = EventMap::builder()
        .field("eventType", FieldSpec::Drop)
        .field("deduplicationId", FieldSpec::Copy);

    customer_fields(builder, Placement::Root)
        .pass_through()
        .build()
        .expect("trackCustomEvent event map is well formed")
});

#[cfg(test)]
mod tests {
    use super::*;
    use eventmap::{interpret, UnmappedPolicy};
    use serde_json::Value;

    fn record(value: Value) -> eventmap::Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_all_maps_build() {
        assert_eq!(TRACK_CUSTOMER.unmapped_policy(), UnmappedPolicy::PassThroughToRoot);
        assert!(TRACK_PURCHASE.finalizer().is_some());
        assert!(TRACK_SIGN_UP.finalizer().is_none());
        assert_eq!(TRACK_CUSTOM_EVENT.fields()["eventType"], FieldSpec::Drop);
    }

    #[test]
    fn test_purchase_nests_customer() {
        let output = interpret(
            &TRACK_PURCHASE,
            &record(json!({"orderId": 5, "customerId": "c-1", "email": "a@b.com", "age": "30"})),
        );
        assert_eq!(
            Value::Object(output),
            json!({"id": "5", "customer": {"id": "c-1", "email": "a@b.com", "age": 30}})
        );
    }

    #[test]
    fn test_customer_at_root() {
        let output = interpret(
            &TRACK_CUSTOMER,
            &record(json!({"customerId": 1, "email": "a@b.com", "addressCity": "Austin"})),
        );
        assert_eq!(
            Value::Object(output),
            json!({"id": "1", "email": "a@b.com", "city": "Austin"})
        );
    }
}
