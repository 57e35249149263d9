pub mod fields;
pub mod maps;

use eventmap::preprocess::{derive_name, hoist_properties};
use eventmap::{EventMap, Record};
use std::sync::Arc;

use crate::{Action, ActionError};

/// Custom attributes that Friendbuy accepts at the payload root.
const ATTRIBUTES: &str = "friendbuyAttributes";

/// Arbitrary properties attached to a custom event.
const EVENT_PROPERTIES: &str = "eventProperties";

/// Returns every Friendbuy action.
pub fn actions() -> Vec<Arc<dyn Action>> {
    vec![
        Arc::new(TrackCustomer),
        Arc::new(TrackPurchase),
        Arc::new(TrackSignUp),
        Arc::new(TrackCustomEvent),
    ]
}

/// Customer records carry custom attributes and a derivable display name.
fn prepare_customer(payload: Record) -> Record {
    derive_name(&hoist_properties(&payload, ATTRIBUTES))
}

/// Creates or updates a customer profile.
pub struct TrackCustomer;

impl Action for TrackCustomer {
    fn name(&self) -> &str {
        "trackCustomer"
    }

    fn fields(&self) -> &Record {
        &fields::TRACK_CUSTOMER
    }

    fn event_map(&self) -> &EventMap {
        &maps::TRACK_CUSTOMER
    }

    fn track_event(&self, _payload: &Record) -> Result<String, ActionError> {
        Ok("customer".to_string())
    }

    fn preprocess(&self, payload: Record) -> Record {
        prepare_customer(payload)
    }
}

/// Records a completed order, with the buyer nested under `customer`.
pub struct TrackPurchase;

impl Action for TrackPurchase {
    fn name(&self) -> &str {
        "trackPurchase"
    }

    fn fields(&self) -> &Record {
        &fields::TRACK_PURCHASE
    }

    fn event_map(&self) -> &EventMap {
        &maps::TRACK_PURCHASE
    }

    fn track_event(&self, _payload: &Record) -> Result<String, ActionError> {
        Ok("purchase".to_string())
    }

    fn preprocess(&self, payload: Record) -> Record {
        prepare_customer(payload)
    }
}

/// Records an account sign-up.
pub struct TrackSignUp;

impl Action for TrackSignUp {
    fn name(&self) -> &str {
        "trackSignUp"
    }

    fn fields(&self) -> &Record {
        &fields::TRACK_SIGN_UP
    }

    fn event_map(&self) -> &EventMap {
        &maps::TRACK_SIGN_UP
    }

    fn track_event(&self, _payload: &Record) -> Result<String, ActionError> {
        Ok("sign_up".to_string())
    }

    fn preprocess(&self, payload: Record) -> Record {
        prepare_customer(payload)
    }
}

/// Forwards any other event under its own name.
///
/// The event name travels as the track call's event, not in its data; event
/// properties are flattened into the data.
pub struct TrackCustomEvent;

impl Action for TrackCustomEvent {
    fn name(&self) -> &str {
        "trackCustomEvent"
    }

    fn fields(&self) -> &Record {
        &fields::TRACK_CUSTOM_EVENT
    }

    fn event_map(&self) -> &EventMap {
        &maps::TRACK_CUSTOM_EVENT
    }

    fn track_event(&self, payload: &Record) -> Result<String, ActionError> {
        payload
            .get("eventType")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or(ActionError::MissingField("eventType"))
    }

    fn preprocess(&self, payload: Record) -> Record {
        prepare_customer(hoist_properties(&payload, EVENT_PROPERTIES))
    }
}
