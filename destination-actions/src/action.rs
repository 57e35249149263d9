use eventmap::extract::{resolve_fields, ExtractError};
use eventmap::{interpret, EventMap, FieldSpec, Record};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::types::Track;

/// Errors raised while performing an action on an event.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    /// The raw event is not a JSON object.
    EventNotObject,
    /// A field the action cannot do without is absent or mistyped.
    MissingField(&'static str),
    /// A field holds a value the event map cannot take, e.g. a non-array
    /// where a list of objects is expected.
    InvalidField(String),
    /// A field default could not be resolved.
    Extract(ExtractError),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::EventNotObject => write!(f, "event must be a JSON object"),
            ActionError::MissingField(name) => write!(f, "required field '{}' is missing", name),
            ActionError::InvalidField(name) => {
                write!(f, "field '{}' must be an array of objects", name)
            }
            ActionError::Extract(e) => write!(f, "field resolution failed: {}", e),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<ExtractError> for ActionError {
    fn from(e: ExtractError) -> Self {
        ActionError::Extract(e)
    }
}

/// Destination action interface.
///
/// An action is fully described by static data: where its fields come from
/// in the raw event, how they map onto the partner payload, and which
/// partner event it produces. Actions hold no state; [`Action::perform`]
/// can run concurrently for different events.
///
/// # Pipeline
/// 1. `fields()` directives are resolved against the raw event
/// 2. `track_event()` names the partner event
/// 3. `preprocess()` reshapes the resolved record
/// 4. array fields are checked to hold objects
/// 5. `event_map()` is interpreted over the result
///
/// # Example
/// ```
/// use destination_actions::{Action, ActionError};
/// use eventmap::{EventMap, FieldSpec, Record};
/// use once_cell::sync::Lazy;
/// use serde_json::json;
///
/// static FIELDS: Lazy<Record> = Lazy::new(|| {
///     json!({"email": {"@path": "$.traits.email"}})
///         .as_object()
///         .cloned()
///         .unwrap_or_default()
/// });
/// static MAP: Lazy<EventMap> = Lazy::new(|| {
///     EventMap::builder()
///         .field("email", FieldSpec::Copy)
///         .build()
///         .expect("valid event map")
/// });
///
/// struct Subscribe;
///
/// impl Action for Subscribe {
///     fn name(&self) -> &str {
///         "subscribe"
///     }
///
///     fn fields(&self) -> &Record {
///         &FIELDS
///     }
///
///     fn event_map(&self) -> &EventMap {
///         &MAP
///     }
///
///     fn track_event(&self, _payload: &Record) -> Result<String, ActionError> {
///         Ok("subscribe".to_string())
///     }
/// }
///
/// let track = Subscribe.perform(&json!({"traits": {"email": "a@b.com"}})).unwrap();
/// assert_eq!(track.event, "subscribe");
/// assert_eq!(track.data["email"], "a@b.com");
/// ```
pub trait Action: Send + Sync {
    /// Action identifier, e.g. `"trackPurchase"`.
    fn name(&self) -> &str;

    /// Field defaults: one directive per payload field.
    fn fields(&self) -> &Record;

    /// Mapping from the resolved payload to the partner's shape.
    fn event_map(&self) -> &EventMap;

    /// Partner event name for a resolved payload.
    fn track_event(&self, payload: &Record) -> Result<String, ActionError>;

    /// Whole-record reshaping run before interpretation.
    fn preprocess(&self, payload: Record) -> Record {
        payload
    }

    /// Runs the action over a raw event.
    fn perform(&self, event: &Value) -> Result<Track, ActionError> {
        if !event.is_object() {
            return Err(ActionError::EventNotObject);
        }

        let payload = resolve_fields(self.fields(), event)?;
        let event_name = self.track_event(&payload)?;
        let source = self.preprocess(payload);
        check_arrays(self.event_map(), &source)?;
        let data = interpret(self.event_map(), &source);

        debug!(
            action = %self.name(),
            event = %event_name,
            fields = data.len(),
            "Action performed"
        );

        Ok(Track {
            event: event_name,
            data,
        })
    }
}

/// Rejects array-mapped fields whose value is not a list of objects.
///
/// A null field is left to the interpreter, which treats it as absent.
fn check_arrays(map: &EventMap, source: &Record) -> Result<(), ActionError> {
    for (key, value) in source {
        let Some(FieldSpec::Array(_)) = map.fields().get(key) else {
            continue;
        };
        let valid = match value {
            Value::Null => true,
            Value::Array(elements) => elements.iter().all(Value::is_object),
            _ => false,
        };
        if !valid {
            debug!(field = %key, "Array field rejected");
            return Err(ActionError::InvalidField(key.clone()));
        }
    }
    Ok(())
}
