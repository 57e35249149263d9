use eventmap::Record;
use serde::Serialize;

/// A partner tracking call, ready to hand to the transport layer.
///
/// # Example
/// ```
/// use destination_actions::Track;
/// use serde_json::json;
///
/// let track = Track {
///     event: "purchase".to_string(),
///     data: json!({"id": "1001"}).as_object().cloned().unwrap(),
/// };
/// assert_eq!(
///     serde_json::to_value(&track).unwrap(),
///     json!({"event": "purchase", "data": {"id": "1001"}})
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Track {
    /// Partner event name (e.g. "customer", "purchase")
    pub event: String,

    /// Mapped event payload
    pub data: Record,
}
