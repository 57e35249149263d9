//! Destination Actions - Partner payload builders on top of `eventmap`.
//!
//! Each action turns a raw analytics event into the tracking call a partner
//! expects. Actions are pure data plus the mapping engine: no transport, no
//! credentials, no retries. The resulting [`Track`] is handed to whatever
//! performs the outbound call.
//!
//! # Architecture
//!
//! ```text
//! Raw analytics event (identify / track)
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │       Action (implements trait)          │
//! │  - Resolve field defaults (@path)        │
//! │  - Pre-process (hoist, derive name)      │
//! │  - Interpret event map, finalize         │
//! └─────────────────────────────────────────┘
//!          ↓
//!     Track { event, data }
//!          ↓
//!   Transport (outside this crate)
//! ```
//!
//! # Core Types
//!
//! - [`Action`] - Trait that all destination actions implement
//! - [`Track`] - Partner event name plus mapped payload
//! - [`ActionError`] - Failures while performing an action
//!
//! # Running an action
//!
//! ```
//! use destination_actions::registry::find_action;
//! use serde_json::json;
//!
//! let action = find_action("trackCustomer").unwrap();
//! let track = action
//!     .perform(&json!({
//!         "userId": "12345",
//!         "traits": {"age": "44", "address": {"postalCode": 90210}}
//!     }))
//!     .unwrap();
//!
//! assert_eq!(track.event, "customer");
//! assert_eq!(
//!     serde_json::Value::Object(track.data),
//!     json!({"id": "12345", "age": 44, "zipCode": "90210"})
//! );
//! ```

mod action;
mod types;
pub mod destinations;
pub mod registry;

// Re-export public types
pub use action::{Action, ActionError};
pub use types::Track;
