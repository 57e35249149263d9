//! Declarative event-to-payload mapping engine.
//!
//! A destination action describes, once, how an incoming event record is
//! reshaped into the payload a partner API expects. The description is an
//! [`EventMap`]: a table of per-field rules plus a policy for fields the table
//! does not mention and an optional whole-record finalizer.
//!
//! # Pipeline
//!
//! ```text
//! raw event ──extract──▶ source record ──preprocess──▶ source record
//!                                                          │
//!                                   interpret (EventMap) ◀─┘
//!                                          │
//!                                      finalize
//!                                          ▼
//!                                   output record (hand-off-ready JSON)
//! ```
//!
//! # Example
//!
//! ```
//! use eventmap::{interpret, Conversion, EventMap, FieldSpec};
//! use serde_json::json;
//!
//! let map = EventMap::builder()
//!     .field("customerId", FieldSpec::convert_to("id", Conversion::ToString))
//!     .field("age", FieldSpec::convert(Conversion::ToInteger))
//!     .field("email", FieldSpec::rename(["customer", "email"]))
//!     .build()
//!     .unwrap();
//!
//! let source = json!({"customerId": 12345, "age": "44", "email": "a@b.com"});
//! let output = interpret(&map, source.as_object().unwrap());
//!
//! assert_eq!(
//!     serde_json::Value::Object(output),
//!     json!({"id": "12345", "age": 44, "customer": {"email": "a@b.com"}})
//! );
//! ```

use serde_json::{Map, Value};

// Value coercion helpers
pub mod convert;

// Output path resolution and writes
pub mod path;

// Field-spec tables and their validation
pub mod event_map;

// Mapping interpreter and array element mapper
pub mod interpret;

// Whole-record post-processing
pub mod finalize;

// Whole-record pre-processing helpers
pub mod preprocess;

// Action field defaults resolved from raw events
pub mod extract;

// TOML/env configuration and logging setup
pub mod config;

/// An ordered JSON object: the shape of both source and output records.
pub type Record = Map<String, Value>;

pub use convert::Conversion;
pub use event_map::{
    ArraySpec, EventMap, EventMapBuilder, EventMapError, FieldSpec, UnmappedPolicy,
};
pub use finalize::{Finalizer, RequireKey};
pub use interpret::{interpret, interpret_fields, map_array};
pub use path::FieldPath;
