use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::convert::Conversion;
use crate::finalize::Finalizer;
use crate::path::FieldPath;
use crate::Record;

#[cfg(test)]
mod tests;

/// Field-spec lookup table keyed by source field name.
pub type FieldTable = HashMap<String, FieldSpec>;

/// How one source field maps to the output record.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldSpec {
    /// Consumed, never written.
    Drop,
    /// Written under the same name, unchanged.
    Copy,
    /// Written unchanged at `path`.
    Rename { path: FieldPath },
    /// Converted, then written at `path` (or under the source name).
    Convert {
        path: Option<FieldPath>,
        convert: Conversion,
    },
    /// Each element of a source array interpreted against a nested table.
    Array(ArraySpec),
}

impl FieldSpec {
    pub fn rename(path: impl Into<FieldPath>) -> Self {
        FieldSpec::Rename { path: path.into() }
    }

    pub fn convert(convert: Conversion) -> Self {
        FieldSpec::Convert {
            path: None,
            convert,
        }
    }

    pub fn convert_to(path: impl Into<FieldPath>, convert: Conversion) -> Self {
        FieldSpec::Convert {
            path: Some(path.into()),
            convert,
        }
    }

    /// Output location written for source field `key`, if any.
    pub fn target(&self, key: &str) -> Option<FieldPath> {
        match self {
            FieldSpec::Drop => None,
            FieldSpec::Copy | FieldSpec::Array(_) => Some(FieldPath::Name(key.to_string())),
            FieldSpec::Rename { path } => Some(path.clone()),
            FieldSpec::Convert { path, .. } => Some(
                path.clone()
                    .unwrap_or_else(|| FieldPath::Name(key.to_string())),
            ),
        }
    }
}

/// Per-element mapping for an array-valued source field.
///
/// Each element is overlaid on `default_object` (element keys win) and the
/// merged object is interpreted against `fields`. Fields not in the table are
/// dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArraySpec {
    pub default_object: Record,
    pub fields: FieldTable,
}

impl ArraySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a default value merged under every element.
    pub fn default_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.default_object.insert(key.into(), value);
        self
    }

    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }
}

/// Handling for source fields that have no entry in the field table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnmappedPolicy {
    /// Unknown fields are left out of the output.
    #[default]
    Drop,
    /// Unknown fields are copied unchanged to the output root.
    PassThroughToRoot,
}

/// Event map validation errors, raised when a map is built.
#[derive(Debug, Clone, PartialEq)]
pub enum EventMapError {
    /// The same source field was given two specs.
    DuplicateField(String),
    /// Two source fields write the same output location.
    DuplicateTarget {
        target: String,
        first: String,
        second: String,
    },
    /// An array spec inside an array spec.
    NestedArray(String),
}

impl fmt::Display for EventMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventMapError::DuplicateField(name) => {
                write!(f, "field '{}' is mapped more than once", name)
            }
            EventMapError::DuplicateTarget {
                target,
                first,
                second,
            } => write!(
                f,
                "fields '{}' and '{}' both write output '{}'",
                first, second, target
            ),
            EventMapError::NestedArray(name) => {
                write!(f, "array field '{}' cannot contain another array field", name)
            }
        }
    }
}

impl std::error::Error for EventMapError {}

/// Immutable mapping description for one action.
///
/// Built once through [`EventMap::builder`] and shared freely between threads.
#[derive(Clone)]
pub struct EventMap {
    fields: FieldTable,
    unmapped: UnmappedPolicy,
    finalizer: Option<Arc<dyn Finalizer>>,
}

impl EventMap {
    pub fn builder() -> EventMapBuilder {
        EventMapBuilder::default()
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    pub fn unmapped_policy(&self) -> UnmappedPolicy {
        self.unmapped
    }

    pub fn finalizer(&self) -> Option<&dyn Finalizer> {
        self.finalizer.as_deref()
    }
}

impl fmt::Debug for EventMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventMap")
            .field("fields", &self.fields)
            .field("unmapped", &self.unmapped)
            .field("finalizer", &self.finalizer.is_some())
            .finish()
    }
}

/// Collects field specs and validates them into an [`EventMap`].
#[derive(Default)]
pub struct EventMapBuilder {
    fields: Vec<(String, FieldSpec)>,
    unmapped: UnmappedPolicy,
    finalizer: Option<Arc<dyn Finalizer>>,
}

impl EventMapBuilder {
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    pub fn unmapped(mut self, policy: UnmappedPolicy) -> Self {
        self.unmapped = policy;
        self
    }

    /// Shorthand for `unmapped(UnmappedPolicy::PassThroughToRoot)`.
    pub fn pass_through(self) -> Self {
        self.unmapped(UnmappedPolicy::PassThroughToRoot)
    }

    pub fn finalize(mut self, finalizer: impl Finalizer + 'static) -> Self {
        self.finalizer = Some(Arc::new(finalizer));
        self
    }

    /// Validates the collected specs.
    ///
    /// Rejects duplicate source fields, arrays nested in arrays, and any two
    /// specs that would write the same output location (including a plain
    /// field that shadows the outer object of a nested one).
    pub fn build(self) -> Result<EventMap, EventMapError> {
        let mut fields = FieldTable::with_capacity(self.fields.len());
        let mut targets = Targets::default();

        for (name, spec) in self.fields {
            if fields.contains_key(&name) {
                return Err(EventMapError::DuplicateField(name));
            }
            if let FieldSpec::Array(array) = &spec {
                validate_array(&name, array)?;
            }
            if let Some(target) = spec.target(&name) {
                targets.claim(target, &name)?;
            }
            fields.insert(name, spec);
        }

        Ok(EventMap {
            fields,
            unmapped: self.unmapped,
            finalizer: self.finalizer,
        })
    }
}

fn validate_array(name: &str, array: &ArraySpec) -> Result<(), EventMapError> {
    let mut targets = Targets::default();
    // Iterate in a stable order so the reported pair is deterministic.
    let mut names: Vec<&String> = array.fields.keys().collect();
    names.sort();

    for field in names {
        let spec = &array.fields[field];
        if matches!(spec, FieldSpec::Array(_)) {
            return Err(EventMapError::NestedArray(format!("{}.{}", name, field)));
        }
        if let Some(target) = spec.target(field) {
            targets.claim(target, field)?;
        }
    }
    Ok(())
}

/// Output locations claimed so far, with the source field that claimed each.
#[derive(Default)]
struct Targets {
    names: HashMap<String, String>,
    outers: HashMap<String, String>,
    nested: HashMap<(String, String), String>,
}

impl Targets {
    fn claim(&mut self, target: FieldPath, source: &str) -> Result<(), EventMapError> {
        let conflict = match &target {
            FieldPath::Name(name) => self.names.get(name).or_else(|| self.outers.get(name)),
            FieldPath::Nested(outer, inner) => self
                .names
                .get(outer)
                .or_else(|| self.nested.get(&(outer.clone(), inner.clone()))),
        };

        if let Some(first) = conflict {
            return Err(EventMapError::DuplicateTarget {
                target: target.to_string(),
                first: first.clone(),
                second: source.to_string(),
            });
        }

        match target {
            FieldPath::Name(name) => {
                self.names.insert(name, source.to_string());
            }
            FieldPath::Nested(outer, inner) => {
                self.outers
                    .entry(outer.clone())
                    .or_insert_with(|| source.to_string());
                self.nested.insert((outer, inner), source.to_string());
            }
        }
        Ok(())
    }
}
