//! Caller-supplied desired state.
//!
//! A [`DesiredState`] keeps the exact set of fields the caller wrote:
//! an omitted field, a `null` and an empty string stay distinguishable,
//! which is what lets updates leave unspecified fields untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[cfg(test)]
#[path = "desired_tests.rs"]
mod tests;

/// Whether the resource should exist after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedState {
    /// Create or update the resource.
    #[default]
    Present,
    /// Delete the resource if it exists.
    Absent,
}

impl fmt::Display for RequestedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("present"),
            Self::Absent => f.write_str("absent"),
        }
    }
}

/// Error for a state string other than `present`/`absent`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state '{0}': expected present or absent")]
pub struct InvalidState(pub String);

impl FromStr for RequestedState {
    type Err = InvalidState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            _ => Err(InvalidState(s.to_string())),
        }
    }
}

/// Error for desired-state input that is not a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Desired state must be a JSON object, got {0}")]
pub struct NotAnObject(pub &'static str);

/// Target field values for one resource instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    fields: Map<String, Value>,
}

impl DesiredState {
    /// Creates an empty desired state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing JSON object.
    #[must_use]
    pub const fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Converts a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`NotAnObject`] for any other JSON type.
    pub fn from_json(value: Value) -> Result<Self, NotAnObject> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(NotAnObject(json_type_name(&other))),
        }
    }

    /// Adds or replaces a field.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns the value of a field, if the caller specified it.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns true if the caller specified the field (even as `null`).
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates over specified fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Number of specified fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are specified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl FromIterator<(String, Value)> for DesiredState {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// An unresolved pointer to another resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Explicit identifier, used as-is.
    Id(u64),
    /// Value of the target kind's lookup field.
    Name(String),
    /// Arbitrary attribute filter.
    Filter(Map<String, Value>),
}

impl Reference {
    /// Interprets a caller value as a reference.
    ///
    /// Returns `None` for values that cannot point at anything
    /// (booleans, floats, negative numbers, arrays, `null`).
    #[must_use]
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self::Id),
            Value::String(s) => Some(Self::Name(s.clone())),
            Value::Object(map) => Some(Self::Filter(map.clone())),
            Value::Null | Value::Bool(_) | Value::Array(_) => None,
        }
    }

    /// Query-string pairs used to find the target on its list endpoint.
    ///
    /// An [`Reference::Id`] needs no query and yields an empty list.
    #[must_use]
    pub fn query(&self, lookup_field: &str) -> Vec<(String, String)> {
        match self {
            Self::Id(_) => Vec::new(),
            Self::Name(name) => vec![(lookup_field.to_string(), name.clone())],
            Self::Filter(map) => {
                let mut pairs = Vec::new();
                for (key, value) in map {
                    push_query_pairs(&mut pairs, key, value);
                }
                pairs
            }
        }
    }
}

/// Renders a JSON value as query-string pairs.
///
/// Arrays become repeated parameters, which NetBox treats as OR.
pub fn push_query_pairs(pairs: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                push_query_pairs(pairs, key, item);
            }
        }
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Null => pairs.push((key.to_string(), "null".to_string())),
        other => pairs.push((key.to_string(), other.to_string())),
    }
}

/// Formats query pairs the way they appear in error messages.
#[must_use]
pub fn describe_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
