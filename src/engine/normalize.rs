//! Canonical forms for desired and remote field values.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::api::RemoteObject;
use crate::desired::DesiredState;
use crate::schema::{FieldKind, FieldSpec, ResourceKind};

/// A field value in directly comparable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Canonical {
    /// Explicitly empty.
    Null,
    /// A plain value, compared exactly.
    Scalar(Value),
    /// A resolved reference.
    Id(u64),
    /// A set of resolved references; order and duplicates are irrelevant.
    IdSet(BTreeSet<u64>),
    /// An ordered list of plain values.
    List(Vec<Value>),
}

impl Canonical {
    /// JSON form sent to the API.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Scalar(v) => v.clone(),
            Self::Id(id) => Value::from(*id),
            Self::IdSet(ids) => Value::Array(ids.iter().map(|id| Value::from(*id)).collect()),
            Self::List(items) => Value::Array(items.clone()),
        }
    }

    /// Text used as a query value; `None` for list values.
    #[must_use]
    pub fn query_text(&self) -> Option<String> {
        match self {
            Self::Null => Some("null".to_string()),
            Self::Scalar(Value::String(s)) => Some(s.clone()),
            Self::Scalar(v) => Some(v.to_string()),
            Self::Id(id) => Some(id.to_string()),
            Self::IdSet(_) | Self::List(_) => None,
        }
    }
}

/// Field name → canonical value.
pub type CanonicalState = BTreeMap<String, Canonical>;

/// Converts a canonical state into an API payload.
#[must_use]
pub fn to_payload(state: &CanonicalState) -> Map<String, Value> {
    state
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect()
}

/// Returns the caller's data with schema defaults filled in.
///
/// The input is left untouched; defaults never override a value the
/// caller supplied, including an explicit `null`.
#[must_use]
pub fn with_defaults(kind: &ResourceKind, data: &DesiredState) -> DesiredState {
    let mut effective = data.clone();
    for spec in kind.fields {
        if data.contains(spec.name) {
            continue;
        }
        if let Some(value) = spec.default.and_then(|d| d.compute(data)) {
            effective = effective.with(spec.name, value);
        }
    }
    effective
}

/// Canonical form of a caller-supplied non-reference value.
///
/// A single value for a list field becomes a one-element list. Reference
/// fields are resolved by the resolver instead.
#[must_use]
pub fn normalize_plain(spec: &FieldSpec, value: &Value) -> Canonical {
    match (spec.kind, value) {
        (FieldKind::ScalarList, Value::Null) => Canonical::List(Vec::new()),
        (FieldKind::ScalarList, Value::Array(items)) => Canonical::List(items.clone()),
        (FieldKind::ScalarList, single) => Canonical::List(vec![single.clone()]),
        (_, Value::Null) => Canonical::Null,
        (_, other) => Canonical::Scalar(other.clone()),
    }
}

/// Canonical form of one attribute of a remote object.
///
/// NetBox nests referenced objects (`{"id": 7, "name": ...}`); only the
/// id takes part in the comparison.
#[must_use]
pub fn normalize_remote_value(spec: &FieldSpec, value: Option<&Value>) -> Canonical {
    let value = value.unwrap_or(&Value::Null);
    match spec.kind {
        FieldKind::Scalar => match value {
            Value::Null => Canonical::Null,
            other => Canonical::Scalar(other.clone()),
        },
        FieldKind::ScalarList => match value {
            Value::Array(items) => Canonical::List(items.clone()),
            _ => Canonical::List(Vec::new()),
        },
        FieldKind::Reference(_) => match value {
            Value::Null => Canonical::Null,
            other => reference_id(other)
                .map_or_else(|| Canonical::Scalar(other.clone()), Canonical::Id),
        },
        FieldKind::ReferenceList(_) => match value {
            Value::Array(items) => Canonical::IdSet(items.iter().filter_map(reference_id).collect()),
            _ => Canonical::IdSet(BTreeSet::new()),
        },
    }
}

/// Canonical form of the remote object, restricted to `fields`.
///
/// Only fields the caller specified are compared, so everything else the
/// remote holds is invisible to the diff.
pub fn normalize_remote<'a>(
    kind: &ResourceKind,
    object: &RemoteObject,
    fields: impl IntoIterator<Item = &'a String>,
) -> CanonicalState {
    fields
        .into_iter()
        .filter_map(|name| {
            kind.field(name)
                .map(|spec| (name.clone(), normalize_remote_value(spec, object.get(name))))
        })
        .collect()
}

fn reference_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::Object(map) => map.get("id").and_then(Value::as_u64),
        _ => None,
    }
}
