//! Field-level comparison of normalized states.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::normalize::{Canonical, CanonicalState};

/// Before/after values of one differing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    /// Current remote value
    pub before: Value,
    /// Desired value
    pub after: Value,
}

/// Fields whose desired value differs from the remote one.
///
/// An empty diff means the object already matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    changes: BTreeMap<String, FieldChange>,
}

impl Diff {
    /// Returns true if nothing differs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of differing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns the change for a field, if it differs.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.changes.get(field)
    }

    /// Names of differing fields, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    /// Partial-update payload: only the differing fields, at their desired values.
    #[must_use]
    pub fn payload(&self) -> Map<String, Value> {
        self.changes
            .iter()
            .map(|(k, c)| (k.clone(), c.after.clone()))
            .collect()
    }

    /// Current values of the differing fields.
    #[must_use]
    pub fn before(&self) -> Map<String, Value> {
        self.changes
            .iter()
            .map(|(k, c)| (k.clone(), c.before.clone()))
            .collect()
    }
}

/// Compares desired against current, key by key of `desired`.
///
/// A field missing from `current` compares as [`Canonical::Null`].
/// Fields only present in `current` are ignored.
#[must_use]
pub fn diff(desired: &CanonicalState, current: &CanonicalState) -> Diff {
    let changes = desired
        .iter()
        .filter_map(|(field, want)| {
            let have = current.get(field).unwrap_or(&Canonical::Null);
            (want != have).then(|| {
                (
                    field.clone(),
                    FieldChange {
                        before: have.to_json(),
                        after: want.to_json(),
                    },
                )
            })
        })
        .collect();

    Diff { changes }
}
