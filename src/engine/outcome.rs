//! Reconciliation results.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value, json};

/// What the reconciler did, or would do under dry-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// A new object was created.
    Created,
    /// Some fields of an existing object were changed.
    Updated,
    /// An existing object was removed.
    Deleted,
    /// The object exists and already matches.
    Unchanged,
    /// The object does not exist, as requested.
    AlreadyAbsent,
}

impl Action {
    /// Returns true if this action writes to the remote system.
    #[must_use]
    pub const fn is_change(self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Deleted)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Unchanged => "already exists",
            Self::AlreadyAbsent => "already absent",
        })
    }
}

/// Before/after view of a change, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StateDiff {
    /// Relevant state before the change
    pub before: Map<String, Value>,
    /// Relevant state after the change
    pub after: Map<String, Value>,
}

impl StateDiff {
    /// Diff for a create or delete: the object's existence flips.
    #[must_use]
    pub fn existence(before: &str, after: &str) -> Self {
        let mut diff = Self::default();
        diff.before.insert("state".to_string(), Value::from(before));
        diff.after.insert("state".to_string(), Value::from(after));
        diff
    }
}

/// Report of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Kind that was reconciled
    pub kind: String,
    /// Performed (or planned, under dry-run) action
    pub action: Action,
    /// Whether the action was only planned
    pub dry_run: bool,
    /// Resulting object: created/updated/existing; `None` after delete or when absent
    pub object: Option<Value>,
    /// Before/after view for changing actions
    pub diff: Option<StateDiff>,
    /// Human-readable summary
    pub message: String,
}

impl Outcome {
    /// True iff an action other than a no-op was, or would be, performed.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.action.is_change()
    }

    /// Renders the machine-readable report.
    ///
    /// The object appears under the kind's name, e.g. `module_bay`.
    #[must_use]
    pub fn to_report(&self) -> Value {
        let mut report = json!({
            "changed": self.changed(),
            "action": self.action,
            "msg": self.message,
        });

        if let Some(map) = report.as_object_mut() {
            if self.dry_run {
                map.insert("check_mode".to_string(), Value::Bool(true));
            }
            if let Some(object) = &self.object {
                map.insert(self.kind.clone(), object.clone());
            }
            if let Some(diff) = &self.diff {
                map.insert("diff".to_string(), json!(diff));
            }
        }

        report
    }
}
