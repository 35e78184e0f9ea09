//! Reconciliation engine.
//!
//! This module provides:
//! - Reference resolution ([`Resolver`])
//! - Normalization into comparable forms ([`Canonical`], [`normalize`])
//! - Field-level diffing ([`Diff`], [`diff`])
//! - The per-invocation state machine ([`Reconciler`], [`ReconcileRequest`])
//! - Results and errors ([`Outcome`], [`ReconcileError`])

mod diff;
mod error;
pub mod normalize;
mod outcome;
mod reconcile;
mod resolve;

#[cfg(test)]
mod resolve_tests;

pub use diff::{Diff, FieldChange, diff};
pub use error::ReconcileError;
pub use normalize::{Canonical, CanonicalState};
pub use outcome::{Action, Outcome, StateDiff};
pub use reconcile::{ReconcileRequest, Reconciler};
pub use resolve::Resolver;
