//! Error taxonomy for reconciliation.

use thiserror::Error;

use crate::api::{ApiError, HttpError};
use crate::desired::RequestedState;

/// Error type for a failed reconciliation.
///
/// Every variant is terminal for the invocation and names the resource
/// kind plus the key or filter involved. No variant is produced after a
/// partial write: failures either precede the single write or are that
/// write's own failure.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The requested kind is not registered.
    #[error("Unknown resource kind '{kind}'")]
    UnknownKind {
        /// Requested kind name
        kind: String,
    },

    /// The kind exists but is only used as a reference target.
    #[error("Resource kind '{kind}' cannot be reconciled, it is reference-only")]
    NotManageable {
        /// Kind name
        kind: String,
    },

    /// A field required for the requested state is missing.
    #[error("{kind}: missing required field '{field}' for state={state}")]
    MissingField {
        /// Kind name
        kind: String,
        /// Missing field
        field: String,
        /// Requested state
        state: RequestedState,
    },

    /// The desired state names a field the kind does not have.
    #[error("{kind}: unsupported field '{field}'")]
    UnknownField {
        /// Kind name
        kind: String,
        /// Unknown field
        field: String,
    },

    /// A field value has the wrong shape.
    #[error("{kind}: invalid value for '{field}': {reason}")]
    InvalidInput {
        /// Kind name
        kind: String,
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A reference matched no object.
    #[error("Could not resolve {kind} reference ({filter}): no match")]
    ReferenceNotFound {
        /// Referenced kind
        kind: String,
        /// Filter that was applied
        filter: String,
    },

    /// A reference matched several objects.
    #[error("Could not resolve {kind} reference ({filter}): {count} matches, expected one")]
    AmbiguousReference {
        /// Referenced kind
        kind: String,
        /// Filter that was applied
        filter: String,
        /// Number of matches
        count: usize,
    },

    /// The natural key matched several objects.
    #[error("{kind} lookup ({key}) returned {count} objects, expected at most one")]
    LookupAmbiguous {
        /// Kind name
        kind: String,
        /// Natural key
        key: String,
        /// Number of matches
        count: usize,
    },

    /// The API refused a request, typically a validation error on write.
    #[error("{kind} ({key}): NetBox rejected the request with status {status}: {detail}")]
    RemoteRejected {
        /// Kind name
        kind: String,
        /// Natural key or filter
        key: String,
        /// HTTP status
        status: http::StatusCode,
        /// Response body
        detail: String,
    },

    /// The API could not be reached.
    #[error("{kind} ({key}): {source}")]
    Transport {
        /// Kind name
        kind: String,
        /// Natural key or filter
        key: String,
        /// Underlying transport error
        #[source]
        source: HttpError,
    },

    /// The API rejected the credentials.
    #[error("{kind} ({key}): authentication failed with status {status}")]
    Auth {
        /// Kind name
        kind: String,
        /// Natural key or filter
        key: String,
        /// HTTP status
        status: http::StatusCode,
    },

    /// The API answered with something unreadable.
    #[error("{kind} ({key}): invalid response: {reason}")]
    InvalidResponse {
        /// Kind name
        kind: String,
        /// Natural key or filter
        key: String,
        /// Decode failure
        reason: String,
    },
}

impl ReconcileError {
    /// Attaches kind and key context to a resource-client error.
    #[must_use]
    pub fn api(kind: &str, key: impl ToString, error: ApiError) -> Self {
        let kind = kind.to_string();
        let key = key.to_string();
        match error {
            ApiError::Transport(source) => Self::Transport { kind, key, source },
            ApiError::Auth { status } => Self::Auth { kind, key, status },
            ApiError::Rejected { status, detail } => Self::RemoteRejected {
                kind,
                key,
                status,
                detail,
            },
            ApiError::Decode(reason) => Self::InvalidResponse { kind, key, reason },
        }
    }

    /// Returns true for errors raised by input validation.
    ///
    /// Resolution may already have read from NetBox; nothing was written.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownKind { .. }
                | Self::NotManageable { .. }
                | Self::MissingField { .. }
                | Self::UnknownField { .. }
                | Self::InvalidInput { .. }
        )
    }
}
