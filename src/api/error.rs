//! Error types for the transport and resource-client layers.

use thiserror::Error;

/// Error type for raw HTTP operations.
///
/// Describes what went wrong on the wire. No retry is attempted by
/// this crate; the caller decides what to do with it.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, refused connections
    /// and TLS handshake errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Error type for NetBox resource operations.
///
/// Maps HTTP outcomes onto the categories the reconciler reports:
/// transport failures, credential rejection, and remote validation
/// failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The API rejected the token (401) or its permissions (403).
    #[error("Authentication rejected with status {status}")]
    Auth {
        /// HTTP status returned by the API
        status: http::StatusCode,
    },

    /// The API refused the request, typically a validation error on write.
    #[error("Request rejected with status {status}: {detail}")]
    Rejected {
        /// HTTP status returned by the API
        status: http::StatusCode,
        /// Response body, as sent by the API
        detail: String,
    },

    /// The response body was not what NetBox sends.
    #[error("Malformed API response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classifies a non-success response.
    #[must_use]
    pub fn from_status(status: http::StatusCode, body: &[u8]) -> Self {
        if status == http::StatusCode::UNAUTHORIZED || status == http::StatusCode::FORBIDDEN {
            return Self::Auth { status };
        }

        Self::Rejected {
            status,
            detail: String::from_utf8_lossy(body).into_owned(),
        }
    }
}
