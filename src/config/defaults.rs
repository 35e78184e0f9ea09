//! Default values for configuration options.
//!
//! Built-in fallbacks used when neither the CLI nor the config file sets a value.

/// Default request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Default requested state.
pub const STATE: &str = "present";

/// TLS certificates are validated unless explicitly disabled.
pub const VALIDATE_CERTS: bool = true;

/// Path segment appended to the NetBox URL to reach the REST API.
pub const API_PATH: &str = "api/";
