//! Application execution logic.
//!
//! Wires the validated configuration to a NetBox client and a reconciler,
//! and renders what the binary prints.

use std::fmt::{self, Write as _};

use http::header::InvalidHeaderValue;
use serde_json::{Value, json};
use thiserror::Error;

use netbox_reconcile::api::{HttpClient, HttpError, NetboxClient, ReqwestClient};
use netbox_reconcile::config::ValidatedConfig;
use netbox_reconcile::engine::{Outcome, ReconcileError, Reconciler};
use netbox_reconcile::schema::{FieldKind, KindRegistry};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] HttpError),

    /// The token cannot be sent as a header.
    #[error("Invalid API token: {0}")]
    Token(#[source] InvalidHeaderValue),

    /// The reconciliation itself failed.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Executes one reconciliation described by the configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the
/// reconciliation fails.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires a
/// reachable NetBox instance; [`reconcile_with`] carries the logic.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: &ValidatedConfig) -> Result<Outcome, RunError> {
    let http = ReqwestClient::with_options(config.timeout, config.validate_certs)
        .map_err(RunError::Client)?;

    if !config.validate_certs {
        tracing::warn!("TLS certificate validation is disabled");
    }

    reconcile_with(http, config).await
}

/// Runs the reconciliation over the given HTTP client.
///
/// # Errors
///
/// Returns an error if the token is not a valid header value or the
/// reconciliation fails.
pub async fn reconcile_with<H: HttpClient>(
    http: H,
    config: &ValidatedConfig,
) -> Result<Outcome, RunError> {
    let client = NetboxClient::new(http, config.api_root.clone(), &config.token)
        .map_err(RunError::Token)?;
    let reconciler = Reconciler::new(client, KindRegistry::builtin());

    if config.dry_run {
        tracing::info!("Check mode enabled - changes will be reported but not written");
    }

    let outcome = reconciler.reconcile(&config.request()).await?;
    tracing::info!("{}", outcome.message);
    Ok(outcome)
}

/// Renders the failure report printed instead of an outcome.
#[must_use]
pub fn render_failure(error: &impl fmt::Display) -> Value {
    json!({
        "failed": true,
        "changed": false,
        "msg": error.to_string(),
    })
}

/// Renders the `kinds` listing: one block per kind with its key and fields.
///
/// Required fields are marked with `*`, references show their target kind.
#[must_use]
pub fn render_kinds(registry: &KindRegistry) -> String {
    let mut out = String::new();

    for kind in registry.iter() {
        let managed = if kind.managed { "" } else { " [reference only]" };
        let _ = writeln!(out, "{} ({}){managed}", kind.name, kind.endpoint);
        let _ = writeln!(out, "  key: {}", kind.key_fields.join(", "));

        for field in kind.fields {
            let marker = if field.required { "*" } else { "" };
            let shape = match field.kind {
                FieldKind::Scalar => String::new(),
                FieldKind::ScalarList => " [list]".to_string(),
                FieldKind::Reference(target) => format!(" -> {target}"),
                FieldKind::ReferenceList(target) => format!(" -> [{target}]"),
            };
            let _ = writeln!(out, "    {}{marker}{shape}", field.name);
        }
    }

    out
}
