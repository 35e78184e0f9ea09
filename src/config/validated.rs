//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use http::HeaderValue;
use url::Url;

use crate::desired::{DesiredState, RequestedState};
use crate::engine::ReconcileRequest;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// REST API root, always ending in `/api/`
    pub api_root: Url,

    /// API token (never displayed)
    pub token: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Whether TLS certificates are validated
    pub validate_certs: bool,

    /// Resource kind to reconcile
    pub kind: String,

    /// Requested state
    pub state: RequestedState,

    /// Desired field values
    pub data: DesiredState,

    /// Lookup fields overriding the natural key (empty = natural key)
    pub query_params: Vec<String>,

    /// Check mode (plan without writing)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ api: {}, kind: {}, state: {}, fields: {}, query_params: [{}], \
             timeout: {}s, validate_certs: {}, check: {} }}",
            self.api_root,
            self.kind,
            self.state,
            self.data.len(),
            self.query_params.join(", "),
            self.timeout.as_secs(),
            self.validate_certs,
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (and their environment variables) take precedence over
    /// TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (`url`, `token`, `kind`, `data`)
    /// - URL or token is invalid
    /// - Data is not a JSON object
    /// - State or timeout is invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let api_root = Self::resolve_api_root(cli, toml)?;
        let token = Self::resolve_token(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;

        // A CLI flag can only disable validation
        let validate_certs = !cli.no_validate_certs
            && toml
                .and_then(|t| t.netbox.validate_certs)
                .unwrap_or(defaults::VALIDATE_CERTS);

        let kind = cli
            .kind
            .clone()
            .or_else(|| toml.and_then(|t| t.task.kind.clone()))
            .ok_or_else(|| {
                ConfigError::missing(field::KIND, "Use --kind or set task.kind in config file")
            })?;

        let state = Self::resolve_state(cli, toml)?;
        let data = Self::resolve_data(cli, toml)?;

        // CLI query params replace TOML ones entirely
        let query_params = if cli.query_params.is_empty() {
            toml.map(|t| t.task.query_params.clone()).unwrap_or_default()
        } else {
            cli.query_params.clone()
        };

        let dry_run = cli.check || toml.is_some_and(|t| t.task.check);

        Ok(Self {
            api_root,
            token,
            timeout,
            validate_certs,
            kind,
            state,
            data,
            query_params,
            dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(&expand_tilde(path))?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Builds the engine request described by this configuration.
    #[must_use]
    pub fn request(&self) -> ReconcileRequest {
        ReconcileRequest::new(self.kind.clone(), self.data.clone())
            .with_state(self.state)
            .with_dry_run(self.dry_run)
            .with_query_params(self.query_params.clone())
    }

    fn resolve_api_root(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.netbox.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::URL,
                    "Use --url, NETBOX_URL or set netbox.url in config file",
                )
            })?;

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(api_root(&url))
    }

    fn resolve_token(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let token = cli
            .token
            .as_deref()
            .or_else(|| toml.and_then(|t| t.netbox.token.as_deref()))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ConfigError::missing(
                    field::TOKEN,
                    "Use --token, NETBOX_TOKEN or set netbox.token in config file",
                )
            })?;

        HeaderValue::from_str(&format!("Token {token}")).map_err(|e| {
            ConfigError::InvalidToken {
                reason: e.to_string(),
            }
        })?;

        Ok(token.to_string())
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.netbox.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_state(cli: &Cli, toml: Option<&TomlConfig>) -> Result<RequestedState, ConfigError> {
        if let Some(state) = cli.state {
            return Ok(state.into());
        }

        let value = toml
            .and_then(|t| t.task.state.as_deref())
            .unwrap_or(defaults::STATE);

        value.parse().map_err(|_| ConfigError::InvalidState {
            value: value.to_string(),
        })
    }

    fn resolve_data(cli: &Cli, toml: Option<&TomlConfig>) -> Result<DesiredState, ConfigError> {
        if let Some(ref raw) = cli.data {
            return parse_data("--data", raw);
        }

        if let Some(ref path) = cli.data_file {
            let path = expand_tilde(path);
            let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileRead {
                path: path.clone(),
                source: e,
            })?;
            return parse_data(&path.display().to_string(), &raw);
        }

        if let Some(table) = toml.and_then(|t| t.task.data.as_ref()) {
            let value = serde_json::to_value(table).map_err(|e| ConfigError::InvalidData {
                origin: "task.data".to_string(),
                reason: e.to_string(),
            })?;
            return DesiredState::from_json(value).map_err(|e| ConfigError::InvalidData {
                origin: "task.data".to_string(),
                reason: e.to_string(),
            });
        }

        Err(ConfigError::missing(
            field::DATA,
            "Use --data, --data-file or set [task.data] in config file",
        ))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_data(origin: &str, raw: &str) -> Result<DesiredState, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidData {
        origin: origin.to_string(),
        reason,
    };

    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
    DesiredState::from_json(value).map_err(|e| invalid(e.to_string()))
}

/// Derives the REST API root from the NetBox base URL.
///
/// `https://host` and `https://host/api` both become `https://host/api/`;
/// a sub-path install (`https://host/netbox`) keeps its prefix.
fn api_root(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_query(None);
    root.set_fragment(None);

    let path = root.path().trim_end_matches('/').to_string();
    let api_path = if path.ends_with("/api") {
        format!("{path}/")
    } else {
        format!("{path}/{}", defaults::API_PATH)
    };
    root.set_path(&api_path);
    root
}

/// Replaces a leading `~` with the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => dirs::home_dir()
            .map_or_else(|| path.to_path_buf(), |home| home.join(components.as_path())),
        _ => path.to_path_buf(),
    }
}
