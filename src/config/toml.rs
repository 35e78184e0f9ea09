//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Connection settings
    #[serde(default)]
    pub netbox: NetboxSection,

    /// What to reconcile
    #[serde(default)]
    pub task: TaskSection,
}

/// Connection configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetboxSection {
    /// NetBox base URL
    pub url: Option<String>,

    /// API token
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,

    /// Validate TLS certificates (default: true)
    pub validate_certs: Option<bool>,
}

/// Task configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSection {
    /// Resource kind
    pub kind: Option<String>,

    /// "present" or "absent"
    pub state: Option<String>,

    /// Desired field values
    pub data: Option<toml::Table>,

    /// Lookup fields overriding the natural key
    #[serde(default)]
    pub query_params: Vec<String>,

    /// Check mode
    #[serde(default)]
    pub check: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# netbox-reconcile configuration file

[netbox]
# NetBox base URL (required, or NETBOX_URL / --url)
# url = "https://netbox.example.com"

# API token (required, or NETBOX_TOKEN / --token)
# token = "0123456789abcdef0123456789abcdef01234567"

# Request timeout in seconds (default: 30)
# timeout = 30

# Validate TLS certificates (default: true)
# validate_certs = true

[task]
# Resource kind: module_bay, module_type, manufacturer, tag
# kind = "module_bay"

# Whether the object should exist: "present" (default) or "absent"
# state = "present"

# Look the object up by these fields instead of its natural key
# Note: CLI --query-param values REPLACE these entirely (not merged)
# query_params = ["device", "name"]

# Report what would change without writing
# check = false

# Desired field values. References accept a name, an id, or a filter table.
# [task.data]
# device = "Test Nexus One"
# name = "Module Bay One"
# position = "1"
# tags = ["Schnozzberry"]
"#
    .to_string()
}
