//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::desired::RequestedState;

/// NetBox Reconcile: declarative NetBox resource management
///
/// Creates, updates or deletes one NetBox object so that it matches the
/// given data. Running the same command twice changes nothing the
/// second time.
#[derive(Debug, Parser)]
#[command(name = "netbox-reconcile")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// NetBox base URL, e.g. `https://netbox.example.com`
    #[arg(long, env = "NETBOX_URL", global = true)]
    pub url: Option<String>,

    /// NetBox API token
    #[arg(long, env = "NETBOX_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Resource kind to reconcile (see the `kinds` subcommand)
    #[arg(long)]
    pub kind: Option<String>,

    /// Whether the resource should exist
    #[arg(long, value_enum)]
    pub state: Option<StateArg>,

    /// Desired state as a JSON object
    #[arg(long, conflicts_with = "data_file")]
    pub data: Option<String>,

    /// Path to a JSON file holding the desired state
    #[arg(long = "data-file", value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Field to look the object up by, instead of its natural key (can be specified multiple times)
    #[arg(long = "query-param", value_name = "FIELD")]
    pub query_params: Vec<String>,

    /// Check mode - report what would change without writing
    #[arg(long)]
    pub check: bool,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Skip TLS certificate validation
    #[arg(long = "no-validate-certs")]
    pub no_validate_certs: bool,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for netbox-reconcile
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "netbox-reconcile.toml")]
        output: PathBuf,
    },
    /// List the supported resource kinds and their fields
    Kinds,
}

/// Requested state argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    /// Create or update the resource
    Present,
    /// Delete the resource if it exists
    Absent,
}

impl From<StateArg> for RequestedState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Present => Self::Present,
            StateArg::Absent => Self::Absent,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
