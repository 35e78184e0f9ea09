//! Configuration layer for netbox-reconcile.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** (and `NETBOX_URL` / `NETBOX_TOKEN`)
//! 2. **TOML config file**
//! 3. **Built-in defaults**
//!
//! Desired data comes from exactly one source: `--data`, else `--data-file`,
//! else `[task.data]`. Sources are never merged field by field.
//!
//! `--query-param` values **replace** `task.query_params` entirely.
//!
//! # Boolean Flag Semantics
//!
//! `--check` uses OR semantics with `task.check`: flags only enable.
//! `--no-validate-certs` can only disable certificate validation.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command, StateArg};
pub use error::ConfigError;
pub use toml::{NetboxSection, TaskSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
