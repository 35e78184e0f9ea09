//! netbox-reconcile: declarative NetBox resource management
//!
//! Entry point for the netbox-reconcile application.

use netbox_reconcile::config::{Cli, Command, ValidatedConfig, write_default_config};
use netbox_reconcile::schema::KindRegistry;
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match &cli.command {
        Some(Command::Init { output }) => return handle_init(output),
        Some(Command::Kinds) => {
            print!("{}", run::render_kinds(&KindRegistry::builtin()));
            return exit_code::SUCCESS;
        }
        None => {}
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", run::render_failure(&e));
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    // Setup logging and run
    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    run_application(&config)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Runs one reconciliation and prints its report.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(config: &ValidatedConfig) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            println!("{}", run::render_failure(&e));
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(config)) {
        Ok(outcome) => {
            println!("{}", outcome.to_report());
            exit_code::SUCCESS
        }
        Err(e) => {
            println!("{}", run::render_failure(&e));
            tracing::error!("Reconciliation failed: {e}");
            exit_code::runtime_error()
        }
    }
}
