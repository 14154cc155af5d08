//! Vantage CLI - analytics platform automation command line
//!
//! Main entry point for the `vantage` binary.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use vantage_cli::cli::Cli;
use vantage_cli::commands::{self, CommandContext};
use vantage_cli::config;
use vantage_client::ApiClient;
use vantage_domain::Envelope;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging first so .env loading is visible
    init_tracing(cli.verbose);

    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(_) => debug!("no .env file found"),
    }

    let settings = match config::load(cli.subscription.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match ApiClient::new(settings.client, Arc::new(settings.credentials)) {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "failed to build API client");
            return ExitCode::FAILURE;
        }
    };

    let command = commands::from_cli(cli.command);
    let envelope = command.execute(&CommandContext { client }).await;
    render(envelope)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Print the envelope: data to stdout on success, error entries to
/// stderr on failure. Exit code mirrors the branch.
#[allow(clippy::print_stdout, clippy::print_stderr)]
fn render(envelope: Envelope<Value>) -> ExitCode {
    if envelope.is_success() {
        if let Some(data) = &envelope.data {
            match serde_json::to_string_pretty(data) {
                Ok(text) => println!("{}", text),
                Err(err) => {
                    error!(error = %err, "failed to render output");
                    return ExitCode::FAILURE;
                }
            }
        }
        ExitCode::SUCCESS
    } else {
        for message in &envelope.errors {
            eprintln!("{}", message);
        }
        ExitCode::FAILURE
    }
}
