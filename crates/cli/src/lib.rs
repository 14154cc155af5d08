//! # Vantage CLI
//!
//! Application layer for the `vantage` binary: argument parsing,
//! configuration loading, command dispatch, and export writers.
//!
//! Commands talk to the platform exclusively through
//! [`vantage_client::ApiClient`] and branch only on the result
//! envelope; no HTTP status or error type reaches this layer.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::Cli;
pub use commands::{Command, CommandContext};
pub use config::Settings;
