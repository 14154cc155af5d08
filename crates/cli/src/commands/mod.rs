//! CLI command handlers
//!
//! Every subcommand is a value implementing [`Command`]: anything that
//! can produce a result envelope from a context is dispatchable. There
//! is no shared mutable state between commands.

pub mod export;
pub mod query;
pub mod segment;

use async_trait::async_trait;
use serde_json::Value;
use vantage_client::ApiClient;
use vantage_domain::Envelope;

use crate::cli::Commands;

/// Shared dependencies handed to each command.
pub struct CommandContext {
    pub client: ApiClient,
}

/// A dispatchable CLI command.
///
/// Commands branch only on the envelope; HTTP statuses and error types
/// never reach this layer.
#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, ctx: &CommandContext) -> Envelope<Value>;
}

/// Map the parsed CLI tree onto a command value.
pub fn from_cli(command: Commands) -> Box<dyn Command> {
    match command {
        Commands::Segment(action) => Box::new(segment::SegmentCommand { action }),
        Commands::Query(action) => Box::new(query::QueryCommand { action }),
        Commands::Export(args) => Box::new(export::ExportCommand { args }),
    }
}

/// Re-wrap a typed envelope as a JSON envelope for uniform rendering.
pub(crate) fn into_json<T: serde::Serialize>(envelope: Envelope<T>) -> Envelope<Value> {
    match envelope.data {
        Some(data) if envelope.errors.is_empty() => match serde_json::to_value(&data) {
            Ok(value) => Envelope::success(value),
            Err(err) => Envelope::failure(format!("unencodable result: {}", err)),
        },
        _ => Envelope::failures(envelope.errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_json_preserves_both_variants() {
        let ok: Envelope<Value> = into_json(Envelope::success(vec![1, 2]));
        assert!(ok.is_success());
        assert_eq!(ok.data, Some(serde_json::json!([1, 2])));

        let failed: Envelope<Value> =
            into_json(Envelope::<Vec<u32>>::failure("AuthError: denied"));
        assert!(failed.is_failure());
        assert_eq!(failed.errors, vec!["AuthError: denied".to_string()]);
        assert!(failed.data.is_none());
    }
}
