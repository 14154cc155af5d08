//! Export command
//!
//! Writes query results to a file as JSON or CSV. Exporters consume
//! only the result envelope; a failed fetch writes nothing.

use std::fs;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;
use vantage_domain::{Envelope, Segment};

use super::{Command, CommandContext};
use crate::cli::{ExportArgs, ExportFormat, ExportTarget};

/// Handles `vantage export segments --format json|csv --output PATH`.
pub struct ExportCommand {
    pub args: ExportArgs,
}

#[async_trait]
impl Command for ExportCommand {
    async fn execute(&self, ctx: &CommandContext) -> Envelope<Value> {
        match self.args.target {
            ExportTarget::Segments => self.export_segments(ctx).await,
        }
    }
}

impl ExportCommand {
    async fn export_segments(&self, ctx: &CommandContext) -> Envelope<Value> {
        let envelope = ctx.client.list_segments().await;
        let segments = match envelope.data {
            Some(segments) if envelope.errors.is_empty() => segments,
            _ => return Envelope::failures(envelope.errors),
        };

        let rendered = match self.args.format {
            ExportFormat::Json => match serde_json::to_string_pretty(&segments) {
                Ok(text) => text,
                Err(err) => {
                    return Envelope::failure(format!("failed to encode segments: {}", err))
                }
            },
            ExportFormat::Csv => segments_to_csv(&segments),
        };

        if let Err(err) = fs::write(&self.args.output, rendered) {
            return Envelope::failure(format!(
                "failed to write {}: {}",
                self.args.output.display(),
                err
            ));
        }

        info!(
            count = segments.len(),
            path = %self.args.output.display(),
            "exported segments"
        );
        Envelope::success(json!({
            "exported": segments.len(),
            "path": self.args.output.display().to_string(),
        }))
    }
}

/// Render segments as CSV with RFC 4180 quoting. No csv crate is in use
/// anywhere in this workspace; the format here is three fixed columns.
fn segments_to_csv(segments: &[Segment]) -> String {
    let mut out = String::from("id,name,description\n");
    for segment in segments {
        out.push_str(&csv_field(&segment.id));
        out.push(',');
        out.push_str(&csv_field(&segment.name));
        out.push(',');
        out.push_str(&csv_field(segment.description.as_deref().unwrap_or_default()));
        out.push('\n');
    }
    out
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
