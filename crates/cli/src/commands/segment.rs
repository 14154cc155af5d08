//! Segment management commands

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;
use vantage_domain::{Envelope, SegmentDraft, SegmentPatch};

use super::{into_json, Command, CommandContext};
use crate::cli::SegmentAction;

/// Handles `vantage segment list|create|update|delete`.
pub struct SegmentCommand {
    pub action: SegmentAction,
}

#[async_trait]
impl Command for SegmentCommand {
    async fn execute(&self, ctx: &CommandContext) -> Envelope<Value> {
        match &self.action {
            SegmentAction::List => into_json(ctx.client.list_segments().await),
            SegmentAction::Create { name, description } => {
                let mut draft = SegmentDraft::new(name.clone());
                if let Some(description) = description {
                    draft = draft.description(description.clone());
                }

                let envelope = ctx.client.create_segment(&draft).await;
                if let Some(segment) = &envelope.data {
                    info!(id = %segment.id, "created segment");
                }
                into_json(envelope)
            }
            SegmentAction::Update { segment_id, name, description } => {
                let mut patch = SegmentPatch::default();
                if let Some(name) = name {
                    patch = patch.name(name.clone());
                }
                if let Some(description) = description {
                    patch = patch.description(description.clone());
                }

                // An all-empty patch is rejected by the client before
                // any network call.
                into_json(ctx.client.update_segment(segment_id, &patch).await)
            }
            SegmentAction::Delete { segment_id } => {
                let envelope = ctx.client.delete_segment(segment_id).await;
                if envelope.is_success() {
                    info!(id = %segment_id, "deleted segment");
                }
                into_json(envelope)
            }
        }
    }
}
