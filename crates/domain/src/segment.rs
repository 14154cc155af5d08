//! Segment models
//!
//! A segment is a named, rule-defined subset of a product's users or
//! accounts. The rule definition is an opaque structured payload passed
//! through to the server unmodified.

use serde::{Deserialize, Serialize};

/// A segment as returned by the server.
///
/// A segment returned from create always carries a non-empty id; a
/// segment submitted for update or delete must carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Opaque rule definition, passed through unmodified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<serde_json::Value>,
}

/// Payload for creating a new segment. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<serde_json::Value>,
}

impl SegmentDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: None, rule: None }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn rule(mut self, rule: serde_json::Value) -> Self {
        self.rule = Some(rule);
        self
    }
}

/// Partial update for an existing segment. Only the populated fields are
/// sent; an all-empty patch is rejected before any network call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<serde_json::Value>,
}

impl SegmentPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn rule(mut self, rule: serde_json::Value) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.rule.is_none()
    }
}

/// Confirmation marker returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_builder_populates_fields() {
        let draft = SegmentDraft::new("Power Users").description("active weekly");
        assert_eq!(draft.name, "Power Users");
        assert_eq!(draft.description.as_deref(), Some("active weekly"));
        assert!(draft.rule.is_none());
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(SegmentPatch::default().is_empty());
        assert!(!SegmentPatch::default().name("Renamed").is_empty());
    }

    #[test]
    fn patch_serializes_only_populated_fields() {
        let patch = SegmentPatch::default().description("new text");
        let json = serde_json::to_value(&patch).expect("serialize");
        assert!(json.get("name").is_none());
        assert_eq!(json["description"], "new text");
    }

    #[test]
    fn segment_deserializes_with_missing_optionals() {
        let segment: Segment =
            serde_json::from_value(serde_json::json!({"id": "seg-1", "name": "Trial"}))
                .expect("deserialize");
        assert_eq!(segment.id, "seg-1");
        assert!(segment.description.is_none());
        assert!(segment.rule.is_none());
    }
}
