//! Query specification model
//!
//! A [`QuerySpec`] is the caller-facing description of a read query:
//! which entity kind to target, the time window, optional filter
//! predicates, and an optional group-by clause for aggregations. The
//! client crate translates a spec into the wire format; nothing here
//! performs I/O.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The record type a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Visitor,
    Account,
    Activity,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Account => "account",
            Self::Activity => "activity",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison applied to a single field by a filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Eq(serde_json::Value),
    Ne(serde_json::Value),
    Gt(serde_json::Value),
    Lt(serde_json::Value),
}

impl Comparison {
    /// The comparison operator in wire-expression form.
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Eq(_) => "==",
            Self::Ne(_) => "!=",
            Self::Gt(_) => ">",
            Self::Lt(_) => "<",
        }
    }

    pub fn operand(&self) -> &serde_json::Value {
        match self {
            Self::Eq(value) | Self::Ne(value) | Self::Gt(value) | Self::Lt(value) => value,
        }
    }
}

/// Structured representation of a read query.
///
/// The time window is either a relative "last N days" value or an
/// explicit start/end pair. Exactly one form must be set before the
/// spec is translated to the wire; holding both (or neither) is a
/// validation error surfaced at translation time, before any network
/// call. Relative windows resolve against the process clock when the
/// operation runs, not when the spec is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub entity: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub between: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Filter predicates, keyed by field name. Ordered for stable wire
    /// output.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, Comparison>,
    /// Group-by clause; ordering determines output column order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
}

impl QuerySpec {
    pub fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            last_days: None,
            between: None,
            filters: BTreeMap::new(),
            group_by: Vec::new(),
        }
    }

    /// Relative time window: the last `days` days ending now.
    pub fn last_days(mut self, days: i64) -> Self {
        self.last_days = Some(days);
        self
    }

    /// Explicit time window `[start, end)`.
    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.between = Some((start, end));
        self
    }

    pub fn filter(mut self, field: impl Into<String>, comparison: Comparison) -> Self {
        self.filters.insert(field.into(), comparison);
        self
    }

    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// One visitor record from a visitor query. Fields beyond the id are
/// server-defined and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    pub visitor_id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// One account record from an account query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub account_id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// One aggregation row: the group-by key fields plus the aggregate
/// values, one row per group-by combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationRow {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl AggregationRow {
    /// Fetch a numeric aggregate by name, if present and numeric.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(serde_json::Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_clauses() {
        let spec = QuerySpec::new(EntityKind::Activity)
            .last_days(7)
            .filter("eventName", Comparison::Eq(serde_json::json!("signup")))
            .group_by(["day", "visitorId"]);

        assert_eq!(spec.entity, EntityKind::Activity);
        assert_eq!(spec.last_days, Some(7));
        assert!(spec.between.is_none());
        assert_eq!(spec.filters.len(), 1);
        assert_eq!(spec.group_by, vec!["day".to_string(), "visitorId".to_string()]);
    }

    #[test]
    fn comparison_operators_map_to_wire_forms() {
        assert_eq!(Comparison::Eq(serde_json::json!(1)).operator(), "==");
        assert_eq!(Comparison::Ne(serde_json::json!(1)).operator(), "!=");
        assert_eq!(Comparison::Gt(serde_json::json!(1)).operator(), ">");
        assert_eq!(Comparison::Lt(serde_json::json!(1)).operator(), "<");
    }

    #[test]
    fn visitor_record_flattens_extra_fields() {
        let record: VisitorRecord = serde_json::from_value(serde_json::json!({
            "visitorId": "v-1",
            "country": "US",
            "lastVisit": 1700000000
        }))
        .expect("deserialize");
        assert_eq!(record.visitor_id, "v-1");
        assert_eq!(record.fields["country"], "US");
    }

    #[test]
    fn aggregation_row_exposes_numeric_aggregates() {
        let row: AggregationRow =
            serde_json::from_value(serde_json::json!({"day": "2026-01-01", "wau": 42}))
                .expect("deserialize");
        assert_eq!(row.number("wau"), Some(42.0));
        assert_eq!(row.number("day"), None);
    }
}
