//! Query wire model
//!
//! Translates a [`QuerySpec`] into the aggregation pipeline body the
//! platform accepts. Translation is where the spec is validated: window
//! form, window bounds, and field allow-lists are all checked here,
//! before any network call.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;
use vantage_domain::{Comparison, EntityKind, QuerySpec, Result, VantageError};

/// Fields a visitor query may filter or group on.
const VISITOR_FIELDS: &[&str] =
    &["visitorId", "accountId", "country", "browser", "firstVisit", "lastVisit"];

/// Fields an account query may filter or group on.
const ACCOUNT_FIELDS: &[&str] = &["accountId", "plan", "country", "firstVisit", "lastVisit"];

/// Fields an activity query may filter or group on.
const ACTIVITY_FIELDS: &[&str] = &[
    "eventName",
    "visitorId",
    "accountId",
    "day",
    "hour",
    "numEvents",
    "numMinutes",
    "visitor.country",
];

fn allowed_fields(entity: EntityKind) -> &'static [&'static str] {
    match entity {
        EntityKind::Visitor => VISITOR_FIELDS,
        EntityKind::Account => ACCOUNT_FIELDS,
        EntityKind::Activity => ACTIVITY_FIELDS,
    }
}

/// A query translated to the wire format, ready to be posted to the
/// aggregation endpoint. The pipeline is fixed once built; only the
/// pagination cursor varies between page requests.
#[derive(Debug, Clone, PartialEq)]
pub struct WireQuery {
    request_id: String,
    pipeline: Vec<Value>,
}

impl WireQuery {
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Render the request body, echoing the continuation token from the
    /// previous page when one is held.
    pub fn to_body(&self, cursor: Option<&str>) -> Value {
        let mut body = json!({
            "response": {"mimeType": "application/json"},
            "request": {
                "requestId": self.request_id,
                "pipeline": self.pipeline,
            },
        });
        if let Some(token) = cursor {
            body["cursor"] = Value::String(token.to_string());
        }
        body
    }
}

/// Translate a query spec into its wire form.
///
/// A relative window resolves to `[now - N days, now)` on the process
/// clock at this call, not when the spec was built. Group-by ordering is
/// preserved into the pipeline because it determines output column
/// order.
///
/// # Errors
/// Returns `VantageError::Validation` if both or neither window form is
/// present, if `N <= 0`, if an explicit window is not `start < end`, or
/// if a filter/group-by field is not in the allow-list for the spec's
/// entity kind.
pub fn to_wire(spec: &QuerySpec) -> Result<WireQuery> {
    let (start, end) = resolve_window(spec, Utc::now())?;

    let allowed = allowed_fields(spec.entity);
    for field in spec.filters.keys() {
        if !allowed.contains(&field.as_str()) {
            return Err(VantageError::Validation(format!(
                "filter field '{}' is not valid for {} queries",
                field, spec.entity
            )));
        }
    }
    for field in &spec.group_by {
        if !allowed.contains(&field.as_str()) {
            return Err(VantageError::Validation(format!(
                "group-by field '{}' is not valid for {} queries",
                field, spec.entity
            )));
        }
    }

    let mut pipeline = vec![source_stage(spec.entity, start, end)];

    for (field, comparison) in &spec.filters {
        pipeline.push(json!({"filter": filter_expression(field, comparison)?}));
    }

    if !spec.group_by.is_empty() {
        pipeline.push(group_stage(spec));
    }

    let request_id = format!("{}-{}", spec.entity, Uuid::new_v4());
    Ok(WireQuery { request_id, pipeline })
}

fn resolve_window(
    spec: &QuerySpec,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    match (spec.last_days, spec.between) {
        (Some(_), Some(_)) => Err(VantageError::Validation(
            "time window must be either relative or explicit, not both".to_string(),
        )),
        (None, None) => Err(VantageError::Validation(
            "a time window is required: set last_days or an explicit start/end".to_string(),
        )),
        (Some(days), None) => {
            if days <= 0 {
                return Err(VantageError::Validation(format!(
                    "last_days must be positive, got {}",
                    days
                )));
            }
            Ok((now - ChronoDuration::days(days), now))
        }
        (None, Some((start, end))) => {
            if start >= end {
                return Err(VantageError::Validation(format!(
                    "window start {} must be before end {}",
                    start, end
                )));
            }
            Ok((start, end))
        }
    }
}

fn source_stage(entity: EntityKind, start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
    let source_key = match entity {
        EntityKind::Visitor => "visitors",
        EntityKind::Account => "accounts",
        EntityKind::Activity => "trackEvents",
    };
    let days = (end - start).num_days().max(1);

    json!({
        "source": {
            source_key: {},
            "timeSeries": {
                "period": "dayRange",
                "first": start.timestamp_millis(),
                "count": days,
            },
        },
    })
}

fn filter_expression(field: &str, comparison: &Comparison) -> Result<String> {
    // serde_json renders strings quoted and numbers bare, which is
    // exactly the expression syntax the pipeline filter stage expects.
    let operand = serde_json::to_string(comparison.operand())
        .map_err(|err| VantageError::Validation(format!("unencodable filter operand: {}", err)))?;
    Ok(format!("{}{}{}", field, comparison.operator(), operand))
}

fn group_stage(spec: &QuerySpec) -> Value {
    let count_field = match spec.entity {
        EntityKind::Account => "accountId",
        EntityKind::Visitor | EntityKind::Activity => "visitorId",
    };

    let mut aggregates = serde_json::Map::new();
    aggregates.insert("count".to_string(), json!({"count": count_field}));
    if spec.entity == EntityKind::Activity {
        aggregates.insert("totalEvents".to_string(), json!({"sum": "numEvents"}));
    }

    json!({
        "group": {
            "group": spec.group_by,
            "fields": aggregates,
        },
    })
}
