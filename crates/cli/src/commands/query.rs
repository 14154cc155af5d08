//! Query commands for visitors, accounts, and activity

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};
use tracing::info;
use vantage_domain::{Comparison, EntityKind, Envelope, QuerySpec, Result, VantageError};

use super::{into_json, Command, CommandContext};
use crate::cli::{QueryAction, WindowArgs};

/// Window applied when no flag is given.
const DEFAULT_LAST_DAYS: i64 = 30;

/// Handles `vantage query visitors|accounts|activity|wau|events`.
pub struct QueryCommand {
    pub action: QueryAction,
}

#[async_trait]
impl Command for QueryCommand {
    async fn execute(&self, ctx: &CommandContext) -> Envelope<Value> {
        match &self.action {
            QueryAction::Visitors(window) => {
                let spec = match windowed_spec(EntityKind::Visitor, window) {
                    Ok(spec) => spec,
                    Err(err) => return Envelope::failure(err.to_string()),
                };
                into_json(ctx.client.query_visitors(&spec).await)
            }
            QueryAction::Accounts(window) => {
                let spec = match windowed_spec(EntityKind::Account, window) {
                    Ok(spec) => spec,
                    Err(err) => return Envelope::failure(err.to_string()),
                };
                into_json(ctx.client.query_accounts(&spec).await)
            }
            QueryAction::Activity { window, group_by } => {
                let spec = match windowed_spec(EntityKind::Activity, window) {
                    Ok(spec) => spec.group_by(group_by.clone()),
                    Err(err) => return Envelope::failure(err.to_string()),
                };
                into_json(ctx.client.query_activity(&spec).await)
            }
            QueryAction::Wau { last_days } => self.wau(ctx, *last_days).await,
            QueryAction::Events { event_name, from_date, to_date, country } => {
                self.events(ctx, event_name, from_date, to_date, country.as_deref()).await
            }
        }
    }
}

impl QueryCommand {
    /// Unique active visitors in the window: group activity by
    /// `visitorId`, then count the distinct rows.
    async fn wau(&self, ctx: &CommandContext, last_days: i64) -> Envelope<Value> {
        let days = last_days.clamp(1, 365);
        info!(days, "querying unique active visitors");

        let spec =
            QuerySpec::new(EntityKind::Activity).last_days(days).group_by(["visitorId"]);
        let envelope = ctx.client.query_activity(&spec).await;

        match envelope.data {
            Some(rows) if envelope.errors.is_empty() => {
                Envelope::success(json!({"lastDays": days, "activeVisitors": rows.len()}))
            }
            _ => Envelope::failures(envelope.errors),
        }
    }

    /// Total count for a named track event, optionally filtered by
    /// visitor country.
    async fn events(
        &self,
        ctx: &CommandContext,
        event_name: &str,
        from_date: &str,
        to_date: &str,
        country: Option<&str>,
    ) -> Envelope<Value> {
        let window = match (parse_date(from_date), parse_date(to_date)) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(err), _) | (_, Err(err)) => return Envelope::failure(err.to_string()),
        };

        let mut spec = QuerySpec::new(EntityKind::Activity)
            .between(window.0, window.1)
            .filter("eventName", Comparison::Eq(json!(event_name)))
            .group_by(["eventName"]);
        if let Some(code) = country {
            spec = spec.filter("visitor.country", Comparison::Eq(json!(code)));
        }

        let envelope = ctx.client.query_activity(&spec).await;
        match envelope.data {
            Some(rows) if envelope.errors.is_empty() => {
                let total: f64 =
                    rows.iter().filter_map(|row| row.number("totalEvents")).sum();
                Envelope::success(json!({
                    "eventName": event_name,
                    "totalEvents": total,
                }))
            }
            _ => Envelope::failures(envelope.errors),
        }
    }
}

/// Build a spec with the window from the CLI flags, defaulting to the
/// last 30 days when none are given.
fn windowed_spec(entity: EntityKind, window: &WindowArgs) -> Result<QuerySpec> {
    let spec = QuerySpec::new(entity);

    match (&window.last_days, &window.from_date, &window.to_date) {
        (Some(days), _, _) => Ok(spec.last_days(*days)),
        (None, Some(from), Some(to)) => Ok(spec.between(parse_date(from)?, parse_date(to)?)),
        _ => Ok(spec.last_days(DEFAULT_LAST_DAYS)),
    }
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        VantageError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", raw))
    })?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        VantageError::Validation(format!("invalid date '{}'", raw))
    })?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}
