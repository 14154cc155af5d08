//! Request builder
//!
//! Constructs authenticated, parameterized requests for a named
//! endpoint. Subscription and app scoping go on every request; the
//! integration-key header is injected only for write-capable endpoints,
//! and a missing key fails before any network call.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use vantage_domain::{Credentials, Result, VantageError};

/// Header carrying the write-capable integration key.
pub const INTEGRATION_KEY_HEADER: &str = "X-Vantage-Integration-Key";
/// Header carrying the subscription scope, present on every request.
pub const SUBSCRIPTION_HEADER: &str = "X-Vantage-Subscription-Id";
/// Header carrying the application scope, present on every request.
pub const APP_HEADER: &str = "X-Vantage-App-Id";

/// A named API endpoint with its method, path, and auth requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    ListSegments,
    CreateSegment,
    UpdateSegment { id: &'a str },
    DeleteSegment { id: &'a str },
    Aggregation,
}

impl Endpoint<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListSegments => "list_segments",
            Self::CreateSegment => "create_segment",
            Self::UpdateSegment { .. } => "update_segment",
            Self::DeleteSegment { .. } => "delete_segment",
            Self::Aggregation => "aggregation",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::ListSegments => Method::GET,
            Self::CreateSegment | Self::Aggregation => Method::POST,
            Self::UpdateSegment { .. } => Method::PUT,
            Self::DeleteSegment { .. } => Method::DELETE,
        }
    }

    /// Whether the endpoint mutates server state and therefore requires
    /// the integration key.
    pub fn write_capable(&self) -> bool {
        matches!(
            self,
            Self::CreateSegment | Self::UpdateSegment { .. } | Self::DeleteSegment { .. }
        )
    }

    fn path(&self, subscription_id: &str) -> String {
        match self {
            Self::ListSegments | Self::CreateSegment => {
                format!("/api/v1/subscription/{}/segment", subscription_id)
            }
            Self::UpdateSegment { id } | Self::DeleteSegment { id } => {
                format!("/api/v1/subscription/{}/segment/{}", subscription_id, id)
            }
            Self::Aggregation => "/api/v1/aggregation".to_string(),
        }
    }
}

/// A fully-built request ready for the transport. Cloneable so the
/// retry loop can re-send it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

/// Builds [`ApiRequest`]s against a shared set of credentials.
#[derive(Clone)]
pub struct RequestBuilder {
    credentials: Arc<Credentials>,
    timeout: Duration,
}

impl RequestBuilder {
    pub fn new(credentials: Arc<Credentials>, timeout: Duration) -> Self {
        Self { credentials, timeout }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build a request for the given endpoint.
    ///
    /// # Errors
    /// Returns `VantageError::Config` when a write-capable endpoint is
    /// requested without an integration key. This is checked here, before
    /// any network call, to avoid partial side effects.
    pub fn build(
        &self,
        endpoint: Endpoint<'_>,
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<ApiRequest> {
        let mut headers = vec![
            (SUBSCRIPTION_HEADER.to_string(), self.credentials.subscription_id.clone()),
            (APP_HEADER.to_string(), self.credentials.app_id.clone()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];

        if endpoint.write_capable() {
            let key = self
                .credentials
                .api_key
                .as_deref()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    VantageError::Config(format!(
                        "integration key required for {}",
                        endpoint.name()
                    ))
                })?;
            headers.push((INTEGRATION_KEY_HEADER.to_string(), key.to_string()));
        }

        Ok(ApiRequest {
            method: endpoint.method(),
            path: endpoint.path(&self.credentials.subscription_id),
            headers,
            query,
            body,
            timeout: self.timeout,
        })
    }
}
