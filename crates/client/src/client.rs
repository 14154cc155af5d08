//! Domain operations
//!
//! [`ApiClient`] is the public surface: segment CRUD, visitor/account
//! queries, and activity aggregation. Each operation validates its
//! input, builds a request, drives the retry loop, and wraps the
//! outcome in an [`Envelope`]. No error crosses this boundary in any
//! other form.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use vantage_domain::{
    AccountRecord, AggregationRow, ClientConfig, Credentials, Deleted, EntityKind, Envelope,
    QuerySpec, Result, Segment, SegmentDraft, SegmentPatch, VantageError, VisitorRecord,
};

use crate::page::{PageCursor, PageResponse};
use crate::request::{ApiRequest, Endpoint, RequestBuilder};
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, RawResponse, Transport};
use crate::wire::{to_wire, WireQuery};

/// API client for the Vantage platform.
///
/// One instance serves one command invocation; operations run one at a
/// time and share the credentials and the transport's connection pool.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    requests: RequestBuilder,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Create a client over the production HTTP transport.
    ///
    /// # Errors
    /// Returns `VantageError::Config` if the transport cannot be built.
    pub fn new(config: ClientConfig, credentials: Arc<Credentials>) -> Result<Self> {
        let transport = HttpTransport::new(config.base_url.clone()).map_err(|err| {
            VantageError::Config(format!("failed to build HTTP transport: {}", err))
        })?;

        Ok(Self {
            transport: Arc::new(transport),
            requests: RequestBuilder::new(credentials, config.timeout),
            retry: RetryPolicy::default(),
        })
    }

    /// Create a builder for fluent configuration.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    // ---- segment CRUD ----

    /// List all segments for the subscription.
    pub async fn list_segments(&self) -> Envelope<Vec<Segment>> {
        self.try_list_segments().await.into()
    }

    async fn try_list_segments(&self) -> Result<Vec<Segment>> {
        let request = self.requests.build(Endpoint::ListSegments, Vec::new(), None)?;
        let response = self.execute(request).await?;
        let body: SegmentListBody = decode(&self.check_status(response)?)?;
        Ok(body.into_segments())
    }

    /// Create a new segment. The server assigns the id.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_segment(&self, draft: &SegmentDraft) -> Envelope<Segment> {
        self.try_create_segment(draft).await.into()
    }

    async fn try_create_segment(&self, draft: &SegmentDraft) -> Result<Segment> {
        if draft.name.trim().is_empty() {
            return Err(VantageError::Validation(
                "segment name must not be empty".to_string(),
            ));
        }

        let body = serde_json::to_value(draft)
            .map_err(|err| VantageError::Validation(format!("unencodable segment: {}", err)))?;
        let request = self.requests.build(Endpoint::CreateSegment, Vec::new(), Some(body))?;
        let response = self.execute(request).await?;
        let segment: Segment = decode(&self.check_status(response)?)?;

        if segment.id.is_empty() {
            return Err(VantageError::Api(
                "server returned a created segment without an id".to_string(),
            ));
        }
        Ok(segment)
    }

    /// Update an existing segment. At least one field must be set.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update_segment(&self, id: &str, patch: &SegmentPatch) -> Envelope<Segment> {
        self.try_update_segment(id, patch).await.into()
    }

    async fn try_update_segment(&self, id: &str, patch: &SegmentPatch) -> Result<Segment> {
        if id.is_empty() {
            return Err(VantageError::Validation(
                "segment id is required for update".to_string(),
            ));
        }
        if patch.is_empty() {
            return Err(VantageError::Validation(
                "update requires at least one field".to_string(),
            ));
        }

        let body = serde_json::to_value(patch)
            .map_err(|err| VantageError::Validation(format!("unencodable patch: {}", err)))?;
        let request =
            self.requests.build(Endpoint::UpdateSegment { id }, Vec::new(), Some(body))?;
        let response = self.execute(request).await?;
        decode(&self.check_status(response)?)
    }

    /// Delete a segment.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_segment(&self, id: &str) -> Envelope<Deleted> {
        self.try_delete_segment(id).await.into()
    }

    async fn try_delete_segment(&self, id: &str) -> Result<Deleted> {
        if id.is_empty() {
            return Err(VantageError::Validation(
                "segment id is required for delete".to_string(),
            ));
        }

        let request = self.requests.build(Endpoint::DeleteSegment { id }, Vec::new(), None)?;
        let response = self.execute(request).await?;
        self.check_status(response)?;
        Ok(Deleted { id: id.to_string() })
    }

    // ---- queries ----

    /// Query visitor records, draining all pages.
    pub async fn query_visitors(&self, spec: &QuerySpec) -> Envelope<Vec<VisitorRecord>> {
        self.try_query(spec, EntityKind::Visitor, false).await.into()
    }

    /// Query account records, draining all pages.
    pub async fn query_accounts(&self, spec: &QuerySpec) -> Envelope<Vec<AccountRecord>> {
        self.try_query(spec, EntityKind::Account, false).await.into()
    }

    /// Run an activity aggregation. A group-by clause is required; the
    /// result has one row per group-by combination.
    pub async fn query_activity(&self, spec: &QuerySpec) -> Envelope<Vec<AggregationRow>> {
        self.try_query(spec, EntityKind::Activity, true).await.into()
    }

    async fn try_query<T: DeserializeOwned>(
        &self,
        spec: &QuerySpec,
        expected: EntityKind,
        require_group_by: bool,
    ) -> Result<Vec<T>> {
        if spec.entity != expected {
            return Err(VantageError::Validation(format!(
                "expected a {} spec, got {}",
                expected, spec.entity
            )));
        }
        if require_group_by && spec.group_by.is_empty() {
            return Err(VantageError::Validation(
                "activity queries require a group-by clause".to_string(),
            ));
        }

        let wire = to_wire(spec)?;
        self.drain_pages(&wire).await
    }

    /// Fetch every page of a paginated query, strictly sequentially.
    ///
    /// A failure on any page fails the whole operation; partial results
    /// are discarded because aggregation correctness is not guaranteed
    /// from an incomplete scan.
    async fn drain_pages<T: DeserializeOwned>(&self, wire: &WireQuery) -> Result<Vec<T>> {
        let mut cursor = PageCursor::start();
        let mut items = Vec::new();

        loop {
            let body = wire.to_body(cursor.token());
            let request = self.requests.build(Endpoint::Aggregation, Vec::new(), Some(body))?;
            let response = self.check_status(self.execute(request).await?)?;
            let page: PageResponse<T> = decode(&response)?;

            items.extend(page.results);
            cursor.advance(page.next_token);
            if cursor.is_exhausted() {
                break;
            }
        }

        Ok(items)
    }

    // ---- transport + retry ----

    /// Send a request, retrying transient failures with exponential
    /// backoff. Transport failures and HTTP 429/502/503/504 retry; any
    /// other status is returned to the caller for mapping.
    #[instrument(skip(self, request), fields(path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let attempts = self.retry.max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.transport.send(request.clone()).await {
                Ok(response) => {
                    if RetryPolicy::retryable_status(response.status) && attempt < attempts {
                        warn!(
                            attempt,
                            status = %response.status,
                            "transient HTTP status, retrying"
                        );
                        tokio::time::sleep(self.retry.backoff_delay(attempt)).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    if attempt < attempts {
                        warn!(attempt, error = %err, "transport failure, retrying");
                        tokio::time::sleep(self.retry.backoff_delay(attempt)).await;
                        continue;
                    }
                    return Err(VantageError::Transport(err.to_string()));
                }
            }
        }

        // attempts >= 1, so the loop always returns
        Err(VantageError::Transport("retries exhausted without a result".to_string()))
    }

    /// Map an HTTP error status to the error taxonomy, passing the
    /// server-reported message through.
    fn check_status(&self, response: RawResponse) -> Result<RawResponse> {
        let status = response.status;
        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(&response);
        debug!(%status, %message, "API request failed");

        match status {
            StatusCode::NOT_FOUND => Err(VantageError::NotFound(message)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(VantageError::Auth(message)),
            _ => Err(VantageError::Api(format!("HTTP {}: {}", status.as_u16(), message))),
        }
    }
}

/// Extract the server's error message from a failure body, falling back
/// to the raw text and then the status reason.
fn error_message(response: &RawResponse) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&response.body) {
        if let Some(message) = value.get("message").and_then(serde_json::Value::as_str) {
            return message.to_string();
        }
    }
    let text = response.body_text();
    if text.is_empty() {
        response.status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        text
    }
}

fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<T> {
    serde_json::from_slice(&response.body)
        .map_err(|err| VantageError::Api(format!("failed to parse response body: {}", err)))
}

/// The segment list endpoint returns either a bare array or a wrapped
/// `{"results": [...]}` object depending on API version.
#[derive(Deserialize)]
#[serde(untagged)]
enum SegmentListBody {
    Wrapped { results: Vec<Segment> },
    Bare(Vec<Segment>),
}

impl SegmentListBody {
    fn into_segments(self) -> Vec<Segment> {
        match self {
            Self::Wrapped { results } => results,
            Self::Bare(segments) => segments,
        }
    }
}

/// Builder for [`ApiClient`].
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ClientConfig>,
    credentials: Option<Arc<Credentials>>,
    transport: Option<Arc<dyn Transport>>,
    retry: Option<RetryPolicy>,
}

impl ApiClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn credentials(mut self, credentials: Arc<Credentials>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the transport (test doubles).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns `VantageError::Config` if credentials are missing or the
    /// transport cannot be created.
    pub fn build(self) -> Result<ApiClient> {
        let config = self.config.unwrap_or_default();
        let credentials = self
            .credentials
            .ok_or_else(|| VantageError::Config("credentials not set".to_string()))?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(config.base_url.clone()).map_err(|err| {
                VantageError::Config(format!("failed to build HTTP transport: {}", err))
            })?),
        };

        Ok(ApiClient {
            transport,
            requests: RequestBuilder::new(credentials, config.timeout),
            retry: self.retry.unwrap_or_default(),
        })
    }
}
