//! Transport layer
//!
//! Issues one HTTP request at a time with a per-attempt timeout and
//! returns either the raw response (status + body bytes) or a
//! transport-level failure tagged with its kind. No retries happen
//! here; retry policy belongs to the operation layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::request::ApiRequest;

/// Raw outcome of one HTTP attempt.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Body bytes decoded as UTF-8, lossily. Used for error messages.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport-level failure, tagged with its kind.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("timeout after {0:?}")]
    Timeout(Duration),
}

/// One network attempt. Implementations perform network I/O only; they
/// hold no business knowledge and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError>;
}

/// Production transport over a pooled reqwest client.
///
/// The underlying connection pool is reused across sequential operation
/// calls within one client instance.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the given base URL.
    ///
    /// # Errors
    /// Returns `TransportError::Connection` if the underlying client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = ReqwestClient::builder()
            .no_proxy()
            .build()
            .map_err(|err| TransportError::Connection(err.to_string()))?;

        Ok(Self { client, base_url: base_url.into() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let timeout = request.timeout;

        debug!(method = %request.method, %url, "sending HTTP request");

        let mut builder =
            self.client.request(request.method.clone(), &url).timeout(timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| classify(err, timeout))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| classify(err, timeout))?
            .to_vec();

        debug!(%status, bytes = body.len(), "received HTTP response");

        Ok(RawResponse { status, body })
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Connection(err.to_string())
    }
}
