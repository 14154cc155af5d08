//! Client credentials and configuration
//!
//! Both structs are constructed once at startup by the configuration
//! loader and never mutated afterwards; operations share them by
//! reference.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default base URL for the Vantage API.
pub const DEFAULT_BASE_URL: &str = "https://app.vantage.io";

/// Default per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API credentials for one subscription.
///
/// The integration key is optional: read-only operations work without
/// it, write-capable operations (segment create/update/delete,
/// aggregation) require it and fail with a configuration error before
/// any network call when it is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub subscription_id: String,
    pub app_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Credentials {
    pub fn new(
        subscription_id: impl Into<String>,
        app_id: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self { subscription_id: subscription_id.into(), app_id: app_id.into(), api_key }
    }

    /// Whether a write-capable integration key is present.
    pub fn has_integration_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

/// Configuration for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL for the API (e.g. `https://app.vantage.io`).
    pub base_url: String,
    /// Timeout for one network attempt. Retries get a fresh timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: DEFAULT_TIMEOUT }
    }
}
