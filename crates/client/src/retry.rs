//! Retry policy for domain operations
//!
//! Transport failures and a small set of transient HTTP statuses are
//! retried with exponential backoff; everything else surfaces on the
//! first attempt. The transport itself never retries.

use std::time::Duration;

use reqwest::StatusCode;

/// Operation-level retry policy.
///
/// `max_attempts` counts the initial try plus retries; the default of 3
/// means up to 2 additional attempts. Backoff doubles per retry from
/// `base_backoff`, so total attempt time stays bounded and
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_backoff: Duration::from_millis(500) }
    }
}

impl RetryPolicy {
    /// Fixed-backoff policy for tests that should not sleep.
    pub fn with_base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// Delay before the given retry (1-based).
    pub fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8);
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    /// Whether an HTTP status is transient enough to retry. 4xx other
    /// than 429 indicate the request itself is invalid; retrying cannot
    /// change the outcome.
    pub fn retryable_status(status: StatusCode) -> bool {
        matches!(status.as_u16(), 429 | 502 | 503 | 504)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_base() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(2000));
    }

    #[test]
    fn transient_statuses_are_retryable() {
        for code in [429u16, 502, 503, 504] {
            let status = StatusCode::from_u16(code).expect("status");
            assert!(RetryPolicy::retryable_status(status), "{} should retry", code);
        }
    }

    #[test]
    fn request_errors_are_not_retryable() {
        for code in [400u16, 401, 403, 404, 422, 500] {
            let status = StatusCode::from_u16(code).expect("status");
            assert!(!RetryPolicy::retryable_status(status), "{} should not retry", code);
        }
    }
}
