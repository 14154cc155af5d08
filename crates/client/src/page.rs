//! Pagination cursor
//!
//! Wraps multi-page list responses into one logical forward-only
//! sequence. Pages are fetched strictly sequentially because the token
//! from page N is required to request page N+1. The sequence is not
//! restartable: a fresh scan gives no consistency guarantee relative to
//! the previous one.

use serde::Deserialize;

/// Cursor state for one paginated query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    token: Option<String>,
    exhausted: bool,
}

impl PageCursor {
    /// Initial state: no token, not exhausted.
    pub fn start() -> Self {
        Self::default()
    }

    /// Continuation token to send with the next page request, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Consume one page's response metadata. A present token arms the
    /// next request; absence means the sequence is complete.
    pub fn advance(&mut self, next_token: Option<String>) {
        match next_token {
            Some(token) => self.token = Some(token),
            None => {
                self.token = None;
                self.exhausted = true;
            }
        }
    }
}

/// One page of a paginated response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PageResponse<T> {
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default)]
    pub next_token: Option<String>,
}
