//! Uniform result envelope returned by every public operation
//!
//! Success and failure are normalized into one shape so callers branch
//! only on whether `errors` is non-empty. No error type crosses the
//! operation boundary in any other form.

use serde::{Deserialize, Serialize};

use crate::errors::VantageError;

/// The `{data, errors}` wrapper every public operation returns.
///
/// Exactly one of the two fields is populated: a success carries `data`
/// and an empty `errors` sequence, a failure carries no `data` and at
/// least one error message. The constructors are the only way to build
/// an envelope, which keeps that invariant from being violated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub errors: Vec<String>,
}

impl<T> Envelope<T> {
    /// Wrap a successful outcome.
    pub fn success(data: T) -> Self {
        Self { data: Some(data), errors: Vec::new() }
    }

    /// Wrap a failure with a single error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self { data: None, errors: vec![error.into()] }
    }

    /// Wrap a failure with an ordered sequence of error messages.
    ///
    /// An empty sequence would violate the envelope invariant, so it is
    /// replaced with a generic entry rather than producing an envelope
    /// that is neither success nor failure.
    pub fn failures(errors: Vec<String>) -> Self {
        let errors = if errors.is_empty() {
            vec!["ApiError: operation failed without a reported message".to_string()]
        } else {
            errors
        };
        Self { data: None, errors }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_failure(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Map the success payload, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope { data: self.data.map(f), errors: self.errors }
    }
}

impl<T> From<Result<T, VantageError>> for Envelope<T> {
    fn from(result: Result<T, VantageError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}
