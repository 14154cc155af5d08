//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Vantage operations.
///
/// Display output is prefixed with a machine-stable kind tag so the
/// messages carried in an [`crate::Envelope`] can be matched without
/// parsing free-form text.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum VantageError {
    /// Required credential missing for the requested operation.
    /// Produced before any network call.
    #[error("ConfigurationError: {0}")]
    Config(String),

    /// Malformed query specification or segment payload.
    /// Produced before any network call.
    #[error("ValidationError: {0}")]
    Validation(String),

    /// Connection failure or timeout after exhausting retries.
    #[error("TransportError: {0}")]
    Transport(String),

    /// Server reports the targeted resource does not exist.
    #[error("NotFoundError: {0}")]
    NotFound(String),

    /// Server rejected credentials or scope.
    #[error("AuthError: {0}")]
    Auth(String),

    /// Any other server-reported failure, message passed through.
    #[error("ApiError: {0}")]
    Api(String),
}

impl VantageError {
    /// The machine-stable kind tag carried at the front of the display
    /// string.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigurationError",
            Self::Validation(_) => "ValidationError",
            Self::Transport(_) => "TransportError",
            Self::NotFound(_) => "NotFoundError",
            Self::Auth(_) => "AuthError",
            Self::Api(_) => "ApiError",
        }
    }
}

/// Result type alias for Vantage operations
pub type Result<T> = std::result::Result<T, VantageError>;
