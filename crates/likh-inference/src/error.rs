//! Error types for the inference layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during a single extraction call.
///
/// Every variant is terminal for the call it came from: nothing is retried.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The request never produced an HTTP response, or the provider failed server-side.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The credential was missing on the wire or refused by the provider.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Rate limit or quota rejection.
    #[error("rate limited: {0}")]
    RateLimit(String),

    /// The response body was malformed or carried no text.
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// Any other non-success status, e.g. an image the provider refuses.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl ExtractionError {
    /// The kind of failure, without its message.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::Transport(_) => ErrorKind::Transport,
            ExtractionError::Auth(_) => ErrorKind::Auth,
            ExtractionError::RateLimit(_) => ErrorKind::RateLimit,
            ExtractionError::EmptyResponse(_) => ErrorKind::EmptyResponse,
            ExtractionError::Rejected { .. } => ErrorKind::Rejected,
        }
    }
}

impl From<reqwest::Error> for ExtractionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ExtractionError::EmptyResponse(e.to_string())
        } else {
            ExtractionError::Transport(e.to_string())
        }
    }
}

/// Discriminant of [`ExtractionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Transport,
    Auth,
    RateLimit,
    EmptyResponse,
    Rejected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Auth => "auth",
            ErrorKind::RateLimit => "rate-limit",
            ErrorKind::EmptyResponse => "empty-response",
            ErrorKind::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The credential is absent from the environment.
///
/// Raised once at startup; there is no degraded mode without a credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing credential: environment variable {var} is not set or empty")]
pub struct MissingCredential {
    /// Name of the environment variable that was consulted.
    pub var: String,
}
