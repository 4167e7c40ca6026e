//! Upstream error definitions.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the hosting platform.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success HTTP status.
    #[error("upstream returned {status}: {status_text}")]
    Status {
        status: StatusCode,
        status_text: String,
    },

    /// Request never produced an HTTP response (DNS, connect, reset).
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Body could not be read or decoded as the expected JSON shape.
    #[error("malformed upstream response: {0}")]
    Malformed(String),

    /// GraphQL answered 2xx but carried no data payload.
    #[error("upstream reported: {0}")]
    Application(String),

    /// Full aggregation still saw full pages after the configured ceiling.
    #[error("contributor listing exceeds {0} pages")]
    PageLimit(u32),

    /// Client could not be constructed from configuration.
    #[error("invalid upstream setup: {0}")]
    Setup(String),
}

impl UpstreamError {
    /// Build a status error.
    ///
    /// reqwest does not expose the reason phrase sent on the wire, so the
    /// status text is the registered phrase for the code. Unregistered codes
    /// use the numeric code itself.
    pub fn from_status(status: StatusCode) -> Self {
        let status_text = match status.canonical_reason() {
            Some(reason) => reason.to_string(),
            None => status.as_str().to_string(),
        };
        Self::Status {
            status,
            status_text,
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
