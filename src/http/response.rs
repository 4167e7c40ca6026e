//! Error responses and upstream error mapping.
//!
//! # Status mapping
//! ```text
//! bad/missing query parameters        → 400, fixed message
//! contributors: upstream HTTP status   → same status, "Error fetching contributors ..."
//! stats: upstream HTTP status          → 500, "Error fetching data ..."
//! stats: GraphQL without data          → 500, upstream message
//! contributors: page ceiling exceeded  → 502
//! no HTTP response from upstream       → 502
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::upstream::UpstreamError;

pub const MISSING_OWNER_REPO: &str = "Missing required query parameters: owner and repo";
pub const USER_SELECTION_DISABLED: &str = "User selection is disabled";
const UPSTREAM_UNREACHABLE: &str = "Upstream request failed";

/// An error response: status plus plain-text body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Map a contributor listing failure; upstream statuses pass through.
    pub fn from_contributors(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, status_text } => Self::new(
                status,
                format!("Error fetching contributors from GitHub: {status_text}"),
            ),
            UpstreamError::Malformed(detail) => Self::new(
                StatusCode::BAD_GATEWAY,
                format!("Malformed contributors response from GitHub: {detail}"),
            ),
            UpstreamError::PageLimit(max) => Self::new(
                StatusCode::BAD_GATEWAY,
                format!("Error fetching contributors from GitHub: more than {max} pages"),
            ),
            other => Self::from_common(other),
        }
    }

    /// Map a statistics failure; upstream statuses become 500.
    pub fn from_stats(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status_text, .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error fetching data from GitHub: {status_text}"),
            ),
            UpstreamError::Application(message) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            UpstreamError::Malformed(detail) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Malformed data from GitHub: {detail}"),
            ),
            other => Self::from_common(other),
        }
    }

    fn from_common(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Transport(_) => Self::new(StatusCode::BAD_GATEWAY, UPSTREAM_UNREACHABLE),
            other => {
                tracing::error!(error = %other, "Unexpected upstream failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contributors_status_passthrough() {
        let err = ApiError::from_contributors(UpstreamError::from_status(StatusCode::NOT_FOUND));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Error fetching contributors from GitHub: Not Found");
    }

    #[test]
    fn test_stats_status_becomes_500() {
        let err = ApiError::from_stats(UpstreamError::from_status(StatusCode::UNAUTHORIZED));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Error fetching data from GitHub: Unauthorized");
    }

    #[test]
    fn test_stats_application_message() {
        let err = ApiError::from_stats(UpstreamError::Application("Bad credentials".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Bad credentials");
    }

    #[test]
    fn test_page_limit_is_bad_gateway() {
        let err = ApiError::from_contributors(UpstreamError::PageLimit(100));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.message, "Error fetching contributors from GitHub: more than 100 pages");
    }

    #[test]
    fn test_setup_error_is_internal() {
        let err = ApiError::from_contributors(UpstreamError::Setup("bad".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
