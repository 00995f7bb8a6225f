//! API error handling with structured responses.
//!
//! Every upstream failure surfaces to the browser as `{"error": <message>}`
//! with an HTTP status: the mirrored upstream status when the backend
//! answered, 502 when it could not be reached. The message is fixed per
//! endpoint; upstream error bodies are not forwarded for these paths.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors a gateway handler can produce.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status. Mirrored verbatim.
    #[error("{message}")]
    UpstreamRejected {
        status: StatusCode,
        message: &'static str,
    },

    /// The backend could not be reached at all.
    #[error("{0}")]
    UpstreamUnavailable(&'static str),

    /// The gateway itself failed; never carries upstream detail.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UpstreamRejected { status, .. } => *status,
            Self::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> &str {
        match self {
            Self::UpstreamRejected { message, .. } => message,
            Self::UpstreamUnavailable(message) => message,
            Self::Internal(_) => "Internal server error",
        }
    }
}

/// JSON error envelope sent to the browser.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::UpstreamRejected { .. } => {
                debug!(%status, "mirroring upstream failure");
            }
            ApiError::UpstreamUnavailable(message) => {
                warn!(message = %message, "backend unreachable");
            }
            ApiError::Internal(detail) => {
                error!(detail = %detail, "gateway error");
            }
        }

        let body = ErrorResponse {
            error: self.client_message().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_mirrors_upstream_status() {
        let err = ApiError::UpstreamRejected {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "Backend request failed",
        };
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.client_message(), "Backend request failed");
    }

    #[test]
    fn unavailable_is_bad_gateway() {
        let err = ApiError::UpstreamUnavailable("Failed to fetch sessions");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = ApiError::Internal("secret detail".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal server error");
    }
}
