//! CRUD relay to the backend session API.
//!
//! Thin pass-through: requests go to the fixed backend host under `/v1`,
//! JSON bodies are forwarded verbatim, and successful responses come back
//! byte-for-byte with the upstream status. Non-success statuses are mirrored
//! with a fixed per-endpoint error envelope. No retries, no reshaping.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use bytes::Bytes;
use log::{debug, error, warn};
use reqwest::Method;

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Forward one request to the backend and mirror its response.
async fn relay(
    state: &AppState,
    method: Method,
    path: &str,
    body: Option<Bytes>,
    failure: &'static str,
) -> ApiResult<Response> {
    let url = state.backend_url(path);
    debug!("relaying {method} {url}");

    let mut request = state.http.request(method, &url);
    if let Some(body) = body {
        request = request
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);
    }

    let response = request.send().await.map_err(|err| {
        error!("backend request to {url} failed: {err}");
        ApiError::UpstreamUnavailable(failure)
    })?;

    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    if !status.is_success() {
        warn!("backend returned {status} for {url}");
        return Err(ApiError::UpstreamRejected {
            status,
            message: failure,
        });
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE.as_str())
        .and_then(|value| value.to_str().ok())
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let bytes = response.bytes().await.map_err(|err| {
        error!("failed to read backend response from {url}: {err}");
        ApiError::UpstreamUnavailable(failure)
    })?;

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .map_err(|err| ApiError::Internal(format!("failed to build relay response: {err}")))
}

/// `GET /sessions`
pub async fn list_sessions(State(state): State<AppState>) -> ApiResult<Response> {
    relay(
        &state,
        Method::GET,
        "sessions",
        None,
        "Failed to fetch sessions",
    )
    .await
}

/// `POST /sessions`
pub async fn create_session(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    relay(
        &state,
        Method::POST,
        "sessions",
        Some(body),
        "Failed to create session",
    )
    .await
}

/// `GET /sessions/{session_id}/messages`
pub async fn list_session_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Response> {
    relay(
        &state,
        Method::GET,
        &format!("sessions/{session_id}/messages"),
        None,
        "Failed to fetch messages",
    )
    .await
}

/// `PATCH /sessions/{session_id}`
pub async fn update_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    relay(
        &state,
        Method::PATCH,
        &format!("sessions/{session_id}"),
        Some(body),
        "Failed to update session",
    )
    .await
}

/// `DELETE /sessions/{session_id}`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Response> {
    relay(
        &state,
        Method::DELETE,
        &format!("sessions/{session_id}"),
        None,
        "Failed to delete session",
    )
    .await
}
