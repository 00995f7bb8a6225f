//! Streaming chat proxy.
//!
//! Translates the UI's message representation into the backend chat schema,
//! opens the upstream stream and relays it to the browser unmodified. The
//! relay is a true pipe: nothing is parsed, re-framed or buffered, and the
//! first upstream chunk is written downstream before the stream completes.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::Response,
};
use log::{debug, error, warn};
use serde::Deserialize;

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::message::{UiMessage, translate};

/// Header identifying the UI message-stream protocol version.
pub const UI_STREAM_PROTOCOL_HEADER: &str = "x-vercel-ai-ui-message-stream";

/// Current protocol version.
pub const UI_STREAM_PROTOCOL_VERSION: &str = "v1";

/// Fixed client-facing message for every chat-path failure.
const CHAT_FAILURE: &str = "Backend request failed";

/// Request body for `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub messages: Vec<UiMessage>,
}

/// Proxy a chat request to the backend and relay the response stream.
///
/// Non-success upstream statuses are mirrored with a JSON error envelope and
/// never read as a stream. On success the stream-envelope headers are forced
/// on the response regardless of what the backend sent; an upstream drop
/// mid-stream simply ends the downstream stream, detection is the UI's job.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> ApiResult<Response> {
    let request = translate(&body.messages);
    let url = state.backend_url("chat");
    debug!(
        "proxying chat request with {} messages to {}",
        request.messages.len(),
        url
    );

    let upstream = state
        .http
        .post(&url)
        .header(header::ACCEPT, "text/event-stream")
        .json(&request)
        .send()
        .await
        .map_err(|err| {
            error!("failed to reach backend chat endpoint: {err}");
            ApiError::UpstreamUnavailable(CHAT_FAILURE)
        })?;

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    if !status.is_success() {
        warn!("backend chat endpoint returned {status}");
        return Err(ApiError::UpstreamRejected {
            status,
            message: CHAT_FAILURE,
        });
    }

    // Byte-for-byte relay; dropping the response body (client disconnect)
    // drops the upstream connection with it.
    let body = Body::from_stream(upstream.bytes_stream());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header(UI_STREAM_PROTOCOL_HEADER, UI_STREAM_PROTOCOL_VERSION)
        // Disable nginx buffering if present
        .header("x-accel-buffering", "no")
        .body(body)
        .map_err(|err| ApiError::Internal(format!("failed to build stream response: {err}")))
}
