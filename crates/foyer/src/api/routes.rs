//! Router assembly.

use axum::{
    Json, Router, middleware,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, patch, post},
};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::state::AppState;
use super::{chat, relay};
use crate::auth::auth_gate;

/// Build the gateway router.
///
/// The API surface (`/chat`, `/sessions...`) and `/health` sit outside the
/// auth gate's matcher; every other path runs through the gate before
/// reaching the static UI fallback.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    let api_routes = Router::new()
        .route("/chat", post(chat::chat))
        .route(
            "/sessions",
            get(relay::list_sessions).post(relay::create_session),
        )
        .route(
            "/sessions/{session_id}",
            patch(relay::update_session).delete(relay::delete_session),
        )
        .route(
            "/sessions/{session_id}/messages",
            get(relay::list_session_messages),
        )
        .with_state(state.clone());

    let public_routes = Router::new().route("/health", get(health));

    let router = Router::new().merge(public_routes).merge(api_routes);

    // Page routes: the built UI when configured, a plain 404 otherwise. The
    // gate decides before either answers.
    let router = match &state.config.ui.dir {
        Some(dir) => {
            let serve_ui = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            router.fallback_service(serve_ui)
        }
        None => router.fallback(page_not_found),
    };

    router
        .layer(middleware::from_fn_with_state(state, auth_gate))
        .layer(cors)
        .layer(trace_layer)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn page_not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Build the CORS layer based on configuration.
///
/// With no configured origins the request origin is mirrored, which behaves
/// like "allow any" while staying compatible with credentialed requests.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let headers = [
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::ORIGIN,
        header::COOKIE,
    ];

    let origins: Vec<HeaderValue> = state
        .config
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("CORS: invalid origin in config: {}", origin);
                None
            })
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: no origins configured, mirroring request origin");
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
    } else {
        tracing::info!("CORS: allowing {} origin(s)", origins.len());
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
    }
}
