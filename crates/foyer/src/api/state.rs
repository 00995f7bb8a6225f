//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::IdentityClient;
use crate::config::GatewayConfig;

/// Shared, immutable state. Nothing here is mutated per request; the
/// reqwest client carries its own internal connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration.
    pub config: Arc<GatewayConfig>,
    /// HTTP client for backend requests (chat stream and CRUD relay).
    pub http: reqwest::Client,
    /// Session store adapter for the identity provider.
    pub identity: IdentityClient,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        let http = reqwest::Client::new();
        let identity = IdentityClient::new(
            http.clone(),
            &config.identity,
            config.server.secure_cookies,
        );

        Self {
            config: Arc::new(config),
            http,
            identity,
        }
    }

    /// Backend URL for a versioned API path, e.g. `backend_url("chat")`.
    pub fn backend_url(&self, path: &str) -> String {
        format!(
            "{}/v1/{}",
            self.config.backend.base_url.trim_end_matches('/'),
            path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_url_joins_version_prefix() {
        let mut config = GatewayConfig::default();
        config.backend.base_url = "http://backend:9000/".to_string();
        let state = AppState::new(config);

        assert_eq!(state.backend_url("chat"), "http://backend:9000/v1/chat");
        assert_eq!(
            state.backend_url("sessions/abc/messages"),
            "http://backend:9000/v1/sessions/abc/messages"
        );
    }
}
