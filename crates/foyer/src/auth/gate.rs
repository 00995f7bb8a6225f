//! The session-authentication gate.
//!
//! Runs as middleware ahead of every page route. Exempt paths (API surface,
//! assets) pass straight through without touching the identity provider.
//! For everything else the gate resolves the session, classifies the path
//! and either lets the request through or redirects, applying any rotated
//! session cookies to the response no matter which branch was taken.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use log::{debug, warn};

use super::classifier::{self, RouteClass};
use crate::api::AppState;

/// Gate decision for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

/// Pure decision table over route class and authentication state.
pub fn decide(path: &str, authenticated: bool) -> GateDecision {
    match (authenticated, classifier::classify(path)) {
        // A signed-in user finishing an OAuth flow must still reach the
        // callback; everything else public bounces home.
        (true, RouteClass::Public) if classifier::is_callback(path) => GateDecision::Allow,
        (true, RouteClass::Public) => GateDecision::Redirect("/"),
        (true, RouteClass::Protected) => GateDecision::Allow,
        (false, RouteClass::Public) => GateDecision::Allow,
        (false, RouteClass::Protected) => GateDecision::Redirect(classifier::LOGIN_PATH),
    }
}

/// Auth gate middleware.
///
/// Identity resolution happens once per request, before any handler logic,
/// and its failure is indistinguishable from "not signed in".
pub async fn auth_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    if classifier::is_gate_exempt(&path) {
        return next.run(req).await;
    }

    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let resolved = state.identity.resolve(cookie_header.as_deref()).await;

    let mut response = match decide(&path, resolved.user.is_some()) {
        GateDecision::Allow => {
            if let Some(user) = resolved.user {
                debug!("allowing {} for user {}", path, user.id);
                req.extensions_mut().insert(user);
            }
            next.run(req).await
        }
        GateDecision::Redirect(target) => {
            debug!("redirecting {path} to {target}");
            Redirect::temporary(target).into_response()
        }
    };

    // Rotated credentials must survive redirects too, or the refreshed
    // session is lost and the next request refreshes again.
    for cookie in &resolved.rotated_cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(err) => warn!("dropping unrepresentable session cookie: {err}"),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_public_path_redirects_home() {
        assert_eq!(
            decide("/auth/login", true),
            GateDecision::Redirect("/")
        );
        assert_eq!(
            decide("/auth/signup", true),
            GateDecision::Redirect("/")
        );
    }

    #[test]
    fn authenticated_callback_is_allowed() {
        assert_eq!(decide("/auth/callback", true), GateDecision::Allow);
        assert_eq!(decide("/auth/callback/github", true), GateDecision::Allow);
    }

    #[test]
    fn authenticated_protected_path_is_allowed() {
        assert_eq!(decide("/", true), GateDecision::Allow);
        assert_eq!(decide("/dashboard", true), GateDecision::Allow);
    }

    #[test]
    fn unauthenticated_public_path_is_allowed() {
        assert_eq!(decide("/auth/login", false), GateDecision::Allow);
        assert_eq!(decide("/auth/callback", false), GateDecision::Allow);
    }

    #[test]
    fn unauthenticated_protected_path_redirects_to_login() {
        assert_eq!(
            decide("/dashboard", false),
            GateDecision::Redirect(classifier::LOGIN_PATH)
        );
        assert_eq!(
            decide("/", false),
            GateDecision::Redirect(classifier::LOGIN_PATH)
        );
    }
}
