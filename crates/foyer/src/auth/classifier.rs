//! Route classification for the auth gate.
//!
//! Classification is a pure function of the request path. It never looks at
//! the method, body or headers, and it runs before any identity resolution.

/// Login page, also the redirect target for unauthenticated requests.
pub const LOGIN_PATH: &str = "/auth/login";

/// OAuth callback path. Must stay reachable for already-authenticated users
/// so in-flight provider flows can complete.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Routes reachable without a session.
const PUBLIC_PREFIXES: &[&str] = &[LOGIN_PATH, "/auth/signup", CALLBACK_PATH];

/// Paths the gate never runs on: the gateway's own API surface plus static
/// and image assets.
const EXEMPT_PREFIXES: &[&str] = &[
    "/api",
    "/chat",
    "/sessions",
    "/health",
    "/static",
    "/assets",
    "/images",
];

/// Authentication class of a page route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Protected,
}

/// Whether `path` equals `prefix` or sits underneath it.
fn has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Classify a gated path as public or protected.
pub fn classify(path: &str) -> RouteClass {
    if PUBLIC_PREFIXES.iter().any(|p| has_prefix(path, p)) {
        RouteClass::Public
    } else {
        RouteClass::Protected
    }
}

/// Whether `path` is the auth callback.
pub fn is_callback(path: &str) -> bool {
    has_prefix(path, CALLBACK_PATH)
}

/// Whether the auth gate skips `path` entirely.
///
/// Exempt paths bypass classification and identity resolution altogether;
/// file-looking paths (a dot in the final segment) count as assets.
pub fn is_gate_exempt(path: &str) -> bool {
    if path == "/favicon.ico" {
        return true;
    }
    if EXEMPT_PREFIXES.iter().any(|p| has_prefix(path, p)) {
        return true;
    }
    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_pages_are_public() {
        assert_eq!(classify("/auth/login"), RouteClass::Public);
        assert_eq!(classify("/auth/signup"), RouteClass::Public);
        assert_eq!(classify("/auth/callback"), RouteClass::Public);
        assert_eq!(classify("/auth/callback/github"), RouteClass::Public);
    }

    #[test]
    fn everything_else_is_protected() {
        assert_eq!(classify("/"), RouteClass::Protected);
        assert_eq!(classify("/dashboard"), RouteClass::Protected);
        assert_eq!(classify("/auth"), RouteClass::Protected);
        // Prefix matching is per path segment, not per substring.
        assert_eq!(classify("/auth/login-help"), RouteClass::Protected);
    }

    #[test]
    fn callback_detection() {
        assert!(is_callback("/auth/callback"));
        assert!(is_callback("/auth/callback/google"));
        assert!(!is_callback("/auth/login"));
    }

    #[test]
    fn api_routes_are_exempt() {
        assert!(is_gate_exempt("/chat"));
        assert!(is_gate_exempt("/sessions"));
        assert!(is_gate_exempt("/sessions/abc/messages"));
        assert!(is_gate_exempt("/api/anything"));
        assert!(is_gate_exempt("/health"));
    }

    #[test]
    fn assets_are_exempt() {
        assert!(is_gate_exempt("/images/logo.svg"));
        assert!(is_gate_exempt("/static/app.js"));
        assert!(is_gate_exempt("/favicon.ico"));
        assert!(is_gate_exempt("/fonts/inter.woff2"));
    }

    #[test]
    fn pages_are_not_exempt() {
        assert!(!is_gate_exempt("/"));
        assert!(!is_gate_exempt("/dashboard"));
        assert!(!is_gate_exempt("/auth/login"));
        assert!(!is_gate_exempt("/chatty"));
    }
}
