//! Session store adapter for the external identity provider.
//!
//! The provider owns credential issuance; the gateway only validates the
//! cookie-carried session and slides it forward with the refresh token when
//! the access token has expired. Provider or network failures resolve to "no
//! user" so the gate can fail closed instead of surfacing a 500.

use log::{debug, warn};
use serde::Deserialize;
use serde_json::json;

use crate::config::IdentityConfig;

/// Cookie holding the short-lived access token.
pub const ACCESS_COOKIE: &str = "sb-access-token";

/// Cookie holding the long-lived refresh token.
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

/// Lifetime of a re-issued refresh cookie (one week).
const REFRESH_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

/// Fallback access-cookie lifetime when the provider omits `expires_in`.
const DEFAULT_ACCESS_MAX_AGE_SECS: u64 = 3600;

/// Identity principal resolved from session credentials.
///
/// Request-scoped: resolved fresh on every request, never cached.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Outcome of one session resolution.
///
/// `rotated_cookies` carries re-issued credentials that the caller must apply
/// to whichever response it ultimately returns, on every branch.
#[derive(Debug, Default)]
pub struct ResolvedSession {
    pub user: Option<User>,
    pub rotated_cookies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    user: User,
}

/// Client for the identity provider's session endpoints.
///
/// Stateless apart from the shared connection pool, so it is safe to use
/// from concurrent requests.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    secure_cookies: bool,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, config: &IdentityConfig, secure_cookies: bool) -> Self {
        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            secure_cookies,
        }
    }

    /// Resolve the user for a request's Cookie header.
    ///
    /// Tries the access token first; on an invalid or expired token falls
    /// back to the refresh token, which rotates both cookies. Any provider
    /// failure yields an unauthenticated resolution.
    pub async fn resolve(&self, cookie_header: Option<&str>) -> ResolvedSession {
        let Some(cookies) = cookie_header else {
            return ResolvedSession::default();
        };

        if let Some(token) = cookie_value(cookies, ACCESS_COOKIE) {
            match self.fetch_user(token).await {
                Ok(Some(user)) => {
                    return ResolvedSession {
                        user: Some(user),
                        rotated_cookies: Vec::new(),
                    };
                }
                // Rejected token: fall through to the refresh path.
                Ok(None) => debug!("access token rejected, trying refresh"),
                Err(err) => {
                    warn!("identity provider unreachable: {err}");
                    return ResolvedSession::default();
                }
            }
        }

        if let Some(token) = cookie_value(cookies, REFRESH_COOKIE) {
            match self.refresh_session(token).await {
                Ok(Some(resolved)) => return resolved,
                Ok(None) => debug!("refresh token rejected"),
                Err(err) => warn!("session refresh failed: {err}"),
            }
        }

        ResolvedSession::default()
    }

    /// Validate an access token against the provider.
    async fn fetch_user(&self, access_token: &str) -> Result<Option<User>, reqwest::Error> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    /// Exchange the refresh token for a new token pair.
    async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<Option<ResolvedSession>, reqwest::Error> {
        let response = self
            .http
            .post(format!(
                "{}/auth/v1/token?grant_type=refresh_token",
                self.base_url
            ))
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let tokens: TokenResponse = response.json().await?;
        debug!("rotated session for user {}", tokens.user.id);

        let rotated_cookies = vec![
            self.session_cookie(
                ACCESS_COOKIE,
                &tokens.access_token,
                tokens.expires_in.unwrap_or(DEFAULT_ACCESS_MAX_AGE_SECS),
            ),
            self.session_cookie(REFRESH_COOKIE, &tokens.refresh_token, REFRESH_MAX_AGE_SECS),
        ];

        Ok(Some(ResolvedSession {
            user: Some(tokens.user),
            rotated_cookies,
        }))
    }

    /// Build a session cookie with the standard security flags.
    fn session_cookie(&self, name: &str, value: &str, max_age_secs: u64) -> String {
        let secure_flag = if self.secure_cookies { " Secure;" } else { "" };
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax;{secure_flag} Max-Age={max_age_secs}")
    }
}

/// Extract a named cookie's value from a Cookie header.
fn cookie_value<'a>(cookie_header: &'a str, cookie_name: &str) -> Option<&'a str> {
    cookie_header.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        if name.trim() == cookie_name {
            Some(value.trim())
        } else {
            None
        }
    })
}
