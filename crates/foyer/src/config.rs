//! Gateway configuration.
//!
//! Values come from an optional TOML file plus `FOYER_` environment
//! overrides, e.g. `FOYER_BACKEND__BASE_URL` for `backend.base_url`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the gateway listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Allowed CORS origins. Empty mirrors the request origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Set the Secure flag on session cookies. Off for http://localhost.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            allowed_origins: Vec::new(),
            secure_cookies: false,
        }
    }
}

/// Agent backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the agent backend. Paths are requested under `/v1`.
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

/// Identity provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the identity provider.
    #[serde(default = "default_identity_url")]
    pub url: String,
    /// Publishable (anon) API key sent with every provider request.
    #[serde(default)]
    pub anon_key: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            url: default_identity_url(),
            anon_key: String::new(),
        }
    }
}

/// Static UI settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiConfig {
    /// Directory with the built UI assets. When set, unmatched paths are
    /// served from here with an `index.html` fallback.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_identity_url() -> String {
    "http://localhost:54321".to_string()
}

/// Load configuration from an optional file path plus the environment.
///
/// Without an explicit path, a `foyer.toml` in the working directory is
/// picked up when present.
pub fn load(path: Option<&Path>) -> Result<GatewayConfig> {
    let mut builder = Config::builder();

    builder = match path {
        Some(path) => builder.add_source(
            File::from(path.to_path_buf())
                .format(FileFormat::Toml)
                .required(true),
        ),
        None => builder.add_source(File::new("foyer", FileFormat::Toml).required(false)),
    };

    let settings = builder
        .add_source(Environment::with_prefix("FOYER").separator("__"))
        .build()
        .context("loading configuration")?;

    settings
        .try_deserialize()
        .context("parsing configuration")
}
