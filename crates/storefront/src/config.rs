//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFUSION_API_URL` - Base URL of the ShopFusion REST backend
//!   (e.g., http://localhost:8080)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `CART_IDENTITY` - Anonymous cart key strategy: `per-session` (default)
//!   or `shared-sentinel` (legacy `default-cart` compatibility)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How anonymous sessions obtain a cart identifier.
///
/// The original deployment fell back to a fixed `"default-cart"` sentinel
/// shared by every anonymous client, which lets unrelated visitors collide on
/// one cart. That behavior is kept available behind an explicit configuration
/// choice rather than silently preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartIdentityMode {
    /// Generate a fresh opaque key per anonymous session.
    #[default]
    PerSession,
    /// Every anonymous session shares the `"default-cart"` sentinel.
    SharedSentinel,
}

impl CartIdentityMode {
    /// Parse from the `CART_IDENTITY` environment value.
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "per-session" => Ok(Self::PerSession),
            "shared-sentinel" => Ok(Self::SharedSentinel),
            other => Err(ConfigError::InvalidEnvVar(
                "CART_IDENTITY".to_string(),
                format!("expected 'per-session' or 'shared-sentinel', got '{other}'"),
            )),
        }
    }
}

/// ShopFusion backend API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the REST backend, without the `/api` prefix.
    pub base_url: String,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Backend REST API configuration
    pub api: ApiConfig,
    /// Anonymous cart key strategy
    pub cart_identity: CartIdentityMode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let api = ApiConfig {
            base_url: get_required_env("SHOPFUSION_API_URL")?,
        };
        let cart_identity = match get_optional_env("CART_IDENTITY") {
            Some(value) => CartIdentityMode::parse(&value)?,
            None => CartIdentityMode::default(),
        };

        Ok(Self {
            host,
            port,
            base_url,
            api,
            cart_identity,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
