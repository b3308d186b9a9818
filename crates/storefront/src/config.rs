//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_MENU_API_URL` - Base URL of the product/settings read API
//! - `STOREFRONT_WHATSAPP_NUMBER` - Order destination, digits only with
//!   country code (e.g. 5512982837333)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CART_PATH` - Cart store file (default: data/cart.json)
//! - `STOREFRONT_CEP_API_URL` - ViaCEP-compatible endpoint (default:
//!   https://viacep.com.br)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the product/settings read API
    pub menu_api_url: String,
    /// WhatsApp number orders are sent to (digits only, with country code)
    pub whatsapp_number: String,
    /// Path of the cart store file
    pub cart_path: PathBuf,
    /// ViaCEP-compatible lookup endpoint
    pub cep_api_url: String,
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

        let menu_api_url = get_required_env("STOREFRONT_MENU_API_URL")?;
        validate_url(&menu_api_url, "STOREFRONT_MENU_API_URL")?;

        let whatsapp_number = get_required_env("STOREFRONT_WHATSAPP_NUMBER")?;
        validate_whatsapp_number(&whatsapp_number)?;

        let cart_path = PathBuf::from(get_env_or_default("STOREFRONT_CART_PATH", "data/cart.json"));

        let cep_api_url = get_env_or_default("STOREFRONT_CEP_API_URL", "https://viacep.com.br");
        validate_url(&cep_api_url, "STOREFRONT_CEP_API_URL")?;

        Ok(Self {
            host,
            port,
            menu_api_url,
            whatsapp_number,
            cart_path,
            cep_api_url,
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

/// Validate that a value parses as an absolute URL.
fn validate_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}

/// Validate that the WhatsApp number is non-empty digits (wa.me format).
fn validate_whatsapp_number(value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_WHATSAPP_NUMBER".to_string(),
            "must be digits only, with country code (e.g. 5512982837333)".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_whatsapp_number() {
        assert!(validate_whatsapp_number("5512982837333").is_ok());
        assert!(validate_whatsapp_number("").is_err());
        assert!(validate_whatsapp_number("+55 12 98283-7333").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://viacep.com.br", "TEST_VAR").is_ok());
        assert!(validate_url("not a url", "TEST_VAR").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            menu_api_url: "http://localhost:8000/api".to_string(),
            whatsapp_number: "5512982837333".to_string(),
            cart_path: PathBuf::from("data/cart.json"),
            cep_api_url: "https://viacep.com.br".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
