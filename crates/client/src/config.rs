//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PRINTASTIC_API_BASE_URL` - Base URL of the Printastic REST backend
//!
//! ## Optional
//! - `PRINTASTIC_STRIPE_PUBLISHABLE_KEY` - Stripe publishable key handed to
//!   the payment provider's client SDK (public by definition, not a secret)
//! - `PRINTASTIC_SESSION_CACHE` - Path of the JSON file mirroring the
//!   authenticated user for fast startup (default: no mirror file)
//! - `PRINTASTIC_REQUEST_TIMEOUT_SECS` - Plain request timeout (default: 30)
//! - `PRINTASTIC_UPLOAD_TIMEOUT_SECS` - Upload request ceiling (default: 120)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 120;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Printastic client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, e.g. `https://api.printastic.example`.
    pub base_url: Url,
    /// Stripe publishable key for the payment provider's client SDK.
    pub stripe_publishable_key: Option<String>,
    /// Path of the local session mirror file, if mirroring is enabled.
    pub session_cache: Option<PathBuf>,
    /// Timeout applied to plain (non-upload) requests.
    pub request_timeout: Duration,
    /// Timeout ceiling applied to multipart uploads.
    pub upload_timeout: Duration,
}

impl ClientConfig {
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

        let base_url = get_required_env("PRINTASTIC_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRINTASTIC_API_BASE_URL".to_string(), e.to_string())
            })?;

        let request_timeout = get_timeout(
            "PRINTASTIC_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let upload_timeout = get_timeout(
            "PRINTASTIC_UPLOAD_TIMEOUT_SECS",
            DEFAULT_UPLOAD_TIMEOUT_SECS,
        )?;

        Ok(Self {
            base_url,
            stripe_publishable_key: get_optional_env("PRINTASTIC_STRIPE_PUBLISHABLE_KEY"),
            session_cache: get_optional_env("PRINTASTIC_SESSION_CACHE").map(PathBuf::from),
            request_timeout,
            upload_timeout,
        })
    }

    /// Build a configuration for a given base URL with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.parse::<Url>().map_err(|e| {
            ConfigError::InvalidEnvVar("base_url".to_string(), e.to_string())
        })?;

        Ok(Self {
            base_url,
            stripe_publishable_key: None,
            session_cache: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            upload_timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
        })
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

/// Parse a timeout variable in whole seconds, falling back to a default.
fn get_timeout(key: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_for_base_url_defaults() {
        let config = ClientConfig::for_base_url("https://api.printastic.example").unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.upload_timeout, Duration::from_secs(120));
        assert!(config.session_cache.is_none());
        assert!(config.stripe_publishable_key.is_none());
    }

    #[test]
    fn test_for_base_url_invalid() {
        let result = ClientConfig::for_base_url("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
