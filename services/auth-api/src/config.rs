//! Configuration for the Auth API service.

use std::time::Duration;

use warden_auth_core::AuthConfig;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Auth core configuration
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Signing and storage keys, both base64
        let token_secret =
            std::env::var("TOKEN_SECRET").map_err(|_| ConfigError::Missing("TOKEN_SECRET"))?;
        let storage_key =
            std::env::var("STORAGE_KEY").map_err(|_| ConfigError::Missing("STORAGE_KEY"))?;

        // Token lifetimes (defaults: 15 minutes / 7 days)
        let access_ttl_secs: u64 = std::env::var("ACCESS_TTL_SECS")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_TTL_SECS"))?;

        let refresh_ttl_secs: u64 = std::env::var("REFRESH_TTL_SECS")
            .unwrap_or_else(|_| "604800".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REFRESH_TTL_SECS"))?;

        // Lockout policy (defaults: 5 attempts / 120 minutes)
        let max_failed_attempts: i32 = std::env::var("MAX_FAILED_ATTEMPTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("MAX_FAILED_ATTEMPTS"))?;

        let lock_duration_minutes: u64 = std::env::var("LOCK_DURATION_MINUTES")
            .unwrap_or_else(|_| "120".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("LOCK_DURATION_MINUTES"))?;

        let auth = AuthConfig::try_new(token_secret, storage_key)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_access_ttl(Duration::from_secs(access_ttl_secs))
            .with_refresh_ttl(Duration::from_secs(refresh_ttl_secs))
            .with_max_failed_attempts(max_failed_attempts)
            .with_lock_duration(Duration::from_secs(lock_duration_minutes * 60));

        Ok(Self {
            http_port,
            database_url,
            auth,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
