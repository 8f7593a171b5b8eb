//! Configuration types for the auth core

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};

/// Auth core configuration
///
/// Loaded once at startup and passed to the components explicitly; nothing
/// in the core reads configuration from static state.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base64-encoded symmetric signing key for access/refresh tokens
    pub token_secret: String,
    /// Base64-encoded 256-bit key encrypting stored refresh tokens
    pub storage_key: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
    /// Consecutive failures before an account locks
    pub max_failed_attempts: i32,
    /// How long a locked account stays locked
    pub lock_duration: Duration,
}

impl AuthConfig {
    /// Default access token lifetime (15 minutes)
    pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
    /// Default refresh token lifetime (7 days)
    pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
    /// Default failure threshold
    pub const DEFAULT_MAX_FAILED_ATTEMPTS: i32 = 5;
    /// Default lock window (120 minutes)
    pub const DEFAULT_LOCK_DURATION: Duration = Duration::from_secs(120 * 60);

    /// Create a new auth config, validating both keys up front
    ///
    /// # Errors
    /// Returns an error if either key is not valid base64, or the storage
    /// key does not decode to exactly 32 bytes.
    pub fn try_new(
        token_secret: impl Into<String>,
        storage_key: impl Into<String>,
    ) -> Result<Self, AuthConfigError> {
        let token_secret = token_secret.into();
        let storage_key = storage_key.into();

        STANDARD
            .decode(&token_secret)
            .map_err(|_| AuthConfigError::InvalidTokenSecret)?;

        let storage_key_bytes = STANDARD
            .decode(&storage_key)
            .map_err(|_| AuthConfigError::InvalidStorageKey)?;
        if storage_key_bytes.len() != 32 {
            return Err(AuthConfigError::StorageKeyLength {
                actual: storage_key_bytes.len(),
            });
        }

        Ok(Self {
            token_secret,
            storage_key,
            access_ttl: Self::DEFAULT_ACCESS_TTL,
            refresh_ttl: Self::DEFAULT_REFRESH_TTL,
            max_failed_attempts: Self::DEFAULT_MAX_FAILED_ATTEMPTS,
            lock_duration: Self::DEFAULT_LOCK_DURATION,
        })
    }

    /// Decoded storage key bytes
    ///
    /// Cannot fail after `try_new` validated the encoding.
    pub fn storage_key_bytes(&self) -> Vec<u8> {
        STANDARD
            .decode(&self.storage_key)
            .expect("storage key validated at construction")
    }

    /// Set access token lifetime
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Set refresh token lifetime
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Set the failure threshold
    pub fn with_max_failed_attempts(mut self, max: i32) -> Self {
        self.max_failed_attempts = max;
        self
    }

    /// Set the lock window
    pub fn with_lock_duration(mut self, duration: Duration) -> Self {
        self.lock_duration = duration;
        self
    }
}

/// Errors validating an [`AuthConfig`]
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthConfigError {
    #[error("token secret is not valid base64")]
    InvalidTokenSecret,

    #[error("storage key is not valid base64")]
    InvalidStorageKey,

    #[error("storage key must decode to 32 bytes, got {actual}")]
    StorageKeyLength { actual: usize },
}
