//! Bearer token codec
//!
//! Signs and parses access and refresh tokens with a process-wide HS256
//! key. Expired-but-well-formed tokens still yield readable claims; the
//! rotation protocol needs them to locate and purge replayed lineages.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use warden_db::AccountRow;
use warden_types::{RoleName, SessionId};

use crate::clock::Clock;
use crate::crypto::constant_time_eq;
use crate::{AuthConfig, AuthError};

/// Claims embedded in a signed token
///
/// Access tokens carry `email` + `role`; refresh tokens carry `sid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Email (access tokens)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role name (access tokens)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Session lineage id (refresh tokens)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<SessionId>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Expiration as a UTC timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }
}

/// Token parse failures
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Bad signature or structure
    #[error("token malformed")]
    Malformed,

    /// Past expiry; the claims were still readable
    #[error("token expired")]
    Expired(Claims),
}

/// Signs, parses, and validates bearer tokens
///
/// Pure function of the signing key and the injected clock; no side
/// effects, safe to share across requests.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec from a validated config
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_base64_secret(&config.token_secret)
            .expect("token secret validated at construction");
        let decoding_key = DecodingKey::from_base64_secret(&config.token_secret)
            .expect("token secret validated at construction");

        Self {
            encoding_key,
            decoding_key,
            access_ttl_secs: config.access_ttl.as_secs() as i64,
            refresh_ttl_secs: config.refresh_ttl.as_secs() as i64,
            clock,
        }
    }

    /// Access token lifetime in seconds
    pub fn access_ttl_secs(&self) -> u64 {
        self.access_ttl_secs as u64
    }

    /// Issue an access token for the account
    pub fn issue_access_token(
        &self,
        account: &AccountRow,
        role: RoleName,
    ) -> Result<String, AuthError> {
        let now = self.clock.now().timestamp();
        let claims = Claims {
            sub: account.username.clone(),
            email: Some(account.email.clone()),
            role: Some(role.to_string()),
            sid: None,
            iat: now,
            exp: now + self.access_ttl_secs,
        };

        self.sign(&claims)
    }

    /// Issue a refresh token bound to a session lineage
    ///
    /// Returns the token and its expiry, for the session record.
    pub fn issue_refresh_token(
        &self,
        session_id: SessionId,
        account: &AccountRow,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = self.clock.now().timestamp();
        let exp = now + self.refresh_ttl_secs;
        let claims = Claims {
            sub: account.username.clone(),
            email: None,
            role: None,
            sid: Some(session_id),
            iat: now,
            exp,
        };

        let token = self.sign(&claims)?;
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| AuthError::Internal("refresh expiry out of range".to_string()))?;

        Ok((token, expires_at))
    }

    /// Parse and verify a token
    ///
    /// Signature and structure are always verified; expiry is checked
    /// against the injected clock so that an expired token still returns
    /// its claims inside [`TokenError::Expired`].
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Failed to decode token: {}", e);
            TokenError::Malformed
        })?;

        let claims = data.claims;
        if self.clock.now().timestamp() > claims.exp {
            return Err(TokenError::Expired(claims));
        }

        Ok(claims)
    }

    /// Extract the subject (username) from a valid token
    pub fn subject(&self, token: &str) -> Result<String, TokenError> {
        self.parse(token).map(|claims| claims.sub)
    }

    /// Whether the token belongs to the expected subject and is not expired
    pub fn is_valid_for(&self, token: &str, expected_subject: &str) -> bool {
        match self.parse(token) {
            Ok(claims) => constant_time_eq(claims.sub.as_bytes(), expected_subject.as_bytes()),
            Err(_) => false,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            AuthError::Internal("failed to sign token".to_string())
        })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish_non_exhaustive()
    }
}
