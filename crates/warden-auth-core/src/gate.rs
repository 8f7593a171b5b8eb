//! Request-time token validation gate
//!
//! Rejects denylisted, expired, and malformed access tokens and resolves
//! the principal for the request. The denylist is populated by an external
//! logout trigger; the gate only reads it.

use std::sync::Arc;

use warden_db::{AccountRepository, DenylistRepository};
use warden_types::AccountId;

use crate::token::{TokenCodec, TokenError};
use crate::AuthError;

/// Whether the requested route needs an authenticated principal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// A bearer token must be present and valid
    Required,
    /// Anonymous requests pass through
    Optional,
}

/// The authenticated identity attached to a request
#[derive(Debug, Clone)]
pub struct Principal {
    /// Account id
    pub account_id: AccountId,
    /// Username (the token subject)
    pub username: String,
    /// Email address
    pub email: String,
    /// Role name from the token claims
    pub role: Option<String>,
}

/// Request-time validator for access tokens
pub struct RevocationGate<A, D>
where
    A: AccountRepository,
    D: DenylistRepository,
{
    codec: Arc<TokenCodec>,
    accounts: Arc<A>,
    denylist: Arc<D>,
}

impl<A, D> RevocationGate<A, D>
where
    A: AccountRepository,
    D: DenylistRepository,
{
    /// Create a gate
    pub fn new(codec: Arc<TokenCodec>, accounts: Arc<A>, denylist: Arc<D>) -> Self {
        Self {
            codec,
            accounts,
            denylist,
        }
    }

    /// Validate an optional bearer token against the requested route.
    ///
    /// Returns `Ok(None)` only for an anonymous request on an optional
    /// route; every other pass-through carries a resolved principal.
    pub async fn validate(
        &self,
        bearer: Option<&str>,
        route: RouteAccess,
    ) -> Result<Option<Principal>, AuthError> {
        let token = match bearer {
            Some(token) => token,
            None => {
                return match route {
                    RouteAccess::Required => Err(AuthError::Unauthorized),
                    RouteAccess::Optional => Ok(None),
                }
            }
        };

        if self.denylist.contains(token).await? {
            tracing::debug!("denylisted token presented");
            return Err(AuthError::Unauthorized);
        }

        let claims = match self.codec.parse(token) {
            Ok(claims) => claims,
            Err(TokenError::Expired(_)) => return Err(AuthError::TokenExpired),
            Err(TokenError::Malformed) => return Err(AuthError::TokenMalformed),
        };

        let account = self
            .accounts
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !self.codec.is_valid_for(token, &account.username) {
            return Err(AuthError::Unauthorized);
        }

        Ok(Some(Principal {
            account_id: account.account_id(),
            username: account.username,
            email: account.email,
            role: claims.role,
        }))
    }
}

impl<A, D> std::fmt::Debug for RevocationGate<A, D>
where
    A: AccountRepository,
    D: DenylistRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevocationGate").finish_non_exhaustive()
    }
}
