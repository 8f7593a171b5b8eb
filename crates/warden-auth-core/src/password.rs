//! Password hashing and verification
//!
//! The core consumes hashing as an opaque capability; [`SecretHasher`] is
//! the seam and [`Argon2SecretHasher`] the production implementation.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};

use crate::AuthError;

/// Opaque hash/verify capability for account secrets
pub trait SecretHasher: Send + Sync {
    /// Hash a plaintext secret for storage
    fn hash(&self, plaintext: &str) -> Result<String, AuthError>;

    /// Verify a plaintext secret against a stored digest.
    ///
    /// A wrong password is `Ok(false)`, not an error.
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, AuthError>;
}

/// Argon2id hasher producing PHC-format strings
#[derive(Debug, Clone, Default)]
pub struct Argon2SecretHasher;

impl Argon2SecretHasher {
    /// Create a hasher with the default Argon2id parameters
    pub fn new() -> Self {
        Self
    }
}

impl SecretHasher for Argon2SecretHasher {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!("Failed to hash password: {}", e);
                AuthError::Internal("failed to hash password".to_string())
            })
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(digest).map_err(|e| {
            tracing::error!("Stored password hash unreadable: {}", e);
            AuthError::Internal("stored password hash unreadable".to_string())
        })?;

        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => {
                tracing::error!("Password verification failed: {}", e);
                Err(AuthError::Internal(
                    "password verification failed".to_string(),
                ))
            }
        }
    }
}
