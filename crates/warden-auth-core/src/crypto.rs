//! Cryptographic utilities for secure operations
//!
//! At-rest protection for stored refresh tokens (AES-256-GCM) plus the
//! deterministic digest used to look a session up by its current token.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::AuthError;

/// Nonce length for AES-GCM
const NONCE_LENGTH: usize = 12;

/// Encrypts refresh tokens before they reach the session store.
///
/// The ciphertext is nonce-prefixed and base64-encoded, so every seal of
/// the same token differs; lookups use [`token_digest`] instead.
#[derive(Clone)]
pub struct TokenVault {
    cipher: Aes256Gcm,
}

impl TokenVault {
    /// Required key length in bytes (256 bits)
    pub const KEY_LENGTH: usize = 32;

    /// Create a vault from raw key bytes
    ///
    /// # Errors
    /// Returns an error if the key is not exactly 32 bytes.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, VaultKeyError> {
        let key = key.as_ref();
        if key.len() != Self::KEY_LENGTH {
            return Err(VaultKeyError::WrongLength {
                actual: key.len(),
                expected: Self::KEY_LENGTH,
            });
        }

        let cipher = Aes256Gcm::new_from_slice(key).expect("key length already validated");
        Ok(Self { cipher })
    }

    /// Encrypt a token for storage
    pub fn seal(&self, plaintext: &str) -> Result<String, AuthError> {
        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| AuthError::Internal("failed to encrypt token".to_string()))?;

        let mut out = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(out))
    }

    /// Decrypt a stored token
    pub fn open(&self, sealed: &str) -> Result<String, AuthError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(sealed)
            .map_err(|_| AuthError::Internal("stored token is not valid base64".to_string()))?;

        if bytes.len() <= NONCE_LENGTH {
            return Err(AuthError::Internal("stored token too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| AuthError::Internal("failed to decrypt token".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| AuthError::Internal("decrypted token is not utf-8".to_string()))
    }
}

impl std::fmt::Debug for TokenVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVault").finish_non_exhaustive()
    }
}

/// Errors that can occur when creating a vault
#[derive(Debug, Clone, thiserror::Error)]
pub enum VaultKeyError {
    #[error("vault key wrong length: got {actual} bytes, need {expected}")]
    WrongLength { actual: usize, expected: usize },
}

/// Deterministic digest of a token, for storage lookup.
///
/// SHA-256, hex-encoded. The original token cannot be recovered from it.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time byte slice comparison.
///
/// The comparison time depends only on the length of the slices, not on
/// their contents.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    // XOR all bytes together - 0 only if every byte matches
    let result = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));

    result == 0
}
