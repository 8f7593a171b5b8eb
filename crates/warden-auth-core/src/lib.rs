//! Warden Auth Core - Authentication business logic
//!
//! Core authentication functionality: credential verification with
//! brute-force lockout, access/refresh token issuance, refresh-token
//! rotation with replay handling, session revocation, and the request-time
//! validation gate.

pub mod clock;
pub mod config;
pub mod crypto;
pub mod error;
pub mod gate;
pub mod lockout;
pub mod password;
pub mod rotation;
pub mod service;
pub mod token;

pub use clock::{Clock, SystemClock};
pub use config::AuthConfig;
pub use crypto::{constant_time_eq, token_digest, TokenVault};
pub use error::AuthError;
pub use gate::{Principal, RevocationGate, RouteAccess};
pub use lockout::{LockState, LockoutPolicy};
pub use password::{Argon2SecretHasher, SecretHasher};
pub use rotation::RefreshRotation;
pub use service::AuthService;
pub use token::{Claims, TokenCodec, TokenError};
