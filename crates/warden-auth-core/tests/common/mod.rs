//! Shared test fixtures: mock repositories, a manual clock, and a plain
//! hasher that counts verifications.
//!
//! Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

pub mod mock_repos;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use warden_auth_core::{AuthConfig, AuthError, AuthService, Clock, SecretHasher};
use warden_types::{RoleName, SignUpRequest};

pub use mock_repos::*;

/// Clock that only moves when a test advances it
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> Arc<Self> {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Arc::new(Self(Mutex::new(start)))
    }

    pub fn advance(&self, delta: ChronoDuration) {
        let mut now = self.0.lock().unwrap();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Transparent hasher that records how often verification runs.
///
/// Lets lockout tests assert that a locked account never reaches the
/// credential check, without paying for argon2 in every test.
#[derive(Default)]
pub struct PlainHasher {
    verify_calls: AtomicUsize,
}

impl PlainHasher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

impl SecretHasher for PlainHasher {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{plaintext}"))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, AuthError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        Ok(digest == format!("plain:{plaintext}"))
    }
}

/// Everything an integration test needs, wired over the mocks
pub struct TestHarness {
    pub accounts: Arc<MockAccountRepository>,
    pub sessions: Arc<MockSessionRepository>,
    pub roles: Arc<MockRoleRepository>,
    pub denylist: Arc<MockDenylistRepository>,
    pub clock: Arc<ManualClock>,
    pub hasher: Arc<PlainHasher>,
    pub service: AuthService<MockAccountRepository, MockSessionRepository, MockRoleRepository>,
}

pub fn test_config() -> AuthConfig {
    AuthConfig::try_new(
        STANDARD.encode(b"integration-test-signing-secret"),
        STANDARD.encode([11u8; 32]),
    )
    .unwrap()
}

pub fn harness() -> TestHarness {
    harness_with_config(test_config())
}

pub fn harness_with_config(config: AuthConfig) -> TestHarness {
    let accounts = MockAccountRepository::new();
    let sessions = MockSessionRepository::new();
    let roles = MockRoleRepository::new();
    let denylist = MockDenylistRepository::new();
    let clock = ManualClock::new();
    let hasher = PlainHasher::new();

    let service = AuthService::new(
        &config,
        Arc::clone(&accounts),
        Arc::clone(&sessions),
        Arc::clone(&roles),
        Arc::clone(&hasher) as Arc<dyn SecretHasher>,
        Arc::clone(&clock) as Arc<dyn Clock>,
    );

    TestHarness {
        accounts,
        sessions,
        roles,
        denylist,
        clock,
        hasher,
        service,
    }
}

/// A sign-up request for the seeded "user" role
pub fn sign_up_request(username: &str, email: &str, password: &str) -> SignUpRequest {
    SignUpRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        first_name: "Test".to_string(),
        last_name: "Account".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
        role: RoleName::User,
    }
}

impl TestHarness {
    /// Register an account through the real sign-up path
    pub async fn seed_account(&self, username: &str, email: &str, password: &str) {
        self.service
            .sign_up(&sign_up_request(username, email, password))
            .await
            .expect("seeding account");
    }
}
