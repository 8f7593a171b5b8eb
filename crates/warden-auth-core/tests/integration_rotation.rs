//! Refresh rotation and revocation integration tests
//!
//! Covers the lineage guarantees: one live refresh token per session, the
//! replay purge of expired tokens, and the revoked-session signal.

mod common;

use chrono::Duration as ChronoDuration;

use common::{harness, TestHarness};
use warden_auth_core::{token_digest, AuthError};
use warden_db::{AccountRepository, SessionRepository};

const PASSWORD: &str = "hunter2-correct";

async fn signed_in(h: &TestHarness) -> warden_types::TokenPair {
    h.seed_account("alice", "alice@example.com", PASSWORD).await;
    h.service.sign_in("alice", PASSWORD).await.unwrap()
}

#[tokio::test]
async fn rotation_returns_a_different_refresh_token() {
    let h = harness();
    let pair = signed_in(&h).await;

    let rotated = h.service.refresh(&pair.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, pair.refresh_token);
    assert!(!rotated.access_token.is_empty());
}

#[tokio::test]
async fn rotation_preserves_the_lineage_id() {
    let h = harness();
    let pair = signed_in(&h).await;

    let codec = h.service.codec();
    let sid_before = codec.parse(&pair.refresh_token).unwrap().sid.unwrap();

    let rotated = h.service.refresh(&pair.refresh_token).await.unwrap();
    let sid_after = codec.parse(&rotated.refresh_token).unwrap().sid.unwrap();

    assert_eq!(sid_before, sid_after);
}

#[tokio::test]
async fn rotated_out_token_is_rejected() {
    let h = harness();
    let pair = signed_in(&h).await;

    let rotated = h.service.refresh(&pair.refresh_token).await.unwrap();

    // The predecessor is no longer the lineage's current token.
    let err = h.service.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::RefreshInvalid));

    // The successor still works, exactly once.
    let again = h.service.refresh(&rotated.refresh_token).await.unwrap();
    let err = h.service.refresh(&rotated.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::RefreshInvalid));

    // And the lineage continues from the newest token.
    h.service.refresh(&again.refresh_token).await.unwrap();
}

#[tokio::test]
async fn rotation_updates_the_stored_digest() {
    let h = harness();
    let pair = signed_in(&h).await;

    let rotated = h.service.refresh(&pair.refresh_token).await.unwrap();

    assert!(h
        .sessions
        .find_by_token_digest(&token_digest(&pair.refresh_token))
        .await
        .unwrap()
        .is_none());
    assert!(h
        .sessions
        .find_by_token_digest(&token_digest(&rotated.refresh_token))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn malformed_refresh_token_is_rejected() {
    let h = harness();
    signed_in(&h).await;

    for garbage in ["", "nonsense", "a.b.c", "   "] {
        let err = h.service.refresh(garbage).await.unwrap_err();
        assert!(matches!(err, AuthError::RefreshInvalid));
    }
}

#[tokio::test]
async fn access_token_is_not_a_refresh_token() {
    let h = harness();
    let pair = signed_in(&h).await;

    // Well-formed and signed, but carries no session lineage.
    let err = h.service.refresh(&pair.access_token).await.unwrap_err();
    assert!(matches!(err, AuthError::RefreshInvalid));
}

#[tokio::test]
async fn expired_refresh_token_purges_the_session() {
    let h = harness();
    let pair = signed_in(&h).await;

    let codec = h.service.codec();
    let sid = codec.parse(&pair.refresh_token).unwrap().sid.unwrap();

    // Past the 7-day refresh lifetime.
    h.clock.advance(ChronoDuration::days(8));

    let err = h.service.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::RefreshInvalid));
    assert!(h.sessions.find_by_id(sid.0).await.unwrap().is_none());

    // Second presentation: same rejection, nothing left to delete.
    let err = h.service.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::RefreshInvalid));
}

#[tokio::test]
async fn sign_out_terminates_the_lineage() {
    let h = harness();
    let pair = signed_in(&h).await;

    h.service.sign_out(&pair.refresh_token).await.unwrap();

    // Session found but revoked: distinct from a missing or expired one.
    let err = h.service.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::BadCredentials));
}

#[tokio::test]
async fn sign_out_with_garbage_token_is_refresh_invalid() {
    let h = harness();
    signed_in(&h).await;

    let err = h.service.sign_out("not-a-token").await.unwrap_err();
    assert!(matches!(err, AuthError::RefreshInvalid));
}

#[tokio::test]
async fn sign_out_all_revokes_every_session() {
    let h = harness();
    h.seed_account("alice", "alice@example.com", PASSWORD).await;

    // Three devices: sign-up plus two sign-ins, each its own lineage.
    let first = h.service.sign_in("alice", PASSWORD).await.unwrap();
    let second = h.service.sign_in("alice", PASSWORD).await.unwrap();

    let count = h.service.sign_out_all(&second.refresh_token).await.unwrap();
    assert_eq!(count, 3);

    for token in [&first.refresh_token, &second.refresh_token] {
        let err = h.service.refresh(token).await.unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));
    }
}

#[tokio::test]
async fn sign_out_all_for_unknown_subject_is_account_not_found() {
    let h = harness();
    let pair = signed_in(&h).await;

    let account = h.accounts.find_by_username("alice").await.unwrap().unwrap();
    h.accounts.delete(account.id).await.unwrap();

    let err = h
        .service
        .sign_out_all(&pair.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AccountNotFound));
}

#[tokio::test]
async fn rotation_of_unknown_lineage_is_rejected() {
    let h = harness();
    let pair = signed_in(&h).await;

    let codec = h.service.codec();
    let sid = codec.parse(&pair.refresh_token).unwrap().sid.unwrap();
    h.sessions.delete(sid.0).await.unwrap();

    let err = h.service.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::RefreshInvalid));
}

#[tokio::test]
async fn rotation_for_a_deleted_account_is_account_not_found() {
    let h = harness();
    let pair = signed_in(&h).await;

    let account = h.accounts.find_by_username("alice").await.unwrap().unwrap();
    h.accounts.delete(account.id).await.unwrap();

    let err = h.service.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountNotFound));
}
