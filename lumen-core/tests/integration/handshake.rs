use crate::fixtures::{self, ACCOUNT, ANCHOR};
use lumen_core::application::{AuthHandshakeClient, WalletSession};
use lumen_core::foundation::{AccountId, AnchorDomain};
use lumen_core::infrastructure::anchor::{AnchorApi, MockAnchorApi};
use lumen_core::infrastructure::extension::{MockExtension, SignBehavior};
use lumen_core::infrastructure::store::MemorySessionStore;
use lumen_core::AnchorError;
use std::sync::Arc;

fn handshake_client(api: &Arc<MockAnchorApi>) -> AuthHandshakeClient {
    AuthHandshakeClient::new(api.clone() as Arc<dyn AnchorApi>)
}

#[tokio::test]
async fn test_handshake_happy_path_issues_challenge_then_token() {
    let (session, extension, _store) = fixtures::connected_session().await;
    let api = Arc::new(MockAnchorApi::new());

    let token = handshake_client(&api).authenticate(&session, &AnchorDomain::from(ANCHOR)).await.expect("handshake");

    assert_eq!(token.token, "mock-jwt");
    assert_eq!(token.issuing_anchor_domain, AnchorDomain::from(ANCHOR));
    assert_eq!(token.issued_for_address, AccountId::from(ACCOUNT));
    assert!(token.ensure_scope(&AnchorDomain::from(ANCHOR), &AccountId::from(ACCOUNT)).is_ok());
    assert_eq!(api.call_log(), vec!["challenge", "token"]);
    assert_eq!(extension.sign_calls(), 1);
}

#[tokio::test]
async fn test_handshake_when_session_manual_then_wallet_not_ready_and_no_network_calls() {
    let extension = Arc::new(MockExtension::granting(ACCOUNT));
    let store = Arc::new(MemorySessionStore::new());
    let session = WalletSession::new(extension.clone(), store);
    session.set_manual_keys("GMANUAL", None).expect("manual entry");
    let api = Arc::new(MockAnchorApi::new());

    let err = handshake_client(&api).authenticate(&session, &AnchorDomain::from(ANCHOR)).await.unwrap_err();

    assert!(matches!(err, AnchorError::WalletNotReady));
    assert!(api.call_log().is_empty());
    assert_eq!(extension.sign_calls(), 0);
}

#[tokio::test]
async fn test_handshake_when_session_disconnected_then_wallet_not_ready() {
    let extension = Arc::new(MockExtension::granting(ACCOUNT));
    let session = WalletSession::new(extension, Arc::new(MemorySessionStore::new()));
    let api = Arc::new(MockAnchorApi::new());

    let err = handshake_client(&api).authenticate(&session, &AnchorDomain::from(ANCHOR)).await.unwrap_err();
    assert!(matches!(err, AnchorError::WalletNotReady));
    assert!(api.call_log().is_empty());
}

#[tokio::test]
async fn test_handshake_when_challenge_fails_then_challenge_unavailable_and_no_sign() {
    let (session, extension, _store) = fixtures::connected_session().await;
    let api = Arc::new(MockAnchorApi::new());
    api.set_fail_challenge(true);

    let err = handshake_client(&api).authenticate(&session, &AnchorDomain::from(ANCHOR)).await.unwrap_err();

    assert!(matches!(err, AnchorError::ChallengeUnavailable { .. }));
    assert_eq!(api.call_log(), vec!["challenge"]);
    assert_eq!(extension.sign_calls(), 0);
}

#[tokio::test]
async fn test_handshake_when_user_declines_then_cancelled_and_no_submit() {
    let (session, extension, _store) = fixtures::connected_session().await;
    extension.set_sign_behavior(SignBehavior::Cancel);
    let api = Arc::new(MockAnchorApi::new());

    let err = handshake_client(&api).authenticate(&session, &AnchorDomain::from(ANCHOR)).await.unwrap_err();

    assert!(matches!(err, AnchorError::UserCancelled));
    // The stale challenge is not resubmitted or retried.
    assert_eq!(api.call_log(), vec!["challenge"]);
}

#[tokio::test]
async fn test_handshake_when_anchor_rejects_then_auth_rejected_without_retry() {
    let (session, _extension, _store) = fixtures::connected_session().await;
    let api = Arc::new(MockAnchorApi::new());
    api.set_reject_auth(true);

    let err = handshake_client(&api).authenticate(&session, &AnchorDomain::from(ANCHOR)).await.unwrap_err();

    assert!(matches!(err, AnchorError::AuthRejected { .. }));
    assert_eq!(api.call_log(), vec!["challenge", "token"]);
}
