use crate::fixtures::{self, ACCOUNT};
use lumen_core::application::WalletSession;
use lumen_core::domain::wallet::{ConnectionState, SessionMode, SessionRecord};
use lumen_core::infrastructure::extension::{MockExtension, SignBehavior};
use lumen_core::infrastructure::store::{MemorySessionStore, SessionStore};
use lumen_core::AnchorError;
use std::sync::Arc;
use std::time::Duration;

fn fresh_session(extension: Arc<MockExtension>, store: Arc<MemorySessionStore>) -> WalletSession {
    WalletSession::new(extension, store)
}

fn assert_address_invariant(session: &WalletSession) {
    let snapshot = session.snapshot();
    let has_address = !snapshot.address.is_empty();
    let expects_address = matches!(snapshot.connection, ConnectionState::Connected | ConnectionState::ManualEntry);
    assert_eq!(has_address, expects_address, "address invariant violated in state {:?}", snapshot.connection);
}

#[tokio::test]
async fn test_connect_when_extension_grants_then_connected_and_persisted() {
    let extension = Arc::new(MockExtension::granting(ACCOUNT));
    let store = Arc::new(MemorySessionStore::new());
    let session = fresh_session(extension, store.clone());

    let address = session.connect().await.expect("connect");
    assert_eq!(address, ACCOUNT);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.connection, ConnectionState::Connected);
    assert_eq!(snapshot.mode, SessionMode::Managed);
    assert_eq!(snapshot.address, ACCOUNT);
    assert_address_invariant(&session);

    let record = store.load().expect("load").expect("record");
    assert_eq!(record, SessionRecord { mode: SessionMode::Managed, address: ACCOUNT.to_string() });
}

#[tokio::test]
async fn test_connect_when_extension_missing_then_capability_unavailable() {
    let extension = Arc::new(MockExtension::new());
    extension.set_installed(false);
    let session = fresh_session(extension, Arc::new(MemorySessionStore::new()));

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, AnchorError::CapabilityUnavailable));
    assert_eq!(session.snapshot().connection, ConnectionState::Disconnected);
    assert!(session.last_error().is_some());
    assert_address_invariant(&session);
}

#[tokio::test]
async fn test_connect_when_user_rejects_then_access_denied_and_reverted() {
    let extension = Arc::new(MockExtension::new());
    let session = fresh_session(extension, Arc::new(MemorySessionStore::new()));

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, AnchorError::AccessDenied(_)));
    assert_eq!(session.snapshot().connection, ConnectionState::Disconnected);
    assert_address_invariant(&session);
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let (session, _extension, store) = fixtures::connected_session().await;

    session.disconnect();
    session.disconnect();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.connection, ConnectionState::Disconnected);
    assert_eq!(snapshot.mode, SessionMode::None);
    assert_eq!(snapshot.address, "");
    assert_eq!(store.load().expect("load"), None);
    assert_address_invariant(&session);
}

#[tokio::test]
async fn test_manual_entry_holds_address_but_cannot_sign() {
    let extension = Arc::new(MockExtension::granting(ACCOUNT));
    let store = Arc::new(MemorySessionStore::new());
    let session = fresh_session(extension.clone(), store.clone());

    session.set_manual_keys("GMANUAL", Some("SSECRETNEVERSTORED")).expect("manual entry");
    let snapshot = session.snapshot();
    assert_eq!(snapshot.connection, ConnectionState::ManualEntry);
    assert_eq!(snapshot.mode, SessionMode::Manual);
    assert_eq!(snapshot.address, "GMANUAL");
    assert_address_invariant(&session);

    let record = store.load().expect("load").expect("record");
    assert_eq!(record.mode, SessionMode::Manual);

    let err = session.sign("AAAAenvelope", "passphrase", "GMANUAL").await.unwrap_err();
    assert!(matches!(err, AnchorError::UnsupportedMode { .. }));
    assert_eq!(extension.sign_calls(), 0);
}

#[tokio::test]
async fn test_manual_entry_then_connect_clears_manual_state() {
    let extension = Arc::new(MockExtension::granting(ACCOUNT));
    let store = Arc::new(MemorySessionStore::new());
    let session = fresh_session(extension, store.clone());

    session.set_manual_keys("GMANUAL", None).expect("manual entry");
    let address = session.connect().await.expect("connect");
    assert_eq!(address, ACCOUNT);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.connection, ConnectionState::Connected);
    assert_eq!(snapshot.mode, SessionMode::Managed);
    assert_eq!(snapshot.address, ACCOUNT);
    assert_address_invariant(&session);

    let record = store.load().expect("load").expect("record");
    assert_eq!(record, SessionRecord { mode: SessionMode::Managed, address: ACCOUNT.to_string() });
}

#[tokio::test]
async fn test_failed_mode_switch_clears_stale_manual_record() {
    let extension = Arc::new(MockExtension::new());
    let store = Arc::new(MemorySessionStore::new());
    let session = fresh_session(extension, store.clone());

    session.set_manual_keys("GMANUAL", None).expect("manual entry");
    // Connect prompt is rejected: the manual session is gone and its record
    // must not linger.
    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, AnchorError::AccessDenied(_)));
    assert_eq!(session.snapshot().connection, ConnectionState::Disconnected);
    assert_eq!(store.load().expect("load"), None);
    assert_address_invariant(&session);
}

#[tokio::test]
async fn test_failed_connect_keeps_persisted_managed_record() {
    let extension = Arc::new(MockExtension::new());
    let store = Arc::new(MemorySessionStore::with_record(SessionRecord { mode: SessionMode::Managed, address: ACCOUNT.to_string() }));
    let session = fresh_session(extension, store.clone());

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, AnchorError::AccessDenied(_)));
    // The record survives for a later silent reconnect.
    assert!(store.load().expect("load").is_some());
}

#[tokio::test]
async fn test_silent_reconnect_when_preauthorized_then_connected_without_prompt() {
    let extension = Arc::new(MockExtension::granting(ACCOUNT));
    extension.set_authorized(true);
    let store = Arc::new(MemorySessionStore::with_record(SessionRecord { mode: SessionMode::Managed, address: ACCOUNT.to_string() }));
    let session = fresh_session(extension, store);

    session.silent_reconnect(None).await;
    let snapshot = session.snapshot();
    assert_eq!(snapshot.connection, ConnectionState::Connected);
    assert_eq!(snapshot.address, ACCOUNT);
    assert_address_invariant(&session);
}

#[tokio::test]
async fn test_silent_reconnect_when_not_preauthorized_then_stays_disconnected() {
    let extension = Arc::new(MockExtension::granting(ACCOUNT));
    let store = Arc::new(MemorySessionStore::with_record(SessionRecord { mode: SessionMode::Managed, address: ACCOUNT.to_string() }));
    let session = fresh_session(extension.clone(), store);

    session.silent_reconnect(None).await;
    assert_eq!(session.snapshot().connection, ConnectionState::Disconnected);
    // No prompt was issued either.
    assert_eq!(extension.access_calls(), 0);
    assert_address_invariant(&session);
}

#[tokio::test]
async fn test_silent_reconnect_when_no_record_then_stays_disconnected() {
    let extension = Arc::new(MockExtension::granting(ACCOUNT));
    extension.set_authorized(true);
    let session = fresh_session(extension, Arc::new(MemorySessionStore::new()));

    session.silent_reconnect(None).await;
    assert_eq!(session.snapshot().connection, ConnectionState::Disconnected);
    assert_address_invariant(&session);
}

#[tokio::test]
async fn test_silent_reconnect_when_address_mismatch_then_stays_disconnected() {
    let extension = Arc::new(MockExtension::granting("GOTHERACCOUNT"));
    extension.set_authorized(true);
    let store = Arc::new(MemorySessionStore::with_record(SessionRecord { mode: SessionMode::Managed, address: ACCOUNT.to_string() }));
    let session = fresh_session(extension, store);

    session.silent_reconnect(Some(ACCOUNT)).await;
    assert_eq!(session.snapshot().connection, ConnectionState::Disconnected);
    assert_address_invariant(&session);
}

#[tokio::test]
async fn test_restore_on_startup_retries_probe_after_grace() {
    let extension = Arc::new(MockExtension::granting(ACCOUNT));
    extension.set_installed(false);
    extension.set_authorized(true);
    let store = Arc::new(MemorySessionStore::with_record(SessionRecord { mode: SessionMode::Managed, address: ACCOUNT.to_string() }));
    let session = Arc::new(fresh_session(extension.clone(), store));

    let startup = {
        let session = session.clone();
        tokio::spawn(async move { session.restore_on_startup(None, Duration::from_millis(50)).await })
    };
    // The extension finishes initializing during the grace window.
    tokio::time::sleep(Duration::from_millis(10)).await;
    extension.set_installed(true);
    startup.await.expect("startup task");

    assert_eq!(session.snapshot().connection, ConnectionState::Connected);
    assert!(extension.probe_calls() >= 2);
}

#[tokio::test]
async fn test_sign_when_user_cancels_then_user_cancelled() {
    let (session, extension, _store) = fixtures::connected_session().await;
    extension.set_sign_behavior(SignBehavior::Cancel);

    let err = session.sign("AAAAenvelope", "passphrase", ACCOUNT).await.unwrap_err();
    assert!(matches!(err, AnchorError::UserCancelled));
    // The session itself is untouched by a declined prompt.
    assert_eq!(session.snapshot().connection, ConnectionState::Connected);
}

#[tokio::test]
async fn test_sign_when_extension_fails_then_signing_failed() {
    let (session, extension, _store) = fixtures::connected_session().await;
    extension.set_sign_behavior(SignBehavior::Fail("internal extension error".to_string()));

    let err = session.sign("AAAAenvelope", "passphrase", ACCOUNT).await.unwrap_err();
    assert!(matches!(err, AnchorError::SigningFailed(_)));
}
