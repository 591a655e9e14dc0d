use crate::domain::wallet::{address_invariant_holds, ensure_valid_transition, ConnectionState, SessionMode, SessionRecord, SessionSnapshot};
use crate::foundation::{AccountId, AnchorError, Result};
use crate::infrastructure::extension::WalletExtension;
use crate::infrastructure::store::SessionStore;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

struct SessionState {
    connection: ConnectionState,
    mode: SessionMode,
    address: String,
    last_error: Option<String>,
}

/// The user's authorization to produce signatures.
///
/// Owns the durable `{mode, address}` record and borrows the extension as an
/// injected capability; the private key never passes through here. The
/// handshake client only ever sees a read-only view plus the signing
/// delegate.
pub struct WalletSession {
    extension: Arc<dyn WalletExtension>,
    store: Arc<dyn SessionStore>,
    state: Mutex<SessionState>,
}

impl WalletSession {
    pub fn new(extension: Arc<dyn WalletExtension>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            extension,
            store,
            state: Mutex::new(SessionState {
                connection: ConnectionState::Disconnected,
                mode: SessionMode::None,
                address: String::new(),
                last_error: None,
            }),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock_state();
        SessionSnapshot {
            connection: state.connection,
            mode: state.mode,
            address: state.address.clone(),
            last_error: state.last_error.clone(),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock_state().last_error.clone()
    }

    /// Address when the session can sign (connected, extension-managed),
    /// `WalletNotReady` otherwise. Callers use this as the cheap precondition
    /// before issuing any network traffic.
    pub fn require_signing_identity(&self) -> Result<AccountId> {
        let state = self.lock_state();
        if state.connection == ConnectionState::Connected && state.mode == SessionMode::Managed {
            Ok(AccountId::from(state.address.clone()))
        } else {
            Err(AnchorError::WalletNotReady)
        }
    }

    /// Probes for a reachable signing extension. Never errors.
    pub async fn detect_capability(&self) -> bool {
        self.extension.probe().await
    }

    /// Startup path: probe, re-probe once after `grace` (the extension may
    /// still be initializing), then try a silent reconnect. Never surfaces an
    /// error.
    pub async fn restore_on_startup(&self, expected_address: Option<&str>, grace: Duration) {
        if !self.extension.probe().await {
            tokio::time::sleep(grace).await;
            if !self.extension.probe().await {
                debug!("extension not reachable after startup grace, staying disconnected");
                return;
            }
        }
        self.silent_reconnect(expected_address).await;
    }

    /// Restores a previously persisted managed session without prompting.
    /// Every failure on this path is swallowed; the session simply stays
    /// disconnected.
    pub async fn silent_reconnect(&self, expected_address: Option<&str>) {
        let record = match self.store.load() {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(err) => {
                debug!("silent reconnect skipped, session record unreadable error={}", err);
                return;
            }
        };
        if record.mode != SessionMode::Managed || record.address.is_empty() {
            return;
        }
        if let Some(expected) = expected_address {
            if expected != record.address {
                debug!("silent reconnect skipped, persisted address does not match expected");
                return;
            }
        }
        if !self.extension.probe().await {
            return;
        }
        if !self.extension.is_authorized().await {
            debug!("silent reconnect skipped, extension has no pre-approved access");
            return;
        }
        match self.extension.request_access().await {
            Ok(address) if address == record.address => {
                if self.commit_connected(&address).is_ok() {
                    info!("session silently reconnected address={}", address);
                }
            }
            Ok(address) => {
                debug!("silent reconnect skipped, extension returned a different address than persisted address={}", address);
            }
            Err(err) => {
                debug!("silent reconnect failed error={}", err);
            }
        }
    }

    /// Explicit connect: re-probes capability, requests access (may prompt),
    /// persists the managed record. On failure the session reverts to
    /// disconnected.
    pub async fn connect(&self) -> Result<String> {
        if !self.extension.probe().await {
            self.set_last_error("wallet extension unavailable");
            return Err(AnchorError::CapabilityUnavailable);
        }
        let prior = self.begin_connecting()?;
        match self.extension.request_access().await {
            Ok(address) if !address.is_empty() => {
                self.commit_connected(&address)?;
                info!("session connected mode=managed address={}", address);
                Ok(address)
            }
            Ok(_) => {
                self.fail_connect(prior, "extension returned an empty address");
                Err(AnchorError::AccessDenied("extension returned an empty address".to_string()))
            }
            Err(err) => {
                self.fail_connect(prior, &err.to_string());
                match err {
                    AnchorError::AccessDenied(_) => Err(err),
                    AnchorError::CapabilityUnavailable => Err(err),
                    other => Err(AnchorError::AccessDenied(other.to_string())),
                }
            }
        }
    }

    /// Switches to manual entry. The optional secret is accepted for parity
    /// with the entry form and deliberately dropped: no key material is ever
    /// retained, and signing stays disabled in this mode.
    pub fn set_manual_keys(&self, address: &str, _secret: Option<&str>) -> Result<()> {
        if address.trim().is_empty() {
            return Err(AnchorError::Message("manual address must not be empty".to_string()));
        }
        {
            let mut state = self.lock_state();
            if state.connection == ConnectionState::Connected {
                // Mode switch away from managed: fully clear the prior mode first.
                state.connection = ConnectionState::Disconnected;
                state.mode = SessionMode::None;
                state.address.clear();
            }
            ensure_valid_transition(state.connection, ConnectionState::ManualEntry)?;
            state.connection = ConnectionState::ManualEntry;
            state.mode = SessionMode::Manual;
            state.address = address.trim().to_string();
            state.last_error = None;
            debug_assert!(address_invariant_holds(state.connection, &state.address));
        }
        let record = SessionRecord { mode: SessionMode::Manual, address: address.trim().to_string() };
        if let Err(err) = self.store.save(&record) {
            warn!("session record not persisted error={}", err);
        }
        info!("session switched to manual entry address={}", address.trim());
        Ok(())
    }

    /// Always succeeds and is idempotent: clears in-memory and persisted
    /// state.
    pub fn disconnect(&self) {
        {
            let mut state = self.lock_state();
            state.connection = ConnectionState::Disconnected;
            state.mode = SessionMode::None;
            state.address.clear();
            state.last_error = None;
            debug_assert!(address_invariant_holds(state.connection, &state.address));
        }
        if let Err(err) = self.store.clear() {
            warn!("session record not cleared error={}", err);
        }
        info!("session disconnected");
    }

    /// Delegates envelope signing to the extension. Only valid in managed
    /// mode; the envelope is opaque to this engine.
    pub async fn sign(&self, envelope: &str, network_passphrase: &str, signer_address: &str) -> Result<String> {
        let mode = {
            let state = self.lock_state();
            if state.mode != SessionMode::Managed || state.connection != ConnectionState::Connected {
                Some(state.mode)
            } else {
                None
            }
        };
        if let Some(mode) = mode {
            return Err(AnchorError::UnsupportedMode { mode: mode.to_string() });
        }
        match self.extension.sign(envelope, network_passphrase, signer_address).await {
            Ok(signed) => Ok(signed),
            Err(AnchorError::UserCancelled) => Err(AnchorError::UserCancelled),
            Err(AnchorError::SigningFailed(details)) => Err(AnchorError::SigningFailed(details)),
            Err(other) => Err(AnchorError::SigningFailed(other.to_string())),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        // Single logical writer; a poisoned lock still holds consistent state.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin_connecting(&self) -> Result<ConnectionState> {
        let mut state = self.lock_state();
        let prior = state.connection;
        ensure_valid_transition(state.connection, ConnectionState::Connecting)?;
        state.connection = ConnectionState::Connecting;
        state.mode = SessionMode::None;
        state.address.clear();
        Ok(prior)
    }

    fn commit_connected(&self, address: &str) -> Result<()> {
        {
            let mut state = self.lock_state();
            if state.connection != ConnectionState::Connecting {
                ensure_valid_transition(state.connection, ConnectionState::Connecting)?;
            }
            state.connection = ConnectionState::Connected;
            state.mode = SessionMode::Managed;
            state.address = address.to_string();
            state.last_error = None;
            debug_assert!(address_invariant_holds(state.connection, &state.address));
        }
        let record = SessionRecord { mode: SessionMode::Managed, address: address.to_string() };
        if let Err(err) = self.store.save(&record) {
            warn!("session record not persisted error={}", err);
        }
        Ok(())
    }

    /// Failed connect: revert to disconnected. A mode switch away from
    /// manual entry already destroyed the manual session, so its persisted
    /// record goes too; a persisted managed record is kept for future
    /// silent reconnects.
    fn fail_connect(&self, prior: ConnectionState, reason: &str) {
        {
            let mut state = self.lock_state();
            state.connection = ConnectionState::Disconnected;
            state.mode = SessionMode::None;
            state.address.clear();
            state.last_error = Some(reason.to_string());
            debug_assert!(address_invariant_holds(state.connection, &state.address));
        }
        if prior == ConnectionState::ManualEntry {
            if let Err(err) = self.store.clear() {
                warn!("stale manual session record not cleared error={}", err);
            }
        }
    }

    fn set_last_error(&self, reason: &str) {
        self.lock_state().last_error = Some(reason.to_string());
    }
}
