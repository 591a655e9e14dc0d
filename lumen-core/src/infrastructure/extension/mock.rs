use super::WalletExtension;
use crate::foundation::{AnchorError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// Scripted behavior for [`MockExtension::sign`].
#[derive(Clone, Debug, Default)]
pub enum SignBehavior {
    /// Return the envelope with a mock signature suffix appended.
    #[default]
    Sign,
    /// Simulate the user declining the signing prompt.
    Cancel,
    /// Simulate an arbitrary extension failure.
    Fail(String),
}

/// In-memory stand-in for the signing extension, scriptable per test.
pub struct MockExtension {
    installed: AtomicBool,
    authorized: AtomicBool,
    grant_address: Mutex<Option<String>>,
    sign_behavior: Mutex<SignBehavior>,
    probe_calls: AtomicU64,
    access_calls: AtomicU64,
    sign_calls: AtomicU64,
}

impl MockExtension {
    pub fn new() -> Self {
        Self {
            installed: AtomicBool::new(true),
            authorized: AtomicBool::new(false),
            grant_address: Mutex::new(None),
            sign_behavior: Mutex::new(SignBehavior::Sign),
            probe_calls: AtomicU64::new(0),
            access_calls: AtomicU64::new(0),
            sign_calls: AtomicU64::new(0),
        }
    }

    /// Extension installed and ready to grant `address` on request.
    pub fn granting(address: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.set_grant_address(Some(address.into()));
        mock
    }

    pub fn set_installed(&self, installed: bool) {
        self.installed.store(installed, Ordering::Relaxed);
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::Relaxed);
    }

    pub fn set_grant_address(&self, address: Option<String>) {
        if let Ok(mut guard) = self.grant_address.lock() {
            *guard = address;
        }
    }

    pub fn set_sign_behavior(&self, behavior: SignBehavior) {
        if let Ok(mut guard) = self.sign_behavior.lock() {
            *guard = behavior;
        }
    }

    pub fn probe_calls(&self) -> u64 {
        self.probe_calls.load(Ordering::Relaxed)
    }

    pub fn access_calls(&self) -> u64 {
        self.access_calls.load(Ordering::Relaxed)
    }

    pub fn sign_calls(&self) -> u64 {
        self.sign_calls.load(Ordering::Relaxed)
    }
}

impl Default for MockExtension {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletExtension for MockExtension {
    async fn probe(&self) -> bool {
        self.probe_calls.fetch_add(1, Ordering::Relaxed);
        self.installed.load(Ordering::Relaxed)
    }

    async fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::Relaxed)
    }

    async fn request_access(&self) -> Result<String> {
        self.access_calls.fetch_add(1, Ordering::Relaxed);
        if !self.installed.load(Ordering::Relaxed) {
            return Err(AnchorError::CapabilityUnavailable);
        }
        let granted = self.grant_address.lock().map(|guard| guard.clone()).unwrap_or(None);
        match granted {
            Some(address) => Ok(address),
            None => Err(AnchorError::AccessDenied("user rejected the access request".to_string())),
        }
    }

    async fn sign(&self, envelope: &str, _network_passphrase: &str, address: &str) -> Result<String> {
        self.sign_calls.fetch_add(1, Ordering::Relaxed);
        let behavior = self.sign_behavior.lock().map(|guard| guard.clone()).unwrap_or_default();
        match behavior {
            SignBehavior::Sign => Ok(format!("{envelope}+sig:{address}")),
            SignBehavior::Cancel => Err(AnchorError::UserCancelled),
            SignBehavior::Fail(details) => Err(AnchorError::SigningFailed(details)),
        }
    }
}
