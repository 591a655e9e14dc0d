use super::{AnchorApi, ChallengeBundle, DepositInitiation, InitiateDepositParams, TrustlineOracle};
use crate::domain::auth::AuthToken;
use crate::foundation::{AccountId, AnchorDomain, AnchorError, FlowId, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Scriptable stand-in for the anchor collaborators.
///
/// Records every call in order so tests can assert exact network-call
/// sequences, and exposes failure toggles per endpoint.
pub struct MockAnchorApi {
    calls: Mutex<Vec<&'static str>>,
    fail_challenge: AtomicBool,
    reject_auth: AtomicBool,
    fail_initiate: AtomicBool,
    fail_status: AtomicBool,
    challenge: Mutex<ChallengeBundle>,
    token: Mutex<String>,
    initiation: Mutex<DepositInitiation>,
    last_initiate_params: Mutex<Option<InitiateDepositParams>>,
    status_script: Mutex<VecDeque<String>>,
    last_status: Mutex<String>,
}

impl MockAnchorApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_challenge: AtomicBool::new(false),
            reject_auth: AtomicBool::new(false),
            fail_initiate: AtomicBool::new(false),
            fail_status: AtomicBool::new(false),
            challenge: Mutex::new(ChallengeBundle {
                envelope: "AAAAchallenge-envelope".to_string(),
                network_passphrase: "Test SDF Network ; September 2015".to_string(),
                auth_endpoint: "https://testanchor.stellar.org/auth".to_string(),
            }),
            token: Mutex::new("mock-jwt".to_string()),
            initiation: Mutex::new(DepositInitiation {
                id: FlowId::from("flow-1"),
                interactive_url: "https://testanchor.stellar.org/interactive/flow-1".to_string(),
            }),
            last_initiate_params: Mutex::new(None),
            status_script: Mutex::new(VecDeque::new()),
            last_status: Mutex::new(crate::foundation::constants::INITIAL_DEPOSIT_STATUS.to_string()),
        }
    }

    fn record(&self, call: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    /// Ordered endpoint names: `challenge`, `token`, `initiate`, `status`, `trustlines`.
    pub fn call_log(&self) -> Vec<&'static str> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn status_calls(&self) -> usize {
        self.call_log().iter().filter(|name| **name == "status").count()
    }

    pub fn set_fail_challenge(&self, fail: bool) {
        self.fail_challenge.store(fail, Ordering::Relaxed);
    }

    pub fn set_reject_auth(&self, reject: bool) {
        self.reject_auth.store(reject, Ordering::Relaxed);
    }

    pub fn set_fail_initiate(&self, fail: bool) {
        self.fail_initiate.store(fail, Ordering::Relaxed);
    }

    /// While set, every status poll fails transport-side.
    pub fn set_fail_status(&self, fail: bool) {
        self.fail_status.store(fail, Ordering::Relaxed);
    }

    pub fn set_interactive_url(&self, url: impl Into<String>) {
        if let Ok(mut initiation) = self.initiation.lock() {
            initiation.interactive_url = url.into();
        }
    }

    pub fn set_flow_id(&self, id: impl Into<String>) {
        if let Ok(mut initiation) = self.initiation.lock() {
            initiation.id = FlowId::from(id.into());
        }
    }

    /// Statuses returned by successive polls; the last one repeats once the
    /// script runs dry.
    pub fn push_status(&self, status: impl Into<String>) {
        if let Ok(mut script) = self.status_script.lock() {
            script.push_back(status.into());
        }
    }

    pub fn last_initiate_params(&self) -> Option<InitiateDepositParams> {
        self.last_initiate_params.lock().map(|guard| guard.clone()).unwrap_or(None)
    }
}

impl Default for MockAnchorApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnchorApi for MockAnchorApi {
    async fn request_challenge(&self, anchor_domain: &AnchorDomain, _account: &AccountId) -> Result<ChallengeBundle> {
        self.record("challenge");
        if self.fail_challenge.load(Ordering::Relaxed) {
            return Err(AnchorError::NetworkError("challenge endpoint unreachable".to_string()));
        }
        let _ = anchor_domain;
        self.challenge
            .lock()
            .map(|bundle| bundle.clone())
            .map_err(|_| AnchorError::Message("mock challenge lock poisoned".to_string()))
    }

    async fn submit_auth_response(
        &self,
        _signed_envelope: &str,
        _auth_endpoint: &str,
        anchor_domain: &AnchorDomain,
        _account: &AccountId,
    ) -> Result<String> {
        self.record("token");
        if self.reject_auth.load(Ordering::Relaxed) {
            return Err(AnchorError::auth_rejected(anchor_domain.as_str(), "challenge signature rejected"));
        }
        self.token.lock().map(|token| token.clone()).map_err(|_| AnchorError::Message("mock token lock poisoned".to_string()))
    }

    async fn initiate_deposit(
        &self,
        anchor_domain: &AnchorDomain,
        token: &AuthToken,
        params: &InitiateDepositParams,
    ) -> Result<DepositInitiation> {
        self.record("initiate");
        token.ensure_scope(anchor_domain, &params.account)?;
        if self.fail_initiate.load(Ordering::Relaxed) {
            return Err(AnchorError::NetworkError("deposit endpoint returned 502".to_string()));
        }
        if let Ok(mut last) = self.last_initiate_params.lock() {
            *last = Some(params.clone());
        }
        self.initiation
            .lock()
            .map(|initiation| initiation.clone())
            .map_err(|_| AnchorError::Message("mock initiation lock poisoned".to_string()))
    }

    async fn flow_status(&self, _anchor_domain: &AnchorDomain, _token: &AuthToken, _id: &FlowId) -> Result<String> {
        self.record("status");
        if self.fail_status.load(Ordering::Relaxed) {
            return Err(AnchorError::NetworkError("status endpoint timed out".to_string()));
        }
        let next = self.status_script.lock().ok().and_then(|mut script| script.pop_front());
        let mut last = self.last_status.lock().map_err(|_| AnchorError::Message("mock status lock poisoned".to_string()))?;
        if let Some(status) = next {
            *last = status;
        }
        Ok(last.clone())
    }
}

/// Scriptable trustline oracle.
pub struct MockTrustlineOracle {
    missing: Mutex<Vec<String>>,
    fail: AtomicBool,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockTrustlineOracle {
    pub fn new() -> Self {
        Self { missing: Mutex::new(Vec::new()), fail: AtomicBool::new(false), calls: Mutex::new(Vec::new()) }
    }

    pub fn with_missing(missing: Vec<String>) -> Self {
        let oracle = Self::new();
        if let Ok(mut guard) = oracle.missing.lock() {
            *guard = missing;
        }
        oracle
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    /// Asset-key lists this oracle was queried with, in order.
    pub fn queries(&self) -> Vec<Vec<String>> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl Default for MockTrustlineOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrustlineOracle for MockTrustlineOracle {
    async fn missing_trustlines(&self, _account: &AccountId, asset_keys: &[String]) -> Result<Vec<String>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(asset_keys.to_vec());
        }
        if self.fail.load(Ordering::Relaxed) {
            return Err(AnchorError::NetworkError("trustline lookup unavailable".to_string()));
        }
        Ok(self.missing.lock().map(|missing| missing.clone()).unwrap_or_default())
    }
}
