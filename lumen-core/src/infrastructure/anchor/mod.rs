use crate::domain::auth::AuthToken;
use crate::foundation::{AccountId, AnchorDomain, FlowId, Result};
use async_trait::async_trait;

pub mod http;
pub mod mock;
pub mod wire;

pub use http::HttpAnchorApi;
pub use mock::{MockAnchorApi, MockTrustlineOracle};

/// Challenge material returned by the auth-challenge collaborator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChallengeBundle {
    /// Opaque signed-transaction envelope; never interpreted by this engine.
    pub envelope: String,
    pub network_passphrase: String,
    pub auth_endpoint: String,
}

/// Accepted deposit initiation: the anchor-issued flow id plus the hosted
/// interactive page.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositInitiation {
    pub id: FlowId,
    pub interactive_url: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitiateDepositParams {
    pub asset_code: String,
    /// Omitted from the request body when native.
    pub asset_issuer: Option<String>,
    pub amount: String,
    pub account: AccountId,
}

/// The anchor-facing collaborator surface: challenge/response authentication,
/// deposit initiation, and flow status lookups.
#[async_trait]
pub trait AnchorApi: Send + Sync {
    async fn request_challenge(&self, anchor_domain: &AnchorDomain, account: &AccountId) -> Result<ChallengeBundle>;

    /// Posts the signed challenge; returns the bearer token string.
    ///
    /// Fails with `AuthRejected` when the anchor rejects the signature or the
    /// challenge (expired, wrong signer, tampered).
    async fn submit_auth_response(
        &self,
        signed_envelope: &str,
        auth_endpoint: &str,
        anchor_domain: &AnchorDomain,
        account: &AccountId,
    ) -> Result<String>;

    async fn initiate_deposit(
        &self,
        anchor_domain: &AnchorDomain,
        token: &AuthToken,
        params: &InitiateDepositParams,
    ) -> Result<DepositInitiation>;

    async fn flow_status(&self, anchor_domain: &AnchorDomain, token: &AuthToken, id: &FlowId) -> Result<String>;
}

/// Advisory-only ledger lookup: which of `asset_keys` the account cannot yet
/// receive. A failure here never blocks a flow.
#[async_trait]
pub trait TrustlineOracle: Send + Sync {
    async fn missing_trustlines(&self, account: &AccountId, asset_keys: &[String]) -> Result<Vec<String>>;
}
