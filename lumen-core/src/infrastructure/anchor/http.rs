use super::wire;
use super::{AnchorApi, ChallengeBundle, DepositInitiation, InitiateDepositParams, TrustlineOracle};
use crate::domain::auth::AuthToken;
use crate::foundation::{AccountId, AnchorDomain, AnchorError, FlowId, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// HTTP client for the anchor-gateway collaborators.
///
/// `base_url` points at the gateway that proxies the per-anchor endpoints;
/// every call is a JSON POST with the request timeout from configuration.
pub struct HttpAnchorApi {
    client: Client,
    base_url: String,
}

impl HttpAnchorApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AnchorError::ConfigError(format!("http client build failed: {err}")))?;
        Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string() })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("anchor api request path={}", path);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(path, status, details));
        }
        let value = response.json::<T>().await.map_err(|err| AnchorError::SerializationError {
            format: "json".to_string(),
            details: format!("{path}: {err}"),
        })?;
        Ok(value)
    }
}

/// A 4xx on the token endpoint is the anchor refusing the signed challenge;
/// everything else stays a transport-level failure.
fn classify_http_failure(path: &str, status: StatusCode, details: String) -> AnchorError {
    if path == paths::AUTH_TOKEN && status.is_client_error() {
        return AnchorError::AuthRejected { anchor_domain: String::new(), details: format!("{status}: {details}") };
    }
    AnchorError::NetworkError(format!("{path} returned {status}: {details}"))
}

mod paths {
    pub const AUTH_CHALLENGE: &str = "api/anchor/challenge";
    pub const AUTH_TOKEN: &str = "api/anchor/token";
    pub const DEPOSIT: &str = "api/anchor/deposit";
    pub const STATUS: &str = "api/anchor/status";
    pub const TRUSTLINES: &str = "api/trustlines/check";
}

#[async_trait]
impl AnchorApi for HttpAnchorApi {
    async fn request_challenge(&self, anchor_domain: &AnchorDomain, account: &AccountId) -> Result<ChallengeBundle> {
        let body = wire::ChallengeRequestBody { anchor_domain: anchor_domain.as_str(), user_public_key: account.as_str() };
        let response: wire::ChallengeResponseBody = self.post_json(paths::AUTH_CHALLENGE, &body).await?;
        Ok(ChallengeBundle {
            envelope: response.challenge_xdr.into_inner(),
            network_passphrase: response.network_passphrase,
            auth_endpoint: response.auth_endpoint,
        })
    }

    async fn submit_auth_response(
        &self,
        signed_envelope: &str,
        auth_endpoint: &str,
        anchor_domain: &AnchorDomain,
        account: &AccountId,
    ) -> Result<String> {
        let body = wire::AuthSubmitRequestBody {
            signed_xdr: signed_envelope,
            auth_endpoint,
            anchor_domain: anchor_domain.as_str(),
            user_public_key: account.as_str(),
        };
        let token = match self.post_json::<_, wire::TokenField>(paths::AUTH_TOKEN, &body).await {
            Ok(field) => field.into_inner(),
            Err(AnchorError::AuthRejected { details, .. }) => {
                return Err(AnchorError::AuthRejected { anchor_domain: anchor_domain.to_string(), details })
            }
            Err(err) => return Err(err),
        };
        Ok(token)
    }

    async fn initiate_deposit(
        &self,
        anchor_domain: &AnchorDomain,
        token: &AuthToken,
        params: &InitiateDepositParams,
    ) -> Result<DepositInitiation> {
        token.ensure_scope(anchor_domain, &params.account)?;
        let body = wire::InitiateRequestBody {
            kind: "deposit",
            anchor_domain: anchor_domain.as_str(),
            auth_token: &token.token,
            request: wire::InitiateRequestInner {
                asset_code: &params.asset_code,
                asset_issuer: params.asset_issuer.as_deref(),
                amount: &params.amount,
                account: params.account.as_str(),
            },
        };
        let response: wire::InitiateResponseBody = self.post_json(paths::DEPOSIT, &body).await?;
        Ok(DepositInitiation {
            id: FlowId::from(response.id),
            interactive_url: response.url.map(wire::UrlField::into_inner).unwrap_or_default(),
        })
    }

    async fn flow_status(&self, anchor_domain: &AnchorDomain, token: &AuthToken, id: &FlowId) -> Result<String> {
        let body = wire::StatusRequestBody { id: id.as_str(), anchor_domain: anchor_domain.as_str(), auth_token: &token.token };
        let response: wire::StatusResponseBody = self.post_json(paths::STATUS, &body).await?;
        Ok(response.status)
    }
}

#[async_trait]
impl TrustlineOracle for HttpAnchorApi {
    async fn missing_trustlines(&self, account: &AccountId, asset_keys: &[String]) -> Result<Vec<String>> {
        let body = wire::TrustlineRequestBody { user_public_key: account.as_str(), asset_keys };
        let response: wire::TrustlineResponseBody = self.post_json(paths::TRUSTLINES, &body).await?;
        Ok(response.missing_trustlines)
    }
}
