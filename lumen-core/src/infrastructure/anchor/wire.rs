//! Request/response bodies for the anchor collaborators, including the
//! shape normalization for fields that upstream services return either as a
//! bare string or as a structured object depending on version. Normalization
//! happens here, once, so the core logic only ever sees plain strings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequestBody<'a> {
    pub anchor_domain: &'a str,
    pub user_public_key: &'a str,
}

/// `challengeXdr` has shipped both as `"AAAA..."` and as
/// `{"transaction": "AAAA..."}` across anchor-service versions.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChallengeXdrField {
    Plain(String),
    Wrapped { transaction: String },
}

impl ChallengeXdrField {
    pub fn into_inner(self) -> String {
        match self {
            Self::Plain(value) => value,
            Self::Wrapped { transaction } => transaction,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponseBody {
    pub challenge_xdr: ChallengeXdrField,
    pub network_passphrase: String,
    pub auth_endpoint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSubmitRequestBody<'a> {
    pub signed_xdr: &'a str,
    pub auth_endpoint: &'a str,
    pub anchor_domain: &'a str,
    pub user_public_key: &'a str,
}

/// The token response has shipped both as `"ey..."` and as `{"token": "ey..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenField {
    Plain(String),
    Wrapped { token: String },
}

impl TokenField {
    pub fn into_inner(self) -> String {
        match self {
            Self::Plain(value) => value,
            Self::Wrapped { token } => token,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateRequestBody<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub anchor_domain: &'a str,
    pub auth_token: &'a str,
    pub request: InitiateRequestInner<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateRequestInner<'a> {
    pub asset_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<&'a str>,
    pub amount: &'a str,
    pub account: &'a str,
}

/// `url` has shipped both as `"https://..."` and as `{"url": "https://..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UrlField {
    Plain(String),
    Wrapped { url: String },
}

impl UrlField {
    pub fn into_inner(self) -> String {
        match self {
            Self::Plain(value) => value,
            Self::Wrapped { url } => url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateResponseBody {
    pub id: String,
    #[serde(default)]
    pub url: Option<UrlField>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequestBody<'a> {
    pub id: &'a str,
    pub anchor_domain: &'a str,
    pub auth_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponseBody {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustlineRequestBody<'a> {
    pub user_public_key: &'a str,
    pub asset_keys: &'a [String],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustlineResponseBody {
    #[serde(default)]
    pub missing_trustlines: Vec<String>,
}
