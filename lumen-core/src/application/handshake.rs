use crate::application::session::WalletSession;
use crate::domain::auth::AuthToken;
use crate::foundation::{AnchorDomain, AnchorError, Result};
use crate::infrastructure::anchor::AnchorApi;
use log::{debug, info};
use std::sync::Arc;

/// Challenge/response login against an anchor-chosen auth endpoint.
///
/// Three strictly sequential steps: fetch the challenge envelope, have the
/// session's extension sign it, post the signed envelope back for a bearer
/// token. A failed step is reported to the caller for a fresh attempt: a
/// stale challenge cannot be re-signed usefully, so nothing here retries
/// across step boundaries.
pub struct AuthHandshakeClient {
    api: Arc<dyn AnchorApi>,
}

impl AuthHandshakeClient {
    pub fn new(api: Arc<dyn AnchorApi>) -> Self {
        Self { api }
    }

    pub async fn authenticate(&self, session: &WalletSession, anchor_domain: &AnchorDomain) -> Result<AuthToken> {
        // Precondition first: an unready session must cost zero network calls.
        let account = session.require_signing_identity()?;
        debug!("auth handshake started anchor_domain={} account={}", anchor_domain, account);

        let challenge = self
            .api
            .request_challenge(anchor_domain, &account)
            .await
            .map_err(|err| AnchorError::challenge_unavailable(anchor_domain.as_str(), err.to_string()))?;
        if challenge.envelope.trim().is_empty() {
            return Err(AnchorError::challenge_unavailable(anchor_domain.as_str(), "empty challenge envelope"));
        }

        let signed = session.sign(&challenge.envelope, &challenge.network_passphrase, account.as_str()).await?;

        let token = self.api.submit_auth_response(&signed, &challenge.auth_endpoint, anchor_domain, &account).await?;
        if token.trim().is_empty() {
            return Err(AnchorError::auth_rejected(anchor_domain.as_str(), "anchor returned an empty token"));
        }

        info!("auth handshake completed anchor_domain={} account={}", anchor_domain, account);
        Ok(AuthToken::new(token, anchor_domain.clone(), account))
    }
}
