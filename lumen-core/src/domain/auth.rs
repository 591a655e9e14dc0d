use crate::foundation::{AccountId, AnchorDomain, AnchorError, Result};

/// Bearer credential from a completed handshake.
///
/// Held in memory only for the lifetime of the flows it authorizes; never
/// persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthToken {
    pub token: String,
    pub issuing_anchor_domain: AnchorDomain,
    pub issued_for_address: AccountId,
}

impl AuthToken {
    pub fn new(token: impl Into<String>, anchor_domain: AnchorDomain, account: AccountId) -> Self {
        Self { token: token.into(), issuing_anchor_domain: anchor_domain, issued_for_address: account }
    }

    /// A token authorizes exactly one (anchor domain, address) pair. Every
    /// consumption site checks the scope before sending the token anywhere.
    pub fn ensure_scope(&self, anchor_domain: &AnchorDomain, account: &AccountId) -> Result<()> {
        if &self.issuing_anchor_domain == anchor_domain && &self.issued_for_address == account {
            return Ok(());
        }
        Err(AnchorError::TokenScopeMismatch {
            token_scope: format!("{}/{}", self.issuing_anchor_domain, self.issued_for_address),
            requested_scope: format!("{anchor_domain}/{account}"),
        })
    }
}
