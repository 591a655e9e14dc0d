use crate::foundation::Result;
use async_trait::async_trait;

pub mod mock;

pub use mock::{MockExtension, SignBehavior};

/// Capability interface to the signing extension.
///
/// Injected explicitly wherever signing or account access is needed; nothing
/// in the engine reaches for the extension as ambient state, so tests can
/// substitute [`MockExtension`].
#[async_trait]
pub trait WalletExtension: Send + Sync {
    /// Probes whether a signing-capable extension is reachable. Never errors;
    /// any probing failure reads as `false`. Safe to call repeatedly, since
    /// the extension may still be initializing shortly after startup.
    async fn probe(&self) -> bool;

    /// Whether the extension already granted this origin pre-approved access,
    /// i.e. whether `request_access` would succeed without prompting.
    async fn is_authorized(&self) -> bool;

    /// Requests account access, prompting the user when not pre-approved.
    /// Returns the public address on success.
    async fn request_access(&self) -> Result<String>;

    /// Signs an opaque transaction envelope. The envelope is never
    /// interpreted here; the extension owns the key material.
    ///
    /// Fails with `UserCancelled` when the user declines the prompt.
    async fn sign(&self, envelope: &str, network_passphrase: &str, address: &str) -> Result<String>;
}
