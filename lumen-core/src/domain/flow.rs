use crate::domain::asset::DepositAsset;
use crate::domain::auth::AuthToken;
use crate::foundation::constants::TERMINAL_FLOW_STATUSES;
use crate::foundation::{AnchorDomain, FlowId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Deposit,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
        }
    }
}

/// One in-flight interactive flow, owned by the registry.
///
/// `status` is mutated only by the status poller; everything else is fixed at
/// registration.
#[derive(Clone, Debug)]
pub struct FlowRecord {
    /// Anchor-issued flow identifier; unique within the registry.
    pub id: FlowId,
    pub kind: FlowKind,
    pub asset: DepositAsset,
    pub amount: String,
    pub anchor_domain: AnchorDomain,
    pub interactive_url: String,
    pub auth_token: AuthToken,
    /// Anchor-defined status string.
    pub status: String,
    pub started_at_nanos: u64,
}

/// Statuses that stop polling. The record itself is kept for inspection.
pub fn is_terminal_status(status: &str) -> bool {
    TERMINAL_FLOW_STATUSES.contains(&status)
}

/// Result of the best-effort attempt to open the interactive page.
///
/// A blocked window is not a failure; the url stays available to the caller
/// for manual opening.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InteractiveOpen {
    pub opened: bool,
    pub url: String,
}
