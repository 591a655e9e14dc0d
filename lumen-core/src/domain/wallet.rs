use crate::foundation::{AnchorError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the session is authorized to produce signatures.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    #[default]
    None,
    /// Extension-managed session; the only mode that exposes a signing delegate.
    Managed,
    /// Manually entered address; signing is disabled in this mode.
    Manual,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Managed => write!(f, "managed"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Transient sub-state of `connect()` only.
    Connecting,
    Connected,
    ManualEntry,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::ManualEntry => write!(f, "manual_entry"),
        }
    }
}

const VALID_TRANSITIONS: &[(ConnectionState, ConnectionState)] = &[
    (ConnectionState::Disconnected, ConnectionState::Connecting),
    (ConnectionState::Connecting, ConnectionState::Connected),
    (ConnectionState::Connecting, ConnectionState::Disconnected),
    (ConnectionState::Connected, ConnectionState::Disconnected),
    (ConnectionState::Disconnected, ConnectionState::ManualEntry),
    (ConnectionState::ManualEntry, ConnectionState::Connecting),
    (ConnectionState::ManualEntry, ConnectionState::Disconnected),
];

pub fn validate_transition(from: ConnectionState, to: ConnectionState) -> bool {
    // Disconnecting is always permitted so `disconnect()` stays infallible.
    from == to || to == ConnectionState::Disconnected || VALID_TRANSITIONS.contains(&(from, to))
}

pub fn ensure_valid_transition(from: ConnectionState, to: ConnectionState) -> Result<()> {
    if validate_transition(from, to) {
        Ok(())
    } else {
        warn!("invalid session state transition from_state={} to_state={}", from, to);
        Err(AnchorError::InvalidStateTransition { from: from.to_string(), to: to.to_string() })
    }
}

/// Invariant from the data model: an address is held exactly while the session
/// is connected or in manual entry.
pub fn address_invariant_holds(state: ConnectionState, address: &str) -> bool {
    match state {
        ConnectionState::Connected | ConnectionState::ManualEntry => !address.is_empty(),
        ConnectionState::Disconnected | ConnectionState::Connecting => address.is_empty(),
    }
}

/// The single durable record: written on connect/manual entry, cleared on disconnect.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub mode: SessionMode,
    pub address: String,
}

/// Read-only view of the live session handed to callers and collaborators.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionSnapshot {
    pub connection: ConnectionState,
    pub mode: SessionMode,
    pub address: String,
    pub last_error: Option<String>,
}
