use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    CapabilityUnavailable,
    AccessDenied,
    UserCancelled,
    UnsupportedMode,
    SigningFailed,
    WalletNotReady,
    ChallengeUnavailable,
    AuthRejected,
    TokenScopeMismatch,
    AssetUndeterminable,
    NoInteractiveUrl,
    LaunchAborted,
    FlowAlreadyTracked,
    InvalidStateTransition,
    NetworkError,
    StorageError,
    SerializationError,
    ConfigError,
    ParseError,
    Message,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("wallet extension unavailable")]
    CapabilityUnavailable,

    #[error("wallet access denied: {0}")]
    AccessDenied(String),

    #[error("signing cancelled by user")]
    UserCancelled,

    #[error("signing not supported in session mode {mode}")]
    UnsupportedMode { mode: String },

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("wallet session not ready")]
    WalletNotReady,

    #[error("auth challenge unavailable for {anchor_domain}: {details}")]
    ChallengeUnavailable { anchor_domain: String, details: String },

    #[error("auth rejected by {anchor_domain}: {details}")]
    AuthRejected { anchor_domain: String, details: String },

    #[error("auth token scope mismatch: token is scoped to {token_scope}, requested {requested_scope}")]
    TokenScopeMismatch { token_scope: String, requested_scope: String },

    #[error("deposit asset undeterminable: {0}")]
    AssetUndeterminable(String),

    #[error("anchor {anchor_domain} returned no interactive url")]
    NoInteractiveUrl { anchor_domain: String },

    #[error("deposit launch aborted during {stage}: {details}")]
    LaunchAborted { stage: String, details: String },

    #[error("flow already tracked: {0}")]
    FlowAlreadyTracked(String),

    #[error("invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, AnchorError>;

impl AnchorError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AnchorError::CapabilityUnavailable => ErrorCode::CapabilityUnavailable,
            AnchorError::AccessDenied(_) => ErrorCode::AccessDenied,
            AnchorError::UserCancelled => ErrorCode::UserCancelled,
            AnchorError::UnsupportedMode { .. } => ErrorCode::UnsupportedMode,
            AnchorError::SigningFailed(_) => ErrorCode::SigningFailed,
            AnchorError::WalletNotReady => ErrorCode::WalletNotReady,
            AnchorError::ChallengeUnavailable { .. } => ErrorCode::ChallengeUnavailable,
            AnchorError::AuthRejected { .. } => ErrorCode::AuthRejected,
            AnchorError::TokenScopeMismatch { .. } => ErrorCode::TokenScopeMismatch,
            AnchorError::AssetUndeterminable(_) => ErrorCode::AssetUndeterminable,
            AnchorError::NoInteractiveUrl { .. } => ErrorCode::NoInteractiveUrl,
            AnchorError::LaunchAborted { .. } => ErrorCode::LaunchAborted,
            AnchorError::FlowAlreadyTracked(_) => ErrorCode::FlowAlreadyTracked,
            AnchorError::InvalidStateTransition { .. } => ErrorCode::InvalidStateTransition,
            AnchorError::NetworkError(_) => ErrorCode::NetworkError,
            AnchorError::StorageError { .. } => ErrorCode::StorageError,
            AnchorError::SerializationError { .. } => ErrorCode::SerializationError,
            AnchorError::ConfigError(_) => ErrorCode::ConfigError,
            AnchorError::ParseError(_) => ErrorCode::ParseError,
            AnchorError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    pub fn challenge_unavailable(anchor_domain: impl Into<String>, details: impl Into<String>) -> Self {
        AnchorError::ChallengeUnavailable { anchor_domain: anchor_domain.into(), details: details.into() }
    }

    pub fn auth_rejected(anchor_domain: impl Into<String>, details: impl Into<String>) -> Self {
        AnchorError::AuthRejected { anchor_domain: anchor_domain.into(), details: details.into() }
    }

    pub fn launch_aborted(stage: impl Into<String>, details: impl Into<String>) -> Self {
        AnchorError::LaunchAborted { stage: stage.into(), details: details.into() }
    }
}

impl From<io::Error> for AnchorError {
    fn from(err: io::Error) -> Self {
        AnchorError::StorageError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<serde_json::Error> for AnchorError {
    fn from(err: serde_json::Error) -> Self {
        AnchorError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<reqwest::Error> for AnchorError {
    fn from(err: reqwest::Error) -> Self {
        AnchorError::NetworkError(err.to_string())
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `AnchorError` variants at the call site to preserve context.
