//! Domain layer: pure protocol logic with no I/O.

pub mod asset;
pub mod auth;
pub mod flow;
pub mod wallet;

pub use asset::{resolve_deposit_asset, AssetKey, DepositAsset, Leg, Route};
pub use auth::AuthToken;
pub use flow::{is_terminal_status, FlowKind, FlowRecord, InteractiveOpen};
pub use wallet::{ConnectionState, SessionMode, SessionRecord, SessionSnapshot};
