//! Application layer: the session, handshake, orchestration, and polling
//! machinery built on top of the domain rules and infrastructure seams.

pub mod handshake;
pub mod lifecycle;
pub mod orchestrator;
pub mod poller;
pub mod registry;
pub mod session;

pub use handshake::AuthHandshakeClient;
pub use lifecycle::{CompositeObserver, FlowObserver, NoopObserver};
pub use orchestrator::{DepositFlowOrchestrator, DepositIntent, LaunchedFlow};
pub use poller::FlowStatusPoller;
pub use registry::FlowRegistry;
pub use session::WalletSession;
