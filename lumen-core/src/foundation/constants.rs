//! System-wide constants for the deposit flow engine.

/// Nanoseconds per second (10^9).
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Default interval between status polls for a tracked flow (5 seconds).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default hard cap on how long a flow is polled, measured from `started_at` (30 minutes).
///
/// When the cap elapses, polling stops but the record is kept with the last
/// observed status so the user can still inspect it.
pub const DEFAULT_MAX_TRACKED_SECS: u64 = 30 * 60;

/// Default timeout applied to every anchor HTTP call (10 seconds).
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default delay before the startup capability re-probe (750 ms).
///
/// The extension may still be initializing when the host starts; one delayed
/// re-probe covers that window.
pub const DEFAULT_STARTUP_PROBE_GRACE_MS: u64 = 750;

/// Status assigned to a freshly registered deposit flow.
pub const INITIAL_DEPOSIT_STATUS: &str = "pending_user_transfer_start";

/// Anchor statuses that end a flow's polling loop.
pub const TERMINAL_FLOW_STATUSES: &[&str] = &["completed", "error", "refunded"];

/// File name of the persisted wallet session record, under `data_dir`.
pub const SESSION_FILE_NAME: &str = "wallet-session.json";

/// Environment variable that overrides `now_nanos()` for deterministic tests.
pub const TEST_NOW_NANOS_ENV_VAR: &str = "LUMEN_TEST_NOW_NANOS";
