pub const LOG_FILE_NAME: &str = "lumen.log";
pub const LOG_FILE_MAX_SIZE: u64 = 10 * 1024 * 1024;
pub const LOG_FILE_MAX_ROLLS: u32 = 4;

pub const LOG_LINE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f%:z)} [{l}] {m}{n}";
pub const LOG_LINE_PATTERN_COLORED: &str = "{d(%Y-%m-%d %H:%M:%S%.3f%:z)} [{h({l})}] {m}{n}";

/// Crates whose logs are enabled at the requested app level by default.
pub const WHITELISTED_CRATES: &[&str] = &["lumen_core"];
