use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Best-effort opener for the anchor's hosted interactive page.
///
/// Opening can be blocked by the environment; that is reported as `false`,
/// never as an error, and the url stays available to the caller either way.
pub trait InteractiveLauncher: Send + Sync {
    fn open(&self, url: &str) -> bool;
}

/// Opens urls with the platform opener. Failure to spawn reads as "blocked".
pub struct SystemLauncher;

impl InteractiveLauncher for SystemLauncher {
    fn open(&self, url: &str) -> bool {
        let mut command = opener_command(url);
        match command.spawn() {
            Ok(_) => true,
            Err(err) => {
                debug!("interactive url open blocked error={}", err);
                false
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> std::process::Command {
    let mut command = std::process::Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> std::process::Command {
    let mut command = std::process::Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> std::process::Command {
    let mut command = std::process::Command::new("xdg-open");
    command.arg(url);
    command
}

/// Never opens anything; for headless embeddings.
pub struct NoopLauncher;

impl InteractiveLauncher for NoopLauncher {
    fn open(&self, _url: &str) -> bool {
        false
    }
}

/// Test launcher with a fixed outcome and a record of every url it was asked
/// to open.
pub struct StaticLauncher {
    result: AtomicBool,
    opened: Mutex<Vec<String>>,
}

impl StaticLauncher {
    pub fn opening() -> Self {
        Self { result: AtomicBool::new(true), opened: Mutex::new(Vec::new()) }
    }

    pub fn blocked() -> Self {
        Self { result: AtomicBool::new(false), opened: Mutex::new(Vec::new()) }
    }

    pub fn set_result(&self, result: bool) {
        self.result.store(result, Ordering::Relaxed);
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().map(|urls| urls.clone()).unwrap_or_default()
    }
}

impl InteractiveLauncher for StaticLauncher {
    fn open(&self, url: &str) -> bool {
        if let Ok(mut urls) = self.opened.lock() {
            urls.push(url.to_string());
        }
        self.result.load(Ordering::Relaxed)
    }
}
