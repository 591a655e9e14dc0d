use crate::application::lifecycle::FlowObserver;
use crate::application::registry::FlowRegistry;
use crate::domain::flow::is_terminal_status;
use crate::foundation::util::time::{now_nanos, tracking_window_elapsed};
use crate::foundation::FlowId;
use crate::infrastructure::anchor::AnchorApi;
use crate::infrastructure::config::FlowConfig;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Periodic status checks for tracked flows.
///
/// Each flow gets its own independent loop: anchors expose no push channel to
/// this client, so polling is the only transition-detection mechanism. A tick
/// that fails transport-side is skipped silently; transient blips must not
/// read as terminal failure. Each loop self-cancels on terminal status or on
/// the wall-clock cap; there is no global cancellation token.
pub struct FlowStatusPoller {
    api: Arc<dyn AnchorApi>,
    registry: FlowRegistry,
    observer: Arc<dyn FlowObserver>,
    poll_interval: Duration,
    max_tracked_secs: u64,
}

impl FlowStatusPoller {
    pub fn new(
        api: Arc<dyn AnchorApi>,
        registry: FlowRegistry,
        observer: Arc<dyn FlowObserver>,
        poll_interval: Duration,
        max_tracked_secs: u64,
    ) -> Self {
        Self { api, registry, observer, poll_interval, max_tracked_secs }
    }

    pub fn from_config(api: Arc<dyn AnchorApi>, registry: FlowRegistry, observer: Arc<dyn FlowObserver>, config: &FlowConfig) -> Self {
        Self::new(api, registry, observer, config.poll_interval(), config.max_tracked_seconds)
    }

    /// Starts the polling loop for a registered flow. Returns `false` when
    /// the flow is unknown or already has a loop attached.
    pub fn track(&self, id: FlowId) -> bool {
        if self.registry.get(&id).is_none() {
            warn!("poll start refused, flow not registered flow_id={}", id);
            return false;
        }
        if self.registry.has_active_poll(&id) {
            warn!("poll start refused, flow already polled flow_id={}", id);
            return false;
        }
        let api = self.api.clone();
        let registry = self.registry.clone();
        let observer = self.observer.clone();
        let interval = self.poll_interval;
        let max_tracked_secs = self.max_tracked_secs;
        let loop_id = id.clone();
        let handle = tokio::spawn(async move {
            poll_loop(api, registry, observer, loop_id, interval, max_tracked_secs).await;
        });
        if let Err(rejected) = self.registry.attach_poll_task(&id, handle) {
            // The record vanished (or another loop won the race) between the
            // check and the attach; this loop must not keep running.
            rejected.abort();
            debug!("poll task attach refused flow_id={}", id);
            return false;
        }
        true
    }
}

async fn poll_loop(
    api: Arc<dyn AnchorApi>,
    registry: FlowRegistry,
    observer: Arc<dyn FlowObserver>,
    id: FlowId,
    interval: Duration,
    max_tracked_secs: u64,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let Some(snapshot) = registry.poll_snapshot(&id) else {
            debug!("poll loop stopping, flow no longer tracked flow_id={}", id);
            break;
        };
        if tracking_window_elapsed(snapshot.started_at_nanos, now_nanos(), max_tracked_secs) {
            info!("poll loop stopping, tracking window elapsed flow_id={} last_status={}", id, snapshot.status);
            registry.clear_poll_task(&id);
            observer.on_flow_expired(&id, &snapshot.status);
            break;
        }
        let status = match api.flow_status(&snapshot.anchor_domain, &snapshot.auth_token, &id).await {
            Ok(status) => status,
            Err(err) => {
                // Transient poll failure: skip the tick, mutate nothing.
                debug!("poll tick skipped flow_id={} error={}", id, err);
                continue;
            }
        };
        let Some(previous) = registry.update_status(&id, &status) else {
            debug!("poll result discarded, flow dismissed mid-flight flow_id={}", id);
            break;
        };
        if previous != status {
            info!("flow status updated flow_id={} old_status={} new_status={}", id, previous, status);
            observer.on_flow_status_changed(&id, &previous, &status);
        }
        if is_terminal_status(&status) {
            info!("poll loop stopping, terminal status flow_id={} status={}", id, status);
            registry.clear_poll_task(&id);
            observer.on_flow_terminal(&id, &status);
            break;
        }
    }
}
