use crate::domain::flow::FlowRecord;
use crate::foundation::{AccountId, FlowId};
use log::{debug, info, warn};
use std::sync::Arc;

/// Hooks into the flow lifecycle for embedding UIs: notifications, badges,
/// metrics. Every callback has a no-op default.
pub trait FlowObserver: Send + Sync {
    fn on_flow_launched(&self, _record: &FlowRecord) {}
    fn on_flow_status_changed(&self, _id: &FlowId, _previous: &str, _current: &str) {}
    fn on_flow_terminal(&self, _id: &FlowId, _status: &str) {}
    fn on_flow_expired(&self, _id: &FlowId, _last_status: &str) {}
    fn on_flow_dismissed(&self, _id: &FlowId) {}
    /// Advisory only: the account cannot yet receive the resolved asset.
    fn on_trustline_missing(&self, _account: &AccountId, _missing: &[String]) {}
}

pub struct NoopObserver;

impl FlowObserver for NoopObserver {}

pub struct CompositeObserver {
    observers: Vec<Arc<dyn FlowObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub fn add_observer(&mut self, observer: Arc<dyn FlowObserver>) {
        self.observers.push(observer);
    }
}

impl Default for CompositeObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowObserver for CompositeObserver {
    fn on_flow_launched(&self, record: &FlowRecord) {
        debug!("flow launched dispatch observer_count={} flow_id={}", self.observers.len(), record.id);
        for observer in &self.observers {
            observer.on_flow_launched(record);
        }
    }

    fn on_flow_status_changed(&self, id: &FlowId, previous: &str, current: &str) {
        info!("flow status changed flow_id={} old_status={} new_status={}", id, previous, current);
        for observer in &self.observers {
            observer.on_flow_status_changed(id, previous, current);
        }
    }

    fn on_flow_terminal(&self, id: &FlowId, status: &str) {
        info!("flow reached terminal status flow_id={} status={}", id, status);
        for observer in &self.observers {
            observer.on_flow_terminal(id, status);
        }
    }

    fn on_flow_expired(&self, id: &FlowId, last_status: &str) {
        info!("flow tracking expired flow_id={} last_status={}", id, last_status);
        for observer in &self.observers {
            observer.on_flow_expired(id, last_status);
        }
    }

    fn on_flow_dismissed(&self, id: &FlowId) {
        debug!("flow dismissed dispatch observer_count={} flow_id={}", self.observers.len(), id);
        for observer in &self.observers {
            observer.on_flow_dismissed(id);
        }
    }

    fn on_trustline_missing(&self, account: &AccountId, missing: &[String]) {
        warn!("missing trustlines account={} missing={:?}", account, missing);
        for observer in &self.observers {
            observer.on_trustline_missing(account, missing);
        }
    }
}
