use crate::domain::auth::AuthToken;
use crate::domain::flow::FlowRecord;
use crate::foundation::{AnchorDomain, AnchorError, FlowId, Result};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

struct TrackedFlow {
    record: FlowRecord,
    poll_task: Option<JoinHandle<()>>,
}

/// What a poll tick needs from the registry, copied out so the lock is never
/// held across the status call.
#[derive(Clone, Debug)]
pub struct PollSnapshot {
    pub anchor_domain: AnchorDomain,
    pub auth_token: AuthToken,
    pub status: String,
    pub started_at_nanos: u64,
}

/// Sole authority over the set of in-flight flows.
///
/// Mutated from exactly two sides (orchestrator insertion and
/// poller/dismissal), and both treat "record not found" as a benign no-op,
/// which is what makes a dismissal racing a late poll response safe.
#[derive(Clone)]
pub struct FlowRegistry {
    inner: Arc<Mutex<HashMap<FlowId, TrackedFlow>>>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(HashMap::new())) }
    }

    fn lock_inner(&self) -> MutexGuard<'_, HashMap<FlowId, TrackedFlow>> {
        // Mutations are small and never panic mid-update; recover the map
        // rather than propagating poison through every poll tick.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a freshly launched flow. Flow ids are anchor-issued and
    /// unique; a duplicate is an error, not an overwrite.
    pub fn insert(&self, record: FlowRecord) -> Result<()> {
        let mut inner = self.lock_inner();
        if inner.contains_key(&record.id) {
            return Err(AnchorError::FlowAlreadyTracked(record.id.to_string()));
        }
        inner.insert(record.id.clone(), TrackedFlow { record, poll_task: None });
        Ok(())
    }

    pub fn get(&self, id: &FlowId) -> Option<FlowRecord> {
        self.lock_inner().get(id).map(|tracked| tracked.record.clone())
    }

    pub fn list(&self) -> Vec<FlowRecord> {
        self.lock_inner().values().map(|tracked| tracked.record.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock_inner().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_inner().is_empty()
    }

    /// Updates a flow's status, returning the previous status. `None` means
    /// the record is gone (dismissed) and the result must be discarded.
    pub fn update_status(&self, id: &FlowId, status: &str) -> Option<String> {
        let mut inner = self.lock_inner();
        let tracked = inner.get_mut(id)?;
        let previous = std::mem::replace(&mut tracked.record.status, status.to_string());
        Some(previous)
    }

    pub fn poll_snapshot(&self, id: &FlowId) -> Option<PollSnapshot> {
        let inner = self.lock_inner();
        let tracked = inner.get(id)?;
        Some(PollSnapshot {
            anchor_domain: tracked.record.anchor_domain.clone(),
            auth_token: tracked.record.auth_token.clone(),
            status: tracked.record.status.clone(),
            started_at_nanos: tracked.record.started_at_nanos,
        })
    }

    /// Attaches the polling task for a flow. Refused when the record is gone
    /// or a loop is already attached (at most one polling loop per id); the
    /// rejected handle is handed back so the caller can abort it.
    pub fn attach_poll_task(&self, id: &FlowId, handle: JoinHandle<()>) -> std::result::Result<(), JoinHandle<()>> {
        let mut inner = self.lock_inner();
        match inner.get_mut(id) {
            Some(tracked) if tracked.poll_task.is_none() => {
                tracked.poll_task = Some(handle);
                Ok(())
            }
            _ => Err(handle),
        }
    }

    /// Detaches a finished polling loop without aborting it; used by the loop
    /// itself on terminal status or timeout.
    pub fn clear_poll_task(&self, id: &FlowId) {
        if let Some(tracked) = self.lock_inner().get_mut(id) {
            tracked.poll_task = None;
        }
    }

    pub fn has_active_poll(&self, id: &FlowId) -> bool {
        self.lock_inner().get(id).map(|tracked| tracked.poll_task.is_some()).unwrap_or(false)
    }

    /// User dismissal: removes the record and synchronously stops its polling
    /// loop. An HTTP call already in flight is simply discarded on arrival
    /// because every mutation re-checks record presence.
    pub fn dismiss(&self, id: &FlowId) -> bool {
        let removed = self.lock_inner().remove(id);
        match removed {
            Some(tracked) => {
                if let Some(handle) = tracked.poll_task {
                    handle.abort();
                }
                true
            }
            None => {
                debug!("dismiss ignored, flow not tracked flow_id={}", id);
                false
            }
        }
    }
}

impl Default for FlowRegistry {
    fn default() -> Self {
        Self::new()
    }
}
