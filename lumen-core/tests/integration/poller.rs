use crate::fixtures::{self, RecordingObserver};
use lumen_core::application::{FlowRegistry, FlowStatusPoller, NoopObserver};
use lumen_core::foundation::util::time::now_nanos;
use lumen_core::foundation::FlowId;
use lumen_core::infrastructure::anchor::{AnchorApi, MockAnchorApi};
use std::sync::Arc;
use std::time::Duration;

const FAST_POLL: Duration = Duration::from_millis(20);

fn poller_with(api: &Arc<MockAnchorApi>, registry: &FlowRegistry, max_tracked_secs: u64) -> FlowStatusPoller {
    FlowStatusPoller::new(api.clone() as Arc<dyn AnchorApi>, registry.clone(), Arc::new(NoopObserver), FAST_POLL, max_tracked_secs)
}

#[tokio::test]
async fn test_poller_when_terminal_status_then_stops_but_record_remains() {
    let api = Arc::new(MockAnchorApi::new());
    api.push_status("incomplete");
    api.push_status("completed");
    let registry = FlowRegistry::new();
    let observer = Arc::new(RecordingObserver::new());
    let poller =
        FlowStatusPoller::new(api.clone() as Arc<dyn AnchorApi>, registry.clone(), observer.clone(), FAST_POLL, 30 * 60);

    let id = FlowId::from("flow-terminal");
    registry.insert(fixtures::flow_record("flow-terminal", "pending_user_transfer_start", now_nanos())).expect("insert");
    assert!(poller.track(id.clone()));

    tokio::time::sleep(Duration::from_millis(200)).await;

    let record = registry.get(&id).expect("record kept after terminal status");
    assert_eq!(record.status, "completed");
    assert!(!registry.has_active_poll(&id));
    assert!(observer.events().contains(&"terminal:flow-terminal:completed".to_string()));

    // No further poll calls once terminal.
    let calls_after_stop = api.status_calls();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(api.status_calls(), calls_after_stop);
}

#[tokio::test]
async fn test_poller_when_transport_error_then_tick_skipped_silently() {
    let api = Arc::new(MockAnchorApi::new());
    api.set_fail_status(true);
    let registry = FlowRegistry::new();
    let poller = poller_with(&api, &registry, 30 * 60);

    let id = FlowId::from("flow-flaky");
    registry.insert(fixtures::flow_record("flow-flaky", "pending_user_transfer_start", now_nanos())).expect("insert");
    assert!(poller.track(id.clone()));

    tokio::time::sleep(Duration::from_millis(100)).await;

    // Several ticks errored; the record is untouched and still polled.
    assert!(api.status_calls() >= 2);
    let record = registry.get(&id).expect("record");
    assert_eq!(record.status, "pending_user_transfer_start");
    assert!(registry.has_active_poll(&id));

    // Once the endpoint recovers, polling proceeds as normal.
    api.push_status("completed");
    api.set_fail_status(false);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(registry.get(&id).expect("record").status, "completed");
}

#[tokio::test]
async fn test_poller_when_dismissed_then_loop_stops_and_no_mutation() {
    let api = Arc::new(MockAnchorApi::new());
    let registry = FlowRegistry::new();
    let observer = Arc::new(RecordingObserver::new());
    let poller =
        FlowStatusPoller::new(api.clone() as Arc<dyn AnchorApi>, registry.clone(), observer.clone(), FAST_POLL, 30 * 60);

    let id = FlowId::from("flow-dismissed");
    registry.insert(fixtures::flow_record("flow-dismissed", "pending_user_transfer_start", now_nanos())).expect("insert");
    assert!(poller.track(id.clone()));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(registry.dismiss(&id));
    assert!(registry.get(&id).is_none());

    // A response arriving for a dismissed flow is a benign no-op.
    assert_eq!(registry.update_status(&id, "completed"), None);
    assert!(registry.get(&id).is_none());

    // The polling task stops issuing calls.
    tokio::time::sleep(Duration::from_millis(60)).await;
    let calls_after_dismiss = api.status_calls();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(api.status_calls(), calls_after_dismiss);
}

#[tokio::test]
async fn test_poller_when_tracking_window_elapsed_then_stops_with_last_status() {
    let api = Arc::new(MockAnchorApi::new());
    let registry = FlowRegistry::new();
    let observer = Arc::new(RecordingObserver::new());
    let poller = FlowStatusPoller::new(api.clone() as Arc<dyn AnchorApi>, registry.clone(), observer.clone(), FAST_POLL, 1);

    let id = FlowId::from("flow-stale");
    let started = now_nanos().saturating_sub(5 * 1_000_000_000);
    registry.insert(fixtures::flow_record("flow-stale", "pending_external", started)).expect("insert");
    assert!(poller.track(id.clone()));

    tokio::time::sleep(Duration::from_millis(80)).await;

    // The cap fires before any fetch; the record keeps its last status and is
    // not forced into an error state.
    let record = registry.get(&id).expect("record kept after expiry");
    assert_eq!(record.status, "pending_external");
    assert!(!registry.has_active_poll(&id));
    assert_eq!(api.status_calls(), 0);
    assert!(observer.events().contains(&"expired:flow-stale:pending_external".to_string()));
}

#[tokio::test]
async fn test_poller_refuses_second_loop_for_same_flow() {
    let api = Arc::new(MockAnchorApi::new());
    let registry = FlowRegistry::new();
    let poller = poller_with(&api, &registry, 30 * 60);

    let id = FlowId::from("flow-single");
    registry.insert(fixtures::flow_record("flow-single", "pending_user_transfer_start", now_nanos())).expect("insert");
    assert!(poller.track(id.clone()));
    assert!(!poller.track(id.clone()));
}

#[tokio::test]
async fn test_poller_refuses_unregistered_flow() {
    let api = Arc::new(MockAnchorApi::new());
    let registry = FlowRegistry::new();
    let poller = poller_with(&api, &registry, 30 * 60);

    assert!(!poller.track(FlowId::from("flow-unknown")));
    assert_eq!(api.status_calls(), 0);
}

#[tokio::test]
async fn test_flows_poll_concurrently_and_independently() {
    let api = Arc::new(MockAnchorApi::new());
    let registry = FlowRegistry::new();
    let poller = poller_with(&api, &registry, 30 * 60);

    let first = FlowId::from("flow-a");
    let second = FlowId::from("flow-b");
    registry.insert(fixtures::flow_record("flow-a", "pending_user_transfer_start", now_nanos())).expect("insert a");
    registry.insert(fixtures::flow_record("flow-b", "pending_user_transfer_start", now_nanos())).expect("insert b");
    assert!(poller.track(first.clone()));
    assert!(poller.track(second.clone()));

    tokio::time::sleep(Duration::from_millis(50)).await;

    // Dismissing one flow does not disturb the other.
    assert!(registry.dismiss(&first));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(registry.get(&first).is_none());
    assert!(registry.get(&second).is_some());
    assert!(registry.has_active_poll(&second));
}
