
use std::sync::Arc;

use nomad_console::client::{ClientController, EligibilityOutcome, EligibilityToggle};
use nomad_console::config::ListConfig;
use nomad_console::error::{AdapterError, FORBIDDEN_MESSAGE};
use nomad_console::registry::NodeRegistry;
use test_harness::{node_with_allocations, GatedAdapter};

/// A second request while the first is pending is dropped, and the data
/// source sees exactly one call.
#[tokio::test]
async fn test_concurrent_request_is_dropped() {
    let node = node_with_allocations(1, 0);
    let node_id = node.id;
    let adapter = Arc::new(GatedAdapter::new(node, Ok(())));
    let toggle = Arc::new(EligibilityToggle::new(adapter.clone(), node_id));

    let first = {
        let toggle = toggle.clone();
        tokio::spawn(async move { toggle.set_eligibility(true).await })
    };
    adapter.wait_for_calls(1).await;
    assert!(toggle.is_running());

    let second = toggle.set_eligibility(true).await;
    assert_eq!(second, EligibilityOutcome::Dropped);
    let third = toggle.set_eligibility(false).await;
    assert_eq!(third, EligibilityOutcome::Dropped);
    assert_eq!(adapter.calls(), 1);
    assert_eq!(*adapter.last_eligible.lock().unwrap(), Some(true));

    adapter.release_one();
    assert_eq!(first.await.unwrap(), EligibilityOutcome::Applied);
    assert!(!toggle.is_running());

    // The guard is free again once the first request resolved
    adapter.release_one();
    assert_eq!(
        toggle.set_eligibility(false).await,
        EligibilityOutcome::Applied
    );
    assert_eq!(adapter.calls(), 2);
    assert_eq!(*adapter.last_eligible.lock().unwrap(), Some(false));
}

#[tokio::test]
async fn test_rejection_without_message_uses_fallback() {
    let node = node_with_allocations(1, 0);
    let node_id = node.id;
    let adapter = Arc::new(GatedAdapter::new(
        node,
        Err(AdapterError::Rejected {
            status: 500,
            detail: None,
        }),
    ));
    adapter.release_one();

    let toggle = EligibilityToggle::new(adapter.clone(), node_id);
    let outcome = toggle.set_eligibility(false).await;
    assert_eq!(
        outcome,
        EligibilityOutcome::Failed("Could not set eligibility".to_string())
    );
    assert_eq!(
        toggle.eligibility_error().as_deref(),
        Some("Could not set eligibility")
    );
}

#[tokio::test]
async fn test_forbidden_reports_acl_message() {
    let node = node_with_allocations(1, 0);
    let node_id = node.id;
    let adapter = Arc::new(GatedAdapter::new(node, Err(AdapterError::Forbidden)));
    adapter.release_one();

    let toggle = EligibilityToggle::new(adapter, node_id);
    toggle.set_eligibility(true).await;
    assert_eq!(toggle.eligibility_error().as_deref(), Some(FORBIDDEN_MESSAGE));
}

#[tokio::test]
async fn test_success_clears_previous_error() {
    let node = node_with_allocations(1, 0);
    let node_id = node.id;
    let registry = Arc::new(NodeRegistry::from_nodes([node]));
    registry.set_draining(&node_id, true).await;

    let controller = ClientController::load(registry.clone(), node_id, &ListConfig::default())
        .await
        .unwrap();

    let outcome = controller.set_eligibility(true).await;
    assert!(matches!(outcome, EligibilityOutcome::Failed(_)));
    assert!(controller
        .eligibility_error()
        .unwrap()
        .contains("while it is draining"));

    registry.set_draining(&node_id, false).await;
    assert_eq!(
        controller.set_eligibility(true).await,
        EligibilityOutcome::Applied
    );
    assert!(controller.eligibility_error().is_none());
    assert!(registry.get(&node_id).await.unwrap().is_eligible());
}

/// A failed mutation leaves the page's snapshot alone; only a refresh
/// from the data source changes it.
#[tokio::test]
async fn test_snapshot_is_not_updated_optimistically() {
    let node = node_with_allocations(1, 0);
    let node_id = node.id;
    let registry = Arc::new(NodeRegistry::from_nodes([node]));

    let mut controller =
        ClientController::load(registry.clone(), node_id, &ListConfig::default())
            .await
            .unwrap();
    assert!(controller.node().is_eligible());

    assert_eq!(
        controller.set_eligibility(false).await,
        EligibilityOutcome::Applied
    );
    assert!(controller.node().is_eligible());

    controller.refresh().await.unwrap();
    assert!(!controller.node().is_eligible());
}
