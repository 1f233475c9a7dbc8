
use std::sync::Arc;

use nomad_console::client::{ClientController, DrainPhase};
use nomad_console::config::ListConfig;
use nomad_console::registry::NodeRegistry;
use test_harness::node_with_allocations;

async fn open_page(
    registry: &Arc<NodeRegistry>,
    node_id: uuid::Uuid,
) -> ClientController<NodeRegistry> {
    ClientController::load(registry.clone(), node_id, &ListConfig::default())
        .await
        .expect("node should load")
}

/// Test that the banner appears when a drain observed by the page finishes.
#[tokio::test]
async fn test_drain_completion_shows_notification() {
    let node = node_with_allocations(3, 0);
    let node_id = node.id;
    let registry = Arc::new(NodeRegistry::from_nodes([node]));
    registry.set_draining(&node_id, true).await;

    let mut controller = open_page(&registry, node_id).await;
    assert_eq!(controller.drain_phase(), DrainPhase::Draining);
    assert!(!controller.show_drain_notification());

    registry.set_draining(&node_id, false).await;
    controller.refresh().await.unwrap();
    assert!(controller.show_drain_notification());
    assert_eq!(controller.drain_phase(), DrainPhase::JustFinishedDraining);

    controller.dismiss_drain_notification();
    assert!(!controller.show_drain_notification());
}

/// Test that starting a drain, or refreshing without a change, is silent.
#[tokio::test]
async fn test_drain_start_is_silent() {
    let node = node_with_allocations(3, 0);
    let node_id = node.id;
    let registry = Arc::new(NodeRegistry::from_nodes([node]));

    let mut controller = open_page(&registry, node_id).await;
    controller.refresh().await.unwrap();
    assert!(!controller.show_drain_notification());

    registry.set_draining(&node_id, true).await;
    controller.refresh().await.unwrap();
    assert!(!controller.show_drain_notification());
    assert_eq!(controller.drain_phase(), DrainPhase::Draining);

    controller.refresh().await.unwrap();
    assert!(!controller.show_drain_notification());
}

/// Test that a page opened after the drain finished shows nothing.
#[tokio::test]
async fn test_page_opened_after_drain_is_silent() {
    let node = node_with_allocations(3, 0);
    let node_id = node.id;
    let registry = Arc::new(NodeRegistry::from_nodes([node]));
    registry.set_draining(&node_id, true).await;
    registry.set_draining(&node_id, false).await;

    let mut controller = open_page(&registry, node_id).await;
    controller.refresh().await.unwrap();
    assert!(!controller.show_drain_notification());
    assert_eq!(controller.drain_phase(), DrainPhase::NotDraining);
}
