use std::collections::HashMap;
use std::path::Path;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::adapter::NodeAdapter;
use crate::client::model::{ClientNode, SchedulingEligibility};
use crate::error::{AdapterError, Result};

const DRAINING_ELIGIBLE_DETAIL: &str =
    "can not set node's scheduling eligibility to eligible while it is draining";

/// In-memory store of client nodes, served by the dashboard and the CLI.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: RwLock<HashMap<Uuid, ClientNode>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = ClientNode>) -> Self {
        Self {
            nodes: RwLock::new(nodes.into_iter().map(|n| (n.id, n)).collect()),
        }
    }

    /// Load nodes from a JSON file holding an array of node records.
    pub async fn load_fixture(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let nodes: Vec<ClientNode> = serde_json::from_slice(&data)?;
        tracing::info!(path = %path.display(), nodes = nodes.len(), "Loaded node fixture");
        Ok(Self::from_nodes(nodes))
    }

    /// Insert or replace a node. Returns the previous record, if any.
    pub async fn insert(&self, node: ClientNode) -> Option<ClientNode> {
        self.nodes.write().await.insert(node.id, node)
    }

    pub async fn get(&self, node_id: &Uuid) -> Option<ClientNode> {
        self.nodes.read().await.get(node_id).cloned()
    }

    /// All nodes ordered by name.
    pub async fn list(&self) -> Vec<ClientNode> {
        let mut nodes: Vec<ClientNode> = self.nodes.read().await.values().cloned().collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }

    /// Start or finish a drain. Draining nodes are always ineligible.
    /// Returns false if the node is unknown.
    pub async fn set_draining(&self, node_id: &Uuid, draining: bool) -> bool {
        if let Some(node) = self.nodes.write().await.get_mut(node_id) {
            node.is_draining = draining;
            if draining {
                node.scheduling_eligibility = SchedulingEligibility::Ineligible;
            }
            tracing::info!(node_id = %node_id, draining, "Node drain updated");
            true
        } else {
            false
        }
    }

    async fn update_eligibility(
        &self,
        node_id: Uuid,
        eligibility: SchedulingEligibility,
    ) -> std::result::Result<(), AdapterError> {
        let mut nodes = self.nodes.write().await;
        let node = nodes
            .get_mut(&node_id)
            .ok_or(AdapterError::NodeNotFound(node_id))?;

        if node.is_draining && eligibility == SchedulingEligibility::Eligible {
            return Err(AdapterError::Rejected {
                status: 400,
                detail: Some(DRAINING_ELIGIBLE_DETAIL.to_string()),
            });
        }

        node.scheduling_eligibility = eligibility;
        tracing::info!(node_id = %node_id, eligibility = %eligibility, "Node eligibility updated");
        Ok(())
    }
}

impl NodeAdapter for NodeRegistry {
    async fn fetch_node(&self, node_id: Uuid) -> std::result::Result<ClientNode, AdapterError> {
        self.get(&node_id)
            .await
            .ok_or(AdapterError::NodeNotFound(node_id))
    }

    async fn set_eligible(&self, node_id: Uuid) -> std::result::Result<(), AdapterError> {
        self.update_eligibility(node_id, SchedulingEligibility::Eligible)
            .await
    }

    async fn set_ineligible(&self, node_id: Uuid) -> std::result::Result<(), AdapterError> {
        self.update_eligibility(node_id, SchedulingEligibility::Ineligible)
            .await
    }
}
