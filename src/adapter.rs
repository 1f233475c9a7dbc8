use std::future::Future;

use uuid::Uuid;

use crate::client::model::ClientNode;
use crate::error::AdapterError;

/// Data source behind the client page.
///
/// The adapter is the source of truth for node state: the view model never
/// updates its snapshot optimistically after a mutation, it waits for the
/// next `fetch_node`.
pub trait NodeAdapter: Send + Sync + 'static {
    fn fetch_node(
        &self,
        node_id: Uuid,
    ) -> impl Future<Output = Result<ClientNode, AdapterError>> + Send;

    fn set_eligible(&self, node_id: Uuid) -> impl Future<Output = Result<(), AdapterError>> + Send;

    fn set_ineligible(
        &self,
        node_id: Uuid,
    ) -> impl Future<Output = Result<(), AdapterError>> + Send;
}
