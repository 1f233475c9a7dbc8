use std::sync::Arc;

use uuid::Uuid;

use crate::adapter::NodeAdapter;
use crate::client::drain::{DrainNotification, DrainPhase};
use crate::client::eligibility::{EligibilityOutcome, EligibilityToggle};
use crate::client::model::{Allocation, ClientNode, NodeDriver, NodeEvent};
use crate::client::navigation::{self, Transition};
use crate::client::pipeline;
use crate::client::view_state::{AllocationSortKey, ViewState};
use crate::config::ListConfig;
use crate::error::Result;

/// View model of the client detail page.
///
/// One instance lives for as long as the page for a node is open. Derived
/// lists are computed from the current snapshot and view state on every
/// call, so a reader always sees both inputs at the same version.
pub struct ClientController<A: NodeAdapter> {
    adapter: Arc<A>,
    node: ClientNode,
    view: ViewState,
    drain: DrainNotification,
    eligibility: Arc<EligibilityToggle<A>>,
}

impl<A: NodeAdapter> ClientController<A> {
    pub fn new(adapter: Arc<A>, node: ClientNode, config: &ListConfig) -> Self {
        let eligibility = Arc::new(EligibilityToggle::new(adapter.clone(), node.id));
        Self {
            drain: DrainNotification::new(node.is_draining),
            view: ViewState::new(config),
            eligibility,
            adapter,
            node,
        }
    }

    /// Fetch the node from the adapter and open a page for it.
    pub async fn load(adapter: Arc<A>, node_id: Uuid, config: &ListConfig) -> Result<Self> {
        let node = adapter.fetch_node(node_id).await?;
        Ok(Self::new(adapter, node, config))
    }

    /// Replace the node snapshot with a newer one from the data source.
    pub fn set_node(&mut self, node: ClientNode) {
        self.drain.observe(node.is_draining);
        self.node = node;
    }

    /// Pull a fresh snapshot from the adapter.
    pub async fn refresh(&mut self) -> Result<()> {
        let node = self.adapter.fetch_node(self.node.id).await?;
        self.set_node(node);
        Ok(())
    }

    pub fn node(&self) -> &ClientNode {
        &self.node
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Swap in view state decoded from a query string.
    pub fn set_view_state(&mut self, view: ViewState) {
        self.view = view;
    }

    pub fn preemptions(&self) -> Vec<&Allocation> {
        pipeline::preemptions(&self.node.allocations)
    }

    pub fn visible_allocations(&self) -> Vec<&Allocation> {
        pipeline::select_source(&self.node.allocations, self.view.only_preemptions)
    }

    /// Every allocation that passes the filter and search, in display order.
    pub fn sorted_allocations(&self) -> Vec<&Allocation> {
        let visible = self.visible_allocations();
        let searched = pipeline::search(&visible, &self.view.search_term);
        pipeline::sort(
            &searched,
            &self.view.sort_property,
            self.view.sort_descending,
        )
    }

    /// The allocations on the current page.
    pub fn paged_allocations(&self) -> Vec<&Allocation> {
        let sorted = self.sorted_allocations();
        pipeline::paginate(&sorted, self.view.current_page(), self.view.page_size()).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        pipeline::page_count(self.sorted_allocations().len(), self.view.page_size())
    }

    pub fn sorted_events(&self) -> Vec<&NodeEvent> {
        pipeline::sorted_events(&self.node.events)
    }

    pub fn sorted_drivers(&self) -> Vec<&NodeDriver> {
        pipeline::sorted_drivers(&self.node.drivers)
    }

    /// Toggle the preemptions-only filter. The current page is left alone,
    /// so it may now point past the end of the shorter list.
    pub fn set_preemption_filter(&mut self, only_preemptions: bool) {
        self.view.only_preemptions = only_preemptions;
    }

    /// Changing the search term starts over from the first page.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.view.search_term = term.into();
        self.view.set_current_page(1);
    }

    pub fn set_sort(&mut self, property: AllocationSortKey, descending: bool) {
        self.view.sort_property = property;
        self.view.sort_descending = descending;
    }

    pub fn goto_page(&mut self, page: u32) {
        self.view.set_current_page(page);
    }

    pub fn goto_allocation(&self, allocation: &Allocation) -> Transition {
        navigation::goto_allocation(allocation)
    }

    pub fn show_drain_notification(&self) -> bool {
        self.drain.show_drain_notification()
    }

    pub fn drain_phase(&self) -> DrainPhase {
        self.drain.phase()
    }

    pub fn dismiss_drain_notification(&mut self) {
        self.drain.dismiss();
    }

    /// Shared handle to the eligibility workflow, so a caller can await it
    /// without holding a borrow of the controller.
    pub fn eligibility(&self) -> Arc<EligibilityToggle<A>> {
        self.eligibility.clone()
    }

    pub fn eligibility_error(&self) -> Option<String> {
        self.eligibility.eligibility_error()
    }

    pub async fn set_eligibility(&self, eligible: bool) -> EligibilityOutcome {
        self.eligibility.set_eligibility(eligible).await
    }
}
