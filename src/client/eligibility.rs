use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::adapter::NodeAdapter;
use crate::error::message_from_adapter_error;

pub const DEFAULT_ELIGIBILITY_ERROR: &str = "Could not set eligibility";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityOutcome {
    /// The data source accepted the change.
    Applied,
    /// The data source rejected the change; the message is also kept as
    /// the current eligibility error.
    Failed(String),
    /// Another request was still in flight, nothing was sent.
    Dropped,
}

impl EligibilityOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EligibilityOutcome::Applied => "applied",
            EligibilityOutcome::Failed(_) => "failed",
            EligibilityOutcome::Dropped => "dropped",
        }
    }
}

/// Resets the in-flight flag when the request finishes or its future is
/// dropped mid-flight.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Single-flight eligibility toggle for one node.
///
/// While a request is pending, further calls return
/// [`EligibilityOutcome::Dropped`] immediately; they are never queued.
pub struct EligibilityToggle<A: NodeAdapter> {
    adapter: Arc<A>,
    node_id: Uuid,
    in_flight: AtomicBool,
    error: Mutex<Option<String>>,
}

impl<A: NodeAdapter> EligibilityToggle<A> {
    pub fn new(adapter: Arc<A>, node_id: Uuid) -> Self {
        Self {
            adapter,
            node_id,
            in_flight: AtomicBool::new(false),
            error: Mutex::new(None),
        }
    }

    pub fn node_id(&self) -> Uuid {
        self.node_id
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Message from the last failed request, cleared by the next success.
    pub fn eligibility_error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    fn set_error(&self, error: Option<String>) {
        *self
            .error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = error;
    }

    /// Ask the data source to mark the node eligible (`true`) or
    /// ineligible (`false`). Failures are captured, never returned.
    pub async fn set_eligibility(&self, eligible: bool) -> EligibilityOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(node_id = %self.node_id, eligible, "Eligibility change already in flight, dropping");
            return EligibilityOutcome::Dropped;
        }
        let _guard = InFlightGuard(&self.in_flight);

        tracing::info!(node_id = %self.node_id, eligible, "Setting node eligibility");
        let result = if eligible {
            self.adapter.set_eligible(self.node_id).await
        } else {
            self.adapter.set_ineligible(self.node_id).await
        };

        match result {
            Ok(()) => {
                self.set_error(None);
                EligibilityOutcome::Applied
            }
            Err(e) => {
                let message = message_from_adapter_error(&e)
                    .unwrap_or_else(|| DEFAULT_ELIGIBILITY_ERROR.to_string());
                tracing::warn!(node_id = %self.node_id, eligible, error = %e, "Failed to set node eligibility");
                self.set_error(Some(message.clone()));
                EligibilityOutcome::Failed(message)
            }
        }
    }
}
