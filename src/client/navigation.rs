use serde::Serialize;
use uuid::Uuid;

use crate::client::model::Allocation;

/// Route change requested by the client page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route")]
pub enum Transition {
    #[serde(rename = "allocations.allocation")]
    Allocation { alloc_id: Uuid },
}

impl Transition {
    pub fn route_name(&self) -> &'static str {
        match self {
            Transition::Allocation { .. } => "allocations.allocation",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Transition::Allocation { alloc_id } => format!("/allocations/{}", alloc_id),
        }
    }
}

pub fn goto_allocation(allocation: &Allocation) -> Transition {
    Transition::Allocation {
        alloc_id: allocation.id,
    }
}
