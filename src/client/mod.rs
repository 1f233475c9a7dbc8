pub mod controller;
pub mod drain;
pub mod eligibility;
pub mod model;
pub mod navigation;
pub mod pipeline;
pub mod view_state;

pub use controller::ClientController;
pub use drain::{DrainNotification, DrainPhase};
pub use eligibility::{EligibilityOutcome, EligibilityToggle};
pub use model::{
    Allocation, AllocationStatus, ClientNode, NodeDriver, NodeEvent, SchedulingEligibility,
};
pub use navigation::Transition;
pub use view_state::{AllocationSortKey, ClientQuery, ViewState};
