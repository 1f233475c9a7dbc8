use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationStatus {
    Pending,
    Running,
    Complete,
    Failed,
    Lost,
}

impl AllocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStatus::Pending => "pending",
            AllocationStatus::Running => "running",
            AllocationStatus::Complete => "complete",
            AllocationStatus::Failed => "failed",
            AllocationStatus::Lost => "lost",
        }
    }
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of scheduled work placed on a client node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: Uuid,
    pub name: String,
    pub job_id: String,
    #[serde(default)]
    pub task_group: String,
    pub client_status: AllocationStatus,
    #[serde(default)]
    pub was_preempted: bool,
    /// Raft index of the last change, the default recency ordering.
    pub modify_index: u64,
    pub create_time: DateTime<Utc>,
    pub modify_time: DateTime<Utc>,
}

impl Allocation {
    pub fn new(name: impl Into<String>, job_id: impl Into<String>, modify_index: u64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            job_id: job_id.into(),
            task_group: String::new(),
            client_status: AllocationStatus::Running,
            was_preempted: false,
            modify_index,
            create_time: now,
            modify_time: now,
        }
    }

    pub fn preempted(mut self) -> Self {
        self.was_preempted = true;
        self
    }

    /// First eight characters of the hyphenated id, as shown in tables.
    pub fn short_id(&self) -> String {
        let mut id = self.id.to_string();
        id.truncate(8);
        id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEvent {
    pub time: DateTime<Utc>,
    pub subsystem: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDriver {
    pub name: String,
    #[serde(default)]
    pub detected: bool,
    #[serde(default)]
    pub healthy: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingEligibility {
    #[default]
    Eligible,
    Ineligible,
}

impl std::fmt::Display for SchedulingEligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingEligibility::Eligible => write!(f, "eligible"),
            SchedulingEligibility::Ineligible => write!(f, "ineligible"),
        }
    }
}

/// Snapshot of a client node as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientNode {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub datacenter: String,
    #[serde(default = "default_node_status")]
    pub status: String,
    #[serde(default)]
    pub scheduling_eligibility: SchedulingEligibility,
    #[serde(default)]
    pub is_draining: bool,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    #[serde(default)]
    pub events: Vec<NodeEvent>,
    #[serde(default)]
    pub drivers: Vec<NodeDriver>,
}

fn default_node_status() -> String {
    "ready".to_string()
}

impl ClientNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            datacenter: "dc1".to_string(),
            status: default_node_status(),
            scheduling_eligibility: SchedulingEligibility::Eligible,
            is_draining: false,
            allocations: Vec::new(),
            events: Vec::new(),
            drivers: Vec::new(),
        }
    }

    pub fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.allocations.push(allocation);
        self
    }

    pub fn short_id(&self) -> String {
        let mut id = self.id.to_string();
        id.truncate(8);
        id
    }

    pub fn is_eligible(&self) -> bool {
        self.scheduling_eligibility == SchedulingEligibility::Eligible
    }
}
