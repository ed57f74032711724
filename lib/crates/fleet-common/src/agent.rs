use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::HostMetrics;
use crate::task::Task;
use crate::validate::{Identified, Validate, ValidationError, require_id};

/// Coarse agent state code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Idle,
    Busy,
    Offline,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Busy => "busy",
            Self::Offline => "offline",
        };
        f.write_str(s)
    }
}

/// A remote worker process and the tasks currently assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    pub agent_id: Uuid,
    #[serde(default)]
    pub status: AgentStatus,
    /// Assigned tasks, held by value.
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub metrics: HostMetrics,
}

impl Agent {
    #[must_use]
    pub fn new(agent_id: Uuid) -> Self {
        Self {
            agent_id,
            status: AgentStatus::Idle,
            tasks: Vec::new(),
            metrics: HostMetrics::default(),
        }
    }
}

impl Identified for Agent {
    fn id(&self) -> Uuid {
        self.agent_id
    }
}

impl Validate for Agent {
    fn validate(&self) -> Result<(), ValidationError> {
        require_id("agent_id", self.agent_id)?;
        for task in &self.tasks {
            task.validate().map_err(|e| ValidationError::InvalidValue {
                field: "tasks",
                reason: e.to_string(),
            })?;
        }
        self.metrics.check()
    }
}

// "<id>", <status>
impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}, {}", self.agent_id.to_string(), self.status)
    }
}
