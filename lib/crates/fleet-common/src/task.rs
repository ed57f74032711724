use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{Identified, Validate, ValidationError, require_id, require_non_empty};

/// Task type tags. A task's type selects the configuration schema it runs with.
pub mod kinds {
    pub const FACTORIO: &str = "factorio";
    pub const MINECRAFT: &str = "minecraft";
}

/// Lifecycle status of a task.
///
/// Variants are declared in lifecycle order so the derived `Ord` reflects
/// progress: `Queued` is initial, `Done` and `Error` are terminal.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Queued,
    InProgress,
    Executing,
    Done,
    Error,
}

impl TaskStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Forward-only: a task never moves back in its lifecycle and never
    /// leaves a terminal state.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        !self.is_terminal() && next > self
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Executing => "executing",
            Self::Done => "done",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// A unit of work executed by an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Task {
    #[must_use]
    pub fn new(id: Uuid, kind: impl Into<String>) -> Self {
        Self {
            id,
            status: TaskStatus::Queued,
            kind: kind.into(),
        }
    }
}

impl Identified for Task {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for Task {
    fn validate(&self) -> Result<(), ValidationError> {
        require_id("id", self.id)?;
        require_non_empty("type", &self.kind)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}, {}, {}", self.id.to_string(), self.status, self.kind)
    }
}
