use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::agent::Agent;
use crate::configuration::Configuration;
use crate::store_keys::collections;
use crate::task::Task;
use crate::validate::{Identified, Validate, ValidationError};

/// A persistable record: identified, self-validating, serializable and
/// shareable across tasks.
pub trait Entity:
    Identified + Validate + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Collection name used for file names and store keys.
    const COLLECTION: &'static str;
}

impl Entity for Agent {
    const COLLECTION: &'static str = collections::AGENTS;
}

impl Entity for Task {
    const COLLECTION: &'static str = collections::TASKS;
}

impl Entity for Configuration {
    const COLLECTION: &'static str = collections::CONFIGURATIONS;
}

/// Any of the known entity kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum FleetEntity {
    Agent(Agent),
    Task(Task),
    Configuration(Configuration),
}

impl FleetEntity {
    #[must_use]
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Agent(_) => Agent::COLLECTION,
            Self::Task(_) => Task::COLLECTION,
            Self::Configuration(_) => Configuration::COLLECTION,
        }
    }
}

impl Identified for FleetEntity {
    fn id(&self) -> Uuid {
        match self {
            Self::Agent(a) => a.id(),
            Self::Task(t) => t.id(),
            Self::Configuration(c) => c.id(),
        }
    }
}

impl Validate for FleetEntity {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Agent(a) => a.validate(),
            Self::Task(t) => t.validate(),
            Self::Configuration(c) => c.validate(),
        }
    }
}

impl fmt::Display for FleetEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(a) => write!(f, "agent {a}"),
            Self::Task(t) => write!(f, "task {t}"),
            Self::Configuration(c) => write!(f, "configuration {c}"),
        }
    }
}

impl From<Agent> for FleetEntity {
    fn from(a: Agent) -> Self {
        Self::Agent(a)
    }
}

impl From<Task> for FleetEntity {
    fn from(t: Task) -> Self {
        Self::Task(t)
    }
}

impl From<Configuration> for FleetEntity {
    fn from(c: Configuration) -> Self {
        Self::Configuration(c)
    }
}
