#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod agent;
pub mod configuration;
pub mod entity;
pub mod history;
pub mod metrics;
pub mod store_keys;
pub mod task;
pub mod validate;

pub use agent::{Agent, AgentStatus};
pub use configuration::{BaseConfig, Configuration, FactorioConfig, MinecraftConfig};
pub use entity::{Entity, FleetEntity};
pub use history::{HistoryAction, HistoryRecord};
pub use metrics::HostMetrics;
pub use task::{Task, TaskStatus};
pub use validate::{Identified, Validate, ValidationError, Validator};
