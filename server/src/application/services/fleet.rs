//! Routes a [`FleetEntity`] into the repository for its kind.

use std::sync::Arc;

use fleet_common::{Agent, Configuration, FleetEntity, Identified, Task};

use crate::application::ports::Repository;
use crate::domain::RepositoryError;

/// One repository per entity kind, shared across tasks.
pub struct Fleet<A, T, C> {
    agents: Arc<A>,
    tasks: Arc<T>,
    configurations: Arc<C>,
}

impl<A, T, C> Clone for Fleet<A, T, C> {
    fn clone(&self) -> Self {
        Self {
            agents: Arc::clone(&self.agents),
            tasks: Arc::clone(&self.tasks),
            configurations: Arc::clone(&self.configurations),
        }
    }
}

impl<A, T, C> Fleet<A, T, C>
where
    A: Repository<Agent>,
    T: Repository<Task>,
    C: Repository<Configuration>,
{
    #[must_use]
    pub fn new(agents: A, tasks: T, configurations: C) -> Self {
        Self {
            agents: Arc::new(agents),
            tasks: Arc::new(tasks),
            configurations: Arc::new(configurations),
        }
    }

    #[must_use]
    pub fn agents(&self) -> &Arc<A> {
        &self.agents
    }

    #[must_use]
    pub fn tasks(&self) -> &Arc<T> {
        &self.tasks
    }

    #[must_use]
    pub fn configurations(&self) -> &Arc<C> {
        &self.configurations
    }

    /// Add `entity` to the repository matching its kind.
    ///
    /// # Errors
    ///
    /// Propagates the repository's error unchanged.
    pub async fn ingest(&self, entity: FleetEntity) -> Result<(), RepositoryError> {
        let (collection, id) = (entity.collection(), entity.id());
        match entity {
            FleetEntity::Agent(agent) => self.agents.add(agent).await?,
            FleetEntity::Task(task) => self.tasks.add(task).await?,
            FleetEntity::Configuration(config) => self.configurations.add(config).await?,
        }
        tracing::debug!(collection, %id, "ingested");
        Ok(())
    }
}
