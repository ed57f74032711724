//! In-process repository: an ordered `Vec` behind a read/write lock.
//!
//! Nothing survives a restart. Backs the `memory` backend and the tests.

use fleet_common::Entity;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::{Observe, Observed, Repository};
use crate::domain::RepositoryError;
use crate::infra::collection;

pub struct MemoryRepository<T> {
    items: RwLock<Vec<T>>,
}

impl<T: Entity> MemoryRepository<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn get(&self, id: Uuid) -> Result<T, RepositoryError> {
        let items = self.items.read().await;
        collection::find(&items, id)
    }

    async fn get_all(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.items.read().await.clone())
    }

    async fn add(&self, item: T) -> Result<(), RepositoryError> {
        let mut items = self.items.write().await;
        collection::check_add(&items, &item)?;
        tracing::debug!(collection = T::COLLECTION, id = %item.id(), "added");
        items.push(item);
        Ok(())
    }

    async fn update(&self, id: Uuid, item: T) -> Result<(), RepositoryError> {
        collection::check_update(id, &item)?;
        let mut items = self.items.write().await;
        collection::replace(&mut items, id, item)?;
        tracing::debug!(collection = T::COLLECTION, %id, "updated");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut items = self.items.write().await;
        collection::remove(&mut items, id)?;
        tracing::debug!(collection = T::COLLECTION, %id, "deleted");
        Ok(())
    }
}

impl<T: Entity> Observe<T> for MemoryRepository<T> {
    async fn observe_since(&self, seen: usize) -> Result<Observed<T>, RepositoryError> {
        let items = self.items.read().await;
        Ok(collection::since(&items, seen))
    }
}
