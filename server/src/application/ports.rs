//! Port trait definitions for the Application layer.
//!
//! Ports are the contracts that infrastructure must fulfill. Every method
//! returns a `Send` future so services generic over a port can be spawned
//! onto the runtime.

use std::future::Future;

use anyhow::Result;
use fleet_common::{Entity, HistoryRecord};
use uuid::Uuid;

use crate::domain::RepositoryError;

// ── Repository Ports ──────────────────────────────────────────────────────────

/// Current-state CRUD over one entity collection.
///
/// `add` and `update` validate before touching storage. Returned entities
/// are owned copies; mutating them does not affect stored state.
pub trait Repository<T: Entity>: Send + Sync {
    /// Look up one entity. Absence is `RepositoryError::NotFound`.
    fn get(&self, id: Uuid) -> impl Future<Output = Result<T, RepositoryError>> + Send;
    /// All entities, empty if none.
    fn get_all(&self) -> impl Future<Output = Result<Vec<T>, RepositoryError>> + Send;
    /// Insert a new entity. An identity already present is a conflict.
    fn add(&self, item: T) -> impl Future<Output = Result<(), RepositoryError>> + Send;
    /// Replace the entity stored under `id`. `item` must carry the same identity.
    fn update(
        &self,
        id: Uuid,
        item: T,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
    /// Remove the entity stored under `id`.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Chronological mutation history of one collection, oldest first.
pub trait HistorySource<T: Entity>: Send + Sync {
    fn get_history(
        &self,
    ) -> impl Future<Output = Result<Vec<HistoryRecord<T>>, RepositoryError>> + Send;
}

/// What a collection looks like past a previously observed length.
#[derive(Debug, Clone, PartialEq)]
pub struct Observed<T> {
    /// Length to remember for the next observation.
    pub len: usize,
    /// Items appended at positions `>= seen`.
    pub appended: Vec<T>,
}

impl<T> Observed<T> {
    #[must_use]
    pub fn unchanged(len: usize) -> Self {
        Self {
            len,
            appended: Vec::new(),
        }
    }
}

/// Length-diff observation used by the change notifier.
pub trait Observe<T: Entity>: Send + Sync {
    /// Report items appended since the collection had length `seen`.
    ///
    /// When the collection shrank below `seen`, nothing is reported and the
    /// current length is returned so the observer can resynchronize.
    fn observe_since(
        &self,
        seen: usize,
    ) -> impl Future<Output = Result<Observed<T>, RepositoryError>> + Send;
}

// ── Backend Ports ─────────────────────────────────────────────────────────────

/// One JSON document per entity, addressed by identity.
pub trait DocumentStore: Send + Sync {
    fn find(&self, id: Uuid) -> impl Future<Output = Result<Option<String>>> + Send;
    /// All documents in store-native order.
    fn find_all(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
    /// Store `doc` unless `id` is taken. Returns whether it was stored.
    fn insert(&self, id: Uuid, doc: String) -> impl Future<Output = Result<bool>> + Send;
    /// Overwrite the document under `id` if one exists. Returns whether it did.
    fn replace(&self, id: Uuid, doc: String) -> impl Future<Output = Result<bool>> + Send;
    /// Returns whether a document was removed.
    fn remove(&self, id: Uuid) -> impl Future<Output = Result<bool>> + Send;
}

/// A named, append-only, ordered list.
pub trait LogStore: Send + Sync {
    fn append(&self, entry: String) -> impl Future<Output = Result<()>> + Send;
    fn count(&self) -> impl Future<Output = Result<usize>> + Send;
    /// Entries from index `start` to the end, oldest first.
    fn range(&self, start: usize) -> impl Future<Output = Result<Vec<String>>> + Send;
}
