//! Dual-backend repository: current state in a [`DocumentStore`], every
//! successful mutation mirrored as a [`HistoryRecord`] into a [`LogStore`].
//!
//! The two writes are not atomic. History is appended only after the
//! document write succeeds; if the append then fails the caller gets
//! [`RepositoryError::HistoryAppend`] and the document change stands.

use std::marker::PhantomData;

use anyhow::Context;
use fleet_common::{Entity, HistoryRecord};
use uuid::Uuid;

use crate::application::{DocumentStore, HistorySource, LogStore, Observe, Observed, Repository};
use crate::domain::RepositoryError;
use crate::infra::collection;

pub struct DualRepository<T, D, L> {
    documents: D,
    log: L,
    _entity: PhantomData<fn() -> T>,
}

impl<T, D, L> DualRepository<T, D, L>
where
    T: Entity,
    D: DocumentStore,
    L: LogStore,
{
    #[must_use]
    pub fn new(documents: D, log: L) -> Self {
        Self {
            documents,
            log,
            _entity: PhantomData,
        }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    async fn record(&self, record: HistoryRecord<T>) -> Result<(), RepositoryError> {
        let (id, action) = (record.id, record.action);
        let appended = match serde_json::to_string(&record) {
            Ok(entry) => self.log.append(entry).await,
            Err(e) => Err(anyhow::Error::new(e).context("serializing history record")),
        };
        appended.map_err(|cause| {
            tracing::warn!(
                collection = T::COLLECTION,
                %id,
                %action,
                error = %format!("{cause:#}"),
                "mutation applied but history append failed",
            );
            RepositoryError::HistoryAppend { id, action, cause }
        })
    }
}

fn encode<T: Entity>(item: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(item)
        .with_context(|| format!("serializing {} {}", T::COLLECTION, item.id()))
        .map_err(RepositoryError::Internal)
}

fn decode<T: Entity>(doc: &str) -> Result<T, RepositoryError> {
    serde_json::from_str(doc)
        .with_context(|| format!("decoding {} document", T::COLLECTION))
        .map_err(RepositoryError::Internal)
}

impl<T, D, L> Repository<T> for DualRepository<T, D, L>
where
    T: Entity,
    D: DocumentStore,
    L: LogStore,
{
    async fn get(&self, id: Uuid) -> Result<T, RepositoryError> {
        match self.documents.find(id).await.map_err(RepositoryError::Internal)? {
            Some(doc) => decode(&doc),
            None => Err(RepositoryError::NotFound(id)),
        }
    }

    async fn get_all(&self) -> Result<Vec<T>, RepositoryError> {
        self.documents
            .find_all()
            .await
            .map_err(RepositoryError::Internal)?
            .iter()
            .map(|doc| decode(doc))
            .collect()
    }

    async fn add(&self, item: T) -> Result<(), RepositoryError> {
        collection::check_add(&[], &item)?;
        let id = item.id();
        let doc = encode(&item)?;
        if !self.documents.insert(id, doc).await.map_err(RepositoryError::Internal)? {
            return Err(RepositoryError::Conflict(id));
        }
        tracing::debug!(collection = T::COLLECTION, %id, "added");
        self.record(HistoryRecord::added(item)).await
    }

    async fn update(&self, id: Uuid, item: T) -> Result<(), RepositoryError> {
        collection::check_update(id, &item)?;
        let doc = encode(&item)?;
        if !self.documents.replace(id, doc).await.map_err(RepositoryError::Internal)? {
            return Err(RepositoryError::NotFound(id));
        }
        tracing::debug!(collection = T::COLLECTION, %id, "updated");
        self.record(HistoryRecord::updated(item)).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        if !self.documents.remove(id).await.map_err(RepositoryError::Internal)? {
            return Err(RepositoryError::NotFound(id));
        }
        tracing::debug!(collection = T::COLLECTION, %id, "deleted");
        self.record(HistoryRecord::deleted(id)).await
    }
}

fn parse_records<T: Entity>(
    offset: usize,
    raw: &[String],
) -> Result<Vec<HistoryRecord<T>>, RepositoryError> {
    raw.iter()
        .enumerate()
        .map(|(i, entry)| {
            serde_json::from_str(entry)
                .with_context(|| {
                    format!("malformed history record {} in {}", offset + i, T::COLLECTION)
                })
                .map_err(RepositoryError::Internal)
        })
        .collect()
}

impl<T, D, L> HistorySource<T> for DualRepository<T, D, L>
where
    T: Entity,
    D: DocumentStore,
    L: LogStore,
{
    async fn get_history(&self) -> Result<Vec<HistoryRecord<T>>, RepositoryError> {
        let raw = self.log.range(0).await.map_err(RepositoryError::Internal)?;
        parse_records(0, &raw)
    }
}

/// Observes the history list: each appended `add` or `update` record
/// reports its payload. Delete tombstones advance the count silently.
impl<T, D, L> Observe<T> for DualRepository<T, D, L>
where
    T: Entity,
    D: DocumentStore,
    L: LogStore,
{
    async fn observe_since(&self, seen: usize) -> Result<Observed<T>, RepositoryError> {
        let len = self.log.count().await.map_err(RepositoryError::Internal)?;
        if len <= seen {
            return Ok(Observed::unchanged(len));
        }
        let raw = self.log.range(seen).await.map_err(RepositoryError::Internal)?;
        let records = parse_records::<T>(seen, &raw)?;
        Ok(Observed {
            len: seen + raw.len(),
            appended: records.into_iter().filter_map(|r| r.data).collect(),
        })
    }
}
