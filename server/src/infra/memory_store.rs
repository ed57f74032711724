//! In-process implementations of the backend ports.
//!
//! Back the `dual-memory` backend and the integration tests. Documents keep
//! insertion order; the log is a plain `Vec`.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use uuid::Uuid;

use crate::application::{DocumentStore, LogStore};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| anyhow!("in-memory store lock poisoned"))
}

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: Mutex<Vec<(Uuid, String)>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, id: Uuid) -> Result<Option<String>> {
        let docs = lock(&self.docs)?;
        Ok(docs.iter().find(|(k, _)| *k == id).map(|(_, d)| d.clone()))
    }

    async fn find_all(&self) -> Result<Vec<String>> {
        let docs = lock(&self.docs)?;
        Ok(docs.iter().map(|(_, d)| d.clone()).collect())
    }

    async fn insert(&self, id: Uuid, doc: String) -> Result<bool> {
        let mut docs = lock(&self.docs)?;
        if docs.iter().any(|(k, _)| *k == id) {
            return Ok(false);
        }
        docs.push((id, doc));
        Ok(true)
    }

    async fn replace(&self, id: Uuid, doc: String) -> Result<bool> {
        let mut docs = lock(&self.docs)?;
        match docs.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => {
                slot.1 = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<bool> {
        let mut docs = lock(&self.docs)?;
        let before = docs.len();
        docs.retain(|(k, _)| *k != id);
        Ok(docs.len() != before)
    }
}

#[derive(Debug, Default)]
pub struct MemoryLogStore {
    entries: Mutex<Vec<String>>,
}

impl MemoryLogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw entries, bypassing record serialization.
    #[must_use]
    pub fn with_entries(entries: Vec<String>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl LogStore for MemoryLogStore {
    async fn append(&self, entry: String) -> Result<()> {
        lock(&self.entries)?.push(entry);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(lock(&self.entries)?.len())
    }

    async fn range(&self, start: usize) -> Result<Vec<String>> {
        let entries = lock(&self.entries)?;
        Ok(entries.get(start..).map(<[String]>::to_vec).unwrap_or_default())
    }
}
