//! File-backed repository.
//!
//! The in-memory collection is the cache; after every successful mutation
//! the whole collection is written to `<dir>/<collection>.json` as one JSON
//! array (temp file + rename). The write lock is held across the file
//! write, so mutations never race on the file.
//!
//! A failed write is reported as `RepositoryError::Internal`, but the
//! in-memory mutation stands: memory and disk may differ until the next
//! successful write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fleet_common::Entity;
use fleet_common::store_keys::snapshot_file_name;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::{Observe, Observed, Repository};
use crate::domain::RepositoryError;
use crate::infra::collection;

pub struct FileRepository<T> {
    items: RwLock<Vec<T>>,
    path: PathBuf,
}

impl<T: Entity> FileRepository<T> {
    /// Open the snapshot for `T::COLLECTION` under `dir`.
    ///
    /// A missing file is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is empty, or the file exists but cannot be
    /// read or parsed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() {
            return Err(RepositoryError::Internal(anyhow::anyhow!(
                "data directory has to be set"
            )));
        }
        let path = dir.join(snapshot_file_name(T::COLLECTION));
        let items = load_snapshot(&path).map_err(RepositoryError::Internal)?;
        tracing::info!(
            collection = T::COLLECTION,
            path = %path.display(),
            count = items.len(),
            "loaded snapshot",
        );
        Ok(Self {
            items: RwLock::new(items),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `items` and overwrite the snapshot. Called with the write
    /// lock held.
    async fn persist(&self, items: &[T]) -> Result<(), RepositoryError> {
        let content = serde_json::to_vec(items)
            .context("serializing collection")
            .map_err(RepositoryError::Internal)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || save_snapshot(&path, &content))
            .await
            .context("snapshot write task panicked")
            .and_then(|r| r)
            .map_err(|e| {
                tracing::warn!(
                    collection = T::COLLECTION,
                    error = %format!("{e:#}"),
                    "snapshot write failed; memory and disk now differ",
                );
                RepositoryError::Internal(e)
            })
    }
}

impl<T: Entity> Repository<T> for FileRepository<T> {
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
        let id = item.id();
        items.push(item);
        self.persist(&items).await?;
        tracing::debug!(collection = T::COLLECTION, %id, "added");
        Ok(())
    }

    async fn update(&self, id: Uuid, item: T) -> Result<(), RepositoryError> {
        collection::check_update(id, &item)?;
        let mut items = self.items.write().await;
        collection::replace(&mut items, id, item)?;
        self.persist(&items).await?;
        tracing::debug!(collection = T::COLLECTION, %id, "updated");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut items = self.items.write().await;
        collection::remove(&mut items, id)?;
        self.persist(&items).await?;
        tracing::debug!(collection = T::COLLECTION, %id, "deleted");
        Ok(())
    }
}

impl<T: Entity> Observe<T> for FileRepository<T> {
    async fn observe_since(&self, seen: usize) -> Result<Observed<T>, RepositoryError> {
        let items = self.items.read().await;
        Ok(collection::since(&items, seen))
    }
}

fn load_snapshot<T: Entity>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&content)
        .with_context(|| format!("parsing snapshot {}", path.display()))
}

fn save_snapshot(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, content)
        .with_context(|| format!("writing temp file {}", temp_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
    }

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("finalizing snapshot {}", path.display()))?;
    Ok(())
}
