//! Redis implementations of the backend ports.
//!
//! Documents live in one hash per collection (`<prefix>:doc:<collection>`,
//! field = UUID, value = JSON). History lives in one list per collection
//! (`<prefix>:history:<collection>`). The two may sit on different servers.
//!
//! `MultiplexedConnection` is `Clone`; every store holds its own clone and
//! clones again per command.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use fleet_common::store_keys::{document_key, history_key};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use uuid::Uuid;

use crate::application::{DocumentStore, LogStore};

/// Writes ARGV[2] into field ARGV[1] only when the field already exists.
static REPLACE_IF_EXISTS: LazyLock<redis::Script> = LazyLock::new(|| {
    redis::Script::new(
        r"
        if redis.call('HEXISTS', KEYS[1], ARGV[1]) == 1 then
            redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
            return 1
        end
        return 0
        ",
    )
});

/// Open a multiplexed connection and verify it with `PING`.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the server is unreachable.
pub async fn connect(url: &str) -> Result<MultiplexedConnection> {
    let client = redis::Client::open(url).with_context(|| format!("invalid Redis URL {url}"))?;

    let mut conn = client
        .get_multiplexed_async_connection()
        .await
        .with_context(|| format!("failed to connect to {url}"))?;

    redis::cmd("PING")
        .query_async::<String>(&mut conn)
        .await
        .with_context(|| format!("startup PING to {url} failed"))?;

    tracing::info!("Redis connection ready");
    Ok(conn)
}

#[derive(Clone)]
pub struct RedisDocumentStore {
    conn: MultiplexedConnection,
    key: String,
}

impl RedisDocumentStore {
    #[must_use]
    pub fn new(conn: MultiplexedConnection, prefix: &str, collection: &str) -> Self {
        Self {
            conn,
            key: document_key(prefix, collection),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl DocumentStore for RedisDocumentStore {
    async fn find(&self, id: Uuid) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.hget(&self.key, id.to_string())
            .await
            .with_context(|| format!("HGET {} {id} failed", self.key))
    }

    async fn find_all(&self) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.hvals(&self.key)
            .await
            .with_context(|| format!("HVALS {} failed", self.key))
    }

    async fn insert(&self, id: Uuid, doc: String) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.hset_nx(&self.key, id.to_string(), doc)
            .await
            .with_context(|| format!("HSETNX {} {id} failed", self.key))
    }

    async fn replace(&self, id: Uuid, doc: String) -> Result<bool> {
        let mut conn = self.conn.clone();
        let written: i64 = REPLACE_IF_EXISTS
            .key(&self.key)
            .arg(id.to_string())
            .arg(doc)
            .invoke_async(&mut conn)
            .await
            .with_context(|| format!("replace script on {} {id} failed", self.key))?;
        Ok(written == 1)
    }

    async fn remove(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn
            .hdel(&self.key, id.to_string())
            .await
            .with_context(|| format!("HDEL {} {id} failed", self.key))?;
        Ok(removed > 0)
    }
}

#[derive(Clone)]
pub struct RedisLogStore {
    conn: MultiplexedConnection,
    key: String,
}

impl RedisLogStore {
    #[must_use]
    pub fn new(conn: MultiplexedConnection, prefix: &str, collection: &str) -> Self {
        Self {
            conn,
            key: history_key(prefix, collection),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl LogStore for RedisLogStore {
    async fn append(&self, entry: String) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(&self.key, entry)
            .await
            .with_context(|| format!("RPUSH {} failed", self.key))
    }

    async fn count(&self) -> Result<usize> {
        let mut conn = self.conn.clone();
        conn.llen(&self.key)
            .await
            .with_context(|| format!("LLEN {} failed", self.key))
    }

    async fn range(&self, start: usize) -> Result<Vec<String>> {
        let start = isize::try_from(start).context("history offset out of range")?;
        let mut conn = self.conn.clone();
        conn.lrange(&self.key, start, -1)
            .await
            .with_context(|| format!("LRANGE {} failed", self.key))
    }
}
