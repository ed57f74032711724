//! Shared fixtures, failing port doubles and the repository contract
//! checks every variant must pass.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use anyhow::{Result, bail};
use fleet_common::configuration::{BaseConfig, FactorioConfig, MinecraftConfig};
use fleet_common::task::kinds;
use fleet_common::{Agent, Configuration, Task, TaskStatus};
use fleet_server::application::{LogStore, Repository};
use fleet_server::domain::{ErrorKind, RepositoryError};
use uuid::Uuid;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn task() -> Task {
    Task::new(Uuid::new_v4(), kinds::FACTORIO)
}

pub fn agent() -> Agent {
    let mut agent = Agent::new(Uuid::new_v4());
    agent.tasks.push(task());
    agent
}

pub fn factorio(agent_id: Uuid) -> Configuration {
    let mut config = FactorioConfig::new(BaseConfig::new(Uuid::new_v4(), agent_id, 34197));
    config.server.name = "fleet test".to_string();
    config.into()
}

pub fn minecraft(agent_id: Uuid) -> Configuration {
    let mut config = MinecraftConfig::new(BaseConfig::new(Uuid::new_v4(), agent_id, 25565));
    config.max_players = 20;
    config.into()
}

// ── Failing doubles ──────────────────────────────────────────────────────────

/// Log store whose every call fails, as if the history service were down.
pub struct UnreachableLog;

impl LogStore for UnreachableLog {
    async fn append(&self, _entry: String) -> Result<()> {
        bail!("connection refused")
    }
    async fn count(&self) -> Result<usize> {
        bail!("connection refused")
    }
    async fn range(&self, _start: usize) -> Result<Vec<String>> {
        bail!("connection refused")
    }
}

// ── Repository contract ──────────────────────────────────────────────────────

/// Add, get, update, delete on one task, checking every step.
pub async fn assert_task_lifecycle(repo: &impl Repository<Task>) {
    let mut task = task();
    repo.add(task.clone()).await.expect("add");
    assert_eq!(repo.get(task.id).await.expect("get after add"), task);

    task.status = TaskStatus::InProgress;
    repo.update(task.id, task.clone()).await.expect("update");
    assert_eq!(repo.get(task.id).await.expect("get after update").status, TaskStatus::InProgress);

    repo.delete(task.id).await.expect("delete");
    assert_not_found(repo.get(task.id).await.map(|_| ()), task.id);
}

/// Update and delete of an identity never added report `NotFound`.
pub async fn assert_unknown_id_not_found(repo: &impl Repository<Task>) {
    let ghost = task();
    assert_not_found(repo.update(ghost.id, ghost.clone()).await, ghost.id);
    assert_not_found(repo.delete(ghost.id).await, ghost.id);
    assert_not_found(repo.get(ghost.id).await.map(|_| ()), ghost.id);
}

/// A second add of the same identity is a conflict and changes nothing.
pub async fn assert_duplicate_add_conflicts(repo: &impl Repository<Task>) {
    let task = task();
    repo.add(task.clone()).await.expect("first add");

    let mut duplicate = task.clone();
    duplicate.kind = kinds::MINECRAFT.to_string();
    let err = repo.add(duplicate).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict, "{err}");

    assert_eq!(repo.get_all().await.expect("get_all"), vec![task]);
}

/// Invalid payloads are rejected and leave the collection untouched.
pub async fn assert_validation_before_mutation(repo: &impl Repository<Task>) {
    let invalid = Task::new(Uuid::nil(), kinds::FACTORIO);
    let err = repo.add(invalid).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation, "{err}");

    let stored = task();
    repo.add(stored.clone()).await.expect("add");
    let mut blank = stored.clone();
    blank.kind = "  ".to_string();
    let err = repo.update(stored.id, blank).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation, "{err}");

    let mut moved = stored.clone();
    moved.id = Uuid::new_v4();
    let err = repo.update(stored.id, moved).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation, "{err}");

    assert_eq!(repo.get_all().await.expect("get_all"), vec![stored]);
}

pub fn assert_not_found(result: Result<(), RepositoryError>, id: Uuid) {
    match result {
        Err(RepositoryError::NotFound(missing)) => assert_eq!(missing, id),
        other => panic!("expected NotFound({id}), got {other:?}"),
    }
}
