//! In-memory repository behaviour.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use fleet_common::{Agent, Identified, Task, Validate, Validator};
use fleet_server::application::Repository;
use fleet_server::infra::MemoryRepository;
use uuid::Uuid;

use crate::helpers;

#[tokio::test]
async fn task_lifecycle() {
    helpers::assert_task_lifecycle(&MemoryRepository::<Task>::new()).await;
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    helpers::assert_unknown_id_not_found(&MemoryRepository::<Task>::new()).await;
}

#[tokio::test]
async fn duplicate_add_conflicts() {
    helpers::assert_duplicate_add_conflicts(&MemoryRepository::<Task>::new()).await;
}

#[tokio::test]
async fn validation_runs_before_mutation() {
    helpers::assert_validation_before_mutation(&MemoryRepository::<Task>::new()).await;
}

#[tokio::test]
async fn get_all_is_stable_without_mutation() {
    let repo = MemoryRepository::<Task>::new();
    for _ in 0..3 {
        repo.add(helpers::task()).await.unwrap();
    }
    assert_eq!(repo.get_all().await.unwrap(), repo.get_all().await.unwrap());
}

#[tokio::test]
async fn delete_preserves_order_of_remaining() {
    let repo = MemoryRepository::<Task>::new();
    let tasks: Vec<Task> = (0..4).map(|_| helpers::task()).collect();
    for task in &tasks {
        repo.add(task.clone()).await.unwrap();
    }
    repo.delete(tasks[1].id).await.unwrap();
    assert_eq!(
        repo.get_all().await.unwrap(),
        vec![tasks[0].clone(), tasks[2].clone(), tasks[3].clone()]
    );
}

#[tokio::test]
async fn returned_entities_are_copies() {
    let repo = MemoryRepository::<Agent>::new();
    let agent = helpers::agent();
    repo.add(agent.clone()).await.unwrap();

    let mut fetched = repo.get(agent.agent_id).await.unwrap();
    fetched.tasks.clear();
    assert_eq!(repo.get(agent.agent_id).await.unwrap(), agent);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_are_all_kept() {
    const K: usize = 64;
    let repo = Arc::new(MemoryRepository::<Task>::new());

    let handles: Vec<_> = (0..K)
        .map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.add(helpers::task()).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("join").expect("add");
    }

    let mut ids: Vec<Uuid> = repo.get_all().await.unwrap().iter().map(Identified::id).collect();
    assert_eq!(ids.len(), K);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), K);
}

#[test]
fn validator_rejects_nil_agent_and_accepts_idle_one() {
    let nil = Agent::new(Uuid::nil());
    let idle = Agent::new(Uuid::new_v4());
    assert!(!Validator.is_valid(&[&nil as &dyn Validate]));
    assert!(Validator.is_valid(&[&idle as &dyn Validate]));
}
