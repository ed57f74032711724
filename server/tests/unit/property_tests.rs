//! Property tests over random operation sequences.
//!
//! Every repository variant must agree with a plain ordered model, and the
//! dual backend must log exactly one record per successful mutation.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use fleet_common::task::kinds;
use fleet_common::{HistoryAction, Task, TaskStatus};
use fleet_server::application::{HistorySource, Repository};
use fleet_server::domain::ErrorKind;
use fleet_server::infra::{
    DualRepository, FileRepository, MemoryDocumentStore, MemoryLogStore, MemoryRepository,
};
use proptest::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Update(usize, TaskStatus),
    Delete(usize),
}

const SLOTS: usize = 4;

fn status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Queued),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Executing),
        Just(TaskStatus::Done),
        Just(TaskStatus::Error),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..SLOTS).prop_map(Op::Add),
        ((0..SLOTS), status()).prop_map(|(slot, s)| Op::Update(slot, s)),
        (0..SLOTS).prop_map(Op::Delete),
    ]
}

/// Apply `ops` to both `repo` and an ordered model, checking each outcome.
/// Returns the `(action, id)` of every mutation that succeeded.
async fn run_against_model(
    repo: &impl Repository<Task>,
    ids: &[Uuid],
    ops: &[Op],
) -> Vec<(HistoryAction, Uuid)> {
    let mut model: Vec<Task> = Vec::new();
    let mut applied = Vec::new();

    for op in ops {
        match *op {
            Op::Add(slot) => {
                let task = Task::new(ids[slot], kinds::FACTORIO);
                let result = repo.add(task.clone()).await;
                if model.iter().any(|t| t.id == task.id) {
                    assert_eq!(result.unwrap_err().kind(), ErrorKind::Conflict);
                } else {
                    result.unwrap();
                    model.push(task);
                    applied.push((HistoryAction::Add, ids[slot]));
                }
            }
            Op::Update(slot, status) => {
                let mut task = Task::new(ids[slot], kinds::FACTORIO);
                task.status = status;
                let result = repo.update(task.id, task.clone()).await;
                match model.iter_mut().find(|t| t.id == task.id) {
                    Some(stored) => {
                        result.unwrap();
                        *stored = task;
                        applied.push((HistoryAction::Update, ids[slot]));
                    }
                    None => assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound),
                }
            }
            Op::Delete(slot) => {
                let result = repo.delete(ids[slot]).await;
                match model.iter().position(|t| t.id == ids[slot]) {
                    Some(index) => {
                        result.unwrap();
                        model.remove(index);
                        applied.push((HistoryAction::Delete, ids[slot]));
                    }
                    None => assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound),
                }
            }
        }
    }

    let mut stored = repo.get_all().await.unwrap();
    stored.sort_by_key(|t| t.id);
    model.sort_by_key(|t| t.id);
    assert_eq!(stored, model);
    applied
}

fn slot_ids() -> Vec<Uuid> {
    (0..SLOTS).map(|_| Uuid::new_v4()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_memory_repository_matches_model(ops in proptest::collection::vec(op(), 0..24)) {
        let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
        rt.block_on(async {
            let repo = MemoryRepository::<Task>::new();
            run_against_model(&repo, &slot_ids(), &ops).await;
        });
    }

    #[test]
    fn prop_file_repository_survives_reopen(ops in proptest::collection::vec(op(), 0..16)) {
        let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
        rt.block_on(async {
            let dir = tempfile::TempDir::new().expect("tempdir");
            let repo = FileRepository::<Task>::open(dir.path()).expect("open");
            run_against_model(&repo, &slot_ids(), &ops).await;

            let reopened = FileRepository::<Task>::open(dir.path()).expect("reopen");
            assert_eq!(reopened.get_all().await.unwrap(), repo.get_all().await.unwrap());
        });
    }

    #[test]
    fn prop_dual_history_has_one_record_per_mutation(ops in proptest::collection::vec(op(), 0..24)) {
        let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
        rt.block_on(async {
            let repo = DualRepository::<Task, _, _>::new(
                MemoryDocumentStore::new(),
                MemoryLogStore::new(),
            );
            let applied = run_against_model(&repo, &slot_ids(), &ops).await;

            let history: Vec<_> = repo
                .get_history()
                .await
                .unwrap()
                .into_iter()
                .map(|r| (r.action, r.id))
                .collect();
            assert_eq!(history, applied);
        });
    }

    #[test]
    fn prop_nil_id_never_stored(kind in "[a-z]{1,12}") {
        let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
        rt.block_on(async {
            let repo = MemoryRepository::<Task>::new();
            let err = repo.add(Task::new(Uuid::nil(), kind)).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert!(repo.get_all().await.unwrap().is_empty());
        });
    }
}
