//! Change-notifier: reports appended items, resyncs on shrink, stops on
//! shutdown.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use fleet_common::{FleetEntity, Task};
use fleet_server::application::Repository;
use fleet_server::application::services::notifier::ChangeNotifier;
use fleet_server::infra::{DualRepository, MemoryDocumentStore, MemoryLogStore, MemoryRepository};
use tokio::sync::{mpsc, watch};

use crate::helpers;

#[tokio::test]
async fn check_reports_only_new_items() {
    let repo = Arc::new(MemoryRepository::<Task>::new());
    let mut notifier = ChangeNotifier::new(Duration::from_millis(10)).track::<_, Task>(Arc::clone(&repo));

    let first = helpers::task();
    repo.add(first.clone()).await.unwrap();
    assert_eq!(notifier.check().await, vec![FleetEntity::Task(first)]);
    assert!(notifier.check().await.is_empty());

    let second = helpers::task();
    let third = helpers::task();
    repo.add(second.clone()).await.unwrap();
    repo.add(third.clone()).await.unwrap();
    assert_eq!(
        notifier.check().await,
        vec![FleetEntity::Task(second), FleetEntity::Task(third)]
    );
}

#[tokio::test]
async fn shrink_resynchronizes_without_reporting() {
    let repo = Arc::new(MemoryRepository::<Task>::new());
    let mut notifier = ChangeNotifier::new(Duration::from_millis(10)).track::<_, Task>(Arc::clone(&repo));

    let a = helpers::task();
    let b = helpers::task();
    repo.add(a.clone()).await.unwrap();
    repo.add(b.clone()).await.unwrap();
    notifier.check().await;

    repo.delete(a.id).await.unwrap();
    assert!(notifier.check().await.is_empty());

    let c = helpers::task();
    repo.add(c.clone()).await.unwrap();
    assert_eq!(notifier.check().await, vec![FleetEntity::Task(c)]);
}

#[tokio::test]
async fn dual_backend_reports_history_payloads() {
    let repo = Arc::new(DualRepository::<Task, _, _>::new(
        MemoryDocumentStore::new(),
        MemoryLogStore::new(),
    ));
    let mut notifier = ChangeNotifier::new(Duration::from_millis(10)).track::<_, Task>(Arc::clone(&repo));

    let mut task = helpers::task();
    repo.add(task.clone()).await.unwrap();
    task.status = fleet_common::TaskStatus::Executing;
    repo.update(task.id, task.clone()).await.unwrap();
    repo.delete(task.id).await.unwrap();

    let reported = notifier.check().await;
    assert_eq!(reported.len(), 2, "add and update carry payloads, delete does not");
    assert_eq!(reported[1], FleetEntity::Task(task));
    assert!(notifier.check().await.is_empty());
}

#[tokio::test]
async fn run_forwards_to_sink_and_stops_on_shutdown() {
    let repo = Arc::new(MemoryRepository::<Task>::new());
    let existing = helpers::task();
    repo.add(existing).await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let notifier = ChangeNotifier::new(Duration::from_millis(10))
        .track::<_, Task>(Arc::clone(&repo))
        .with_sink(tx);
    let handle = tokio::spawn(notifier.run(shutdown_rx));

    // Give the loop time to record the starting length.
    tokio::time::sleep(Duration::from_millis(30)).await;
    let fresh = helpers::task();
    repo.add(fresh.clone()).await.unwrap();

    let received = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("notified in time")
        .expect("sink open");
    assert_eq!(received, FleetEntity::Task(fresh), "pre-existing items are not reported");

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("notifier stops promptly")
        .expect("notifier task");
}
