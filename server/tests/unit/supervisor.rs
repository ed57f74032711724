//! Supervisor: background loops start together and always stop together.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io;
use std::time::Duration;

use fleet_common::{Agent, Configuration, Task};
use fleet_server::application::Repository;
use fleet_server::application::services::fleet::Fleet;
use fleet_server::application::services::supervisor::{self, Intervals};
use fleet_server::infra::MemoryRepository;

type MemoryFleet =
    Fleet<MemoryRepository<Agent>, MemoryRepository<Task>, MemoryRepository<Configuration>>;

const FAST: Intervals = Intervals {
    poll: Duration::from_millis(5),
    ingest: Duration::from_millis(5),
};

fn fleet() -> MemoryFleet {
    Fleet::new(MemoryRepository::new(), MemoryRepository::new(), MemoryRepository::new())
}

async fn until_configuration_ingested(fleet: &MemoryFleet) {
    while fleet.configurations().get_all().await.unwrap().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

async fn total(fleet: &MemoryFleet) -> usize {
    fleet.agents().get_all().await.unwrap().len()
        + fleet.tasks().get_all().await.unwrap().len()
        + fleet.configurations().get_all().await.unwrap().len()
}

#[tokio::test]
async fn stops_loops_and_reports_stats_on_signal() {
    let fleet = fleet();
    let watched = fleet.clone();
    let stop = async move {
        until_configuration_ingested(&watched).await;
        Ok(())
    };

    let stats = tokio::time::timeout(
        Duration::from_secs(2),
        supervisor::run_until(fleet.clone(), FAST, stop),
    )
    .await
    .expect("supervisor returns after the signal")
    .expect("clean shutdown");

    assert_eq!(stats.failed, 0);
    assert!(stats.ingested >= 3);
    assert_eq!(u64::try_from(total(&fleet).await).unwrap(), stats.ingested);
}

#[tokio::test]
async fn failed_stop_signal_still_stops_every_loop() {
    let fleet = fleet();
    let watched = fleet.clone();
    let stop = async move {
        until_configuration_ingested(&watched).await;
        Err(io::Error::other("signal handler unavailable"))
    };

    let err = tokio::time::timeout(
        Duration::from_secs(2),
        supervisor::run_until(fleet.clone(), FAST, stop),
    )
    .await
    .expect("supervisor returns after the failed signal")
    .unwrap_err();
    assert!(format!("{err:#}").contains("signal handler unavailable"), "{err:#}");

    let after_return = total(&fleet).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(total(&fleet).await, after_return, "ingestion kept running");
}
