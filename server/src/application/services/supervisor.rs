//! Runs the ingestion pipeline and the change-notifier side by side until a
//! stop future resolves, then flips the shutdown flag and joins all three
//! tasks. The flag is flipped even when the stop future fails, so no loop
//! outlives [`run_until`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use fleet_common::{Agent, Configuration, Task};
use tokio::sync::{mpsc, watch};

use crate::application::ports::{Observe, Repository};
use crate::application::services::fleet::Fleet;
use crate::application::services::ingest::{self, EntityGenerator, IngestStats};
use crate::application::services::notifier::ChangeNotifier;

const INGEST_QUEUE_DEPTH: usize = 64;

/// Loop periods for one [`run_until`] call.
#[derive(Debug, Clone, Copy)]
pub struct Intervals {
    pub poll: Duration,
    pub ingest: Duration,
}

/// Run the background loops until `stop` resolves.
///
/// # Errors
///
/// Returns the error of `stop` once every loop has been stopped, or an
/// error if one of the loops panicked.
pub async fn run_until<A, T, C, F>(
    fleet: Fleet<A, T, C>,
    intervals: Intervals,
    stop: F,
) -> Result<IngestStats>
where
    A: Repository<Agent> + Observe<Agent> + 'static,
    T: Repository<Task> + Observe<Task> + 'static,
    C: Repository<Configuration> + Observe<Configuration> + 'static,
    F: Future<Output = std::io::Result<()>>,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (tx, rx) = mpsc::channel(INGEST_QUEUE_DEPTH);

    let producer = tokio::spawn(ingest::produce(
        EntityGenerator::new(),
        tx,
        intervals.ingest,
        shutdown_rx.clone(),
    ));
    let consumer = tokio::spawn(ingest::consume(fleet.clone(), rx, shutdown_rx.clone()));

    let notifier = ChangeNotifier::new(intervals.poll)
        .track::<A, Agent>(Arc::clone(fleet.agents()))
        .track::<T, Task>(Arc::clone(fleet.tasks()))
        .track::<C, Configuration>(Arc::clone(fleet.configurations()));
    let notifier = tokio::spawn(notifier.run(shutdown_rx));

    let stopped = stop.await;
    match &stopped {
        Ok(()) => tracing::info!("received shutdown signal"),
        Err(e) => tracing::error!(error = %e, "stop signal failed, shutting down"),
    }
    shutdown_tx.send(true).ok();

    producer.await.context("ingestion producer panicked")?;
    let stats = consumer.await.context("ingestion consumer panicked")?;
    notifier.await.context("change notifier panicked")?;

    tracing::info!(
        ingested = stats.ingested,
        failed = stats.failed,
        "background tasks stopped",
    );

    stopped.context("failed to wait for the stop signal")?;
    Ok(stats)
}
