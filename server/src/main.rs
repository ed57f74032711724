//! fleetd entry point.
//!
//! Initialises tracing, loads configuration from `FLEET_*` environment
//! variables, builds the repositories for the selected backend, then runs
//! the ingestion pipeline and the change-notifier until Ctrl-C.

use anyhow::{Context, Result};
use fleet_common::{Agent, Configuration, Task};
use fleet_common::store_keys::collections;
use tracing_subscriber::EnvFilter;

use fleet_server::application::services::fleet::Fleet;
use fleet_server::application::services::history::HistoryReader;
use fleet_server::application::services::supervisor::{self, Intervals};
use fleet_server::application::{HistorySource, Observe, Repository};
use fleet_server::config::{Backend, Config};
use fleet_server::infra::redis_store;
use fleet_server::infra::{
    DualRepository, FileRepository, MemoryDocumentStore, MemoryLogStore, MemoryRepository,
    RedisDocumentStore, RedisLogStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("fleetd starting");

    let config = Config::from_env()?;

    tracing::info!(
        backend = %config.backend,
        data_dir = %config.data_dir.display(),
        key_prefix = %config.key_prefix,
        poll_interval_ms = config.poll_interval_ms,
        ingest_interval_ms = config.ingest_interval_ms,
        "configuration loaded",
    );

    match config.backend {
        Backend::Memory => {
            let fleet = Fleet::new(
                MemoryRepository::<Agent>::new(),
                MemoryRepository::<Task>::new(),
                MemoryRepository::<Configuration>::new(),
            );
            run(fleet, &config).await?;
        }
        Backend::File => {
            let dir = &config.data_dir;
            let fleet = Fleet::new(
                FileRepository::<Agent>::open(dir).context("opening agents snapshot")?,
                FileRepository::<Task>::open(dir).context("opening tasks snapshot")?,
                FileRepository::<Configuration>::open(dir)
                    .context("opening configurations snapshot")?,
            );
            run(fleet, &config).await?;
        }
        Backend::DualMemory => {
            let fleet = Fleet::new(
                DualRepository::<Agent, _, _>::new(MemoryDocumentStore::new(), MemoryLogStore::new()),
                DualRepository::<Task, _, _>::new(MemoryDocumentStore::new(), MemoryLogStore::new()),
                DualRepository::<Configuration, _, _>::new(
                    MemoryDocumentStore::new(),
                    MemoryLogStore::new(),
                ),
            );
            run(fleet.clone(), &config).await?;
            log_history(&fleet).await?;
        }
        Backend::Redis => {
            let documents = redis_store::connect(&config.document_url)
                .await
                .context("failed to initialise document store connection")?;
            let log = redis_store::connect(&config.log_url)
                .await
                .context("failed to initialise log store connection")?;

            let prefix = config.key_prefix.as_str();
            let dual = |collection: &str| {
                (
                    RedisDocumentStore::new(documents.clone(), prefix, collection),
                    RedisLogStore::new(log.clone(), prefix, collection),
                )
            };
            let (agent_docs, agent_log) = dual(collections::AGENTS);
            let (task_docs, task_log) = dual(collections::TASKS);
            let (config_docs, config_log) = dual(collections::CONFIGURATIONS);

            let fleet = Fleet::new(
                DualRepository::<Agent, _, _>::new(agent_docs, agent_log),
                DualRepository::<Task, _, _>::new(task_docs, task_log),
                DualRepository::<Configuration, _, _>::new(config_docs, config_log),
            );
            run(fleet.clone(), &config).await?;
            log_history(&fleet).await?;
        }
    }

    tracing::info!("fleetd shut down");
    Ok(())
}

/// Run the background loops until Ctrl-C, then stop them and wait.
async fn run<A, T, C>(fleet: Fleet<A, T, C>, config: &Config) -> Result<()>
where
    A: Repository<Agent> + Observe<Agent> + 'static,
    T: Repository<Task> + Observe<Task> + 'static,
    C: Repository<Configuration> + Observe<Configuration> + 'static,
{
    let intervals = Intervals {
        poll: config.poll_interval(),
        ingest: config.ingest_interval(),
    };
    supervisor::run_until(fleet, intervals, tokio::signal::ctrl_c()).await?;
    Ok(())
}

async fn log_history<A, T, C>(fleet: &Fleet<A, T, C>) -> Result<()>
where
    A: Repository<Agent> + HistorySource<Agent>,
    T: Repository<Task> + HistorySource<Task>,
    C: Repository<Configuration> + HistorySource<Configuration>,
{
    let agents = HistoryReader::new(fleet.agents().as_ref())
        .records::<Agent>()
        .await
        .context("reading agent history")?;
    let tasks = HistoryReader::new(fleet.tasks().as_ref())
        .records::<Task>()
        .await
        .context("reading task history")?;
    let configurations = HistoryReader::new(fleet.configurations().as_ref())
        .records::<Configuration>()
        .await
        .context("reading configuration history")?;

    tracing::info!(
        agents = agents.len(),
        tasks = tasks.len(),
        configurations = configurations.len(),
        "history records",
    );
    Ok(())
}
