//! Background ingestion pipeline.
//!
//! [`produce`] emits a synthesized entity every interval into a bounded
//! channel; [`consume`] routes each one through [`Fleet::ingest`]. Both
//! loops stop when the shutdown flag flips to `true`.

use std::time::Duration;

use fleet_common::configuration::{BaseConfig, FactorioConfig, MinecraftConfig};
use fleet_common::task::kinds;
use fleet_common::{Agent, Configuration, FleetEntity, HostMetrics, Task};
use tokio::sync::{mpsc, watch};
use tokio::time::{MissedTickBehavior, interval};
use uuid::Uuid;

use crate::application::ports::Repository;
use crate::application::services::fleet::Fleet;

const FACTORIO_PORT: u16 = 34197;
const MINECRAFT_PORT: u16 = 25565;
const MINECRAFT_RCON_PORT: u16 = 25575;

/// Endless, deterministic cycle of fresh entities: agent, task,
/// configuration, repeat. Configurations are owned by the last agent
/// generated and alternate between Factorio and Minecraft.
#[derive(Debug, Default)]
pub struct EntityGenerator {
    emitted: u64,
    last_agent: Option<Uuid>,
}

impl EntityGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn agent(&mut self) -> FleetEntity {
        let mut agent = Agent::new(Uuid::new_v4());
        agent.metrics = HostMetrics {
            cpu_usage: 12.5,
            ram_available: 1_000_000,
            ram_total: 3_000_000,
        };
        self.last_agent = Some(agent.agent_id);
        agent.into()
    }

    fn task(&self) -> FleetEntity {
        let kind = if self.round() % 2 == 0 {
            kinds::FACTORIO
        } else {
            kinds::MINECRAFT
        };
        Task::new(Uuid::new_v4(), kind).into()
    }

    fn configuration(&self) -> FleetEntity {
        let owner = self.last_agent.unwrap_or_else(Uuid::new_v4);
        let config: Configuration = if self.round() % 2 == 0 {
            FactorioConfig::new(BaseConfig::new(Uuid::new_v4(), owner, FACTORIO_PORT)).into()
        } else {
            let mut minecraft =
                MinecraftConfig::new(BaseConfig::new(Uuid::new_v4(), owner, MINECRAFT_PORT));
            minecraft.server_name = "fleet server".to_string();
            minecraft.max_players = 64;
            minecraft.rcon_port = MINECRAFT_RCON_PORT;
            minecraft.into()
        };
        config.into()
    }

    fn round(&self) -> u64 {
        self.emitted / 3
    }
}

impl Iterator for EntityGenerator {
    type Item = FleetEntity;

    fn next(&mut self) -> Option<FleetEntity> {
        let entity = match self.emitted % 3 {
            0 => self.agent(),
            1 => self.task(),
            _ => self.configuration(),
        };
        self.emitted += 1;
        Some(entity)
    }
}

/// Outcome of a [`consume`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub ingested: u64,
    pub failed: u64,
}

/// Send one generated entity per tick until shutdown or the consumer goes
/// away.
pub async fn produce<I>(
    mut source: I,
    tx: mpsc::Sender<FleetEntity>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    I: Iterator<Item = FleetEntity> + Send,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;

    tracing::info!(interval = ?period, "ingestion producer started");

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let Some(entity) = source.next() else { break };
                tracing::debug!(%entity, "generated");
                if tx.send(entity).await.is_err() {
                    tracing::warn!("ingestion channel closed");
                    break;
                }
            }
        }
    }

    tracing::info!("ingestion producer stopped");
}

/// Ingest everything received until shutdown or the channel closes.
/// Failures are logged and counted; the loop keeps going.
pub async fn consume<A, T, C>(
    fleet: Fleet<A, T, C>,
    mut rx: mpsc::Receiver<FleetEntity>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> IngestStats
where
    A: Repository<Agent>,
    T: Repository<Task>,
    C: Repository<Configuration>,
{
    let mut stats = IngestStats::default();
    tracing::info!("ingestion consumer started");

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            received = rx.recv() => {
                let Some(entity) = received else { break };
                let label = entity.to_string();
                match fleet.ingest(entity).await {
                    Ok(()) => stats.ingested += 1,
                    Err(e) => {
                        stats.failed += 1;
                        tracing::warn!(entity = %label, error = %e, "ingestion failed");
                    }
                }
            }
        }
    }

    tracing::info!(
        ingested = stats.ingested,
        failed = stats.failed,
        "ingestion consumer stopped",
    );
    stats
}
