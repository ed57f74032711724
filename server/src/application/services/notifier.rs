//! Polling change-notifier.
//!
//! Every tick each tracked collection is asked for the items appended since
//! the last observed length. New items are logged and, when a sink is
//! attached, forwarded as [`FleetEntity`] values. A collection that shrank
//! is resynchronized to its current length without reporting anything.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use fleet_common::{Entity, FleetEntity};
use futures::future::BoxFuture;
use tokio::sync::{mpsc, watch};
use tokio::time::{MissedTickBehavior, interval};

use crate::application::ports::Observe;
use crate::domain::RepositoryError;

/// One observed collection and its last-seen length.
pub trait Tracker: Send + Sync {
    fn collection(&self) -> &'static str;

    /// Skip everything currently present.
    fn prime(&mut self) -> BoxFuture<'_, Result<(), RepositoryError>>;

    /// Items appended since the previous poll.
    fn poll(&mut self) -> BoxFuture<'_, Result<Vec<FleetEntity>, RepositoryError>>;
}

pub struct Tracked<R, T> {
    repo: Arc<R>,
    seen: usize,
    _entity: PhantomData<fn() -> T>,
}

impl<R, T> Tracked<R, T> {
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            seen: 0,
            _entity: PhantomData,
        }
    }
}

impl<R, T> Tracker for Tracked<R, T>
where
    R: Observe<T> + 'static,
    T: Entity + Into<FleetEntity>,
{
    fn collection(&self) -> &'static str {
        T::COLLECTION
    }

    fn prime(&mut self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        Box::pin(async move {
            self.seen = self.repo.observe_since(usize::MAX).await?.len;
            Ok(())
        })
    }

    fn poll(&mut self) -> BoxFuture<'_, Result<Vec<FleetEntity>, RepositoryError>> {
        Box::pin(async move {
            let observed = self.repo.observe_since(self.seen).await?;
            if observed.len < self.seen {
                tracing::debug!(
                    collection = T::COLLECTION,
                    from = self.seen,
                    to = observed.len,
                    "collection shrank, resynchronizing",
                );
            }
            self.seen = observed.len;
            Ok(observed.appended.into_iter().map(Into::into).collect())
        })
    }
}

pub struct ChangeNotifier {
    period: Duration,
    trackers: Vec<Box<dyn Tracker>>,
    sink: Option<mpsc::UnboundedSender<FleetEntity>>,
}

impl ChangeNotifier {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            trackers: Vec::new(),
            sink: None,
        }
    }

    /// Watch `repo`, starting from an empty collection.
    #[must_use]
    pub fn track<R, T>(mut self, repo: Arc<R>) -> Self
    where
        R: Observe<T> + 'static,
        T: Entity + Into<FleetEntity>,
    {
        self.trackers.push(Box::new(Tracked::<R, T>::new(repo)));
        self
    }

    /// Forward every reported item to `tx`.
    #[must_use]
    pub fn with_sink(mut self, tx: mpsc::UnboundedSender<FleetEntity>) -> Self {
        self.sink = Some(tx);
        self
    }

    /// Poll every tracker once and report what appeared.
    ///
    /// A tracker that fails is logged and skipped until the next check.
    pub async fn check(&mut self) -> Vec<FleetEntity> {
        let mut reported = Vec::new();
        for tracker in &mut self.trackers {
            match tracker.poll().await {
                Ok(items) => reported.extend(items),
                Err(e) => tracing::warn!(
                    collection = tracker.collection(),
                    error = %e,
                    "change check failed",
                ),
            }
        }

        for entity in &reported {
            tracing::info!(collection = entity.collection(), %entity, "new item");
            let closed = self
                .sink
                .as_ref()
                .is_some_and(|tx| tx.send(entity.clone()).is_err());
            if closed {
                tracing::debug!("change sink closed, detaching");
                self.sink = None;
            }
        }
        reported
    }

    /// Check every `period` until the shutdown flag flips. Items present
    /// before the loop starts are not reported.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        for tracker in &mut self.trackers {
            if let Err(e) = tracker.prime().await {
                tracing::warn!(
                    collection = tracker.collection(),
                    error = %e,
                    "initial length unavailable, reporting from empty",
                );
            }
        }

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        tracing::info!(
            interval = ?self.period,
            collections = self.trackers.len(),
            "change notifier started",
        );

        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.check().await;
                }
            }
        }

        tracing::info!("change notifier stopped");
    }
}
