//! Read-only view over a collection's mutation history.

use fleet_common::{Entity, HistoryRecord};

use crate::application::ports::HistorySource;
use crate::domain::RepositoryError;

pub struct HistoryReader<'a, S> {
    source: &'a S,
}

impl<'a, S> HistoryReader<'a, S> {
    #[must_use]
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Every record of the collection, oldest first.
    ///
    /// # Errors
    ///
    /// Fails if the log is unreachable or any single record is malformed.
    pub async fn records<T>(&self) -> Result<Vec<HistoryRecord<T>>, RepositoryError>
    where
        T: Entity,
        S: HistorySource<T>,
    {
        let records = self.source.get_history().await?;
        tracing::debug!(
            collection = T::COLLECTION,
            count = records.len(),
            "read history",
        );
        Ok(records)
    }
}
