use std::sync::Arc;

use shared::SensorReading;
use tracing::debug;

use super::epoch::{EpochCounter, FetchEpoch, Fetched};
use crate::store::ReadingStore;

/// Fetches the single newest reading
pub struct LatestReadingSync {
    store: Arc<dyn ReadingStore>,
    table: String,
    epochs: EpochCounter,
}

impl LatestReadingSync {
    pub fn new(store: Arc<dyn ReadingStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            epochs: EpochCounter::new(),
        }
    }

    /// Query the newest reading. `Ok(None)` means the table is empty.
    pub async fn refresh(&self) -> Fetched<Option<SensorReading>> {
        let epoch = self.epochs.issue();
        debug!(epoch = epoch.value(), table = %self.table, "fetching latest reading");

        let result = self.store.query_latest(&self.table).await;
        Fetched { epoch, result }
    }

    pub fn is_current(&self, epoch: FetchEpoch) -> bool {
        self.epochs.is_latest(epoch)
    }
}
