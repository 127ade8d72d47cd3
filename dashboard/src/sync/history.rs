use std::sync::Arc;

use shared::{label_at, normalize_history, ChartSeries, RangeSelection, Resolution};
use tracing::debug;

use super::epoch::{EpochCounter, FetchEpoch, Fetched};
use crate::clock::Clock;
use crate::store::ReadingStore;

/// Result of a history refresh that reached the store or was skipped
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryOutcome {
    /// At least one reading in the window
    Series(ChartSeries),
    /// The window holds no readings
    Empty,
    /// Date mode without a chosen date; no query was made
    Unresolved,
}

/// Loads the readings of the selected window as chart columns
pub struct HistoryQueryEngine {
    store: Arc<dyn ReadingStore>,
    table: String,
    epochs: EpochCounter,
}

impl HistoryQueryEngine {
    pub fn new(store: Arc<dyn ReadingStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            epochs: EpochCounter::new(),
        }
    }

    /// Claim the epoch for the next fetch, superseding every earlier one.
    ///
    /// Callers claim it together with reading the selection, so epoch order
    /// always follows selection order. Unresolved fetches claim one too, so
    /// switching to an empty date picker supersedes fetches in flight.
    pub fn issue(&self) -> FetchEpoch {
        self.epochs.issue()
    }

    /// Resolve `selection`, query its window and build the chart series
    /// under an epoch claimed with [`issue`](Self::issue)
    pub async fn refresh(
        &self,
        epoch: FetchEpoch,
        selection: &RangeSelection,
        clock: &dyn Clock,
    ) -> Fetched<HistoryOutcome> {
        let window = match clock.resolve(selection) {
            Resolution::Resolved(window) => window,
            Resolution::Unresolved => {
                debug!(epoch = epoch.value(), "history range unresolved, skipping query");
                return Fetched {
                    epoch,
                    result: Ok(HistoryOutcome::Unresolved),
                };
            }
        };

        debug!(
            epoch = epoch.value(),
            kind = %selection.kind,
            from = %window.from,
            to = %window.to,
            "fetching history"
        );

        let result = self
            .store
            .query_range(&self.table, &window)
            .await
            .map(|rows| {
                let rows = normalize_history(rows, &window);
                if rows.is_empty() {
                    HistoryOutcome::Empty
                } else {
                    HistoryOutcome::Series(ChartSeries::from_readings_with(&rows, |reading| {
                        label_at(&clock.local(&reading.captured_at))
                    }))
                }
            });

        Fetched { epoch, result }
    }

    pub fn is_current(&self, epoch: FetchEpoch) -> bool {
        self.epochs.is_latest(epoch)
    }
}
