//! Refresh engines for the latest reading and the history chart
//!
//! Each engine stamps every fetch with a [`FetchEpoch`]; only a result whose
//! epoch is still the newest issued for that engine may reach the view.

mod epoch;
mod history;
mod latest;

pub use epoch::{EpochCounter, FetchEpoch, Fetched};
pub use history::{HistoryOutcome, HistoryQueryEngine};
pub use latest::LatestReadingSync;

use serde::Serialize;

/// How one refresh ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStatus {
    /// The result was written to the view
    Applied,
    /// A newer fetch was issued meanwhile; the result was dropped
    Superseded,
    /// The store call failed; the failure was written to the view
    Failed,
}
