use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::error::AppResult;

/// Sequence number of one fetch on one refresh target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FetchEpoch(u64);

impl FetchEpoch {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Per-target epoch source. Epochs start at 1 and only grow.
#[derive(Debug, Default)]
pub struct EpochCounter {
    latest: AtomicU64,
}

impl EpochCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next epoch, superseding every earlier one
    pub fn issue(&self) -> FetchEpoch {
        FetchEpoch(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no later epoch has been issued
    pub fn is_latest(&self, epoch: FetchEpoch) -> bool {
        self.latest.load(Ordering::SeqCst) == epoch.0
    }
}

/// A store result tagged with the epoch it was issued under
#[derive(Debug)]
pub struct Fetched<T> {
    pub epoch: FetchEpoch,
    pub result: AppResult<T>,
}
