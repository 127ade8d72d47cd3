//! Wall-clock access
//!
//! Window resolution, chart labels and pump timestamps all read the clock
//! through this trait so tests can pin "now" and the local offset.

use chrono::{DateTime, FixedOffset, Local, Utc};
use shared::{RangeSelection, Resolution};

pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> DateTime<FixedOffset>;

    /// `at` shifted into local time
    fn local(&self, at: &DateTime<Utc>) -> DateTime<FixedOffset>;

    /// Resolve a range selection against the current local time
    fn resolve(&self, selection: &RangeSelection) -> Resolution {
        selection.resolve(&self.now())
    }
}

/// The host clock and timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn local(&self, at: &DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&Local).fixed_offset()
    }

    // Resolve in the named local zone so a chosen day keeps its own DST offset
    fn resolve(&self, selection: &RangeSelection) -> Resolution {
        selection.resolve(&Local::now())
    }
}

/// A clock frozen at one instant, for tests and replay
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    fn local(&self, at: &DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(self.now.offset())
    }
}
