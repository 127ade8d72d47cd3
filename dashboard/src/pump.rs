//! Pump command dispatch
//!
//! At most one "ON" insert is outstanding at a time. A second press while
//! one is in flight is rejected locally, never queued and never sent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use shared::PumpCommand;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::store::{ReadingStore, StoreAck};

/// Successful dispatch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PumpAck {
    pub command: PumpCommand,
    pub ack: StoreAck,
}

/// Clears the in-flight flag when the dispatch ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PumpCommandDispatcher {
    store: Arc<dyn ReadingStore>,
    table: String,
    clock: Arc<dyn Clock>,
    in_flight: AtomicBool,
}

impl PumpCommandDispatcher {
    pub fn new(
        store: Arc<dyn ReadingStore>,
        table: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            table: table.into(),
            clock,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Insert one "ON" command. No retry on failure.
    pub async fn dispatch_on(&self) -> AppResult<PumpAck> {
        let _in_flight = InFlight::acquire(&self.in_flight).ok_or_else(|| {
            warn!("pump command rejected, previous dispatch still in flight");
            AppError::DispatchInFlight
        })?;

        let command = PumpCommand::on(self.clock.now().with_timezone(&Utc));
        info!(requested_at = %command.requested_at, table = %self.table, "sending pump command");

        let ack = self.store.insert_command(&self.table, &command).await?;
        info!(inserted = ack.inserted, "pump command acknowledged");

        Ok(PumpAck { command, ack })
    }

    /// True while a dispatch is outstanding; the control is disabled then
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _guard = InFlight::acquire(&flag).unwrap();
            assert!(flag.load(Ordering::Acquire));
            assert!(InFlight::acquire(&flag).is_none());
        }
        assert!(!flag.load(Ordering::Acquire));
        assert!(InFlight::acquire(&flag).is_some());
    }
}
