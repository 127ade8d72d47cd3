//! Reading store integration
//!
//! The dashboard only needs three capabilities from the remote store: the
//! newest reading, readings inside a window, and inserting a pump command.

pub mod rest;

use axum::async_trait;
use serde::Serialize;
use shared::{PumpCommand, ResolvedWindow, SensorReading};

use crate::error::AppResult;

pub use rest::RestStore;

/// Acknowledgment of a successful insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreAck {
    pub inserted: usize,
}

/// Query/insert contract of the remote store
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Newest reading by capture time, if any
    async fn query_latest(&self, table: &str) -> AppResult<Option<SensorReading>>;

    /// Readings captured inside `window` (inclusive), oldest first
    async fn query_range(
        &self,
        table: &str,
        window: &ResolvedWindow,
    ) -> AppResult<Vec<SensorReading>>;

    /// Append a pump command row
    async fn insert_command(&self, table: &str, command: &PumpCommand) -> AppResult<StoreAck>;
}
