//! Pump command models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Commands understood by the field controller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PumpAction {
    #[serde(rename = "ON")]
    On,
}

/// A row written to the `pump_control` table. The controller polls the
/// newest row; nothing here reads it back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpCommand {
    pub action: PumpAction,
    pub requested_at: DateTime<Utc>,
}

impl PumpCommand {
    pub fn on(requested_at: DateTime<Utc>) -> Self {
        Self {
            action: PumpAction::On,
            requested_at,
        }
    }
}
