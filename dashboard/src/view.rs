//! Dashboard view model
//!
//! Everything the page displays, as plain data. The controller mutates these
//! panels; handlers serialize a snapshot.

use serde::Serialize;
use shared::{format_timestamp, RangeSelection, ReadingDisplay, SensorReading};

use crate::chart::ChartFrame;
use crate::clock::Clock;

pub const NO_DATA_YET: &str = "No data yet";
pub const LATEST_FAILED: &str = "Failed to load latest data";

pub const PUMP_LABEL_IDLE: &str = "Turn pump on";
pub const PUMP_LABEL_SENDING: &str = "Sending command...";
pub const PUMP_STATUS_SENDING: &str = "Sending command to pump...";
pub const PUMP_STATUS_SENT: &str = "Pump command sent. The controller will execute it.";
pub const PUMP_STATUS_FAILED: &str = "Failed to send pump command.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LatestStatus {
    /// Nothing fetched yet
    Waiting,
    Current,
    NoData,
    /// The last refresh failed; values are from an earlier success
    Stale,
}

/// The four display slots of the latest reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestPanel {
    pub status: LatestStatus,
    pub temperature: String,
    pub soil_moisture: String,
    pub soil_ph: String,
    pub last_updated: String,
}

impl Default for LatestPanel {
    fn default() -> Self {
        let placeholder = ReadingDisplay::placeholder();
        Self {
            status: LatestStatus::Waiting,
            temperature: placeholder.temperature,
            soil_moisture: placeholder.soil_moisture,
            soil_ph: placeholder.soil_ph,
            last_updated: placeholder.captured_at,
        }
    }
}

impl LatestPanel {
    pub fn show(&mut self, reading: &SensorReading, clock: &dyn Clock) {
        let local = clock.local(&reading.captured_at);
        let display = ReadingDisplay::from_reading(reading, local.offset());
        self.status = LatestStatus::Current;
        self.temperature = display.temperature;
        self.soil_moisture = display.soil_moisture;
        self.soil_ph = display.soil_ph;
        self.last_updated = format!(
            "Last update: {}",
            format_timestamp(&reading.captured_at, local.offset())
        );
    }

    pub fn show_no_data(&mut self) {
        *self = Self {
            status: LatestStatus::NoData,
            last_updated: NO_DATA_YET.to_string(),
            ..Self::default()
        };
    }

    /// Keep the values on screen; only the last-updated slot changes
    pub fn mark_failed(&mut self) {
        self.status = LatestStatus::Stale;
        self.last_updated = LATEST_FAILED.to_string();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    Loading,
    Ready,
    Empty,
    Unresolved,
    Failed,
}

impl HistoryStatus {
    /// Text of the indicator shown in place of the chart, if any
    pub fn indicator(&self) -> Option<&'static str> {
        match self {
            HistoryStatus::Loading | HistoryStatus::Ready => None,
            HistoryStatus::Empty => Some("No data for the selected range."),
            HistoryStatus::Unresolved => Some("Pick a date to show its history."),
            HistoryStatus::Failed => Some("Failed to load history data."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPanel {
    pub status: HistoryStatus,
    pub points: usize,
    pub indicator: Option<&'static str>,
}

impl HistoryPanel {
    pub fn new(status: HistoryStatus, points: usize) -> Self {
        Self {
            status,
            points,
            indicator: status.indicator(),
        }
    }
}

impl Default for HistoryPanel {
    fn default() -> Self {
        Self::new(HistoryStatus::Loading, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PumpControl {
    pub enabled: bool,
    pub label: &'static str,
    pub status: Option<&'static str>,
}

impl PumpControl {
    pub fn new(in_flight: bool, status: Option<&'static str>) -> Self {
        Self {
            enabled: !in_flight,
            label: if in_flight {
                PUMP_LABEL_SENDING
            } else {
                PUMP_LABEL_IDLE
            },
            status,
        }
    }
}

/// Full page state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub latest: LatestPanel,
    pub history: HistoryPanel,
    pub chart: Option<ChartFrame>,
    pub range: RangeSelection,
    pub pump: PumpControl,
}
