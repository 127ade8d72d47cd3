//! Common types used across the dashboard

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Measurement, SensorReading};

/// Shown in place of a measurement the controller did not report
pub const NO_VALUE: &str = "-";

/// Format used for the "last updated" timestamp, e.g. `05/06/24 14:30`
pub const LAST_UPDATED_FORMAT: &str = "%d/%m/%y %H:%M";

/// Table names in the remote store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tables {
    pub sensor_logs: String,
    pub pump_control: String,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            sensor_logs: "sensor_logs".to_string(),
            pump_control: "pump_control".to_string(),
        }
    }
}

/// Render one measurement with its display precision, or the no-value
/// marker. Missing values are never shown as zero.
pub fn format_measurement(measurement: Measurement, value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", measurement.precision(), v),
        _ => NO_VALUE.to_string(),
    }
}

/// Display slots of a single reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingDisplay {
    pub temperature: String,
    pub soil_moisture: String,
    pub soil_ph: String,
    pub captured_at: String,
}

impl ReadingDisplay {
    /// Placeholder slots before any reading exists
    pub fn placeholder() -> Self {
        Self {
            temperature: NO_VALUE.to_string(),
            soil_moisture: NO_VALUE.to_string(),
            soil_ph: NO_VALUE.to_string(),
            captured_at: NO_VALUE.to_string(),
        }
    }

    pub fn from_reading<Tz>(reading: &SensorReading, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            temperature: format_measurement(Measurement::Temperature, reading.temperature),
            soil_moisture: format_measurement(Measurement::SoilMoisture, reading.soil_moisture),
            soil_ph: format_measurement(Measurement::SoilPh, reading.soil_ph),
            captured_at: format_timestamp(&reading.captured_at, tz),
        }
    }
}

pub fn format_timestamp<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format(LAST_UPDATED_FORMAT).to_string()
}
