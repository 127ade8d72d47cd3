//! History chart series

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::reading::{Measurement, SensorReading};

/// Format used for x-axis labels, e.g. `05/06 14:30`
pub const LABEL_FORMAT: &str = "%d/%m %H:%M";

/// Parallel label and value columns for the history chart.
///
/// Index `i` of every column refers to the same reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    labels: Vec<String>,
    temperature: Vec<Option<f64>>,
    soil_moisture: Vec<Option<f64>>,
    soil_ph: Vec<Option<f64>>,
}

impl ChartSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a series from readings already in chronological order,
    /// labelling each one in `tz`
    pub fn from_readings<Tz>(readings: &[SensorReading], tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self::from_readings_with(readings, |reading| format_label(reading, tz))
    }

    /// Build a series with a caller-supplied label for each reading
    pub fn from_readings_with<F>(readings: &[SensorReading], mut label: F) -> Self
    where
        F: FnMut(&SensorReading) -> String,
    {
        let mut series = Self::default();
        for reading in readings {
            series.push(label(reading), reading);
        }
        series
    }

    fn push(&mut self, label: String, reading: &SensorReading) {
        self.labels.push(label);
        self.temperature.push(reading.temperature);
        self.soil_moisture.push(reading.soil_moisture);
        self.soil_ph.push(reading.soil_ph);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self, measurement: Measurement) -> &[Option<f64>] {
        match measurement {
            Measurement::Temperature => &self.temperature,
            Measurement::SoilMoisture => &self.soil_moisture,
            Measurement::SoilPh => &self.soil_ph,
        }
    }

    /// All four columns have the same length
    pub fn is_aligned(&self) -> bool {
        let n = self.labels.len();
        self.temperature.len() == n && self.soil_moisture.len() == n && self.soil_ph.len() == n
    }
}

/// Chart label for a reading in `tz`
pub fn format_label<Tz>(reading: &SensorReading, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    label_at(&reading.captured_at.with_timezone(tz))
}

/// Chart label for an instant already in local time
pub fn label_at<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(LABEL_FORMAT).to_string()
}
