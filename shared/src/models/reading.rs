//! Sensor reading models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped sample from the field controller.
///
/// Rows come straight from the `sensor_logs` table and are never mutated
/// client side. Any measurement may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(rename = "created_at")]
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub soil_moisture: Option<f64>,
    #[serde(default)]
    pub soil_ph: Option<f64>,
}

impl SensorReading {
    pub fn new(
        captured_at: DateTime<Utc>,
        temperature: Option<f64>,
        soil_moisture: Option<f64>,
        soil_ph: Option<f64>,
    ) -> Self {
        Self {
            captured_at,
            temperature,
            soil_moisture,
            soil_ph,
        }
    }
}

/// Measurements shown on the dashboard, in display order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Temperature,
    SoilMoisture,
    SoilPh,
}

impl Measurement {
    pub const ALL: [Measurement; 3] = [
        Measurement::Temperature,
        Measurement::SoilMoisture,
        Measurement::SoilPh,
    ];

    /// Decimal places used when showing a single value
    pub fn precision(&self) -> usize {
        match self {
            Measurement::Temperature | Measurement::SoilMoisture => 1,
            Measurement::SoilPh => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Measurement::Temperature => "Temperature (°C)",
            Measurement::SoilMoisture => "Soil Moisture (%)",
            Measurement::SoilPh => "Soil pH",
        }
    }

    /// Series colour used by the history chart
    pub fn color(&self) -> &'static str {
        match self {
            Measurement::Temperature => "rgba(16, 185, 129, 0.7)",
            Measurement::SoilMoisture => "rgba(59, 130, 246, 0.8)",
            Measurement::SoilPh => "rgba(139, 69, 19, 0.9)",
        }
    }
}
