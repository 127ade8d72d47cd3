//! Validation utilities for telemetry history
//!
//! The store is asked for `[from, to]` in ascending order; these helpers
//! enforce that contract on whatever actually comes back.

use crate::models::{ChartSeries, ResolvedWindow, SensorReading};

// ============================================================================
// Window Validations
// ============================================================================

/// Validate that a window is not inverted
pub fn validate_window(window: &ResolvedWindow) -> Result<(), &'static str> {
    if window.from > window.to {
        return Err("Window start must not be after its end");
    }
    Ok(())
}

/// Check that every reading lies inside the window (bounds inclusive)
pub fn all_within_window(readings: &[SensorReading], window: &ResolvedWindow) -> bool {
    readings.iter().all(|r| window.contains(&r.captured_at))
}

/// Check that capture times never decrease
pub fn is_chronological(readings: &[SensorReading]) -> bool {
    readings
        .windows(2)
        .all(|pair| pair[0].captured_at <= pair[1].captured_at)
}

/// Drop rows outside the window and order the rest by capture time.
/// The sort is stable so rows sharing a timestamp keep store order.
pub fn normalize_history(
    mut readings: Vec<SensorReading>,
    window: &ResolvedWindow,
) -> Vec<SensorReading> {
    readings.retain(|r| window.contains(&r.captured_at));
    if !is_chronological(&readings) {
        readings.sort_by_key(|r| r.captured_at);
    }
    readings
}

// ============================================================================
// Series Validations
// ============================================================================

/// Validate that labels and value columns line up
pub fn validate_series(series: &ChartSeries) -> Result<(), &'static str> {
    if !series.is_aligned() {
        return Err("Chart labels and value columns differ in length");
    }
    Ok(())
}
