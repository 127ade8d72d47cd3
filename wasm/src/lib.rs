//! WebAssembly module for the Irrigation Dashboard
//!
//! Lets the page compute locally what the server would:
//! - Range window resolution in the browser's timezone
//! - Chart columns from raw `sensor_logs` rows
//! - Display formatting of measurements and labels

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

/// Offset east of UTC, as returned by `-new Date().getTimezoneOffset()`
fn fixed_offset(minutes_east: i32) -> Option<FixedOffset> {
    minutes_east.checked_mul(60).and_then(FixedOffset::east_opt)
}

fn offset(minutes_east: i32) -> Result<FixedOffset, JsValue> {
    fixed_offset(minutes_east).ok_or_else(|| js_error("Invalid UTC offset", minutes_east))
}

fn instant(ms: f64) -> Result<DateTime<Utc>, JsValue> {
    Utc.timestamp_millis_opt(ms as i64)
        .single()
        .ok_or_else(|| js_error("Invalid timestamp", ms))
}

/// Browser's current offset east of UTC in minutes at `now_ms`
#[wasm_bindgen]
pub fn browser_offset_minutes(now_ms: f64) -> i32 {
    let date = js_sys::Date::new(&JsValue::from_f64(now_ms));
    -(date.get_timezone_offset() as i32)
}

/// Resolve a range selection to `{"from", "to"}` JSON, or `null` for date
/// mode without a chosen day
#[wasm_bindgen]
pub fn resolve_window(
    kind: &str,
    date: Option<String>,
    now_ms: f64,
    offset_minutes: i32,
) -> Result<String, JsValue> {
    let kind: RangeKind = kind.parse().map_err(|e| js_error("Invalid range", e))?;
    let mut selection = RangeSelection::new(kind);
    if let Some(date) = date.filter(|d| !d.is_empty()) {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| js_error("Invalid date", e))?;
        selection.set_explicit_date(date);
    }

    let now = instant(now_ms)?.with_timezone(&offset(offset_minutes)?);
    serde_json::to_string(&selection.resolve(&now).window())
        .map_err(|e| js_error("Serialization failed", e))
}

/// Turn raw store rows into chart columns: rows outside `window_json` are
/// dropped, the rest ordered by capture time and labelled in local time
#[wasm_bindgen]
pub fn build_chart_series(
    rows_json: &str,
    window_json: &str,
    offset_minutes: i32,
) -> Result<String, JsValue> {
    let rows: Vec<SensorReading> =
        serde_json::from_str(rows_json).map_err(|e| js_error("Invalid rows JSON", e))?;
    let window: ResolvedWindow =
        serde_json::from_str(window_json).map_err(|e| js_error("Invalid window JSON", e))?;
    validate_window(&window).map_err(JsValue::from_str)?;

    let received = rows.len();
    let rows = normalize_history(rows, &window);
    if rows.len() < received {
        log(&format!(
            "dropped {} rows outside the selected window",
            received - rows.len()
        ));
    }

    let series = ChartSeries::from_readings(&rows, &offset(offset_minutes)?);
    serde_json::to_string(&series).map_err(|e| js_error("Serialization failed", e))
}

/// Format an x-axis label for a `created_at` timestamp
#[wasm_bindgen]
pub fn format_reading_label(created_at: &str, offset_minutes: i32) -> Result<String, JsValue> {
    let at = DateTime::parse_from_rfc3339(created_at)
        .map_err(|e| js_error("Invalid timestamp", e))?;
    Ok(label_at(&at.with_timezone(&offset(offset_minutes)?)))
}

/// Format one measurement for its display slot; `undefined` shows "-"
#[wasm_bindgen]
pub fn format_measurement_value(measurement: &str, value: Option<f64>) -> Result<String, JsValue> {
    let measurement: Measurement = serde_json::from_value(serde_json::Value::from(measurement))
        .map_err(|e| js_error("Unknown measurement", e))?;
    Ok(format_measurement(measurement, value))
}

#[cfg(target_arch = "wasm32")]
fn log(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn log(_message: &str) {}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-06-15T12:00:00+07:00
    const NOW_MS: f64 = 1_718_427_600_000.0;
    const BANGKOK: i32 = 7 * 60;

    #[test]
    fn test_resolve_week() {
        let json = resolve_window("week", None, NOW_MS, BANGKOK).unwrap();
        let window: ResolvedWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(window.to.timestamp_millis() as f64, NOW_MS);
        assert_eq!((window.to - window.from).num_days(), 7);
    }

    #[test]
    fn test_resolve_date_without_day_is_null() {
        assert_eq!(resolve_window("date", None, NOW_MS, BANGKOK).unwrap(), "null");
        assert_eq!(
            resolve_window("date", Some(String::new()), NOW_MS, BANGKOK).unwrap(),
            "null"
        );
    }

    #[test]
    fn test_resolve_date_uses_local_day() {
        let json = resolve_window("date", Some("2024-06-10".into()), NOW_MS, BANGKOK).unwrap();
        let window: ResolvedWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(
            window.from,
            Utc.with_ymd_and_hms(2024, 6, 9, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_build_chart_series_orders_and_filters() {
        let rows = r#"[
            {"created_at": "2024-06-14T05:00:00Z", "temperature": 24.1},
            {"created_at": "2024-06-01T05:00:00Z", "temperature": 30.0},
            {"created_at": "2024-06-09T05:00:00Z", "temperature": 22.9}
        ]"#;
        let window = resolve_window("week", None, NOW_MS, BANGKOK).unwrap();

        let json = build_chart_series(rows, &window, BANGKOK).unwrap();
        let series: ChartSeries = serde_json::from_str(&json).unwrap();

        assert_eq!(series.labels(), ["09/06 12:00", "14/06 12:00"]);
        assert_eq!(
            series.values(Measurement::Temperature),
            [Some(22.9), Some(24.1)]
        );
        assert_eq!(series.values(Measurement::SoilPh), [None, None]);
    }

    #[test]
    fn test_format_reading_label() {
        assert_eq!(
            format_reading_label("2024-06-05T07:30:00Z", BANGKOK).unwrap(),
            "05/06 14:30"
        );
    }

    #[test]
    fn test_out_of_range_offsets_are_rejected() {
        assert_eq!(fixed_offset(BANGKOK), FixedOffset::east_opt(7 * 3600));
        assert_eq!(fixed_offset(-5 * 60), FixedOffset::west_opt(5 * 3600));
        assert!(fixed_offset(24 * 60).is_none());
        assert!(fixed_offset(i32::MAX).is_none());
        assert!(fixed_offset(i32::MIN).is_none());
    }

    #[test]
    fn test_format_measurement_value() {
        assert_eq!(format_measurement_value("soil_ph", Some(6.5)).unwrap(), "6.50");
        assert_eq!(format_measurement_value("temperature", None).unwrap(), "-");
    }
}
