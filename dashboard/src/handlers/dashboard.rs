//! HTTP handlers for the dashboard view and operator actions

use axum::{extract::State, Json};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::RangeKind;

use crate::error::{AppError, AppResult};
use crate::sync::RefreshStatus;
use crate::view::{DashboardView, PUMP_STATUS_SENT};
use crate::AppState;

/// Current page state
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.controller.snapshot().await)
}

/// Range controls as posted by the page. A post without `kind` is the date
/// picker changing on its own.
#[derive(Debug, Deserialize)]
pub struct RangeRequest {
    #[serde(default)]
    pub kind: Option<RangeKind>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RangeResponse {
    /// `None` when the change did not trigger a history reload
    pub refresh: Option<RefreshStatus>,
    pub view: DashboardView,
}

/// Switch the history range or pick a day, reloading the chart as needed
pub async fn update_range(
    State(state): State<AppState>,
    Json(input): Json<RangeRequest>,
) -> AppResult<Json<RangeResponse>> {
    let refresh = match (input.kind, input.date) {
        (Some(kind), date) => Some(state.controller.set_range(kind, date).await),
        (None, Some(date)) => state.controller.choose_date(date).await,
        (None, None) => {
            return Err(AppError::Validation(
                "Range update needs a kind or a date".to_string(),
            ))
        }
    };

    Ok(Json(RangeResponse {
        refresh,
        view: state.controller.snapshot().await,
    }))
}

#[derive(Debug, Serialize)]
pub struct PumpResponse {
    pub status: String,
    pub message: String,
    pub requested_at: DateTime<Utc>,
}

/// Send the "pump on" command
pub async fn press_pump(State(state): State<AppState>) -> AppResult<Json<PumpResponse>> {
    let sent = state.controller.press_pump().await?;
    Ok(Json(PumpResponse {
        status: "ok".to_string(),
        message: PUMP_STATUS_SENT.to_string(),
        requested_at: sent.command.requested_at,
    }))
}
