//! Route definitions for the irrigation dashboard

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Page state
        .route("/dashboard", get(handlers::get_dashboard))
        // Operator actions
        .route("/range", post(handlers::update_range))
        .route("/pump", post(handlers::press_pump))
}
