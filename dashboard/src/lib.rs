//! Irrigation telemetry dashboard
//!
//! Keeps the dashboard page in sync with the remote reading store: latest
//! reading, ranged history chart, and the "pump on" command.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod chart;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod pump;
pub mod routes;
pub mod scheduler;
pub mod store;
pub mod sync;
pub mod view;

pub use config::Config;
pub use controller::DashboardController;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<DashboardController>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Irrigation Dashboard API v1.0"
}
