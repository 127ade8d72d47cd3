//! Irrigation Dashboard - Server
//!
//! Polls the reading store for the dashboard page and relays the operator's
//! "pump on" command to the field controller's command table.

use std::{net::SocketAddr, sync::Arc};

use irrigation_dashboard::{
    chart::TracingRenderer, clock::SystemClock, create_app, scheduler::PollingScheduler,
    store::RestStore, AppState, Config, DashboardController,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "irrigation_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Irrigation Dashboard");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Reading store: {}", config.store.url);

    let store = Arc::new(RestStore::new(&config.store.url, &config.store.anon_key));
    let controller = Arc::new(DashboardController::new(
        store,
        &config.tables(),
        Arc::new(TracingRenderer),
        Arc::new(SystemClock),
    ));

    controller.initialize().await;

    let mut scheduler = PollingScheduler::new(controller.clone());
    scheduler.start(
        config.polling.latest_interval(),
        config.polling.history_interval(),
    );

    // Build application
    let app = create_app(AppState { controller });

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.stop();
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
