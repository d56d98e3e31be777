//! cinema-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinema_gateway::admission::AdmissionController;
use cinema_gateway::app_state::AppState;
use cinema_gateway::config::{GatewayConfig, LogFormat};
use cinema_gateway::domain::SeatLayout;
use cinema_gateway::ledger::{InMemorySeatLedger, PostgresSeatLedger, SeatLedger};
use cinema_gateway::server::{self, StaticAssets};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting cinema-gateway");

    // Build storage layer
    let ledger = open_ledger(&config).await?;

    // Build admission control
    let admission = Arc::new(AdmissionController::new(config.admission()));
    let sweeper = admission.spawn_sweeper();

    // Prepare static assets
    let assets = StaticAssets::from_config(&config);
    if let Err(err) = assets.prepare().await {
        tracing::error!(dir = %assets.dir.display(), error = %err, "failed to create posters directory");
    }

    // Build application state and router
    let app_state = AppState::new(ledger, admission);
    let app = server::build_app(app_state, &assets);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    server::serve(listener, app, shutdown_signal()).await?;

    sweeper.abort();
    tracing::info!("server stopped");
    Ok(())
}

async fn open_ledger(config: &GatewayConfig) -> anyhow::Result<Arc<dyn SeatLedger>> {
    if !config.persistence_enabled {
        tracing::warn!("persistence disabled, bookings are kept in memory only");
        return Ok(Arc::new(InMemorySeatLedger::new()));
    }

    let ledger = PostgresSeatLedger::connect(config)
        .await
        .context("could not connect to the database")?;
    ledger.migrate().await.context("migration failed")?;
    let backfilled = ledger
        .backfill_seat_grids(SeatLayout::STANDARD)
        .await
        .context("seat grid backfill failed")?;
    tracing::info!(backfilled, "database ready");
    Ok(Arc::new(ledger))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl+C, shutting down gracefully"),
        Err(err) => tracing::error!(error = %err, "failed to listen for Ctrl+C"),
    }
}
