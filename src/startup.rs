//! Application startup and server initialization.
//!
//! Builds the playback registry and recorder, wires the routes, and serves
//! them on the configured address.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::error::Result;
use crate::metrics::PlaybackMetrics;
use crate::routes;
use crate::state::AppState;

/// Builds the shared state for a config, registering a fresh metric registry.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState> {
    let metrics = PlaybackMetrics::new()?;
    Ok(AppState { config, metrics })
}

/// Initializes and runs the application server until it fails or the
/// process receives Ctrl-C.
///
/// # Errors
///
/// Returns an error if the registry cannot be built, the server fails to
/// bind to the configured address, or serving fails.
pub async fn run(config: Arc<ConfigV1>) -> Result<()> {
    let state = build_state(config.clone())?;
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!(
        bind_address = %config.bind_address,
        metrics_path = %config.metrics.path,
        "Starting server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
