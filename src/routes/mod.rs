//! HTTP route definitions and handlers.
//!
//! Groups the endpoints into playback event intake, metrics exposition,
//! and health checks.

mod health_routes;
mod metrics;
mod playback_routes;

pub use playback_routes::{PlaybackStartEvent, PlaybackStopEvent};

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(playback_routes::routes())
        .merge(metrics::routes(&state.config.metrics.path))
        .merge(health_routes::routes())
        .with_state(state)
}
