//! Playback event intake.
//!
//! The host posts one event per playback transition; every field is
//! optional and normalized by the recorder.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::metrics::PlaybackRecorder;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PlaybackStartEvent {
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub play_mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaybackStopEvent {
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub play_mode: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

/// Registers the playback event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/playback/start", post(playback_start))
        .route("/playback/stop", post(playback_stop))
}

async fn playback_start(
    State(state): State<AppState>,
    Json(event): Json<PlaybackStartEvent>,
) -> StatusCode {
    state
        .metrics
        .record_start(event.item_type.as_deref(), event.play_mode.as_deref());
    StatusCode::NO_CONTENT
}

async fn playback_stop(
    State(state): State<AppState>,
    Json(event): Json<PlaybackStopEvent>,
) -> StatusCode {
    state.metrics.record_stop(
        event.item_type.as_deref(),
        event.play_mode.as_deref(),
        event.duration_seconds,
    );
    StatusCode::NO_CONTENT
}
