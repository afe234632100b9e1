//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! the loaded configuration and the playback recorder.

use crate::config::ConfigV1;
use crate::metrics::PlaybackMetrics;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Playback recorder and the registry it writes to.
    pub metrics: PlaybackMetrics,
}
