//! Playback start/stop recording on top of [`PlaybackRegistry`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::labels::{is_unrecognized_play_mode, normalize_item_type, normalize_play_mode};
use super::registry::PlaybackRegistry;
use crate::error::Result;
use crate::utils::log_throttle::LogThrottle;

const UNRECOGNIZED_MODE_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Trait for recording playback lifecycle events.
///
/// Both operations are infallible and non-blocking, and may be called from
/// any number of threads at once.
pub trait PlaybackRecorder: Clone + Send + Sync + 'static {
    /// Records that a playback session started.
    fn record_start(&self, item_type: Option<&str>, play_mode: Option<&str>);

    /// Records that a playback session stopped.
    ///
    /// A missing or negative duration still counts the stop but is left out
    /// of the duration histogram.
    fn record_stop(
        &self,
        item_type: Option<&str>,
        play_mode: Option<&str>,
        duration_secs: Option<f64>,
    );
}

/// Prometheus-backed playback recorder.
#[derive(Clone)]
pub struct PlaybackMetrics {
    registry: Arc<PlaybackRegistry>,
    throttle: Arc<LogThrottle>,
}

impl PlaybackMetrics {
    /// Creates a recorder with its own freshly registered families.
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(Arc::new(PlaybackRegistry::new()?)))
    }

    pub fn with_registry(registry: Arc<PlaybackRegistry>) -> Self {
        PlaybackMetrics {
            registry,
            throttle: Arc::new(LogThrottle::new(UNRECOGNIZED_MODE_LOG_INTERVAL)),
        }
    }

    pub fn registry(&self) -> &PlaybackRegistry {
        &self.registry
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> Result<String> {
        self.registry.render()
    }

    fn note_unrecognized_mode(&self, raw: &str) {
        if let Some(suppressed) = self.throttle.should_emit("play_mode.unrecognized") {
            warn!(
                event_name = "playback.play_mode.unrecognized",
                play_mode = raw,
                suppressed,
                "Unrecognized play mode, recording as unknown"
            );
        }
    }
}

impl PlaybackRecorder for PlaybackMetrics {
    fn record_start(&self, item_type: Option<&str>, play_mode: Option<&str>) {
        let item_type = normalize_item_type(item_type);
        let mode = normalize_play_mode(play_mode);
        if is_unrecognized_play_mode(play_mode, mode) {
            self.note_unrecognized_mode(play_mode.unwrap_or_default());
        }

        self.registry.starts(&item_type, mode).inc();
        self.registry.active(&item_type, mode).inc();
        self.registry.mode_starts(mode).inc();
        self.registry.mode_active(mode).inc();

        debug!(item_type = %item_type, play_mode = %mode, "Recorded playback start");
    }

    fn record_stop(
        &self,
        item_type: Option<&str>,
        play_mode: Option<&str>,
        duration_secs: Option<f64>,
    ) {
        let item_type = normalize_item_type(item_type);
        let mode = normalize_play_mode(play_mode);
        if is_unrecognized_play_mode(play_mode, mode) {
            self.note_unrecognized_mode(play_mode.unwrap_or_default());
        }

        self.registry.stops(&item_type, mode).inc();
        self.registry.active(&item_type, mode).dec();
        self.registry.mode_stops(mode).inc();
        self.registry.mode_active(mode).dec();

        // NaN fails the comparison and is dropped along with negatives.
        match duration_secs {
            Some(secs) if secs >= 0.0 => {
                self.registry.duration().observe(secs);
                debug!(item_type = %item_type, play_mode = %mode, duration_secs = secs, "Recorded playback stop");
            }
            _ => {
                debug!(
                    item_type = %item_type,
                    play_mode = %mode,
                    duration_secs = ?duration_secs,
                    "Recorded playback stop without a usable duration"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::labels::PlayMode;

    #[test]
    fn start_touches_all_four_series() {
        let metrics = PlaybackMetrics::new().unwrap();
        metrics.record_start(Some("Audio"), Some("DirectPlay"));

        let registry = metrics.registry();
        assert_eq!(registry.starts_value("audio", PlayMode::Direct), 1);
        assert_eq!(registry.active_value("audio", PlayMode::Direct), 1);
        assert_eq!(registry.mode_starts_value(PlayMode::Direct), 1);
        assert_eq!(registry.mode_active_value(PlayMode::Direct), 1);
        assert_eq!(registry.stops_value("audio", PlayMode::Direct), 0);
        assert_eq!(registry.duration_snapshot().count, 0);
    }

    #[test]
    fn nan_duration_is_skipped() {
        let metrics = PlaybackMetrics::new().unwrap();
        metrics.record_stop(Some("Movie"), Some("Transcode"), Some(f64::NAN));

        assert_eq!(metrics.registry().stops_value("movie", PlayMode::Transcode), 1);
        assert_eq!(metrics.registry().duration_snapshot().count, 0);
    }

    #[test]
    fn zero_duration_is_observed() {
        let metrics = PlaybackMetrics::new().unwrap();
        metrics.record_stop(None, None, Some(0.0));

        let snapshot = metrics.registry().duration_snapshot();
        assert_eq!(snapshot.count, 1);
        assert_eq!(snapshot.bucket(15.0), Some(1));
    }

    #[test]
    fn clones_share_one_registry() {
        let metrics = PlaybackMetrics::new().unwrap();
        let other = metrics.clone();
        metrics.record_start(Some("Movie"), Some("direct"));
        other.record_start(Some("movie"), Some("DirectStream"));

        assert_eq!(metrics.registry().starts_value("movie", PlayMode::Direct), 2);
    }
}
