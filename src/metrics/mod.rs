//! Playback metrics collection and exposition for Prometheus.
//!
//! Label normalization bounds series cardinality, the registry owns the
//! metric families, and the recorder applies start/stop events to them.

pub mod labels;
mod recorder;
pub mod registry;

pub use labels::{PlayMode, normalize_item_type, normalize_play_mode};
pub use recorder::{PlaybackMetrics, PlaybackRecorder};
pub use registry::{DURATION_BUCKETS, DurationSnapshot, PlaybackRegistry};
