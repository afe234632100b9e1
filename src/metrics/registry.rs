//! The playback metric families and their Prometheus registry.

use prometheus::core::Collector;
use prometheus::proto::{Metric, MetricFamily};
use prometheus::{
    Encoder, Histogram, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder, register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_gauge_vec_with_registry,
};

use super::labels::PlayMode;
use crate::error::{Error, Result};

pub const PLAYBACK_STARTS_TOTAL: &str = "jellyfin_playback_starts_total";
pub const PLAYBACK_STOPS_TOTAL: &str = "jellyfin_playback_stops_total";
pub const ACTIVE_PLAYBACKS: &str = "jellyfin_active_playbacks";
pub const PLAYBACK_MODE_STARTS_TOTAL: &str = "jellyfin_playback_mode_starts_total";
pub const PLAYBACK_MODE_STOPS_TOTAL: &str = "jellyfin_playback_mode_stops_total";
pub const ACTIVE_PLAYBACKS_BY_MODE: &str = "jellyfin_active_playbacks_by_mode";
pub const PLAYBACK_DURATION_SECONDS: &str = "jellyfin_playback_duration_seconds";

pub const ITEM_TYPE_LABEL: &str = "item_type";
pub const PLAY_MODE_LABEL: &str = "play_mode";

/// Upper bounds of the duration histogram, in seconds. `+Inf` is implicit.
pub const DURATION_BUCKETS: [f64; 7] = [15.0, 60.0, 300.0, 900.0, 3600.0, 7200.0, 14400.0];

/// Point-in-time copy of the duration histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationSnapshot {
    pub count: u64,
    pub sum: f64,
    /// `(upper_bound, cumulative_count)` for every finite bucket, ascending.
    pub buckets: Vec<(f64, u64)>,
}

impl DurationSnapshot {
    /// Cumulative count of the bucket with the given upper bound.
    pub fn bucket(&self, upper_bound: f64) -> Option<u64> {
        self.buckets
            .iter()
            .find(|(bound, _)| *bound == upper_bound)
            .map(|(_, count)| *count)
    }
}

/// Owns every playback metric family.
///
/// Per-tuple series are created by the underlying vectors on first use;
/// concurrent first accesses to the same tuple share one accumulator.
pub struct PlaybackRegistry {
    registry: Registry,

    // (item_type, play_mode)
    starts_total: IntCounterVec,
    stops_total: IntCounterVec,
    active: IntGaugeVec,

    // (play_mode)
    mode_starts_total: IntCounterVec,
    mode_stops_total: IntCounterVec,
    mode_active: IntGaugeVec,

    duration_seconds: Histogram,
}

impl PlaybackRegistry {
    /// Creates a fresh registry and registers all playback families in it.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let pair = &[ITEM_TYPE_LABEL, PLAY_MODE_LABEL];
        let mode = &[PLAY_MODE_LABEL];

        let starts_total = register_int_counter_vec_with_registry!(
            Opts::new(PLAYBACK_STARTS_TOTAL, "Total number of playback starts"),
            pair,
            registry
        )?;
        let stops_total = register_int_counter_vec_with_registry!(
            Opts::new(PLAYBACK_STOPS_TOTAL, "Total number of playback stops"),
            pair,
            registry
        )?;
        let active = register_int_gauge_vec_with_registry!(
            Opts::new(ACTIVE_PLAYBACKS, "Number of playbacks currently in progress"),
            pair,
            registry
        )?;

        let mode_starts_total = register_int_counter_vec_with_registry!(
            Opts::new(
                PLAYBACK_MODE_STARTS_TOTAL,
                "Total number of playback starts by play mode"
            ),
            mode,
            registry
        )?;
        let mode_stops_total = register_int_counter_vec_with_registry!(
            Opts::new(
                PLAYBACK_MODE_STOPS_TOTAL,
                "Total number of playback stops by play mode"
            ),
            mode,
            registry
        )?;
        let mode_active = register_int_gauge_vec_with_registry!(
            Opts::new(
                ACTIVE_PLAYBACKS_BY_MODE,
                "Number of playbacks currently in progress by play mode"
            ),
            mode,
            registry
        )?;

        let duration_seconds = register_histogram_with_registry!(
            PLAYBACK_DURATION_SECONDS,
            "Playback session duration in seconds",
            DURATION_BUCKETS.to_vec(),
            registry
        )?;

        Ok(PlaybackRegistry {
            registry,
            starts_total,
            stops_total,
            active,
            mode_starts_total,
            mode_stops_total,
            mode_active,
            duration_seconds,
        })
    }

    pub fn starts(&self, item_type: &str, mode: PlayMode) -> IntCounter {
        self.starts_total
            .with_label_values(&[item_type, mode.as_str()])
    }

    pub fn stops(&self, item_type: &str, mode: PlayMode) -> IntCounter {
        self.stops_total.with_label_values(&[item_type, mode.as_str()])
    }

    pub fn active(&self, item_type: &str, mode: PlayMode) -> IntGauge {
        self.active.with_label_values(&[item_type, mode.as_str()])
    }

    pub fn mode_starts(&self, mode: PlayMode) -> IntCounter {
        self.mode_starts_total.with_label_values(&[mode.as_str()])
    }

    pub fn mode_stops(&self, mode: PlayMode) -> IntCounter {
        self.mode_stops_total.with_label_values(&[mode.as_str()])
    }

    pub fn mode_active(&self, mode: PlayMode) -> IntGauge {
        self.mode_active.with_label_values(&[mode.as_str()])
    }

    pub fn duration(&self) -> &Histogram {
        &self.duration_seconds
    }

    // Read-only accessors. These scan collected families instead of going
    // through `with_label_values`, so reading never creates a series.

    pub fn starts_value(&self, item_type: &str, mode: PlayMode) -> i64 {
        read_pair(&self.starts_total, item_type, mode)
    }

    pub fn stops_value(&self, item_type: &str, mode: PlayMode) -> i64 {
        read_pair(&self.stops_total, item_type, mode)
    }

    pub fn active_value(&self, item_type: &str, mode: PlayMode) -> i64 {
        read_pair(&self.active, item_type, mode)
    }

    pub fn mode_starts_value(&self, mode: PlayMode) -> i64 {
        read_value(&self.mode_starts_total, &[(PLAY_MODE_LABEL, mode.as_str())])
    }

    pub fn mode_stops_value(&self, mode: PlayMode) -> i64 {
        read_value(&self.mode_stops_total, &[(PLAY_MODE_LABEL, mode.as_str())])
    }

    pub fn mode_active_value(&self, mode: PlayMode) -> i64 {
        read_value(&self.mode_active, &[(PLAY_MODE_LABEL, mode.as_str())])
    }

    pub fn duration_snapshot(&self) -> DurationSnapshot {
        let families = self.duration_seconds.collect();
        let histogram = families
            .iter()
            .flat_map(|family| family.get_metric())
            .next()
            .map(Metric::get_histogram);

        match histogram {
            Some(h) => DurationSnapshot {
                count: h.get_sample_count(),
                sum: h.get_sample_sum(),
                buckets: h
                    .get_bucket()
                    .iter()
                    .map(|b| (b.get_upper_bound(), b.get_cumulative_count()))
                    .collect(),
            },
            None => DurationSnapshot {
                count: 0,
                sum: 0.0,
                buckets: DURATION_BUCKETS.iter().map(|b| (*b, 0)).collect(),
            },
        }
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Renders all families in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Encoding(e.to_string()))
    }
}

fn read_pair(collector: &impl Collector, item_type: &str, mode: PlayMode) -> i64 {
    read_value(
        collector,
        &[(ITEM_TYPE_LABEL, item_type), (PLAY_MODE_LABEL, mode.as_str())],
    )
}

/// Value of the series whose labels match `labels` exactly, or 0 when that
/// series has never been touched.
fn read_value(collector: &impl Collector, labels: &[(&str, &str)]) -> i64 {
    collector
        .collect()
        .iter()
        .flat_map(|family| family.get_metric())
        .find(|metric| labels_match(metric, labels))
        .map(|metric| {
            if metric.has_counter() {
                metric.get_counter().get_value() as i64
            } else {
                metric.get_gauge().get_value() as i64
            }
        })
        .unwrap_or(0)
}

fn labels_match(metric: &Metric, labels: &[(&str, &str)]) -> bool {
    let pairs = metric.get_label();
    pairs.len() == labels.len()
        && labels.iter().all(|(name, value)| {
            pairs
                .iter()
                .any(|p| p.get_name() == *name && p.get_value() == *value)
        })
}
