use serde::{Deserialize, Serialize};

use crate::geom::{
    FACING_EPSILON, JUNCTION_NUDGE, JUNCTION_PROBE_DIST, JUNCTION_THRESHOLD_DIST, LENGTH_SCALE,
    PREVIEW_RANGE, RANGE_SAMPLE_COUNT,
};

/// Runtime tuning for junction matching and navigation.
///
/// Every field falls back to its default when missing from a config document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavParams {
    pub junction_threshold: f32,
    pub length_scale: f32,
    pub junction_nudge: f32,
    pub junction_probe_dist: f32,
    pub facing_epsilon: f32,
    pub preview_range: f32,
    pub range_sample_count: usize,
}

impl NavParams {
    pub fn new(
        junction_threshold: f32,
        length_scale: f32,
        junction_nudge: f32,
        junction_probe_dist: f32,
        facing_epsilon: f32,
        preview_range: f32,
        range_sample_count: usize,
    ) -> Self {
        Self {
            junction_threshold,
            length_scale,
            junction_nudge,
            junction_probe_dist,
            facing_epsilon,
            preview_range,
            range_sample_count,
        }
    }

    /// Parses a JSON config object; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for NavParams {
    fn default() -> Self {
        Self {
            junction_threshold: JUNCTION_THRESHOLD_DIST,
            length_scale: LENGTH_SCALE,
            junction_nudge: JUNCTION_NUDGE,
            junction_probe_dist: JUNCTION_PROBE_DIST,
            facing_epsilon: FACING_EPSILON,
            preview_range: PREVIEW_RANGE,
            range_sample_count: RANGE_SAMPLE_COUNT,
        }
    }
}
