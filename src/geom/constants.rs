/// Distance under which two curve endpoints are treated as one junction point.
pub const JUNCTION_THRESHOLD_DIST: f32 = 0.01;
/// Most tracks that can meet at a single junction.
pub const MAX_JUNCTION_TRACKS: usize = 4;
/// Polyline samples used to approximate a curve's arc length.
pub const LENGTH_SAMPLE_COUNT: usize = 128;
/// Converts a travel amount into local t, divided by the curve's arc length.
pub const LENGTH_SCALE: f32 = 100.0;
/// Push past a junction after switching so the crossing does not retrigger.
pub const JUNCTION_NUDGE: f32 = 0.001;
/// Distance along a candidate track sampled when judging its direction.
pub const JUNCTION_PROBE_DIST: f32 = 0.01;
/// Dot product above which a vector counts as facing down the track.
pub const FACING_EPSILON: f32 = 0.001;
/// Look-ahead, in global t, used for the junction preview.
pub const PREVIEW_RANGE: f32 = 0.2;
/// Samples taken along a track by the brute-force range query.
pub const RANGE_SAMPLE_COUNT: usize = 25;
/// Line segments per curve when drawing debug polylines.
pub const DEBUG_SEGMENT_COUNT: usize = 10;
pub const EPSILON: f32 = 1.192_093e-7;

/// Clamps to [0, 1].
pub fn saturate(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-6;

    #[test]
    fn constants_junction_threshold() {
        assert_relative_eq!(JUNCTION_THRESHOLD_DIST, 0.01, epsilon = TOLERANCE);
        assert_eq!(MAX_JUNCTION_TRACKS, 4);
    }

    #[test]
    fn constants_nudge_smaller_than_probe() {
        assert!(JUNCTION_NUDGE < JUNCTION_PROBE_DIST);
    }

    #[test]
    fn saturate_in_range_unchanged() {
        for value in [0.0, 0.25, 0.5, 1.0] {
            assert_relative_eq!(saturate(value), value, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn saturate_clamps_both_ends() {
        assert_relative_eq!(saturate(-0.3), 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(saturate(1.7), 1.0, epsilon = TOLERANCE);
    }
}
