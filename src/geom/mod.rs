//! Pure geometry primitives for track evaluation.
//!
//! Vector math, cubic Bezier segments and the tuning constants shared by the
//! track layer. Nothing here knows about tracks or junctions.

mod bezier;
mod math;

pub mod constants;

pub use bezier::BezierCurve;
pub use constants::{
    saturate, DEBUG_SEGMENT_COUNT, EPSILON, FACING_EPSILON, JUNCTION_NUDGE, JUNCTION_PROBE_DIST,
    JUNCTION_THRESHOLD_DIST, LENGTH_SAMPLE_COUNT, LENGTH_SCALE, MAX_JUNCTION_TRACKS,
    PREVIEW_RANGE, RANGE_SAMPLE_COUNT,
};
pub use math::Float3;
