//! Fixtures shared by the track tests.

use super::{CurveList, TrackId, TrackManager};
use crate::geom::Float3;

pub fn v(x: f32, y: f32, z: f32) -> Float3 {
    Float3::new(x, y, z)
}

/// Straight segments through `points`, one curve per pair.
pub fn straight_track(points: &[Float3]) -> CurveList {
    CurveList::polyline(points)
}

/// Manager with the given polylines added and junctions built.
pub fn manager_with(tracks: &[&[Float3]]) -> (TrackManager, Vec<TrackId>) {
    let mut manager = TrackManager::new();
    let ids = tracks
        .iter()
        .map(|points| manager.add_track(straight_track(points)).unwrap())
        .collect();
    manager.find_junctions();
    (manager, ids)
}

/// A T-shaped three-way junction at (10, 0, 0).
///
/// Track 0 runs in from (0, 0, 0), track 1 continues to (20, 0, 0) and
/// track 2 leaves along +z, which is `cross(forward, up)` (right) when
/// heading +x.
pub fn three_way() -> (TrackManager, Vec<TrackId>) {
    manager_with(&[
        &[v(0.0, 0.0, 0.0), v(10.0, 0.0, 0.0)],
        &[v(10.0, 0.0, 0.0), v(20.0, 0.0, 0.0)],
        &[v(10.0, 0.0, 0.0), v(10.0, 0.0, 10.0)],
    ])
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
