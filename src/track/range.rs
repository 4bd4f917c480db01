use serde::Serialize;

use super::{TrackId, TrackManager};
use crate::error::TrackError;
use crate::geom::Float3;

/// Closest sample of a track to a query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackProximity {
    pub dist_to_track: f32,
    pub dist_along_track: f32,
}

/// A control point located by `control_point_in_range`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlPointRef {
    pub track: TrackId,
    pub curve_index: usize,
    /// 0 and 3 are endpoints, 1 and 2 handles.
    pub point_index: usize,
    pub position: Float3,
}

impl TrackManager {
    /// Samples `track` at `range_sample_count + 1` evenly spaced t values and
    /// returns the closest sample strictly within `range` of `pos`.
    ///
    /// A coarse brute-force test: thin tracks passing between samples can be
    /// missed.
    pub fn is_track_in_range(
        &self,
        id: TrackId,
        pos: Float3,
        range: f32,
    ) -> Result<Option<TrackProximity>, TrackError> {
        let track = self.track(id)?;
        if range < 0.0 {
            return Ok(None);
        }

        let samples = self.params.range_sample_count.max(1);
        let mut smallest_sq = range * range;
        let mut closest = None;

        for i in 0..=samples {
            let t = i as f32 / samples as f32;
            let (point, _) = track.point_on_curve(t);
            let dist_sq = point.distance_squared(pos);
            if dist_sq < smallest_sq {
                smallest_sq = dist_sq;
                closest = Some(TrackProximity {
                    dist_to_track: dist_sq.sqrt(),
                    dist_along_track: t,
                });
            }
        }

        Ok(closest)
    }

    /// Closest track within `range` of `pos`.
    ///
    /// The search radius shrinks to each hit, so later tracks must be strictly
    /// closer to replace an earlier one.
    pub fn track_in_range(&self, pos: Float3, range: f32) -> Option<(TrackId, TrackProximity)> {
        let mut range = range;
        let mut best = None;

        for (id, _) in self.tracks.iter() {
            if let Ok(Some(proximity)) = self.is_track_in_range(id, pos, range) {
                range = proximity.dist_to_track;
                best = Some((id, proximity));
            }
        }

        best
    }

    /// Nearest curve endpoint (or any control point with `include_handles`)
    /// strictly within `range` of `pos`.
    pub fn point_in_range(&self, pos: Float3, include_handles: bool, range: f32) -> Option<Float3> {
        let step = if include_handles { 1 } else { 3 };
        let mut smallest = range;
        let mut found = None;

        for (_, track) in self.tracks.iter() {
            for curve in track.curves() {
                for &point in curve.points().iter().step_by(step) {
                    let dist = pos.distance(point);
                    if dist < smallest {
                        smallest = dist;
                        found = Some(point);
                    }
                }
            }
        }

        found
    }

    /// Nearest control point (handles included) strictly within `range` of
    /// `pos`, with its location for editing.
    pub fn control_point_in_range(&self, pos: Float3, range: f32) -> Option<ControlPointRef> {
        let mut smallest = range;
        let mut found = None;

        for (id, track) in self.tracks.iter() {
            for (curve_index, curve) in track.curves().iter().enumerate() {
                for (point_index, &point) in curve.points().iter().enumerate() {
                    let dist = pos.distance(point);
                    if dist < smallest {
                        smallest = dist;
                        found = Some(ControlPointRef {
                            track: id,
                            curve_index,
                            point_index,
                            position: point,
                        });
                    }
                }
            }
        }

        found
    }
}
