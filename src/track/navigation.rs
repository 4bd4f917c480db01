use log::Level;
use serde::{Deserialize, Serialize};

use super::junction::Junction;
use super::{CurveList, TrackId, TrackManager};
use crate::error::TrackError;
use crate::geom::{saturate, Float3, EPSILON};

/// Lateral intent at a junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LookDirection {
    Left,
    #[default]
    Center,
    Right,
}

/// Whether an agent faces along increasing t or against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackState {
    FacingForward,
    FacingBackward,
}

/// One navigation step: the agent moved from `prev_dist_along_track` to
/// `dist_along_track` on `track`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationQuery {
    pub track: TrackId,
    pub dist_along_track: f32,
    pub prev_dist_along_track: f32,
    pub desired_dir: LookDirection,
    pub reversing: bool,
    /// Raises branch diagnostics from trace to debug level.
    pub verbose: bool,
}

impl NavigationQuery {
    pub fn new(track: TrackId, dist_along_track: f32, prev_dist_along_track: f32) -> Self {
        Self {
            track,
            dist_along_track,
            prev_dist_along_track,
            desired_dir: LookDirection::Center,
            reversing: false,
            verbose: false,
        }
    }

    pub fn with_direction(mut self, desired_dir: LookDirection) -> Self {
        self.desired_dir = desired_dir;
        self
    }

    pub fn reversing(mut self, reversing: bool) -> Self {
        self.reversing = reversing;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Outcome of `TrackManager::get_point_on_track`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationResult {
    /// Position at the proposed distance on the query's track.
    pub position: Float3,
    pub track: TrackId,
    /// Always within [0, 1].
    pub dist_along_track: f32,
    /// Junction matched at the crossed boundary, switched or not.
    pub junction_index: Option<usize>,
    /// Curve under `dist_along_track` on `track`.
    pub curve_index: usize,
    /// New facing state, only set when the agent changed track.
    pub track_state: Option<TrackState>,
}

impl NavigationResult {
    pub fn switched_track(&self, from: TrackId) -> bool {
        self.track != from
    }
}

impl TrackManager {
    /// Resolves where an agent ends up after moving along its track,
    /// switching tracks if it crossed a junction.
    ///
    /// Without a boundary crossing the distance is only saturated. When a
    /// curve boundary or track end is crossed, the junction at that boundary
    /// (if any) decides the next track from the junction's arity, the desired
    /// direction and whether the agent hit the end of its track. A track end
    /// without a junction is a dead end: the agent stays, saturated at 0 or 1.
    pub fn get_point_on_track(&self, query: NavigationQuery) -> Result<NavigationResult, TrackError> {
        self.ensure_junctions_current()?;
        let track_id = query.track;
        let track = self.track(track_id)?;
        let level = if query.verbose { Level::Debug } else { Level::Trace };

        let dist = query.dist_along_track;
        let prev_dist = query.prev_dist_along_track;

        let (prev_point, prev_curve) = track.point_on_curve(prev_dist);
        let (new_point, new_curve) = track.point_on_curve(dist);

        let reached_end_of_line =
            (dist <= 0.0 && prev_dist > 0.0) || (dist >= 1.0 && prev_dist < 1.0);
        let changed_curve = new_curve != prev_curve;

        let mut result = NavigationResult {
            position: new_point,
            track: track_id,
            dist_along_track: saturate(dist),
            junction_index: None,
            curve_index: new_curve,
            track_state: None,
        };

        if !changed_curve && !reached_end_of_line {
            return Ok(result);
        }

        let boundary = if new_curve < prev_curve {
            prev_curve
        } else if new_curve == prev_curve {
            if dist <= 0.0 {
                0
            } else {
                track.curve_count()
            }
        } else {
            new_curve
        };
        let boundary_pos = track.point_at_junction(boundary);

        let threshold = self.params.junction_threshold;
        let Some((junction_index, junction)) = self.junctions.iter().enumerate().find(|(_, j)| {
            j.contains_track(track_id) && j.pos.nearly_equals(boundary_pos, threshold)
        }) else {
            log::log!(level, "No junction at boundary {boundary} of track {track_id}");
            return Ok(result);
        };
        result.junction_index = Some(junction_index);

        let track_forward = (new_point - prev_point).normalize();
        let track_right = track_forward.cross(Float3::UP);
        let other_slot = || junction.links().iter().position(|l| l.track != track_id);

        let chosen = if junction.track_count() == 2 {
            if reached_end_of_line {
                log::log!(level, "Changed to only other track at junction (end of the line)");
                other_slot()
            } else if query.desired_dir == LookDirection::Center {
                log::log!(level, "Went straight through a 2-way junction");
                None
            } else {
                log::log!(level, "Changed to only other track at junction");
                other_slot()
            }
        } else {
            match query.desired_dir {
                LookDirection::Center if reached_end_of_line => {
                    log::log!(level, "Went straight through an n-way junction (jumped tracks)");
                    self.track_index_in_dir(track_forward, junction, track_id)
                }
                LookDirection::Center => {
                    log::log!(level, "Went straight through an n-way junction (same track)");
                    None
                }
                LookDirection::Left | LookDirection::Right => {
                    let mut desired = if query.desired_dir == LookDirection::Left {
                        -track_right
                    } else {
                        track_right
                    };
                    if query.reversing {
                        desired = -desired;
                    }
                    let slot = self.track_index_in_dir(desired, junction, track_id);
                    log::log!(
                        level,
                        "{:?} at an n-way junction: {}",
                        query.desired_dir,
                        if slot.is_some() { "turned" } else { "no track that way" }
                    );
                    slot
                }
            }
        };

        let Some(slot) = chosen else {
            return Ok(result);
        };

        let link = junction.links()[slot];
        let new_track = self.track(link.track)?;
        let mut new_dist = new_track.t_at_junction(link.curve_index);

        let desired = match query.desired_dir {
            LookDirection::Center if query.reversing => -track_forward,
            LookDirection::Center => track_forward,
            LookDirection::Right => track_right,
            LookDirection::Left => -track_right,
        };
        let state = self.track_state_in_dir(desired, new_track, new_dist);

        new_dist += match (query.reversing, state) {
            (true, TrackState::FacingForward) | (false, TrackState::FacingBackward) => {
                -self.params.junction_nudge
            }
            (true, TrackState::FacingBackward) | (false, TrackState::FacingForward) => {
                self.params.junction_nudge
            }
        };

        let new_dist = saturate(new_dist);
        result.track = link.track;
        result.dist_along_track = new_dist;
        result.curve_index = new_track.curve_index_and_local_t(new_dist).0;
        result.track_state = Some(state);
        Ok(result)
    }

    /// Picks the junction slot whose track leaves the junction most closely
    /// along `desired_dir`.
    ///
    /// Each other track is probed a short distance away from the junction and
    /// the direction from the junction to the probe is compared with
    /// `desired_dir`. Only strictly positive alignment counts; no candidate or
    /// a tie for best yields `None`, meaning stay on the current track.
    pub fn track_index_in_dir(
        &self,
        desired_dir: Float3,
        junction: &Junction,
        current: TrackId,
    ) -> Option<usize> {
        const TIE_EPSILON: f32 = 1e-6;

        let threshold = self.params.junction_threshold;
        let probe = self.params.junction_probe_dist;

        let mut best: Option<(usize, f32)> = None;
        let mut tied = false;

        for (slot, link) in junction.links().iter().enumerate() {
            if link.track == current {
                continue;
            }
            let Ok(candidate) = self.track(link.track) else {
                continue;
            };

            let count = candidate.curve_count();
            let at_junction =
                |m: &usize| candidate.point_at_junction(*m).nearly_equals(junction.pos, threshold);
            let Some(boundary) = (0..=count).find(at_junction) else {
                continue;
            };

            let probe_t = if boundary == 0 {
                probe
            } else if boundary == count {
                1.0 - probe
            } else {
                let t = candidate.t_at_junction(boundary);
                if candidate.curve_direction_at(t).dot(desired_dir) > 0.0 {
                    t + probe
                } else {
                    t - probe
                }
            };

            let (probe_pos, _) = candidate.point_on_curve(probe_t);
            let alignment = (probe_pos - junction.pos).normalize().dot(desired_dir);
            if alignment <= 0.0 {
                continue;
            }

            match best {
                Some((_, best_alignment)) if (alignment - best_alignment).abs() <= TIE_EPSILON => {
                    tied = true;
                }
                Some((_, best_alignment)) if alignment < best_alignment => {}
                _ => {
                    best = Some((slot, alignment));
                    tied = false;
                }
            }
        }

        if tied {
            return None;
        }
        best.map(|(slot, _)| slot)
    }

    /// Facing state of an agent looking along `desired_dir` at
    /// `dist_along_track` on `track`.
    pub fn track_state_in_dir(
        &self,
        desired_dir: Float3,
        track: &CurveList,
        dist_along_track: f32,
    ) -> TrackState {
        let epsilon = self.params.facing_epsilon;
        if track.is_vector_facing_down_track(dist_along_track, desired_dir, epsilon) {
            TrackState::FacingForward
        } else {
            TrackState::FacingBackward
        }
    }

    /// Moves global t by a travel `amount`, converted to local t through the
    /// current curve's arc length.
    ///
    /// Only the starting curve's length is used, so speed changes when the
    /// agent passes onto a curve of different length.
    pub fn advance_t_along_track(&self, id: TrackId, amount: f32, t: f32) -> Result<f32, TrackError> {
        let track = self.track(id)?;
        let (curve_index, local_t) = track.curve_index_and_local_t(t);
        let curve_length = track.curves()[curve_index].length();

        if curve_length <= EPSILON {
            log::warn!(
                "Curve {curve_index} of track {id} has no length; cannot advance along it"
            );
            return Ok(t);
        }

        let new_local_t = local_t + amount * (self.params.length_scale / curve_length);
        Ok(track.global_t_from_curve_index_and_local_t(curve_index, new_local_t))
    }
}
