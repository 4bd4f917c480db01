use serde::Serialize;

use super::navigation::{LookDirection, NavigationQuery, TrackState};
use super::{TrackId, TrackManager};
use crate::error::TrackError;
use crate::geom::{saturate, Float3};

/// Which way an agent would leave the next junction ahead, for UI arrows.
///
/// `junction_index == None` means no junction lies within the look-ahead
/// window, and `dir` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct JunctionPreview {
    pub junction_index: Option<usize>,
    pub dir: Float3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewQuery {
    pub track: TrackId,
    pub dist_along_track: f32,
    pub desired_dir: LookDirection,
    /// World-space forward of the agent.
    pub current_forward: Float3,
    pub facing_forward: bool,
    pub reversing: bool,
}

impl TrackManager {
    /// Last preview stored by `update_preview`.
    #[inline]
    pub fn preview(&self) -> JunctionPreview {
        self.preview
    }

    /// Recomputes and stores the junction preview for `query`.
    pub fn update_preview(&mut self, query: &PreviewQuery) -> Result<JunctionPreview, TrackError> {
        let preview = self.compute_preview(query)?;
        self.preview = preview;
        Ok(preview)
    }

    /// Simulates a hop of `preview_range` in the direction the agent faces
    /// and reports where it would exit the junction it crosses, if any.
    ///
    /// The window is measured in global t, not distance, so it spans more
    /// ground on long tracks. Only the first junction in the window is seen.
    pub fn compute_preview(&self, query: &PreviewQuery) -> Result<JunctionPreview, TrackError> {
        let track = self.track(query.track)?;

        let dist = query.dist_along_track;
        let facing_down_track = track.curve_direction_at(dist).dot(query.current_forward) > 0.0;
        let range = self.params.preview_range;
        let look_ahead = saturate(if facing_down_track { dist + range } else { dist - range });

        let result = self.get_point_on_track(
            NavigationQuery::new(query.track, look_ahead, dist)
                .with_direction(query.desired_dir)
                .reversing(query.reversing),
        )?;

        let Some(junction_index) = result.junction_index else {
            return Ok(JunctionPreview::default());
        };

        let switched = result.switched_track(query.track);
        let exit_track = if switched { self.track(result.track)? } else { track };
        let mut dir = exit_track.curve_direction_at(result.dist_along_track);

        if result.track_state == Some(TrackState::FacingBackward) || (!query.facing_forward && !switched) {
            dir = -dir;
        }

        Ok(JunctionPreview {
            junction_index: Some(junction_index),
            dir,
        })
    }
}
