use serde::Serialize;

use super::navigation::{LookDirection, NavigationQuery, TrackState};
use super::{TrackId, TrackManager};
use crate::error::TrackError;
use crate::geom::{saturate, Float3};

/// Where a rider sits on the network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackAttachment {
    pub track: TrackId,
    pub dist_along_track: f32,
    pub state: TrackState,
}

/// One tick of rider input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiderInput {
    /// Signed travel along the rider's own forward; negative reverses.
    pub move_delta: f32,
    pub desired_dir: LookDirection,
}

/// Outcome of `TrackRider::step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiderStep {
    pub position: Float3,
    pub attachment: TrackAttachment,
    pub junction_index: Option<usize>,
    pub switched_track: bool,
}

/// An agent riding the track network: tracks its attachment and drives the
/// advance-then-resolve cycle each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackRider {
    attachment: Option<TrackAttachment>,
}

impl TrackRider {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn attachment(&self) -> Option<TrackAttachment> {
        self.attachment
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// Snaps onto `track` at `dist_along_track`, facing along `forward`.
    /// Returns the world position of the attach point.
    pub fn attach(
        &mut self,
        manager: &TrackManager,
        track: TrackId,
        dist_along_track: f32,
        forward: Float3,
    ) -> Result<Float3, TrackError> {
        let curves = manager.track(track)?;
        let dist_along_track = saturate(dist_along_track);
        let state = manager.track_state_in_dir(forward, curves, dist_along_track);

        log::debug!("Rider attached to track {track} at {dist_along_track:.3} ({state:?})");
        self.attachment = Some(TrackAttachment {
            track,
            dist_along_track,
            state,
        });
        Ok(curves.point_on_curve(dist_along_track).0)
    }

    pub fn detach(&mut self) -> Option<TrackAttachment> {
        self.attachment.take()
    }

    /// Advances the rider by `input.move_delta` and resolves any junction it
    /// crosses. The attachment is only updated when the whole step succeeds.
    pub fn step(&mut self, manager: &TrackManager, input: RiderInput) -> Result<RiderStep, TrackError> {
        let current = self.attachment.ok_or(TrackError::NotAttached)?;

        let track_delta = match current.state {
            TrackState::FacingForward => input.move_delta,
            TrackState::FacingBackward => -input.move_delta,
        };
        let reversing = input.move_delta < 0.0;

        let new_dist =
            manager.advance_t_along_track(current.track, track_delta, current.dist_along_track)?;
        let result = manager.get_point_on_track(
            NavigationQuery::new(current.track, new_dist, current.dist_along_track)
                .with_direction(input.desired_dir)
                .reversing(reversing),
        )?;

        let attachment = TrackAttachment {
            track: result.track,
            dist_along_track: result.dist_along_track,
            state: result.track_state.unwrap_or(current.state),
        };
        let position = manager
            .track(attachment.track)?
            .point_on_curve(attachment.dist_along_track)
            .0;

        self.attachment = Some(attachment);
        Ok(RiderStep {
            position,
            attachment,
            junction_index: result.junction_index,
            switched_track: result.switched_track(current.track),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::test_support::{manager_with, three_way, v};
    use approx::assert_relative_eq;

    #[test]
    fn step_without_attachment_fails() {
        let (manager, _) = three_way();
        let mut rider = TrackRider::new();
        assert_eq!(
            rider.step(&manager, RiderInput::default()),
            Err(TrackError::NotAttached)
        );
    }

    #[test]
    fn attach_derives_facing_from_forward() {
        let (manager, ids) = three_way();
        let mut rider = TrackRider::new();

        let pos = rider.attach(&manager, ids[0], 0.5, Float3::RIGHT).unwrap();
        assert_relative_eq!(pos.x, 5.0, epsilon = 1e-4);
        assert_eq!(rider.attachment().map(|a| a.state), Some(TrackState::FacingForward));

        rider.attach(&manager, ids[0], 0.5, -Float3::RIGHT).unwrap();
        assert_eq!(rider.attachment().map(|a| a.state), Some(TrackState::FacingBackward));
    }

    #[test]
    fn facing_backward_moves_down_t() {
        let (manager, ids) = three_way();
        let mut rider = TrackRider::new();
        rider.attach(&manager, ids[0], 0.5, -Float3::RIGHT).unwrap();

        // track 0 is 10 long: 0.01 of travel is 0.1 of t
        let step = rider
            .step(&manager, RiderInput { move_delta: 0.01, ..Default::default() })
            .unwrap();
        assert_relative_eq!(step.attachment.dist_along_track, 0.4, epsilon = 1e-4);
        assert_relative_eq!(step.position.x, 4.0, epsilon = 1e-3);
        assert!(!step.switched_track);
    }

    #[test]
    fn reversing_moves_against_facing() {
        let (manager, ids) = three_way();
        let mut rider = TrackRider::new();
        rider.attach(&manager, ids[0], 0.5, Float3::RIGHT).unwrap();

        let step = rider
            .step(&manager, RiderInput { move_delta: -0.01, ..Default::default() })
            .unwrap();
        assert_relative_eq!(step.attachment.dist_along_track, 0.4, epsilon = 1e-4);
        assert_eq!(step.attachment.state, TrackState::FacingForward);
    }

    #[test]
    fn rides_across_junction() {
        let (manager, ids) = manager_with(&[
            &[v(0.0, 0.0, 0.0), v(10.0, 0.0, 0.0)],
            &[v(10.0, 0.0, 0.0), v(20.0, 0.0, 0.0)],
        ]);
        let mut rider = TrackRider::new();
        rider.attach(&manager, ids[0], 0.95, Float3::RIGHT).unwrap();

        let step = rider
            .step(&manager, RiderInput { move_delta: 0.01, ..Default::default() })
            .unwrap();
        assert!(step.switched_track);
        assert_eq!(step.junction_index, Some(0));
        assert_eq!(step.attachment.track, ids[1]);
        assert_eq!(step.attachment.state, TrackState::FacingForward);
        assert_relative_eq!(step.attachment.dist_along_track, 0.001, epsilon = 1e-5);
        assert_relative_eq!(step.position.x, 10.01, epsilon = 1e-3);
        assert_eq!(rider.attachment(), Some(step.attachment));
    }

    #[test]
    fn right_turn_at_three_way() {
        let (manager, ids) = three_way();
        let mut rider = TrackRider::new();
        rider.attach(&manager, ids[0], 0.98, Float3::RIGHT).unwrap();

        let step = rider
            .step(
                &manager,
                RiderInput {
                    move_delta: 0.01,
                    desired_dir: LookDirection::Right,
                },
            )
            .unwrap();
        assert_eq!(step.attachment.track, ids[2]);
        assert!(step.position.z > 0.0);
    }

    #[test]
    fn detach_returns_last_attachment() {
        let (manager, ids) = three_way();
        let mut rider = TrackRider::new();
        rider.attach(&manager, ids[1], 0.25, Float3::RIGHT).unwrap();

        let detached = rider.detach().unwrap();
        assert_eq!(detached.track, ids[1]);
        assert!(!rider.is_attached());
        assert!(rider.detach().is_none());
    }
}
