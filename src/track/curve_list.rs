use crate::error::TrackError;
use crate::geom::{BezierCurve, Float3};

/// An ordered run of Bezier curves travelled as one track.
///
/// Global t spans the whole list with each curve taking an equal 1/N share,
/// regardless of arc length. Consecutive curves are expected to share
/// endpoints (`curves[i].end() == curves[i + 1].start()`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveList {
    curves: Vec<BezierCurve>,
}

impl CurveList {
    pub fn new(curves: Vec<BezierCurve>) -> Self {
        Self { curves }
    }

    /// Track of straight segments through `points`.
    pub fn polyline(points: &[Float3]) -> Self {
        Self::new(
            points
                .windows(2)
                .map(|pair| BezierCurve::line(pair[0], pair[1]))
                .collect(),
        )
    }

    #[inline]
    pub fn curves(&self) -> &[BezierCurve] {
        &self.curves
    }

    #[inline]
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn push_curve(&mut self, curve: BezierCurve) {
        self.curves.push(curve);
    }

    /// Splits global t into `(curve_index, local_t)`.
    ///
    /// `t >= 1` resolves to the end of the last curve rather than the start of
    /// a nonexistent curve N.
    pub fn curve_index_and_local_t(&self, global_t: f32) -> (usize, f32) {
        let count = self.curves.len();
        if count == 0 || global_t <= 0.0 {
            return (0, 0.0);
        }
        if global_t >= 1.0 {
            return (count - 1, 1.0);
        }

        let scaled = global_t * count as f32;
        let index = (scaled.floor() as usize).min(count - 1);
        let local_t = (scaled - index as f32).clamp(0.0, 1.0);
        (index, local_t)
    }

    /// Inverse of `curve_index_and_local_t`, clamped to [0, 1].
    pub fn global_t_from_curve_index_and_local_t(&self, curve_index: usize, local_t: f32) -> f32 {
        let count = self.curves.len();
        if count == 0 {
            return 0.0;
        }
        ((curve_index as f32 + local_t) / count as f32).clamp(0.0, 1.0)
    }

    /// Position at global t, plus the index of the curve it falls on.
    pub fn point_on_curve(&self, global_t: f32) -> (Float3, usize) {
        if self.curves.is_empty() {
            return (Float3::ZERO, 0);
        }
        let (index, local_t) = self.curve_index_and_local_t(global_t);
        (self.curves[index].point_at(local_t), index)
    }

    /// Normalized tangent at global t.
    ///
    /// Not guaranteed to be sign-continuous across curve boundaries if the
    /// authored curves flip direction; callers compare against their own
    /// previous heading.
    pub fn curve_direction_at(&self, global_t: f32) -> Float3 {
        if self.curves.is_empty() {
            return Float3::ZERO;
        }
        let (index, local_t) = self.curve_index_and_local_t(global_t);
        self.curves[index].derivative_at(local_t).normalize()
    }

    // o---o----o---o|o---o----o---o|o---o----o---o
    // 0             1              2             3
    /// Position of junction boundary `index`: the start of curve `index`, or
    /// the end of the last curve when `index >= curve_count`.
    pub fn point_at_junction(&self, index: usize) -> Float3 {
        match self.curves.len() {
            0 => Float3::ZERO,
            count if index < count => self.curves[index].start(),
            count => self.curves[count - 1].end(),
        }
    }

    /// Global t of junction boundary `index`.
    pub fn t_at_junction(&self, index: usize) -> f32 {
        if self.curves.is_empty() {
            return 0.0;
        }
        index as f32 / self.curves.len() as f32
    }

    /// Whether `vector` points along increasing t at `global_t`, by more
    /// than `epsilon` of alignment.
    pub fn is_vector_facing_down_track(&self, global_t: f32, vector: Float3, epsilon: f32) -> bool {
        self.curve_direction_at(global_t).dot(vector) > epsilon
    }

    pub fn control_point(&self, curve_index: usize, point_index: usize) -> Result<Float3, TrackError> {
        self.check_indices(curve_index, point_index)?;
        Ok(self.curves[curve_index].point(point_index))
    }

    /// Moves a control point while keeping neighbouring curves attached.
    ///
    /// Endpoints drag their own handle and the neighbour's shared endpoint and
    /// handle by the same offset. With `keep_handles_mirrored`, moving a handle
    /// reflects the neighbour's opposite handle through the shared endpoint,
    /// preserving that handle's length.
    pub fn set_point(
        &mut self,
        curve_index: usize,
        point_index: usize,
        position: Float3,
        keep_handles_mirrored: bool,
    ) -> Result<(), TrackError> {
        self.check_indices(curve_index, point_index)?;

        let has_prev = curve_index > 0;
        let has_next = curve_index + 1 < self.curves.len();
        let mut points = *self.curves[curve_index].points();

        match point_index {
            0 => {
                let delta = position - points[0];
                points[0] = position;
                points[1] += delta;
                if has_prev {
                    self.edit_curve(curve_index - 1, |prev| {
                        prev[3] = position;
                        prev[2] += delta;
                    });
                }
            }
            3 => {
                let delta = position - points[3];
                points[3] = position;
                points[2] += delta;
                if has_next {
                    self.edit_curve(curve_index + 1, |next| {
                        next[0] = position;
                        next[1] += delta;
                    });
                }
            }
            1 => {
                points[1] = position;
                if keep_handles_mirrored && has_prev {
                    let anchor = points[0];
                    self.edit_curve(curve_index - 1, |prev| {
                        prev[2] = mirror_handle(anchor, position, prev[2]);
                    });
                }
            }
            _ => {
                points[2] = position;
                if keep_handles_mirrored && has_next {
                    let anchor = points[3];
                    self.edit_curve(curve_index + 1, |next| {
                        next[1] = mirror_handle(anchor, position, next[1]);
                    });
                }
            }
        }

        self.curves[curve_index] = BezierCurve::from_points(points);
        Ok(())
    }

    fn edit_curve(&mut self, curve_index: usize, edit: impl FnOnce(&mut [Float3; 4])) {
        let mut points = *self.curves[curve_index].points();
        edit(&mut points);
        self.curves[curve_index] = BezierCurve::from_points(points);
    }

    fn check_indices(&self, curve_index: usize, point_index: usize) -> Result<(), TrackError> {
        if curve_index >= self.curves.len() {
            return Err(TrackError::CurveOutOfRange {
                curve: curve_index,
                count: self.curves.len(),
            });
        }
        if point_index > 3 {
            return Err(TrackError::PointOutOfRange(point_index));
        }
        Ok(())
    }
}

/// Opposite handle through `anchor`, keeping the old handle's length.
fn mirror_handle(anchor: Float3, moved: Float3, opposite: Float3) -> Float3 {
    let dir = (anchor - moved).normalize();
    if dir == Float3::ZERO {
        return opposite;
    }
    anchor + dir * anchor.distance(opposite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::FACING_EPSILON;
    use crate::track::test_support::{straight_track, v};
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn global_t_boundaries() {
        let track = straight_track(&[v(0.0, 0.0, 0.0), v(3.0, 0.0, 0.0), v(6.0, 0.0, 0.0)]);

        assert_eq!(track.curve_index_and_local_t(0.0), (0, 0.0));
        assert_eq!(track.curve_index_and_local_t(1.0), (1, 1.0));
        assert_eq!(track.curve_index_and_local_t(-0.2), (0, 0.0));
        assert_eq!(track.curve_index_and_local_t(1.5), (1, 1.0));

        let (index, local_t) = track.curve_index_and_local_t(0.5);
        assert_eq!(index, 1);
        assert_relative_eq!(local_t, 0.0, epsilon = TOLERANCE);

        let (index, local_t) = track.curve_index_and_local_t(0.49);
        assert_eq!(index, 0);
        assert_relative_eq!(local_t, 0.98, epsilon = 1e-4);
    }

    #[test]
    fn global_t_round_trip() {
        let track = straight_track(&[
            v(0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0),
            v(2.0, 1.0, 0.0),
            v(4.0, 1.0, 2.0),
        ]);

        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let (index, local_t) = track.curve_index_and_local_t(t);
            let back = track.global_t_from_curve_index_and_local_t(index, local_t);
            assert_relative_eq!(back, t, epsilon = 1e-5);
        }
    }

    #[test]
    fn point_on_curve_at_shared_boundary() {
        let track = straight_track(&[v(0.0, 0.0, 0.0), v(3.0, 0.0, 0.0), v(6.0, 0.0, 0.0)]);

        let (pos, index) = track.point_on_curve(0.5);
        assert_eq!(index, 1);
        assert_relative_eq!(pos.x, 3.0, epsilon = TOLERANCE);

        let (_, index) = track.point_on_curve(0.4999);
        assert_eq!(index, 0);

        let (end, index) = track.point_on_curve(1.0);
        assert_eq!(index, 1);
        assert_relative_eq!(end.x, 6.0, epsilon = TOLERANCE);
    }

    #[test]
    fn junction_points_address_every_boundary() {
        let track = straight_track(&[v(0.0, 0.0, 0.0), v(3.0, 0.0, 0.0), v(6.0, 0.0, 0.0)]);

        assert_eq!(track.point_at_junction(0), v(0.0, 0.0, 0.0));
        assert_eq!(track.point_at_junction(1), v(3.0, 0.0, 0.0));
        assert_eq!(track.point_at_junction(2), v(6.0, 0.0, 0.0));
        assert_relative_eq!(track.t_at_junction(1), 0.5, epsilon = TOLERANCE);
        assert_relative_eq!(track.t_at_junction(2), 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn direction_is_normalized() {
        let track = straight_track(&[v(0.0, 0.0, 0.0), v(0.0, 0.0, 8.0)]);
        let dir = track.curve_direction_at(0.3);
        assert_relative_eq!(dir.magnitude(), 1.0, epsilon = TOLERANCE);
        assert_relative_eq!(dir.z, 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn facing_down_track_uses_dot_sign() {
        let track = straight_track(&[v(0.0, 0.0, 0.0), v(5.0, 0.0, 0.0)]);
        assert!(track.is_vector_facing_down_track(0.5, Float3::RIGHT, FACING_EPSILON));
        assert!(!track.is_vector_facing_down_track(0.5, -Float3::RIGHT, FACING_EPSILON));
        assert!(!track.is_vector_facing_down_track(0.5, Float3::UP, FACING_EPSILON));
        assert!(!track.is_vector_facing_down_track(0.5, v(0.3, 0.0, 0.9), 0.5));
    }

    #[test]
    fn empty_list_is_harmless() {
        let track = CurveList::default();
        assert_eq!(track.point_on_curve(0.5), (Float3::ZERO, 0));
        assert_eq!(track.curve_direction_at(0.5), Float3::ZERO);
        assert_eq!(track.point_at_junction(3), Float3::ZERO);
    }

    #[test]
    fn moving_shared_endpoint_keeps_curves_attached() {
        let mut track = straight_track(&[v(0.0, 0.0, 0.0), v(3.0, 0.0, 0.0), v(6.0, 0.0, 0.0)]);
        track.set_point(1, 0, v(3.0, 2.0, 0.0), false).unwrap();

        assert_eq!(track.curves()[0].end(), v(3.0, 2.0, 0.0));
        assert_eq!(track.curves()[1].start(), v(3.0, 2.0, 0.0));
        assert_relative_eq!(track.curves()[0].point(2).y, 2.0, epsilon = TOLERANCE);
        assert_relative_eq!(track.curves()[1].point(1).y, 2.0, epsilon = TOLERANCE);
        assert!(track.curves()[0].length() > 3.0);
    }

    #[test]
    fn mirrored_handle_reflects_through_anchor() {
        let mut track = straight_track(&[v(0.0, 0.0, 0.0), v(3.0, 0.0, 0.0), v(6.0, 0.0, 0.0)]);
        track.set_point(1, 1, v(3.0, 0.0, 1.0), true).unwrap();

        let opposite = track.curves()[0].point(2);
        assert_relative_eq!(opposite.x, 3.0, epsilon = TOLERANCE);
        assert_relative_eq!(opposite.z, -1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn unmirrored_handle_leaves_neighbour() {
        let mut track = straight_track(&[v(0.0, 0.0, 0.0), v(3.0, 0.0, 0.0), v(6.0, 0.0, 0.0)]);
        let before = track.curves()[0];
        track.set_point(1, 1, v(3.0, 0.0, 1.0), false).unwrap();
        assert_eq!(track.curves()[0], before);
    }

    #[test]
    fn set_point_rejects_bad_indices() {
        let mut track = straight_track(&[v(0.0, 0.0, 0.0), v(3.0, 0.0, 0.0)]);
        assert_eq!(
            track.set_point(2, 0, Float3::ZERO, false),
            Err(TrackError::CurveOutOfRange { curve: 2, count: 1 })
        );
        assert_eq!(
            track.set_point(0, 4, Float3::ZERO, false),
            Err(TrackError::PointOutOfRange(4))
        );
    }
}
