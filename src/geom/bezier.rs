use super::constants::{saturate, LENGTH_SAMPLE_COUNT};
use super::math::Float3;

/// Cubic Bezier segment with a cached polyline arc length.
///
/// `points[0]` and `points[3]` are the endpoints, `points[1]` and `points[2]`
/// the handles. Control points are only reachable through setters so the
/// cached length is always current.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BezierCurve {
    points: [Float3; 4],
    length: f32,
}

impl BezierCurve {
    pub fn new(p0: Float3, p1: Float3, p2: Float3, p3: Float3) -> Self {
        Self::from_points([p0, p1, p2, p3])
    }

    pub fn from_points(points: [Float3; 4]) -> Self {
        let mut curve = Self {
            points,
            length: 0.0,
        };
        curve.calculate_length();
        curve
    }

    /// Straight segment with handles at the thirds, so t maps linearly to distance.
    pub fn line(start: Float3, end: Float3) -> Self {
        Self::new(
            start,
            start.lerp(end, 1.0 / 3.0),
            start.lerp(end, 2.0 / 3.0),
            end,
        )
    }

    #[inline]
    pub fn points(&self) -> &[Float3; 4] {
        &self.points
    }

    #[inline]
    pub fn point(&self, index: usize) -> Float3 {
        self.points[index]
    }

    #[inline]
    pub fn start(&self) -> Float3 {
        self.points[0]
    }

    #[inline]
    pub fn end(&self) -> Float3 {
        self.points[3]
    }

    /// Cached arc length from the last `calculate_length`.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Moves one control point and refreshes the cached length.
    ///
    /// # Panics
    /// If `index` is not in 0..4.
    pub fn set_point(&mut self, index: usize, position: Float3) {
        self.points[index] = position;
        self.calculate_length();
    }

    /// Position at `t`, clamped to [0, 1].
    pub fn point_at(&self, t: f32) -> Float3 {
        self.point_at_unclamped(saturate(t))
    }

    /// Position at `t` without clamping, for editor previews past the ends.
    pub fn point_at_unclamped(&self, t: f32) -> Float3 {
        let [p0, p1, p2, p3] = self.points;
        let u = 1.0 - t;
        u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
    }

    /// Unnormalized first derivative at `t`, clamped to [0, 1].
    pub fn derivative_at(&self, t: f32) -> Float3 {
        let t = saturate(t);
        let [p0, p1, p2, p3] = self.points;
        let u = 1.0 - t;
        3.0 * u * u * (p1 - p0) + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (p3 - p2)
    }

    /// Recomputes the cached arc length by summing a 128-sample polyline.
    pub fn calculate_length(&mut self) {
        let mut length = 0.0;
        let mut last = self.point_at(0.0);
        for i in 1..LENGTH_SAMPLE_COUNT {
            let t = i as f32 / (LENGTH_SAMPLE_COUNT - 1) as f32;
            let next = self.point_at(t);
            length += next.distance(last);
            last = next;
        }
        self.length = length;
    }
}

impl Default for BezierCurve {
    fn default() -> Self {
        Self::from_points([Float3::ZERO; 4])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-4;

    fn arc() -> BezierCurve {
        BezierCurve::new(
            Float3::new(0.0, 0.0, 0.0),
            Float3::new(0.0, 2.0, 1.0),
            Float3::new(4.0, 3.0, -2.0),
            Float3::new(5.0, 0.0, 1.0),
        )
    }

    #[test]
    fn endpoints_interpolate_exactly() {
        let curve = arc();
        assert_eq!(curve.point_at(0.0), curve.start());
        assert_eq!(curve.point_at(1.0), curve.end());
    }

    #[test]
    fn evaluation_clamps_t() {
        let curve = arc();
        assert_eq!(curve.point_at(-0.5), curve.start());
        assert_eq!(curve.point_at(2.0), curve.end());
        assert_eq!(curve.derivative_at(3.0), curve.derivative_at(1.0));
    }

    #[test]
    fn unclamped_extrapolates_straight_line() {
        let curve = BezierCurve::line(Float3::ZERO, Float3::new(3.0, 0.0, 0.0));
        let p = curve.point_at_unclamped(2.0);
        assert_relative_eq!(p.x, 6.0, epsilon = TOLERANCE);
    }

    #[test]
    fn derivative_at_ends_follows_handles() {
        let curve = arc();
        let d0 = curve.derivative_at(0.0);
        let expected = (curve.point(1) - curve.point(0)) * 3.0;
        assert_relative_eq!(d0.x, expected.x, epsilon = TOLERANCE);
        assert_relative_eq!(d0.y, expected.y, epsilon = TOLERANCE);
        assert_relative_eq!(d0.z, expected.z, epsilon = TOLERANCE);

        let d1 = curve.derivative_at(1.0);
        let expected = (curve.point(3) - curve.point(2)) * 3.0;
        assert_relative_eq!(d1.x, expected.x, epsilon = TOLERANCE);
        assert_relative_eq!(d1.y, expected.y, epsilon = TOLERANCE);
    }

    #[test]
    fn straight_line_length_matches_endpoint_distance() {
        let curve = BezierCurve::new(
            Float3::new(0.0, 0.0, 0.0),
            Float3::new(1.0, 0.0, 0.0),
            Float3::new(2.0, 0.0, 0.0),
            Float3::new(3.0, 0.0, 0.0),
        );
        assert_relative_eq!(curve.length(), 3.0, epsilon = 1e-3);
    }

    #[test]
    fn length_is_non_negative_for_degenerate_curve() {
        let curve = BezierCurve::default();
        assert!(curve.length() >= 0.0);
        assert_relative_eq!(curve.length(), 0.0, epsilon = TOLERANCE);
    }

    #[test]
    fn curved_length_exceeds_chord() {
        let curve = arc();
        assert!(curve.length() > curve.start().distance(curve.end()));
    }

    #[test]
    fn set_point_refreshes_length() {
        let mut curve = BezierCurve::line(Float3::ZERO, Float3::new(3.0, 0.0, 0.0));
        curve.set_point(3, Float3::new(6.0, 0.0, 0.0));
        curve.set_point(1, Float3::new(2.0, 0.0, 0.0));
        curve.set_point(2, Float3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(curve.length(), 6.0, epsilon = 1e-3);
    }
}
