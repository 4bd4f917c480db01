use super::{TrackId, TrackManager};
use crate::geom::{Float3, DEBUG_SEGMENT_COUNT};

/// RGBA, each channel in [0, 1].
pub type Colour = [f32; 4];

pub const HANDLE_COLOUR: Colour = [0.2, 0.2, 0.1, 0.25];
pub const HIGHLIGHT_COLOUR: Colour = [0.8, 0.84, 0.22, 1.0];
pub const POINT_COLOURS: [Colour; 4] = [
    [0.8, 0.1, 0.1, 1.0],
    [0.1, 0.8, 0.1, 1.0],
    [0.1, 0.1, 0.8, 1.0],
    [0.8, 0.8, 0.8, 1.0],
];
pub const JUNCTION_COLOUR: Colour = [0.9, 0.2, 0.2, 1.0];
pub const JUNCTION_HIGHLIGHT_COLOUR: Colour = [0.9, 0.9, 0.9, 1.0];
pub const EXIT_FORWARD_COLOUR: Colour = [0.2, 0.6, 0.25, 1.0];
pub const EXIT_BACKWARD_COLOUR: Colour = [0.8, 0.3, 0.2, 1.0];
pub const EXIT_PREVIEW_COLOUR: Colour = [0.95, 0.95, 0.98, 1.0];

const CONTROL_POINT_RADIUS: f32 = 0.1;
const CONTROL_POINT_RADIUS_STEP: f32 = 0.02;
const JUNCTION_RADIUS: f32 = 0.5;
const EXIT_LENGTH: f32 = 5.0;
const EXIT_HEIGHT: f32 = 1.5;
const PREVIEW_MATCH_THRESHOLD: f32 = 0.1;

/// Line and sphere renderer the track overlay is drawn into.
pub trait DebugDrawSink {
    fn draw_line(&mut self, from: Float3, to: Float3, colour: Colour);
    fn draw_sphere(&mut self, center: Float3, radius: f32, colour: Colour);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugDrawOptions {
    /// Track and global t whose curve is drawn in `highlight_colour`.
    pub highlight: Option<(TrackId, f32)>,
    pub highlight_colour: Colour,
    pub highlighted_junction: Option<usize>,
    pub draw_handles: bool,
}

impl Default for DebugDrawOptions {
    fn default() -> Self {
        Self {
            highlight: None,
            highlight_colour: HIGHLIGHT_COLOUR,
            highlighted_junction: None,
            draw_handles: true,
        }
    }
}

/// Stable per-track tint, reddish with varied green and blue.
pub fn track_colour(id: TrackId) -> Colour {
    let seed = (id.index() as f32 * 0.618_034).fract();
    [
        0.75 + 0.25 * (15.648 * seed).fract(),
        0.2 + 0.4 * (0.342 + 6.898 * seed).fract(),
        0.2 + 0.4 * (0.158 + 2.221 * seed).fract(),
        1.0,
    ]
}

impl TrackManager {
    /// Draws every curve with its control points, then every junction with
    /// an arrow per track end leaving it. Arrows matching the current
    /// junction preview are drawn in `EXIT_PREVIEW_COLOUR`.
    pub fn draw_debug(&self, sink: &mut dyn DebugDrawSink, options: &DebugDrawOptions) {
        for (id, track) in self.tracks.iter() {
            let highlighted_curve = options
                .highlight
                .filter(|&(track_id, _)| track_id == id)
                .map(|(_, t)| track.curve_index_and_local_t(t).0);
            let base_colour = track_colour(id);

            for (curve_index, curve) in track.curves().iter().enumerate() {
                let colour = if highlighted_curve == Some(curve_index) {
                    options.highlight_colour
                } else {
                    base_colour
                };

                let mut prev = curve.start();
                for i in 1..=DEBUG_SEGMENT_COUNT {
                    let next = curve.point_at(i as f32 / DEBUG_SEGMENT_COUNT as f32);
                    sink.draw_line(prev, next, colour);
                    prev = next;
                }

                if options.draw_handles {
                    sink.draw_line(curve.point(0), curve.point(1), HANDLE_COLOUR);
                    sink.draw_line(curve.point(2), curve.point(3), HANDLE_COLOUR);
                }

                let points = curve.points().iter().zip(POINT_COLOURS.iter());
                for (i, (&point, &colour)) in points.enumerate() {
                    let radius = CONTROL_POINT_RADIUS + i as f32 * CONTROL_POINT_RADIUS_STEP;
                    sink.draw_sphere(point, radius, colour);
                }
            }
        }

        let probe = self.params.junction_probe_dist;
        let lift = Float3::UP * EXIT_HEIGHT;

        for (junction_index, junction) in self.junctions.iter().enumerate() {
            let pos = junction.pos;
            let colour = if options.highlighted_junction == Some(junction_index) {
                JUNCTION_HIGHLIGHT_COLOUR
            } else {
                JUNCTION_COLOUR
            };
            sink.draw_sphere(pos, JUNCTION_RADIUS, colour);

            let previewed = self.preview.junction_index == Some(junction_index);
            let exit_colour = |dir: Float3, default: Colour| {
                if previewed && self.preview.dir.nearly_equals(dir, PREVIEW_MATCH_THRESHOLD) {
                    EXIT_PREVIEW_COLOUR
                } else {
                    default
                }
            };

            for link in junction.links() {
                let Ok(track) = self.track(link.track) else {
                    continue;
                };
                let t = track.t_at_junction(link.curve_index);
                let start = pos + lift;

                if link.curve_index < track.curve_count() {
                    let dir = (track.point_on_curve(t + probe).0 - pos).normalize();
                    let colour = exit_colour(dir, EXIT_FORWARD_COLOUR);
                    sink.draw_line(start, pos + dir * EXIT_LENGTH + lift, colour);
                }
                if link.curve_index > 0 {
                    let dir = (track.point_on_curve(t - probe).0 - pos).normalize();
                    let colour = exit_colour(dir, EXIT_BACKWARD_COLOUR);
                    sink.draw_line(start, pos + dir * EXIT_LENGTH + lift, colour);
                }
            }
        }
    }
}
