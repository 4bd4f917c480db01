//! Curve <-> `"x, y, z, x, y, z, ..."` text codec.

use crate::geom::{BezierCurve, Float3};

const COMPONENT_COUNT: usize = 12;
const DECIMALS: usize = 5;

/// The four control points as 12 comma-separated components.
pub fn format_curve(curve: &BezierCurve) -> String {
    curve
        .points()
        .iter()
        .flat_map(|p| [p.x, p.y, p.z])
        .map(|c| format!("{:.*}", DECIMALS, c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses the output of `format_curve`.
///
/// Best effort: a wrong component count or an unparseable component logs a
/// warning, and anything missing or invalid reads as 0.
pub fn parse_curve(s: &str) -> BezierCurve {
    let tokens: Vec<&str> = s.split(',').map(str::trim).collect();
    if tokens.len() != COMPONENT_COUNT {
        log::warn!(
            "Curve string has {} components, expected {COMPONENT_COUNT}: \"{s}\"",
            tokens.len()
        );
    }

    let mut values = [0.0f32; COMPONENT_COUNT];
    for (value, token) in values.iter_mut().zip(&tokens) {
        match token.parse::<f32>() {
            Ok(parsed) => *value = parsed,
            Err(err) => log::warn!("Invalid curve component \"{token}\": {err}"),
        }
    }

    let point = |i: usize| Float3::new(values[i * 3], values[i * 3 + 1], values[i * 3 + 2]);
    BezierCurve::new(point(0), point(1), point(2), point(3))
}
