//! Connection path geometry and hit testing.

use kurbo::{BezPath, ParamCurveNearest, Point};
use serde::{Deserialize, Serialize};

/// Routing style for connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStyle {
    /// Cubic S-curve with horizontal tangents at both ends.
    #[default]
    Curved,
    /// Three right-angle segments through the horizontal midpoint.
    Orthogonal,
}

/// Build the path from `start` (output handle) to `end` (input handle).
///
/// Curved paths place each control point `handle_length` units
/// horizontally from its endpoint, at that endpoint's height, so the curve
/// always leaves the output heading right and enters the input heading
/// right whatever the vertical offset.
pub fn connection_path(
    start: Point,
    end: Point,
    style: ConnectionStyle,
    handle_length: f64,
) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(start);
    match style {
        ConnectionStyle::Curved => {
            path.curve_to(
                Point::new(start.x + handle_length, start.y),
                Point::new(end.x - handle_length, end.y),
                end,
            );
        }
        ConnectionStyle::Orthogonal => {
            let mid_x = (start.x + end.x) / 2.0;
            path.line_to(Point::new(mid_x, start.y));
            path.line_to(Point::new(mid_x, end.y));
            path.line_to(end);
        }
    }
    path
}

/// Shortest distance from `point` to any segment of `path`.
pub fn distance_to_path(path: &BezPath, point: Point) -> f64 {
    path.segments()
        .map(|seg| seg.nearest(point, 1e-3).distance_sq)
        .fold(f64::INFINITY, f64::min)
        .sqrt()
}

/// Whether `point` lies within a stroke of `width` centered on `path`.
pub fn hits_path(path: &BezPath, point: Point, width: f64) -> bool {
    distance_to_path(path, point) <= width / 2.0
}

/// Dash offset of the flow overlay after `elapsed_secs`, in `[0, period)`.
pub fn flow_dash_offset(elapsed_secs: f64, speed: f64, dash: [f64; 2]) -> f64 {
    let period = dash[0] + dash[1];
    if period <= 0.0 || !elapsed_secs.is_finite() {
        return 0.0;
    }
    (elapsed_secs * speed).rem_euclid(period)
}
