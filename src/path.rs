//! Arrow curve description consumed by the render collaborator.
//!
//! The core never draws anything. For every edge it hands out an
//! [`ArrowCurve`]: a quadratic bezier from the start endpoint to the end
//! endpoint, bulging upward by `curve_amount` via a control point above the
//! midpoint. The renderer strokes the curve and places a directional
//! arrowhead at the end, oriented along [`ArrowCurve::end_tangent`].

use crate::geometry::Position;

/// A quadratic bezier describing one arrow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowCurve {
    pub start: Position,
    pub control: Position,
    pub end: Position,
}

impl ArrowCurve {
    /// Build the curve for an edge between two endpoints.
    ///
    /// The control point sits at `(midX, startY - curve_amount)`, so the
    /// arrow bows upward relative to its start. `curve_amount` defaults to
    /// 50 at the scene level.
    pub fn from_endpoints(start: Position, end: Position, curve_amount: f32) -> Self {
        let control = Position::new(start.x + (end.x - start.x) / 2.0, start.y - curve_amount);
        Self {
            start,
            control,
            end,
        }
    }

    /// Evaluate the curve at parameter `t` in `[0, 1]`.
    pub fn eval(&self, t: f32) -> Position {
        let mt = 1.0 - t;
        let x = mt * mt * self.start.x + 2.0 * mt * t * self.control.x + t * t * self.end.x;
        let y = mt * mt * self.start.y + 2.0 * mt * t * self.control.y + t * t * self.end.y;
        Position::new(x, y)
    }

    /// Direction of travel at the end point, for arrowhead orientation.
    ///
    /// Not normalized; zero when control and end coincide.
    pub fn end_tangent(&self) -> (f32, f32) {
        (self.end.x - self.control.x, self.end.y - self.control.y)
    }

    /// SVG path command for the curve (e.g. `M10,20 Q55,-30 100,20`).
    pub fn svg_path(&self) -> String {
        format!(
            "M{},{} Q{},{} {},{}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }
}

/// Squared distance from a point to a line segment.
fn distance_to_segment_sq(point: Position, a: Position, b: Position) -> f32 {
    let ab = (b.x - a.x, b.y - a.y);
    let ap = (point.x - a.x, point.y - a.y);

    let ab_len_sq = ab.0 * ab.0 + ab.1 * ab.1;
    if ab_len_sq < f32::EPSILON {
        return ap.0 * ap.0 + ap.1 * ap.1;
    }

    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / ab_len_sq).clamp(0.0, 1.0);
    let closest = Position::new(a.x + t * ab.0, a.y + t * ab.1);

    let dx = point.x - closest.x;
    let dy = point.y - closest.y;
    dx * dx + dy * dy
}

/// Minimum distance from `point` to the curve, by sampling it into
/// `num_samples` line segments and taking the closest one.
pub fn distance_to_curve(point: Position, curve: &ArrowCurve, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev = curve.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr = curve.eval(t);

        let dist_sq = distance_to_segment_sq(point, prev, curr);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev = curr;
    }

    min_dist_sq.sqrt()
}
