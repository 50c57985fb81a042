use crate::geometry::Position;

/// Fraction of the horizontal distance used as bezier control offset.
pub const BEZIER_CONTROL_FACTOR: f32 = 0.5;

/// Cubic bezier curve for distance calculations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Position, // Start point
    pub p1: Position, // Control point 1
    pub p2: Position, // Control point 2
    pub p3: Position, // End point
}

impl CubicBezier {
    /// Horizontal-biased curve between two port anchors.
    ///
    /// Control points extend horizontally from both ends by half the
    /// horizontal distance, so an output on the right edge flows out to the
    /// right and into the next input from the left.
    pub fn from_endpoints(start: Position, end: Position) -> Self {
        let offset = (end.x - start.x).abs() * BEZIER_CONTROL_FACTOR;
        CubicBezier {
            p0: start,
            p1: Position::new(start.x + offset, start.y),
            p2: Position::new(end.x - offset, end.y),
            p3: end,
        }
    }

    pub fn points(&self) -> [Position; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Position {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let (a, b, c, d) = (mt3, 3.0 * mt2 * t, 3.0 * mt * t2, t3);
        let x = a * self.p0.x + b * self.p1.x + c * self.p2.x + d * self.p3.x;
        let y = a * self.p0.y + b * self.p1.y + c * self.p2.y + d * self.p3.y;

        Position::new(x, y)
    }
}

/// Calculate squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: Position, a: Position, b: Position) -> f32 {
    let ab = (b.x - a.x, b.y - a.y);
    let ap = (point.x - a.x, point.y - a.y);

    let ab_len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.0 * ap.0 + ap.1 * ap.1;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / ab_len_sq).clamp(0.0, 1.0);
    let closest = Position::new(a.x + t * ab.0, a.y + t * ab.1);
    point.distance_sq(closest)
}

/// Calculate the minimum distance from a point to a cubic bezier curve
///
/// Samples the curve at regular intervals and measures against the
/// resulting segments. `num_samples == 0` falls back to 20.
pub fn distance_to_bezier(point: Position, bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);
        min_dist_sq = min_dist_sq.min(distance_to_line_segment_sq(point, prev_point, curr_point));
        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}

/// Bezier SVG path between two anchors (see [`CubicBezier::from_endpoints`]).
pub fn generate_bezier_path(start: Position, end: Position) -> String {
    let CubicBezier { p0, p1, p2, p3 } = CubicBezier::from_endpoints(start, end);
    format!(
        "M {} {} C {} {} {} {} {} {}",
        p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
    )
}
