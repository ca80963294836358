//! Triangles of the horizontal and vertical triangulation networks.

use kolmio_types::cartesian::ClosedContour;
use kolmio_types::Point2d;
use serde::{Deserialize, Serialize};

/// Shape shared by all triangle types that can be put into a [`TriangleIndex`](crate::index::TriangleIndex).
pub trait Triangular {
    /// The three corners of the triangle.
    fn corners(&self) -> [Point2d; 3];

    /// Closed contour through the corners.
    fn contour(&self) -> ClosedContour<Point2d> {
        ClosedContour::new(Vec::from(self.corners()))
    }
}

/// Triangle of a horizontal network with its local affine transform:
///
/// ```text
/// target_x = a1 * x + a2 * y + delta_e
/// target_y = b1 * x + b2 * y + delta_n
/// ```
///
/// where `(x, y)` is the point in the source frame. Corners are in the source frame too.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// First corner.
    pub corner1: Point2d,
    /// Second corner.
    pub corner2: Point2d,
    /// Third corner.
    pub corner3: Point2d,
    /// X coefficient of the target easting.
    pub a1: f64,
    /// Y coefficient of the target easting.
    pub a2: f64,
    /// Constant term of the target easting.
    pub delta_e: f64,
    /// X coefficient of the target northing.
    pub b1: f64,
    /// Y coefficient of the target northing.
    pub b2: f64,
    /// Constant term of the target northing.
    pub delta_n: f64,
}

impl Triangle {
    /// Applies the affine transform of the triangle to a source frame point.
    pub fn apply(&self, point: &Point2d) -> Point2d {
        Point2d::new(
            self.a1 * point.x + self.a2 * point.y + self.delta_e,
            self.b1 * point.x + self.b2 * point.y + self.delta_n,
        )
    }
}

impl Triangular for Triangle {
    fn corners(&self) -> [Point2d; 3] {
        [self.corner1, self.corner2, self.corner3]
    }
}

/// Triangle of the height network with the `N2000 - N60` height difference measured at each corner.
///
/// Corners are in the layout frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightTriangle {
    /// First corner.
    pub corner1: Point2d,
    /// Second corner.
    pub corner2: Point2d,
    /// Third corner.
    pub corner3: Point2d,
    /// Height difference at the first corner.
    pub corner1_diff: f64,
    /// Height difference at the second corner.
    pub corner2_diff: f64,
    /// Height difference at the third corner.
    pub corner3_diff: f64,
}

impl HeightTriangle {
    /// Interpolates the height difference at the point in two linear steps:
    ///
    /// 1. along the corner1-corner2 edge at the x coordinate of the point, giving the edge point `e` and its
    ///    difference `z1`,
    /// 2. from `(e.y, z1)` towards `(corner3.y, corner3_diff)` at the y coordinate of the point.
    ///
    /// This is not barycentric interpolation. A constant difference is reproduced exactly, and so is the difference
    /// at corner1. Corner2 and corner3 are only exact when corner1 and corner2 differ in x: for a vertical first
    /// edge the first step has nothing to interpolate along and `z1` stays at the corner1 difference.
    pub fn interpolate_diff(&self, point: &Point2d) -> f64 {
        let t = ratio(self.corner1.x, self.corner2.x, point.x);
        let edge_y = lerp(self.corner1.y, self.corner2.y, t);
        let z1 = lerp(self.corner1_diff, self.corner2_diff, t);

        let s = ratio(edge_y, self.corner3.y, point.y);
        lerp(z1, self.corner3_diff, s)
    }
}

impl Triangular for HeightTriangle {
    fn corners(&self) -> [Point2d; 3] {
        [self.corner1, self.corner2, self.corner3]
    }
}

/// Position of `value` between `start` and `end`; 0 when the span is empty.
fn ratio(start: f64, end: f64, value: f64) -> f64 {
    let span = end - start;
    if span.abs() < f64::EPSILON {
        0.0
    } else {
        (value - start) / span
    }
}

fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}
