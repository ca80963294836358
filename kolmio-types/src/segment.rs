//! Straight line segments.

use crate::cartesian::{CartesianPoint2d, Orientation};

/// A straight line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

impl<P: CartesianPoint2d> Segment<'_, P> {
    /// Returns true if the point lies on the segment, including its end points.
    pub fn contains_point<Point: CartesianPoint2d<Num = P::Num>>(&self, point: &Point) -> bool {
        if Orientation::triplet(self.0, self.1, point) != Orientation::Collinear {
            return false;
        }

        let (x_min, x_max) = min_max(self.0.x(), self.1.x());
        let (y_min, y_max) = min_max(self.0.y(), self.1.y());

        point.x() >= x_min && point.x() <= x_max && point.y() >= y_min && point.y() <= y_max
    }
}

fn min_max<N: PartialOrd>(a: N, b: N) -> (N, N) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
