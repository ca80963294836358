use crate::cartesian::{CartesianPoint2d, Orientation, Rect};
use crate::segment::Segment;
use nalgebra::Scalar;
use num_traits::Num;
use serde::{Deserialize, Serialize};

/// Closed sequence of points: the last point is connected to the first one.
///
/// The first point must not be repeated at the end, the closing segment is implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedContour<Point> {
    /// Points of the contour.
    pub points: Vec<Point>,
}

impl<Point> ClosedContour<Point> {
    /// Creates a new contour.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Iterates over segments of the contour, including the one from the last point back to the first.
    pub fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Point>> {
        let count = self.points.len();
        (0..count).map(move |i| Segment(&self.points[i], &self.points[(i + 1) % count]))
    }
}

impl<N, P> ClosedContour<P>
where
    N: Num + Copy + PartialOrd + Scalar,
    P: CartesianPoint2d<Num = N>,
{
    /// Returns true if the `point` lies inside the contour or on one of its sides.
    pub fn contains_point(&self, point: &impl CartesianPoint2d<Num = N>) -> bool {
        let y = point.y();
        let mut winding_number = 0i64;

        for segment in self.iter_segments() {
            if segment.contains_point(point) {
                return true;
            }

            if segment.0.y() <= y {
                if segment.1.y() > y
                    && Orientation::triplet(segment.0, segment.1, point)
                        == Orientation::Counterclockwise
                {
                    winding_number += 1;
                }
            } else if segment.1.y() <= y
                && Orientation::triplet(segment.0, segment.1, point) == Orientation::Clockwise
            {
                winding_number -= 1;
            }
        }

        winding_number != 0
    }

    /// Bounding rectangle of the contour, `None` for an empty contour.
    pub fn bounding_rect(&self) -> Option<Rect<N>> {
        Rect::from_points(self.points.iter())
    }

    /// Returns true if the contour has no area: fewer than three points or all points on one line.
    pub fn is_degenerate(&self) -> bool {
        let Some(first) = self.points.first() else {
            return true;
        };
        let Some(second) = self.points.iter().find(|p| !p.equal(first)) else {
            return true;
        };

        self.points
            .iter()
            .all(|p| Orientation::triplet(first, second, p) == Orientation::Collinear)
    }
}
