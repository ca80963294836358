use crate::cartesian::CartesianPoint2d;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// 2d point with `f64` coordinates. Which frame the coordinates are in is given by the context.
pub type Point2d = Point2<f64>;

/// 2d point with an additional measure value (for example a distance along a track).
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point3dm {
    /// X (east) coordinate.
    pub x: f64,
    /// Y (north) coordinate.
    pub y: f64,
    /// Measure.
    pub m: f64,
}

impl Point3dm {
    /// Creates a new point.
    pub fn new(x: f64, y: f64, m: f64) -> Self {
        Self { x, y, m }
    }

    /// Planar part of the point.
    pub fn to_2d(&self) -> Point2d {
        Point2d::new(self.x, self.y)
    }

    /// Returns a point at `location` with the measure of this point.
    pub fn with_location(&self, location: &impl CartesianPoint2d<Num = f64>) -> Self {
        Self::new(location.x(), location.y(), self.m)
    }
}

impl CartesianPoint2d for Point3dm {
    type Num = f64;

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl From<Point3dm> for Point2d {
    fn from(value: Point3dm) -> Self {
        Point2d::new(value.x, value.y)
    }
}
