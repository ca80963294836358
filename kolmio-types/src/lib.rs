//! Planar geometry value types and algorithms used by the `kolmio` transformation engine.
//!
//! Nothing in this crate knows about reference frames: a [`Point2d`] is just a pair of numbers whose meaning
//! is given by the context it is used in. The crate provides
//!
//! * point types ([`Point2d`], [`Point3dm`]) and the [`CartesianPoint2d`](cartesian::CartesianPoint2d) trait,
//! * bounding rectangles, closed contours with exact point-in-polygon test and a convex hull,
//! * the [`wkt`] codec for the textual point-list format used to exchange geometries.

pub mod cartesian;
pub mod error;
mod hull;
mod point;
pub mod segment;
pub mod wkt;

pub use hull::convex_hull;
pub use point::{Point2d, Point3dm};
