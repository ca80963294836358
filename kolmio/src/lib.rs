//! Kolmio transforms coordinates and heights between the reference frames used in Finnish surveying: the current
//! ETRS89 / ETRS-TM35FIN frame, the historical KKJ zones, the ETRS-GK zones and WGS84.
//!
//! # Triangulated transformations
//!
//! There is no closed-form formula that maps KKJ coordinates into ETRS-TM35FIN with survey accuracy. Instead the
//! mapping is given by a network of triangles, each with its own affine transform. Transforming a point means
//! finding the triangle that covers it and applying the coefficients of that triangle:
//!
//! ```no_run
//! use kolmio::{NetworkCache, Srid, StaticSource, Triangle};
//! use kolmio::kolmio_types::Point2d;
//!
//! # fn load_triangles() -> Vec<Triangle> { vec![] }
//! let data = StaticSource::new().with_horizontal(Srid::KKJ3_YKJ, Srid::LAYOUT, load_triangles());
//! let cache = NetworkCache::new();
//!
//! let transformation = cache.transformation(Srid::KKJ1, Srid::LAYOUT, &data)?;
//! let point = transformation.transform(&Point2d::new(1_500_000.0, 6_700_000.0))?;
//! # Ok::<(), kolmio::TransformError>(())
//! ```
//!
//! The network is defined in one KKJ zone ([`Srid::KKJ_CANONICAL`]). Points in other KKJ zones are first converted
//! into that zone with the generic transform. All the other frame pairs are handled by the [`GenericTransform`]
//! built on top of the [`geodesy`] crate.
//!
//! Heights are converted from N60 into N2000 in a similar way with a [`HeightNetwork`], interpolating the height
//! difference stored at the triangle corners.
//!
//! # Points and axis order
//!
//! All points are (x = east, y = north), in meters for projected frames and in degrees for geographic ones. The
//! native axis order of a frame is only relevant when reading coordinate tuples, see [`AxisOrder`].
//!
//! # Data
//!
//! Triangles and coordinate system records come from a [`TriangulationSource`]. Loaded horizontal networks are
//! kept in a [`NetworkCache`] and shared between transformations with [`Arc`](std::sync::Arc), so a network can be
//! used from any number of threads.

pub mod cache;
pub mod crs;
pub mod error;
pub mod generic;
pub mod height;
pub mod horizontal;
pub mod index;
pub mod registry;
pub mod source;
pub mod triangle;

pub use cache::NetworkCache;
pub use crs::{gk_zone_for_longitude, AxisOrder, CrsDefinition, CrsDefinitions, Srid};
pub use error::TransformError;
pub use generic::GenericTransform;
pub use height::{transform_height, HeightNetwork, VerticalCoordinateSystem};
pub use horizontal::{Transformation, TransformKind, TriangulationNetwork};
pub use index::TriangleIndex;
pub use kolmio_types;
pub use registry::{CoordinateSystem, CoordinateSystemRegistry};
pub use source::{load_height_network, StaticSource, TriangulationSource};
pub use triangle::{HeightTriangle, Triangle, Triangular};

#[cfg(test)]
pub(crate) mod tests;
