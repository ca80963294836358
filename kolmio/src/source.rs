//! Access to the triangulation data and coordinate system records.
//!
//! The data usually lives in an external database. Kolmio only needs the three queries of
//! [`TriangulationSource`], and ships [`StaticSource`] for data that is already in memory.

use crate::crs::Srid;
use crate::error::TransformError;
use crate::height::HeightNetwork;
use crate::registry::CoordinateSystem;
use crate::triangle::{HeightTriangle, Triangle, Triangular};
use kolmio_types::cartesian::{ClosedContour, Rect};
use kolmio_types::Point2d;
use std::collections::HashMap;

/// Provider of the triangulation networks and coordinate systems.
pub trait TriangulationSource: Send + Sync {
    /// Loads all triangles of the horizontal network from `source` to `target`. Triangle corners are in `source`.
    fn load_horizontal_triangles(
        &self,
        source: Srid,
        target: Srid,
    ) -> Result<Vec<Triangle>, TransformError>;

    /// Loads the height triangles intersecting the polygon (layout frame, closed ring).
    fn load_height_triangles(
        &self,
        polygon: &[Point2d],
    ) -> Result<Vec<HeightTriangle>, TransformError>;

    /// Loads all known coordinate systems.
    fn load_coordinate_systems(&self) -> Result<Vec<CoordinateSystem>, TransformError>;
}

/// Loads the height network covering the points (layout frame).
///
/// The triangles are requested for the bounding rectangle of the points grown by `buffer` of its size, so that
/// points on the border of the area are covered too.
pub fn load_height_network(
    source: &dyn TriangulationSource,
    points: &[Point2d],
    buffer: f64,
) -> Result<HeightNetwork, TransformError> {
    let Some(rect) = Rect::from_points(points.iter()) else {
        return HeightNetwork::new(vec![]);
    };

    let polygon = rect.buffered(buffer).polygon_from_corners();
    let triangles = source.load_height_triangles(&polygon).map_err(|e| {
        log::warn!("Failed to load height triangles for {rect:?}: {e}");
        e
    })?;

    HeightNetwork::new(triangles)
}

/// In-memory [`TriangulationSource`].
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    horizontal: HashMap<(Srid, Srid), Vec<Triangle>>,
    height: Vec<HeightTriangle>,
    coordinate_systems: Vec<CoordinateSystem>,
}

impl StaticSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the horizontal network from `source` to `target`, replacing the one given before.
    pub fn with_horizontal(mut self, source: Srid, target: Srid, triangles: Vec<Triangle>) -> Self {
        self.horizontal.insert((source, target), triangles);
        self
    }

    /// Adds height triangles.
    pub fn with_height(mut self, triangles: Vec<HeightTriangle>) -> Self {
        self.height.extend(triangles);
        self
    }

    /// Adds coordinate system records.
    pub fn with_coordinate_systems(mut self, systems: Vec<CoordinateSystem>) -> Self {
        self.coordinate_systems.extend(systems);
        self
    }
}

impl TriangulationSource for StaticSource {
    fn load_horizontal_triangles(
        &self,
        source: Srid,
        target: Srid,
    ) -> Result<Vec<Triangle>, TransformError> {
        Ok(self
            .horizontal
            .get(&(source, target))
            .cloned()
            .unwrap_or_default())
    }

    fn load_height_triangles(
        &self,
        polygon: &[Point2d],
    ) -> Result<Vec<HeightTriangle>, TransformError> {
        let Some(area) = ClosedContour::new(polygon.to_vec()).bounding_rect() else {
            return Ok(vec![]);
        };

        Ok(self
            .height
            .iter()
            .filter(|triangle| {
                triangle
                    .contour()
                    .bounding_rect()
                    .is_some_and(|rect| rect.intersects(&area))
            })
            .copied()
            .collect())
    }

    fn load_coordinate_systems(&self) -> Result<Vec<CoordinateSystem>, TransformError> {
        Ok(self.coordinate_systems.clone())
    }
}
