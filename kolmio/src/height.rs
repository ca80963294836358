//! Vertical transformation between the Finnish height systems.

use crate::error::TransformError;
use crate::index::TriangleIndex;
use crate::triangle::HeightTriangle;
use kolmio_types::cartesian::Rect;
use kolmio_types::Point2d;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Finnish vertical reference systems.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalCoordinateSystem {
    /// Old height system, not supported.
    N43,
    /// Height system converted into N2000 with the height network.
    N60,
    /// Current height system.
    N2000,
}

impl Display for VerticalCoordinateSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::N43 => "N43",
            Self::N60 => "N60",
            Self::N2000 => "N2000",
        };
        f.write_str(name)
    }
}

impl FromStr for VerticalCoordinateSystem {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "N43" => Ok(Self::N43),
            "N60" => Ok(Self::N60),
            "N2000" => Ok(Self::N2000),
            _ => Err(TransformError::NotFound(format!(
                "unknown vertical coordinate system '{s}'"
            ))),
        }
    }
}

/// Network of height triangles with the `N2000 - N60` difference at their corners, in the layout frame.
///
/// Unlike the horizontal network, the height network is usually loaded for the area of interest only, so it
/// may be empty.
#[derive(Debug, Clone)]
pub struct HeightNetwork {
    index: TriangleIndex<HeightTriangle>,
}

impl HeightNetwork {
    /// Builds the network.
    pub fn new(triangles: Vec<HeightTriangle>) -> Result<Self, TransformError> {
        let index = TriangleIndex::build(triangles)?;
        log::debug!("Loaded height network with {} triangles", index.len());

        Ok(Self { index })
    }

    /// Converts a height at the (layout frame) point from `system` into N2000.
    pub fn transform_height(
        &self,
        point: &Point2d,
        height: f64,
        system: VerticalCoordinateSystem,
    ) -> Result<f64, TransformError> {
        match system {
            VerticalCoordinateSystem::N2000 => Ok(height),
            VerticalCoordinateSystem::N60 => {
                let triangle = self.index.find_containing(point).ok_or_else(|| {
                    TransformError::PointOutsideNetwork {
                        point: *point,
                        network_point: *point,
                        network: "N60 -> N2000".into(),
                    }
                })?;
                let diff = triangle.interpolate_diff(point);
                log::trace!("Height difference at {point:?} is {diff}");

                Ok(height + diff)
            }
            VerticalCoordinateSystem::N43 => Err(TransformError::Unsupported(format!(
                "height conversion from {system} is not supported"
            ))),
        }
    }

    /// Bounding rectangle of the loaded triangles, `None` if the network is empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.index.bounds()
    }

    /// Returns true if all the points are inside the bounding rectangle of the network.
    ///
    /// Used to check whether a network loaded earlier can be reused for new geometry.
    pub fn covers(&self, points: &[Point2d]) -> bool {
        match self.bounds() {
            Some(bounds) => points.iter().all(|p| bounds.contains(p)),
            None => points.is_empty(),
        }
    }

    /// Triangles of the network.
    pub fn triangles(&self) -> &[HeightTriangle] {
        self.index.triangles()
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if no triangles are loaded.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Converts a height at the (layout frame) point from `system` into N2000 using the network.
pub fn transform_height(
    network: &HeightNetwork,
    point: &Point2d,
    height: f64,
    system: VerticalCoordinateSystem,
) -> Result<f64, TransformError> {
    network.transform_height(point, height, system)
}
