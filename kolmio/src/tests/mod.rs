//! Test data shared by the unit tests of the crate.

use crate::crs::Srid;
use crate::error::TransformError;
use crate::horizontal::TriangulationNetwork;
use crate::height::HeightNetwork;
use crate::registry::CoordinateSystem;
use crate::source::{StaticSource, TriangulationSource};
use crate::triangle::{HeightTriangle, Triangle};
use kolmio_types::Point2d;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;


pub(crate) fn coordinate_systems() -> Vec<CoordinateSystem> {
    vec![
        CoordinateSystem::new(Srid::WGS84, "WGS 84", vec!["WGS84".into()]),
        CoordinateSystem::new(Srid::ETRS89, "ETRS89", vec![]),
        CoordinateSystem::new(
            Srid::ETRS_TM35FIN,
            "ETRS89 / TM35FIN(E,N)",
            vec!["TM35FIN".into(), "ETRS-TM35FIN".into()],
        ),
        CoordinateSystem::new(Srid::KKJ1, "KKJ / Finland zone 1", vec!["KKJ1".into()]),
        CoordinateSystem::new(Srid::KKJ2, "KKJ / Finland zone 2", vec!["KKJ2".into()]),
        CoordinateSystem::new(
            Srid::KKJ3_YKJ,
            "KKJ / Finland Uniform Coordinate System",
            vec!["YKJ".into(), "KKJ3".into()],
        ),
        CoordinateSystem::new(Srid::KKJ4, "KKJ / Finland zone 4", vec!["KKJ4".into()]),
        CoordinateSystem::new(Srid(3879), "ETRS89 / GK25FIN", vec!["GK25".into()]),
    ]
}

/// Triangle (0, 0), (1, 0), (0, 1) that doubles both coordinates.
pub(crate) fn unit_triangle() -> Triangle {
    Triangle {
        corner1: Point2d::new(0.0, 0.0),
        corner2: Point2d::new(1.0, 0.0),
        corner3: Point2d::new(0.0, 1.0),
        a1: 2.0,
        a2: 0.0,
        delta_e: 0.0,
        b1: 0.0,
        b2: 2.0,
        delta_n: 0.0,
    }
}

/// Two triangles covering 200 km x 200 km around YKJ (3 500 000, 6 700 000), moving points 3 000 km to the west.
///
/// This makes YKJ coordinates TM35FIN coordinates without the zone prefix, which is roughly what the real
/// network does.
pub(crate) fn ykj_triangles() -> Vec<Triangle> {
    let corners = [
        Point2d::new(3_400_000.0, 6_600_000.0),
        Point2d::new(3_600_000.0, 6_600_000.0),
        Point2d::new(3_600_000.0, 6_800_000.0),
        Point2d::new(3_400_000.0, 6_800_000.0),
    ];
    let triangle = |corner1: Point2d, corner2: Point2d, corner3: Point2d| Triangle {
        corner1,
        corner2,
        corner3,
        a1: 1.0,
        a2: 0.0,
        delta_e: -3_000_000.0,
        b1: 0.0,
        b2: 1.0,
        delta_n: 0.0,
    };

    vec![
        triangle(corners[0], corners[1], corners[2]),
        triangle(corners[0], corners[2], corners[3]),
    ]
}

pub(crate) fn ykj_network() -> Arc<TriangulationNetwork> {
    match TriangulationNetwork::new(Srid::KKJ_CANONICAL, Srid::LAYOUT, ykj_triangles()) {
        Ok(network) => Arc::new(network),
        Err(e) => panic!("invalid test network: {e}"),
    }
}

pub(crate) fn ykj_source() -> StaticSource {
    StaticSource::new()
        .with_horizontal(Srid::KKJ3_YKJ, Srid::LAYOUT, ykj_triangles())
        .with_height(height_triangles())
        .with_coordinate_systems(coordinate_systems())
}

/// Two height triangles covering TM35FIN (300 000, 6 700 000) - (500 000, 6 900 000).
///
/// The lower right triangle has a constant difference of 0.3 m, the upper left one grows to 0.4 m at its
/// upper left corner.
pub(crate) fn height_triangles() -> Vec<HeightTriangle> {
    let lower_left = Point2d::new(300_000.0, 6_700_000.0);
    let lower_right = Point2d::new(500_000.0, 6_700_000.0);
    let upper_right = Point2d::new(500_000.0, 6_900_000.0);
    let upper_left = Point2d::new(300_000.0, 6_900_000.0);

    vec![
        HeightTriangle {
            corner1: lower_left,
            corner2: lower_right,
            corner3: upper_right,
            corner1_diff: 0.3,
            corner2_diff: 0.3,
            corner3_diff: 0.3,
        },
        HeightTriangle {
            corner1: lower_left,
            corner2: upper_right,
            corner3: upper_left,
            corner1_diff: 0.3,
            corner2_diff: 0.3,
            corner3_diff: 0.4,
        },
    ]
}

pub(crate) fn height_network() -> HeightNetwork {
    match HeightNetwork::new(height_triangles()) {
        Ok(network) => network,
        Err(e) => panic!("invalid test network: {e}"),
    }
}

/// Source that counts the queries made to the wrapped source.
pub(crate) struct CountingSource {
    inner: Option<StaticSource>,
    horizontal_loads: AtomicUsize,
}

impl CountingSource {
    pub(crate) fn new(inner: StaticSource) -> Self {
        Self {
            inner: Some(inner),
            horizontal_loads: AtomicUsize::new(0),
        }
    }

    /// Source that fails all queries.
    pub(crate) fn failing() -> Self {
        Self {
            inner: None,
            horizontal_loads: AtomicUsize::new(0),
        }
    }

    pub(crate) fn horizontal_loads(&self) -> usize {
        self.horizontal_loads.load(Ordering::Relaxed)
    }

    fn inner(&self) -> Result<&StaticSource, TransformError> {
        self.inner
            .as_ref()
            .ok_or_else(|| TransformError::Source("connection refused".into()))
    }
}

impl TriangulationSource for CountingSource {
    fn load_horizontal_triangles(
        &self,
        source: Srid,
        target: Srid,
    ) -> Result<Vec<Triangle>, TransformError> {
        self.horizontal_loads.fetch_add(1, Ordering::Relaxed);
        self.inner()?.load_horizontal_triangles(source, target)
    }

    fn load_height_triangles(
        &self,
        polygon: &[Point2d],
    ) -> Result<Vec<HeightTriangle>, TransformError> {
        self.inner()?.load_height_triangles(polygon)
    }

    fn load_coordinate_systems(&self) -> Result<Vec<CoordinateSystem>, TransformError> {
        self.inner()?.load_coordinate_systems()
    }
}
