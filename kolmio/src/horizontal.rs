//! Horizontal transformation: triangulated KKJ -> ETRS-TM35FIN, generic transform for everything else.

use crate::crs::{gk_zone_for_longitude, CrsDefinitions, Srid};
use crate::error::TransformError;
use crate::generic::GenericTransform;
use crate::index::TriangleIndex;
use crate::triangle::Triangle;
use kolmio_types::cartesian::Rect;
use kolmio_types::{Point2d, Point3dm};
use std::sync::Arc;

/// Triangulation network between two frames: a set of non-overlapping triangles in the source frame, each with
/// its own affine transform into the target frame.
#[derive(Debug, Clone)]
pub struct TriangulationNetwork {
    source: Srid,
    target: Srid,
    index: TriangleIndex<Triangle>,
    bounds: Rect,
}

impl TriangulationNetwork {
    /// Builds the network. A network without triangles is a configuration error.
    pub fn new(
        source: Srid,
        target: Srid,
        triangles: Vec<Triangle>,
    ) -> Result<Self, TransformError> {
        let index = TriangleIndex::build(triangles)?;
        let Some(bounds) = index.bounds() else {
            return Err(TransformError::Configuration(format!(
                "triangulation network {source} -> {target} has no triangles"
            )));
        };

        log::debug!(
            "Loaded triangulation network {source} -> {target} with {} triangles",
            index.len()
        );

        Ok(Self {
            source,
            target,
            index,
            bounds,
        })
    }

    /// Frame of the triangle corners.
    pub fn source(&self) -> Srid {
        self.source
    }

    /// Frame the triangles transform into.
    pub fn target(&self) -> Srid {
        self.target
    }

    /// Triangle covering the point.
    pub fn find(&self, point: &Point2d) -> Option<&Triangle> {
        self.index.find_containing(point)
    }

    /// Transforms a point given in the source frame of the network.
    pub fn transform(&self, point: &Point2d) -> Result<Point2d, TransformError> {
        let triangle = self
            .find(point)
            .ok_or_else(|| TransformError::PointOutsideNetwork {
                point: *point,
                network_point: *point,
                network: self.name(),
            })?;
        let result = triangle.apply(point);
        log::trace!("Triangulated {point:?} -> {result:?}");

        Ok(result)
    }

    /// Bounding rectangle of the network coverage in the source frame.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Triangles of the network.
    pub fn triangles(&self) -> &[Triangle] {
        self.index.triangles()
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always false, empty networks cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn name(&self) -> String {
        format!("{} -> {}", self.source, self.target)
    }
}

/// How a [`Transformation`] computes its result.
#[derive(Debug)]
pub enum TransformKind {
    /// Through the triangulation network.
    Triangulated {
        /// Conversion from the source KKJ zone into the zone of the network, `None` if they are the same.
        to_canonical: Option<GenericTransform>,
        /// Shared network.
        network: Arc<TriangulationNetwork>,
    },
    /// Directly with the generic CRS transform.
    Generic(GenericTransform),
}

/// Transformation of points from one frame into another.
///
/// Points from any KKJ zone into the layout frame go through the KKJ -> ETRS-TM35FIN triangulation network, all
/// other pairs are delegated to [`GenericTransform`]. Transformation is a pure function of the input point, so
/// one instance can be used for any number of points.
#[derive(Debug)]
pub struct Transformation {
    source: Srid,
    target: Srid,
    kind: TransformKind,
}

impl Transformation {
    /// Creates a transformation, using `triangles` as the KKJ -> layout network when the pair requires it.
    ///
    /// Triangle corners must be in the canonical KKJ zone ([`Srid::KKJ_CANONICAL`]). Fails if the pair requires
    /// a network and `triangles` is empty.
    pub fn new(
        source: Srid,
        target: Srid,
        triangles: Vec<Triangle>,
    ) -> Result<Self, TransformError> {
        if Self::requires_network(source, target) {
            if triangles.is_empty() {
                return Err(TransformError::Configuration(format!(
                    "transformation {source} -> {target} requires a triangulation network, but no triangles were given"
                )));
            }

            let network = TriangulationNetwork::new(Srid::KKJ_CANONICAL, Srid::LAYOUT, triangles)?;
            Self::triangulated(source, Arc::new(network))
        } else {
            Self::generic(source, target)
        }
    }

    /// Creates a transformation from a KKJ zone through a shared network.
    pub fn triangulated(
        source: Srid,
        network: Arc<TriangulationNetwork>,
    ) -> Result<Self, TransformError> {
        if !source.is_kkj() || !network.source().is_kkj() {
            return Err(TransformError::Configuration(format!(
                "cannot use the {} network for points in {source}",
                network.name()
            )));
        }

        let to_canonical = if source == network.source() {
            None
        } else {
            Some(GenericTransform::new(source, network.source())?)
        };

        Ok(Self {
            source,
            target: network.target(),
            kind: TransformKind::Triangulated {
                to_canonical,
                network,
            },
        })
    }

    /// Creates a transformation that only uses the generic CRS transform with built-in definitions.
    ///
    /// Fails for the pairs that require the triangulation network.
    pub fn generic(source: Srid, target: Srid) -> Result<Self, TransformError> {
        Self::generic_with_definitions(&CrsDefinitions::builtin(), source, target)
    }

    /// Same as [`Transformation::generic`] with custom frame definitions.
    pub fn generic_with_definitions(
        definitions: &CrsDefinitions,
        source: Srid,
        target: Srid,
    ) -> Result<Self, TransformError> {
        if Self::requires_network(source, target) {
            return Err(TransformError::Configuration(format!(
                "transformation {source} -> {target} requires a triangulation network"
            )));
        }

        Ok(Self {
            source,
            target,
            kind: TransformKind::Generic(GenericTransform::with_definitions(
                definitions,
                source,
                target,
            )?),
        })
    }

    /// Creates a transformation from `source` into the ETRS-GK zone covering the point.
    pub fn to_gk_fin(source: Srid, point: &Point2d) -> Result<Self, TransformError> {
        let geographic = GenericTransform::new(source, Srid::ETRS89)?.transform(point)?;
        Self::generic(source, gk_zone_for_longitude(geographic.x))
    }

    /// Returns true if points from `source` into `target` must be transformed through the triangulation network.
    pub fn requires_network(source: Srid, target: Srid) -> bool {
        source.is_kkj() && target == Srid::LAYOUT
    }

    /// Source frame.
    pub fn source(&self) -> Srid {
        self.source
    }

    /// Target frame.
    pub fn target(&self) -> Srid {
        self.target
    }

    /// Computation used by the transformation.
    pub fn kind(&self) -> &TransformKind {
        &self.kind
    }

    /// Transforms a single point.
    pub fn transform(&self, point: &Point2d) -> Result<Point2d, TransformError> {
        match &self.kind {
            TransformKind::Triangulated {
                to_canonical,
                network,
            } => {
                let canonical = match to_canonical {
                    Some(generic) => generic.transform(point)?,
                    None => *point,
                };
                network.transform(&canonical).map_err(|e| match e {
                    TransformError::PointOutsideNetwork {
                        network_point,
                        network,
                        ..
                    } => TransformError::PointOutsideNetwork {
                        point: *point,
                        network_point,
                        network,
                    },
                    other => other,
                })
            }
            TransformKind::Generic(generic) => generic.transform(point),
        }
    }

    /// Transforms all points, failing on the first point that cannot be transformed.
    pub fn transform_all(&self, points: &[Point2d]) -> Result<Vec<Point2d>, TransformError> {
        points.iter().map(|p| self.transform(p)).collect()
    }

    /// Transforms the locations of measured points. Measures are kept as they are.
    pub fn transform_line_m(&self, points: &[Point3dm]) -> Result<Vec<Point3dm>, TransformError> {
        points
            .iter()
            .map(|p| Ok(p.with_location(&self.transform(&p.to_2d())?)))
            .collect()
    }

    /// Transforms the minimum and maximum corners of the rectangle and grows the result by `buffer` of its size
    /// on every side.
    pub fn transform_rect(&self, rect: &Rect, buffer: f64) -> Result<Rect, TransformError> {
        let min = self.transform(&Point2d::new(rect.x_min, rect.y_min))?;
        let max = self.transform(&Point2d::new(rect.x_max, rect.y_max))?;

        Ok(Rect::new(min.x, min.y, max.x, max.y).buffered(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{unit_triangle, ykj_network, ykj_triangles};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn affine_transform_in_unit_triangle() {
        let network =
            TriangulationNetwork::new(Srid::KKJ_CANONICAL, Srid::LAYOUT, vec![unit_triangle()])
                .unwrap();
        assert_eq!(
            network.transform(&Point2d::new(0.25, 0.25)).unwrap(),
            Point2d::new(0.5, 0.5)
        );
    }

    #[test]
    fn point_outside_network() {
        let network =
            TriangulationNetwork::new(Srid::KKJ_CANONICAL, Srid::LAYOUT, vec![unit_triangle()])
                .unwrap();
        let result = network.transform(&Point2d::new(0.75, 0.75));
        assert_matches!(
            result,
            Err(TransformError::PointOutsideNetwork { point, network_point, network })
                if point == Point2d::new(0.75, 0.75)
                    && network_point == point
                    && network == "EPSG:2393 -> EPSG:3067"
        );
    }

    #[test]
    fn empty_network_is_rejected() {
        assert_matches!(
            TriangulationNetwork::new(Srid::KKJ_CANONICAL, Srid::LAYOUT, vec![]),
            Err(TransformError::Configuration(_))
        );
        assert_matches!(
            Transformation::new(Srid::KKJ3_YKJ, Srid::LAYOUT, vec![]),
            Err(TransformError::Configuration(_))
        );
        assert_matches!(
            Transformation::generic(Srid::KKJ1, Srid::LAYOUT),
            Err(TransformError::Configuration(_))
        );
    }

    #[test]
    fn empty_network_is_fine_for_generic_pairs() {
        let transformation = Transformation::new(Srid::WGS84, Srid::LAYOUT, vec![]).unwrap();
        assert_matches!(transformation.kind(), TransformKind::Generic(_));

        let result = transformation.transform(&Point2d::new(27.0, 0.0)).unwrap();
        assert_abs_diff_eq!(result.x, 500_000.0, epsilon = 1e-6);
    }

    #[test]
    fn requires_network() {
        for zone in Srid::KKJ_ZONES {
            assert!(Transformation::requires_network(zone, Srid::LAYOUT));
            assert!(!Transformation::requires_network(zone, Srid::WGS84));
        }
        assert!(!Transformation::requires_network(Srid::WGS84, Srid::LAYOUT));
        assert!(!Transformation::requires_network(Srid::LAYOUT, Srid::KKJ3_YKJ));
    }

    #[test]
    fn canonical_zone_uses_network_directly() {
        let transformation =
            Transformation::new(Srid::KKJ3_YKJ, Srid::LAYOUT, ykj_triangles()).unwrap();
        assert_matches!(
            transformation.kind(),
            TransformKind::Triangulated {
                to_canonical: None,
                ..
            }
        );
        assert_eq!(
            transformation
                .transform(&Point2d::new(3_500_000.0, 6_700_000.0))
                .unwrap(),
            Point2d::new(500_000.0, 6_700_000.0)
        );
    }

    #[test]
    fn other_kkj_zones_are_canonicalized() {
        let kkj3 = Point2d::new(3_500_000.0, 6_700_000.0);
        let kkj1 = GenericTransform::new(Srid::KKJ3_YKJ, Srid::KKJ1)
            .unwrap()
            .transform(&kkj3)
            .unwrap();

        let transformation = Transformation::triangulated(Srid::KKJ1, ykj_network()).unwrap();
        let result = transformation.transform(&kkj1).unwrap();

        assert_abs_diff_eq!(result.x, 500_000.0, epsilon = 0.01);
        assert_abs_diff_eq!(result.y, 6_700_000.0, epsilon = 0.01);
    }

    #[test]
    fn outside_error_keeps_input_point() {
        let kkj3 = Point2d::new(3_650_000.0, 6_700_000.0);
        let kkj1 = GenericTransform::new(Srid::KKJ3_YKJ, Srid::KKJ1)
            .unwrap()
            .transform(&kkj3)
            .unwrap();

        let transformation = Transformation::triangulated(Srid::KKJ1, ykj_network()).unwrap();
        let error = transformation.transform(&kkj1).unwrap_err();
        assert_matches!(
            error,
            TransformError::PointOutsideNetwork { point, network_point, .. } if point == kkj1
                && (network_point.x - kkj3.x).abs() < 0.01
                && (network_point.y - kkj3.y).abs() < 0.01
        );
    }

    #[test]
    fn network_cannot_be_used_for_other_frames() {
        assert_matches!(
            Transformation::triangulated(Srid::WGS84, ykj_network()),
            Err(TransformError::Configuration(_))
        );
    }

    #[test]
    fn transform_all_fails_on_first_outside_point() {
        let transformation = Transformation::triangulated(Srid::KKJ3_YKJ, ykj_network()).unwrap();
        let inside = [
            Point2d::new(3_450_000.0, 6_650_000.0),
            Point2d::new(3_550_000.0, 6_750_000.0),
        ];
        assert_eq!(
            transformation.transform_all(&inside).unwrap(),
            vec![
                Point2d::new(450_000.0, 6_650_000.0),
                Point2d::new(550_000.0, 6_750_000.0)
            ]
        );

        let mixed = [inside[0], Point2d::new(0.0, 0.0), inside[1]];
        assert_matches!(
            transformation.transform_all(&mixed),
            Err(TransformError::PointOutsideNetwork { point, .. })
                if point == Point2d::new(0.0, 0.0)
        );
    }

    #[test]
    fn transform_line_m_keeps_measures() {
        let transformation = Transformation::triangulated(Srid::KKJ3_YKJ, ykj_network()).unwrap();
        let line = [
            Point3dm::new(3_450_000.0, 6_650_000.0, 0.0),
            Point3dm::new(3_460_000.0, 6_650_000.0, 10_000.0),
        ];
        assert_eq!(
            transformation.transform_line_m(&line).unwrap(),
            vec![
                Point3dm::new(450_000.0, 6_650_000.0, 0.0),
                Point3dm::new(460_000.0, 6_650_000.0, 10_000.0),
            ]
        );
    }

    #[test]
    fn transform_rect_with_buffer() {
        let transformation = Transformation::triangulated(Srid::KKJ3_YKJ, ykj_network()).unwrap();
        let rect = Rect::new(3_450_000.0, 6_650_000.0, 3_550_000.0, 6_750_000.0);
        assert_eq!(
            transformation.transform_rect(&rect, 0.0).unwrap(),
            Rect::new(450_000.0, 6_650_000.0, 550_000.0, 6_750_000.0)
        );
        assert_eq!(
            transformation.transform_rect(&rect, 0.1).unwrap(),
            Rect::new(440_000.0, 6_640_000.0, 560_000.0, 6_760_000.0)
        );
    }

    #[test]
    fn gk_zone_for_point() {
        let transformation =
            Transformation::to_gk_fin(Srid::ETRS_TM35FIN, &Point2d::new(500_000.0, 6_700_000.0))
                .unwrap();
        assert_eq!(transformation.target(), Srid(3881));

        let transformation =
            Transformation::to_gk_fin(Srid::WGS84, &Point2d::new(21.2, 61.0)).unwrap();
        assert_eq!(transformation.target(), Srid(3875));
    }

    #[test]
    fn shared_between_threads() {
        let network = ykj_network();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let network = network.clone();
                std::thread::spawn(move || {
                    let transformation =
                        Transformation::triangulated(Srid::KKJ3_YKJ, network).unwrap();
                    transformation
                        .transform(&Point2d::new(3_500_000.0 + i as f64, 6_700_000.0))
                        .unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(
                handle.join().unwrap(),
                Point2d::new(500_000.0 + i as f64, 6_700_000.0)
            );
        }
    }
}
