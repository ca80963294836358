//! Generic CRS-to-CRS transform backed by the [`geodesy`] crate.
//!
//! Points are always passed in and returned as (x = east, y = north), in degrees for geographic frames and meters
//! for projected ones, whatever the native axis order of the frames is.

use crate::crs::{CrsDefinition, CrsDefinitions, CrsKind, Datum, Srid};
use crate::error::TransformError;
use geodesy::prelude::*;
use kolmio_types::Point2d;
use std::fmt::{Debug, Formatter};

/// KKJ -> ETRS89 datum shift (EPSG:10098), coordinate frame rotation convention.
const KKJ_TO_ETRS89_HELMERT: &str = "x=-96.062 y=-82.428 z=-121.753 rx=4.801 ry=0.345 rz=-1.376 s=1.496 convention=coordinate_frame";

/// Transform between two frames through geographic coordinates.
pub struct GenericTransform {
    from: CrsDefinition,
    to: CrsDefinition,
    pipeline: String,
    context: Minimal,
    op: OpHandle,
}

impl Debug for GenericTransform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericTransform")
            .field("from", &self.from.srid)
            .field("to", &self.to.srid)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

impl GenericTransform {
    /// Creates a transform between two frames with built-in definitions.
    pub fn new(from: Srid, to: Srid) -> Result<Self, TransformError> {
        Self::with_definitions(&CrsDefinitions::builtin(), from, to)
    }

    /// Creates a transform between two frames described in `definitions`.
    pub fn with_definitions(
        definitions: &CrsDefinitions,
        from: Srid,
        to: Srid,
    ) -> Result<Self, TransformError> {
        let from = definitions.get(from)?.clone();
        let to = definitions.get(to)?.clone();
        let pipeline = pipeline_definition(&from, &to);

        let mut context = Minimal::new();
        let op = context.op(&pipeline).map_err(|e| {
            TransformError::Configuration(format!(
                "invalid operator definition for {} -> {}: {e}",
                from.srid, to.srid
            ))
        })?;
        log::trace!("Created transform {} -> {}: {pipeline}", from.srid, to.srid);

        Ok(Self {
            from,
            to,
            pipeline,
            context,
            op,
        })
    }

    /// Source frame.
    pub fn from(&self) -> Srid {
        self.from.srid
    }

    /// Target frame.
    pub fn to(&self) -> Srid {
        self.to.srid
    }

    /// Geodesy operator pipeline used by the transform.
    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    /// Transforms a single (east, north) point.
    pub fn transform(&self, point: &Point2d) -> Result<Point2d, TransformError> {
        // Datum shifts go through geocentric X/Y/Z, so the coordinate needs all four slots.
        let mut data = if self.from.is_geographic() {
            [Coor4D::geo(point.y, point.x, 0.0, 0.0)]
        } else {
            [Coor4D::raw(point.x, point.y, 0.0, 0.0)]
        };

        self.context
            .apply(self.op, Fwd, &mut data)
            .map_err(|e| self.error(point, e.to_string()))?;

        let [x, y, _, _] = data[0].0;
        if !x.is_finite() || !y.is_finite() {
            return Err(self.error(point, "result is not finite".into()));
        }

        Ok(if self.to.is_geographic() {
            Point2d::new(x.to_degrees(), y.to_degrees())
        } else {
            Point2d::new(x, y)
        })
    }

    fn error(&self, point: &Point2d, reason: String) -> TransformError {
        TransformError::Transform {
            point: *point,
            from: self.from.srid,
            to: self.to.srid,
            reason,
        }
    }
}

/// Builds the operator pipeline: inverse projection of the source, datum shift if the datums differ, projection
/// of the target.
fn pipeline_definition(from: &CrsDefinition, to: &CrsDefinition) -> String {
    let mut steps = vec![];

    if let CrsKind::Projected {
        operator,
        parameters,
    } = &from.kind
    {
        steps.push(format!("{operator} inv {parameters}"));
    }

    if from.datum != to.datum {
        steps.extend(datum_shift(from.datum, to.datum));
    }

    if let CrsKind::Projected {
        operator,
        parameters,
    } = &to.kind
    {
        steps.push(format!("{operator} {parameters}"));
    }

    if steps.is_empty() {
        "noop".to_string()
    } else {
        steps.join(" | ")
    }
}

fn datum_shift(from: Datum, to: Datum) -> Vec<String> {
    let helmert = match (from, to) {
        (Datum::Kkj, Datum::Etrs89) => format!("helmert {KKJ_TO_ETRS89_HELMERT}"),
        (Datum::Etrs89, Datum::Kkj) => format!("helmert inv {KKJ_TO_ETRS89_HELMERT}"),
        _ => return vec![],
    };

    vec![
        format!("cart ellps={}", from.ellipsoid()),
        helmert,
        format!("cart inv ellps={}", to.ellipsoid()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn pipeline_without_datum_shift() {
        let transform = GenericTransform::new(Srid::KKJ1, Srid::KKJ3_YKJ).unwrap();
        let pipeline = transform.pipeline();
        assert!(pipeline.starts_with("tmerc inv lat_0=0 lon_0=21 "));
        assert!(!pipeline.contains("helmert"));
        assert_eq!(pipeline.matches(" | ").count(), 1);
    }

    #[test]
    fn pipeline_with_datum_shift() {
        let transform = GenericTransform::new(Srid::KKJ3_YKJ, Srid::WGS84).unwrap();
        assert_eq!(
            transform.pipeline(),
            format!(
                "tmerc inv lat_0=0 lon_0=27 k_0=1 x_0=3500000 y_0=0 ellps=intl | cart ellps=intl | helmert {KKJ_TO_ETRS89_HELMERT} | cart inv ellps=GRS80"
            )
        );
    }

    #[test]
    fn geographic_to_tm35fin() {
        let transform = GenericTransform::new(Srid::WGS84, Srid::ETRS_TM35FIN).unwrap();

        let on_equator = transform.transform(&Point2d::new(27.0, 0.0)).unwrap();
        assert_abs_diff_eq!(on_equator.x, 500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(on_equator.y, 0.0, epsilon = 1e-6);

        // Meridian arc length of GRS80 at 60 degrees is 6 654 072.819 m.
        let at_60 = transform.transform(&Point2d::new(27.0, 60.0)).unwrap();
        assert_abs_diff_eq!(at_60.x, 500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(at_60.y, 0.9996 * 6_654_072.819, epsilon = 0.5);
    }

    #[test]
    fn tm35fin_round_trip() {
        let forward = GenericTransform::new(Srid::ETRS_TM35FIN, Srid::WGS84).unwrap();
        let backward = GenericTransform::new(Srid::WGS84, Srid::ETRS_TM35FIN).unwrap();

        let point = Point2d::new(385_782.0, 6_672_832.0);
        let geographic = forward.transform(&point).unwrap();
        assert!(geographic.x > 24.0 && geographic.x < 26.0);
        assert!(geographic.y > 60.0 && geographic.y < 61.0);

        let back = backward.transform(&geographic).unwrap();
        assert_abs_diff_eq!(back.x, point.x, epsilon = 1e-4);
        assert_abs_diff_eq!(back.y, point.y, epsilon = 1e-4);
    }

    #[test]
    fn gk_zone_on_central_meridian() {
        let gk25 = Srid::etrs_gk(25).unwrap();
        let transform = GenericTransform::new(Srid::ETRS89, gk25).unwrap();
        let point = transform.transform(&Point2d::new(25.0, 60.0)).unwrap();
        assert_abs_diff_eq!(point.x, 25_500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(point.y, 6_654_072.819, epsilon = 0.5);
    }

    #[test]
    fn kkj_zone_change_round_trip() {
        let to_zone1 = GenericTransform::new(Srid::KKJ3_YKJ, Srid::KKJ1).unwrap();
        let to_ykj = GenericTransform::new(Srid::KKJ1, Srid::KKJ3_YKJ).unwrap();

        let ykj = Point2d::new(3_385_000.0, 6_675_000.0);
        let zone1 = to_zone1.transform(&ykj).unwrap();
        assert!(zone1.x > 1_650_000.0 && zone1.x < 1_800_000.0);

        let back = to_ykj.transform(&zone1).unwrap();
        assert_abs_diff_eq!(back.x, ykj.x, epsilon = 1e-3);
        assert_abs_diff_eq!(back.y, ykj.y, epsilon = 1e-3);
    }

    #[test]
    fn kkj_to_tm35fin_with_datum_shift() {
        let transform = GenericTransform::new(Srid::KKJ3_YKJ, Srid::ETRS_TM35FIN).unwrap();
        let point = transform
            .transform(&Point2d::new(3_386_000.0, 6_673_000.0))
            .unwrap();

        assert_abs_diff_eq!(point.x, 386_155.69, epsilon = 1.0);
        assert_abs_diff_eq!(point.y, 6_670_084.45, epsilon = 1.0);
    }

    #[test]
    fn kkj_to_wgs84_and_back() {
        let to_wgs84 = GenericTransform::new(Srid::KKJ3_YKJ, Srid::WGS84).unwrap();
        let to_ykj = GenericTransform::new(Srid::WGS84, Srid::KKJ3_YKJ).unwrap();

        // Helsinki. 1e-5 degrees is about 1 m in latitude and 0.5 m in longitude.
        let geographic = to_wgs84
            .transform(&Point2d::new(3_386_000.0, 6_673_000.0))
            .unwrap();
        assert_abs_diff_eq!(geographic.x, 24.949_341, epsilon = 1e-5);
        assert_abs_diff_eq!(geographic.y, 60.151_801, epsilon = 1e-5);

        let ykj = to_ykj.transform(&Point2d::new(24.94, 60.17)).unwrap();
        assert_abs_diff_eq!(ykj.x, 3_385_544.54, epsilon = 1.0);
        assert_abs_diff_eq!(ykj.y, 6_675_043.11, epsilon = 1.0);

        let back = to_ykj.transform(&geographic).unwrap();
        assert_abs_diff_eq!(back.x, 3_386_000.0, epsilon = 0.05);
        assert_abs_diff_eq!(back.y, 6_673_000.0, epsilon = 0.05);
    }

    #[test]
    fn unknown_frame() {
        assert_matches!(
            GenericTransform::new(Srid(1234), Srid::WGS84),
            Err(TransformError::NotFound(_))
        );
    }
}
