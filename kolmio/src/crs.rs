//! Reference frame identifiers and the geodetic definitions used by the [generic transform](crate::generic).

use crate::error::TransformError;
use kolmio_types::Point2d;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Integer code (EPSG) identifying a coordinate reference system.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Srid(pub i32);

impl Srid {
    /// WGS84 geographic coordinates.
    pub const WGS84: Srid = Srid(4326);
    /// ETRS89 geographic coordinates.
    pub const ETRS89: Srid = Srid(4258);
    /// ETRS89 / TM35FIN(E,N), the frame all layout data is stored in.
    pub const ETRS_TM35FIN: Srid = Srid(3067);
    /// Working frame of the layout.
    pub const LAYOUT: Srid = Srid::ETRS_TM35FIN;

    /// KKJ zone 0.
    pub const KKJ0: Srid = Srid(3386);
    /// KKJ zone 1.
    pub const KKJ1: Srid = Srid(2391);
    /// KKJ zone 2.
    pub const KKJ2: Srid = Srid(2392);
    /// KKJ zone 3, also known as the uniform coordinate system YKJ.
    pub const KKJ3_YKJ: Srid = Srid(2393);
    /// KKJ zone 4.
    pub const KKJ4: Srid = Srid(2394);
    /// KKJ zone 5.
    pub const KKJ5: Srid = Srid(3387);

    /// KKJ zones in zone number order.
    pub const KKJ_ZONES: [Srid; 6] = [
        Srid::KKJ0,
        Srid::KKJ1,
        Srid::KKJ2,
        Srid::KKJ3_YKJ,
        Srid::KKJ4,
        Srid::KKJ5,
    ];

    /// KKJ zone the horizontal triangulation network is expressed in.
    pub const KKJ_CANONICAL: Srid = Srid::KKJ3_YKJ;

    /// Central meridian of the westernmost ETRS-GK zone (ETRS-GK19, EPSG:3873).
    pub const ETRS_GK_FIRST_MERIDIAN: i32 = 19;
    /// Central meridian of the easternmost ETRS-GK zone (ETRS-GK31, EPSG:3885).
    pub const ETRS_GK_LAST_MERIDIAN: i32 = 31;

    /// Integer code of the system.
    pub fn code(self) -> i32 {
        self.0
    }

    /// Returns true for the KKJ zone systems.
    pub fn is_kkj(self) -> bool {
        Self::KKJ_ZONES.contains(&self)
    }

    /// KKJ zone number (0-5), if this is a KKJ zone system.
    pub fn kkj_zone(self) -> Option<i32> {
        Self::KKJ_ZONES
            .iter()
            .position(|srid| *srid == self)
            .map(|zone| zone as i32)
    }

    /// ETRS-GK zone with the given central meridian (19-31 degrees).
    pub fn etrs_gk(meridian: i32) -> Option<Srid> {
        (Self::ETRS_GK_FIRST_MERIDIAN..=Self::ETRS_GK_LAST_MERIDIAN)
            .contains(&meridian)
            .then(|| Srid(3873 + meridian - Self::ETRS_GK_FIRST_MERIDIAN))
    }

    /// Central meridian of an ETRS-GK zone system.
    pub fn etrs_gk_meridian(self) -> Option<i32> {
        let meridian = self.0 - 3873 + Self::ETRS_GK_FIRST_MERIDIAN;
        (Self::ETRS_GK_FIRST_MERIDIAN..=Self::ETRS_GK_LAST_MERIDIAN)
            .contains(&meridian)
            .then_some(meridian)
    }
}

impl Display for Srid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl FromStr for Srid {
    type Err = TransformError;

    /// Accepts both `EPSG:3067` and `3067`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = match trimmed.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("EPSG:") => &trimmed[5..],
            _ => trimmed,
        };
        code.trim()
            .parse::<i32>()
            .map(Srid)
            .map_err(|_| TransformError::NotFound(format!("invalid SRID '{s}'")))
    }
}

/// Returns the ETRS-GK zone whose central meridian is closest to the longitude (degrees east).
///
/// Longitudes outside of Finland are clamped to the outermost zones.
pub fn gk_zone_for_longitude(longitude: f64) -> Srid {
    let meridian = (longitude.round() as i32).clamp(
        Srid::ETRS_GK_FIRST_MERIDIAN,
        Srid::ETRS_GK_LAST_MERIDIAN,
    );
    Srid(3873 + meridian - Srid::ETRS_GK_FIRST_MERIDIAN)
}

/// Order of the axes in the native (EPSG) definition of a reference frame.
///
/// Kolmio always works with (x = east, y = north) points. The axis order is only needed when exchanging
/// coordinate tuples written in the native order of a frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisOrder {
    /// Easting (or longitude) first.
    EastNorth,
    /// Northing (or latitude) first.
    NorthEast,
}

impl AxisOrder {
    /// Converts a native coordinate tuple into an (east, north) point.
    pub fn from_native(&self, coordinates: [f64; 2]) -> Point2d {
        match self {
            AxisOrder::EastNorth => Point2d::new(coordinates[0], coordinates[1]),
            AxisOrder::NorthEast => Point2d::new(coordinates[1], coordinates[0]),
        }
    }

    /// Converts an (east, north) point into a native coordinate tuple.
    pub fn to_native(&self, point: &Point2d) -> [f64; 2] {
        match self {
            AxisOrder::EastNorth => [point.x, point.y],
            AxisOrder::NorthEast => [point.y, point.x],
        }
    }
}

/// Geodetic datum of a reference frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Datum {
    /// ETRS89 on the GRS80 ellipsoid. WGS84 is treated as identical to it.
    Etrs89,
    /// The Finnish KKJ datum on the International (Hayford) ellipsoid.
    Kkj,
}

impl Datum {
    /// Geodesy ellipsoid name of the datum.
    pub fn ellipsoid(&self) -> &'static str {
        match self {
            Datum::Etrs89 => "GRS80",
            Datum::Kkj => "intl",
        }
    }
}

/// How coordinates of a frame relate to geographic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CrsKind {
    /// Longitude and latitude in degrees.
    Geographic,
    /// Projected plane coordinates in meters.
    Projected {
        /// Geodesy operator name of the projection, e.g. `tmerc`.
        operator: String,
        /// Operator parameters, e.g. `lon_0=27 k_0=1 x_0=3500000`.
        parameters: String,
    },
}

/// Geodetic definition of a reference frame: everything the generic transform needs to know about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsDefinition {
    /// Code of the frame.
    pub srid: Srid,
    /// Native axis order.
    pub axis_order: AxisOrder,
    /// Datum of the frame.
    pub datum: Datum,
    /// Geographic or projected.
    pub kind: CrsKind,
}

impl CrsDefinition {
    /// Geographic frame on the ETRS89 datum.
    pub fn geographic(srid: Srid) -> Self {
        Self {
            srid,
            axis_order: AxisOrder::NorthEast,
            datum: Datum::Etrs89,
            kind: CrsKind::Geographic,
        }
    }

    /// Transverse Mercator projected frame.
    pub fn transverse_mercator(
        srid: Srid,
        datum: Datum,
        axis_order: AxisOrder,
        central_meridian: f64,
        scale: f64,
        false_easting: f64,
    ) -> Self {
        Self {
            srid,
            axis_order,
            datum,
            kind: CrsKind::Projected {
                operator: "tmerc".into(),
                parameters: format!(
                    "lat_0=0 lon_0={central_meridian} k_0={scale} x_0={false_easting} y_0=0 ellps={}",
                    datum.ellipsoid()
                ),
            },
        }
    }

    /// Returns true for frames with angular coordinates.
    pub fn is_geographic(&self) -> bool {
        matches!(self.kind, CrsKind::Geographic)
    }
}

/// Set of frame definitions known to the generic transform.
#[derive(Debug, Clone)]
pub struct CrsDefinitions {
    definitions: HashMap<Srid, CrsDefinition>,
}

impl CrsDefinitions {
    /// Empty set of definitions.
    pub fn empty() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Definitions of the frames used in Finnish surveying: WGS84, ETRS89, ETRS-TM35FIN, ETRS-GK19..31 and
    /// the KKJ zones 0-5.
    pub fn builtin() -> Self {
        let mut definitions = Self::empty()
            .with_definition(CrsDefinition::geographic(Srid::WGS84))
            .with_definition(CrsDefinition::geographic(Srid::ETRS89))
            .with_definition(CrsDefinition::transverse_mercator(
                Srid::ETRS_TM35FIN,
                Datum::Etrs89,
                AxisOrder::EastNorth,
                27.0,
                0.9996,
                500_000.0,
            ));

        for meridian in Srid::ETRS_GK_FIRST_MERIDIAN..=Srid::ETRS_GK_LAST_MERIDIAN {
            let srid = Srid(3873 + meridian - Srid::ETRS_GK_FIRST_MERIDIAN);
            definitions = definitions.with_definition(CrsDefinition::transverse_mercator(
                srid,
                Datum::Etrs89,
                AxisOrder::NorthEast,
                meridian as f64,
                1.0,
                meridian as f64 * 1_000_000.0 + 500_000.0,
            ));
        }

        for (zone, srid) in Srid::KKJ_ZONES.into_iter().enumerate() {
            let zone = zone as f64;
            definitions = definitions.with_definition(CrsDefinition::transverse_mercator(
                srid,
                Datum::Kkj,
                AxisOrder::NorthEast,
                18.0 + 3.0 * zone,
                1.0,
                zone * 1_000_000.0 + 500_000.0,
            ));
        }

        definitions
    }

    /// Adds or replaces a definition.
    pub fn with_definition(mut self, definition: CrsDefinition) -> Self {
        self.definitions.insert(definition.srid, definition);
        self
    }

    /// Definition of the frame.
    pub fn get(&self, srid: Srid) -> Result<&CrsDefinition, TransformError> {
        self.definitions
            .get(&srid)
            .ok_or_else(|| TransformError::NotFound(format!("no definition for {srid}")))
    }
}

impl Default for CrsDefinitions {
    fn default() -> Self {
        Self::builtin()
    }
}
