//! Codec for the textual point-list geometry format:
//!
//! * `POINT(x y)`
//! * `LINESTRING(x1 y1,x2 y2,...)`
//! * `LINESTRING M(x1 y1 m1,x2 y2 m2,...)`
//! * `POLYGON((x1 y1,x2 y2,...,x1 y1))`
//!
//! The type tag is matched ignoring case and whitespace. Coordinate fields are separated by whitespace and
//! coordinates by commas. Numbers are written in the shortest form that reads back to the same value, so for any
//! geometry `parse_*(format_*(g)) == g`.
//!
//! Only the syntax is checked. Rings are not validated for closure, winding or self-intersection.

use crate::error::WktError;
use crate::{Point2d, Point3dm};

/// Geometry type tags known to the codec.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WktType {
    /// Single 2d point.
    Point,
    /// Sequence of 2d points.
    LineString,
    /// Sequence of 2d points with a measure value.
    LineStringM,
    /// Single ring of 2d points.
    Polygon,
}

impl WktType {
    /// Tag as written by the formatter.
    pub fn tag(&self) -> &'static str {
        match self {
            WktType::Point => "POINT",
            WktType::LineString => "LINESTRING",
            WktType::LineStringM => "LINESTRING M",
            WktType::Polygon => "POLYGON",
        }
    }

    fn matches(&self, tag: &str) -> bool {
        let expected = self.tag().chars().filter(|c| !c.is_whitespace());
        let found = tag
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase);
        expected.eq(found)
    }
}

/// Parses `POINT(x y)`.
pub fn parse_point(text: &str) -> Result<Point2d, WktError> {
    let body = geometry_body(text, WktType::Point)?;
    match parse_coordinates::<2>(body)?.as_slice() {
        [[x, y]] => Ok(Point2d::new(*x, *y)),
        _ => Err(WktError::Syntax(text.to_string())),
    }
}

/// Parses `LINESTRING(x1 y1,x2 y2,...)`.
pub fn parse_line_string(text: &str) -> Result<Vec<Point2d>, WktError> {
    let body = geometry_body(text, WktType::LineString)?;
    Ok(to_points(parse_coordinates::<2>(body)?))
}

/// Parses `LINESTRING M(x1 y1 m1,x2 y2 m2,...)`.
pub fn parse_line_string_m(text: &str) -> Result<Vec<Point3dm>, WktError> {
    let body = geometry_body(text, WktType::LineStringM)?;
    Ok(parse_coordinates::<3>(body)?
        .into_iter()
        .map(|[x, y, m]| Point3dm::new(x, y, m))
        .collect())
}

/// Parses `POLYGON((x1 y1,x2 y2,...))`. Only a single ring is supported.
pub fn parse_polygon(text: &str) -> Result<Vec<Point2d>, WktError> {
    let body = geometry_body(text, WktType::Polygon)?;
    let ring = body
        .trim()
        .strip_prefix('(')
        .and_then(|ring| ring.strip_suffix(')'))
        .ok_or_else(|| WktError::Syntax(text.to_string()))?;
    Ok(to_points(parse_coordinates::<2>(ring)?))
}

/// Formats a point as `POINT(x y)`.
pub fn format_point(point: &Point2d) -> String {
    format!("{}({})", WktType::Point.tag(), coordinate_2d(point))
}

/// Formats points as `LINESTRING(x1 y1,x2 y2,...)`.
pub fn format_line_string(points: &[Point2d]) -> String {
    format!("{}({})", WktType::LineString.tag(), coordinate_list_2d(points))
}

/// Formats points as `LINESTRING M(x1 y1 m1,x2 y2 m2,...)`.
pub fn format_line_string_m(points: &[Point3dm]) -> String {
    let coordinates = points
        .iter()
        .map(|p| format!("{} {} {}", p.x, p.y, p.m))
        .collect::<Vec<_>>()
        .join(",");
    format!("{}({coordinates})", WktType::LineStringM.tag())
}

/// Formats a ring as `POLYGON((x1 y1,x2 y2,...))`. The points are written as given, the ring is not closed
/// automatically.
pub fn format_polygon(ring: &[Point2d]) -> String {
    format!("{}(({}))", WktType::Polygon.tag(), coordinate_list_2d(ring))
}

fn coordinate_2d(point: &Point2d) -> String {
    format!("{} {}", point.x, point.y)
}

fn coordinate_list_2d(points: &[Point2d]) -> String {
    points
        .iter()
        .map(coordinate_2d)
        .collect::<Vec<_>>()
        .join(",")
}

fn to_points(coordinates: Vec<[f64; 2]>) -> Vec<Point2d> {
    coordinates
        .into_iter()
        .map(|[x, y]| Point2d::new(x, y))
        .collect()
}

/// Checks the type tag and returns the text between the outermost parentheses.
fn geometry_body(text: &str, expected: WktType) -> Result<&str, WktError> {
    let trimmed = text.trim();
    let open = trimmed
        .find('(')
        .ok_or_else(|| WktError::Syntax(text.to_string()))?;

    let tag = &trimmed[..open];
    if !expected.matches(tag) {
        return Err(WktError::TypeMismatch {
            expected: expected.tag(),
            found: tag.trim().to_string(),
        });
    }

    trimmed[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| WktError::Syntax(text.to_string()))
}

fn parse_coordinates<const N: usize>(body: &str) -> Result<Vec<[f64; N]>, WktError> {
    body.split(',').map(parse_coordinate::<N>).collect()
}

fn parse_coordinate<const N: usize>(coordinate: &str) -> Result<[f64; N], WktError> {
    let fields: Vec<&str> = coordinate.split_whitespace().collect();
    if fields.len() != N {
        return Err(WktError::Arity {
            coordinate: coordinate.trim().to_string(),
            expected: N,
            found: fields.len(),
        });
    }

    let mut values = [0.0; N];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| WktError::Number(field.to_string()))?;
    }

    Ok(values)
}
