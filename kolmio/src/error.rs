//! Error types used by the crate.

use crate::crs::Srid;
use kolmio_types::error::WktError;
use kolmio_types::Point2d;
use thiserror::Error;

/// Kolmio error type.
///
/// All operations are deterministic, so none of these errors is worth retrying with the same input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Geometry text could not be decoded.
    #[error(transparent)]
    Format(#[from] WktError),
    /// No triangle of the network covers the point. Expected for points outside the network coverage.
    #[error(
        "point ({}, {}) is outside the {network} triangulation network (looked up as ({}, {}))",
        .point.x, .point.y, .network_point.x, .network_point.y
    )]
    PointOutsideNetwork {
        /// Point as given by the caller.
        point: Point2d,
        /// Point converted into the frame of the network, e.g. from a KKJ zone into YKJ.
        network_point: Point2d,
        /// Description of the network, e.g. `EPSG:2393 -> EPSG:3067`.
        network: String,
    },
    /// The requested transformation is not supported.
    #[error("unsupported transformation: {0}")]
    Unsupported(String),
    /// The generic CRS transformation failed.
    #[error("could not transform point ({}, {}) from {from} to {to}: {reason}", .point.x, .point.y)]
    Transform {
        /// Point in the source frame.
        point: Point2d,
        /// Source frame.
        from: Srid,
        /// Target frame.
        to: Srid,
        /// What went wrong.
        reason: String,
    },
    /// Invalid transformation set up, e.g. an empty triangulation network where one is required.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Lookup of a coordinate system failed.
    #[error("not found: {0}")]
    NotFound(String),
    /// The data source failed to provide the requested data.
    #[error("failed to load data: {0}")]
    Source(String),
}
