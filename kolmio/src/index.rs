//! Spatial index answering "which triangle covers this point".

use crate::error::TransformError;
use crate::triangle::Triangular;
use kolmio_types::cartesian::{ClosedContour, Rect};
use kolmio_types::Point2d;
use rstar::{RTree, RTreeObject, AABB};

/// Entry of the bounding box tree. Keeps the position of the triangle in the input and its contour so that
/// queries don't have to rebuild it.
#[derive(Debug, Clone)]
struct IndexEntry {
    position: usize,
    envelope: AABB<[f64; 2]>,
    contour: ClosedContour<Point2d>,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Immutable index over a set of non-overlapping triangles.
///
/// Lookup first selects the triangles whose bounding box contains the point, then checks each candidate with
/// an exact point-in-polygon test. Points on a shared edge or vertex are covered by several triangles; of
/// those the one that came first in the input wins.
#[derive(Debug, Clone)]
pub struct TriangleIndex<T> {
    triangles: Vec<T>,
    tree: RTree<IndexEntry>,
    bounds: Option<Rect>,
}

impl<T: Triangular> TriangleIndex<T> {
    /// Builds the index. Fails if any of the triangles has no area.
    pub fn build(triangles: Vec<T>) -> Result<Self, TransformError> {
        let mut entries = Vec::with_capacity(triangles.len());
        let mut bounds: Option<Rect> = None;

        for (position, triangle) in triangles.iter().enumerate() {
            let contour = triangle.contour();
            if contour.is_degenerate() {
                return Err(TransformError::Configuration(format!(
                    "triangle #{position} {:?} is degenerate",
                    triangle.corners()
                )));
            }

            let Some(rect) = contour.bounding_rect() else {
                continue;
            };
            bounds = Some(match bounds {
                Some(b) => b.merge(rect),
                None => rect,
            });

            entries.push(IndexEntry {
                position,
                envelope: AABB::from_corners([rect.x_min, rect.y_min], [rect.x_max, rect.y_max]),
                contour,
            });
        }

        let tree = RTree::bulk_load(entries);
        log::debug!("Built triangle index with {} triangles", triangles.len());

        Ok(Self {
            triangles,
            tree,
            bounds,
        })
    }

    /// Returns the triangle covering the point, or `None` if the point is outside of all triangles.
    pub fn find_containing(&self, point: &Point2d) -> Option<&T> {
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([point.x, point.y]))
            .filter(|entry| entry.contour.contains_point(point))
            .map(|entry| entry.position)
            .min()
            .and_then(|position| self.triangles.get(position))
    }

    /// Triangles in the order they were given to [`TriangleIndex::build`].
    pub fn triangles(&self) -> &[T] {
        &self.triangles
    }

    /// Number of indexed triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if there are no triangles in the index.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Bounding rectangle of all triangles, `None` for an empty index.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }
}
