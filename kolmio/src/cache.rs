//! Read-through cache of triangulation networks.

use crate::crs::Srid;
use crate::error::TransformError;
use crate::horizontal::{Transformation, TriangulationNetwork};
use crate::source::TriangulationSource;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache of loaded horizontal networks, shared by all transformations.
///
/// Networks are keyed by the frames they were loaded for. All KKJ zones share the network of the canonical
/// zone. Networks are never evicted: there are only a handful of them and they don't change while the process
/// is running.
#[derive(Debug, Default)]
pub struct NetworkCache {
    networks: RwLock<HashMap<(Srid, Srid), Arc<TriangulationNetwork>>>,
}

impl NetworkCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached network for the frames, if it was loaded before.
    pub fn get(&self, source: Srid, target: Srid) -> Option<Arc<TriangulationNetwork>> {
        self.networks.read().get(&Self::key(source, target)).cloned()
    }

    /// Returns the network for the frames, loading it from `data` if it is not in the cache yet.
    ///
    /// Load failures are not cached, the next call tries again.
    pub fn get_or_load(
        &self,
        source: Srid,
        target: Srid,
        data: &dyn TriangulationSource,
    ) -> Result<Arc<TriangulationNetwork>, TransformError> {
        if let Some(network) = self.get(source, target) {
            return Ok(network);
        }

        let (source, target) = Self::key(source, target);
        let triangles = data
            .load_horizontal_triangles(source, target)
            .map_err(|e| {
                log::warn!("Failed to load triangulation network {source} -> {target}: {e}");
                e
            })?;
        let network = Arc::new(TriangulationNetwork::new(source, target, triangles)?);

        // Another thread may have loaded the same network in the meantime, keep the first one.
        let mut networks = self.networks.write();
        Ok(networks.entry((source, target)).or_insert(network).clone())
    }

    /// Creates a transformation between the frames, loading the triangulation network if the pair needs one.
    pub fn transformation(
        &self,
        source: Srid,
        target: Srid,
        data: &dyn TriangulationSource,
    ) -> Result<Transformation, TransformError> {
        if Transformation::requires_network(source, target) {
            Transformation::triangulated(source, self.get_or_load(source, target, data)?)
        } else {
            Transformation::generic(source, target)
        }
    }

    /// Drops all cached networks.
    pub fn clear(&self) {
        self.networks.write().clear();
    }

    /// Number of cached networks.
    pub fn len(&self) -> usize {
        self.networks.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.networks.read().is_empty()
    }

    fn key(source: Srid, target: Srid) -> (Srid, Srid) {
        if source.is_kkj() {
            (Srid::KKJ_CANONICAL, target)
        } else {
            (source, target)
        }
    }
}
