//! Lookup of coordinate systems by code, name or alias.

use crate::crs::{AxisOrder, CrsDefinitions, Srid};
use crate::error::TransformError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Coordinate system as stored by the data source. Identity is the SRID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    /// Code of the system.
    pub srid: Srid,
    /// Human readable name.
    pub name: String,
    /// Alternative names the system is known by.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl CoordinateSystem {
    /// Creates a new coordinate system record.
    pub fn new(srid: Srid, name: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            srid,
            name: name.into(),
            aliases,
        }
    }

    fn lookup_keys(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .flat_map(|name| [name.clone(), name.to_uppercase()])
    }
}

/// Pure lookup layer over the coordinate systems supplied by the data source.
///
/// Names and aliases of all systems are flattened into a single map. When two systems share a name, the one
/// added last wins, so generic systems should be added before the application defined ones (see
/// [`CoordinateSystemRegistry::extend`]).
#[derive(Debug, Clone)]
pub struct CoordinateSystemRegistry {
    systems: BTreeMap<Srid, CoordinateSystem>,
    names: HashMap<String, Srid>,
    definitions: CrsDefinitions,
}

impl CoordinateSystemRegistry {
    /// Creates a registry with the built-in geodetic definitions.
    pub fn new(systems: impl IntoIterator<Item = CoordinateSystem>) -> Self {
        Self::with_definitions(systems, CrsDefinitions::builtin())
    }

    /// Creates a registry using the given geodetic definitions for the axis order metadata.
    pub fn with_definitions(
        systems: impl IntoIterator<Item = CoordinateSystem>,
        definitions: CrsDefinitions,
    ) -> Self {
        let mut registry = Self {
            systems: BTreeMap::new(),
            names: HashMap::new(),
            definitions,
        };
        registry.extend(systems);
        registry
    }

    /// Adds systems to the registry. Names of the added systems override earlier ones on collision.
    pub fn extend(&mut self, systems: impl IntoIterator<Item = CoordinateSystem>) {
        for system in systems {
            for key in system.lookup_keys() {
                self.names.insert(key, system.srid);
            }
            self.systems.insert(system.srid, system);
        }
    }

    /// Returns the system with the given code.
    pub fn resolve_by_srid(&self, srid: Srid) -> Result<&CoordinateSystem, TransformError> {
        self.systems
            .get(&srid)
            .ok_or_else(|| TransformError::NotFound(format!("coordinate system {srid}")))
    }

    /// Returns the code of the system with the given name or alias.
    ///
    /// The name is first looked up as given, then upper cased.
    pub fn resolve_by_name_or_alias(&self, name: &str) -> Result<Srid, TransformError> {
        self.names
            .get(name)
            .or_else(|| self.names.get(&name.to_uppercase()))
            .copied()
            .ok_or_else(|| TransformError::NotFound(format!("coordinate system named '{name}'")))
    }

    /// Resolves a system by `EPSG:nnnn`, a plain code, a name or an alias.
    pub fn resolve(&self, srid_or_name: &str) -> Result<&CoordinateSystem, TransformError> {
        match srid_or_name.parse::<Srid>() {
            Ok(srid) => self.resolve_by_srid(srid),
            Err(_) => self.resolve_by_srid(self.resolve_by_name_or_alias(srid_or_name)?),
        }
    }

    /// Native axis order of the system.
    pub fn axis_order(&self, srid: Srid) -> Result<AxisOrder, TransformError> {
        Ok(self.definitions.get(srid)?.axis_order)
    }

    /// Geodetic definitions the registry was created with.
    pub fn definitions(&self) -> &CrsDefinitions {
        &self.definitions
    }

    /// Name to display for a dataset declaring the code `srid` and the name `name_hint`.
    ///
    /// * unknown system: the hint,
    /// * no hint: the name of the system,
    /// * hint is one of the aliases of the system: the hint,
    /// * otherwise the name of the system.
    pub fn display_name(&self, srid: Option<Srid>, name_hint: Option<&str>) -> Option<String> {
        let system = srid.and_then(|srid| self.systems.get(&srid));
        match (system, name_hint) {
            (None, hint) => hint.map(str::to_string),
            (Some(system), None) => Some(system.name.clone()),
            (Some(system), Some(hint)) if system.aliases.iter().any(|a| a == hint) => {
                Some(hint.to_string())
            }
            (Some(system), Some(_)) => Some(system.name.clone()),
        }
    }

    /// All registered systems ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &CoordinateSystem> {
        self.systems.values()
    }
}
