//! Coordinate reference system descriptors attached to geometries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Shared handle to a spatial reference.
///
/// Any number of geometries can hold the same handle. Cloning a geometry clones the handle, not the descriptor.
pub type SpatialRef = Arc<SpatialReference>;

/// Description of a coordinate reference system.
///
/// The crate does no projection math with it: the descriptor only labels how coordinates of a geometry must be
/// interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SpatialReference {
    name: String,
    epsg: Option<u32>,
    definition: Option<String>,
}

impl SpatialReference {
    /// WGS 84 geographic coordinates.
    pub fn wgs84() -> Self {
        Self::from_epsg(4326, "WGS 84")
    }

    /// Spherical mercator used by web maps.
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857, "WGS 84 / Pseudo-Mercator")
    }

    /// Creates a descriptor identified by an EPSG code.
    pub fn from_epsg(code: u32, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            epsg: Some(code),
            definition: None,
        }
    }

    /// Creates a descriptor from a textual definition (WKT CRS, PROJ string etc).
    pub fn from_definition(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            epsg: None,
            definition: Some(definition.into()),
        }
    }

    /// Human readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// EPSG code, if known.
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Textual definition, if given.
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// Wraps the descriptor into a shared handle.
    pub fn into_shared(self) -> SpatialRef {
        Arc::new(self)
    }

    /// Whether two descriptors denote the same system.
    ///
    /// Descriptors with EPSG codes are compared by code only. Otherwise the definitions are compared.
    pub fn is_same(&self, other: &Self) -> bool {
        match (self.epsg, other.epsg) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.definition.is_some() && self.definition == other.definition,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_by_epsg() {
        let a = SpatialReference::from_epsg(4326, "WGS 84");
        let b = SpatialReference::from_epsg(4326, "wgs84");
        assert!(a.is_same(&b));
        assert!(!a.is_same(&SpatialReference::web_mercator()));
    }

    #[test]
    fn same_by_definition() {
        let a = SpatialReference::from_definition("local", "+proj=tmerc");
        let b = SpatialReference::from_definition("other", "+proj=tmerc");
        assert!(a.is_same(&b));
        assert!(!a.is_same(&SpatialReference::wgs84()));
        assert!(!SpatialReference::default().is_same(&SpatialReference::default()));
    }
}
