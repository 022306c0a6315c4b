//! Geometry type tags and their WKB type codes.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};

/// Flag set in the legacy WKB type code of a geometry with Z coordinates.
pub const WKB_Z_FLAG: u32 = 0x8000_0000;
/// Flag set in the extended WKB type code of a geometry with M values.
pub const WKB_M_FLAG: u32 = 0x4000_0000;

/// Closed set of geometry variants.
///
/// The discriminant is the base WKB type code of the variant.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    Deserialize,
    Serialize,
)]
#[repr(u32)]
pub enum GeometryType {
    /// Single point.
    Point = 1,
    /// Open or closed polyline.
    LineString = 2,
    /// Polygon with holes.
    Polygon = 3,
    /// Set of points.
    MultiPoint = 4,
    /// Set of line strings.
    MultiLineString = 5,
    /// Set of polygons.
    MultiPolygon = 6,
    /// Heterogeneous collection.
    GeometryCollection = 7,
    /// Chain of connected curves.
    CompoundCurve = 9,
    /// Triangulated irregular network.
    Tin = 16,
    /// Polygon with a single ring of 3 distinct vertices.
    Triangle = 17,
    /// Ring of a polygon. Has no WKB identity of its own.
    LinearRing = 101,
}

impl GeometryType {
    /// Upper-case WKT keyword of the type.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
            GeometryType::CompoundCurve => "COMPOUNDCURVE",
            GeometryType::Tin => "TIN",
            GeometryType::Triangle => "TRIANGLE",
            GeometryType::LinearRing => "LINEARRING",
        }
    }

    /// Case-insensitive lookup by WKT keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::Polygon,
            GeometryType::MultiPoint,
            GeometryType::MultiLineString,
            GeometryType::MultiPolygon,
            GeometryType::GeometryCollection,
            GeometryType::CompoundCurve,
            GeometryType::Tin,
            GeometryType::Triangle,
            GeometryType::LinearRing,
        ]
        .into_iter()
        .find(|t| t.name().eq_ignore_ascii_case(keyword))
    }

    /// Topological dimension of the variant: 0 for points, 1 for curves, 2 for surfaces.
    ///
    /// A generic geometry collection reports 0 here; its actual dimension depends on its members.
    pub fn nominal_dimension(&self) -> u8 {
        match self {
            GeometryType::Point | GeometryType::MultiPoint | GeometryType::GeometryCollection => 0,
            GeometryType::LineString
            | GeometryType::LinearRing
            | GeometryType::MultiLineString
            | GeometryType::CompoundCurve => 1,
            GeometryType::Polygon
            | GeometryType::MultiPolygon
            | GeometryType::Triangle
            | GeometryType::Tin => 2,
        }
    }

    /// Whether the variant is a container of self-describing member geometries.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint
                | GeometryType::MultiLineString
                | GeometryType::MultiPolygon
                | GeometryType::GeometryCollection
                | GeometryType::Tin
        )
    }

    /// Whether the type has a legacy (pre ISO) WKB type code.
    fn is_basic(&self) -> bool {
        (*self as u32) <= 7
    }

    /// WKB type code of the geometry type written with the given convention.
    pub fn wkb_code(&self, has_z: bool, variant: WkbVariant) -> u32 {
        let base = *self as u32;
        match (has_z, variant) {
            (false, _) => base,
            (true, WkbVariant::OldOgc) if self.is_basic() => base | WKB_Z_FLAG,
            (true, _) => base + 1000,
        }
    }
}

/// WKB/WKT writing convention.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum WkbVariant {
    /// Pre-ISO convention: `0x80000000` flags Z for the 7 basic types. WKT omits the `Z` tag.
    #[default]
    OldOgc,
    /// ISO SQL/MM convention: `+1000` band for Z. WKT writes the `Z` tag.
    Iso,
}

/// Decoded WKB type code.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WkbTypeCode {
    /// Base geometry type.
    pub geometry_type: GeometryType,
    /// Coordinates carry Z.
    pub has_z: bool,
    /// Coordinates carry M.
    pub has_m: bool,
}

impl WkbTypeCode {
    /// Decodes a type code written in any of the supported conventions.
    pub fn decode(code: u32) -> Result<Self> {
        let mut has_z = code & WKB_Z_FLAG != 0;
        let mut has_m = code & WKB_M_FLAG != 0;
        let mut base = code & !(WKB_Z_FLAG | WKB_M_FLAG);

        if has_z && !has_m {
            base &= 0xFF;
        }

        match base / 1000 {
            0 => {}
            1 => has_z = true,
            2 => has_m = true,
            3 => {
                has_z = true;
                has_m = true;
            }
            _ => {
                return Err(GeometryError::UnsupportedGeometryType(format!(
                    "unknown WKB geometry type code {code:#x}"
                )))
            }
        }

        let geometry_type = GeometryType::try_from(base % 1000).map_err(|_| {
            GeometryError::UnsupportedGeometryType(format!(
                "unknown WKB geometry type code {code:#x}"
            ))
        })?;

        if geometry_type == GeometryType::LinearRing {
            return Err(GeometryError::UnsupportedGeometryType(
                "linear ring cannot be a standalone WKB geometry".into(),
            ));
        }

        Ok(Self {
            geometry_type,
            has_z,
            has_m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn decode_conventions() {
        let decoded = WkbTypeCode::decode(3).unwrap();
        assert_eq!(decoded.geometry_type, GeometryType::Polygon);
        assert!(!decoded.has_z);

        let decoded = WkbTypeCode::decode(0x8000_0002).unwrap();
        assert_eq!(decoded.geometry_type, GeometryType::LineString);
        assert!(decoded.has_z);
        assert!(!decoded.has_m);

        let decoded = WkbTypeCode::decode(1001).unwrap();
        assert_eq!(decoded.geometry_type, GeometryType::Point);
        assert!(decoded.has_z);

        let decoded = WkbTypeCode::decode(2005).unwrap();
        assert_eq!(decoded.geometry_type, GeometryType::MultiLineString);
        assert!(!decoded.has_z);
        assert!(decoded.has_m);

        let decoded = WkbTypeCode::decode(3017).unwrap();
        assert_eq!(decoded.geometry_type, GeometryType::Triangle);
        assert!(decoded.has_z);
        assert!(decoded.has_m);

        let decoded = WkbTypeCode::decode(0xC000_0001).unwrap();
        assert_eq!(decoded.geometry_type, GeometryType::Point);
        assert!(decoded.has_z);
        assert!(decoded.has_m);
    }

    #[test]
    fn decode_rejects_unknown_codes() {
        for code in [0, 8, 10, 101, 4001, 0x8000_0008] {
            assert_eq!(
                WkbTypeCode::decode(code).unwrap_err().kind(),
                ErrorKind::UnsupportedGeometryType,
                "code {code}"
            );
        }
    }

    #[test]
    fn encode_conventions() {
        assert_eq!(GeometryType::Point.wkb_code(false, WkbVariant::OldOgc), 1);
        assert_eq!(
            GeometryType::Point.wkb_code(true, WkbVariant::OldOgc),
            0x8000_0001
        );
        assert_eq!(GeometryType::Point.wkb_code(true, WkbVariant::Iso), 1001);
        assert_eq!(
            GeometryType::Triangle.wkb_code(true, WkbVariant::OldOgc),
            1017
        );
        assert_eq!(GeometryType::Tin.wkb_code(false, WkbVariant::Iso), 16);
    }

    #[test]
    fn keyword_lookup() {
        assert_eq!(
            GeometryType::from_keyword("multiPolygon"),
            Some(GeometryType::MultiPolygon)
        );
        assert_eq!(GeometryType::from_keyword("tin"), Some(GeometryType::Tin));
        assert_eq!(GeometryType::from_keyword("CIRCULARSTRING"), None);
    }
}
