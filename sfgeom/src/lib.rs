//! Simple feature geometries with well-known binary and well-known text codecs.
//!
//! The model covers points, line strings, polygons, their multi variants, heterogeneous collections, compound curves,
//! triangles and TINs, all with optional Z. Every variant implements the [`Geometry`] trait and is a case of the
//! [`Geom`] enum.
//!
//! ```
//! use sfgeom::{ByteOrder, FromWkb, FromWkt, Geom, ToWkb};
//!
//! let geom = Geom::from_wkt("POLYGON ((0 0,4 0,4 4,0 4,0 0))").unwrap();
//! assert_eq!(geom.area(), 16.0);
//!
//! let bytes = geom.to_wkb(ByteOrder::Ndr);
//! assert_eq!(Geom::from_wkb(&bytes).unwrap(), geom);
//! ```
//!
//! Polygons can also be assembled from an unordered set of edges with [`build_polygon_from_edges`].

mod collection;
pub use collection::*;

mod compound_curve;
pub use compound_curve::CompoundCurve;

mod coord;
pub use coord::Coord;

mod envelope;
pub use envelope::{Envelope, Envelope3D};

mod error;
pub use error::{ErrorKind, GeometryError, Result};

mod geometry;
pub use geometry::{Geom, Geometry};

mod geometry_type;
pub use geometry_type::{GeometryType, WkbTypeCode, WkbVariant, WKB_M_FLAG, WKB_Z_FLAG};

mod line_string;
pub use line_string::LineString;

mod linear_ring;
pub use linear_ring::LinearRing;

mod point;
pub use point::Point;

mod polygon;
pub use polygon::Polygon;

mod spatial_ref;
pub use spatial_ref::{SpatialRef, SpatialReference};

mod transform;
pub use transform::{CoordinateTransform, IdentityTransform, OffsetTransform};

mod triangle;
pub use triangle::Triangle;

pub mod build_polygon;
pub use build_polygon::{
    build_polygon_from_edges, build_polygon_from_geometry, BuildPolygonOptions, PolygonBuild,
    UnclosedRing,
};

pub mod factory;

pub mod wkb;
pub use wkb::{ByteOrder, FromWkb, ToWkb, WkbSize};

pub mod wkt;
pub use wkt::{FromWkt, ToWkt, WktOptions};

#[cfg(feature = "geo-types")]
mod geo_types;
