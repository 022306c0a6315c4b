//! The capability set shared by all geometry variants and the [`Geom`] sum type.

use std::fmt::Debug;

use crate::collection::{
    GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, TriangulatedSurface,
};
use crate::compound_curve::CompoundCurve;
use crate::envelope::{Envelope, Envelope3D};
use crate::error::{GeometryError, Result};
use crate::geometry_type::{GeometryType, WkbTypeCode, WkbVariant};
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::spatial_ref::SpatialRef;
use crate::transform::CoordinateTransform;
use crate::triangle::Triangle;
use crate::wkb::{FromWkb, ToWkb, WkbReader, WkbWriter};
use crate::wkt::{FromWkt, ToWkt, WktReader, WktWriter};

/// Operations every geometry variant supports.
pub trait Geometry: Clone + PartialEq + Debug + ToWkb + ToWkt {
    /// Variant tag of the geometry.
    fn geometry_type(&self) -> GeometryType;

    /// Upper-case name of the geometry type, as used in WKT.
    fn geometry_name(&self) -> &'static str {
        self.geometry_type().name()
    }

    /// WKB type code of the geometry: the base code, with the `0x80000000` flag set for 3d basic types.
    fn geometry_type_code(&self) -> u32 {
        self.geometry_type()
            .wkb_code(self.is_3d(), WkbVariant::OldOgc)
    }

    /// Topological dimension: 0 for points, 1 for curves, 2 for surfaces.
    fn dimension(&self) -> u8 {
        self.geometry_type().nominal_dimension()
    }

    /// Whether the coordinates of the geometry carry Z.
    fn is_3d(&self) -> bool;

    /// 0 for an empty geometry, otherwise 2 or 3.
    fn coordinate_dimension(&self) -> u8 {
        if self.is_empty() {
            0
        } else if self.is_3d() {
            3
        } else {
            2
        }
    }

    /// Forces the coordinate dimension. `3` makes the geometry 3d, keeping current Z values. Any other value makes
    /// it 2d and sets all Z values to zero. Applies to all rings and members.
    fn set_coordinate_dimension(&mut self, dimension: u8);

    /// Drops Z values.
    fn flatten_to_2d(&mut self) {
        self.set_coordinate_dimension(2);
    }

    /// Whether the geometry has no coordinates.
    fn is_empty(&self) -> bool;

    /// Removes all coordinates, rings and members.
    fn empty(&mut self);

    /// Bounding box of the geometry, or `None` if it is empty.
    fn bounding_box(&self) -> Option<Envelope3D>;

    /// 2d bounding box. Zeroed for an empty geometry.
    fn envelope(&self) -> Envelope {
        self.bounding_box()
            .map(|env| env.to_2d())
            .unwrap_or_default()
    }

    /// 3d bounding box. Zeroed for an empty geometry.
    fn envelope_3d(&self) -> Envelope3D {
        self.bounding_box().unwrap_or_default()
    }

    /// Structural equality: same variant, same number of parts, same coordinates in the same order. The spatial
    /// reference is not compared.
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Transforms every coordinate of the geometry.
    ///
    /// Either all coordinates are transformed or, if any of them fails, the geometry is left unchanged and
    /// [`GeometryError::TransformFailed`] is returned. On success the target spatial reference of the transform (if
    /// it has one) is assigned to the geometry.
    fn transform(&mut self, transform: &dyn CoordinateTransform) -> Result<()>;

    /// Spatial reference of the geometry.
    fn spatial_reference(&self) -> Option<&SpatialRef>;

    /// Labels the geometry (and its members) with the spatial reference without changing coordinates.
    fn assign_spatial_reference(&mut self, srs: Option<SpatialRef>);

    /// Swaps X and Y of every coordinate.
    fn swap_xy(&mut self);
}

/// Any geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geom {
    /// Point.
    Point(Point),
    /// Line string.
    LineString(LineString),
    /// Polygon.
    Polygon(Polygon),
    /// Multi point.
    MultiPoint(MultiPoint),
    /// Multi line string.
    MultiLineString(MultiLineString),
    /// Multi polygon.
    MultiPolygon(MultiPolygon),
    /// Geometry collection.
    GeometryCollection(GeometryCollection),
    /// Compound curve.
    CompoundCurve(CompoundCurve),
    /// Triangle.
    Triangle(Triangle),
    /// Triangulated irregular network.
    Tin(TriangulatedSurface),
}

macro_rules! dispatch {
    ($value:expr, $g:ident => $body:expr) => {
        match $value {
            Geom::Point($g) => $body,
            Geom::LineString($g) => $body,
            Geom::Polygon($g) => $body,
            Geom::MultiPoint($g) => $body,
            Geom::MultiLineString($g) => $body,
            Geom::MultiPolygon($g) => $body,
            Geom::GeometryCollection($g) => $body,
            Geom::CompoundCurve($g) => $body,
            Geom::Triangle($g) => $body,
            Geom::Tin($g) => $body,
        }
    };
}

impl Geom {
    /// Creates an empty geometry of the given type.
    pub fn empty_of(geometry_type: GeometryType) -> Result<Self> {
        Ok(match geometry_type {
            GeometryType::Point => Point::default().into(),
            GeometryType::LineString => LineString::default().into(),
            GeometryType::Polygon => Polygon::default().into(),
            GeometryType::MultiPoint => MultiPoint::default().into(),
            GeometryType::MultiLineString => MultiLineString::default().into(),
            GeometryType::MultiPolygon => MultiPolygon::default().into(),
            GeometryType::GeometryCollection => GeometryCollection::default().into(),
            GeometryType::CompoundCurve => CompoundCurve::default().into(),
            GeometryType::Triangle => Triangle::default().into(),
            GeometryType::Tin => TriangulatedSurface::default().into(),
            GeometryType::LinearRing => {
                return Err(GeometryError::UnsupportedGeometryType(
                    "linear ring can only exist inside a polygon".into(),
                ))
            }
        })
    }

    /// Length of the curves of the geometry. Zero for points and surfaces.
    pub fn length(&self) -> f64 {
        match self {
            Geom::LineString(g) => g.length(),
            Geom::CompoundCurve(g) => g.length(),
            Geom::MultiLineString(g) => g.iter().map(LineString::length).sum(),
            Geom::GeometryCollection(g) => g.iter().map(Geom::length).sum(),
            _ => 0.0,
        }
    }

    /// Area of the surfaces of the geometry. Zero for points and curves.
    pub fn area(&self) -> f64 {
        match self {
            Geom::Polygon(g) => g.area(),
            Geom::Triangle(g) => g.area(),
            Geom::MultiPolygon(g) => g.iter().map(Polygon::area).sum(),
            Geom::Tin(g) => g.iter().map(|t| t.area()).sum(),
            Geom::GeometryCollection(g) => g.iter().map(Geom::area).sum(),
            _ => 0.0,
        }
    }

    /// Returns the point, if the geometry is one.
    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Geom::Point(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the line string, if the geometry is one.
    pub fn as_line_string(&self) -> Option<&LineString> {
        match self {
            Geom::LineString(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the polygon, if the geometry is one.
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Geom::Polygon(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the multi point, if the geometry is one.
    pub fn as_multi_point(&self) -> Option<&MultiPoint> {
        match self {
            Geom::MultiPoint(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the multi line string, if the geometry is one.
    pub fn as_multi_line_string(&self) -> Option<&MultiLineString> {
        match self {
            Geom::MultiLineString(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the multi polygon, if the geometry is one.
    pub fn as_multi_polygon(&self) -> Option<&MultiPolygon> {
        match self {
            Geom::MultiPolygon(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the geometry collection, if the geometry is one.
    pub fn as_geometry_collection(&self) -> Option<&GeometryCollection> {
        match self {
            Geom::GeometryCollection(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the compound curve, if the geometry is one.
    pub fn as_compound_curve(&self) -> Option<&CompoundCurve> {
        match self {
            Geom::CompoundCurve(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the triangle, if the geometry is one.
    pub fn as_triangle(&self) -> Option<&Triangle> {
        match self {
            Geom::Triangle(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the TIN, if the geometry is one.
    pub fn as_tin(&self) -> Option<&TriangulatedSurface> {
        match self {
            Geom::Tin(g) => Some(g),
            _ => None,
        }
    }
}

impl Geometry for Geom {
    fn geometry_type(&self) -> GeometryType {
        dispatch!(self, g => g.geometry_type())
    }

    fn dimension(&self) -> u8 {
        dispatch!(self, g => g.dimension())
    }

    fn is_3d(&self) -> bool {
        dispatch!(self, g => g.is_3d())
    }

    fn set_coordinate_dimension(&mut self, dimension: u8) {
        dispatch!(self, g => g.set_coordinate_dimension(dimension))
    }

    fn is_empty(&self) -> bool {
        dispatch!(self, g => g.is_empty())
    }

    fn empty(&mut self) {
        dispatch!(self, g => g.empty())
    }

    fn bounding_box(&self) -> Option<Envelope3D> {
        dispatch!(self, g => g.bounding_box())
    }

    fn transform(&mut self, transform: &dyn CoordinateTransform) -> Result<()> {
        dispatch!(self, g => g.transform(transform))
    }

    fn spatial_reference(&self) -> Option<&SpatialRef> {
        dispatch!(self, g => g.spatial_reference())
    }

    fn assign_spatial_reference(&mut self, srs: Option<SpatialRef>) {
        dispatch!(self, g => g.assign_spatial_reference(srs))
    }

    fn swap_xy(&mut self) {
        dispatch!(self, g => g.swap_xy())
    }
}

impl ToWkb for Geom {
    fn wkb_size(&self) -> usize {
        dispatch!(self, g => g.wkb_size())
    }

    fn write_wkb(&self, writer: &mut WkbWriter) {
        dispatch!(self, g => g.write_wkb(writer))
    }
}

impl FromWkb for Geom {
    fn accepts(geometry_type: GeometryType) -> bool {
        geometry_type != GeometryType::LinearRing
    }

    fn read_wkb_body(reader: &mut WkbReader<'_>, code: WkbTypeCode) -> Result<Self> {
        Ok(match code.geometry_type {
            GeometryType::Point => Point::read_wkb_body(reader, code)?.into(),
            GeometryType::LineString => LineString::read_wkb_body(reader, code)?.into(),
            GeometryType::Polygon => Polygon::read_wkb_body(reader, code)?.into(),
            GeometryType::MultiPoint => MultiPoint::read_wkb_body(reader, code)?.into(),
            GeometryType::MultiLineString => MultiLineString::read_wkb_body(reader, code)?.into(),
            GeometryType::MultiPolygon => MultiPolygon::read_wkb_body(reader, code)?.into(),
            GeometryType::GeometryCollection => {
                GeometryCollection::read_wkb_body(reader, code)?.into()
            }
            GeometryType::CompoundCurve => CompoundCurve::read_wkb_body(reader, code)?.into(),
            GeometryType::Triangle => Triangle::read_wkb_body(reader, code)?.into(),
            GeometryType::Tin => TriangulatedSurface::read_wkb_body(reader, code)?.into(),
            GeometryType::LinearRing => {
                return Err(GeometryError::UnsupportedGeometryType(
                    "linear ring cannot be a standalone WKB geometry".into(),
                ))
            }
        })
    }
}

impl ToWkt for Geom {
    fn write_wkt(&self, writer: &mut WktWriter) {
        dispatch!(self, g => g.write_wkt(writer))
    }
}

impl FromWkt for Geom {
    fn read_wkt(reader: &mut WktReader<'_>) -> Result<Self> {
        let keyword = reader.read_word()?;
        let geometry_type = GeometryType::from_keyword(keyword).ok_or_else(|| {
            GeometryError::UnsupportedGeometryType(format!("unknown WKT keyword '{keyword}'"))
        })?;
        let dims = reader.read_dims()?;

        Ok(match geometry_type {
            GeometryType::Point => Point::read_wkt_body(reader, dims)?.into(),
            GeometryType::LineString => LineString::read_wkt_body(reader, dims)?.into(),
            GeometryType::Polygon => Polygon::read_wkt_body(reader, dims)?.into(),
            GeometryType::MultiPoint => MultiPoint::read_wkt_body(reader, dims)?.into(),
            GeometryType::MultiLineString => MultiLineString::read_wkt_body(reader, dims)?.into(),
            GeometryType::MultiPolygon => MultiPolygon::read_wkt_body(reader, dims)?.into(),
            GeometryType::GeometryCollection => {
                GeometryCollection::read_wkt_body(reader, dims)?.into()
            }
            GeometryType::CompoundCurve => CompoundCurve::read_wkt_body(reader, dims)?.into(),
            GeometryType::Triangle => Triangle::read_wkt_body(reader, dims)?.into(),
            GeometryType::Tin => TriangulatedSurface::read_wkt_body(reader, dims)?.into(),
            GeometryType::LinearRing => {
                return Err(GeometryError::UnsupportedGeometryType(
                    "linear ring can only exist inside a polygon".into(),
                ))
            }
        })
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Geom {
                fn from(value: $ty) -> Self {
                    Geom::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
    CompoundCurve(CompoundCurve),
    Triangle(Triangle),
    Tin(TriangulatedSurface),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coord;
    use crate::error::ErrorKind;
    use crate::wkb::ByteOrder;

    #[test]
    fn empty_of_every_type() {
        for t in [
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::Polygon,
            GeometryType::MultiPoint,
            GeometryType::MultiLineString,
            GeometryType::MultiPolygon,
            GeometryType::GeometryCollection,
            GeometryType::CompoundCurve,
            GeometryType::Triangle,
            GeometryType::Tin,
        ] {
            let geom = Geom::empty_of(t).unwrap();
            assert_eq!(geom.geometry_type(), t);
            assert!(geom.is_empty());
            assert_eq!(geom.coordinate_dimension(), 0);
            assert_eq!(geom.envelope(), Envelope::default());
        }

        assert_eq!(
            Geom::empty_of(GeometryType::LinearRing).unwrap_err().kind(),
            ErrorKind::UnsupportedGeometryType
        );
    }

    #[test]
    fn type_code_has_z_flag() {
        let geom: Geom = Point::new_3d(1.0, 2.0, 3.0).into();
        assert_eq!(geom.geometry_type_code(), 0x8000_0001);
        assert_eq!(geom.geometry_name(), "POINT");
    }

    #[test]
    fn unknown_keyword() {
        for text in ["CIRCULARSTRING (0 0,1 1,2 0)", "LINEARRING (0 0,1 1)", "FOO EMPTY"] {
            assert_eq!(
                Geom::from_wkt(text).unwrap_err().kind(),
                ErrorKind::UnsupportedGeometryType,
                "{text}"
            );
        }
    }

    #[test]
    fn dispatch_by_header() {
        let line = LineString::new(vec![Coord::new(0.0, 0.0), Coord::new(3.0, 4.0)]);
        let bytes = line.to_wkb(ByteOrder::Xdr);
        let geom = Geom::from_wkb(&bytes).unwrap();
        assert_eq!(geom.as_line_string(), Some(&line));
        assert_eq!(geom.length(), 5.0);
        assert_eq!(geom.area(), 0.0);
    }
}
