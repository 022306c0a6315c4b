//! Conversions between the geometries of this crate and [`geo_types`].
//!
//! `geo_types` geometries are 2d, so Z values are dropped on the way out. An empty point becomes a point with NaN
//! coordinates, the same way it is written to WKB.

use crate::collection::{
    GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, TriangulatedSurface,
};
use crate::compound_curve::CompoundCurve;
use crate::coord::Coord;
use crate::error::GeometryError;
use crate::geometry::{Geom, Geometry};
use crate::line_string::LineString;
use crate::linear_ring::LinearRing;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::triangle::Triangle;

impl From<Coord> for ::geo_types::Coord<f64> {
    fn from(value: Coord) -> Self {
        ::geo_types::coord!(x: value.x, y: value.y)
    }
}

impl From<::geo_types::Coord<f64>> for Coord {
    fn from(value: ::geo_types::Coord<f64>) -> Self {
        Coord::new(value.x, value.y)
    }
}

impl From<&Point> for ::geo_types::Point<f64> {
    fn from(value: &Point) -> Self {
        if value.is_empty() {
            ::geo_types::Point::new(f64::NAN, f64::NAN)
        } else {
            ::geo_types::Point::new(value.x(), value.y())
        }
    }
}

impl From<::geo_types::Point<f64>> for Point {
    fn from(value: ::geo_types::Point<f64>) -> Self {
        Point::new(value.x(), value.y())
    }
}

impl From<&LineString> for ::geo_types::LineString<f64> {
    fn from(value: &LineString) -> Self {
        ::geo_types::LineString::new(value.points().iter().map(|&c| c.into()).collect())
    }
}

impl From<&LinearRing> for ::geo_types::LineString<f64> {
    fn from(value: &LinearRing) -> Self {
        (&**value).into()
    }
}

impl From<::geo_types::LineString<f64>> for LineString {
    fn from(value: ::geo_types::LineString<f64>) -> Self {
        value.into_iter().map(Coord::from).collect()
    }
}

impl From<&CompoundCurve> for ::geo_types::LineString<f64> {
    fn from(value: &CompoundCurve) -> Self {
        (&value.to_line_string()).into()
    }
}

impl From<&Polygon> for ::geo_types::Polygon<f64> {
    fn from(value: &Polygon) -> Self {
        let exterior = value
            .exterior()
            .map(::geo_types::LineString::from)
            .unwrap_or_else(|| ::geo_types::LineString::new(vec![]));
        let interiors = value
            .interiors()
            .iter()
            .map(::geo_types::LineString::from)
            .collect();

        ::geo_types::Polygon::new(exterior, interiors)
    }
}

impl From<::geo_types::Polygon<f64>> for Polygon {
    fn from(value: ::geo_types::Polygon<f64>) -> Self {
        let (exterior, interiors) = value.into_inner();
        if exterior.0.is_empty() {
            return Polygon::default();
        }

        Polygon::new(
            LinearRing::from(LineString::from(exterior)),
            interiors
                .into_iter()
                .map(|ring| LinearRing::from(LineString::from(ring)))
                .collect(),
        )
    }
}

impl TryFrom<&Triangle> for ::geo_types::Triangle<f64> {
    type Error = GeometryError;

    fn try_from(value: &Triangle) -> Result<Self, Self::Error> {
        let [a, b, c] = value.vertices().ok_or_else(|| {
            GeometryError::InvalidInput("empty triangle has no vertices".into())
        })?;

        Ok(::geo_types::Triangle::new(a.into(), b.into(), c.into()))
    }
}

impl From<&MultiPoint> for ::geo_types::MultiPoint<f64> {
    fn from(value: &MultiPoint) -> Self {
        ::geo_types::MultiPoint::new(value.iter().map(::geo_types::Point::from).collect())
    }
}

impl From<&MultiLineString> for ::geo_types::MultiLineString<f64> {
    fn from(value: &MultiLineString) -> Self {
        ::geo_types::MultiLineString::new(
            value.iter().map(::geo_types::LineString::from).collect(),
        )
    }
}

impl From<&MultiPolygon> for ::geo_types::MultiPolygon<f64> {
    fn from(value: &MultiPolygon) -> Self {
        ::geo_types::MultiPolygon::new(value.iter().map(::geo_types::Polygon::from).collect())
    }
}

impl From<&TriangulatedSurface> for ::geo_types::MultiPolygon<f64> {
    fn from(value: &TriangulatedSurface) -> Self {
        ::geo_types::MultiPolygon::new(
            value
                .iter()
                .map(|triangle| ::geo_types::Polygon::from(&**triangle))
                .collect(),
        )
    }
}

impl From<&GeometryCollection> for ::geo_types::GeometryCollection<f64> {
    fn from(value: &GeometryCollection) -> Self {
        ::geo_types::GeometryCollection(value.iter().map(::geo_types::Geometry::from).collect())
    }
}

impl From<&Geom> for ::geo_types::Geometry<f64> {
    fn from(value: &Geom) -> Self {
        match value {
            Geom::Point(g) => ::geo_types::Geometry::Point(g.into()),
            Geom::LineString(g) => ::geo_types::Geometry::LineString(g.into()),
            Geom::Polygon(g) => ::geo_types::Geometry::Polygon(g.into()),
            Geom::MultiPoint(g) => ::geo_types::Geometry::MultiPoint(g.into()),
            Geom::MultiLineString(g) => ::geo_types::Geometry::MultiLineString(g.into()),
            Geom::MultiPolygon(g) => ::geo_types::Geometry::MultiPolygon(g.into()),
            Geom::GeometryCollection(g) => ::geo_types::Geometry::GeometryCollection(g.into()),
            Geom::CompoundCurve(g) => ::geo_types::Geometry::LineString(g.into()),
            Geom::Triangle(g) => match ::geo_types::Triangle::try_from(g) {
                Ok(triangle) => ::geo_types::Geometry::Triangle(triangle),
                Err(_) => ::geo_types::Geometry::Polygon((&**g).into()),
            },
            Geom::Tin(g) => ::geo_types::Geometry::MultiPolygon(g.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wkt::FromWkt;

    #[test]
    fn polygon_roundtrip() {
        let polygon =
            Polygon::from_wkt("POLYGON ((0 0,4 0,4 4,0 4,0 0),(1 1,2 1,2 2,1 1))").unwrap();
        let converted = ::geo_types::Polygon::from(&polygon);
        assert_eq!(converted.exterior().0.len(), 5);
        assert_eq!(converted.interiors().len(), 1);

        assert_eq!(Polygon::from(converted), polygon);
    }

    #[test]
    fn z_is_dropped() {
        let point = Point::new_3d(1.0, 2.0, 3.0);
        let converted = ::geo_types::Point::from(&point);
        assert_eq!(converted, ::geo_types::Point::new(1.0, 2.0));
        assert_eq!(Point::from(converted), Point::new(1.0, 2.0));
    }

    #[test]
    fn empty_point_is_nan() {
        let converted = ::geo_types::Point::from(&Point::default());
        assert!(converted.x().is_nan());
    }

    #[test]
    fn geometry_dispatch() {
        let geom = Geom::from_wkt("GEOMETRYCOLLECTION (POINT (1 2),TRIANGLE ((0 0,1 0,0 1,0 0)))").unwrap();
        let ::geo_types::Geometry::GeometryCollection(collection) = ::geo_types::Geometry::from(&geom) else {
            panic!("expected a geometry collection");
        };
        assert_eq!(collection.0.len(), 2);
        assert!(matches!(collection.0[1], ::geo_types::Geometry::Triangle(_)));

        let curve = Geom::from_wkt("COMPOUNDCURVE ((0 0,1 0),(1 0,1 1))").unwrap();
        let ::geo_types::Geometry::LineString(line) = ::geo_types::Geometry::from(&curve) else {
            panic!("expected a line string");
        };
        assert_eq!(line.0.len(), 3);
    }

    #[test]
    fn empty_triangle() {
        assert!(::geo_types::Triangle::try_from(&Triangle::default()).is_err());
        let geom = ::geo_types::Geometry::from(&Geom::Triangle(Triangle::default()));
        assert!(matches!(geom, ::geo_types::Geometry::Polygon(_)));
    }
}
