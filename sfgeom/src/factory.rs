//! Construction of geometries from encoded data and conversions between geometry types.

use crate::collection::{MultiGeometry, MultiLineString, MultiPoint, MultiPolygon};
use crate::error::Result;
use crate::geometry::{Geom, Geometry};
use crate::line_string::LineString;
use crate::spatial_ref::SpatialRef;
use crate::wkb::{FromWkb, WkbSize};
use crate::wkt::FromWkt;

/// Decodes a WKB record of any supported type and labels it with the given spatial reference.
pub fn create_from_wkb(buf: &[u8], size: WkbSize, srs: Option<SpatialRef>) -> Result<Geom> {
    let mut geom = Geom::from_wkb_with_size(buf, size)?;
    geom.assign_spatial_reference(srs);
    Ok(geom)
}

/// Parses a WKT geometry of any supported type and labels it with the given spatial reference.
pub fn create_from_wkt(text: &str, srs: Option<SpatialRef>) -> Result<Geom> {
    let mut geom = Geom::from_wkt(text)?;
    geom.assign_spatial_reference(srs);
    Ok(geom)
}

/// Converts a point, or a collection of points only, into a multipoint. Anything else is returned unchanged.
pub fn force_to_multi_point(geom: Geom) -> Geom {
    match geom {
        Geom::Point(point) => {
            let srs = point.spatial_reference().cloned();
            with_srs(MultiPoint::from_members([point]), srs).into()
        }
        Geom::GeometryCollection(collection) => {
            match MultiPoint::try_from_geometry_collection(collection) {
                Ok(multi) => multi.into(),
                Err(collection) => collection.into(),
            }
        }
        other => other,
    }
}

/// Converts a curve, a polygon, or a collection of line strings only, into a multi line string. Anything else is
/// returned unchanged.
///
/// Compound curves are joined into a single line string. The rings of polygons and multipolygons become separate
/// line strings.
pub fn force_to_multi_line_string(geom: Geom) -> Geom {
    match geom {
        Geom::LineString(line) => {
            let srs = line.spatial_reference().cloned();
            with_srs(MultiLineString::from_members([line]), srs).into()
        }
        Geom::CompoundCurve(curve) => {
            let srs = curve.spatial_reference().cloned();
            with_srs(MultiLineString::from_members([curve.to_line_string()]), srs).into()
        }
        Geom::Polygon(polygon) => {
            let srs = polygon.spatial_reference().cloned();
            let is_3d = polygon.is_3d();
            with_srs(rings_to_lines(polygon.into_rings().into_iter().map(LineString::from), is_3d), srs).into()
        }
        Geom::MultiPolygon(multi) => {
            let srs = multi.spatial_reference().cloned();
            let is_3d = multi.is_3d();
            let lines = multi
                .into_members()
                .into_iter()
                .flat_map(|polygon| polygon.into_rings())
                .map(LineString::from);
            with_srs(rings_to_lines(lines, is_3d), srs).into()
        }
        Geom::GeometryCollection(collection) => {
            match MultiLineString::try_from_geometry_collection(collection) {
                Ok(multi) => multi.into(),
                Err(collection) => collection.into(),
            }
        }
        other => other,
    }
}

/// Converts a polygon, a triangle, a TIN, or a collection of polygons only, into a multipolygon. Anything else is
/// returned unchanged.
pub fn force_to_multi_polygon(geom: Geom) -> Geom {
    match geom {
        Geom::Polygon(polygon) => {
            let srs = polygon.spatial_reference().cloned();
            with_srs(MultiPolygon::from_members([polygon]), srs).into()
        }
        Geom::Triangle(triangle) => {
            let srs = triangle.spatial_reference().cloned();
            with_srs(MultiPolygon::from_members([triangle.into_polygon()]), srs).into()
        }
        Geom::Tin(tin) => {
            let srs = tin.spatial_reference().cloned();
            let polygons = tin.into_members().into_iter().map(|t| t.into_polygon());
            with_srs(MultiPolygon::from_members(polygons), srs).into()
        }
        Geom::GeometryCollection(collection) => {
            match MultiPolygon::try_from_geometry_collection(collection) {
                Ok(multi) => multi.into(),
                Err(collection) => collection.into(),
            }
        }
        other => other,
    }
}

fn rings_to_lines(lines: impl Iterator<Item = LineString>, is_3d: bool) -> MultiLineString {
    let mut multi = MultiLineString::from_members(lines);
    if is_3d {
        multi.set_coordinate_dimension(3);
    }

    multi
}

fn with_srs<G>(mut multi: MultiGeometry<G>, srs: Option<SpatialRef>) -> MultiGeometry<G>
where
    MultiGeometry<G>: Geometry,
{
    multi.assign_spatial_reference(srs);
    multi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coord;
    use crate::geometry_type::GeometryType;
    use crate::linear_ring::LinearRing;
    use crate::point::Point;
    use crate::polygon::Polygon;
    use crate::spatial_ref::SpatialReference;
    use crate::triangle::Triangle;
    use crate::collection::{GeometryCollection, TriangulatedSurface};
    use crate::error::ErrorKind;
    use crate::wkb::{ByteOrder, ToWkb};

    fn square() -> Polygon {
        Polygon::new(
            LinearRing::new(vec![
                Coord::new(0.0, 0.0),
                Coord::new(1.0, 0.0),
                Coord::new(1.0, 1.0),
                Coord::new(0.0, 0.0),
            ]),
            vec![],
        )
    }

    #[test]
    fn create_assigns_spatial_reference() {
        let srs = SpatialReference::wgs84().into_shared();
        let geom = create_from_wkt("POINT (30 10)", Some(srs.clone())).unwrap();
        assert!(geom.spatial_reference().unwrap().is_same(&srs));

        let bytes = square().to_wkb(ByteOrder::Ndr);
        let geom = create_from_wkb(&bytes, WkbSize::Unknown, Some(srs)).unwrap();
        assert_eq!(geom.geometry_type(), GeometryType::Polygon);
        assert!(geom.spatial_reference().is_some());

        assert_eq!(
            create_from_wkb(&bytes[..10], WkbSize::Known(10), None)
                .unwrap_err()
                .kind(),
            ErrorKind::NotEnoughData
        );
    }

    #[test]
    fn point_to_multi() {
        let mut point = Point::new(1.0, 2.0);
        point.assign_spatial_reference(Some(SpatialReference::web_mercator().into_shared()));

        let multi = force_to_multi_point(point.into());
        let multi = multi.as_multi_point().unwrap();
        assert_eq!(multi.num_geometries(), 1);
        assert!(multi.spatial_reference().is_some());
    }

    #[test]
    fn homogeneous_collection_to_multi() {
        let collection: Geom =
            GeometryCollection::from_members([Point::new(0.0, 0.0).into(), Point::new(1.0, 1.0).into()])
                .into();
        let multi = force_to_multi_point(collection);
        assert_eq!(multi.geometry_type(), GeometryType::MultiPoint);

        let mixed: Geom = GeometryCollection::from_members([
            Point::new(0.0, 0.0).into(),
            square().into(),
        ])
        .into();
        let unchanged = force_to_multi_polygon(mixed.clone());
        assert_eq!(unchanged, mixed);
    }

    #[test]
    fn polygon_rings_to_lines() {
        let polygon = Polygon::new(
            square().exterior().unwrap().clone(),
            vec![square().exterior().unwrap().clone()],
        );
        let multi = force_to_multi_line_string(polygon.into());
        let multi = multi.as_multi_line_string().unwrap();
        assert_eq!(multi.num_geometries(), 2);
        assert_eq!(multi.geometry(0).unwrap().num_points(), 4);
    }

    #[test]
    fn surfaces_to_multipolygon() {
        let triangle = Triangle::new(
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(0.0, 1.0),
        );
        let tin = TriangulatedSurface::from_members([triangle.clone(), triangle.clone()]);

        let multi = force_to_multi_polygon(tin.into());
        assert_eq!(multi.as_multi_polygon().unwrap().num_geometries(), 2);
        assert_eq!(multi.area(), 1.0);

        let multi = force_to_multi_polygon(triangle.into());
        assert_eq!(multi.geometry_type(), GeometryType::MultiPolygon);
    }

    #[test]
    fn other_types_are_unchanged() {
        let line: Geom = LineString::new(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)]).into();
        assert_eq!(force_to_multi_point(line.clone()), line);
        assert_eq!(force_to_multi_polygon(line.clone()), line);
    }
}
