use std::ops::Deref;

use crate::coord::Coord;
use crate::envelope::Envelope3D;
use crate::error::{GeometryError, Result};
use crate::geometry::Geometry;
use crate::geometry_type::{GeometryType, WkbTypeCode};
use crate::linear_ring::LinearRing;
use crate::polygon::Polygon;
use crate::spatial_ref::SpatialRef;
use crate::transform::CoordinateTransform;
use crate::wkb::{FromWkb, ToWkb, WkbReader, WkbWriter, WKB_HEADER_SIZE};
use crate::wkt::{Dims, FromWkt, ToWkt, WktReader, WktWriter};

/// Polygon with exactly one closed ring of four points, or no rings at all.
///
/// Dereferences to [`Polygon`] for read access. The ring can only be replaced as a whole, so the shape constraint
/// always holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangle(Polygon);

impl Deref for Triangle {
    type Target = Polygon;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Triangle {
    /// Creates a 2d triangle from its three vertices.
    pub fn new(a: Coord, b: Coord, c: Coord) -> Self {
        Self(Polygon::from_rings(vec![LinearRing::new(vec![a, b, c, a])]))
    }

    /// Creates a 3d triangle from its three vertices.
    pub fn new_3d(a: Coord, b: Coord, c: Coord) -> Self {
        Self(Polygon::from_rings(vec![LinearRing::new_3d(vec![
            a, b, c, a,
        ])]))
    }

    /// Creates a triangle from a closed ring of four points.
    pub fn from_ring(ring: LinearRing) -> Result<Self> {
        validate_ring(&ring)?;
        Ok(Self(Polygon::from_rings(vec![ring])))
    }

    /// Converts a polygon with no rings, or with one valid ring, into a triangle.
    pub fn from_polygon(polygon: Polygon) -> Result<Self> {
        match polygon.rings() {
            [] => {}
            [ring] => validate_ring(ring)?,
            rings => {
                return Err(GeometryError::InvalidInput(format!(
                    "triangle must have one ring, found {}",
                    rings.len()
                )))
            }
        }

        Ok(Self(polygon))
    }

    /// Returns the triangle as a polygon.
    pub fn into_polygon(self) -> Polygon {
        self.0
    }

    /// The three vertices, or `None` for an empty triangle.
    pub fn vertices(&self) -> Option<[Coord; 3]> {
        match self.exterior()?.points() {
            [a, b, c, ..] => Some([*a, *b, *c]),
            _ => None,
        }
    }

    fn into_corrupt(err: GeometryError) -> GeometryError {
        match err {
            GeometryError::InvalidInput(message) => GeometryError::CorruptData(message),
            err => err,
        }
    }

    pub(crate) fn read_wkt_body(reader: &mut WktReader<'_>, dims: Dims) -> Result<Self> {
        Self::from_polygon(Polygon::read_wkt_body(reader, dims)?).map_err(Self::into_corrupt)
    }
}

fn validate_ring(ring: &LinearRing) -> Result<()> {
    if ring.num_points() != 4 || !ring.is_closed() {
        return Err(GeometryError::InvalidInput(format!(
            "triangle ring must be closed and have 4 points, found {} points",
            ring.num_points()
        )));
    }

    Ok(())
}

impl Geometry for Triangle {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::Triangle
    }

    fn is_3d(&self) -> bool {
        self.0.is_3d()
    }

    fn set_coordinate_dimension(&mut self, dimension: u8) {
        self.0.set_coordinate_dimension(dimension);
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn empty(&mut self) {
        self.0.empty();
    }

    fn bounding_box(&self) -> Option<Envelope3D> {
        self.0.bounding_box()
    }

    fn transform(&mut self, transform: &dyn CoordinateTransform) -> Result<()> {
        self.0.transform(transform)
    }

    fn spatial_reference(&self) -> Option<&SpatialRef> {
        self.0.spatial_reference()
    }

    fn assign_spatial_reference(&mut self, srs: Option<SpatialRef>) {
        self.0.assign_spatial_reference(srs);
    }

    fn swap_xy(&mut self) {
        self.0.swap_xy();
    }
}

impl ToWkb for Triangle {
    fn wkb_size(&self) -> usize {
        WKB_HEADER_SIZE + self.0.wkb_body_size()
    }

    fn write_wkb(&self, writer: &mut WkbWriter) {
        writer.write_header(GeometryType::Triangle, self.is_3d());
        self.0.write_wkb_body(writer);
    }
}

impl FromWkb for Triangle {
    fn accepts(geometry_type: GeometryType) -> bool {
        geometry_type == GeometryType::Triangle
    }

    fn read_wkb_body(reader: &mut WkbReader<'_>, code: WkbTypeCode) -> Result<Self> {
        Self::from_polygon(Polygon::read_wkb_polygon(reader, code)?).map_err(Self::into_corrupt)
    }
}

impl ToWkt for Triangle {
    fn write_wkt(&self, writer: &mut WktWriter) {
        writer.write_keyword(GeometryType::Triangle, self.is_3d());
        self.0.write_wkt_body(writer);
    }
}

impl FromWkt for Triangle {
    fn read_wkt(reader: &mut WktReader<'_>) -> Result<Self> {
        let dims = reader.read_tagged(GeometryType::Triangle)?;
        Self::read_wkt_body(reader, dims)
    }
}
