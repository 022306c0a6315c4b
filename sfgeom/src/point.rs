use crate::coord::Coord;
use crate::envelope::Envelope3D;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::geometry_type::{GeometryType, WkbTypeCode};
use crate::spatial_ref::SpatialRef;
use crate::transform::{transform_coord, CoordinateTransform};
use crate::wkb::{written_coord_size, FromWkb, ToWkb, WkbReader, WkbWriter, WKB_HEADER_SIZE};
use crate::wkt::{Dims, FromWkt, Token, ToWkt, WktReader, WktWriter};

/// Point geometry.
///
/// A default point is empty. Setting any ordinate makes it non-empty.
#[derive(Debug, Clone)]
pub struct Point {
    coord: Coord,
    is_3d: bool,
    is_empty: bool,
    srs: Option<SpatialRef>,
}

impl Default for Point {
    fn default() -> Self {
        Self {
            coord: Coord::default(),
            is_3d: false,
            is_empty: true,
            srs: None,
        }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty || other.is_empty {
            return self.is_empty == other.is_empty;
        }

        self.is_3d == other.is_3d && self.coord == other.coord
    }
}

impl Point {
    /// Creates a 2d point.
    pub fn new(x: f64, y: f64) -> Self {
        Self::from_coord(Coord::new(x, y), false)
    }

    /// Creates a 3d point.
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self::from_coord(Coord::new_3d(x, y, z), true)
    }

    /// Creates a point from a coordinate. Z of a 2d point is dropped.
    pub fn from_coord(coord: Coord, is_3d: bool) -> Self {
        Self {
            coord: if is_3d { coord } else { coord.flattened() },
            is_3d,
            is_empty: false,
            srs: None,
        }
    }

    pub(crate) fn empty_with_dims(is_3d: bool) -> Self {
        Self {
            is_3d,
            ..Default::default()
        }
    }

    /// Coordinate of the point.
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// X.
    pub fn x(&self) -> f64 {
        self.coord.x
    }

    /// Y.
    pub fn y(&self) -> f64 {
        self.coord.y
    }

    /// Z. Zero for a 2d point.
    pub fn z(&self) -> f64 {
        self.coord.z
    }

    /// Sets X.
    pub fn set_x(&mut self, x: f64) {
        self.coord.x = x;
        self.is_empty = false;
    }

    /// Sets Y.
    pub fn set_y(&mut self, y: f64) {
        self.coord.y = y;
        self.is_empty = false;
    }

    /// Sets Z, making the point 3d.
    pub fn set_z(&mut self, z: f64) {
        self.coord.z = z;
        self.is_3d = true;
        self.is_empty = false;
    }

    pub(crate) fn write_wkt_coord(&self, writer: &mut WktWriter) {
        writer.write_coord(&self.coord, self.is_3d);
    }

    pub(crate) fn read_wkt_body(reader: &mut WktReader<'_>, dims: Dims) -> Result<Self> {
        if reader.read_empty_or_open()? {
            return Ok(Self::empty_with_dims(dims.has_z));
        }

        let (coord, has_z) = reader.read_coord(dims)?;
        reader.expect(Token::RParen)?;
        Ok(Self::from_coord(coord, has_z || dims.has_z))
    }
}

impl Geometry for Point {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::Point
    }

    fn is_3d(&self) -> bool {
        self.is_3d
    }

    fn set_coordinate_dimension(&mut self, dimension: u8) {
        self.is_3d = dimension == 3;
        if !self.is_3d {
            self.coord.z = 0.0;
        }
    }

    fn is_empty(&self) -> bool {
        self.is_empty
    }

    fn empty(&mut self) {
        self.coord = Coord::default();
        self.is_empty = true;
    }

    fn bounding_box(&self) -> Option<Envelope3D> {
        (!self.is_empty).then(|| Envelope3D::from_coord(&self.coord))
    }

    fn transform(&mut self, transform: &dyn CoordinateTransform) -> Result<()> {
        if !self.is_empty {
            self.coord = transform_coord(self.coord, self.is_3d, transform)?;
        }
        if let Some(srs) = transform.target_spatial_ref() {
            self.srs = Some(srs);
        }

        Ok(())
    }

    fn spatial_reference(&self) -> Option<&SpatialRef> {
        self.srs.as_ref()
    }

    fn assign_spatial_reference(&mut self, srs: Option<SpatialRef>) {
        self.srs = srs;
    }

    fn swap_xy(&mut self) {
        self.coord = self.coord.swapped();
    }
}

impl ToWkb for Point {
    fn wkb_size(&self) -> usize {
        WKB_HEADER_SIZE + written_coord_size(self.is_3d)
    }

    fn write_wkb(&self, writer: &mut WkbWriter) {
        writer.write_header(GeometryType::Point, self.is_3d);
        if self.is_empty {
            writer.write_coord(&Coord::new_3d(f64::NAN, f64::NAN, f64::NAN), self.is_3d);
        } else {
            writer.write_coord(&self.coord, self.is_3d);
        }
    }
}

impl FromWkb for Point {
    fn accepts(geometry_type: GeometryType) -> bool {
        geometry_type == GeometryType::Point
    }

    fn read_wkb_body(reader: &mut WkbReader<'_>, code: WkbTypeCode) -> Result<Self> {
        let coord = reader.read_coord(code.has_z, code.has_m)?;
        if coord.x.is_nan() && coord.y.is_nan() {
            return Ok(Self::empty_with_dims(code.has_z));
        }

        Ok(Self::from_coord(coord, code.has_z))
    }
}

impl ToWkt for Point {
    fn write_wkt(&self, writer: &mut WktWriter) {
        writer.write_keyword(GeometryType::Point, self.is_3d);
        if self.is_empty {
            writer.write_empty();
        } else {
            writer.write_str("(");
            self.write_wkt_coord(writer);
            writer.write_str(")");
        }
    }
}

impl FromWkt for Point {
    fn read_wkt(reader: &mut WktReader<'_>) -> Result<Self> {
        let dims = reader.read_tagged(GeometryType::Point)?;
        Self::read_wkt_body(reader, dims)
    }
}
