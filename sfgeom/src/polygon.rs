use crate::envelope::Envelope3D;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::geometry_type::{GeometryType, WkbTypeCode};
use crate::linear_ring::LinearRing;
use crate::line_string::LineString;
use crate::spatial_ref::SpatialRef;
use crate::transform::CoordinateTransform;
use crate::wkb::{
    FromWkb, ToWkb, WkbReader, WkbWriter, MIN_RING_SIZE, WKB_COUNT_SIZE, WKB_HEADER_SIZE,
};
use crate::wkt::{Dims, FromWkt, Token, ToWkt, WktReader, WktWriter};

/// Polygon: an optional exterior ring followed by any number of holes.
///
/// The first ring is the exterior. A polygon without rings, or with an empty exterior ring, is empty.
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    rings: Vec<LinearRing>,
    is_3d: bool,
    srs: Option<SpatialRef>,
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.is_3d == other.is_3d && self.rings == other.rings
    }
}

impl Polygon {
    /// Creates a polygon from its exterior and interior rings.
    pub fn new(exterior: LinearRing, interiors: Vec<LinearRing>) -> Self {
        let mut rings = Vec::with_capacity(interiors.len() + 1);
        rings.push(exterior);
        rings.extend(interiors);
        Self::from_rings(rings)
    }

    /// Creates a polygon from a list of rings, the first of which is the exterior. The polygon is 3d if any of the
    /// rings is.
    pub fn from_rings(rings: Vec<LinearRing>) -> Self {
        let mut polygon = Self {
            rings,
            is_3d: false,
            srs: None,
        };
        if polygon.rings.iter().any(|r| r.is_3d()) {
            polygon.set_coordinate_dimension(3);
        }

        polygon
    }

    /// Exterior ring.
    pub fn exterior(&self) -> Option<&LinearRing> {
        self.rings.first()
    }

    /// Holes.
    pub fn interiors(&self) -> &[LinearRing] {
        self.rings.get(1..).unwrap_or_default()
    }

    /// All rings, exterior first.
    pub fn rings(&self) -> &[LinearRing] {
        &self.rings
    }

    /// Takes the rings out of the polygon.
    pub fn into_rings(self) -> Vec<LinearRing> {
        self.rings
    }

    /// Number of holes.
    pub fn num_interior_rings(&self) -> usize {
        self.rings.len().saturating_sub(1)
    }

    /// Appends a ring. The first ring added becomes the exterior.
    ///
    /// Adding a 3d ring makes the whole polygon 3d. A 2d ring added to a 3d polygon is made 3d.
    pub fn add_ring(&mut self, mut ring: LinearRing) {
        if ring.is_3d() && !self.is_3d {
            self.set_coordinate_dimension(3);
        } else if self.is_3d && !ring.is_3d() {
            ring.set_coordinate_dimension(3);
        }

        self.rings.push(ring);
    }

    /// Changes a ring in place. Returns `None` if there is no ring with this index.
    ///
    /// If the ring becomes 3d, the whole polygon is made 3d.
    pub fn update_ring<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut LinearRing) -> R,
    ) -> Option<R> {
        let ring = self.rings.get_mut(index)?;
        let result = f(ring);
        if ring.is_3d() && !self.is_3d {
            self.set_coordinate_dimension(3);
        } else if self.is_3d && !ring.is_3d() {
            ring.set_coordinate_dimension(3);
        }

        Some(result)
    }

    /// Closes all rings that are not closed.
    pub fn close_rings(&mut self) {
        for ring in &mut self.rings {
            ring.close_rings();
        }
    }

    /// Area of the exterior minus the area of the holes.
    pub fn area(&self) -> f64 {
        let Some(exterior) = self.exterior() else {
            return 0.0;
        };

        exterior.area() - self.interiors().iter().map(|r| r.area()).sum::<f64>()
    }

    /// Total length of all rings.
    pub fn perimeter(&self) -> f64 {
        self.rings.iter().map(|r| r.length()).sum()
    }

    pub(crate) fn wkb_body_size(&self) -> usize {
        WKB_COUNT_SIZE + self.rings.iter().map(|r| r.wkb_body_size()).sum::<usize>()
    }

    pub(crate) fn write_wkb_body(&self, writer: &mut WkbWriter) {
        writer.write_count(self.rings.len());
        for ring in &self.rings {
            ring.write_wkb_body(writer);
        }
    }

    pub(crate) fn read_wkb_polygon(reader: &mut WkbReader<'_>, code: WkbTypeCode) -> Result<Self> {
        let count = reader.read_count("ring count", MIN_RING_SIZE)?;
        let mut rings = reader.alloc(count, MIN_RING_SIZE)?;
        for _ in 0..count {
            let points = reader.read_coords("ring point count", code.has_z, code.has_m)?;
            rings.push(LinearRing::from(if code.has_z {
                LineString::new_3d(points)
            } else {
                LineString::new(points)
            }));
        }

        Ok(Self {
            rings,
            is_3d: code.has_z,
            srs: None,
        })
    }

    pub(crate) fn write_wkt_body(&self, writer: &mut WktWriter) {
        if self.exterior().map_or(true, |r| r.is_empty()) {
            writer.write_empty();
            return;
        }

        writer.write_list(&self.rings, |writer, ring| ring.write_wkt_body(writer));
    }

    pub(crate) fn read_wkt_body(reader: &mut WktReader<'_>, dims: Dims) -> Result<Self> {
        let mut polygon = Self {
            rings: vec![],
            is_3d: dims.has_z,
            srs: None,
        };
        if reader.read_empty_or_open()? {
            return Ok(polygon);
        }

        loop {
            let ring = if reader.consume_empty()? {
                log::trace!("Empty ring in polygon");
                LinearRing::default()
            } else {
                reader.expect(Token::LParen)?;
                let (points, has_z) = reader.read_coord_list(dims)?;
                LinearRing::from(if has_z {
                    LineString::new_3d(points)
                } else {
                    LineString::new(points)
                })
            };
            polygon.add_ring(ring);

            if !reader.read_separator()? {
                break;
            }
        }

        Ok(polygon)
    }
}

impl Geometry for Polygon {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::Polygon
    }

    fn is_3d(&self) -> bool {
        self.is_3d
    }

    fn set_coordinate_dimension(&mut self, dimension: u8) {
        self.is_3d = dimension == 3;
        for ring in &mut self.rings {
            ring.set_coordinate_dimension(dimension);
        }
    }

    fn is_empty(&self) -> bool {
        self.rings.iter().all(|r| r.is_empty())
    }

    fn empty(&mut self) {
        self.rings.clear();
    }

    fn bounding_box(&self) -> Option<Envelope3D> {
        Envelope3D::merge_all(self.rings.iter().filter_map(|r| r.bounding_box()))
    }

    fn transform(&mut self, transform: &dyn CoordinateTransform) -> Result<()> {
        let mut rings = self.rings.clone();
        for ring in &mut rings {
            ring.transform(transform)?;
        }

        self.rings = rings;
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
        for ring in &mut self.rings {
            ring.swap_xy();
        }
    }
}

impl ToWkb for Polygon {
    fn wkb_size(&self) -> usize {
        WKB_HEADER_SIZE + self.wkb_body_size()
    }

    fn write_wkb(&self, writer: &mut WkbWriter) {
        writer.write_header(GeometryType::Polygon, self.is_3d);
        self.write_wkb_body(writer);
    }
}

impl FromWkb for Polygon {
    fn accepts(geometry_type: GeometryType) -> bool {
        geometry_type == GeometryType::Polygon
    }

    fn read_wkb_body(reader: &mut WkbReader<'_>, code: WkbTypeCode) -> Result<Self> {
        Self::read_wkb_polygon(reader, code)
    }
}

impl ToWkt for Polygon {
    fn write_wkt(&self, writer: &mut WktWriter) {
        writer.write_keyword(GeometryType::Polygon, self.is_3d);
        self.write_wkt_body(writer);
    }
}

impl FromWkt for Polygon {
    fn read_wkt(reader: &mut WktReader<'_>) -> Result<Self> {
        let dims = reader.read_tagged(GeometryType::Polygon)?;
        Self::read_wkt_body(reader, dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coord;
    use crate::error::ErrorKind;
    use crate::wkb::ByteOrder;

    fn ring(points: &[(f64, f64)]) -> LinearRing {
        LinearRing::new(points.iter().map(|p| Coord::from(*p)).collect())
    }

    fn square_with_hole() -> Polygon {
        Polygon::new(
            ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
            vec![ring(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)])],
        )
    }

    #[test]
    fn accessors() {
        let polygon = square_with_hole();
        assert_eq!(polygon.num_interior_rings(), 1);
        assert_eq!(polygon.exterior().unwrap().num_points(), 5);
        assert_eq!(polygon.area(), 16.0 - 0.5);
        assert_eq!(Polygon::default().interiors().len(), 0);
    }

    #[test]
    fn empty_polygon_wkt() {
        assert_eq!(Polygon::default().to_wkt(), "POLYGON EMPTY");

        let polygon = Polygon::from_rings(vec![LinearRing::default()]);
        assert!(polygon.is_empty());
        assert_eq!(polygon.to_wkt(), "POLYGON EMPTY");
    }

    #[test]
    fn wkt() {
        let polygon = square_with_hole();
        assert_eq!(
            polygon.to_wkt(),
            "POLYGON ((0 0,4 0,4 4,0 4,0 0),(1 1,2 1,2 2,1 1))"
        );
        assert_eq!(Polygon::from_wkt(&polygon.to_wkt()).unwrap(), polygon);

        let legacy = Polygon::from_wkt("POLYGON ((0 0,1 0,1 1,0 0),EMPTY)").unwrap();
        assert_eq!(legacy.rings().len(), 2);
        assert!(legacy.interiors()[0].is_empty());

        assert_eq!(
            Polygon::from_wkt("POLYGON (0 0,1 0,1 1,0 0)")
                .unwrap_err()
                .kind(),
            ErrorKind::CorruptData
        );
    }

    #[test]
    fn wkt_z_ring_promotes_polygon() {
        let polygon = Polygon::from_wkt("POLYGON ((0 0,1 0,1 1,0 0),(0 0 1,1 0 1,1 1 1,0 0 1))").unwrap();
        assert!(polygon.is_3d());
        assert!(polygon.rings().iter().all(|r| r.is_3d()));
    }

    #[test]
    fn wkb_rings_have_no_header() {
        let polygon = square_with_hole();
        let bytes = polygon.to_wkb(ByteOrder::Ndr);
        assert_eq!(
            bytes.len(),
            9 + (4 + 5 * 16) + (4 + 4 * 16)
        );
        assert_eq!(polygon.wkb_size(), bytes.len());
        assert_eq!(&bytes[5..9], &2u32.to_le_bytes());
        assert_eq!(&bytes[9..13], &5u32.to_le_bytes());

        assert_eq!(Polygon::from_wkb(&bytes).unwrap(), polygon);
    }

    #[test]
    fn update_ring_follows_dimension() {
        let mut polygon = square_with_hole();
        polygon.update_ring(1, |ring| ring.set_z(0, 3.0)).unwrap();
        assert!(polygon.is_3d());
        assert!(polygon.exterior().unwrap().is_3d());
        assert!(polygon.update_ring(5, |_| ()).is_none());
    }
}
