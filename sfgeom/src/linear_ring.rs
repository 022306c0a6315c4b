use std::ops::{Deref, DerefMut};

use crate::coord::Coord;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::geometry_type::GeometryType;
use crate::line_string::LineString;
use crate::wkt::{FromWkt, ToWkt, WktReader, WktWriter};

/// Ring of a polygon: a line string that is expected (but not required) to be closed.
///
/// A ring has no WKB representation of its own. It is only encoded as a part of a polygon, as a bare point array
/// without a header. The point accessors of [`LineString`] are reachable through `Deref`, and so is
/// `LineString::to_wkb`: calling it on a ring encodes the points as a standalone `LINESTRING` record. Use
/// [`LinearRing::as_line_string`] to make that conversion explicit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearRing(LineString);

impl Deref for LinearRing {
    type Target = LineString;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LinearRing {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl LinearRing {
    /// Creates a 2d ring.
    pub fn new(points: Vec<Coord>) -> Self {
        Self(LineString::new(points))
    }

    /// Creates a 3d ring.
    pub fn new_3d(points: Vec<Coord>) -> Self {
        Self(LineString::new_3d(points))
    }

    /// Underlying line string.
    pub fn as_line_string(&self) -> &LineString {
        &self.0
    }

    /// Returns the underlying line string.
    pub fn into_line_string(self) -> LineString {
        self.0
    }

    /// Twice the signed area is the shoelace sum. Positive for counterclockwise rings.
    pub fn signed_area(&self) -> f64 {
        let points = self.points();
        if points.len() < 3 {
            return 0.0;
        }

        let sum: f64 = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();
        sum / 2.0
    }

    /// Area enclosed by the ring.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Whether the points go clockwise.
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Appends a copy of the first point if the ring is not closed.
    pub fn close_rings(&mut self) {
        let (Some(first), Some(last)) = (self.start_point(), self.end_point()) else {
            return;
        };

        if first != last {
            self.0.push(first);
        }
    }
}

impl From<LineString> for LinearRing {
    fn from(value: LineString) -> Self {
        Self(value)
    }
}

impl From<LinearRing> for LineString {
    fn from(value: LinearRing) -> Self {
        value.0
    }
}

impl ToWkt for LinearRing {
    fn write_wkt(&self, writer: &mut WktWriter) {
        writer.write_keyword(GeometryType::LinearRing, self.is_3d());
        self.write_wkt_body(writer);
    }
}

impl FromWkt for LinearRing {
    fn read_wkt(reader: &mut WktReader<'_>) -> Result<Self> {
        let dims = reader.read_tagged(GeometryType::LinearRing)?;
        LineString::read_wkt_body(reader, dims).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> LinearRing {
        LinearRing::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(2.0, 0.0),
            Coord::new(2.0, 2.0),
            Coord::new(0.0, 2.0),
            Coord::new(0.0, 0.0),
        ])
    }

    #[test]
    fn orientation() {
        let mut ring = square();
        assert_eq!(ring.area(), 4.0);
        assert!(!ring.is_clockwise());

        ring.reverse_points();
        assert!(ring.is_clockwise());
        assert_eq!(ring.signed_area(), -4.0);
    }

    #[test]
    fn close() {
        let mut ring = square();
        ring.set_num_points(4);
        assert!(!ring.is_closed());

        ring.close_rings();
        assert_eq!(ring.num_points(), 5);
        assert!(ring.is_closed());

        ring.close_rings();
        assert_eq!(ring.num_points(), 5);

        let mut empty = LinearRing::default();
        empty.close_rings();
        assert!(empty.is_empty());
    }

    #[test]
    fn wkt() {
        let ring = square();
        assert_eq!(ring.to_wkt(), "LINEARRING (0 0,2 0,2 2,0 2,0 0)");
        assert_eq!(LinearRing::from_wkt(&ring.to_wkt()).unwrap(), ring);
    }

    #[test]
    fn encoded_only_inside_polygon() {
        use crate::polygon::Polygon;
        use crate::wkb::{ByteOrder, ToWkb};

        let ring = square();
        let polygon = Polygon::new(ring.clone(), vec![]);
        let bytes = polygon.to_wkb(ByteOrder::Ndr);

        // header, ring count, then the point count directly
        assert_eq!(bytes.len(), 5 + 4 + 4 + 5 * 16);
        assert_eq!(&bytes[9..13], &5u32.to_le_bytes());

        let line = ring.as_line_string().to_wkb(ByteOrder::Ndr);
        assert_eq!(&line[1..5], &2u32.to_le_bytes());
        assert_eq!(&line[5..], &bytes[9..]);
    }
}
