use crate::coord::Coord;
use crate::envelope::Envelope3D;
use crate::error::{GeometryError, Result};
use crate::geometry::Geometry;
use crate::geometry_type::{GeometryType, WkbTypeCode};
use crate::point::Point;
use crate::spatial_ref::SpatialRef;
use crate::transform::{transform_coords, CoordinateTransform};
use crate::wkb::{
    written_coord_size, FromWkb, ToWkb, WkbReader, WkbWriter, WKB_COUNT_SIZE, WKB_HEADER_SIZE,
};
use crate::wkt::{Dims, FromWkt, ToWkt, WktReader, WktWriter};

/// Ordered sequence of coordinates.
///
/// Intermediate states with zero or one point are allowed while the line is being built.
#[derive(Debug, Clone, Default)]
pub struct LineString {
    points: Vec<Coord>,
    is_3d: bool,
    srs: Option<SpatialRef>,
}

impl PartialEq for LineString {
    fn eq(&self, other: &Self) -> bool {
        self.is_3d == other.is_3d && self.points == other.points
    }
}

impl LineString {
    /// Creates a 2d line string. Z values of the points are dropped.
    pub fn new(points: Vec<Coord>) -> Self {
        let mut line = Self {
            points,
            is_3d: true,
            srs: None,
        };
        line.set_coordinate_dimension(2);
        line
    }

    /// Creates a 3d line string.
    pub fn new_3d(points: Vec<Coord>) -> Self {
        Self {
            points,
            is_3d: true,
            srs: None,
        }
    }

    /// Builds a line string from parallel ordinate arrays. The line is 3d if `z` is given.
    pub fn from_arrays(x: &[f64], y: &[f64], z: Option<&[f64]>) -> Result<Self> {
        if x.len() != y.len() || z.is_some_and(|z| z.len() != x.len()) {
            return Err(GeometryError::InvalidInput(format!(
                "ordinate arrays have different lengths: x {}, y {}, z {}",
                x.len(),
                y.len(),
                z.map(|z| z.len()).unwrap_or(x.len())
            )));
        }

        let points = match z {
            Some(z) => x
                .iter()
                .zip(y)
                .zip(z)
                .map(|((x, y), z)| Coord::new_3d(*x, *y, *z))
                .collect(),
            None => x.iter().zip(y).map(|(x, y)| Coord::new(*x, *y)).collect(),
        };

        Ok(Self {
            points,
            is_3d: z.is_some(),
            srs: None,
        })
    }

    /// Points of the line.
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    /// Takes the points out of the line.
    pub fn into_points(self) -> Vec<Coord> {
        self.points
    }

    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Point at the given index.
    pub fn point(&self, index: usize) -> Option<Point> {
        self.points
            .get(index)
            .map(|c| Point::from_coord(*c, self.is_3d))
    }

    /// X of the point at the given index.
    pub fn get_x(&self, index: usize) -> Option<f64> {
        self.points.get(index).map(|c| c.x)
    }

    /// Y of the point at the given index.
    pub fn get_y(&self, index: usize) -> Option<f64> {
        self.points.get(index).map(|c| c.y)
    }

    /// Z of the point at the given index.
    pub fn get_z(&self, index: usize) -> Option<f64> {
        self.points.get(index).map(|c| c.z)
    }

    /// First point.
    pub fn start_point(&self) -> Option<Coord> {
        self.points.first().copied()
    }

    /// Last point.
    pub fn end_point(&self) -> Option<Coord> {
        self.points.last().copied()
    }

    /// Replaces all the points, keeping the coordinate dimension of the line.
    pub fn set_points(&mut self, points: Vec<Coord>) {
        self.points = points;
        if !self.is_3d {
            self.set_coordinate_dimension(2);
        }
    }

    /// Sets X and Y of the point at the given index, extending the line with zero points if needed.
    pub fn set_point(&mut self, index: usize, x: f64, y: f64) {
        self.ensure_len(index + 1);
        self.points[index].x = x;
        self.points[index].y = y;
    }

    /// Sets the point at the given index, extending the line if needed. Makes the line 3d.
    pub fn set_point_3d(&mut self, index: usize, x: f64, y: f64, z: f64) {
        self.ensure_len(index + 1);
        self.points[index] = Coord::new_3d(x, y, z);
        self.is_3d = true;
    }

    /// Sets Z of the point at the given index, extending the line if needed. Makes the line 3d.
    pub fn set_z(&mut self, index: usize, z: f64) {
        self.ensure_len(index + 1);
        self.points[index].z = z;
        self.is_3d = true;
    }

    /// Appends a point.
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.points.push(Coord::new(x, y));
    }

    /// Appends a point and makes the line 3d.
    pub fn add_point_3d(&mut self, x: f64, y: f64, z: f64) {
        self.points.push(Coord::new_3d(x, y, z));
        self.is_3d = true;
    }

    /// Appends a coordinate, keeping the dimension of the line.
    pub fn push(&mut self, coord: Coord) {
        self.points.push(if self.is_3d {
            coord
        } else {
            coord.flattened()
        });
    }

    /// Truncates the line, or extends it with zero points.
    pub fn set_num_points(&mut self, count: usize) {
        self.points.resize(count, Coord::default());
    }

    fn ensure_len(&mut self, len: usize) {
        if self.points.len() < len {
            self.points.resize(len, Coord::default());
        }
    }

    /// Appends the points `start..=end` of another line. With `end` of `None` the points up to the end of `other`
    /// are taken. If `start > end`, the points are appended in reverse order.
    ///
    /// Appending points of a 3d line makes this line 3d.
    pub fn add_sub_line_string(
        &mut self,
        other: &LineString,
        start: usize,
        end: Option<usize>,
    ) -> Result<()> {
        let len = other.num_points();
        if len == 0 {
            return Ok(());
        }

        let end = end.unwrap_or(len - 1);
        if start >= len || end >= len {
            return Err(GeometryError::InvalidInput(format!(
                "vertex range {start}..={end} is out of a line of {len} points"
            )));
        }

        if other.is_3d && !self.is_3d {
            self.set_coordinate_dimension(3);
        }

        let flatten = !self.is_3d;
        let adjust = |c: &Coord| if flatten { c.flattened() } else { *c };
        if start <= end {
            self.points
                .extend(other.points[start..=end].iter().map(adjust));
        } else {
            self.points
                .extend(other.points[end..=start].iter().rev().map(adjust));
        }

        Ok(())
    }

    /// Reverses the order of the points.
    pub fn reverse_points(&mut self) {
        self.points.reverse();
    }

    /// Sum of the 2d lengths of the segments.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_2d(&w[1]))
            .sum()
    }

    /// Whether the line has points and its first and last points have the same X and Y.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first.equals_2d(last),
            _ => false,
        }
    }

    pub(crate) fn write_wkb_body(&self, writer: &mut WkbWriter) {
        writer.write_coords(&self.points, self.is_3d);
    }

    pub(crate) fn wkb_body_size(&self) -> usize {
        WKB_COUNT_SIZE + self.points.len() * written_coord_size(self.is_3d)
    }

    pub(crate) fn write_wkt_body(&self, writer: &mut WktWriter) {
        writer.write_coord_list(&self.points, self.is_3d);
    }

    pub(crate) fn read_wkt_body(reader: &mut WktReader<'_>, dims: Dims) -> Result<Self> {
        let (points, has_z) = reader.read_coord_body(dims)?;
        Ok(Self {
            points,
            is_3d: has_z || dims.has_z,
            srs: None,
        })
    }
}

impl Geometry for LineString {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::LineString
    }

    fn is_3d(&self) -> bool {
        self.is_3d
    }

    fn set_coordinate_dimension(&mut self, dimension: u8) {
        self.is_3d = dimension == 3;
        if !self.is_3d {
            for point in &mut self.points {
                point.z = 0.0;
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn empty(&mut self) {
        self.points.clear();
    }

    fn bounding_box(&self) -> Option<Envelope3D> {
        Envelope3D::from_coords(self.points.iter())
    }

    fn transform(&mut self, transform: &dyn CoordinateTransform) -> Result<()> {
        self.points = transform_coords(&self.points, self.is_3d, transform)?;
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
        for point in &mut self.points {
            *point = point.swapped();
        }
    }
}

impl ToWkb for LineString {
    fn wkb_size(&self) -> usize {
        WKB_HEADER_SIZE + self.wkb_body_size()
    }

    fn write_wkb(&self, writer: &mut WkbWriter) {
        writer.write_header(GeometryType::LineString, self.is_3d);
        self.write_wkb_body(writer);
    }
}

impl FromWkb for LineString {
    fn accepts(geometry_type: GeometryType) -> bool {
        geometry_type == GeometryType::LineString
    }

    fn read_wkb_body(reader: &mut WkbReader<'_>, code: WkbTypeCode) -> Result<Self> {
        let points = reader.read_coords("point count", code.has_z, code.has_m)?;
        Ok(Self {
            points,
            is_3d: code.has_z,
            srs: None,
        })
    }
}

impl ToWkt for LineString {
    fn write_wkt(&self, writer: &mut WktWriter) {
        writer.write_keyword(GeometryType::LineString, self.is_3d);
        self.write_wkt_body(writer);
    }
}

impl FromWkt for LineString {
    fn read_wkt(reader: &mut WktReader<'_>) -> Result<Self> {
        let dims = reader.read_tagged(GeometryType::LineString)?;
        Self::read_wkt_body(reader, dims)
    }
}

impl FromIterator<Coord> for LineString {
    fn from_iter<T: IntoIterator<Item = Coord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::wkb::{ByteOrder, WkbSize};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn line(points: &[(f64, f64)]) -> LineString {
        points.iter().map(|p| Coord::from(*p)).collect()
    }

    #[test]
    fn set_z_promotes_whole_line() {
        let mut line = line(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert_eq!(line.coordinate_dimension(), 2);

        line.set_z(1, 10.0);
        assert_eq!(line.coordinate_dimension(), 3);
        assert_eq!(line.get_z(1), Some(10.0));

        line.set_coordinate_dimension(2);
        assert_eq!(line.coordinate_dimension(), 2);
        assert!(line.points().iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn set_point_extends() {
        let mut line = LineString::default();
        line.set_point(2, 5.0, 6.0);
        assert_eq!(line.num_points(), 3);
        assert_eq!(line.get_x(0), Some(0.0));
        assert_eq!(line.get_y(2), Some(6.0));
        assert!(!line.is_3d());

        line.set_num_points(1);
        assert_eq!(line.num_points(), 1);
    }

    #[test]
    fn from_arrays() {
        let line = LineString::from_arrays(&[0.0, 1.0], &[2.0, 3.0], Some(&[4.0, 5.0])).unwrap();
        assert!(line.is_3d());
        assert_eq!(line.points()[1], Coord::new_3d(1.0, 3.0, 5.0));

        assert_matches!(
            LineString::from_arrays(&[0.0, 1.0], &[2.0], None),
            Err(GeometryError::InvalidInput(_))
        );
    }

    #[test]
    fn sub_line_string() {
        let source = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);

        let mut target = LineString::default();
        target.add_sub_line_string(&source, 1, Some(2)).unwrap();
        assert_eq!(target, line(&[(1.0, 0.0), (2.0, 0.0)]));

        target.add_sub_line_string(&source, 3, Some(0)).unwrap();
        assert_eq!(target.num_points(), 6);
        assert_eq!(target.start_point(), Some(Coord::new(1.0, 0.0)));
        assert_eq!(target.end_point(), Some(Coord::new(0.0, 0.0)));

        assert_matches!(
            target.add_sub_line_string(&source, 4, None),
            Err(GeometryError::InvalidInput(_))
        );
    }

    #[test]
    fn length_and_closed() {
        let mut ring = line(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0), (0.0, 0.0)]);
        assert_abs_diff_eq!(ring.length(), 12.0);
        assert!(ring.is_closed());

        ring.reverse_points();
        assert_eq!(ring.start_point(), Some(Coord::new(0.0, 0.0)));
        assert_eq!(ring.points()[1], Coord::new(3.0, 4.0));
        assert!(!LineString::default().is_closed());
    }

    #[test]
    fn wkb_sizes() {
        let line = line(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(line.wkb_size(), 9 + 32);
        assert_eq!(line.to_wkb(ByteOrder::Xdr).len(), line.wkb_size());

        let mut line_3d = line.clone();
        line_3d.set_coordinate_dimension(3);
        assert_eq!(line_3d.wkb_size(), 9 + 48);
    }

    #[test]
    fn wkb_point_count_checks() {
        let bytes = line(&[(0.0, 0.0), (1.0, 1.0)]).to_wkb(ByteOrder::Ndr);
        assert_eq!(
            LineString::from_wkb(&bytes[..bytes.len() - 1])
                .unwrap_err()
                .kind(),
            ErrorKind::NotEnoughData
        );

        let mut negative = bytes.clone();
        negative[5..9].copy_from_slice(&(-1i32).to_le_bytes());
        assert_eq!(
            LineString::from_wkb(&negative).unwrap_err().kind(),
            ErrorKind::CorruptData
        );

        let decoded = LineString::from_wkb_with_size(&bytes, WkbSize::Unknown).unwrap();
        assert_eq!(decoded.num_points(), 2);
    }

    #[test]
    fn wkt() {
        let line = line(&[(0.0, 0.0), (1.5, 1.0)]);
        assert_eq!(line.to_wkt(), "LINESTRING (0 0,1.5 1.0)");
        assert_eq!(LineString::default().to_wkt(), "LINESTRING EMPTY");

        let parsed = LineString::from_wkt("linestring(0 0, 1 1 5)").unwrap();
        assert!(parsed.is_3d());
        assert_eq!(parsed.points()[0], Coord::new_3d(0.0, 0.0, 0.0));
        assert_eq!(parsed.points()[1], Coord::new_3d(1.0, 1.0, 5.0));
    }
}
