use crate::coord::Coord;
use crate::envelope::Envelope3D;
use crate::error::{GeometryError, Result};
use crate::geometry::Geometry;
use crate::geometry_type::{GeometryType, WkbTypeCode};
use crate::line_string::LineString;
use crate::spatial_ref::SpatialRef;
use crate::transform::CoordinateTransform;
use crate::wkb::{FromWkb, ToWkb, WkbReader, WkbWriter, WKB_COUNT_SIZE, WKB_HEADER_SIZE};
use crate::wkt::{Dims, FromWkt, Token, ToWkt, WktReader, WktWriter};

/// Maximum gap between the end of a part and the start of the next one that is closed by snapping.
const JOIN_TOLERANCE: f64 = 1e-14;

/// Minimum size of a part record: header and point count.
const MIN_PART_SIZE: usize = WKB_HEADER_SIZE + WKB_COUNT_SIZE;

/// Chain of line strings, each one starting where the previous one ends.
#[derive(Debug, Clone, Default)]
pub struct CompoundCurve {
    parts: Vec<LineString>,
    is_3d: bool,
    srs: Option<SpatialRef>,
}

impl PartialEq for CompoundCurve {
    fn eq(&self, other: &Self) -> bool {
        self.is_3d == other.is_3d && self.parts == other.parts
    }
}

impl CompoundCurve {
    /// Creates a curve from its parts.
    pub fn from_parts(parts: impl IntoIterator<Item = LineString>) -> Result<Self> {
        let mut curve = Self::default();
        for part in parts {
            curve.add_curve(part)?;
        }

        Ok(curve)
    }

    /// Parts of the curve.
    pub fn parts(&self) -> &[LineString] {
        &self.parts
    }

    /// Number of parts.
    pub fn num_curves(&self) -> usize {
        self.parts.len()
    }

    /// Appends a part.
    ///
    /// The part must have at least 2 points and must start at the end of the previous part. A gap smaller than
    /// `1e-14` is closed by moving the start of the new part. Adding a 3d part makes the whole curve 3d.
    pub fn add_curve(&mut self, mut part: LineString) -> Result<()> {
        if part.num_points() < 2 {
            return Err(GeometryError::InvalidInput(format!(
                "compound curve part must have at least 2 points, found {}",
                part.num_points()
            )));
        }

        if let (Some(end), Some(start)) = (self.end_point(), part.start_point()) {
            if !end.equals_2d(&start) {
                if (end.x - start.x).abs() > JOIN_TOLERANCE
                    || (end.y - start.y).abs() > JOIN_TOLERANCE
                {
                    return Err(GeometryError::InvalidInput(format!(
                        "compound curve part starts at ({}, {}) but previous part ends at ({}, {})",
                        start.x, start.y, end.x, end.y
                    )));
                }

                part.set_point(0, end.x, end.y);
            }
        }

        if part.is_3d() && !self.is_3d {
            self.set_coordinate_dimension(3);
        } else if self.is_3d && !part.is_3d() {
            part.set_coordinate_dimension(3);
        }

        self.parts.push(part);
        Ok(())
    }

    /// First point of the curve.
    pub fn start_point(&self) -> Option<Coord> {
        self.parts.first().and_then(|p| p.start_point())
    }

    /// Last point of the curve.
    pub fn end_point(&self) -> Option<Coord> {
        self.parts.last().and_then(|p| p.end_point())
    }

    /// Whether the curve ends where it starts.
    pub fn is_closed(&self) -> bool {
        match (self.start_point(), self.end_point()) {
            (Some(start), Some(end)) => start.equals_2d(&end),
            _ => false,
        }
    }

    /// Total length of the parts.
    pub fn length(&self) -> f64 {
        self.parts.iter().map(LineString::length).sum()
    }

    /// Joins the parts into a single line string, dropping the repeated point at every junction.
    pub fn to_line_string(&self) -> LineString {
        let mut line = LineString::default();
        if self.is_3d {
            line.set_coordinate_dimension(3);
        }

        for part in &self.parts {
            let skip = usize::from(!line.is_empty());
            for point in part.points().iter().skip(skip) {
                line.push(*point);
            }
        }

        line
    }

    pub(crate) fn read_wkt_body(reader: &mut WktReader<'_>, dims: Dims) -> Result<Self> {
        let mut curve = Self {
            is_3d: dims.has_z,
            ..Default::default()
        };
        if reader.read_empty_or_open()? {
            return Ok(curve);
        }

        loop {
            let part = match reader.peek_token()? {
                Token::LParen => LineString::read_wkt_body(reader, dims)?,
                Token::Word(word) if word.eq_ignore_ascii_case(GeometryType::LineString.name()) => {
                    LineString::read_wkt(reader)?
                }
                Token::Word(word) => {
                    return Err(GeometryError::UnsupportedGeometryType(format!(
                        "'{word}' cannot be a part of a compound curve"
                    )))
                }
                _ => {
                    return Err(GeometryError::CorruptData(
                        "expected a compound curve part".into(),
                    ))
                }
            };
            curve.add_curve(part).map_err(into_corrupt)?;

            if !reader.read_separator()? {
                break;
            }
        }

        Ok(curve)
    }
}

fn into_corrupt(err: GeometryError) -> GeometryError {
    match err {
        GeometryError::InvalidInput(message) => GeometryError::CorruptData(message),
        err => err,
    }
}

impl Geometry for CompoundCurve {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::CompoundCurve
    }

    fn is_3d(&self) -> bool {
        self.is_3d
    }

    fn set_coordinate_dimension(&mut self, dimension: u8) {
        self.is_3d = dimension == 3;
        for part in &mut self.parts {
            part.set_coordinate_dimension(dimension);
        }
    }

    fn is_empty(&self) -> bool {
        self.parts.iter().all(|p| p.is_empty())
    }

    fn empty(&mut self) {
        self.parts.clear();
    }

    fn bounding_box(&self) -> Option<Envelope3D> {
        Envelope3D::merge_all(self.parts.iter().filter_map(|p| p.bounding_box()))
    }

    fn transform(&mut self, transform: &dyn CoordinateTransform) -> Result<()> {
        let mut parts = self.parts.clone();
        for part in &mut parts {
            part.transform(transform)?;
        }

        self.parts = parts;
        if let Some(srs) = transform.target_spatial_ref() {
            self.srs = Some(srs);
        }

        Ok(())
    }

    fn spatial_reference(&self) -> Option<&SpatialRef> {
        self.srs.as_ref()
    }

    fn assign_spatial_reference(&mut self, srs: Option<SpatialRef>) {
        for part in &mut self.parts {
            part.assign_spatial_reference(srs.clone());
        }
        self.srs = srs;
    }

    fn swap_xy(&mut self) {
        for part in &mut self.parts {
            part.swap_xy();
        }
    }
}

impl ToWkb for CompoundCurve {
    fn wkb_size(&self) -> usize {
        WKB_HEADER_SIZE + WKB_COUNT_SIZE + self.parts.iter().map(|p| p.wkb_size()).sum::<usize>()
    }

    fn write_wkb(&self, writer: &mut WkbWriter) {
        writer.write_header(GeometryType::CompoundCurve, self.is_3d);
        writer.write_count(self.parts.len());
        for part in &self.parts {
            part.write_wkb(writer);
        }
    }
}

impl FromWkb for CompoundCurve {
    fn accepts(geometry_type: GeometryType) -> bool {
        geometry_type == GeometryType::CompoundCurve
    }

    fn read_wkb_body(reader: &mut WkbReader<'_>, code: WkbTypeCode) -> Result<Self> {
        let count = reader.read_count("compound curve part count", MIN_PART_SIZE)?;
        let mut curve = Self {
            parts: reader.alloc(count, MIN_PART_SIZE)?,
            is_3d: code.has_z,
            srs: None,
        };

        for _ in 0..count {
            let part = reader.nested(LineString::read_wkb)?;
            curve.add_curve(part).map_err(into_corrupt)?;
        }

        Ok(curve)
    }
}

impl ToWkt for CompoundCurve {
    fn write_wkt(&self, writer: &mut WktWriter) {
        writer.write_keyword(GeometryType::CompoundCurve, self.is_3d);
        if self.parts.is_empty() {
            writer.write_empty();
            return;
        }

        writer.write_list(&self.parts, |writer, part| part.write_wkt_body(writer));
    }
}

impl FromWkt for CompoundCurve {
    fn read_wkt(reader: &mut WktReader<'_>) -> Result<Self> {
        let dims = reader.read_tagged(GeometryType::CompoundCurve)?;
        Self::read_wkt_body(reader, dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::wkb::ByteOrder;

    fn part(points: &[(f64, f64)]) -> LineString {
        points.iter().map(|p| Coord::from(*p)).collect()
    }

    fn curve() -> CompoundCurve {
        CompoundCurve::from_parts([
            part(&[(0.0, 0.0), (1.0, 0.0)]),
            part(&[(1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn parts_must_join() {
        let mut curve = curve();
        assert_eq!(curve.num_curves(), 2);
        assert_eq!(curve.length(), 3.0);
        assert!(!curve.is_closed());

        assert_eq!(
            curve
                .add_curve(part(&[(5.0, 5.0), (0.0, 0.0)]))
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            curve.add_curve(part(&[(0.0, 1.0)])).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );

        curve
            .add_curve(part(&[(0.0, 1.0 + 1e-15), (0.0, 0.0)]))
            .unwrap();
        assert!(curve.is_closed());
        assert_eq!(curve.parts()[2].start_point(), Some(Coord::new(0.0, 1.0)));
    }

    #[test]
    fn joined_line() {
        let line = curve().to_line_string();
        assert_eq!(line.num_points(), 4);
        assert_eq!(line.end_point(), Some(Coord::new(0.0, 1.0)));
    }

    #[test]
    fn wkt() {
        let curve = curve();
        assert_eq!(
            curve.to_wkt(),
            "COMPOUNDCURVE ((0 0,1 0),(1 0,1 1,0 1))"
        );
        assert_eq!(CompoundCurve::from_wkt(&curve.to_wkt()).unwrap(), curve);

        let spelled = CompoundCurve::from_wkt("COMPOUNDCURVE (LINESTRING (0 0,1 0),(1 0,1 1,0 1))").unwrap();
        assert_eq!(spelled, curve);

        assert_eq!(
            CompoundCurve::from_wkt("COMPOUNDCURVE (CIRCULARSTRING (0 0,1 1,2 0))")
                .unwrap_err()
                .kind(),
            ErrorKind::UnsupportedGeometryType
        );
    }

    #[test]
    fn wkb() {
        let curve = curve();
        let bytes = curve.to_wkb(ByteOrder::Xdr);
        assert_eq!(bytes.len(), curve.wkb_size());
        assert_eq!(&bytes[1..5], &9u32.to_be_bytes());
        assert_eq!(CompoundCurve::from_wkb(&bytes).unwrap(), curve);
    }
}
