//! Collections of geometries: the generic geometry collection and its typed variants.

use crate::envelope::Envelope3D;
use crate::error::{GeometryError, Result};
use crate::geometry::{Geom, Geometry};
use crate::geometry_type::{GeometryType, WkbTypeCode};
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::spatial_ref::SpatialRef;
use crate::transform::CoordinateTransform;
use crate::triangle::Triangle;
use crate::wkb::{FromWkb, ToWkb, WkbReader, WkbWriter, WKB_COUNT_SIZE, WKB_HEADER_SIZE};
use crate::wkt::{Dims, FromWkt, Token, ToWkt, WktReader, WktWriter};

/// Minimum size of a member record: header and one count.
const MIN_MEMBER_SIZE: usize = WKB_HEADER_SIZE + WKB_COUNT_SIZE;

/// Geometry that can be a member of a [`MultiGeometry`].
pub trait CollectionMember: Geometry + FromWkb {
    /// Type of the collection of such members.
    const COLLECTION_TYPE: GeometryType;

    /// Converts a generic geometry into a member, or gives it back if it has a different type.
    fn from_geom(geom: Geom) -> std::result::Result<Self, Geom>;

    /// Converts the member into a generic geometry.
    fn into_geom(self) -> Geom;

    /// Reads one item of the member list. `None` means the item is skipped.
    fn read_wkt_member(reader: &mut WktReader<'_>, dims: Dims) -> Result<Option<Self>>;

    /// Writes one item of the member list.
    fn write_wkt_member(&self, writer: &mut WktWriter);
}

/// Ordered collection of exclusively owned geometries of type `G`.
///
/// All members have the same coordinate dimension as the collection: adding a 3d member makes the whole collection
/// 3d, and 2d members added to a 3d collection are made 3d.
#[derive(Debug, Clone)]
pub struct MultiGeometry<G> {
    members: Vec<G>,
    is_3d: bool,
    srs: Option<SpatialRef>,
}

/// Heterogeneous collection.
pub type GeometryCollection = MultiGeometry<Geom>;
/// Collection of points.
pub type MultiPoint = MultiGeometry<Point>;
/// Collection of line strings.
pub type MultiLineString = MultiGeometry<LineString>;
/// Collection of polygons.
pub type MultiPolygon = MultiGeometry<Polygon>;
/// Triangulated irregular network.
pub type TriangulatedSurface = MultiGeometry<Triangle>;

impl<G> Default for MultiGeometry<G> {
    fn default() -> Self {
        Self {
            members: vec![],
            is_3d: false,
            srs: None,
        }
    }
}

impl<G: PartialEq> PartialEq for MultiGeometry<G> {
    fn eq(&self, other: &Self) -> bool {
        self.is_3d == other.is_3d && self.members == other.members
    }
}

impl<G: CollectionMember> MultiGeometry<G> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection of the given members.
    pub fn from_members(members: impl IntoIterator<Item = G>) -> Self {
        let mut collection = Self::default();
        for member in members {
            collection.add(member);
        }

        collection
    }

    /// Members of the collection.
    pub fn members(&self) -> &[G] {
        &self.members
    }

    /// Takes the members out of the collection.
    pub fn into_members(self) -> Vec<G> {
        self.members
    }

    /// Iterates over the members.
    pub fn iter(&self) -> std::slice::Iter<'_, G> {
        self.members.iter()
    }

    /// Number of members.
    pub fn num_geometries(&self) -> usize {
        self.members.len()
    }

    /// Member at the given index.
    pub fn geometry(&self, index: usize) -> Option<&G> {
        self.members.get(index)
    }

    /// Appends a member, adjusting coordinate dimensions.
    pub fn add(&mut self, mut member: G) {
        if member.is_3d() && !self.is_3d {
            self.set_coordinate_dimension(3);
        } else if self.is_3d && !member.is_3d() {
            member.set_coordinate_dimension(3);
        }

        self.members.push(member);
    }

    /// Appends a generic geometry. Fails with [`GeometryError::UnsupportedGeometryType`] if the geometry does not
    /// have the member type of the collection.
    pub fn add_geometry(&mut self, geom: impl Into<Geom>) -> Result<()> {
        match G::from_geom(geom.into()) {
            Ok(member) => {
                self.add(member);
                Ok(())
            }
            Err(geom) => Err(GeometryError::UnsupportedGeometryType(format!(
                "{} cannot be added to {}",
                geom.geometry_name(),
                G::COLLECTION_TYPE.name()
            ))),
        }
    }

    /// Removes and returns the member at the given index.
    pub fn remove_geometry(&mut self, index: usize) -> Option<G> {
        (index < self.members.len()).then(|| self.members.remove(index))
    }

    /// Changes a member in place. Returns `None` if there is no member with this index.
    ///
    /// If the member becomes 3d, the whole collection is made 3d.
    pub fn update_geometry<R>(&mut self, index: usize, f: impl FnOnce(&mut G) -> R) -> Option<R> {
        let member = self.members.get_mut(index)?;
        let result = f(member);
        if member.is_3d() && !self.is_3d {
            self.set_coordinate_dimension(3);
        } else if self.is_3d && !member.is_3d() {
            member.set_coordinate_dimension(3);
        }

        Some(result)
    }

    /// Converts the collection into a generic geometry collection.
    pub fn into_geometry_collection(self) -> GeometryCollection {
        GeometryCollection {
            members: self.members.into_iter().map(G::into_geom).collect(),
            is_3d: self.is_3d,
            srs: self.srs,
        }
    }

    /// Converts a generic geometry collection into a typed one. The collection is given back if any of its members
    /// has a different type.
    pub fn try_from_geometry_collection(
        collection: GeometryCollection,
    ) -> std::result::Result<Self, GeometryCollection> {
        let mut members = Vec::with_capacity(collection.members.len());
        let mut rest = collection.members.into_iter();
        while let Some(geom) = rest.next() {
            match G::from_geom(geom) {
                Ok(member) => members.push(member),
                Err(geom) => {
                    let mut members: Vec<Geom> = members.into_iter().map(G::into_geom).collect();
                    members.push(geom);
                    members.extend(rest);
                    return Err(GeometryCollection {
                        members,
                        is_3d: collection.is_3d,
                        srs: collection.srs,
                    });
                }
            }
        }

        Ok(Self {
            members,
            is_3d: collection.is_3d,
            srs: collection.srs,
        })
    }

    pub(crate) fn read_wkt_body(reader: &mut WktReader<'_>, dims: Dims) -> Result<Self> {
        let mut collection = Self {
            is_3d: dims.has_z,
            ..Default::default()
        };
        if reader.read_empty_or_open()? {
            return Ok(collection);
        }

        loop {
            if let Some(member) = G::read_wkt_member(reader, dims)? {
                collection.add(member);
            }

            if !reader.read_separator()? {
                break;
            }
        }

        Ok(collection)
    }
}

impl<G: CollectionMember> Geometry for MultiGeometry<G> {
    fn geometry_type(&self) -> GeometryType {
        G::COLLECTION_TYPE
    }

    fn dimension(&self) -> u8 {
        if G::COLLECTION_TYPE == GeometryType::GeometryCollection {
            self.members.iter().map(|m| m.dimension()).max().unwrap_or(0)
        } else {
            G::COLLECTION_TYPE.nominal_dimension()
        }
    }

    fn is_3d(&self) -> bool {
        self.is_3d
    }

    fn set_coordinate_dimension(&mut self, dimension: u8) {
        self.is_3d = dimension == 3;
        for member in &mut self.members {
            member.set_coordinate_dimension(dimension);
        }
    }

    fn is_empty(&self) -> bool {
        self.members.iter().all(|m| m.is_empty())
    }

    fn empty(&mut self) {
        self.members.clear();
    }

    fn bounding_box(&self) -> Option<Envelope3D> {
        Envelope3D::merge_all(self.members.iter().filter_map(|m| m.bounding_box()))
    }

    fn transform(&mut self, transform: &dyn CoordinateTransform) -> Result<()> {
        let mut members = self.members.clone();
        for member in &mut members {
            member.transform(transform)?;
        }

        self.members = members;
        if let Some(srs) = transform.target_spatial_ref() {
            self.srs = Some(srs);
        }

        Ok(())
    }

    fn spatial_reference(&self) -> Option<&SpatialRef> {
        self.srs.as_ref()
    }

    fn assign_spatial_reference(&mut self, srs: Option<SpatialRef>) {
        for member in &mut self.members {
            member.assign_spatial_reference(srs.clone());
        }
        self.srs = srs;
    }

    fn swap_xy(&mut self) {
        for member in &mut self.members {
            member.swap_xy();
        }
    }
}

impl<G: CollectionMember> ToWkb for MultiGeometry<G> {
    fn wkb_size(&self) -> usize {
        WKB_HEADER_SIZE + WKB_COUNT_SIZE + self.members.iter().map(|m| m.wkb_size()).sum::<usize>()
    }

    fn write_wkb(&self, writer: &mut WkbWriter) {
        writer.write_header(G::COLLECTION_TYPE, self.is_3d);
        writer.write_count(self.members.len());
        for member in &self.members {
            member.write_wkb(writer);
        }
    }
}

impl<G: CollectionMember> FromWkb for MultiGeometry<G> {
    fn accepts(geometry_type: GeometryType) -> bool {
        geometry_type == G::COLLECTION_TYPE
    }

    fn read_wkb_body(reader: &mut WkbReader<'_>, code: WkbTypeCode) -> Result<Self> {
        let count = reader.read_count("member count", MIN_MEMBER_SIZE)?;
        let mut collection = Self {
            members: reader.alloc(count, MIN_MEMBER_SIZE)?,
            is_3d: code.has_z,
            srs: None,
        };

        for _ in 0..count {
            let member = reader.nested(G::read_wkb)?;
            collection.add(member);
        }

        Ok(collection)
    }
}

impl<G: CollectionMember> ToWkt for MultiGeometry<G> {
    fn write_wkt(&self, writer: &mut WktWriter) {
        writer.write_keyword(G::COLLECTION_TYPE, self.is_3d);
        if self.members.is_empty() {
            writer.write_empty();
            return;
        }

        writer.write_list(&self.members, |writer, member| {
            member.write_wkt_member(writer)
        });
    }
}

impl<G: CollectionMember> FromWkt for MultiGeometry<G> {
    fn read_wkt(reader: &mut WktReader<'_>) -> Result<Self> {
        let dims = reader.read_tagged(G::COLLECTION_TYPE)?;
        Self::read_wkt_body(reader, dims)
    }
}

impl<G: CollectionMember> FromIterator<G> for MultiGeometry<G> {
    fn from_iter<T: IntoIterator<Item = G>>(iter: T) -> Self {
        Self::from_members(iter)
    }
}

impl<'a, G> IntoIterator for &'a MultiGeometry<G> {
    type Item = &'a G;
    type IntoIter = std::slice::Iter<'a, G>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl CollectionMember for Point {
    const COLLECTION_TYPE: GeometryType = GeometryType::MultiPoint;

    fn from_geom(geom: Geom) -> std::result::Result<Self, Geom> {
        match geom {
            Geom::Point(g) => Ok(g),
            other => Err(other),
        }
    }

    fn into_geom(self) -> Geom {
        Geom::Point(self)
    }

    fn read_wkt_member(reader: &mut WktReader<'_>, dims: Dims) -> Result<Option<Self>> {
        if reader.consume_empty()? {
            log::trace!("Empty member in multipoint");
            return Ok(Some(Point::empty_with_dims(dims.has_z)));
        }

        let parenthesized = reader.peek_token()? == Token::LParen;
        if parenthesized {
            reader.next_token()?;
        }

        let (coord, has_z) = reader.read_coord(dims)?;
        if parenthesized {
            reader.expect(Token::RParen)?;
        }

        Ok(Some(Point::from_coord(coord, has_z || dims.has_z)))
    }

    fn write_wkt_member(&self, writer: &mut WktWriter) {
        if self.is_empty() {
            writer.write_empty();
        } else if writer.is_iso() {
            writer.write_str("(");
            self.write_wkt_coord(writer);
            writer.write_str(")");
        } else {
            self.write_wkt_coord(writer);
        }
    }
}

impl CollectionMember for LineString {
    const COLLECTION_TYPE: GeometryType = GeometryType::MultiLineString;

    fn from_geom(geom: Geom) -> std::result::Result<Self, Geom> {
        match geom {
            Geom::LineString(g) => Ok(g),
            other => Err(other),
        }
    }

    fn into_geom(self) -> Geom {
        Geom::LineString(self)
    }

    fn read_wkt_member(reader: &mut WktReader<'_>, dims: Dims) -> Result<Option<Self>> {
        LineString::read_wkt_body(reader, dims).map(Some)
    }

    fn write_wkt_member(&self, writer: &mut WktWriter) {
        self.write_wkt_body(writer);
    }
}

impl CollectionMember for Polygon {
    const COLLECTION_TYPE: GeometryType = GeometryType::MultiPolygon;

    fn from_geom(geom: Geom) -> std::result::Result<Self, Geom> {
        match geom {
            Geom::Polygon(g) => Ok(g),
            other => Err(other),
        }
    }

    fn into_geom(self) -> Geom {
        Geom::Polygon(self)
    }

    fn read_wkt_member(reader: &mut WktReader<'_>, dims: Dims) -> Result<Option<Self>> {
        Polygon::read_wkt_body(reader, dims).map(Some)
    }

    fn write_wkt_member(&self, writer: &mut WktWriter) {
        self.write_wkt_body(writer);
    }
}

impl CollectionMember for Triangle {
    const COLLECTION_TYPE: GeometryType = GeometryType::Tin;

    fn from_geom(geom: Geom) -> std::result::Result<Self, Geom> {
        match geom {
            Geom::Triangle(g) => Ok(g),
            other => Err(other),
        }
    }

    fn into_geom(self) -> Geom {
        Geom::Triangle(self)
    }

    fn read_wkt_member(reader: &mut WktReader<'_>, dims: Dims) -> Result<Option<Self>> {
        Triangle::read_wkt_body(reader, dims).map(Some)
    }

    fn write_wkt_member(&self, writer: &mut WktWriter) {
        self.write_wkt_body(writer);
    }
}

impl CollectionMember for Geom {
    const COLLECTION_TYPE: GeometryType = GeometryType::GeometryCollection;

    fn from_geom(geom: Geom) -> std::result::Result<Self, Geom> {
        Ok(geom)
    }

    fn into_geom(self) -> Geom {
        self
    }

    fn read_wkt_member(reader: &mut WktReader<'_>, _dims: Dims) -> Result<Option<Self>> {
        if reader.consume_empty()? {
            log::trace!("Skipping empty member of geometry collection");
            return Ok(None);
        }

        reader.nested(Geom::read_wkt).map(Some)
    }

    fn write_wkt_member(&self, writer: &mut WktWriter) {
        self.write_wkt(writer);
    }
}
