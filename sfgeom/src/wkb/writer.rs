use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

use crate::coord::Coord;
use crate::geometry_type::{GeometryType, WkbVariant};
use crate::wkb::ByteOrder;

/// Growable WKB output buffer.
#[derive(Debug, Clone)]
pub struct WkbWriter {
    buf: Vec<u8>,
    byte_order: ByteOrder,
    variant: WkbVariant,
}

impl WkbWriter {
    /// Creates a writer with preallocated space.
    pub fn with_capacity(byte_order: ByteOrder, variant: WkbVariant, capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            byte_order,
            variant,
        }
    }

    /// Byte order of the output.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Type code convention of the output.
    pub fn variant(&self) -> WkbVariant {
        self.variant
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing was written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the written bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Writes the byte order marker and the type code.
    pub fn write_header(&mut self, geometry_type: GeometryType, has_z: bool) {
        self.buf.push(self.byte_order.into());
        self.write_u32(geometry_type.wkb_code(has_z, self.variant));
    }

    /// Writes an element count.
    pub fn write_count(&mut self, count: usize) {
        self.write_u32(count as u32);
    }

    /// Writes a coordinate with or without Z.
    pub fn write_coord(&mut self, coord: &Coord, has_z: bool) {
        self.write_f64(coord.x);
        self.write_f64(coord.y);
        if has_z {
            self.write_f64(coord.z);
        }
    }

    /// Writes a count-prefixed coordinate array.
    pub fn write_coords(&mut self, coords: &[Coord], has_z: bool) {
        self.write_count(coords.len());
        for coord in coords {
            self.write_coord(coord, has_z);
        }
    }

    /// Writes an unsigned 32 bit integer in the output byte order.
    pub fn write_u32(&mut self, value: u32) {
        let mut bytes = [0; 4];
        match self.byte_order {
            ByteOrder::Xdr => BigEndian::write_u32(&mut bytes, value),
            ByteOrder::Ndr => LittleEndian::write_u32(&mut bytes, value),
        }
        self.buf.extend_from_slice(&bytes);
    }

    /// Writes a double in the output byte order.
    pub fn write_f64(&mut self, value: f64) {
        let mut bytes = [0; 8];
        match self.byte_order {
            ByteOrder::Xdr => BigEndian::write_f64(&mut bytes, value),
            ByteOrder::Ndr => LittleEndian::write_f64(&mut bytes, value),
        }
        self.buf.extend_from_slice(&bytes);
    }
}

/// Size of one coordinate written by [`WkbWriter::write_coord`].
pub(crate) fn written_coord_size(has_z: bool) -> usize {
    if has_z {
        24
    } else {
        16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_conventions() {
        let mut writer = WkbWriter::with_capacity(ByteOrder::Xdr, WkbVariant::OldOgc, 5);
        writer.write_header(GeometryType::Point, true);
        assert_eq!(writer.into_inner(), vec![0, 0x80, 0, 0, 1]);

        let mut writer = WkbWriter::with_capacity(ByteOrder::Ndr, WkbVariant::Iso, 5);
        writer.write_header(GeometryType::Point, true);
        assert_eq!(writer.into_inner(), vec![1, 0xE9, 0x03, 0, 0]);
    }

    #[test]
    fn doubles_follow_byte_order() {
        let mut writer = WkbWriter::with_capacity(ByteOrder::Xdr, WkbVariant::OldOgc, 8);
        writer.write_f64(1.0);
        assert_eq!(writer.into_inner(), 1.0f64.to_be_bytes().to_vec());

        let mut writer = WkbWriter::with_capacity(ByteOrder::Ndr, WkbVariant::OldOgc, 8);
        writer.write_f64(1.0);
        assert_eq!(writer.into_inner(), 1.0f64.to_le_bytes().to_vec());
    }
}
