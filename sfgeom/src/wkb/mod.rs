//! Well-known binary codec.
//!
//! Every geometry record starts with a byte order marker (`0` for big endian, `1` for little endian) and a 4 byte
//! type code, followed by the type specific payload. Polygon rings are bare point-count-prefixed arrays with no header
//! of their own. Members of collections are complete records, each with its own byte order and type code.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::geometry_type::{GeometryType, WkbTypeCode, WkbVariant};

mod reader;
mod writer;

pub(crate) use reader::MIN_RING_SIZE;
pub use reader::WkbReader;
pub(crate) use writer::written_coord_size;
pub use writer::WkbWriter;

/// Size of the byte order marker and the type code.
pub const WKB_HEADER_SIZE: usize = 5;
/// Size of an element count.
pub const WKB_COUNT_SIZE: usize = 4;
/// Deepest allowed nesting of collection members, in both WKB and WKT.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Byte order of the multi-byte values in a WKB record.
#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    Deserialize,
    Serialize,
)]
#[repr(u8)]
pub enum ByteOrder {
    /// Big endian.
    Xdr = 0,
    /// Little endian.
    #[default]
    Ndr = 1,
}

/// Size of the buffer given to the decoder.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WkbSize {
    /// The record is at most this long. Declared counts are checked against the remaining size before anything is
    /// allocated.
    Known(usize),
    /// The record length is not known and the declared counts are trusted. Reads are still bounded by the slice the
    /// reader was given.
    Unknown,
}

/// Geometries that can be written as WKB.
pub trait ToWkb {
    /// Exact number of bytes [`ToWkb::write_wkb`] writes.
    fn wkb_size(&self) -> usize;

    /// Writes the complete record (header included) into the writer.
    fn write_wkb(&self, writer: &mut WkbWriter);

    /// Encodes the geometry with the pre-ISO type codes.
    fn to_wkb(&self, byte_order: ByteOrder) -> Vec<u8> {
        self.to_wkb_variant(byte_order, WkbVariant::OldOgc)
    }

    /// Encodes the geometry with the given type code convention.
    fn to_wkb_variant(&self, byte_order: ByteOrder, variant: WkbVariant) -> Vec<u8> {
        let mut writer = WkbWriter::with_capacity(byte_order, variant, self.wkb_size());
        self.write_wkb(&mut writer);
        writer.into_inner()
    }

    /// Encodes the geometry into the caller's buffer and returns the number of bytes written.
    ///
    /// Fails with [`GeometryError::NotEnoughData`] if the buffer is shorter than [`ToWkb::wkb_size`].
    fn export_to_wkb(
        &self,
        byte_order: ByteOrder,
        variant: WkbVariant,
        buf: &mut [u8],
    ) -> Result<usize> {
        let size = self.wkb_size();
        if buf.len() < size {
            return Err(GeometryError::NotEnoughData(format!(
                "output buffer has {} bytes, geometry needs {size}",
                buf.len()
            )));
        }

        let bytes = self.to_wkb_variant(byte_order, variant);
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}

/// Geometries that can be read from WKB.
pub trait FromWkb: Sized {
    /// Whether a record with the given type can be decoded into `Self`.
    fn accepts(geometry_type: GeometryType) -> bool;

    /// Reads the payload of a record whose header has already been consumed.
    fn read_wkb_body(reader: &mut WkbReader<'_>, code: WkbTypeCode) -> Result<Self>;

    /// Reads a complete record.
    fn read_wkb(reader: &mut WkbReader<'_>) -> Result<Self> {
        let code = reader.read_header()?;
        if !Self::accepts(code.geometry_type) {
            return Err(GeometryError::UnsupportedGeometryType(format!(
                "unexpected {} record",
                code.geometry_type.name()
            )));
        }

        Self::read_wkb_body(reader, code)
    }

    /// Decodes a geometry from a buffer that holds at least one complete record.
    fn from_wkb(buf: &[u8]) -> Result<Self> {
        Self::from_wkb_with_size(buf, WkbSize::Known(buf.len()))
    }

    /// Decodes a geometry with an explicit size hint.
    fn from_wkb_with_size(buf: &[u8], size: WkbSize) -> Result<Self> {
        let mut reader = WkbReader::new(buf, size);
        Self::read_wkb(&mut reader).inspect_err(|err| log::debug!("Failed to decode WKB: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order_marker() {
        assert_eq!(u8::from(ByteOrder::Xdr), 0);
        assert_eq!(u8::from(ByteOrder::Ndr), 1);
        assert_eq!(ByteOrder::try_from(1u8).unwrap(), ByteOrder::Ndr);
        assert!(ByteOrder::try_from(2u8).is_err());
        assert_eq!(ByteOrder::default(), ByteOrder::Ndr);
    }
}
