use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::coord::Coord;
use crate::error::{GeometryError, Result};
use crate::geometry_type::WkbTypeCode;
use crate::wkb::{ByteOrder, WkbSize, MAX_NESTING_DEPTH, WKB_COUNT_SIZE};

/// Cursor over a WKB buffer.
///
/// Every read is bounds checked: running out of bytes is reported as [`GeometryError::NotEnoughData`], never as a
/// panic. The byte order is taken from the header of the record being read and restored when a nested record is
/// finished (see [`WkbReader::nested`]).
pub struct WkbReader<'a> {
    cursor: Cursor<&'a [u8]>,
    byte_order: ByteOrder,
    size_known: bool,
    depth: usize,
}

impl<'a> WkbReader<'a> {
    /// Creates a reader. With [`WkbSize::Known`] the buffer is cut to the declared size.
    pub fn new(buf: &'a [u8], size: WkbSize) -> Self {
        let (buf, size_known) = match size {
            WkbSize::Known(size) => (&buf[..size.min(buf.len())], true),
            WkbSize::Unknown => (buf, false),
        };

        Self {
            cursor: Cursor::new(buf),
            byte_order: ByteOrder::default(),
            size_known,
            depth: 0,
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Number of bytes left in the buffer.
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    /// Byte order of the record being read.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Reads a nested record, restoring the byte order of the enclosing record afterwards.
    ///
    /// Records nested deeper than [`MAX_NESTING_DEPTH`] levels are rejected as corrupt.
    pub fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(GeometryError::CorruptData(
                "too many nesting levels".to_string(),
            ));
        }

        let byte_order = self.byte_order;
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        self.byte_order = byte_order;
        result
    }

    /// Reads the byte order marker and the type code of a record.
    pub fn read_header(&mut self) -> Result<WkbTypeCode> {
        let marker = self.read_u8("byte order marker")?;
        self.byte_order = ByteOrder::try_from(marker).map_err(|_| {
            GeometryError::CorruptData(format!("invalid byte order marker {marker}"))
        })?;

        let code = self.read_u32("geometry type code")?;
        WkbTypeCode::decode(code)
    }

    /// Reads an element count.
    ///
    /// `item_size` is the smallest possible size of one element. When the buffer size is known, a count that does not
    /// fit into the rest of the buffer is rejected before anything is allocated.
    pub fn read_count(&mut self, what: &str, item_size: usize) -> Result<usize> {
        let raw = self.read_u32(what)?;
        if (raw as i32) < 0 {
            return Err(GeometryError::CorruptData(format!(
                "{what} is negative ({})",
                raw as i32
            )));
        }

        let count = raw as usize;
        let needed = count.checked_mul(item_size).ok_or_else(|| {
            GeometryError::CorruptData(format!("{what} {count} is too large"))
        })?;

        if self.size_known && needed > self.remaining() {
            return Err(GeometryError::NotEnoughData(format!(
                "{what} {count} needs {needed} bytes, {} left",
                self.remaining()
            )));
        }

        Ok(count)
    }

    /// Allocates a vector for `count` elements of at least `item_size` bytes each.
    ///
    /// The reservation never exceeds what the rest of the buffer can hold, so a forged count cannot trigger a huge
    /// allocation.
    pub fn alloc<T>(&self, count: usize, item_size: usize) -> Result<Vec<T>> {
        let mut items = Vec::new();
        items.try_reserve(count.min(self.remaining() / item_size.max(1)))?;
        Ok(items)
    }

    /// Reads one coordinate. M values are read and discarded.
    pub fn read_coord(&mut self, has_z: bool, has_m: bool) -> Result<Coord> {
        let x = self.read_f64("x coordinate")?;
        let y = self.read_f64("y coordinate")?;
        let z = if has_z { self.read_f64("z coordinate")? } else { 0.0 };
        if has_m {
            self.read_f64("m value")?;
        }

        Ok(Coord::new_3d(x, y, z))
    }

    /// Reads a count-prefixed coordinate array.
    pub fn read_coords(&mut self, what: &str, has_z: bool, has_m: bool) -> Result<Vec<Coord>> {
        let coord_size = coord_size(has_z, has_m);
        let count = self.read_count(what, coord_size)?;
        let mut coords = self.alloc(count, coord_size)?;
        for _ in 0..count {
            coords.push(self.read_coord(has_z, has_m)?);
        }

        Ok(coords)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self, what: &str) -> Result<u8> {
        self.cursor
            .read_u8()
            .map_err(|_| self.not_enough_data(what))
    }

    /// Reads an unsigned 32 bit integer in the current byte order.
    pub fn read_u32(&mut self, what: &str) -> Result<u32> {
        let value = match self.byte_order {
            ByteOrder::Xdr => self.cursor.read_u32::<BigEndian>(),
            ByteOrder::Ndr => self.cursor.read_u32::<LittleEndian>(),
        };
        value.map_err(|_| self.not_enough_data(what))
    }

    /// Reads a double in the current byte order.
    pub fn read_f64(&mut self, what: &str) -> Result<f64> {
        let value = match self.byte_order {
            ByteOrder::Xdr => self.cursor.read_f64::<BigEndian>(),
            ByteOrder::Ndr => self.cursor.read_f64::<LittleEndian>(),
        };
        value.map_err(|_| self.not_enough_data(what))
    }

    fn not_enough_data(&self, what: &str) -> GeometryError {
        GeometryError::NotEnoughData(format!(
            "unexpected end of data at byte {} reading {what}",
            self.position()
        ))
    }
}

/// Size of one coordinate in a record.
fn coord_size(has_z: bool, has_m: bool) -> usize {
    16 + if has_z { 8 } else { 0 } + if has_m { 8 } else { 0 }
}

/// Smallest possible size of a point array: just its count.
pub(crate) const MIN_RING_SIZE: usize = WKB_COUNT_SIZE;
