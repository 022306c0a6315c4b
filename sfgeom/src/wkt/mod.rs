//! Well-known text codec.
//!
//! The grammar of a geometry is `KEYWORD [Z|M|ZM] (EMPTY | '(' ... ')')`. Containers nest one level of parentheses
//! per level of WKB nesting: polygon rings, collection members. Inside member lists a bare `EMPTY` is accepted for
//! an empty member.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry_type::WkbVariant;

mod reader;
mod writer;

pub use reader::{Dims, Token, WktReader};
pub use writer::{format_number, WktWriter};

/// Options of the WKT output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WktOptions {
    /// Flavour of the output. ISO adds the `Z` tag to 3d geometries and parenthesizes multipoint members.
    pub variant: WkbVariant,
    /// Number of decimals. `None` writes the shortest representation that reads back to the same value.
    pub precision: Option<usize>,
}

/// Geometries that can be written as WKT.
pub trait ToWkt {
    /// Writes the geometry, keyword included.
    fn write_wkt(&self, writer: &mut WktWriter);

    /// Formats the geometry with default options.
    fn to_wkt(&self) -> String {
        self.to_wkt_with(&WktOptions::default())
    }

    /// Formats the geometry with the given options.
    fn to_wkt_with(&self, options: &WktOptions) -> String {
        let mut writer = WktWriter::new(options.clone());
        self.write_wkt(&mut writer);
        writer.into_string()
    }
}

/// Geometries that can be read from WKT.
pub trait FromWkt: Sized {
    /// Reads the geometry, keyword included. Text after the geometry is left in the reader.
    fn read_wkt(reader: &mut WktReader<'_>) -> Result<Self>;

    /// Parses a geometry. Text after the geometry is ignored.
    fn from_wkt(text: &str) -> Result<Self> {
        let mut reader = WktReader::new(text);
        Self::read_wkt(&mut reader).inspect_err(|err| log::debug!("Failed to parse WKT: {err}"))
    }
}
