use crate::coord::Coord;
use crate::geometry_type::{GeometryType, WkbVariant};
use crate::wkt::WktOptions;

/// WKT output buffer.
#[derive(Debug, Clone, Default)]
pub struct WktWriter {
    out: String,
    options: WktOptions,
}

impl WktWriter {
    /// Creates a new writer.
    pub fn new(options: WktOptions) -> Self {
        Self {
            out: String::new(),
            options,
        }
    }

    /// Output options.
    pub fn options(&self) -> &WktOptions {
        &self.options
    }

    /// Whether the ISO flavour is written.
    pub fn is_iso(&self) -> bool {
        self.options.variant == WkbVariant::Iso
    }

    /// Returns the written text.
    pub fn into_string(self) -> String {
        self.out
    }

    /// Appends raw text.
    pub fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Writes the type keyword, the `Z` tag in ISO mode, and a separating space.
    pub fn write_keyword(&mut self, geometry_type: GeometryType, is_3d: bool) {
        self.out.push_str(geometry_type.name());
        if is_3d && self.is_iso() {
            self.out.push_str(" Z");
        }
        self.out.push(' ');
    }

    /// Writes `EMPTY`.
    pub fn write_empty(&mut self) {
        self.out.push_str("EMPTY");
    }

    /// Writes a coordinate tuple without parentheses.
    pub fn write_coord(&mut self, coord: &Coord, is_3d: bool) {
        let precision = self.options.precision;
        if precision.is_none() && fits_i32(coord.x) && fits_i32(coord.y) {
            self.out
                .push_str(&format!("{} {}", coord.x as i32, coord.y as i32));
        } else {
            self.out.push_str(&format_number(coord.x, precision));
            self.out.push(' ');
            self.out.push_str(&format_number(coord.y, precision));
        }

        if is_3d {
            self.out.push(' ');
            if coord.z.fract() == 0.0 && coord.z.abs() < 1e15 {
                self.out.push_str(&format!("{}", coord.z as i64));
            } else {
                self.out.push_str(&format_number(coord.z, precision));
            }
        }
    }

    /// Writes a parenthesized coordinate list, or `EMPTY` for an empty list.
    pub fn write_coord_list(&mut self, coords: &[Coord], is_3d: bool) {
        if coords.is_empty() {
            self.write_empty();
            return;
        }

        self.out.push('(');
        for (index, coord) in coords.iter().enumerate() {
            if index > 0 {
                self.out.push(',');
            }
            self.write_coord(coord, is_3d);
        }
        self.out.push(')');
    }

    /// Writes a parenthesized, comma separated list of items.
    pub fn write_list<T>(&mut self, items: &[T], mut write_item: impl FnMut(&mut Self, &T)) {
        self.out.push('(');
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.out.push(',');
            }
            write_item(self, item);
        }
        self.out.push(')');
    }
}

fn fits_i32(v: f64) -> bool {
    v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64
}

/// Formats a single ordinate.
///
/// Without precision the shortest representation that reads back to the same value is used, with `.0` appended to
/// integral values. With precision the value is rounded to that many decimals and trailing zeros are trimmed.
pub fn format_number(v: f64, precision: Option<usize>) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    match precision {
        None => {
            let mut s = v.to_string();
            if !s.contains('.') {
                s.push_str(".0");
            }
            s
        }
        Some(precision) => {
            let mut s = format!("{v:.precision$}");
            if s.contains('.') {
                let trimmed = s.trim_end_matches('0').len();
                s.truncate(trimmed);
                if s.ends_with('.') {
                    s.push('0');
                }
            } else {
                s.push_str(".0");
            }
            s
        }
    }
}
