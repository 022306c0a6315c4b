use crate::coord::Coord;
use crate::error::{GeometryError, Result};
use crate::geometry_type::GeometryType;
use crate::wkb::MAX_NESTING_DEPTH;

/// Lexical token of a WKT string.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Token<'a> {
    /// Keyword or number.
    Word(&'a str),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// End of input.
    End,
}

/// Dimension tag following a geometry keyword.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Dims {
    /// `Z` or `ZM` tag.
    pub has_z: bool,
    /// `M` or `ZM` tag.
    pub has_m: bool,
}

/// Recursive descent WKT reader.
///
/// Keywords are matched case-insensitively. After a failure the position of the reader is unspecified.
pub struct WktReader<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> WktReader<'a> {
    /// Creates a new reader.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    /// Unconsumed part of the input.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Reads a member geometry of a collection. Members nested deeper than [`MAX_NESTING_DEPTH`] levels are rejected
    /// as corrupt.
    pub fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(GeometryError::CorruptData(format!(
                "too many nesting levels at offset {}",
                self.pos
            )));
        }

        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Token<'a>> {
        let pos = self.pos;
        let token = self.next_token();
        self.pos = pos;
        token
    }

    /// Consumes the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }

        let Some(&first) = bytes.get(self.pos) else {
            return Ok(Token::End);
        };

        let token = match first {
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b',' => Token::Comma,
            c if is_word_char(c) => {
                let start = self.pos;
                let len = bytes[start..]
                    .iter()
                    .take_while(|c| is_word_char(**c))
                    .count();
                self.pos += len;
                return Ok(Token::Word(&self.input[start..start + len]));
            }
            _ => {
                let c = self.remaining().chars().next().unwrap_or_default();
                return Err(GeometryError::CorruptData(format!(
                    "unexpected character '{c}' at offset {}",
                    self.pos
                )));
            }
        };

        self.pos += 1;
        Ok(token)
    }

    /// Consumes the given token or fails.
    pub fn expect(&mut self, expected: Token<'_>) -> Result<()> {
        let token = self.next_token()?;
        if token == expected {
            Ok(())
        } else {
            Err(unexpected(token, &describe(expected)))
        }
    }

    /// Reads a keyword.
    pub fn read_word(&mut self) -> Result<&'a str> {
        match self.next_token()? {
            Token::Word(word) => Ok(word),
            token => Err(unexpected(token, "a keyword")),
        }
    }

    /// Reads the optional `Z`, `M` or `ZM` tag.
    pub fn read_dims(&mut self) -> Result<Dims> {
        let dims = match self.peek_token()? {
            Token::Word(w) if w.eq_ignore_ascii_case("Z") => Dims {
                has_z: true,
                has_m: false,
            },
            Token::Word(w) if w.eq_ignore_ascii_case("M") => Dims {
                has_z: false,
                has_m: true,
            },
            Token::Word(w) if w.eq_ignore_ascii_case("ZM") => Dims {
                has_z: true,
                has_m: true,
            },
            _ => return Ok(Dims::default()),
        };

        self.next_token()?;
        Ok(dims)
    }

    /// Reads the keyword of the expected type and the dimension tag after it.
    pub fn read_tagged(&mut self, expected: GeometryType) -> Result<Dims> {
        let word = self.read_word()?;
        if !word.eq_ignore_ascii_case(expected.name()) {
            return Err(GeometryError::CorruptData(format!(
                "expected {}, found '{word}'",
                expected.name()
            )));
        }

        self.read_dims()
    }

    /// Consumes either `EMPTY` (returns `true`) or `(` (returns `false`).
    pub fn read_empty_or_open(&mut self) -> Result<bool> {
        match self.next_token()? {
            Token::Word(w) if w.eq_ignore_ascii_case("EMPTY") => Ok(true),
            Token::LParen => Ok(false),
            token => Err(unexpected(token, "EMPTY or '('")),
        }
    }

    /// Whether the next token is `EMPTY`. Consumes it if so.
    pub fn consume_empty(&mut self) -> Result<bool> {
        match self.peek_token()? {
            Token::Word(w) if w.eq_ignore_ascii_case("EMPTY") => {
                self.next_token()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Consumes `,` (returns `true`) or `)` (returns `false`).
    pub fn read_separator(&mut self) -> Result<bool> {
        match self.next_token()? {
            Token::Comma => Ok(true),
            Token::RParen => Ok(false),
            token => Err(unexpected(token, "',' or ')'")),
        }
    }

    /// Reads one coordinate tuple of 2 to 4 numbers.
    ///
    /// Returns the coordinate and whether it had Z. Three numbers are read as XYM when the tag is `M`; the M value is
    /// discarded.
    pub fn read_coord(&mut self, dims: Dims) -> Result<(Coord, bool)> {
        let mut values = [0.0; 4];
        let mut count = 0;
        while let Token::Word(word) = self.peek_token()? {
            if count == values.len() {
                return Err(GeometryError::CorruptData(format!(
                    "too many ordinates in a coordinate near '{word}'"
                )));
            }

            values[count] = parse_number(word)?;
            count += 1;
            self.next_token()?;
        }

        match count {
            2 => Ok((Coord::new(values[0], values[1]), false)),
            3 if dims.has_m && !dims.has_z => Ok((Coord::new(values[0], values[1]), false)),
            3 | 4 => Ok((Coord::new_3d(values[0], values[1], values[2]), true)),
            _ => Err(GeometryError::CorruptData(format!(
                "coordinate must have 2 to 4 ordinates, found {count}"
            ))),
        }
    }

    /// Reads the coordinates after an opening `(` up to and including the closing `)`.
    pub fn read_coord_list(&mut self, dims: Dims) -> Result<(Vec<Coord>, bool)> {
        let mut coords = vec![];
        let mut has_z = false;
        loop {
            let (coord, coord_z) = self.read_coord(dims)?;
            coords.push(coord);
            has_z |= coord_z;

            if !self.read_separator()? {
                break;
            }
        }

        Ok((coords, has_z))
    }

    /// Reads `EMPTY` or a parenthesized coordinate list.
    pub fn read_coord_body(&mut self, dims: Dims) -> Result<(Vec<Coord>, bool)> {
        if self.read_empty_or_open()? {
            Ok((vec![], false))
        } else {
            self.read_coord_list(dims)
        }
    }
}

fn is_word_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'.' || c == b'+' || c == b'-'
}

fn parse_number(word: &str) -> Result<f64> {
    word.parse()
        .map_err(|_| GeometryError::CorruptData(format!("invalid number '{word}'")))
}

fn describe(token: Token<'_>) -> String {
    match token {
        Token::Word(w) => format!("'{w}'"),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::End => "end of input".to_string(),
    }
}

fn unexpected(token: Token<'_>, expected: &str) -> GeometryError {
    GeometryError::CorruptData(format!("expected {expected}, found {}", describe(token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn tokens() {
        let mut reader = WktReader::new(" point(1.5 -2e3,\tnan)");
        assert_eq!(reader.next_token().unwrap(), Token::Word("point"));
        assert_eq!(reader.next_token().unwrap(), Token::LParen);
        assert_eq!(reader.next_token().unwrap(), Token::Word("1.5"));
        assert_eq!(reader.next_token().unwrap(), Token::Word("-2e3"));
        assert_eq!(reader.next_token().unwrap(), Token::Comma);
        assert_eq!(reader.peek_token().unwrap(), Token::Word("nan"));
        assert_eq!(reader.next_token().unwrap(), Token::Word("nan"));
        assert_eq!(reader.next_token().unwrap(), Token::RParen);
        assert_eq!(reader.next_token().unwrap(), Token::End);
    }

    #[test]
    fn invalid_character() {
        let mut reader = WktReader::new("POINT [1 2]");
        reader.next_token().unwrap();
        assert_eq!(
            reader.next_token().unwrap_err().kind(),
            ErrorKind::CorruptData
        );
    }

    #[test]
    fn dims_tag() {
        let mut reader = WktReader::new("LineString zm (1 2 3 4)");
        let dims = reader.read_tagged(GeometryType::LineString).unwrap();
        assert!(dims.has_z && dims.has_m);
        let (coords, has_z) = reader.read_coord_body(dims).unwrap();
        assert_eq!(coords, vec![Coord::new_3d(1.0, 2.0, 3.0)]);
        assert!(has_z);
    }

    #[test]
    fn measured_triple_is_2d() {
        let mut reader = WktReader::new("(1 2 3, 4 5 6)");
        let dims = Dims {
            has_z: false,
            has_m: true,
        };
        let (coords, has_z) = reader.read_coord_body(dims).unwrap();
        assert!(!has_z);
        assert_eq!(coords, vec![Coord::new(1.0, 2.0), Coord::new(4.0, 5.0)]);
    }

    #[test]
    fn any_z_tuple_promotes() {
        let mut reader = WktReader::new("(1 2, 3 4 5)");
        let (coords, has_z) = reader.read_coord_body(Dims::default()).unwrap();
        assert!(has_z);
        assert_eq!(coords[1].z, 5.0);
    }

    #[test]
    fn grammar_errors() {
        for input in ["(1)", "(1 2 3 4 5)", "(1 2", "(1 2;", "(1 a)", "1 2)"] {
            let mut reader = WktReader::new(input);
            assert_eq!(
                reader.read_coord_body(Dims::default()).unwrap_err().kind(),
                ErrorKind::CorruptData,
                "{input}"
            );
        }
    }

    #[test]
    fn wrong_keyword() {
        let mut reader = WktReader::new("POLYGON EMPTY");
        assert_eq!(
            reader.read_tagged(GeometryType::Point).unwrap_err().kind(),
            ErrorKind::CorruptData
        );
    }

    #[test]
    fn remaining_input() {
        let mut reader = WktReader::new("EMPTY tail");
        assert!(reader.read_empty_or_open().unwrap());
        assert_eq!(reader.remaining(), " tail");
    }
}
