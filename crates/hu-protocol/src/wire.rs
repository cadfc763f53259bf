//! Payload field encoding
//!
//! Every field inside a payload is either a fixed-width little-endian integer
//! or a length-prefixed string. Nothing is delimiter-separated, so any byte
//! value may appear inside a name.
//!
//! # Field Format
//! ```text
//! u8      1 byte
//! u16     2 bytes, little-endian
//! string  [len: u8] [utf-8 bytes; len]
//! ```

use tracing::warn;

use crate::error::ParseError;

/// Longest string a single field can carry
pub const MAX_STRING_LEN: usize = u8::MAX as usize;

/// Cut `s` to at most `max` bytes without splitting a UTF-8 sequence
pub fn truncate_to_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Appends payload fields to a byte buffer
#[derive(Debug, Default)]
pub struct PayloadWriter {
    buf: Vec<u8>,
}

impl PayloadWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Write a length-prefixed string, truncating anything past 255 bytes
    pub fn put_str(&mut self, value: &str) {
        let field = truncate_to_boundary(value, MAX_STRING_LEN);
        if field.len() < value.len() {
            warn!(
                "String field truncated from {} to {} bytes",
                value.len(),
                field.len()
            );
        }
        // field.len() <= 255 after truncation
        self.buf.push(field.len() as u8);
        self.buf.extend_from_slice(field.as_bytes());
    }

    /// Consume the writer and return the payload bytes
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads payload fields from a complete payload
#[derive(Debug)]
pub struct PayloadReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ParseError> {
        if self.remaining() < len {
            return Err(ParseError::Truncated {
                needed: len - self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, ParseError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Any non-zero byte reads as `true`
    pub fn bool(&mut self) -> Result<bool, ParseError> {
        Ok(self.u8()? != 0)
    }

    pub fn string(&mut self) -> Result<String, ParseError> {
        let len = self.u8()? as usize;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ParseError::InvalidUtf8)
    }

    /// Fail if any bytes are left over
    pub fn finish(self) -> Result<(), ParseError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(ParseError::TrailingBytes(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_with_delimiter_like_bytes() {
        let mut w = PayloadWriter::new();
        w.put_str("AC;DC\0|\n");
        w.put_u16(0xBEEF);

        let payload = w.finish();
        let mut r = PayloadReader::new(&payload);
        assert_eq!(r.string().unwrap(), "AC;DC\0|\n");
        assert_eq!(r.u16().unwrap(), 0xBEEF);
        r.finish().unwrap();
    }

    #[test]
    fn test_truncated_string_field() {
        // Declares 10 bytes, only 3 present
        let payload = [10u8, b'a', b'b', b'c'];
        let mut r = PayloadReader::new(&payload);
        assert_eq!(r.string(), Err(ParseError::Truncated { needed: 7 }));
    }

    #[test]
    fn test_invalid_utf8() {
        let payload = [2u8, 0xC3, 0x28];
        let mut r = PayloadReader::new(&payload);
        assert_eq!(r.string(), Err(ParseError::InvalidUtf8));
    }

    #[test]
    fn test_trailing_bytes() {
        let payload = [1u8, 2, 3];
        let mut r = PayloadReader::new(&payload);
        r.u8().unwrap();
        assert_eq!(r.finish(), Err(ParseError::TrailingBytes(2)));
    }

    #[test]
    fn test_long_string_truncated_on_char_boundary() {
        // 'é' is two bytes; 200 of them is 400 bytes
        let long = "é".repeat(200);
        let mut w = PayloadWriter::new();
        w.put_str(&long);

        let payload = w.finish();
        assert_eq!(payload[0], 254);
        let mut r = PayloadReader::new(&payload);
        let s = r.string().unwrap();
        assert_eq!(s.chars().count(), 127);
    }

    #[test]
    fn test_truncate_to_boundary() {
        assert_eq!(truncate_to_boundary("hello", 10), "hello");
        assert_eq!(truncate_to_boundary("hello", 3), "hel");
        assert_eq!(truncate_to_boundary("aé", 2), "a");
    }
}
