//! Error types for frame reassembly and payload decoding

use thiserror::Error;

/// Errors that can occur while parsing protocol data
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Chunk does not start with the frame magic
    #[error("bad frame magic: 0x{0:02X}")]
    BadMagic(u8),

    /// Header names a message kind this device does not know
    #[error("unknown message kind: 0x{0:02X}")]
    UnknownKind(u8),

    /// Declared payload length is above the configured maximum
    #[error("payload too large: declared {declared} bytes, max {max}")]
    PayloadTooLarge { declared: usize, max: usize },

    /// Payload ended before a field was complete
    #[error("truncated payload: need {needed} more bytes")]
    Truncated { needed: usize },

    /// String field is not valid UTF-8
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    /// Enumerated field holds a code outside its range
    #[error("invalid {field} code: {code}")]
    InvalidCode { field: &'static str, code: u8 },

    /// Bytes remain after the last field of a payload
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),

    /// Message kind is valid but not expected in this direction
    #[error("unexpected message kind: {0}")]
    UnexpectedKind(&'static str),
}
