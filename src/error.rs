//! Error types for geodecode library

use thiserror::Error;

/// Fatal decode failure.
///
/// Any of these aborts the decode call; no partial file is returned.
/// Recoverable defects are reported through
/// [`NotificationCollection`](crate::notification::NotificationCollection)
/// instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// A read would run past the end of the buffer
    #[error("Out of bounds: {requested} byte(s) requested at offset {offset}, buffer length is {length}")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        length: usize,
    },

    /// A byte-level read was issued while bits of the current byte were pending
    #[error("Misaligned read at offset {offset}: {bit_offset} bit(s) of the current byte already consumed")]
    Misaligned { offset: usize, bit_offset: u8 },

    /// Unknown dBase version byte
    #[error("Invalid dBase version {found:#04X} at offset {offset}")]
    InvalidVersion { offset: usize, found: u8 },

    /// Unknown dBase field type code
    #[error("Invalid type code {code:?} for field {field:?} at offset {offset}")]
    InvalidFieldType {
        field: String,
        code: char,
        offset: usize,
    },

    /// Shapefile file code mismatch
    #[error("Invalid file code: expected {expected}, got {found}")]
    InvalidFileCode { expected: i32, found: i32 },

    /// Declared or actual file length below the format minimum
    #[error("Invalid file length: expected at least {minimum} bytes, got {found}")]
    InvalidFileLength { minimum: usize, found: usize },

    /// Shape type code outside the known set
    #[error("Invalid shape type {found} at offset {offset}")]
    InvalidShapeType { offset: usize, found: i32 },

    /// File signature mismatch
    #[error("Invalid file signature: expected {expected:?}, got {found:?}")]
    InvalidSignature { expected: String, found: String },

    /// LAS version without a known header layout
    #[error("Unsupported LAS version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    /// LAS point data format outside 0..=10
    #[error("Unsupported point data format {found} at offset {offset}")]
    UnsupportedPointFormat { offset: usize, found: u8 },

    /// Structurally invalid content
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
}

/// Result type alias for geodecode operations
pub type Result<T> = std::result::Result<T, DecodeError>;
