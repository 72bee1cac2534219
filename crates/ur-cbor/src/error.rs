//! Codec error types.

use thiserror::Error;

/// Errors raised while decoding CBOR bytes or extracting typed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended in the middle of an item.
    #[error("unfinished sequence")]
    UnfinishedSequence,

    /// An indefinite-length string contained a chunk of a different type,
    /// or a date tag wrapped a non-numeric value.
    #[error("wrong type inside sequence")]
    WrongTypeInsideSequence,

    /// A declared length exceeds the addressable range.
    #[error("sequence too long: {len} exceeds addressable range")]
    TooLongSequence {
        /// The declared length.
        len: u64,
    },

    /// A text string was not valid UTF-8.
    #[error("incorrect UTF-8 string")]
    IncorrectUtf8String,

    /// Typed extraction requested a different variant.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Requested kind.
        expected: &'static str,
        /// Actual kind.
        found: &'static str,
    },

    /// Narrowing conversion overflowed the target type.
    #[error("value out of range")]
    ValueOutOfRange,

    /// Map keys were not in ascending order of their encodings.
    #[error("map keys out of order")]
    KeysOutOfOrder,

    /// A map contained the same key twice.
    #[error("duplicate map key")]
    DuplicateKey,

    /// The initial byte is reserved or unassigned.
    #[error("invalid header byte 0x{0:02x}")]
    InvalidHeader(u8),

    /// Bytes remained after the top-level item.
    #[error("trailing bytes after CBOR value")]
    TrailingBytes,

    /// Nesting exceeded the configured depth.
    #[error("nesting depth limit {limit} exceeded")]
    DepthLimitExceeded {
        /// Configured maximum depth.
        limit: usize,
    },
}

/// Errors raised while encoding a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Half-precision floats decode but never encode.
    #[error("half-precision floats cannot be encoded")]
    UnsupportedHalfFloat,

    /// Simple values 20..=31 alias booleans, null, undefined or are
    /// unassigned, so they have no well-formed encoding of their own.
    #[error("simple value {0} is reserved")]
    ReservedSimpleValue(u8),

    /// A break only terminates an indefinite-length item.
    #[error("break outside an indefinite-length item")]
    StrayBreak,
}
