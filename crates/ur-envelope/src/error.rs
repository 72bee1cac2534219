//! Envelope error types.

use thiserror::Error;

/// Bytewords decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytewordsError {
    /// A word is not in the list.
    #[error("invalid bytewords word")]
    InvalidWord,

    /// The trailing CRC-32 is missing or does not match.
    #[error("invalid bytewords checksum")]
    InvalidChecksum,

    /// Minimal text must have an even number of letters.
    #[error("invalid bytewords length")]
    InvalidLength,
}

/// UR parsing, encoding and decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrError {
    /// The string does not start with `ur:`.
    #[error("invalid UR scheme")]
    InvalidScheme,

    /// The type is empty or has characters outside `[a-z0-9-]`.
    #[error("invalid UR type")]
    InvalidType,

    /// No `/` separates the type from the body.
    #[error("UR type unspecified")]
    TypeUnspecified,

    /// The `seq_num-seq_len` component is malformed.
    #[error("invalid UR sequence component")]
    InvalidSequenceComponent,

    /// Wrong number of path components.
    #[error("invalid UR path length")]
    InvalidPathLength,

    /// A part of a different type arrived mid-session.
    #[error("unexpected UR type: expected {expected}, found {found}")]
    UnexpectedType {
        /// Type fixed by the first part.
        expected: String,
        /// Type of the offending part.
        found: String,
    },

    /// Body transcription failed.
    #[error(transparent)]
    Bytewords(#[from] BytewordsError),

    /// Multipart body is not a valid fountain part.
    #[error(transparent)]
    Part(#[from] ur_fountain::PartError),

    /// Payload is not valid CBOR.
    #[error("UR payload: {0}")]
    Cbor(#[from] ur_cbor::DecodeError),

    /// Payload value could not be encoded.
    #[error("UR payload: {0}")]
    Encode(#[from] ur_cbor::EncodeError),

    /// Fountain encoder could not be built.
    #[error(transparent)]
    FountainEncode(#[from] ur_fountain::EncodeError),

    /// Fountain reassembly failed.
    #[error(transparent)]
    Fountain(#[from] ur_fountain::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(BytewordsError::InvalidWord.to_string(), "invalid bytewords word");
        assert_eq!(UrError::InvalidScheme.to_string(), "invalid UR scheme");
        let err = UrError::UnexpectedType {
            expected: "bytes".into(),
            found: "seed".into(),
        };
        assert_eq!(err.to_string(), "unexpected UR type: expected bytes, found seed");
    }

    #[test]
    fn wraps_lower_layers() {
        let err = UrError::from(BytewordsError::InvalidChecksum);
        assert_eq!(err.to_string(), "invalid bytewords checksum");
        let err = UrError::from(ur_fountain::DecodeError::InvalidChecksum {
            expected: 1,
            actual: 2,
        });
        assert!(matches!(err, UrError::Fountain(_)));
        let err = UrError::from(ur_cbor::DecodeError::TrailingBytes);
        assert_eq!(err.to_string(), "UR payload: trailing bytes after CBOR value");
    }
}
