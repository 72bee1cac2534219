//! Fountain error types.

use thiserror::Error;

/// Fountain encode errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Empty message cannot be encoded.
    #[error("cannot encode empty message")]
    EmptyMessage,

    /// Fragment length bounds are unusable.
    #[error("invalid fragment bounds: min {min}, max {max}")]
    InvalidFragmentBounds {
        /// Minimum fragment length.
        min: usize,
        /// Maximum fragment length.
        max: usize,
    },

    /// Message exceeds the configured maximum.
    #[error("message too large: {size} bytes exceeds maximum {max} bytes")]
    MessageTooLarge {
        /// Actual message size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },
}

/// Fountain decode errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A part was rejected before processing.
    #[error("invalid part: {reason}")]
    InvalidPart {
        /// Why the part was rejected.
        reason: RejectReason,
    },

    /// The reassembled message does not match the announced checksum.
    #[error("invalid checksum: expected {expected:#010x}, got {actual:#010x}")]
    InvalidChecksum {
        /// Checksum carried by the parts.
        expected: u32,
        /// Checksum of the reassembled message.
        actual: u32,
    },
}

/// Why a decoder refused a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Sequence numbers start at 1.
    #[error("sequence number is zero")]
    ZeroSeqNum,

    /// A message has at least one fragment.
    #[error("sequence length is zero")]
    ZeroSeqLen,

    /// Fragment data is empty.
    #[error("fragment is empty")]
    EmptyFragment,

    /// Declared fragment count exceeds the decoder limit.
    #[error("sequence length {seq_len} exceeds limit {limit}")]
    SeqLenTooLarge {
        /// Declared fragment count.
        seq_len: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Declared message length exceeds the decoder limit.
    #[error("message length {message_len} exceeds limit {limit}")]
    MessageTooLarge {
        /// Declared message length.
        message_len: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Declared message cannot fit in the declared fragments.
    #[error("message length {message_len} does not fit {seq_len} fragments of {fragment_len} bytes")]
    MessageLenInconsistent {
        /// Declared message length.
        message_len: usize,
        /// Declared fragment count.
        seq_len: usize,
        /// Fragment length of the part.
        fragment_len: usize,
    },

    /// Fragment count differs from the session.
    #[error("sequence length mismatch: expected {expected}, got {got}")]
    SeqLenMismatch {
        /// Session value.
        expected: usize,
        /// Part value.
        got: usize,
    },

    /// Message length differs from the session.
    #[error("message length mismatch: expected {expected}, got {got}")]
    MessageLenMismatch {
        /// Session value.
        expected: usize,
        /// Part value.
        got: usize,
    },

    /// Checksum differs from the session.
    #[error("checksum mismatch: expected {expected:#010x}, got {got:#010x}")]
    ChecksumMismatch {
        /// Session value.
        expected: u32,
        /// Part value.
        got: u32,
    },

    /// Fragment length differs from the session.
    #[error("fragment length mismatch: expected {expected}, got {got}")]
    FragmentLenMismatch {
        /// Session value.
        expected: usize,
        /// Part value.
        got: usize,
    },
}

/// Errors converting a part to or from its wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartError {
    /// The bytes are not well-formed CBOR.
    #[error("part is not valid CBOR: {0}")]
    Cbor(#[from] ur_cbor::DecodeError),

    /// The CBOR value does not have the shape of a part.
    #[error("invalid part header: {reason}")]
    InvalidPartHeader {
        /// What is wrong with the header.
        reason: &'static str,
    },

    /// The part could not be encoded.
    #[error("part encoding failed: {0}")]
    Encode(#[from] ur_cbor::EncodeError),
}

/// Errors building a weighted sampler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    /// No weights were given.
    #[error("sampler needs at least one weight")]
    NoWeights,

    /// A weight was negative or not a number.
    #[error("weight at index {index} is negative or NaN")]
    InvalidWeight {
        /// Position of the bad weight.
        index: usize,
    },

    /// Weights sum to zero or overflow.
    #[error("weights must have a positive finite sum")]
    ZeroTotal,
}
