//! Fountain configuration.

use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

/// Fountain encoder and decoder settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FountainConfig {
    /// Largest fragment the encoder may produce.
    ///
    /// Default: 200
    pub max_fragment_len: usize,

    /// Smallest fragment the encoder prefers; bounds the fragment count.
    ///
    /// Default: 10
    pub min_fragment_len: usize,

    /// Sequence number before the first emitted part.
    ///
    /// Default: 0
    pub first_seq_num: u32,

    /// Largest message the encoder accepts and the decoder will reassemble.
    ///
    /// Default: 64MB
    pub max_message_len: usize,

    /// Largest fragment count a decoder accepts.
    ///
    /// Default: 65536
    pub max_seq_len: usize,
}

impl Default for FountainConfig {
    fn default() -> Self {
        Self {
            max_fragment_len: 200,
            min_fragment_len: 10,
            first_seq_num: 0,
            max_message_len: 64 * 1024 * 1024, // 64MB
            max_seq_len: 65_536,
        }
    }
}

impl FountainConfig {
    /// Set the fragment length bounds.
    #[must_use]
    pub const fn with_fragment_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_fragment_len = min;
        self.max_fragment_len = max;
        self
    }

    /// Set the sequence number preceding the first part.
    #[must_use]
    pub const fn with_first_seq_num(mut self, first_seq_num: u32) -> Self {
        self.first_seq_num = first_seq_num;
        self
    }

    /// Set the message size limit.
    #[must_use]
    pub const fn with_max_message_len(mut self, max_message_len: usize) -> Self {
        self.max_message_len = max_message_len;
        self
    }

    /// Set the fragment count limit.
    #[must_use]
    pub const fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Check the fragment bounds.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::InvalidFragmentBounds` if `min_fragment_len` is
    /// zero or larger than `max_fragment_len`.
    pub const fn validate(&self) -> Result<(), EncodeError> {
        if self.min_fragment_len == 0 || self.max_fragment_len < self.min_fragment_len {
            return Err(EncodeError::InvalidFragmentBounds {
                min: self.min_fragment_len,
                max: self.max_fragment_len,
            });
        }
        Ok(())
    }
}
