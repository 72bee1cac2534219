//! UR string encoder.

use std::collections::BTreeSet;

use ur_fountain::{FountainConfig, FountainEncoder};

use crate::error::UrError;
use crate::transcribe::{Bytewords, Transcriber};
use crate::ur::Ur;
use crate::uri::UrFrame;

/// Emits a UR as one string or as an endless multipart stream.
///
/// Bodies are transcribed with `T`, minimal bytewords by default.
#[derive(Clone, Debug)]
pub struct UrEncoder<T = Bytewords> {
    ur: Ur,
    fountain: FountainEncoder,
    transcriber: T,
}

impl UrEncoder {
    /// Single-part string for `ur`.
    #[must_use]
    pub fn encode(ur: &Ur) -> String {
        Self::encode_with(ur, &Bytewords::default())
    }

    /// Multipart encoder with explicit fragment bounds.
    ///
    /// # Errors
    ///
    /// Returns `UrError::FountainEncode` if the payload is empty or the
    /// bounds are unusable.
    pub fn new(
        ur: Ur,
        max_fragment_len: usize,
        min_fragment_len: usize,
        first_seq_num: u32,
    ) -> Result<Self, UrError> {
        let fountain =
            FountainEncoder::new(ur.cbor(), max_fragment_len, min_fragment_len, first_seq_num)?;
        Ok(Self {
            ur,
            fountain,
            transcriber: Bytewords::default(),
        })
    }

    /// Multipart encoder from a fountain configuration.
    ///
    /// # Errors
    ///
    /// Returns `UrError::FountainEncode` if the payload is empty, too large,
    /// or the bounds are unusable.
    pub fn with_config(ur: Ur, config: &FountainConfig) -> Result<Self, UrError> {
        Self::with_transcriber(ur, config, Bytewords::default())
    }
}

impl<T: Transcriber> UrEncoder<T> {
    /// Single-part string for `ur` with bodies transcribed by `transcriber`.
    #[must_use]
    pub fn encode_with(ur: &Ur, transcriber: &T) -> String {
        UrFrame::single(ur.ur_type(), transcriber.encode(ur.cbor())).to_string()
    }

    /// Multipart encoder with a custom body transcription.
    ///
    /// # Errors
    ///
    /// Returns `UrError::FountainEncode` if the payload is empty, too large,
    /// or the bounds are unusable.
    pub fn with_transcriber(
        ur: Ur,
        config: &FountainConfig,
        transcriber: T,
    ) -> Result<Self, UrError> {
        let fountain = FountainEncoder::with_config(ur.cbor(), config)?;
        Ok(Self {
            ur,
            fountain,
            transcriber,
        })
    }

    /// Next part string.
    ///
    /// A single-part UR yields the same single-part string every time.
    ///
    /// # Errors
    ///
    /// Returns `UrError::Part` if the fountain part cannot be encoded.
    pub fn next_part(&mut self) -> Result<String, UrError> {
        let part = self.fountain.next_part();
        if self.is_single_part() {
            return Ok(Self::encode_with(&self.ur, &self.transcriber));
        }
        let body = self.transcriber.encode(&part.to_cbor()?);
        Ok(UrFrame::multi(self.ur.ur_type(), part.seq_num(), part.seq_len(), body).to_string())
    }

    /// The UR being encoded.
    #[must_use]
    pub const fn ur(&self) -> &Ur {
        &self.ur
    }

    /// Body transcription in use.
    #[must_use]
    pub const fn transcriber(&self) -> &T {
        &self.transcriber
    }

    /// True once each fragment has been emitted on its own.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fountain.is_complete()
    }

    /// True if the payload fits in one fragment.
    #[must_use]
    pub fn is_single_part(&self) -> bool {
        self.fountain.is_single_part()
    }

    /// Sequence number of the last emitted part.
    #[must_use]
    pub const fn seq_num(&self) -> u32 {
        self.fountain.seq_num()
    }

    /// Number of fragments.
    #[must_use]
    pub fn seq_len(&self) -> usize {
        self.fountain.seq_len()
    }

    /// Fragment indexes mixed into the last emitted part.
    #[must_use]
    pub const fn last_part_indexes(&self) -> &BTreeSet<usize> {
        self.fountain.last_part_indexes()
    }
}
