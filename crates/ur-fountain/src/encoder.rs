//! Fountain encoder.

use std::collections::BTreeSet;

use crate::chooser::FragmentChooser;
use crate::config::FountainConfig;
use crate::crc::crc32;
use crate::error::EncodeError;
use crate::fragment::{fragment_length, partition_message, xor_into};
use crate::part::Part;

/// Produces an unbounded stream of parts for one message.
///
/// The first `seq_len` parts carry the fragments in order; every later part
/// is a XOR of a pseudo-randomly chosen fragment subset.
#[derive(Clone, Debug)]
pub struct FountainEncoder {
    message_len: usize,
    checksum: u32,
    fragment_len: usize,
    fragments: Vec<Vec<u8>>,
    chooser: FragmentChooser,
    seq_num: u32,
    last_part_indexes: BTreeSet<usize>,
}

impl FountainEncoder {
    /// Create an encoder with explicit fragment bounds.
    ///
    /// # Errors
    ///
    /// See [`FountainEncoder::with_config`].
    pub fn new(
        message: &[u8],
        max_fragment_len: usize,
        min_fragment_len: usize,
        first_seq_num: u32,
    ) -> Result<Self, EncodeError> {
        let config = FountainConfig::default()
            .with_fragment_bounds(min_fragment_len, max_fragment_len)
            .with_first_seq_num(first_seq_num);
        Self::with_config(message, &config)
    }

    /// Create an encoder from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::InvalidFragmentBounds` for unusable bounds.
    /// Returns `EncodeError::EmptyMessage` if `message` is empty.
    /// Returns `EncodeError::MessageTooLarge` if `message` exceeds the
    /// configured maximum or does not fit the 32-bit length field.
    pub fn with_config(message: &[u8], config: &FountainConfig) -> Result<Self, EncodeError> {
        config.validate()?;

        if message.is_empty() {
            return Err(EncodeError::EmptyMessage);
        }

        let max = config
            .max_message_len
            .min(usize::try_from(u32::MAX).unwrap_or(usize::MAX));
        if message.len() > max {
            return Err(EncodeError::MessageTooLarge {
                size: message.len(),
                max,
            });
        }

        let fragment_len = fragment_length(
            message.len(),
            config.min_fragment_len,
            config.max_fragment_len,
        );
        let fragments = partition_message(message, fragment_len);
        let checksum = crc32(message);
        // a non-empty message always has at least one fragment
        let chooser = FragmentChooser::new(fragments.len(), checksum)
            .map_err(|_| EncodeError::EmptyMessage)?;

        tracing::debug!(
            message_len = message.len(),
            fragment_len,
            seq_len = fragments.len(),
            checksum,
            "Fountain encoder ready"
        );

        Ok(Self {
            message_len: message.len(),
            checksum,
            fragment_len,
            fragments,
            chooser,
            seq_num: config.first_seq_num,
            last_part_indexes: BTreeSet::new(),
        })
    }

    /// Emit the next part.
    ///
    /// The sequence number wraps at `u32::MAX` and skips zero.
    pub fn next_part(&mut self) -> Part {
        self.seq_num = self.seq_num.wrapping_add(1);
        if self.seq_num == 0 {
            self.seq_num = 1;
        }

        let indexes = self.chooser.choose(self.seq_num);
        let mut data = vec![0_u8; self.fragment_len];
        for &index in &indexes {
            xor_into(&mut data, &self.fragments[index]);
        }

        tracing::trace!(
            seq_num = self.seq_num,
            degree = indexes.len(),
            "Emitting fountain part"
        );
        self.last_part_indexes = indexes;

        Part::new(
            self.seq_num,
            self.fragments.len(),
            self.message_len,
            self.checksum,
            data,
        )
    }

    /// Sequence number of the last emitted part.
    #[must_use]
    pub const fn seq_num(&self) -> u32 {
        self.seq_num
    }

    /// Number of fragments.
    #[must_use]
    pub fn seq_len(&self) -> usize {
        self.fragments.len()
    }

    /// Length of every fragment.
    #[must_use]
    pub const fn fragment_len(&self) -> usize {
        self.fragment_len
    }

    /// Unpadded message length.
    #[must_use]
    pub const fn message_len(&self) -> usize {
        self.message_len
    }

    /// CRC-32 of the message.
    #[must_use]
    pub const fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Fragment indexes mixed into the last emitted part.
    #[must_use]
    pub const fn last_part_indexes(&self) -> &BTreeSet<usize> {
        &self.last_part_indexes
    }

    /// True once every fragment has been emitted on its own at least once.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.seq_num as usize >= self.fragments.len()
    }

    /// True if the message fits in a single fragment.
    #[must_use]
    pub fn is_single_part(&self) -> bool {
        self.fragments.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xoshiro::Xoshiro256;

    fn wolf_message(len: usize) -> Vec<u8> {
        Xoshiro256::from_str_seed("Wolf").next_data(len)
    }

    #[test]
    fn rejects_empty_message() {
        assert_eq!(
            FountainEncoder::new(&[], 30, 10, 0).unwrap_err(),
            EncodeError::EmptyMessage
        );
    }

    #[test]
    fn rejects_bad_bounds() {
        assert!(matches!(
            FountainEncoder::new(b"abc", 5, 10, 0),
            Err(EncodeError::InvalidFragmentBounds { min: 10, max: 5 })
        ));
        assert!(FountainEncoder::new(b"abc", 5, 0, 0).is_err());
    }

    #[test]
    fn rejects_oversized_message() {
        let config = FountainConfig::default().with_max_message_len(8);
        assert_eq!(
            FountainEncoder::with_config(&[1; 9], &config).unwrap_err(),
            EncodeError::MessageTooLarge { size: 9, max: 8 }
        );
    }

    #[test]
    fn shape_of_wolf_message() {
        let message = wolf_message(256);
        let encoder = FountainEncoder::new(&message, 30, 10, 0).unwrap();
        assert_eq!(encoder.fragment_len(), 29);
        assert_eq!(encoder.seq_len(), 9);
        assert_eq!(encoder.checksum(), 23_570_951);
        assert_eq!(encoder.message_len(), 256);
        assert!(!encoder.is_single_part());
    }

    #[test]
    fn completes_after_seq_len_parts() {
        let message = wolf_message(256);
        let mut encoder = FountainEncoder::new(&message, 30, 10, 0).unwrap();
        for n in 1..=9_u32 {
            assert!(!encoder.is_complete());
            let part = encoder.next_part();
            assert_eq!(part.seq_num(), n);
            assert_eq!(encoder.last_part_indexes(), &BTreeSet::from([n as usize - 1]));
        }
        assert!(encoder.is_complete());
    }

    #[test]
    fn single_part_message() {
        let mut encoder = FountainEncoder::new(b"hello", 200, 10, 0).unwrap();
        assert!(encoder.is_single_part());
        let part = encoder.next_part();
        assert_eq!(part.data(), b"hello");
        assert_eq!(part.seq_id(), "1-1");
        assert!(encoder.is_complete());
    }

    #[test]
    fn sequence_number_wraps_past_zero() {
        let mut encoder = FountainEncoder::new(b"hello world", 4, 2, u32::MAX - 1).unwrap();
        assert_eq!(encoder.next_part().seq_num(), u32::MAX);
        assert_eq!(encoder.next_part().seq_num(), 1);
        assert_eq!(encoder.next_part().seq_num(), 2);
    }

    #[test]
    fn first_seq_num_offsets_stream() {
        let message = wolf_message(100);
        let mut a = FountainEncoder::new(&message, 20, 10, 0).unwrap();
        let mut b = FountainEncoder::new(&message, 20, 10, 10).unwrap();
        let from_a: Vec<Part> = (0..20).map(|_| a.next_part()).skip(10).collect();
        let from_b: Vec<Part> = (0..10).map(|_| b.next_part()).collect();
        assert_eq!(from_a, from_b);
    }
}
