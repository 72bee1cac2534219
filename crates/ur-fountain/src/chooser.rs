//! Deterministic choice of the fragments mixed into each part.
//!
//! Parts `1..=seq_len` carry one fragment each in order. Later parts draw a
//! degree from a soliton-like distribution and XOR that many fragments,
//! seeded by the sequence number and message checksum so that the decoder
//! can recompute the set from the part header alone.

use std::collections::BTreeSet;

use crate::error::SamplerError;
use crate::sampler::RandomSampler;
use crate::xoshiro::Xoshiro256;

/// Fragment chooser for one message.
///
/// Caches the degree sampler, which depends only on `seq_len`.
#[derive(Clone, Debug)]
pub struct FragmentChooser {
    seq_len: usize,
    checksum: u32,
    sampler: RandomSampler,
}

impl FragmentChooser {
    /// Chooser for a message of `seq_len` fragments with the given checksum.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::NoWeights` if `seq_len` is zero.
    pub fn new(seq_len: usize, checksum: u32) -> Result<Self, SamplerError> {
        let sampler = RandomSampler::new(&degree_weights(seq_len))?;
        Ok(Self {
            seq_len,
            checksum,
            sampler,
        })
    }

    /// Fragment count.
    #[must_use]
    pub const fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Message checksum used in the seed.
    #[must_use]
    pub const fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Zero-based fragment indexes combined into part `seq_num`.
    pub fn choose(&self, seq_num: u32) -> BTreeSet<usize> {
        if seq_num as usize <= self.seq_len {
            return BTreeSet::from([(seq_num as usize).saturating_sub(1)]);
        }

        let mut seed = [0_u8; 8];
        seed[..4].copy_from_slice(&seq_num.to_be_bytes());
        seed[4..].copy_from_slice(&self.checksum.to_be_bytes());
        let mut rng = Xoshiro256::from_seed_bytes(&seed);

        let degree = self.sampler.next(&mut rng) + 1;
        rng.shuffled_indexes(self.seq_len, degree)
            .into_iter()
            .collect()
    }
}

/// Weight `1/k` for degree `k` in `1..=seq_len`.
#[allow(clippy::cast_precision_loss)]
fn degree_weights(seq_len: usize) -> Vec<f64> {
    (1..=seq_len).map(|k| 1.0 / k as f64).collect()
}

/// One-shot form of [`FragmentChooser::choose`].
///
/// Returns an empty set when `seq_len` is zero.
pub fn choose_fragments(seq_num: u32, seq_len: usize, checksum: u32) -> BTreeSet<usize> {
    FragmentChooser::new(seq_len, checksum)
        .map(|chooser| chooser.choose(seq_num))
        .unwrap_or_default()
}
