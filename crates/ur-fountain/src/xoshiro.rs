//! Deterministic xoshiro256** generator seeded through SHA-256.
//!
//! Encoder and decoder derive identical streams from the same seed, so every
//! arithmetic step here is part of the wire contract.

use sha2::{Digest, Sha256};

use crate::crc::crc32_bytes;

/// 2^64 as a double.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// xoshiro256** state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Xoshiro256 {
    s: [u64; 4],
}

impl Xoshiro256 {
    /// Seed from the SHA-256 digest of `seed`, read as four big-endian words.
    #[must_use]
    pub fn from_seed_bytes(seed: &[u8]) -> Self {
        let digest = Sha256::digest(seed);
        let mut s = [0_u64; 4];
        for (word, chunk) in s.iter_mut().zip(digest.chunks_exact(8)) {
            let mut bytes = [0_u8; 8];
            bytes.copy_from_slice(chunk);
            *word = u64::from_be_bytes(bytes);
        }
        Self { s }
    }

    /// Seed from the UTF-8 bytes of `seed`.
    #[must_use]
    pub fn from_str_seed(seed: &str) -> Self {
        Self::from_seed_bytes(seed.as_bytes())
    }

    /// Seed from the big-endian CRC-32 of `seed`.
    #[must_use]
    pub fn from_crc_seed(seed: &[u8]) -> Self {
        Self::from_seed_bytes(&crc32_bytes(seed))
    }

    /// Next raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        let s = &mut self.s;
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 17;

        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];

        s[2] ^= t;
        s[3] = s[3].rotate_left(45);

        result
    }

    /// Uniform double in `[0, 1]`; the upper bound is reachable through rounding.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_double(&mut self) -> f64 {
        self.next_u64() as f64 / TWO_POW_64
    }

    /// Uniform integer in `low..=high`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn next_int(&mut self, low: u64, high: u64) -> u64 {
        let span = (high - low).saturating_add(1) as f64;
        let offset = (self.next_double() * span).floor() as u64;
        // a draw of exactly 1.0 would land one past `high`
        (low + offset).min(high)
    }

    /// Uniform byte.
    #[allow(clippy::cast_possible_truncation)] // bounded by 255
    pub fn next_byte(&mut self) -> u8 {
        self.next_int(0, 255) as u8
    }

    /// `len` uniform bytes.
    pub fn next_data(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next_byte()).collect()
    }

    /// Shuffle by repeatedly removing a uniformly chosen remaining element.
    pub fn shuffled<T>(&mut self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        let len = slots.len();
        self.shuffled_indexes(len, len)
            .into_iter()
            .filter_map(|i| slots.get_mut(i).and_then(Option::take))
            .collect()
    }

    /// The first `count` positions of [`Xoshiro256::shuffled`] over `0..len`.
    ///
    /// Draws exactly as the full shuffle does for those positions, in
    /// `O(len + count·log len)` instead of quadratic time.
    #[allow(clippy::cast_possible_truncation)] // rank < remaining <= len
    pub fn shuffled_indexes(&mut self, len: usize, count: usize) -> Vec<usize> {
        let count = count.min(len);
        let mut remaining = RemainingSet::full(len);
        let mut out = Vec::with_capacity(count);
        for left in (len - count + 1..=len).rev() {
            let rank = self.next_int(0, left as u64 - 1) as usize;
            out.push(remaining.take_nth(rank));
        }
        out
    }
}

/// Fenwick tree over `0..len` answering "the n-th position still present".
struct RemainingSet {
    tree: Vec<usize>,
    top: usize,
}

impl RemainingSet {
    fn full(len: usize) -> Self {
        let mut tree = vec![0; len + 1];
        for i in 1..=len {
            tree[i] += 1;
            let parent = i + (i & i.wrapping_neg());
            if parent <= len {
                tree[parent] += tree[i];
            }
        }
        let top = if len == 0 {
            0
        } else {
            1 << (usize::BITS - 1 - len.leading_zeros())
        };
        Self { tree, top }
    }

    /// Remove and return the position of rank `rank` (zero-based).
    fn take_nth(&mut self, rank: usize) -> usize {
        let mut pos = 0;
        let mut rest = rank;
        let mut step = self.top;
        while step > 0 {
            let next = pos + step;
            if next < self.tree.len() && self.tree[next] <= rest {
                pos = next;
                rest -= self.tree[next];
            }
            step >>= 1;
        }
        let mut i = pos + 1;
        while i < self.tree.len() {
            self.tree[i] -= 1;
            i += i & i.wrapping_neg();
        }
        pos
    }
}
