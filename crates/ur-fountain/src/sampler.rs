//! Weighted sampling with Vose's alias method.

use crate::error::SamplerError;
use crate::xoshiro::Xoshiro256;

/// Draws indices with probability proportional to their weight.
#[derive(Clone, Debug)]
pub struct RandomSampler {
    probs: Vec<f64>,
    aliases: Vec<usize>,
}

impl RandomSampler {
    /// Build the alias tables for `weights`.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError` if `weights` is empty, holds a negative or NaN
    /// entry, or does not sum to a positive finite total.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(weights: &[f64]) -> Result<Self, SamplerError> {
        if weights.is_empty() {
            return Err(SamplerError::NoWeights);
        }
        if let Some(index) = weights.iter().position(|w| w.is_nan() || *w < 0.0) {
            return Err(SamplerError::InvalidWeight { index });
        }
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(SamplerError::ZeroTotal);
        }

        let n = weights.len();
        let mut scaled: Vec<f64> = weights.iter().map(|w| w * n as f64 / sum).collect();

        let mut small = Vec::new();
        let mut large = Vec::new();
        for (j, p) in scaled.iter().enumerate().rev() {
            if *p < 1.0 {
                small.push(j);
            } else {
                large.push(j);
            }
        }

        let mut probs = vec![0.0; n];
        let mut aliases = vec![0; n];

        while let (Some(&a), Some(&g)) = (small.last(), large.last()) {
            small.pop();
            large.pop();
            probs[a] = scaled[a];
            aliases[a] = g;
            scaled[g] += scaled[a] - 1.0;
            if scaled[g] < 1.0 {
                small.push(g);
            } else {
                large.push(g);
            }
        }
        // leftovers are full columns up to rounding
        for j in large.into_iter().chain(small) {
            probs[j] = 1.0;
        }

        Ok(Self { probs, aliases })
    }

    /// Number of weighted outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Always false; a sampler holds at least one outcome.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Draw one index, consuming two doubles from `rng`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn next(&self, rng: &mut Xoshiro256) -> usize {
        let r1 = rng.next_double();
        let r2 = rng.next_double();
        let n = self.probs.len();
        let i = ((n as f64 * r1) as usize).min(n - 1);
        if r2 < self.probs[i] { i } else { self.aliases[i] }
    }
}
