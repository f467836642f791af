//! Seeded pseudo-random source
//!
//! Every draw in the engine flows through [`SeededRng`]. A generator is keyed by
//! an arbitrary string, so the match seed, the rule-resolution stream and each
//! player's stream are derived by formatting distinct strings.

#[cfg(test)]
mod property_tests;

use crate::error::{ForgeError, Result};
use rand::RngCore;

const FOLD_BASIS: u32 = 0xdead_beef;
const FOLD_MULTIPLIER: u32 = 2_654_435_761;
const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const STATE_SPAN: f64 = 4_294_967_296.0;

/// Fold a seed string into the initial 32-bit generator state.
///
/// Each UTF-16 code unit perturbs the accumulator in order, then a final
/// xor-shift mixes the high bits down.
pub fn fold_seed(seed: &str) -> u32 {
    let mut hash = FOLD_BASIS;
    for unit in seed.encode_utf16() {
        hash = (hash ^ u32::from(unit)).wrapping_mul(FOLD_MULTIPLIER);
    }
    hash ^ (hash >> 16)
}

/// Deterministic linear-congruential generator keyed by a string seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        Self {
            state: fold_seed(seed),
        }
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Advance the state and return a float in `[0, 1)`
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.step()) / STATE_SPAN
    }

    /// Uniform index in `0..len`; `len` must be non-zero
    #[inline]
    fn index_below(&mut self, len: usize) -> usize {
        let index = (self.next_f64() * len as f64) as usize;
        index.min(len - 1)
    }

    /// Uniform choice over a non-empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T> {
        if items.is_empty() {
            return Err(ForgeError::EmptyPool("uniform pick"));
        }
        Ok(&items[self.index_below(items.len())])
    }

    /// Index drawn proportionally to `weights`.
    ///
    /// Negative weights count as zero. When every weight is zero the draw falls
    /// back to a uniform choice. A draw landing exactly on a cumulative boundary
    /// resolves to the earlier item.
    pub fn pick_weighted_index(&mut self, weights: &[f64]) -> Result<usize> {
        if weights.is_empty() {
            return Err(ForgeError::EmptyPool("weighted pick"));
        }

        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if !(total > 0.0) {
            return Ok(self.index_below(weights.len()));
        }

        let mut remaining = self.next_f64() * total;
        let mut last_positive = 0;
        for (i, &weight) in weights.iter().enumerate() {
            if !(weight > 0.0) {
                continue;
            }
            last_positive = i;
            remaining -= weight;
            if remaining <= 0.0 {
                return Ok(i);
            }
        }

        // Rounding can leave a sliver past the final boundary
        Ok(last_positive)
    }

    /// Element drawn proportionally to the parallel `weights` slice
    pub fn pick_weighted<'a, T>(&mut self, items: &'a [T], weights: &[f64]) -> Result<&'a T> {
        debug_assert_eq!(items.len(), weights.len());
        let len = items.len().min(weights.len());
        let index = self.pick_weighted_index(&weights[..len])?;
        Ok(&items[index])
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.step());
        let low = u64::from(self.step());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
