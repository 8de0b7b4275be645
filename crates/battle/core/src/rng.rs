//! Deterministic, resumable random source.
//!
//! Each draw is a pure function of `(seed, cursor)`: the cursor is mixed into
//! the seed, run through one PCG step and permuted. Persisting the cursor next
//! to the seed is all it takes to continue the exact same stream after a
//! battle is suspended and rehydrated.
//!
//! # Determinism
//!
//! Given the same seed and cursor, every method returns the same values and
//! advances the cursor by the same amount. Helpers that have nothing to pick
//! between (one candidate, zero variance) do not consume a draw.

use serde::{Deserialize, Serialize};

/// Counter-based PCG stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRng {
    seed: u64,
    cursor: u64,
}

impl BattleRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a stream positioned at `cursor` draws after the start.
    pub const fn new(seed: u64, cursor: u64) -> Self {
        Self { seed, cursor }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws consumed since the stream started.
    pub const fn cursor(&self) -> u64 {
        self.cursor
    }

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG-XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Returns the next raw 32-bit value and advances the cursor.
    pub fn next_u32(&mut self) -> u32 {
        let state = mix_seed(self.seed, self.cursor);
        self.cursor = self.cursor.wrapping_add(1);
        Self::pcg_output(Self::pcg_step(state))
    }

    /// Uniform value in `[0, upper)`. Returns 0 without drawing when `upper <= 1`.
    pub fn below(&mut self, upper: u32) -> u32 {
        if upper <= 1 {
            return 0;
        }
        self.next_u32() % upper
    }

    /// Uniform index into a collection of `len` items.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        match len {
            0 => None,
            _ => {
                let upper = u32::try_from(len).unwrap_or(u32::MAX);
                Some(self.below(upper) as usize)
            }
        }
    }

    /// Index chosen with probability proportional to `weights[i]`.
    ///
    /// Returns `None` when the slice is empty or every weight is zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }
        if weights.len() == 1 {
            return Some(0);
        }
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        let mut roll = self.below(total);
        for (index, &weight) in weights.iter().enumerate() {
            if roll < weight {
                return Some(index);
            }
            roll -= weight;
        }
        weights.iter().rposition(|&w| w > 0)
    }

    /// Damage variance factor in permille, uniform in `[1000 - 10·pct, 1000 + 10·pct]`.
    pub fn variance_permille(&mut self, pct: u32) -> u32 {
        if pct == 0 {
            return 1000;
        }
        let spread = pct.min(99) * 10;
        1000 - spread + self.below(spread * 2 + 1)
    }
}

/// Mix the root seed with a draw index (SplitMix64-style combiner + avalanche).
fn mix_seed(seed: u64, cursor: u64) -> u64 {
    let mut hash = seed;
    hash ^= cursor.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
