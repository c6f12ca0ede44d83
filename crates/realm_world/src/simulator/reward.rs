//! Reward sampling for opened chests.
//!
//! Samples come from any `rand_core::RngCore`. Sessions default to the
//! operating system generator; anything trust-sensitive must swap in a
//! verifiable randomness source, since nothing here can be audited after the
//! fact.

use rand_core::{impls, Error as RandError, RngCore};
use serde::{Deserialize, Serialize};

use super::types::{DEFAULT_REWARD_MAX, DEFAULT_REWARD_MIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardRange {
    pub min: u64,
    pub max: u64,
}

impl Default for RewardRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_REWARD_MIN,
            max: DEFAULT_REWARD_MAX,
        }
    }
}

impl RewardRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Rewards must stay positive and the bounds ordered.
    pub fn sanitized(mut self) -> Self {
        self.min = self.min.max(1);
        if self.max < self.min {
            std::mem::swap(&mut self.min, &mut self.max);
            self.min = self.min.max(1);
        }
        self
    }

    pub fn contains(&self, amount: u64) -> bool {
        (self.min..=self.max).contains(&amount)
    }
}

/// Uniform integer in `[10, 50]`.
pub fn sample_reward<R: RngCore + ?Sized>(rng: &mut R) -> u64 {
    sample_reward_in(rng, RewardRange::default())
}

/// Uniform integer in `range`, by rejection so every value is equally likely.
pub fn sample_reward_in<R: RngCore + ?Sized>(rng: &mut R, range: RewardRange) -> u64 {
    let range = range.sanitized();
    // min >= 1 after sanitizing, so the span cannot wrap to zero.
    let span = range.max - range.min + 1;
    let zone = u64::MAX - (u64::MAX % span);
    loop {
        let value = rng.next_u64();
        if value < zone {
            return range.min + value % span;
        }
    }
}

/// Deterministic 64-bit LCG. Reproducible worlds and tests only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let val = (self.next_u64() >> 11) as f64;
        val / ((1u64 << 53) as f64)
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}
