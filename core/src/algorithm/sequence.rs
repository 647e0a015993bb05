//! Seeded linear-congruential number stream
//!
//! Every random decision the generator makes is drawn from a
//! `DeterministicSequence` owned by the caller and passed down explicitly.
//! The recurrence uses fixed constants and integer arithmetic only, so a
//! given seed yields the same stream on every run and every platform.
//!
//! `state' = (state * 9301 + 49297) mod 233280`, `next() = state' / 233280`

use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// Reproducible pseudo-random stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicSequence {
    state: u64,
}

impl DeterministicSequence {
    /// Starts the stream at `seed mod 233280`. Seeds that agree modulo
    /// 233280 produce the same stream, so `s` and `s + 233280` generate
    /// identical questions.
    pub fn new(seed: u32) -> Self {
        Self {
            state: u64::from(seed) % MODULUS,
        }
    }

    /// Current internal state, for diagnostics
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advances the stream and returns a real in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Uniform integer in `[min, max]` (inclusive). Swapped bounds are reordered.
    pub fn range(&mut self, min: u64, max: u64) -> u64 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        let span = (high - low + 1) as f64;
        let offset = (self.next() * span).floor() as u64;
        // next() < 1 keeps offset <= high - low; min() guards float rounding
        low + offset.min(high - low)
    }

    /// Uniformly picks one element; `None` for an empty slice.
    pub fn choice<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        if options.is_empty() {
            return None;
        }
        let index = (self.next() * options.len() as f64).floor() as usize;
        options.get(index.min(options.len() - 1))
    }
}
