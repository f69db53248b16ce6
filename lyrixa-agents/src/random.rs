//! Injected randomness.
//!
//! Every random decision in the scaffold (workload draws, template choice,
//! spontaneous pairing) goes through a [`RandomSource`] so that tests can
//! replay exact sequences.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of uniform random values.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. Callers guarantee `len > 0`.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Pick one element uniformly, or `None` for an empty slice.
/// An empty slice consumes no randomness.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.next_index(items.len()).min(items.len() - 1);
    items.get(idx)
}

// ============================================================================
// SEEDED (PRODUCTION) SOURCE
// ============================================================================

/// `StdRng`-backed source. Deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len.max(1))
    }
}

// ============================================================================
// SCRIPTED (TEST) SOURCE
// ============================================================================

/// Replays a fixed queue of draws, then repeats `fallback` forever.
///
/// `next_index` consumes one scripted draw and scales it to the range, so a
/// single script drives both kinds of decision.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    script: VecDeque<f64>,
    fallback: f64,
    draws: usize,
}

impl ScriptedRandom {
    pub fn new(script: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: 0.0,
            draws: 0,
        }
    }

    /// Source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(std::iter::empty()).with_fallback(value)
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        let value = self.script.pop_front().unwrap_or(self.fallback);
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }

    fn next_index(&mut self, len: usize) -> usize {
        let len = len.max(1);
        let scaled = (self.next_f64() * len as f64) as usize;
        scaled.min(len - 1)
    }
}
