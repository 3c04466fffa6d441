//! Clarity estimation
//!
//! No real clarity metric exists yet. Every estimator here produces a
//! placeholder value in `[70, 100)`; the deterministic variants exist so
//! tests and reproducible runs can pin it.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lowest clarity value an estimator may report
pub const CLARITY_MIN: u8 = 70;
/// Exclusive upper bound for clarity values
pub const CLARITY_MAX: u8 = 100;

/// Source of the clarity dimension
pub trait ClarityEstimator: Send + Sync {
    /// Estimate clarity for a response; implementations should stay in `[70, 100)`
    fn estimate(&self, text: &str) -> u8;
}

/// Clamp an estimate into the clarity range
pub fn clamp_clarity(value: u8) -> u8 {
    value.clamp(CLARITY_MIN, CLARITY_MAX - 1)
}

/// Uniformly random clarity from the thread RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomClarity;

impl ClarityEstimator for RandomClarity {
    fn estimate(&self, _text: &str) -> u8 {
        rand::thread_rng().gen_range(CLARITY_MIN..CLARITY_MAX)
    }
}

/// Reproducible clarity sequence from a fixed seed
#[derive(Debug)]
pub struct SeededClarity {
    rng: Mutex<StdRng>,
}

impl SeededClarity {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ClarityEstimator for SeededClarity {
    fn estimate(&self, _text: &str) -> u8 {
        self.rng.lock().gen_range(CLARITY_MIN..CLARITY_MAX)
    }
}

/// Constant clarity, clamped into range
#[derive(Debug, Clone, Copy)]
pub struct FixedClarity(pub u8);

impl ClarityEstimator for FixedClarity {
    fn estimate(&self, _text: &str) -> u8 {
        clamp_clarity(self.0)
    }
}
