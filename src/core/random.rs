//! Injectable randomness
//!
//! Every random draw in the simulation and the learner goes through
//! [`RandomSource`], so a harness can substitute a seeded generator or a
//! scripted stub and assert exact trajectories.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform float in `[0, 1)`
    fn next_f32(&mut self) -> f32;

    /// Uniform float in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[lo, hi]`; returns `lo` when `hi < lo`
    fn range_i32(&mut self, lo: i32, hi: i32) -> i32;

    /// Uniform index in `[0, len)`; returns 0 for an empty range
    fn index(&mut self, len: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
    fn next_f32(&mut self) -> f32 {
        self.gen::<f32>()
    }

    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.gen_range(lo..=hi)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.gen_range(0..len)
    }
}

/// Deterministic default source
pub fn seeded(seed: u64) -> Box<dyn RandomSource> {
    Box::new(ChaCha8Rng::seed_from_u64(seed))
}
