//! Deterministic simulation RNG.
//!
//! The simulator runs one agent on one thread, so a single `SmallRng` seeded
//! from `SimConfig::seed` drives every random draw: engagement durations and
//! exponential reactivation intervals.  Fixing the seed reproduces a run
//! exactly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform sample in `[min, max)`; returns `min` for an empty range.
    #[inline]
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max > min {
            self.0.gen_range(min..max)
        } else {
            min
        }
    }

    /// Sample an exponential inter-arrival time with the given `rate`
    /// (inverse CDF).  A non-positive rate never fires: returns infinity.
    pub fn exponential(&mut self, rate: f64) -> f64 {
        if rate.is_nan() || rate <= 0.0 {
            return f64::INFINITY;
        }
        // u ∈ [0, 1) so 1 - u ∈ (0, 1] and the logarithm stays finite.
        let u: f64 = self.0.r#gen();
        -(1.0 - u).ln() / rate
    }
}
