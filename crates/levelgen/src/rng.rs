//! Seeded random source consumed by every generation stage.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub trait RandomSource {
    /// Integer in `[lo, hi)`. An empty range yields `lo`.
    fn next_int(&mut self, lo: usize, hi: usize) -> usize;

    /// Real number in `[0, 1)`.
    fn next_real(&mut self) -> f64;
}

#[derive(Clone, Debug)]
pub struct LevelRng {
    rng: ChaCha8Rng,
}

impl LevelRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl RandomSource for LevelRng {
    fn next_int(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        let range_size = (hi - lo) as u64;
        lo + (self.rng.next_u64() % range_size) as usize
    }

    fn next_real(&mut self) -> f64 {
        // 53 high bits fill the f64 mantissa exactly.
        (self.rng.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }
}
