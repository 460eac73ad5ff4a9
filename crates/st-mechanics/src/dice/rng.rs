//! PRNG-backed die source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::DieSource;

/// Rolls dice using any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngDieSource<R: Rng = StdRng> {
    rng: R,
}

impl RngDieSource<StdRng> {
    /// A die source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// A reproducible die source for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RngDieSource<R> {
    /// Wrap an existing RNG.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RngDieSource<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> DieSource for RngDieSource<R> {
    fn roll(&mut self, count: u32, faces: u32) -> Vec<u32> {
        let faces = faces.max(1);
        (0..count)
            .map(|_| self.rng.random_range(1..=faces))
            .collect()
    }
}
