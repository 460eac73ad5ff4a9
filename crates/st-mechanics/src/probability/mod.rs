//! Roll outcome probabilities.
//!
//! [`ProbabilityEstimator`] answers "how likely is this pool to reach the
//! target?" for a `(pool, difficulty, target)` triple, with and without a
//! specialty and Willpower. Results are a pure function of the inputs and
//! are computed at most once per estimator.

pub mod exact;
pub mod monte_carlo;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use serde::{Deserialize, Serialize};

use crate::dice::RngDieSource;
use crate::error::RollError;
use crate::pool::options::{MAX_DIFFICULTY, MAX_POOL, MIN_DIFFICULTY, MIN_POOL};

/// Simulated rolls per Monte Carlo estimate unless configured otherwise.
pub const DEFAULT_ITERATIONS: u64 = 1_000_000;

/// Outcome statistics for one `(pool, difficulty, target)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityRecord {
    /// Expected net successes.
    pub avg_successes: f64,
    /// Expected net successes when tens count double.
    pub avg_successes_with_specialty: f64,
    /// Chance of reaching the target.
    pub prob_success: f64,
    /// Chance of reaching the target with Willpower.
    pub prob_success_with_willpower: f64,
    /// Chance of reaching the target with a specialty.
    pub prob_success_with_specialty: f64,
    /// Chance of reaching the target with a specialty and Willpower.
    pub prob_success_with_specialty_and_willpower: f64,
    /// Chance of no net success at all (botches included).
    pub prob_failure: f64,
    /// Chance of no net success with a specialty.
    pub prob_failure_with_specialty: f64,
    /// Chance of a botch.
    pub prob_botch: f64,
}

/// How probabilities are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Estimation {
    /// Exact multinomial enumeration.
    #[default]
    Exact,
    /// Empirical frequencies from simulated rolls.
    MonteCarlo {
        /// Rolls simulated per configuration.
        iterations: u64,
        /// Base seed; each triple derives its own stream from it.
        seed: u64,
    },
}

type Key = (i32, i32, i32);

/// A memoizing probability calculator.
///
/// Safe to share between threads. Concurrent requests for the same triple
/// wait for a single computation.
#[derive(Debug, Default)]
pub struct ProbabilityEstimator {
    strategy: Estimation,
    cache: Mutex<HashMap<Key, Arc<OnceLock<ProbabilityRecord>>>>,
}

impl ProbabilityEstimator {
    /// An estimator using exact combinatorics.
    pub fn new() -> Self {
        Self::with_strategy(Estimation::Exact)
    }

    /// An estimator using Monte Carlo simulation.
    pub fn monte_carlo(iterations: u64, seed: u64) -> Self {
        Self::with_strategy(Estimation::MonteCarlo { iterations, seed })
    }

    /// An estimator using the given strategy.
    pub fn with_strategy(strategy: Estimation) -> Self {
        Self {
            strategy,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The strategy in use.
    pub fn strategy(&self) -> Estimation {
        self.strategy
    }

    /// Number of triples computed so far.
    pub fn cached(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Statistics for rolling `pool` dice at `difficulty` needing `target`
    /// successes.
    ///
    /// A Monte Carlo estimator with zero iterations fails with
    /// [`RollError::NoIterations`].
    pub fn get(
        &self,
        pool: i32,
        difficulty: i32,
        target: i32,
    ) -> Result<ProbabilityRecord, RollError> {
        if let Estimation::MonteCarlo { iterations: 0, .. } = self.strategy {
            return Err(RollError::NoIterations);
        }
        validate(pool, difficulty, target)?;

        let slot = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cache.entry((pool, difficulty, target)).or_default())
        };
        Ok(*slot.get_or_init(|| compute(self.strategy, pool, difficulty, target)))
    }
}

/// Check that a triple is in range.
pub fn validate(pool: i32, difficulty: i32, target: i32) -> Result<(), RollError> {
    if !(MIN_POOL..=MAX_POOL).contains(&pool) {
        return Err(RollError::PoolOutOfRange(pool));
    }
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        return Err(RollError::DifficultyOutOfRange(difficulty));
    }
    let max = pool * 2;
    if !(1..=max).contains(&target) {
        return Err(RollError::TargetOutOfRange { target, max });
    }
    Ok(())
}

/// Expected net successes without and with a specialty.
pub fn average_successes(pool: i32, difficulty: i32) -> (f64, f64) {
    let pool = f64::from(pool);
    let with_specialty = pool * f64::from(11 - difficulty) / 10.0;
    (with_specialty - pool * 0.1, with_specialty)
}

/// Compute a record without caching. Inputs must already be validated.
fn compute(strategy: Estimation, pool: i32, difficulty: i32, target: i32) -> ProbabilityRecord {
    let (avg_successes, avg_successes_with_specialty) = average_successes(pool, difficulty);

    match strategy {
        Estimation::Exact => {
            let pool = pool.unsigned_abs();
            let difficulty = difficulty.unsigned_abs();
            let p = |target: i32, specialty: bool| {
                exact::success_probability(pool, difficulty, target, specialty)
            };
            ProbabilityRecord {
                avg_successes,
                avg_successes_with_specialty,
                prob_success: p(target, false),
                prob_success_with_willpower: p(target - 1, false),
                prob_success_with_specialty: p(target, true),
                prob_success_with_specialty_and_willpower: p(target - 1, true),
                prob_failure: 1.0 - p(1, false),
                prob_failure_with_specialty: 1.0 - p(1, true),
                prob_botch: exact::botch_probability(pool, difficulty),
            }
        }
        Estimation::MonteCarlo { iterations, seed } => {
            let stream = (u64::from(pool.unsigned_abs()) << 32)
                | (u64::from(difficulty.unsigned_abs()) << 16)
                | u64::from(target.unsigned_abs());
            let mut dice = RngDieSource::seeded(seed ^ stream);

            let mut simulate = |specialty| {
                monte_carlo::simulate(pool, difficulty, target, specialty, iterations, &mut dice)
            };
            let plain = simulate(false);
            let spec = simulate(true);
            let with_willpower = |tally: &monte_carlo::Tally| {
                if target > 1 {
                    tally.frequency(tally.hits_below)
                } else {
                    1.0
                }
            };

            ProbabilityRecord {
                avg_successes,
                avg_successes_with_specialty,
                prob_success: plain.frequency(plain.hits),
                prob_success_with_willpower: with_willpower(&plain),
                prob_success_with_specialty: spec.frequency(spec.hits),
                prob_success_with_specialty_and_willpower: with_willpower(&spec),
                prob_failure: plain.frequency(plain.failures),
                prob_failure_with_specialty: spec.frequency(spec.failures),
                prob_botch: plain.frequency(plain.botches),
            }
        }
    }
}
