//! Monte Carlo estimates from simulated pool rolls.

use crate::dice::DieSource;
use crate::pool::{RollOptions, evaluate_pool};

/// Tallies from simulating one configuration many times.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    /// Rolls simulated.
    pub rolls: u64,
    /// Rolls reaching the target.
    pub hits: u64,
    /// Rolls reaching one less than the target.
    pub hits_below: u64,
    /// Rolls with no net success (botches included).
    pub failures: u64,
    /// Rolls that botched.
    pub botches: u64,
}

impl Tally {
    /// `count` as a fraction of all rolls.
    pub fn frequency(&self, count: u64) -> f64 {
        if self.rolls == 0 {
            0.0
        } else {
            count as f64 / self.rolls as f64
        }
    }
}

/// Simulate `iterations` rolls without Willpower.
///
/// Willpower is modelled by the caller as one less needed success, so the
/// tally also counts rolls reaching `target - 1`.
pub fn simulate(
    pool: i32,
    difficulty: i32,
    target: i32,
    specialty: bool,
    iterations: u64,
    dice: &mut impl DieSource,
) -> Tally {
    let options = RollOptions::new(pool, difficulty).with_double_tens(specialty);
    let mut tally = Tally::default();

    for _ in 0..iterations {
        let Ok(result) = evaluate_pool(&options, dice) else {
            break;
        };
        let net = result.net_successes;
        tally.rolls += 1;
        if net >= target {
            tally.hits += 1;
        }
        if net >= target - 1 {
            tally.hits_below += 1;
        }
        if net <= 0 {
            tally.failures += 1;
        }
        if net < 0 {
            tally.botches += 1;
        }
    }

    tally
}
