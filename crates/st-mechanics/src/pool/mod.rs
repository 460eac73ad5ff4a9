//! World of Darkness dice pools.
//!
//! A pool roll throws a number of d10s against a difficulty. Each die at or
//! above the difficulty is a success, each one cancels a success, and a roll
//! with ones but no successes botches. Chronicles of Darkness rolls use the
//! same machinery with exploding ("X-again") dice.

pub mod options;
pub mod result;

pub use options::{FaceKind, RollOptions};
pub use result::{PoolVerdict, RollResult};

use crate::dice::{D10, DieSource};
use crate::error::RollError;

/// Validate the options, roll the pool, and score it.
///
/// Nothing is rolled if validation fails.
pub fn evaluate_pool(
    options: &RollOptions,
    dice: &mut impl DieSource,
) -> Result<RollResult, RollError> {
    options.validate()?;

    let thrown = options.dice_to_roll().unsigned_abs();
    let mut faces = dice.roll(thrown, D10);
    let mut exploded = Vec::new();

    if options.explodes() {
        let target = options.explosion_target.unsigned_abs();
        for &face in &faces {
            let mut last = face;
            while last >= target {
                last = dice.roll_one(D10);
                exploded.push(last);
            }
        }
    }

    let explosion_count = exploded.len() as u32;
    faces.extend(exploded);
    Ok(RollResult::score(options, faces, explosion_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{RngDieSource, ScriptedDice};
    use proptest::prelude::*;

    #[test]
    fn success_scenario() {
        let mut dice = ScriptedDice::new([9, 7, 3, 2, 1]);
        let result = evaluate_pool(&RollOptions::new(5, 6), &mut dice).unwrap();
        assert_eq!(result.dice, vec![9, 7, 3, 2, 1]);
        assert_eq!(result.explosion_count, 0);
        assert_eq!(result.net_successes, 1);
    }

    #[test]
    fn botch_scenario() {
        let mut dice = ScriptedDice::new([1, 1, 2]);
        let result = evaluate_pool(&RollOptions::new(3, 6), &mut dice).unwrap();
        assert_eq!(result.dice, vec![2, 1, 1]);
        assert_eq!(result.net_successes, -2);
        assert_eq!(result.verdict(), PoolVerdict::Botch(2));
    }

    #[test]
    fn invalid_options_roll_nothing() {
        let mut dice = ScriptedDice::new([5]);
        assert_eq!(
            evaluate_pool(&RollOptions::new(0, 6), &mut dice),
            Err(RollError::PoolOutOfRange(0))
        );
        assert_eq!(
            evaluate_pool(&RollOptions::new(3, 12), &mut dice),
            Err(RollError::DifficultyOutOfRange(12))
        );
        assert_eq!(dice.drawn(), 0);
    }

    #[test]
    fn explosions_chain() {
        // Initial faces 10, 4; the 10 explodes into 10, which explodes into 3.
        let mut dice = ScriptedDice::new([10, 4, 10, 3]);
        let options = RollOptions::new(2, 6).with_explosion_target(10);
        let result = evaluate_pool(&options, &mut dice).unwrap();
        assert_eq!(result.dice, vec![10, 10, 4, 3]);
        assert_eq!(result.explosion_count, 2);
        assert_eq!(result.net_successes, 2);
    }

    #[test]
    fn chronicles_eight_again() {
        let mut dice = ScriptedDice::new([8, 9, 2, 5, 1, 7]);
        let options = RollOptions::chronicles(3, 8, 8);
        let result = evaluate_pool(&options, &mut dice).unwrap();
        // 8 -> 5, 9 -> 1, 2 stays.
        assert_eq!(result.dice, vec![9, 8, 5, 2, 1]);
        assert_eq!(result.explosion_count, 2);
        assert_eq!(result.net_successes, 1);
    }

    #[test]
    fn chronicles_willpower_rolls_three_more() {
        let mut dice = ScriptedDice::new([2]);
        let options = RollOptions::chronicles(2, 8, 10).with_willpower(true);
        let result = evaluate_pool(&options, &mut dice).unwrap();
        assert_eq!(result.count(), 5);
        assert_eq!(dice.drawn(), 5);
    }

    #[test]
    fn chronicles_willpower_can_still_botch() {
        let mut dice = ScriptedDice::new([1, 3, 4, 2, 2, 2]);
        let options = RollOptions::chronicles(3, 8, 10).with_willpower(true);
        let result = evaluate_pool(&options, &mut dice).unwrap();
        assert_eq!(result.dice, vec![4, 3, 2, 2, 2, 1]);
        assert_eq!(result.net_successes, -1);
        assert!(result.is_botch());
    }

    #[test]
    fn chance_die() {
        let chance = RollOptions::chance();
        let roll = |face: u32| {
            let mut dice = ScriptedDice::new([face, 10]);
            let result = evaluate_pool(&chance, &mut dice).unwrap();
            assert_eq!(dice.drawn(), 1);
            result.verdict()
        };
        assert_eq!(roll(10), PoolVerdict::Successes(1));
        assert_eq!(roll(9), PoolVerdict::Failure);
        assert_eq!(roll(1), PoolVerdict::Botch(1));
    }

    #[test]
    fn roll_order_keeps_explosions_last() {
        let mut dice = ScriptedDice::new([10, 4, 3]);
        let options = RollOptions::new(2, 6)
            .with_explosion_target(10)
            .with_roll_order(true);
        let result = evaluate_pool(&options, &mut dice).unwrap();
        assert_eq!(result.dice, vec![10, 4, 3]);
    }

    fn classic_options() -> impl Strategy<Value = RollOptions> {
        (
            1i32..=100,
            2i32..=10,
            -3i32..=3,
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(
                |(pool, diff, autos, wp, explode, double, never, ignore, cancel)| {
                    RollOptions::new(pool, diff)
                        .with_auto_successes(autos)
                        .with_willpower(wp)
                        .with_explosion_target(if explode { 10 } else { 11 })
                        .with_double_tens(double)
                        .with_never_botch(never)
                        .with_ignore_ones(ignore)
                        .with_willpower_cancelable(cancel)
                },
            )
    }

    proptest! {
        #[test]
        fn pool_bounds_are_enforced(pool in prop_oneof![-50i32..1, 101i32..500]) {
            let mut dice = ScriptedDice::new([10]);
            prop_assert_eq!(
                evaluate_pool(&RollOptions::new(pool, 6), &mut dice),
                Err(RollError::PoolOutOfRange(pool))
            );
            prop_assert_eq!(dice.drawn(), 0);
        }

        #[test]
        fn botches_only_without_protection(options in classic_options(), seed in any::<u64>()) {
            let mut dice = RngDieSource::seeded(seed);
            let result = evaluate_pool(&options, &mut dice).unwrap();
            if result.net_successes < 0 {
                prop_assert!(!options.use_willpower);
                prop_assert!(!options.never_botch);
                prop_assert!(options.auto_successes <= 0);
                prop_assert!(result.dice.iter().all(|&d| (d as i32) < options.difficulty));
                prop_assert!(result.dice.contains(&1) || options.auto_successes < 0);
            }
        }

        #[test]
        fn willpower_floor(options in classic_options(), seed in any::<u64>()) {
            let options = options.with_willpower(true).with_willpower_cancelable(false);
            let mut dice = RngDieSource::seeded(seed);
            let result = evaluate_pool(&options, &mut dice).unwrap();
            prop_assert!(result.net_successes >= 1);
        }

        #[test]
        fn explosions_only_add_dice(options in classic_options(), seed in any::<u64>()) {
            let mut dice = RngDieSource::seeded(seed);
            let result = evaluate_pool(&options, &mut dice).unwrap();
            let pool = options.pool as usize;
            prop_assert_eq!(result.dice.len(), pool + result.explosion_count as usize);
            prop_assert_eq!(result.dice.len() == pool, result.explosion_count == 0);
            prop_assert!(result.dice.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
