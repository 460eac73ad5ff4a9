//! Per-roll configuration for pool rolls.

use serde::{Deserialize, Serialize};

use crate::error::RollError;

/// Smallest legal dice pool.
pub const MIN_POOL: i32 = 1;
/// Largest legal dice pool.
pub const MAX_POOL: i32 = 100;
/// Lowest legal difficulty.
pub const MIN_DIFFICULTY: i32 = 2;
/// Highest legal difficulty (and highest face on a d10).
pub const MAX_DIFFICULTY: i32 = 10;
/// An explosion target no d10 can reach.
pub const NO_EXPLOSIONS: i32 = 11;
/// Extra dice a Chronicles of Darkness Willpower spend adds to the pool.
pub const CHRONICLES_WILLPOWER_DICE: i32 = 3;

/// How a single die face counts toward the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceKind {
    /// At or above difficulty: one success.
    Success,
    /// A ten with doubling in effect: two successes.
    DoubleSuccess,
    /// Below difficulty, no further effect.
    Failure,
    /// A one that cancels a success or causes a botch.
    One,
}

/// Everything a single pool roll needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOptions {
    /// Number of dice to roll (1..=100).
    pub pool: i32,
    /// Minimum face counted as a success.
    pub difficulty: i32,
    /// Guaranteed successes (positive) or failures (negative).
    pub auto_successes: i32,
    /// Whether Willpower was spent.
    pub use_willpower: bool,
    /// Chronicles of Darkness rules instead of classic World of Darkness.
    pub chronicles_mode: bool,
    /// Faces at or above this explode; [`NO_EXPLOSIONS`] disables explosions.
    pub explosion_target: i32,
    /// Whether a natural ten counts as two successes.
    pub double_tens: bool,
    /// Whether botches are impossible.
    pub never_botch: bool,
    /// Whether ones stop cancelling successes (only with `never_botch`).
    pub ignore_ones: bool,
    /// Whether ones may cancel the Willpower success.
    pub willpower_cancelable: bool,
    /// Keep dice in the order they were rolled instead of highest first.
    #[serde(default)]
    pub keep_roll_order: bool,
}

impl RollOptions {
    /// A classic World of Darkness roll with no modifiers.
    pub fn new(pool: i32, difficulty: i32) -> Self {
        Self {
            pool,
            difficulty,
            auto_successes: 0,
            use_willpower: false,
            chronicles_mode: false,
            explosion_target: NO_EXPLOSIONS,
            double_tens: false,
            never_botch: false,
            ignore_ones: false,
            willpower_cancelable: false,
            keep_roll_order: false,
        }
    }

    /// A chance die: one d10 at difficulty 10 under classic rules.
    ///
    /// Only a 10 succeeds and a 1 botches; nothing explodes or doubles.
    pub fn chance() -> Self {
        Self::new(1, MAX_DIFFICULTY)
    }

    /// A Chronicles of Darkness roll exploding at `explosion_target` ("X-again").
    pub fn chronicles(pool: i32, difficulty: i32, explosion_target: i32) -> Self {
        Self {
            chronicles_mode: true,
            explosion_target,
            ..Self::new(pool, difficulty)
        }
    }

    /// Set the automatic successes (negative for automatic failures).
    pub fn with_auto_successes(mut self, autos: i32) -> Self {
        self.auto_successes = autos;
        self
    }

    /// Spend Willpower on the roll.
    pub fn with_willpower(mut self, willpower: bool) -> Self {
        self.use_willpower = willpower;
        self
    }

    /// Set the face at which dice explode.
    pub fn with_explosion_target(mut self, target: i32) -> Self {
        self.explosion_target = target;
        self
    }

    /// Count natural tens as two successes.
    pub fn with_double_tens(mut self, double: bool) -> Self {
        self.double_tens = double;
        self
    }

    /// Make botches impossible.
    pub fn with_never_botch(mut self, never: bool) -> Self {
        self.never_botch = never;
        self
    }

    /// Stop ones from subtracting successes (requires `never_botch`).
    pub fn with_ignore_ones(mut self, ignore: bool) -> Self {
        self.ignore_ones = ignore;
        self
    }

    /// Allow ones to cancel the Willpower success.
    pub fn with_willpower_cancelable(mut self, cancelable: bool) -> Self {
        self.willpower_cancelable = cancelable;
        self
    }

    /// Keep dice in roll order.
    pub fn with_roll_order(mut self, keep: bool) -> Self {
        self.keep_roll_order = keep;
        self
    }

    /// Check every range constraint. Called before any die is rolled.
    pub fn validate(&self) -> Result<(), RollError> {
        if !(MIN_POOL..=MAX_POOL).contains(&self.pool) {
            return Err(RollError::PoolOutOfRange(self.pool));
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(RollError::DifficultyOutOfRange(self.difficulty));
        }

        let reachable = self.explosion_target <= MAX_DIFFICULTY;
        if (self.chronicles_mode || reachable)
            && !(self.difficulty..=MAX_DIFFICULTY).contains(&self.explosion_target)
        {
            return Err(RollError::InvalidExplosionTarget {
                target: self.explosion_target,
                difficulty: self.difficulty,
            });
        }
        Ok(())
    }

    /// Whether any face can explode.
    pub fn explodes(&self) -> bool {
        self.explosion_target <= MAX_DIFFICULTY
    }

    /// Dice actually thrown, including the Chronicles Willpower bonus.
    pub fn dice_to_roll(&self) -> i32 {
        if self.chronicles_mode && self.use_willpower {
            self.pool + CHRONICLES_WILLPOWER_DICE
        } else {
            self.pool
        }
    }

    /// Whether Willpower grants a flat success (classic rules only).
    pub fn grants_willpower_success(&self) -> bool {
        self.use_willpower && !self.chronicles_mode
    }

    /// Whether ones count against the roll.
    pub fn counts_ones(&self) -> bool {
        !(self.ignore_ones && self.never_botch)
    }

    /// Classify a single face under these options.
    pub fn classify(&self, face: u32) -> FaceKind {
        let value = face as i32;
        if value >= self.difficulty {
            if face == 10 && self.double_tens {
                FaceKind::DoubleSuccess
            } else {
                FaceKind::Success
            }
        } else if face == 1 && self.counts_ones() {
            FaceKind::One
        } else {
            FaceKind::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = RollOptions::new(5, 6);
        assert_eq!(options.auto_successes, 0);
        assert_eq!(options.explosion_target, NO_EXPLOSIONS);
        assert!(!options.explodes());
        assert!(!options.use_willpower);
        assert!(options.counts_ones());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn builder_chain() {
        let options = RollOptions::new(7, 8)
            .with_auto_successes(-2)
            .with_willpower(true)
            .with_explosion_target(10)
            .with_double_tens(true)
            .with_never_botch(true)
            .with_ignore_ones(true)
            .with_willpower_cancelable(true);
        assert_eq!(options.auto_successes, -2);
        assert!(options.grants_willpower_success());
        assert!(options.explodes());
        assert!(!options.counts_ones());
        assert!(options.willpower_cancelable);
    }

    #[test]
    fn ignore_ones_requires_never_botch() {
        let options = RollOptions::new(5, 6).with_ignore_ones(true);
        assert!(options.counts_ones());
    }

    #[test]
    fn pool_bounds() {
        assert_eq!(
            RollOptions::new(0, 6).validate(),
            Err(RollError::PoolOutOfRange(0))
        );
        assert_eq!(
            RollOptions::new(101, 6).validate(),
            Err(RollError::PoolOutOfRange(101))
        );
        assert!(RollOptions::new(100, 6).validate().is_ok());
        assert!(RollOptions::new(1, 6).validate().is_ok());
    }

    #[test]
    fn difficulty_bounds() {
        assert_eq!(
            RollOptions::new(5, 1).validate(),
            Err(RollError::DifficultyOutOfRange(1))
        );
        assert_eq!(
            RollOptions::new(5, 11).validate(),
            Err(RollError::DifficultyOutOfRange(11))
        );
        assert!(RollOptions::new(5, 2).validate().is_ok());
        assert!(RollOptions::new(5, 10).validate().is_ok());
    }

    #[test]
    fn chronicles_explosion_target_bounds() {
        assert!(RollOptions::chronicles(5, 8, 8).validate().is_ok());
        assert!(RollOptions::chronicles(5, 8, 10).validate().is_ok());
        assert_eq!(
            RollOptions::chronicles(5, 8, 7).validate(),
            Err(RollError::InvalidExplosionTarget {
                target: 7,
                difficulty: 8
            })
        );
        assert_eq!(
            RollOptions::chronicles(5, 8, 11).validate(),
            Err(RollError::InvalidExplosionTarget {
                target: 11,
                difficulty: 8
            })
        );
    }

    #[test]
    fn classic_explosions_stay_above_difficulty() {
        assert!(
            RollOptions::new(5, 6)
                .with_explosion_target(10)
                .validate()
                .is_ok()
        );
        assert!(
            RollOptions::new(5, 6)
                .with_explosion_target(1)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn chronicles_willpower_adds_dice() {
        let options = RollOptions::chronicles(4, 8, 10).with_willpower(true);
        assert_eq!(options.dice_to_roll(), 7);
        assert!(!options.grants_willpower_success());

        let classic = RollOptions::new(4, 6).with_willpower(true);
        assert_eq!(classic.dice_to_roll(), 4);
        assert!(classic.grants_willpower_success());
    }

    #[test]
    fn classify_faces() {
        let options = RollOptions::new(5, 6).with_double_tens(true);
        assert_eq!(options.classify(10), FaceKind::DoubleSuccess);
        assert_eq!(options.classify(6), FaceKind::Success);
        assert_eq!(options.classify(5), FaceKind::Failure);
        assert_eq!(options.classify(1), FaceKind::One);

        let nullified = RollOptions::new(5, 6)
            .with_never_botch(true)
            .with_ignore_ones(true);
        assert_eq!(nullified.classify(1), FaceKind::Failure);
        assert_eq!(nullified.classify(10), FaceKind::Success);
    }
}
