//! Pool roll results.

use serde::{Deserialize, Serialize};

use super::options::{FaceKind, RollOptions};

/// The result of a pool roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Every face rolled, explosions included, highest first unless the
    /// roll kept roll order.
    pub dice: Vec<u32>,
    /// Extra dice rolled because of explosions.
    pub explosion_count: u32,
    /// Net successes; negative values are the botch magnitude.
    pub net_successes: i32,
}

/// How a pool roll turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolVerdict {
    /// One or more net successes.
    Successes(u32),
    /// No successes, no botch.
    Failure,
    /// A botch with the given number of ones.
    Botch(u32),
}

impl std::fmt::Display for PoolVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Successes(1) => write!(f, "1 success"),
            Self::Successes(n) => write!(f, "{n} successes"),
            Self::Failure => write!(f, "Failure"),
            Self::Botch(n) => write!(f, "Botch: -{n}"),
        }
    }
}

impl RollResult {
    /// Score already-rolled faces under the given options.
    ///
    /// `faces` are in roll order; the result stores them highest first
    /// unless `keep_roll_order` is set.
    pub fn score(options: &RollOptions, mut faces: Vec<u32>, explosion_count: u32) -> Self {
        if !options.keep_roll_order {
            faces.sort_unstable_by(|a, b| b.cmp(a));
        }

        let mut successes: i32 = i32::from(options.grants_willpower_success());
        let mut failures: i32 = 0;
        if options.auto_successes > 0 {
            successes += options.auto_successes;
        } else {
            failures -= options.auto_successes;
        }

        for &face in &faces {
            match options.classify(face) {
                FaceKind::DoubleSuccess => successes += 2,
                FaceKind::Success => successes += 1,
                FaceKind::One => failures += 1,
                FaceKind::Failure => {}
            }
        }

        let botched = !options.grants_willpower_success()
            && !options.never_botch
            && failures > 0
            && successes == 0;
        let net_successes = if botched {
            -failures
        } else {
            let net = (successes - failures).max(0);
            if net == 0 && options.grants_willpower_success() && !options.willpower_cancelable {
                1
            } else {
                net
            }
        };

        Self {
            dice: faces,
            explosion_count,
            net_successes,
        }
    }

    /// The verdict a player would read.
    pub fn verdict(&self) -> PoolVerdict {
        match self.net_successes {
            n if n > 0 => PoolVerdict::Successes(n.unsigned_abs()),
            0 => PoolVerdict::Failure,
            n => PoolVerdict::Botch(n.unsigned_abs()),
        }
    }

    /// Whether the roll botched.
    pub fn is_botch(&self) -> bool {
        self.net_successes < 0
    }

    /// Number of dice in the result.
    pub fn count(&self) -> usize {
        self.dice.len()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.dice.iter().map(u32::to_string).collect();
        write!(f, "[{}] {}", values.join(", "), self.verdict())
    }
}
