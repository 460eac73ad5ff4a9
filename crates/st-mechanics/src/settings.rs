//! Per-server roll settings.
//!
//! Settings hold the defaults a server has chosen (difficulty, explosion and
//! doubling rules, botch handling) and turn a dispatcher's [`PoolRequest`]
//! into concrete [`RollOptions`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RollError, SettingsError, SettingsResult};
use crate::pool::RollOptions;
use crate::pool::options::{MAX_DIFFICULTY, MIN_DIFFICULTY, NO_EXPLOSIONS};

/// Default difficulty for classic rolls.
pub const CLASSIC_DIFFICULTY: i32 = 6;
/// Default success threshold for Chronicles rolls.
pub const CHRONICLES_DIFFICULTY: i32 = 8;

/// A configurable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Compact output instead of rich formatting.
    Compact,
    /// Show dice in roll order instead of sorted.
    UnsortRolls,
    /// Tens always explode.
    ExplodeAlways,
    /// Tens explode when a specialty is used.
    ExplodeSpecialty,
    /// Tens never count double.
    NoDouble,
    /// Tens always count double.
    AlwaysDouble,
    /// Ones never subtract from rolls that cannot botch.
    IgnoreOnes,
    /// Allow rolls to ask for ones to be ignored.
    NullifyOnes,
    /// Botches are disabled server-wide.
    NeverBotch,
    /// Ones may cancel the Willpower success.
    WillpowerCancelable,
    /// Difficulty when none is given.
    DefaultDifficulty,
    /// Every roll uses Chronicles of Darkness rules.
    Chronicles,
    /// Success threshold for Chronicles of Darkness rolls.
    ChroniclesDifficulty,
}

impl SettingKey {
    /// Every setting, in display order.
    pub const ALL: [Self; 13] = [
        Self::Compact,
        Self::UnsortRolls,
        Self::DefaultDifficulty,
        Self::ExplodeAlways,
        Self::ExplodeSpecialty,
        Self::NoDouble,
        Self::AlwaysDouble,
        Self::IgnoreOnes,
        Self::NullifyOnes,
        Self::NeverBotch,
        Self::WillpowerCancelable,
        Self::Chronicles,
        Self::ChroniclesDifficulty,
    ];

    /// The key as typed by users.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "use_compact",
            Self::UnsortRolls => "unsort_rolls",
            Self::ExplodeAlways => "xpl_always",
            Self::ExplodeSpecialty => "xpl_spec",
            Self::NoDouble => "no_double",
            Self::AlwaysDouble => "always_double",
            Self::IgnoreOnes => "ignore_ones",
            Self::NullifyOnes => "nullify_ones",
            Self::NeverBotch => "never_botch",
            Self::WillpowerCancelable => "wp_cancelable",
            Self::DefaultDifficulty => "default_diff",
            Self::Chronicles => "chronicles",
            Self::ChroniclesDifficulty => "chronicles_diff",
        }
    }

    /// A one-line description of what the setting does.
    pub fn description(self) -> &'static str {
        match self {
            Self::Compact => "Always use compact roll output.",
            Self::UnsortRolls => "Dice are displayed in roll order instead of sorted.",
            Self::ExplodeAlways => "If `true`, tens always explode.",
            Self::ExplodeSpecialty => "If `true`, specialty tens explode.",
            Self::NoDouble => "If `true`, tens never count as double successes.",
            Self::AlwaysDouble => {
                "If `true`, tens count as double successes regardless of specialty."
            }
            Self::IgnoreOnes => "If `true`, ones do not subtract from non-botching rolls.",
            Self::NullifyOnes => "If `true`, the ignore-ones option stops ones subtracting.",
            Self::NeverBotch => "Permanently disables botches.",
            Self::WillpowerCancelable => "Allows ones to cancel a Willpower success.",
            Self::DefaultDifficulty => "The default difficulty for a pool-based roll.",
            Self::Chronicles => {
                "Enables Chronicles of Darkness rolls; also sets difficulty 8, \
                 exploding tens, ignored ones and no botches."
            }
            Self::ChroniclesDifficulty => "The success threshold for Chronicles rolls.",
        }
    }

    fn is_difficulty(self) -> bool {
        matches!(self, Self::DefaultDifficulty | Self::ChroniclesDifficulty)
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or(SettingsError::UnknownSetting(key))
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A server's roll defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollSettings {
    /// Compact output.
    pub use_compact: bool,
    /// Dice shown in roll order.
    pub unsort_rolls: bool,
    /// Tens always explode.
    pub xpl_always: bool,
    /// Tens explode when a specialty is used.
    pub xpl_spec: bool,
    /// Tens never count double.
    pub no_double: bool,
    /// Tens always count double.
    pub always_double: bool,
    /// Ones never subtract from rolls that cannot botch.
    pub ignore_ones: bool,
    /// Allow rolls to ignore ones.
    pub nullify_ones: bool,
    /// Botches are disabled.
    pub never_botch: bool,
    /// Ones may cancel the Willpower success.
    pub wp_cancelable: bool,
    /// Difficulty when none is given.
    pub default_diff: i32,
    /// Every roll uses Chronicles of Darkness rules.
    pub chronicles: bool,
    /// Success threshold for Chronicles of Darkness rolls.
    pub chronicles_diff: i32,
}

impl Default for RollSettings {
    fn default() -> Self {
        Self {
            use_compact: false,
            unsort_rolls: false,
            xpl_always: false,
            xpl_spec: false,
            no_double: false,
            always_double: false,
            ignore_ones: false,
            nullify_ones: false,
            never_botch: false,
            wp_cancelable: false,
            default_diff: CLASSIC_DIFFICULTY,
            chronicles: false,
            chronicles_diff: CHRONICLES_DIFFICULTY,
        }
    }
}

impl RollSettings {
    /// Set the default difficulty.
    pub fn with_default_difficulty(mut self, difficulty: i32) -> Self {
        self.default_diff = difficulty;
        self
    }

    /// Set the Chronicles success threshold.
    pub fn with_chronicles_difficulty(mut self, difficulty: i32) -> Self {
        self.chronicles_diff = difficulty;
        self
    }

    /// Make tens always explode.
    pub fn with_explode_always(mut self, on: bool) -> Self {
        self.xpl_always = on;
        self
    }

    /// Make specialty tens explode.
    pub fn with_explode_specialty(mut self, on: bool) -> Self {
        self.xpl_spec = on;
        self
    }

    /// Never count tens double.
    pub fn with_no_double(mut self, on: bool) -> Self {
        self.no_double = on;
        self
    }

    /// Always count tens double.
    pub fn with_always_double(mut self, on: bool) -> Self {
        self.always_double = on;
        self
    }

    /// Allow rolls to ignore ones.
    pub fn with_nullify_ones(mut self, on: bool) -> Self {
        self.nullify_ones = on;
        self
    }

    /// Use compact output.
    pub fn with_compact(mut self, on: bool) -> Self {
        self.use_compact = on;
        self
    }

    /// Show dice in roll order.
    pub fn with_unsorted_rolls(mut self, on: bool) -> Self {
        self.unsort_rolls = on;
        self
    }

    /// Stop ones subtracting from rolls that cannot botch.
    pub fn with_ignore_ones(mut self, on: bool) -> Self {
        self.ignore_ones = on;
        self
    }

    /// Disable botches.
    pub fn with_never_botch(mut self, on: bool) -> Self {
        self.never_botch = on;
        self
    }

    /// Let ones cancel the Willpower success.
    pub fn with_willpower_cancelable(mut self, on: bool) -> Self {
        self.wp_cancelable = on;
        self
    }

    /// Switch Chronicles mode, see [`RollSettings::set_chronicles`].
    pub fn with_chronicles(mut self, on: bool) -> Self {
        self.set_chronicles(on);
        self
    }

    /// Switch Chronicles mode together with the rules that come with it:
    /// default difficulty 8 (6 when off), exploding tens, ignored ones and
    /// no botches.
    pub fn set_chronicles(&mut self, on: bool) {
        self.chronicles = on;
        self.default_diff = if on {
            CHRONICLES_DIFFICULTY
        } else {
            CLASSIC_DIFFICULTY
        };
        self.xpl_always = on;
        self.ignore_ones = on;
        self.never_botch = on;
    }

    /// The current value of a setting, as text.
    pub fn get(&self, key: SettingKey) -> String {
        match key {
            SettingKey::Compact => self.use_compact.to_string(),
            SettingKey::UnsortRolls => self.unsort_rolls.to_string(),
            SettingKey::ExplodeAlways => self.xpl_always.to_string(),
            SettingKey::ExplodeSpecialty => self.xpl_spec.to_string(),
            SettingKey::NoDouble => self.no_double.to_string(),
            SettingKey::AlwaysDouble => self.always_double.to_string(),
            SettingKey::IgnoreOnes => self.ignore_ones.to_string(),
            SettingKey::NullifyOnes => self.nullify_ones.to_string(),
            SettingKey::NeverBotch => self.never_botch.to_string(),
            SettingKey::WillpowerCancelable => self.wp_cancelable.to_string(),
            SettingKey::DefaultDifficulty => self.default_diff.to_string(),
            SettingKey::Chronicles => self.chronicles.to_string(),
            SettingKey::ChroniclesDifficulty => self.chronicles_diff.to_string(),
        }
    }

    /// Parse `value` and store it under `key`.
    ///
    /// Nothing changes if the value is invalid. Setting `chronicles` also
    /// updates the settings it implies.
    pub fn set(&mut self, key: SettingKey, value: &str) -> SettingsResult<()> {
        if key.is_difficulty() {
            let difficulty = parse_difficulty(key, value)?;
            match key {
                SettingKey::DefaultDifficulty => self.default_diff = difficulty,
                _ => self.chronicles_diff = difficulty,
            }
            return Ok(());
        }

        let flag = parse_flag(key, value)?;
        match key {
            SettingKey::Compact => self.use_compact = flag,
            SettingKey::UnsortRolls => self.unsort_rolls = flag,
            SettingKey::ExplodeAlways => self.xpl_always = flag,
            SettingKey::ExplodeSpecialty => self.xpl_spec = flag,
            SettingKey::NoDouble => self.no_double = flag,
            SettingKey::AlwaysDouble => self.always_double = flag,
            SettingKey::IgnoreOnes => self.ignore_ones = flag,
            SettingKey::NullifyOnes => self.nullify_ones = flag,
            SettingKey::NeverBotch => self.never_botch = flag,
            SettingKey::WillpowerCancelable => self.wp_cancelable = flag,
            SettingKey::Chronicles => self.set_chronicles(flag),
            SettingKey::DefaultDifficulty | SettingKey::ChroniclesDifficulty => {}
        }
        Ok(())
    }

    /// Check that stored difficulties are in range.
    pub fn validate(&self) -> SettingsResult<()> {
        for key in [
            SettingKey::DefaultDifficulty,
            SettingKey::ChroniclesDifficulty,
        ] {
            parse_difficulty(key, &self.get(key))?;
        }
        Ok(())
    }

    /// Turn a dispatcher request into validated roll options.
    ///
    /// Server-wide flags (`chronicles`, `never_botch`, `wp_cancelable`,
    /// `ignore_ones`) switch their rule on for every roll.
    pub fn resolve(&self, request: &PoolRequest) -> Result<RollOptions, RollError> {
        let specialty = request.specialty.is_some();
        let double_tens = !self.no_double && (self.always_double || specialty);

        let options = if request.chronicles || self.chronicles {
            // The difficulty slot of a Chronicles roll names the X-again target.
            let target = request.difficulty.unwrap_or(MAX_DIFFICULTY);
            RollOptions::chronicles(request.pool, self.chronicles_diff, target)
        } else {
            let difficulty = request.difficulty.unwrap_or(self.default_diff);
            let explodes = self.xpl_always || (self.xpl_spec && specialty);
            RollOptions::new(request.pool, difficulty).with_explosion_target(if explodes {
                MAX_DIFFICULTY
            } else {
                NO_EXPLOSIONS
            })
        };

        let options = options
            .with_auto_successes(request.auto_successes)
            .with_willpower(request.willpower)
            .with_double_tens(double_tens)
            .with_never_botch(request.never_botch || self.never_botch)
            .with_ignore_ones(self.ignore_ones || (request.ignore_ones && self.nullify_ones))
            .with_willpower_cancelable(request.willpower_cancelable || self.wp_cancelable)
            .with_roll_order(self.unsort_rolls);

        options.validate()?;
        Ok(options)
    }
}

fn parse_difficulty(key: SettingKey, value: &str) -> SettingsResult<i32> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|d| (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(d))
        .ok_or_else(|| SettingsError::InvalidValue {
            key: key.to_string(),
            message: format!("must be an integer between {MIN_DIFFICULTY}-{MAX_DIFFICULTY}"),
        })
}

fn parse_flag(key: SettingKey, value: &str) -> SettingsResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            message: "must be `true` or `false`".into(),
        }),
    }
}

/// The parameters a dispatcher extracts from a pool roll command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRequest {
    /// Dice in the pool.
    pub pool: i32,
    /// Difficulty, or the X-again target for Chronicles rolls.
    pub difficulty: Option<i32>,
    /// Automatic successes (negative for failures).
    pub auto_successes: i32,
    /// The specialty being used, if any.
    pub specialty: Option<String>,
    /// Whether Willpower is spent.
    pub willpower: bool,
    /// Chronicles of Darkness rules.
    pub chronicles: bool,
    /// Disallow botches.
    pub never_botch: bool,
    /// Ask for ones to be ignored (needs `nullify_ones`).
    pub ignore_ones: bool,
    /// Let ones cancel the Willpower success.
    pub willpower_cancelable: bool,
}

impl PoolRequest {
    /// A request for a pool with nothing else set.
    pub fn new(pool: i32) -> Self {
        Self {
            pool,
            ..Self::default()
        }
    }
}
