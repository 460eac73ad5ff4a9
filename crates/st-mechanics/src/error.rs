//! Error types for the dice engine.

use serde::{Deserialize, Serialize};

use crate::initiative::ChannelId;

/// Validation errors raised before any die is rolled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RollError {
    /// The dice pool is outside `1..=100`.
    #[error("pools must be between 1 and 100 (input: {0})")]
    PoolOutOfRange(i32),

    /// The difficulty is outside `2..=10`.
    #[error("difficulty must be between 2 and 10 (input: {0})")]
    DifficultyOutOfRange(i32),

    /// A Chronicles X-again target is outside `difficulty..=10`.
    #[error("X-again must be between {difficulty} and 10, not {target}")]
    InvalidExplosionTarget {
        /// The requested explosion target.
        target: i32,
        /// The difficulty in effect for the roll.
        difficulty: i32,
    },

    /// A probability target is outside `1..=max`.
    #[error("target must be between 1 and {max} (input: {target})")]
    TargetOutOfRange {
        /// The requested number of successes.
        target: i32,
        /// The largest reachable number of successes.
        max: i32,
    },

    /// A Monte Carlo estimate was asked to simulate no rolls.
    #[error("Monte Carlo estimates need at least one iteration")]
    NoIterations,

    /// A traditional dice expression does not match the grammar.
    #[error("invalid dice expression: {0}")]
    InvalidExpression(String),
}

/// Errors raised by the initiative tracker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitiativeError {
    /// No initiative table exists for the channel.
    #[error("no initiative table in channel {0}")]
    TableNotFound(ChannelId),

    /// The character has no entry in the channel's table.
    #[error("{0} has no initiative")]
    CharacterNotFound(String),
}

/// Convenience result type for initiative operations.
pub type InitiativeResult<T> = Result<T, InitiativeError>;

/// Errors raised while reading or updating roll settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The setting key is not recognised.
    #[error("unknown setting `{0}`")]
    UnknownSetting(String),

    /// The value could not be parsed for the setting.
    #[error("`{key}` {message}")]
    InvalidValue {
        /// The setting being updated.
        key: String,
        /// What was wrong with the value.
        message: String,
    },
}

/// Convenience result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
