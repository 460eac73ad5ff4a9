//! Dice engine for Storyteller.
//!
//! Provides World of Darkness pool rolls (with Chronicles of Darkness
//! X-again variants), traditional `XdY+N` rolls, a per-channel initiative
//! tracker, and roll-outcome probabilities computed exactly or by Monte
//! Carlo simulation.

pub mod dice;
pub mod error;
pub mod initiative;
pub mod outcome;
pub mod pool;
pub mod probability;
pub mod settings;
pub mod traditional;

pub use dice::{DieSource, RngDieSource, ScriptedDice};
pub use error::{InitiativeError, InitiativeResult, RollError, SettingsError, SettingsResult};
pub use initiative::{
    ChannelId, InitiativeEntry, InitiativeTable, InitiativeTracker, RenderedEntry, RenderedTable,
};
pub use outcome::RollOutcome;
pub use pool::{FaceKind, PoolVerdict, RollOptions, RollResult, evaluate_pool};
pub use probability::{Estimation, ProbabilityEstimator, ProbabilityRecord};
pub use settings::{PoolRequest, RollSettings, SettingKey};
pub use traditional::{DiceExpression, Term, TraditionalRollResult, evaluate_traditional};
