//! A single value for whatever a roll command produced.

use serde::{Deserialize, Serialize};

use crate::error::RollError;
use crate::pool::RollResult;
use crate::traditional::TraditionalRollResult;

/// The outcome of one roll request, as handed to a presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RollOutcome {
    /// A pool roll.
    Pool(RollResult),
    /// A traditional `XdY+N` roll.
    Traditional(TraditionalRollResult),
    /// The request was rejected before rolling.
    Error(RollError),
}

impl RollOutcome {
    /// Whether the request was rejected.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<RollResult> for RollOutcome {
    fn from(result: RollResult) -> Self {
        Self::Pool(result)
    }
}

impl From<TraditionalRollResult> for RollOutcome {
    fn from(result: TraditionalRollResult) -> Self {
        Self::Traditional(result)
    }
}

impl From<RollError> for RollOutcome {
    fn from(error: RollError) -> Self {
        Self::Error(error)
    }
}

impl<T: Into<RollOutcome>> From<Result<T, RollError>> for RollOutcome {
    fn from(result: Result<T, RollError>) -> Self {
        result.map_or_else(Self::Error, Into::into)
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pool(result) => write!(f, "{result}"),
            Self::Traditional(result) => write!(f, "{result}"),
            Self::Error(error) => write!(f, "{error}"),
        }
    }
}
