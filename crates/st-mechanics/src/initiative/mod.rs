//! Per-channel initiative tracking.
//!
//! Each channel owns at most one [`InitiativeTable`]. A channel with no
//! characters has no table: removing the last character or clearing the
//! channel drops it. [`InitiativeTracker`] holds every channel's table and
//! serializes changes to them.

pub mod entry;
pub mod table;
pub mod tracker;

pub use entry::InitiativeEntry;
pub use table::{InitiativeTable, RenderedEntry, RenderedTable};
pub use tracker::InitiativeTracker;

use serde::{Deserialize, Serialize};

/// An opaque identifier for the place a table lives (e.g. a chat channel).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ChannelId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
