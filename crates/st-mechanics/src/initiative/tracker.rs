//! The shared, thread-safe set of initiative tables.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::ChannelId;
use super::entry::InitiativeEntry;
use super::table::{InitiativeTable, RenderedTable};
use crate::dice::{DieSource, RngDieSource};
use crate::error::{InitiativeError, InitiativeResult};

type Tables = HashMap<ChannelId, InitiativeTable>;

/// Every channel's initiative table.
///
/// Renders share a read lock; every mutation takes the write lock, so
/// changes to a channel never interleave.
#[derive(Debug)]
pub struct InitiativeTracker<D: DieSource = RngDieSource> {
    tables: RwLock<Tables>,
    dice: Mutex<D>,
}

impl InitiativeTracker<RngDieSource> {
    /// A tracker rolling with OS-seeded dice.
    pub fn new() -> Self {
        Self::with_dice(RngDieSource::from_entropy())
    }

    /// A tracker rolling reproducible dice.
    pub fn seeded(seed: u64) -> Self {
        Self::with_dice(RngDieSource::seeded(seed))
    }
}

impl Default for InitiativeTracker<RngDieSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DieSource> InitiativeTracker<D> {
    /// A tracker rolling with the given die source.
    pub fn with_dice(dice: D) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            dice: Mutex::new(dice),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to an existing table, dropping the table if it empties.
    fn with_table<T>(
        &self,
        channel: &ChannelId,
        f: impl FnOnce(&mut InitiativeTable) -> T,
    ) -> InitiativeResult<T> {
        let mut tables = self.write();
        let table = tables
            .get_mut(channel)
            .ok_or_else(|| InitiativeError::TableNotFound(channel.clone()))?;
        let out = f(table);
        if table.is_empty() {
            tables.remove(channel);
        }
        Ok(out)
    }

    /// Roll initiative for `character`, creating the channel's table if needed.
    pub fn roll(&self, channel: &ChannelId, character: &str, modifier: i32) -> InitiativeEntry {
        let mut tables = self.write();
        let mut dice = self.dice.lock().unwrap_or_else(PoisonError::into_inner);
        tables
            .entry(channel.clone())
            .or_default()
            .roll_initiative(character, modifier, &mut *dice)
    }

    /// Add `delta` to a character's modifier.
    ///
    /// `Ok(None)` means the table exists but the character is not in it.
    pub fn modify(
        &self,
        channel: &ChannelId,
        character: &str,
        delta: i32,
    ) -> InitiativeResult<Option<InitiativeEntry>> {
        self.with_table(channel, |table| table.modify_initiative(character, delta))
    }

    /// Remove a character. Returns whether anything was removed.
    pub fn remove(&self, channel: &ChannelId, character: &str) -> bool {
        self.with_table(channel, |table| table.remove(character))
            .unwrap_or(false)
    }

    /// Declare an action for a character.
    pub fn declare(
        &self,
        channel: &ChannelId,
        character: &str,
        action: impl Into<String>,
    ) -> InitiativeResult<()> {
        let declared = self.with_table(channel, |table| table.declare_action(character, action))?;
        if declared {
            Ok(())
        } else {
            Err(InitiativeError::CharacterNotFound(character.to_string()))
        }
    }

    /// Grant a character extra actions. Returns their new total.
    pub fn add_extra_action(
        &self,
        channel: &ChannelId,
        character: &str,
        count: u32,
    ) -> InitiativeResult<u32> {
        self.with_table(channel, |table| {
            table
                .add_extra_action(character, count)
                .then(|| table.get(character).map_or(0, |e| e.extra_actions))
        })?
        .ok_or_else(|| InitiativeError::CharacterNotFound(character.to_string()))
    }

    /// Reroll every character in the channel and return the new order.
    pub fn reroll(&self, channel: &ChannelId) -> InitiativeResult<RenderedTable> {
        self.with_table(channel, |table| {
            let mut dice = self.dice.lock().unwrap_or_else(PoisonError::into_inner);
            table.reroll_all(&mut *dice);
            table.render()
        })
    }

    /// The channel's turn order, or `None` if it has no table.
    pub fn render(&self, channel: &ChannelId) -> Option<RenderedTable> {
        self.read().get(channel).map(InitiativeTable::render)
    }

    /// Drop the channel's table. Returns whether one existed.
    ///
    /// Also used when the channel itself goes away.
    pub fn clear(&self, channel: &ChannelId) -> bool {
        self.write().remove(channel).is_some()
    }

    /// Whether the channel has a table.
    pub fn contains(&self, channel: &ChannelId) -> bool {
        self.read().contains_key(channel)
    }

    /// Number of channels with a table.
    pub fn channel_count(&self) -> usize {
        self.read().len()
    }

    /// A copy of every table, keyed by channel.
    pub fn snapshot(&self) -> BTreeMap<ChannelId, InitiativeTable> {
        self.read()
            .iter()
            .map(|(channel, table)| (channel.clone(), table.clone()))
            .collect()
    }

    /// Replace all tables with `snapshot`, skipping empty ones.
    pub fn restore(&self, snapshot: impl IntoIterator<Item = (ChannelId, InitiativeTable)>) {
        let mut tables = self.write();
        tables.clear();
        tables.extend(snapshot.into_iter().filter(|(_, table)| !table.is_empty()));
    }
}
