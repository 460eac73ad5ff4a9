//! One channel's initiative table.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::entry::InitiativeEntry;
use crate::dice::{D10, DieSource};

/// The characters in one channel's turn order.
///
/// An empty table is equivalent to no table; owners drop tables once they
/// empty out.
///
/// Serialized as a map from character name to entry. Deserializing rejects
/// an entry stored under a name other than its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InitiativeTable {
    entries: BTreeMap<String, InitiativeEntry>,
}

impl<'de> Deserialize<'de> for InitiativeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, InitiativeEntry>::deserialize(deserializer)?;
        if let Some((key, entry)) = entries.iter().find(|(k, e)| **k != e.character_name) {
            return Err(D::Error::custom(format!(
                "entry under `{key}` belongs to `{}`",
                entry.character_name
            )));
        }
        Ok(Self { entries })
    }
}

impl InitiativeTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of characters in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no characters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `character` has an entry.
    pub fn contains(&self, character: &str) -> bool {
        self.entries.contains_key(character)
    }

    /// The entry for `character`, if any.
    pub fn get(&self, character: &str) -> Option<&InitiativeEntry> {
        self.entries.get(character)
    }

    /// All entries, in name order.
    pub fn entries(&self) -> impl Iterator<Item = &InitiativeEntry> {
        self.entries.values()
    }

    /// Store an entry as-is, replacing any entry with the same name.
    pub fn insert(&mut self, entry: InitiativeEntry) {
        self.entries.insert(entry.character_name.clone(), entry);
    }

    /// Roll a fresh initiative for `character`, replacing any previous entry.
    pub fn roll_initiative(
        &mut self,
        character: &str,
        modifier: i32,
        dice: &mut impl DieSource,
    ) -> InitiativeEntry {
        let entry = InitiativeEntry::new(character, modifier, dice.roll_one(D10));
        self.insert(entry.clone());
        entry
    }

    /// Add `delta` to a character's modifier, keeping the die and action.
    pub fn modify_initiative(&mut self, character: &str, delta: i32) -> Option<InitiativeEntry> {
        let entry = self.entries.get_mut(character)?;
        entry.modifier += delta;
        Some(entry.clone())
    }

    /// Remove a character. Returns whether it was present.
    pub fn remove(&mut self, character: &str) -> bool {
        self.entries.remove(character).is_some()
    }

    /// Declare an action for a character. Returns whether it was present.
    pub fn declare_action(&mut self, character: &str, action: impl Into<String>) -> bool {
        match self.entries.get_mut(character) {
            Some(entry) => {
                entry.declared_action = Some(action.into());
                true
            }
            None => false,
        }
    }

    /// Grant a character `count` extra actions. Returns whether it was present.
    pub fn add_extra_action(&mut self, character: &str, count: u32) -> bool {
        match self.entries.get_mut(character) {
            Some(entry) => {
                entry.extra_actions += count;
                true
            }
            None => false,
        }
    }

    /// Reroll every die, clearing declared and extra actions.
    pub fn reroll_all(&mut self, dice: &mut impl DieSource) {
        for entry in self.entries.values_mut() {
            entry.die = dice.roll_one(D10);
            entry.declared_action = None;
            entry.extra_actions = 0;
        }
    }

    /// The turn order: highest score first, then highest modifier, then name.
    pub fn render(&self) -> RenderedTable {
        let mut rows: Vec<RenderedEntry> = self.entries.values().map(RenderedEntry::from).collect();
        rows.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(b.modifier.cmp(&a.modifier))
                .then_with(|| a.character.cmp(&b.character))
        });
        RenderedTable { rows }
    }
}

/// One row of a rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedEntry {
    /// Character name.
    pub character: String,
    /// Initiative score.
    pub score: i32,
    /// The die rolled.
    pub die: u32,
    /// The modifier applied.
    pub modifier: i32,
    /// Declared action, if any.
    pub declared_action: Option<String>,
    /// Extra actions this turn.
    pub extra_actions: u32,
}

impl From<&InitiativeEntry> for RenderedEntry {
    fn from(entry: &InitiativeEntry) -> Self {
        Self {
            character: entry.character_name.clone(),
            score: entry.score(),
            die: entry.die,
            modifier: entry.modifier,
            declared_action: entry.declared_action.clone(),
            extra_actions: entry.extra_actions,
        }
    }
}

/// A table sorted into turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedTable {
    /// Rows in turn order.
    pub rows: Vec<RenderedEntry>,
}

impl RenderedTable {
    /// Character names in turn order.
    pub fn order(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.character.as_str()).collect()
    }
}

impl std::fmt::Display for RenderedTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            write!(f, "{}: {}", row.score, row.character)?;
            if let Some(action) = &row.declared_action {
                write!(f, " - {action}")?;
            }
            writeln!(f)?;
        }

        let mut extras: Vec<&RenderedEntry> =
            self.rows.iter().filter(|r| r.extra_actions > 0).collect();
        if !extras.is_empty() {
            extras.sort_by(|a, b| a.character.cmp(&b.character));
            writeln!(f)?;
            writeln!(f, "Extra actions")?;
            for row in extras {
                writeln!(f, "{} ({})", row.character, row.extra_actions)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    fn table_with(rolls: &[(&str, i32, u32)]) -> InitiativeTable {
        let mut table = InitiativeTable::new();
        for &(name, modifier, die) in rolls {
            table.insert(InitiativeEntry::new(name, modifier, die));
        }
        table
    }

    #[test]
    fn roll_creates_entry() {
        let mut table = InitiativeTable::new();
        let mut dice = ScriptedDice::new([6]);
        let entry = table.roll_initiative("Anya", 4, &mut dice);
        assert_eq!(entry.score(), 10);
        assert_eq!(table.len(), 1);
        assert!(table.contains("Anya"));
        assert!(!table.contains("anya"));
    }

    #[test]
    fn reroll_overwrites_everything() {
        let mut table = InitiativeTable::new();
        let mut dice = ScriptedDice::new([6, 2]);
        table.roll_initiative("Anya", 4, &mut dice);
        table.declare_action("Anya", "flee");
        table.add_extra_action("Anya", 2);

        let entry = table.roll_initiative("Anya", 1, &mut dice);
        assert_eq!(entry, InitiativeEntry::new("Anya", 1, 2));
        assert_eq!(table.get("Anya"), Some(&entry));
    }

    #[test]
    fn modify_keeps_die_and_action() {
        let mut table = table_with(&[("Anya", 4, 6)]);
        table.declare_action("Anya", "shoot");
        let entry = table.modify_initiative("Anya", -2).unwrap();
        assert_eq!(entry.modifier, 2);
        assert_eq!(entry.die, 6);
        assert_eq!(entry.declared_action.as_deref(), Some("shoot"));
        assert!(table.modify_initiative("Nobody", 1).is_none());
    }

    #[test]
    fn remove_reports_presence() {
        let mut table = table_with(&[("Anya", 4, 6)]);
        assert!(!table.remove("Nobody"));
        assert!(table.remove("Anya"));
        assert!(table.is_empty());
    }

    #[test]
    fn declare_and_extra_require_character() {
        let mut table = table_with(&[("Anya", 4, 6)]);
        assert!(table.declare_action("Anya", "dodge"));
        assert!(!table.declare_action("Nobody", "dodge"));
        assert!(table.add_extra_action("Anya", 1));
        assert!(table.add_extra_action("Anya", 2));
        assert!(!table.add_extra_action("Nobody", 1));
        assert_eq!(table.get("Anya").unwrap().extra_actions, 3);
    }

    #[test]
    fn reroll_all_keeps_modifiers() {
        let mut table = table_with(&[("Anya", 4, 6), ("Boris", 2, 9)]);
        table.declare_action("Anya", "dodge");
        table.add_extra_action("Boris", 1);

        let mut dice = ScriptedDice::new([1, 10]);
        table.reroll_all(&mut dice);

        let anya = table.get("Anya").unwrap();
        let boris = table.get("Boris").unwrap();
        assert_eq!((anya.modifier, anya.die), (4, 1));
        assert_eq!((boris.modifier, boris.die), (2, 10));
        assert!(anya.declared_action.is_none());
        assert_eq!(boris.extra_actions, 0);
    }

    #[test]
    fn render_orders_by_score() {
        let table = table_with(&[("C", 0, 5), ("A", 5, 10), ("B", 3, 7)]);
        assert_eq!(table.render().order(), vec!["A", "B", "C"]);
    }

    #[test]
    fn ties_break_on_modifier_then_name() {
        let table = table_with(&[("Zed", 2, 8), ("Amy", 6, 4), ("Bo", 2, 8)]);
        assert_eq!(table.render().order(), vec!["Amy", "Bo", "Zed"]);
    }

    #[test]
    fn render_display() {
        let mut table = table_with(&[("Anya", 4, 6), ("Boris", 2, 9)]);
        table.declare_action("Boris", "charge");
        table.add_extra_action("Anya", 2);
        assert_eq!(
            table.render().to_string(),
            "11: Boris - charge\n10: Anya\n\nExtra actions\nAnya (2)\n"
        );
    }

    #[test]
    fn serializes_as_plain_map() {
        let table = table_with(&[("Anya", 4, 6)]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["Anya"]["modifier"], 4);
        let back: InitiativeTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn rejects_entries_under_the_wrong_name() {
        let json = serde_json::json!({
            "Anya": {
                "character_name": "Boris",
                "modifier": 2,
                "die": 5,
                "declared_action": null,
                "extra_actions": 0
            }
        });
        let err = serde_json::from_value::<InitiativeTable>(json).unwrap_err();
        assert!(err.to_string().contains("entry under `Anya` belongs to `Boris`"));
    }
}
