//! A single character's initiative.

use serde::{Deserialize, Serialize};

/// One character's place in the turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeEntry {
    /// Display name, unique within a table.
    pub character_name: String,
    /// Flat bonus added to the die.
    pub modifier: i32,
    /// The last d10 rolled.
    pub die: u32,
    /// The action declared for this turn, if any.
    pub declared_action: Option<String>,
    /// Bonus actions granted this turn (e.g. Celerity).
    pub extra_actions: u32,
}

impl InitiativeEntry {
    /// A fresh entry with no declared action.
    pub fn new(character_name: impl Into<String>, modifier: i32, die: u32) -> Self {
        Self {
            character_name: character_name.into(),
            modifier,
            die,
            declared_action: None,
            extra_actions: 0,
        }
    }

    /// Initiative score: die plus modifier.
    pub fn score(&self) -> i32 {
        self.modifier + self.die as i32
    }
}

impl std::fmt::Display for InitiativeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {}: {}", self.die, self.modifier, self.score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_adds_die_and_modifier() {
        let entry = InitiativeEntry::new("Theo", 5, 7);
        assert_eq!(entry.score(), 12);
        assert_eq!(entry.to_string(), "7 + 5: 12");
    }

    #[test]
    fn negative_modifier() {
        let entry = InitiativeEntry::new("Ghoul", -3, 2);
        assert_eq!(entry.score(), -1);
    }
}
