use std::path::PathBuf;

use clap::{Args, Subcommand};

use st_mechanics::{ChannelId, DieSource, InitiativeError, InitiativeTracker};

use crate::config::{self, DEFAULT_STATE_FILE};
use crate::render;

/// Channel used when `--channel` is not given.
pub const DEFAULT_CHANNEL: &str = "default";

#[derive(Subcommand, Debug, Clone)]
pub enum InitAction {
    /// Show the turn order
    Show,

    /// Roll initiative for a character, replacing any earlier roll
    Roll {
        /// Character name
        character: String,

        /// Initiative modifier
        #[arg(allow_negative_numbers = true)]
        modifier: i32,
    },

    /// Adjust a character's modifier without rerolling
    Modify {
        /// Character name
        character: String,

        /// Amount to add to the modifier
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },

    /// Remove a character from the table
    Remove {
        /// Character name
        character: String,
    },

    /// Declare a character's action for this turn
    Declare {
        /// Character name
        character: String,

        /// The action
        #[arg(required = true, trailing_var_arg = true)]
        action: Vec<String>,
    },

    /// Grant a character extra actions (e.g. Celerity)
    Extra {
        /// Character name
        character: String,

        /// Number of extra actions
        #[arg(default_value_t = 1)]
        count: u32,
    },

    /// Reroll everyone for a new turn
    Reroll,

    /// Remove the channel's table
    Clear,
}

impl InitAction {
    /// Whether the action can change the tables.
    pub fn mutates(&self) -> bool {
        !matches!(self, Self::Show)
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Initiative state file
    #[arg(long, default_value = DEFAULT_STATE_FILE)]
    pub state: PathBuf,

    /// Channel whose table to use
    #[arg(long, default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// RNG seed for reproducible rolls
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub action: InitAction,
}

pub fn run(args: &InitArgs) -> Result<(), String> {
    let tracker = InitiativeTracker::with_dice(super::dice_for(args.seed));
    tracker.restore(config::load_initiative(&args.state)?);

    let channel = ChannelId::from(args.channel.as_str());
    let output = execute(&args.action, &channel, &tracker)?;

    if args.action.mutates() {
        config::save_initiative(&args.state, &tracker.snapshot())?;
    }
    print!("{output}");
    Ok(())
}

/// Apply one action to a channel, returning the rendered output.
pub fn execute<D: DieSource>(
    action: &InitAction,
    channel: &ChannelId,
    tracker: &InitiativeTracker<D>,
) -> Result<String, String> {
    let table = |tracker: &InitiativeTracker<D>| {
        render::initiative_table(channel, tracker.render(channel).as_ref())
    };
    let missing = |character: &str| InitiativeError::CharacterNotFound(character.to_string());

    let output = match action {
        InitAction::Show => table(tracker),
        InitAction::Roll {
            character,
            modifier,
        } => {
            let entry = tracker.roll(channel, character, *modifier);
            tracing::debug!(%channel, ?entry, "rolled initiative");
            format!("{}\n{}", render::initiative_entry(&entry), table(tracker))
        }
        InitAction::Modify { character, delta } => {
            let entry = tracker
                .modify(channel, character, *delta)
                .map_err(|e| e.to_string())?
                .ok_or_else(|| missing(character).to_string())?;
            format!("{}\n{}", render::initiative_entry(&entry), table(tracker))
        }
        InitAction::Remove { character } => {
            if !tracker.contains(channel) {
                return Err(InitiativeError::TableNotFound(channel.clone()).to_string());
            }
            if !tracker.remove(channel, character) {
                return Err(missing(character).to_string());
            }
            format!("  Removed {character}.\n\n{}", table(tracker))
        }
        InitAction::Declare { character, action } => {
            tracker
                .declare(channel, character, action.join(" "))
                .map_err(|e| e.to_string())?;
            table(tracker)
        }
        InitAction::Extra { character, count } => {
            let total = tracker
                .add_extra_action(channel, character, *count)
                .map_err(|e| e.to_string())?;
            let noun = if total == 1 { "action" } else { "actions" };
            format!("  {character} has {total} extra {noun}.\n\n{}", table(tracker))
        }
        InitAction::Reroll => {
            let rendered = tracker.reroll(channel).map_err(|e| e.to_string())?;
            render::initiative_table(channel, Some(&rendered))
        }
        InitAction::Clear => {
            if !tracker.clear(channel) {
                return Err(InitiativeError::TableNotFound(channel.clone()).to_string());
            }
            format!("  Cleared initiative in channel {channel}.\n")
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_mechanics::ScriptedDice;

    fn tracker(faces: &[u32]) -> InitiativeTracker<ScriptedDice> {
        InitiativeTracker::with_dice(ScriptedDice::new(faces.iter().copied()))
    }

    fn roll(character: &str, modifier: i32) -> InitAction {
        InitAction::Roll {
            character: character.into(),
            modifier,
        }
    }

    #[test]
    fn roll_then_show() {
        colored::control::set_override(false);
        let channel = ChannelId::from("scene");
        let tracker = tracker(&[7, 3]);
        let out = execute(&roll("Anya", 2), &channel, &tracker).unwrap();
        assert!(out.contains("Anya: 7 + 2: 9"), "{out}");
        execute(&roll("Boris", 1), &channel, &tracker).unwrap();

        let out = execute(&InitAction::Show, &channel, &tracker).unwrap();
        let anya = out.find("Anya").unwrap();
        let boris = out.find("Boris").unwrap();
        assert!(anya < boris, "{out}");
    }

    #[test]
    fn errors_name_the_problem() {
        let channel = ChannelId::from("scene");
        let tracker = tracker(&[5]);
        let err = execute(&InitAction::Reroll, &channel, &tracker).unwrap_err();
        assert_eq!(err, "no initiative table in channel scene");

        execute(&roll("Anya", 0), &channel, &tracker).unwrap();
        let modify = InitAction::Modify {
            character: "Boris".into(),
            delta: 1,
        };
        let err = execute(&modify, &channel, &tracker).unwrap_err();
        assert_eq!(err, "Boris has no initiative");
        let remove = InitAction::Remove {
            character: "Boris".into(),
        };
        assert!(execute(&remove, &channel, &tracker).is_err());
    }

    #[test]
    fn extra_actions_are_listed() {
        colored::control::set_override(false);
        let channel = ChannelId::from("scene");
        let tracker = tracker(&[5]);
        execute(&roll("Anya", 0), &channel, &tracker).unwrap();
        let extra = InitAction::Extra {
            character: "Anya".into(),
            count: 2,
        };
        let out = execute(&extra, &channel, &tracker).unwrap();
        assert!(out.contains("Anya has 2 extra actions."), "{out}");
        assert!(out.contains("Extra actions"), "{out}");
        assert!(out.contains("Anya (2)"), "{out}");
    }

    #[test]
    fn clear_removes_table() {
        let channel = ChannelId::from("scene");
        let tracker = tracker(&[5]);
        execute(&roll("Anya", 0), &channel, &tracker).unwrap();
        assert!(execute(&InitAction::Clear, &channel, &tracker).is_ok());
        assert!(!tracker.contains(&channel));
        assert!(execute(&InitAction::Clear, &channel, &tracker).is_err());
    }

    #[test]
    fn show_is_read_only() {
        assert!(!InitAction::Show.mutates());
        assert!(InitAction::Reroll.mutates());
    }
}
