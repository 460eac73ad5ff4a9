use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use st_mechanics::probability::DEFAULT_ITERATIONS;
use st_mechanics::{ChannelId, InitiativeTracker, ProbabilityEstimator, RngDieSource, RollSettings};

use super::init::{DEFAULT_CHANNEL, InitAction};
use super::prob::{EstimationArgs, ProbQuery};
use super::roll::RollRequest;
use crate::config::{self, DEFAULT_SETTINGS_FILE};

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Initiative state file to load at start and save at exit
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Settings file (missing means defaults)
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Channel to start in
    #[arg(long, default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// RNG seed for reproducible rolls and simulations
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulate rolls instead of computing exact odds
    #[arg(long)]
    pub monte_carlo: bool,

    /// Rolls to simulate per odds question
    #[arg(
        long,
        default_value_t = DEFAULT_ITERATIONS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub iterations: u64,
}

/// One line of session input.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Roll a dice pool or a traditional expression
    Roll(RollRequest),

    /// Manage the current channel's initiative table
    Init {
        #[command(subcommand)]
        action: InitAction,
    },

    /// Show the odds of reaching a number of successes
    Prob(ProbQuery),

    /// Switch to another channel
    Channel {
        /// Channel name
        id: String,
    },

    /// End the session
    #[command(alias = "q", alias = "exit")]
    Quit,
}

enum Step {
    Continue(String),
    Quit,
}

/// State shared by every line of a session.
struct Session {
    settings: RollSettings,
    dice: RngDieSource,
    tracker: InitiativeTracker,
    estimator: ProbabilityEstimator,
    channel: ChannelId,
}

impl Session {
    fn process(&mut self, line: &str) -> Result<Step, String> {
        let words = split_words(line)?;
        let parsed = SessionLine::try_parse_from(words).map_err(|e| e.to_string())?;

        let output = match parsed.command {
            SessionCommand::Roll(request) => {
                super::roll::execute(&request, &self.settings, &mut self.dice)?
            }
            SessionCommand::Init { action } => {
                super::init::execute(&action, &self.channel, &self.tracker)?
            }
            SessionCommand::Prob(query) => super::prob::execute(&query, &self.estimator)?,
            SessionCommand::Channel { id } => {
                self.channel = ChannelId::from(id);
                format!("  Now in channel {}.\n", self.channel)
            }
            SessionCommand::Quit => return Ok(Step::Quit),
        };
        Ok(Step::Continue(output))
    }
}

/// Split a line into words, keeping quoted text together.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => word.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            None => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unclosed quote".into());
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}

pub fn run(args: &SessionArgs) -> Result<(), String> {
    let settings = config::load_settings(&args.settings)?;
    let tracker = InitiativeTracker::with_dice(super::dice_for(args.seed));
    if let Some(path) = &args.state {
        tracker.restore(config::load_initiative(path)?);
    }
    let estimation = EstimationArgs {
        monte_carlo: args.monte_carlo,
        iterations: args.iterations,
        seed: args.seed.unwrap_or(42),
    };

    let mut session = Session {
        settings,
        dice: super::dice_for(args.seed),
        tracker,
        estimator: estimation.estimator(),
        channel: ChannelId::from(args.channel.as_str()),
    };

    let interactive = io::stdin().is_terminal();
    if interactive {
        println!("  {} Storyteller session", "Starting".bold());
        println!("  Type 'help' for commands, 'quit' to exit.\n");
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        if interactive {
            print!("[{}]> ", session.channel);
            io::stdout().flush().map_err(|e| e.to_string())?;
        }

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() || input.starts_with('#') {
            continue;
        }

        match session.process(input) {
            Ok(Step::Continue(output)) => println!("{output}"),
            Ok(Step::Quit) => break,
            Err(e) => println!("{}", e.trim_end().yellow()),
        }
    }

    if let Some(path) = &args.state {
        config::save_initiative(path, &session.tracker.snapshot())?;
    }
    tracing::debug!(
        channels = session.tracker.channel_count(),
        cached = session.estimator.cached(),
        "session ended"
    );
    Ok(())
}
