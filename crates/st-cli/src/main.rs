//! CLI frontend for the Storyteller dice engine.

mod commands;
mod config;
mod render;
mod syntax;

use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use commands::init::InitArgs;
use commands::prob::ProbArgs;
use commands::roll::RollArgs;
use commands::session::SessionArgs;
use commands::settings::SettingsArgs;

#[derive(Parser)]
#[command(
    name = "st",
    about = "Storyteller: World of Darkness dice, initiative, and odds",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log dispatch decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a dice pool (`5 6 +1 Brawl`) or a traditional expression (`2d6+3`)
    Roll(RollArgs),

    /// Show the odds of reaching a number of successes
    Prob(ProbArgs),

    /// Manage a channel's initiative table
    Init(InitArgs),

    /// Show or change roll settings
    Settings(SettingsArgs),

    /// Read commands from stdin, keeping initiative and odds between lines
    Session(SessionArgs),
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    // RUST_LOG wins over --verbose when set.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Roll(args) => commands::roll::run(&args),
        Commands::Prob(args) => commands::prob::run(&args),
        Commands::Init(args) => commands::init::run(&args),
        Commands::Settings(args) => commands::settings::run(&args),
        Commands::Session(args) => commands::session::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
