use std::path::PathBuf;

use clap::Args;

use st_mechanics::{DieSource, PoolRequest, RollOptions, RollSettings, evaluate_pool};

use crate::config::{self, DEFAULT_SETTINGS_FILE};
use crate::render::{self, PoolView};
use crate::syntax::{self, Syntax};

/// What to roll and how.
#[derive(Args, Debug, Clone)]
pub struct RollRequest {
    /// Spend Willpower
    #[arg(short, long)]
    pub willpower: bool,

    /// Chronicles of Darkness rules; the difficulty slot is the X-again target
    #[arg(short, long)]
    pub chronicles: bool,

    /// Zero botch: the roll cannot botch
    #[arg(short = 'z', long)]
    pub never_botch: bool,

    /// Ignore ones (needs `nullify_ones` and implies --never-botch)
    #[arg(short, long)]
    pub ignore_ones: bool,

    /// Let ones cancel the Willpower success
    #[arg(long)]
    pub wp_cancelable: bool,

    /// Compact output
    #[arg(long)]
    pub compact: bool,

    /// Text shown with the result
    #[arg(long)]
    pub comment: Option<String>,

    /// Roll a chance die: 1d10 that succeeds on 10 and botches on 1
    #[arg(long, conflicts_with = "syntax")]
    pub chance: bool,

    /// Roll syntax, e.g. `5 6 +1 Brawl`, `7@8`, or `2d6+3`
    #[arg(
        required_unless_present = "chance",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub syntax: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RollArgs {
    #[command(flatten)]
    pub request: RollRequest,

    /// RNG seed for reproducible rolls
    #[arg(long)]
    pub seed: Option<u64>,

    /// Settings file (missing means defaults)
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,
}

pub fn run(args: &RollArgs) -> Result<(), String> {
    let settings = config::load_settings(&args.settings)?;
    let mut dice = super::dice_for(args.seed);
    print!("{}", execute(&args.request, &settings, &mut dice)?);
    Ok(())
}

const CHANCE_COMMENT: &str = "Chance roll. Succeed on 10, botch on 1.";

/// Classify, resolve, and roll a request, returning the rendered output.
pub fn execute(
    request: &RollRequest,
    settings: &RollSettings,
    dice: &mut impl DieSource,
) -> Result<String, String> {
    let line = request.syntax.join(" ");
    let (syntax, inline_comment) = syntax::split_comment(&line);
    let comment = request.comment.as_deref().or(inline_comment);
    let compact = request.compact || settings.use_compact;

    if request.chance {
        // Server rules other than compact output do not apply.
        let options = RollOptions::chance();
        let result = evaluate_pool(&options, dice).map_err(|e| e.to_string())?;
        let view = PoolView {
            options: &options,
            result: &result,
            specialty: None,
            comment: Some(request.comment.as_deref().unwrap_or(CHANCE_COMMENT)),
        };
        return Ok(render::pool(&view, compact));
    }

    match syntax::classify(syntax)? {
        Syntax::Pool(pool) => {
            let pool_request = PoolRequest {
                pool: pool.pool,
                difficulty: pool.difficulty,
                auto_successes: pool.auto_successes,
                specialty: pool.specialty.clone(),
                willpower: request.willpower,
                chronicles: request.chronicles,
                never_botch: request.never_botch || request.ignore_ones,
                ignore_ones: request.ignore_ones,
                willpower_cancelable: request.wp_cancelable,
            };
            let options = settings
                .resolve(&pool_request)
                .map_err(|e| e.to_string())?;
            tracing::debug!(?options, "resolved pool options");

            let result = evaluate_pool(&options, dice).map_err(|e| e.to_string())?;
            let view = PoolView {
                options: &options,
                result: &result,
                specialty: pool.specialty.as_deref(),
                comment,
            };
            Ok(render::pool(&view, compact))
        }
        Syntax::Traditional(expression) => {
            let result = expression.evaluate(dice);
            Ok(render::traditional(
                &expression.to_string(),
                &result,
                comment,
                compact,
            ))
        }
    }
}
