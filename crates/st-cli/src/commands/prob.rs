use clap::Args;

use st_mechanics::probability::DEFAULT_ITERATIONS;
use st_mechanics::{Estimation, ProbabilityEstimator};

use crate::render;

/// A single odds question.
#[derive(Args, Debug, Clone)]
pub struct ProbQuery {
    /// Dice in the pool (1-100)
    pub pool: i32,

    /// Difficulty (2-10)
    pub difficulty: i32,

    /// Successes needed
    pub target: i32,

    /// Print the numbers as JSON
    #[arg(long)]
    pub json: bool,
}

/// How odds are computed.
#[derive(Args, Debug, Clone)]
pub struct EstimationArgs {
    /// Simulate rolls instead of computing exact odds
    #[arg(long)]
    pub monte_carlo: bool,

    /// Rolls to simulate per question
    #[arg(
        long,
        default_value_t = DEFAULT_ITERATIONS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub iterations: u64,

    /// RNG seed for simulated rolls
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

impl EstimationArgs {
    pub fn estimator(&self) -> ProbabilityEstimator {
        let strategy = if self.monte_carlo {
            Estimation::MonteCarlo {
                iterations: self.iterations,
                seed: self.seed,
            }
        } else {
            Estimation::Exact
        };
        tracing::debug!(?strategy, "probability strategy");
        ProbabilityEstimator::with_strategy(strategy)
    }
}

#[derive(Args, Debug)]
pub struct ProbArgs {
    #[command(flatten)]
    pub query: ProbQuery,

    #[command(flatten)]
    pub estimation: EstimationArgs,
}

pub fn run(args: &ProbArgs) -> Result<(), String> {
    let estimator = args.estimation.estimator();
    print!("{}", execute(&args.query, &estimator)?);
    Ok(())
}

/// Answer one query, returning the rendered output.
pub fn execute(query: &ProbQuery, estimator: &ProbabilityEstimator) -> Result<String, String> {
    let record = estimator
        .get(query.pool, query.difficulty, query.target)
        .map_err(|e| e.to_string())?;

    if query.json {
        let json = serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?;
        return Ok(format!("{json}\n"));
    }
    Ok(render::probability(
        query.pool,
        query.difficulty,
        query.target,
        &record,
    ))
}
