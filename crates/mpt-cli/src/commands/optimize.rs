use clap::Args;
use serde_json::Value;

use mpt_core::optimization::api::{self, EnsembleInput, OptimizationInput};

use crate::config::{override_value, CliConfig};
use crate::input;

/// Arguments for a single maximum-Sharpe search
#[derive(Args)]
pub struct OptimizeArgs {
    /// Path to JSON input file (riskFreeRate, assets, correlations)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual risk-free rate, overriding the input file
    #[arg(long, allow_hyphen_values = true)]
    pub risk_free_rate: Option<f64>,

    /// Number of random portfolios to evaluate
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Seed for a reproducible search
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum number of frontier points returned
    #[arg(long)]
    pub frontier_sample_size: Option<usize>,

    /// Skip the strict input checks
    #[arg(long)]
    pub no_validate: bool,
}

/// Arguments for an averaged ensemble of searches
#[derive(Args)]
pub struct EnsembleArgs {
    /// Path to JSON input file (riskFreeRate, assets, correlations)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual risk-free rate, overriding the input file
    #[arg(long, allow_hyphen_values = true)]
    pub risk_free_rate: Option<f64>,

    /// Number of independent runs
    #[arg(long)]
    pub runs: Option<usize>,

    /// Random portfolios evaluated in each run
    #[arg(long)]
    pub iterations_per_run: Option<usize>,

    /// Seed for a reproducible ensemble
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the strict input checks
    #[arg(long)]
    pub no_validate: bool,
}

pub fn run_optimize(
    args: OptimizeArgs,
    config: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut data = input::read_value(args.input.as_deref(), "portfolio optimization")?;
    config.apply_defaults(&mut data);
    override_value(&mut data, "riskFreeRate", args.risk_free_rate);
    override_value(&mut data, "numIterations", args.iterations);
    override_value(&mut data, "seed", args.seed);
    override_value(&mut data, "frontierSampleSize", args.frontier_sample_size);
    if args.no_validate {
        override_value(&mut data, "validate", Some(false));
    }

    let opt_input: OptimizationInput = serde_json::from_value(data)?;
    let result = api::optimize(&opt_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_ensemble(
    args: EnsembleArgs,
    config: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut data = input::read_value(args.input.as_deref(), "ensemble optimization")?;
    config.apply_defaults(&mut data);
    override_value(&mut data, "riskFreeRate", args.risk_free_rate);
    override_value(&mut data, "numRuns", args.runs);
    override_value(&mut data, "iterationsPerRun", args.iterations_per_run);
    override_value(&mut data, "seed", args.seed);
    if args.no_validate {
        override_value(&mut data, "validate", Some(false));
    }

    let ens_input: EnsembleInput = serde_json::from_value(data)?;
    let result = api::run_ensemble(&ens_input)?;
    Ok(serde_json::to_value(result)?)
}
