use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info_span, warn};

use super::assets::{AssetInput, CorrelationInput};
use super::config::{EngineConfig, DEFAULT_ITERATIONS};
use super::engine::MptEngine;
use super::ensemble::EnsembleStats;
use super::result::{OptimizationOutcome, OptimizationResult};
use super::validation::validate_inputs;
use crate::error::MptError;
use crate::types::{with_metadata, ComputationOutput};
use crate::MptResult;

/// Single-asset weight above which the allocation is flagged as concentrated.
const CONCENTRATION_WARNING: f64 = 0.80;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a single Monte Carlo optimization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationInput {
    /// Annual risk-free rate as a decimal fraction.
    pub risk_free_rate: f64,
    pub assets: Vec<AssetInput>,
    #[serde(default)]
    pub correlations: Vec<CorrelationInput>,
    /// Number of random portfolios to evaluate.
    #[serde(default = "default_iterations")]
    pub num_iterations: usize,
    /// Optional seed for reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Override for the frontier display cap.
    #[serde(default)]
    pub frontier_sample_size: Option<usize>,
    /// Run the strict input checks first.
    #[serde(default = "default_validate")]
    pub validate: bool,
}

/// Input for an ensemble of independent optimizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleInput {
    pub risk_free_rate: f64,
    pub assets: Vec<AssetInput>,
    #[serde(default)]
    pub correlations: Vec<CorrelationInput>,
    #[serde(default = "default_num_runs")]
    pub num_runs: usize,
    #[serde(default = "default_iterations")]
    pub iterations_per_run: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_validate")]
    pub validate: bool,
}

/// Input for the validation-only entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationInput {
    pub risk_free_rate: f64,
    pub assets: Vec<AssetInput>,
    #[serde(default)]
    pub correlations: Vec<CorrelationInput>,
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_num_runs() -> usize {
    10
}

fn default_validate() -> bool {
    true
}

/// Output of [`optimize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOutput {
    #[serde(flatten)]
    pub outcome: OptimizationOutcome,
    pub num_assets: usize,
    pub num_iterations: usize,
    pub frontier_points: usize,
    /// Trials whose Sharpe ratio was NaN.
    pub nan_trials: usize,
}

/// Output of [`run_ensemble`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleOutput {
    /// Averaged best portfolio, `None` when no run succeeded.
    pub average: Option<OptimizationResult>,
    pub requested_runs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<EnsembleStats>,
}

/// Output of [`validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutput {
    pub valid: bool,
    pub num_assets: usize,
    pub num_correlations: usize,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run one Monte Carlo maximum-Sharpe optimization.
///
/// An empty asset list is not an error: the result carries a null best
/// portfolio and an empty frontier, plus a warning.
pub fn optimize(input: &OptimizationInput) -> MptResult<ComputationOutput<OptimizationOutput>> {
    let span = info_span!(
        "optimize",
        assets = input.assets.len(),
        iterations = input.num_iterations
    );
    let _guard = span.enter();
    let start = Instant::now();

    if input.num_iterations == 0 {
        return Err(MptError::invalid("num_iterations", "Must be at least 1"));
    }
    if input.frontier_sample_size == Some(0) {
        return Err(MptError::invalid("frontier_sample_size", "Must be at least 1"));
    }

    let mut warnings = if input.validate {
        validate_inputs(input.risk_free_rate, &input.assets, &input.correlations)?
    } else {
        Vec::new()
    };

    let mut config = EngineConfig::default();
    if let Some(cap) = input.frontier_sample_size {
        config.frontier_sample_size = cap;
    }
    let engine = MptEngine::with_config(input.risk_free_rate, input.correlations.clone(), config);

    let mut rng = seeded_rng(input.seed);
    let (outcome, stats) =
        engine.optimize_with_stats(&input.assets, input.num_iterations, &mut rng);

    if input.assets.is_empty() {
        warnings.push("No assets supplied; nothing to optimize".into());
    }
    if stats.nan_trials > 0 {
        warn!(nan_trials = stats.nan_trials, "trials produced NaN volatility");
        warnings.push(format!(
            "{} of {} trials produced NaN volatility (inconsistent correlations)",
            stats.nan_trials, stats.trials
        ));
    }
    if let Some(best) = &outcome.best_portfolio {
        warnings.extend(concentration_warnings(best));
    } else if !input.assets.is_empty() {
        warnings.push("No trial produced a finite Sharpe ratio".into());
    }

    let output = OptimizationOutput {
        num_assets: input.assets.len(),
        num_iterations: input.num_iterations,
        frontier_points: outcome.frontier.len(),
        nan_trials: stats.nan_trials,
        outcome,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monte Carlo Maximum-Sharpe Portfolio Search",
        &serde_json::json!({
            "risk_free_rate": input.risk_free_rate,
            "num_assets": input.assets.len(),
            "num_correlations": input.correlations.len(),
            "num_iterations": input.num_iterations,
            "frontier_sample_size": engine.config().frontier_sample_size,
            "weight_sampling": "uniform draws normalized by their sum",
            "seed": input.seed,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Run several independent optimizations and average their optima.
pub fn run_ensemble(input: &EnsembleInput) -> MptResult<ComputationOutput<EnsembleOutput>> {
    let span = info_span!("ensemble", assets = input.assets.len(), runs = input.num_runs);
    let _guard = span.enter();
    let start = Instant::now();

    if input.num_runs == 0 {
        return Err(MptError::invalid("num_runs", "Must be at least 1"));
    }
    if input.iterations_per_run == 0 {
        return Err(MptError::invalid("iterations_per_run", "Must be at least 1"));
    }

    let mut warnings = if input.validate {
        validate_inputs(input.risk_free_rate, &input.assets, &input.correlations)?
    } else {
        Vec::new()
    };

    let engine = MptEngine::new(input.risk_free_rate, input.correlations.clone());
    let mut rng = seeded_rng(input.seed);
    let members = engine.run_ensemble_members(
        &input.assets,
        input.num_runs,
        input.iterations_per_run,
        &mut rng,
    );
    let average = super::ensemble::average_results(&input.assets, &members);
    let stats = EnsembleStats::from_results(&members);

    if members.len() < input.num_runs {
        warnings.push(format!(
            "{} of {} runs produced no best portfolio",
            input.num_runs - members.len(),
            input.num_runs
        ));
    }
    if let Some(s) = &stats {
        if s.sharpe_mean.abs() > f64::EPSILON && s.sharpe_std_dev / s.sharpe_mean.abs() > 0.05 {
            warnings.push(format!(
                "Best Sharpe ratio varies by more than 5% across runs (std dev {:.4}); \
                 consider more iterations per run",
                s.sharpe_std_dev
            ));
        }
    }

    let output = EnsembleOutput {
        average,
        requested_runs: input.num_runs,
        stats,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Ensemble Average of Monte Carlo Maximum-Sharpe Searches",
        &serde_json::json!({
            "risk_free_rate": input.risk_free_rate,
            "num_assets": input.assets.len(),
            "num_runs": input.num_runs,
            "iterations_per_run": input.iterations_per_run,
            "averaging": "element-wise weights; arithmetic mean of each run's realized metrics",
            "seed": input.seed,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Run the strict input checks without optimizing.
pub fn validate(input: &ValidationInput) -> MptResult<ComputationOutput<ValidationOutput>> {
    let start = Instant::now();
    let warnings = validate_inputs(input.risk_free_rate, &input.assets, &input.correlations)?;

    let output = ValidationOutput {
        valid: true,
        num_assets: input.assets.len(),
        num_correlations: input.correlations.len(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Input Validation",
        &serde_json::json!({
            "correlation_range": [-1.0, 1.0],
            "positive_semi_definite_check": true,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

fn concentration_warnings(best: &OptimizationResult) -> Vec<String> {
    if best.assets.len() < 2 || best.max_weight() <= CONCENTRATION_WARNING {
        return Vec::new();
    }
    best.assets
        .iter()
        .filter(|a| a.weight > CONCENTRATION_WARNING)
        .map(|a| format!("Concentrated allocation: {} has weight {:.4}", a.name, a.weight))
        .collect()
}
