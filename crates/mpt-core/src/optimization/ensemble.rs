use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use super::assets::AssetInput;
use super::engine::MptEngine;
use super::result::OptimizationResult;

/// Spread of the best Sharpe ratio across independent runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleStats {
    pub successful_runs: usize,
    pub sharpe_mean: f64,
    /// Sample standard deviation; 0 with fewer than two runs.
    pub sharpe_std_dev: f64,
    pub sharpe_min: f64,
    pub sharpe_max: f64,
}

impl EnsembleStats {
    pub fn from_results(results: &[OptimizationResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        let sharpes: Vec<f64> = results.iter().map(|r| r.sharpe_ratio).collect();
        let sharpe_std_dev = if sharpes.len() < 2 {
            0.0
        } else {
            sharpes.iter().std_dev()
        };
        Some(Self {
            successful_runs: sharpes.len(),
            sharpe_mean: sharpes.iter().mean(),
            sharpe_std_dev,
            sharpe_min: Statistics::min(sharpes.iter()),
            sharpe_max: Statistics::max(sharpes.iter()),
        })
    }
}

impl MptEngine {
    /// Average the best portfolios of `num_runs` independent optimizations,
    /// each drawing from a fresh entropy-seeded source.
    pub fn run_multiple_optimizations_and_average(
        &self,
        assets: &[AssetInput],
        num_runs: usize,
        iters_per_run: usize,
    ) -> Option<OptimizationResult> {
        let mut rng = StdRng::from_entropy();
        self.run_multiple_optimizations_and_average_with_rng(
            assets,
            num_runs,
            iters_per_run,
            &mut rng,
        )
    }

    pub fn run_multiple_optimizations_and_average_with_rng<R: Rng + ?Sized>(
        &self,
        assets: &[AssetInput],
        num_runs: usize,
        iters_per_run: usize,
        rng: &mut R,
    ) -> Option<OptimizationResult> {
        let members = self.run_ensemble_members(assets, num_runs, iters_per_run, rng);
        average_results(assets, &members)
    }

    /// Best portfolio of each run, skipping runs that found none.
    pub fn run_ensemble_members<R: Rng + ?Sized>(
        &self,
        assets: &[AssetInput],
        num_runs: usize,
        iters_per_run: usize,
        rng: &mut R,
    ) -> Vec<OptimizationResult> {
        let members: Vec<OptimizationResult> = (0..num_runs)
            .filter_map(|_| {
                self.optimize_portfolio_with_rng(assets, iters_per_run, rng)
                    .best_portfolio
            })
            .collect();
        debug!(
            requested_runs = num_runs,
            successful_runs = members.len(),
            iters_per_run,
            "ensemble runs finished"
        );
        members
    }
}

/// Element-wise mean of the weights and arithmetic mean of each run's
/// realized return, volatility and Sharpe ratio.
///
/// The metrics are the average of each optimum's own metrics, not the metrics
/// of the averaged weight vector; the two generally differ. Returns `None`
/// when `results` is empty.
pub fn average_results(
    assets: &[AssetInput],
    results: &[OptimizationResult],
) -> Option<OptimizationResult> {
    if results.is_empty() {
        return None;
    }
    let count = results.len() as f64;
    let n = assets.len();

    let mut weights = vec![0.0; n];
    let mut expected_return = 0.0;
    let mut volatility = 0.0;
    let mut sharpe_ratio = 0.0;

    for r in results {
        for (acc, w) in weights.iter_mut().zip(r.weights.iter()) {
            *acc += w;
        }
        expected_return += r.expected_return;
        volatility += r.volatility;
        sharpe_ratio += r.sharpe_ratio;
    }

    for w in &mut weights {
        *w /= count;
    }

    Some(OptimizationResult::from_weights(
        assets,
        weights,
        expected_return / count,
        volatility / count,
        sharpe_ratio / count,
    ))
}
