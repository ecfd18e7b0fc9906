use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::assets::{find_correlation, AssetInput, CorrelationInput};
use super::config::EngineConfig;
use super::matrix;
use super::result::{FrontierPoint, OptimizationOutcome, OptimizationResult};

/// Monte Carlo maximum-Sharpe portfolio search over user-declared assets.
///
/// The risk-free rate and correlation set are fixed at construction. Each
/// optimization call is self-contained: it builds the covariance matrix once,
/// evaluates random long-only weight vectors, keeps the first portfolio with
/// the highest Sharpe ratio and returns a shuffled, capped sample of every
/// evaluated point for plotting.
///
/// The engine does not validate its inputs. Out-of-range correlations or
/// negative volatilities surface as NaN or odd numbers in the output; use
/// [`validate_inputs`](super::validation::validate_inputs) before calling if
/// stricter guarantees are needed.
#[derive(Debug, Clone)]
pub struct MptEngine {
    risk_free_rate: f64,
    correlations: Vec<CorrelationInput>,
    config: EngineConfig,
}

/// Everything the trial loop saw, before the frontier is subsampled.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub best_portfolio: Option<OptimizationResult>,
    /// Every evaluated trial, in evaluation order.
    pub frontier: Vec<FrontierPoint>,
    pub stats: SearchStats,
}

/// Trial counters for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub trials: usize,
    /// Trials whose Sharpe ratio came out NaN (malformed correlations).
    pub nan_trials: usize,
}

impl MptEngine {
    pub fn new(risk_free_rate: f64, correlations: Vec<CorrelationInput>) -> Self {
        Self::with_config(risk_free_rate, correlations, EngineConfig::default())
    }

    pub fn with_config(
        risk_free_rate: f64,
        correlations: Vec<CorrelationInput>,
        config: EngineConfig,
    ) -> Self {
        Self {
            risk_free_rate,
            correlations,
            config,
        }
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn correlations(&self) -> &[CorrelationInput] {
        &self.correlations
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Matrices
    // -----------------------------------------------------------------------

    /// N x N correlation matrix in asset order.
    ///
    /// The diagonal is always exactly 1, whatever the configured correlations
    /// say about an asset and itself. Off-diagonal entries take the first
    /// declared value for the unordered pair, or 0. Since the lookup is by
    /// unordered pair, `m[i][j] == m[j][i]` holds by construction.
    pub fn build_correlation_matrix(&self, assets: &[AssetInput]) -> Vec<Vec<f64>> {
        let n = assets.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                matrix[i][j] = if i == j {
                    1.0
                } else {
                    find_correlation(&self.correlations, &assets[i].id, &assets[j].id)
                        .unwrap_or(0.0)
                };
            }
        }
        matrix
    }

    /// Covariance matrix: correlation scaled by both volatilities. The
    /// diagonal equals `volatility^2`.
    pub fn build_covariance_matrix(&self, assets: &[AssetInput]) -> Vec<Vec<f64>> {
        let correlation = self.build_correlation_matrix(assets);
        let volatilities: Vec<f64> = assets.iter().map(|a| a.volatility).collect();
        matrix::covariance_from_correlation(&correlation, &volatilities)
    }

    // -----------------------------------------------------------------------
    // Portfolio metrics
    // -----------------------------------------------------------------------

    pub fn expected_return(weights: &[f64], expected_returns: &[f64]) -> f64 {
        matrix::expected_return(weights, expected_returns)
    }

    pub fn portfolio_variance(weights: &[f64], covariance: &[Vec<f64>]) -> f64 {
        matrix::portfolio_variance(weights, covariance)
    }

    /// Excess return per unit of volatility.
    ///
    /// Volatility below the configured floor (zero included) yields 0 instead
    /// of an infinite ratio. A NaN volatility is not floored and gives NaN.
    pub fn sharpe_ratio(&self, portfolio_return: f64, portfolio_volatility: f64) -> f64 {
        if portfolio_volatility < self.config.min_volatility {
            return 0.0;
        }
        (portfolio_return - self.risk_free_rate) / portfolio_volatility
    }

    // -----------------------------------------------------------------------
    // Sampling
    // -----------------------------------------------------------------------

    /// `n` uniform draws in [0, 1) divided by their sum.
    ///
    /// This is deliberately not a uniform sample of the simplex: it favours
    /// the centroid, which shapes the plotted frontier. An all-zero draw is
    /// redrawn. `n == 0` returns an empty vector without touching `rng`.
    pub fn generate_random_weights<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }
        loop {
            let draws: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
            let total: f64 = draws.iter().sum();
            if total > 0.0 {
                return draws.into_iter().map(|d| d / total).collect();
            }
            trace!(n, "all-zero weight draw, redrawing");
        }
    }

    // -----------------------------------------------------------------------
    // Optimization
    // -----------------------------------------------------------------------

    /// Optimize with an entropy-seeded random source.
    pub fn optimize_portfolio(
        &self,
        assets: &[AssetInput],
        num_iterations: usize,
    ) -> OptimizationOutcome {
        let mut rng = StdRng::from_entropy();
        self.optimize_portfolio_with_rng(assets, num_iterations, &mut rng)
    }

    /// Optimize drawing every random number from `rng`.
    ///
    /// With identical inputs and an identically seeded `rng` the outcome is
    /// bit-identical. An empty asset list returns immediately without
    /// consuming randomness.
    pub fn optimize_portfolio_with_rng<R: Rng + ?Sized>(
        &self,
        assets: &[AssetInput],
        num_iterations: usize,
        rng: &mut R,
    ) -> OptimizationOutcome {
        self.optimize_with_stats(assets, num_iterations, rng).0
    }

    /// Same as [`optimize_portfolio_with_rng`](Self::optimize_portfolio_with_rng)
    /// but also reports trial counters.
    pub fn optimize_with_stats<R: Rng + ?Sized>(
        &self,
        assets: &[AssetInput],
        num_iterations: usize,
        rng: &mut R,
    ) -> (OptimizationOutcome, SearchStats) {
        if assets.is_empty() {
            return (OptimizationOutcome::empty(), SearchStats::default());
        }

        let n = assets.len();
        let trials = (0..num_iterations).map(|_| Self::generate_random_weights(n, rng));
        let SearchOutcome {
            best_portfolio,
            mut frontier,
            stats,
        } = self.search(assets, trials);

        self.subsample_frontier(&mut frontier, rng);

        debug!(
            assets = n,
            trials = stats.trials,
            nan_trials = stats.nan_trials,
            frontier_points = frontier.len(),
            best_sharpe = best_portfolio.as_ref().map(|p| p.sharpe_ratio),
            "portfolio optimization finished"
        );

        (
            OptimizationOutcome {
                best_portfolio,
                frontier,
            },
            stats,
        )
    }

    /// Evaluate an explicit sequence of weight vectors.
    ///
    /// Every trial is recorded in the returned frontier (not subsampled). The
    /// best portfolio is replaced only on a strictly higher Sharpe ratio, so
    /// ties keep the earliest trial and NaN trials never win. Each weight
    /// vector must have one entry per asset.
    pub fn search<I>(&self, assets: &[AssetInput], trials: I) -> SearchOutcome
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        if assets.is_empty() {
            return SearchOutcome::default();
        }

        let expected_returns: Vec<f64> = assets.iter().map(|a| a.expected_return).collect();
        let covariance = self.build_covariance_matrix(assets);

        let trials = trials.into_iter();
        let mut frontier = Vec::with_capacity(trials.size_hint().0);
        let mut best_sharpe = f64::NEG_INFINITY;
        let mut best_portfolio: Option<OptimizationResult> = None;
        let mut stats = SearchStats::default();

        for weights in trials {
            let ret = Self::expected_return(&weights, &expected_returns);
            // sqrt of a negative variance is NaN and is left to propagate.
            let vol = Self::portfolio_variance(&weights, &covariance).sqrt();
            let sharpe = self.sharpe_ratio(ret, vol);

            stats.trials += 1;
            if sharpe.is_nan() {
                stats.nan_trials += 1;
            }

            frontier.push(FrontierPoint {
                expected_return: ret,
                volatility: vol,
                sharpe_ratio: sharpe,
            });

            if sharpe > best_sharpe {
                best_sharpe = sharpe;
                best_portfolio = Some(OptimizationResult::from_weights(
                    assets, weights, ret, vol, sharpe,
                ));
            }
        }

        SearchOutcome {
            best_portfolio,
            frontier,
            stats,
        }
    }

    /// Shuffle the frontier (Fisher-Yates) and keep at most
    /// `frontier_sample_size` points.
    pub fn subsample_frontier<R: Rng + ?Sized>(
        &self,
        frontier: &mut Vec<FrontierPoint>,
        rng: &mut R,
    ) {
        frontier.shuffle(rng);
        frontier.truncate(self.config.frontier_sample_size);
    }
}
