use serde::{Deserialize, Serialize};

use super::assets::AssetInput;

/// Per-asset view of an allocation, joined with the asset's inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocation {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub expected_return: f64,
    pub volatility: f64,
}

/// The best portfolio found by an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// Weights in input asset order.
    pub weights: Vec<f64>,
    pub expected_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub assets: Vec<AssetAllocation>,
}

impl OptimizationResult {
    /// Build the denormalized result for `weights` over `assets`.
    pub fn from_weights(
        assets: &[AssetInput],
        weights: Vec<f64>,
        expected_return: f64,
        volatility: f64,
        sharpe_ratio: f64,
    ) -> Self {
        let allocations = assets
            .iter()
            .zip(weights.iter())
            .map(|(asset, w)| AssetAllocation {
                id: asset.id.clone(),
                name: asset.name.clone(),
                weight: *w,
                expected_return: asset.expected_return,
                volatility: asset.volatility,
            })
            .collect();

        Self {
            weights,
            expected_return,
            volatility,
            sharpe_ratio,
            assets: allocations,
        }
    }

    /// Largest single-asset weight, or 0 for an empty allocation.
    pub fn max_weight(&self) -> f64 {
        self.weights.iter().copied().fold(0.0, f64::max)
    }
}

/// One sampled portfolio, used only for plotting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontierPoint {
    pub expected_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
}

/// Output of a single Monte Carlo optimization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOutcome {
    pub best_portfolio: Option<OptimizationResult>,
    pub frontier: Vec<FrontierPoint>,
}

impl OptimizationOutcome {
    /// The result for an empty asset list.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_weights_joins_asset_data() {
        let assets = vec![
            AssetInput::new("K-FIXED", "Fixed Income Fund", 0.03, 0.02),
            AssetInput::new("K-EQ", "Equity Fund", 0.09, 0.18),
        ];
        let r = OptimizationResult::from_weights(&assets, vec![0.6, 0.4], 0.054, 0.08, 0.425);
        assert_eq!(r.assets.len(), 2);
        assert_eq!(r.assets[1].id, "K-EQ");
        assert_eq!(r.assets[1].name, "Equity Fund");
        assert_eq!(r.assets[1].weight, 0.4);
        assert_eq!(r.assets[1].volatility, 0.18);
        assert_eq!(r.max_weight(), 0.6);
    }

    #[test]
    fn test_empty_outcome_serializes_null_best() {
        let value = serde_json::to_value(OptimizationOutcome::empty()).unwrap();
        assert!(value["bestPortfolio"].is_null());
        assert_eq!(value["frontier"], serde_json::json!([]));
    }
}
