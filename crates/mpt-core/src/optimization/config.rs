use serde::{Deserialize, Serialize};

/// Number of frontier points kept for display after subsampling.
pub const DEFAULT_FRONTIER_SAMPLE_SIZE: usize = 5_000;

/// Volatility below which the Sharpe ratio is reported as zero.
pub const DEFAULT_MIN_VOLATILITY: f64 = 1e-4;

/// Monte Carlo trials per optimization when the JSON input does not say.
pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Tunables of an [`MptEngine`](super::MptEngine). Fixed for the engine's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Maximum number of frontier points returned.
    pub frontier_sample_size: usize,
    /// Sharpe floor on portfolio volatility.
    pub min_volatility: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frontier_sample_size: DEFAULT_FRONTIER_SAMPLE_SIZE,
            min_volatility: DEFAULT_MIN_VOLATILITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.frontier_sample_size, 5_000);
        assert_eq!(cfg.min_volatility, 1e-4);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"frontierSampleSize": 250}"#).unwrap();
        assert_eq!(cfg.frontier_sample_size, 250);
        assert_eq!(cfg.min_volatility, DEFAULT_MIN_VOLATILITY);
    }
}
