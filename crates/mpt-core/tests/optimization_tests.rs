use mpt_core::optimization::api::{self, OptimizationInput};
use mpt_core::optimization::{AssetInput, CorrelationInput, EngineConfig, MptEngine};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ===========================================================================
// End-to-end behaviour of the Monte Carlo maximum-Sharpe search.
// ===========================================================================

fn two_asset_scenario() -> (MptEngine, Vec<AssetInput>) {
    let engine = MptEngine::new(0.02, vec![CorrelationInput::new("A", "B", 0.0)]);
    let assets = vec![
        AssetInput::new("A", "Asset A", 0.05, 0.10),
        AssetInput::new("B", "Asset B", 0.08, 0.20),
    ];
    (engine, assets)
}

fn thai_fund_universe() -> (Vec<AssetInput>, Vec<CorrelationInput>) {
    let assets = vec![
        AssetInput::new("SET50", "SET50 Index Fund", 0.075, 0.19),
        AssetInput::new("TGB", "Thai Government Bond Fund", 0.025, 0.03),
        AssetInput::new("GOLD", "Gold Fund", 0.045, 0.14),
        AssetInput::new("GLEQ", "Global Equity Fund", 0.085, 0.16),
        AssetInput::new("REIT", "Property Fund", 0.06, 0.12),
    ];
    let correlations = vec![
        CorrelationInput::new("SET50", "TGB", -0.1),
        CorrelationInput::new("SET50", "GLEQ", 0.6),
        CorrelationInput::new("GLEQ", "GOLD", 0.05),
        CorrelationInput::new("REIT", "SET50", 0.45),
        CorrelationInput::new("TGB", "REIT", 0.2),
    ];
    (assets, correlations)
}

// ---------------------------------------------------------------------------
// Convergence
// ---------------------------------------------------------------------------

#[test]
fn test_two_asset_convergence_across_seeds() {
    // Zero correlation tangency portfolio: w ~ Sigma^-1 (mu - rf) = [3, 1.5],
    // so w_A = 2/3, return 6%, volatility sqrt(0.08/9), Sharpe ~0.42426.
    let analytic_sharpe = 0.04 / (0.08_f64 / 9.0).sqrt();
    let (engine, assets) = two_asset_scenario();

    let mut sharpes = Vec::new();
    for seed in 0..10_u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let out = engine.optimize_portfolio_with_rng(&assets, 100_000, &mut rng);
        let best = out.best_portfolio.expect("best portfolio");
        assert!(
            best.sharpe_ratio <= analytic_sharpe + 1e-9,
            "seed {seed}: sharpe {} beats analytic {analytic_sharpe}",
            best.sharpe_ratio
        );
        assert!(
            (best.weights[0] - 2.0 / 3.0).abs() < 0.05,
            "seed {seed}: weight A = {}",
            best.weights[0]
        );
        assert_eq!(out.frontier.len(), 5_000);
        sharpes.push(best.sharpe_ratio);
    }

    let min = sharpes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sharpes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!((max - min) / max < 0.05, "spread {min}..{max}");
    assert!((min - analytic_sharpe).abs() / analytic_sharpe < 0.01);
}

#[test]
fn test_best_portfolio_beats_every_single_asset() {
    let (assets, correlations) = thai_fund_universe();
    let engine = MptEngine::new(0.02, correlations);
    let mut rng = StdRng::seed_from_u64(2024);
    let out = engine.optimize_portfolio_with_rng(&assets, 50_000, &mut rng);
    let best = out.best_portfolio.unwrap();

    // Diversification should at least match the best equal-weight portfolio.
    let cov = engine.build_covariance_matrix(&assets);
    let returns: Vec<f64> = assets.iter().map(|a| a.expected_return).collect();
    let equal = vec![0.2; 5];
    let eq_sharpe = engine.sharpe_ratio(
        MptEngine::expected_return(&equal, &returns),
        MptEngine::portfolio_variance(&equal, &cov).sqrt(),
    );
    assert!(best.sharpe_ratio > eq_sharpe);

    let total: f64 = best.weights.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(
        best.assets.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
        vec!["SET50", "TGB", "GOLD", "GLEQ", "REIT"]
    );
}

// ---------------------------------------------------------------------------
// Determinism and invariants
// ---------------------------------------------------------------------------

#[test]
fn test_seeded_runs_are_bit_identical() {
    let (assets, correlations) = thai_fund_universe();
    let engine = MptEngine::new(0.02, correlations);
    let a = engine.optimize_portfolio_with_rng(&assets, 10_000, &mut StdRng::seed_from_u64(9));
    let b = engine.optimize_portfolio_with_rng(&assets, 10_000, &mut StdRng::seed_from_u64(9));
    assert_eq!(a, b);
}

#[test]
fn test_different_seeds_differ() {
    let (assets, correlations) = thai_fund_universe();
    let engine = MptEngine::new(0.02, correlations);
    let a = engine.optimize_portfolio_with_rng(&assets, 1_000, &mut StdRng::seed_from_u64(1));
    let b = engine.optimize_portfolio_with_rng(&assets, 1_000, &mut StdRng::seed_from_u64(2));
    assert!(a.best_portfolio.unwrap().weights != b.best_portfolio.unwrap().weights);
}

#[test]
fn test_correlation_matrix_symmetric_for_random_inputs() {
    let mut rng = StdRng::seed_from_u64(77);
    let ids = ["A", "B", "C", "D", "E", "F"];
    let assets: Vec<AssetInput> = ids
        .iter()
        .map(|id| AssetInput::new(*id, *id, 0.05, 0.1))
        .collect();

    for _ in 0..50 {
        // Random, possibly duplicated, possibly self-referencing entries.
        let correlations: Vec<CorrelationInput> = (0..12)
            .map(|_| {
                let a = ids[rng.gen_range(0..ids.len())];
                let b = ids[rng.gen_range(0..ids.len())];
                CorrelationInput::new(a, b, rng.gen_range(-1.0..=1.0))
            })
            .collect();
        let engine = MptEngine::new(0.02, correlations);
        let m = engine.build_correlation_matrix(&assets);
        for i in 0..ids.len() {
            assert_eq!(m[i][i], 1.0);
            for j in 0..ids.len() {
                assert_eq!(m[i][j], m[j][i]);
            }
        }
        let cov = engine.build_covariance_matrix(&assets);
        for (i, a) in assets.iter().enumerate() {
            assert_eq!(cov[i][i], a.volatility * a.volatility);
        }
    }
}

#[test]
fn test_frontier_count_matches_iterations_under_cap() {
    let (engine, assets) = two_asset_scenario();
    for iterations in [1_usize, 10, 100, 4_999, 5_000] {
        let out =
            engine.optimize_portfolio_with_rng(&assets, iterations, &mut StdRng::seed_from_u64(3));
        assert_eq!(out.frontier.len(), iterations.min(5_000));
    }
    let out = engine.optimize_portfolio_with_rng(&assets, 5_001, &mut StdRng::seed_from_u64(3));
    assert_eq!(out.frontier.len(), 5_000);
}

#[test]
fn test_custom_frontier_cap() {
    let (assets, correlations) = thai_fund_universe();
    let config = EngineConfig {
        frontier_sample_size: 10,
        ..EngineConfig::default()
    };
    let engine = MptEngine::with_config(0.02, correlations, config);
    let out = engine.optimize_portfolio_with_rng(&assets, 1_000, &mut StdRng::seed_from_u64(5));
    assert_eq!(out.frontier.len(), 10);
}

#[test]
fn test_zero_volatility_asset() {
    // A risk-free asset alone has Sharpe 0 by the volatility floor.
    let engine = MptEngine::new(0.02, vec![]);
    let assets = vec![AssetInput::new("CASH", "Money Market", 0.02, 0.0)];
    let out = engine.optimize_portfolio_with_rng(&assets, 50, &mut StdRng::seed_from_u64(1));
    let best = out.best_portfolio.unwrap();
    assert_eq!(best.sharpe_ratio, 0.0);
    assert_eq!(best.weights, vec![1.0]);
}

#[test]
fn test_ensemble_average_is_stable() {
    let (engine, assets) = two_asset_scenario();
    let mut rng = StdRng::seed_from_u64(11);
    let avg = engine
        .run_multiple_optimizations_and_average_with_rng(&assets, 5, 20_000, &mut rng)
        .unwrap();
    assert!((avg.weights[0] - 2.0 / 3.0).abs() < 0.05);
    assert!((avg.sharpe_ratio - 0.4243).abs() < 0.005);
}

// ---------------------------------------------------------------------------
// JSON API
// ---------------------------------------------------------------------------

#[test]
fn test_api_round_trip_through_json() {
    let json = r#"{
        "riskFreeRate": 0.02,
        "assets": [
            {"id": "A", "name": "Asset A", "expectedReturn": 0.05, "volatility": 0.10},
            {"id": "B", "name": "Asset B", "expectedReturn": 0.08, "volatility": 0.20}
        ],
        "correlations": [{"asset1Id": "B", "asset2Id": "A", "value": 0.0}],
        "numIterations": 500,
        "seed": 42
    }"#;
    let input: OptimizationInput = serde_json::from_str(json).unwrap();
    let first = api::optimize(&input).unwrap();
    let second = api::optimize(&input).unwrap();
    assert_eq!(first.result.outcome, second.result.outcome);

    let value = serde_json::to_value(&first).unwrap();
    assert_eq!(value["result"]["numAssets"], 2);
    assert_eq!(value["result"]["frontier"].as_array().unwrap().len(), 500);
    assert_eq!(
        value["result"]["bestPortfolio"]["assets"][1]["name"],
        "Asset B"
    );
    assert_eq!(value["methodology"], "Monte Carlo Maximum-Sharpe Portfolio Search");
}

#[test]
fn test_api_nan_points_serialize_as_null() {
    let input = OptimizationInput {
        risk_free_rate: 0.02,
        assets: vec![
            AssetInput::new("A", "Asset A", 0.05, 0.10),
            AssetInput::new("B", "Asset B", 0.08, 0.20),
        ],
        correlations: vec![CorrelationInput::new("A", "B", -3.0)],
        num_iterations: 200,
        seed: Some(1),
        frontier_sample_size: None,
        validate: false,
    };
    let result = api::optimize(&input).unwrap();
    let value = serde_json::to_value(&result).unwrap();
    let points = value["result"]["frontier"].as_array().unwrap();
    assert!(points.iter().any(|p| p["volatility"].is_null()));
}
