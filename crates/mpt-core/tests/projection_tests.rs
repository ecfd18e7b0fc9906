#![cfg(all(feature = "optimization", feature = "projection"))]

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use mpt_core::optimization::api::{optimize, OptimizationInput};
use mpt_core::optimization::{AssetInput, CorrelationInput};
use mpt_core::projection::growth::{project_growth, ProjectionInput};

fn optimized_input() -> OptimizationInput {
    OptimizationInput {
        risk_free_rate: 0.0175,
        assets: vec![
            AssetInput::new("K-EQ", "Thai Equity Fund", 0.085, 0.19),
            AssetInput::new("K-BOND", "Thai Bond Fund", 0.028, 0.035),
            AssetInput::new("K-GOLD", "Gold Fund", 0.055, 0.14),
        ],
        correlations: vec![
            CorrelationInput::new("K-EQ", "K-BOND", -0.1),
            CorrelationInput::new("K-EQ", "K-GOLD", 0.05),
            CorrelationInput::new("K-BOND", "K-GOLD", 0.2),
        ],
        num_iterations: 5_000,
        seed: Some(11),
        frontier_sample_size: None,
        validate: true,
    }
}

#[test]
fn test_best_portfolio_projects_between_bands() {
    let optimized = optimize(&optimized_input()).unwrap();
    let best = optimized.result.outcome.best_portfolio.unwrap();

    let input = ProjectionInput::from_portfolio(&best, dec!(100000), 10).unwrap();
    let projection = project_growth(&input).unwrap().result;

    assert_eq!(projection.years.len(), 10);
    assert!(projection.final_pessimistic <= projection.final_expected);
    assert!(projection.final_expected <= projection.final_optimistic);
    assert!(projection.final_expected > dec!(100000));
    assert_eq!(projection.total_contributions, dec!(100000.00));
}

#[test]
fn test_projection_serializes_money_as_strings() {
    let input = ProjectionInput {
        initial_investment: dec!(1000),
        annual_return: dec!(0.05),
        volatility: dec!(0.1),
        years: 1,
        annual_contribution: Decimal::ZERO,
    };
    let value = serde_json::to_value(project_growth(&input).unwrap()).unwrap();
    assert_eq!(value["result"]["finalExpected"], "1050.00");
    assert_eq!(value["metadata"]["precision"], "rust_decimal_128bit");
}

#[test]
fn test_projection_input_from_json_defaults_contribution() {
    let json = r#"{
        "initialInvestment": "50000",
        "annualReturn": "0.06",
        "volatility": "0.12",
        "years": 5
    }"#;
    let input: ProjectionInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.annual_contribution, Decimal::ZERO);
    assert_eq!(input.years, 5);
}
