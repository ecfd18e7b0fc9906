use std::str::FromStr;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use mpt_core::optimization::api;
use mpt_core::projection::growth;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Optimization
// ---------------------------------------------------------------------------

#[napi]
pub fn optimize_portfolio(input_json: String) -> NapiResult<String> {
    let input: api::OptimizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = api::optimize(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_ensemble(input_json: String) -> NapiResult<String> {
    let input: api::EnsembleInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = api::run_ensemble(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn validate_inputs(input_json: String) -> NapiResult<String> {
    let input: api::ValidationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = api::validate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn project_growth(input_json: String) -> NapiResult<String> {
    let input: growth::ProjectionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = growth::project_growth(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Project the best portfolio of an `optimizePortfolio` result.
///
/// `initial_investment` is a decimal string so amounts keep full precision
/// across the JS boundary.
#[napi]
pub fn project_best_portfolio(
    optimization_json: String,
    initial_investment: String,
    years: u32,
) -> NapiResult<String> {
    let optimized: serde_json::Value =
        serde_json::from_str(&optimization_json).map_err(to_napi_error)?;
    let best_json = optimized
        .get("result")
        .and_then(|r| r.get("bestPortfolio"))
        .filter(|v| !v.is_null())
        .cloned()
        .ok_or_else(|| to_napi_error("optimization result has no best portfolio"))?;
    let best: mpt_core::optimization::OptimizationResult =
        serde_json::from_value(best_json).map_err(to_napi_error)?;
    let initial = Decimal::from_str(&initial_investment).map_err(to_napi_error)?;

    let input =
        growth::ProjectionInput::from_portfolio(&best, initial, years).map_err(to_napi_error)?;
    let output = growth::project_growth(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
