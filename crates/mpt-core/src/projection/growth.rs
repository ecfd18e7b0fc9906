use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MptError;
use crate::types::{with_decimal_metadata, ComputationOutput, Money, Rate};
use crate::MptResult;

const MAX_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for projecting an allocation's value forward year by year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInput {
    pub initial_investment: Money,
    /// Expected annual portfolio return.
    pub annual_return: Rate,
    /// Annual portfolio volatility; sets the optimistic/pessimistic band.
    pub volatility: Rate,
    pub years: u32,
    /// Added at the end of every year.
    #[serde(default)]
    pub annual_contribution: Money,
}

/// Balances at the end of one projection year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYear {
    pub year: u32,
    pub expected: Money,
    /// Compounded at return + volatility.
    pub optimistic: Money,
    /// Compounded at return - volatility, floored at zero.
    pub pessimistic: Money,
    /// Initial investment plus contributions so far.
    pub contributions_to_date: Money,
}

/// Output of [`project_growth`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionOutput {
    pub years: Vec<ProjectionYear>,
    pub final_expected: Money,
    pub final_optimistic: Money,
    pub final_pessimistic: Money,
    pub total_contributions: Money,
    /// final_expected - total_contributions.
    pub expected_gain: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One year of growth followed by the year-end contribution, never below zero.
fn step(balance: Money, rate: Rate, contribution: Money) -> MptResult<Money> {
    balance
        .checked_mul(Decimal::ONE + rate)
        .and_then(|grown| grown.checked_add(contribution))
        .map(|grown| grown.max(Decimal::ZERO))
        .ok_or_else(|| MptError::invalid("years", "projection overflows decimal range"))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compound an initial investment (plus optional yearly contributions) at the
/// portfolio's expected return, with a one-volatility band either side.
pub fn project_growth(input: &ProjectionInput) -> MptResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    if input.initial_investment < Decimal::ZERO {
        return Err(MptError::invalid("initial_investment", "must be >= 0"));
    }
    if input.annual_contribution < Decimal::ZERO {
        return Err(MptError::invalid("annual_contribution", "must be >= 0"));
    }
    if input.years == 0 || input.years > MAX_YEARS {
        return Err(MptError::invalid(
            "years",
            format!("must be between 1 and {MAX_YEARS}"),
        ));
    }
    if input.annual_return <= dec!(-1) {
        return Err(MptError::invalid("annual_return", "must be > -1"));
    }
    if input.volatility < Decimal::ZERO {
        return Err(MptError::invalid("volatility", "must be >= 0"));
    }

    let optimistic_rate = input.annual_return + input.volatility;
    let pessimistic_rate = (input.annual_return - input.volatility).max(dec!(-1));
    if input.annual_return - input.volatility <= dec!(-1) {
        warnings.push("Pessimistic path loses the entire balance in the first year".into());
    }

    let mut expected = input.initial_investment;
    let mut optimistic = input.initial_investment;
    let mut pessimistic = input.initial_investment;
    let mut contributions = input.initial_investment;
    let mut years = Vec::with_capacity(input.years as usize);

    for year in 1..=input.years {
        expected = step(expected, input.annual_return, input.annual_contribution)?;
        optimistic = step(optimistic, optimistic_rate, input.annual_contribution)?;
        pessimistic = step(pessimistic, pessimistic_rate, input.annual_contribution)?;
        contributions = contributions
            .checked_add(input.annual_contribution)
            .ok_or_else(|| MptError::invalid("annual_contribution", "overflows decimal range"))?;

        years.push(ProjectionYear {
            year,
            expected: expected.round_dp(2),
            optimistic: optimistic.round_dp(2),
            pessimistic: pessimistic.round_dp(2),
            contributions_to_date: contributions.round_dp(2),
        });
    }

    if input.annual_return < Decimal::ZERO {
        warnings.push(format!(
            "Expected return {} is negative; the projection shrinks",
            input.annual_return
        ));
    }

    let final_expected = expected.round_dp(2);
    let output = ProjectionOutput {
        years,
        final_expected,
        final_optimistic: optimistic.round_dp(2),
        final_pessimistic: pessimistic.round_dp(2),
        total_contributions: contributions.round_dp(2),
        expected_gain: (expected - contributions).round_dp(2),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_decimal_metadata(
        "Annual Compounding Projection with Volatility Band",
        &serde_json::json!({
            "initial_investment": input.initial_investment.to_string(),
            "annual_return": input.annual_return.to_string(),
            "volatility": input.volatility.to_string(),
            "years": input.years,
            "annual_contribution": input.annual_contribution.to_string(),
            "contribution_timing": "end of year",
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(feature = "optimization")]
impl ProjectionInput {
    /// Projection input from an optimized portfolio's return and volatility.
    pub fn from_portfolio(
        portfolio: &crate::optimization::OptimizationResult,
        initial_investment: Money,
        years: u32,
    ) -> MptResult<Self> {
        let to_rate = |field: &str, v: f64| {
            Decimal::from_f64_retain(v)
                .map(|d| d.round_dp(6))
                .ok_or_else(|| MptError::invalid(field, format!("{v} is not a finite number")))
        };
        Ok(Self {
            initial_investment,
            annual_return: to_rate("expected_return", portfolio.expected_return)?,
            volatility: to_rate("volatility", portfolio.volatility)?,
            years,
            annual_contribution: Decimal::ZERO,
        })
    }
}
