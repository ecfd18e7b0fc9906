use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mpt_core::optimization::OptimizationResult;
use mpt_core::projection::growth::{self, ProjectionInput};

use crate::input;

/// Arguments for a multi-year growth projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON projection input file
    #[arg(long)]
    pub input: Option<String>,

    /// Output of `mpt optimize` or `mpt ensemble` whose portfolio is projected
    #[arg(long, conflicts_with = "input")]
    pub portfolio: Option<String>,

    /// Amount invested at the start
    #[arg(long)]
    pub initial_investment: Option<Decimal>,

    /// Expected annual return (e.g. 0.06 for 6%)
    #[arg(long, allow_hyphen_values = true)]
    pub annual_return: Option<Decimal>,

    /// Annual volatility for the optimistic/pessimistic band
    #[arg(long)]
    pub volatility: Option<Decimal>,

    /// Number of years to project
    #[arg(long)]
    pub years: Option<u32>,

    /// Contribution added at the end of each year
    #[arg(long)]
    pub annual_contribution: Option<Decimal>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let proj_input = if let Some(ref path) = args.input {
        let data = input::file::read_json_value(path)?;
        serde_json::from_value(data)?
    } else if let Some(ref path) = args.portfolio {
        from_portfolio_file(path, &args)?
    } else if let (Some(initial), Some(ret), Some(vol), Some(years)) = (
        args.initial_investment,
        args.annual_return,
        args.volatility,
        args.years,
    ) {
        ProjectionInput {
            initial_investment: initial,
            annual_return: ret,
            volatility: vol,
            years,
            annual_contribution: args.annual_contribution.unwrap_or(Decimal::ZERO),
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err(
            "Provide --input <file.json>, --portfolio <file.json>, or \
             --initial-investment, --annual-return, --volatility and --years"
                .into(),
        );
    };

    let result = growth::project_growth(&proj_input)?;
    Ok(serde_json::to_value(result)?)
}

fn from_portfolio_file(
    path: &str,
    args: &ProjectArgs,
) -> Result<ProjectionInput, Box<dyn std::error::Error>> {
    let (Some(initial), Some(years)) = (args.initial_investment, args.years) else {
        return Err("--initial-investment and --years are required with --portfolio".into());
    };
    let data = input::file::read_json_value(path)?;
    let portfolio = select_portfolio(&data).ok_or_else(|| {
        format!("No portfolio found in '{path}' (expected bestPortfolio or average)")
    })?;
    let best: OptimizationResult = serde_json::from_value(portfolio.clone())?;

    let mut proj_input = ProjectionInput::from_portfolio(&best, initial, years)?;
    if let Some(ret) = args.annual_return {
        proj_input.annual_return = ret;
    }
    if let Some(vol) = args.volatility {
        proj_input.volatility = vol;
    }
    if let Some(contribution) = args.annual_contribution {
        proj_input.annual_contribution = contribution;
    }
    Ok(proj_input)
}

/// The optimized portfolio inside a saved optimize or ensemble output.
fn select_portfolio(data: &Value) -> Option<&Value> {
    let result = data.get("result").unwrap_or(data);
    ["bestPortfolio", "average"]
        .iter()
        .filter_map(|key| result.get(*key))
        .find(|v| !v.is_null())
        .or_else(|| result.get("weights").map(|_| result))
}
