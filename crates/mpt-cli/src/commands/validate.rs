use clap::Args;
use serde_json::Value;

use mpt_core::optimization::api::{self, ValidationInput};

use crate::config::{override_value, CliConfig};
use crate::input;

/// Arguments for checking optimizer input without running it
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON input file (riskFreeRate, assets, correlations)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual risk-free rate, overriding the input file
    #[arg(long, allow_hyphen_values = true)]
    pub risk_free_rate: Option<f64>,
}

pub fn run_validate(
    args: ValidateArgs,
    config: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut data = input::read_value(args.input.as_deref(), "input validation")?;
    config.apply_defaults(&mut data);
    override_value(&mut data, "riskFreeRate", args.risk_free_rate);

    let val_input: ValidationInput = serde_json::from_value(data)?;
    let result = api::validate(&val_input)?;
    Ok(serde_json::to_value(result)?)
}
