use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use profitability_core::targets::{calculate_targets, solve_for_target_profit};

use super::business::{load_business_input, BusinessArgs, Overrides};

/// Arguments for break-even and desired-margin targets
#[derive(Args)]
pub struct TargetsArgs {
    #[command(flatten)]
    pub business: BusinessArgs,
}

/// Arguments for a single target-profit solve
#[derive(Args)]
pub struct SolveArgs {
    /// Target net profit for the period (negative values allow a loss)
    #[arg(long, allow_hyphen_values = true)]
    pub target_profit: Decimal,

    #[command(flatten)]
    pub business: BusinessArgs,
}

pub fn run_targets(
    args: TargetsArgs,
    overrides: &Overrides,
) -> Result<Value, Box<dyn std::error::Error>> {
    let business = load_business_input(&args.business, overrides)?;
    let result = calculate_targets(&business);
    Ok(serde_json::to_value(result)?)
}

pub fn run_solve(args: SolveArgs, overrides: &Overrides) -> Result<Value, Box<dyn std::error::Error>> {
    let business = load_business_input(&args.business, overrides)?;
    let result = solve_for_target_profit(&business, args.target_profit);
    info!(
        target = %args.target_profit,
        label = %result.target_profit_label,
        "target solve complete"
    );
    Ok(serde_json::to_value(result)?)
}
