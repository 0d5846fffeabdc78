use clap::Args;
use serde_json::Value;
use tracing::info;

use profitability_core::analysis::analyze_profitability;
use profitability_core::profitability::calculate_profitability;

use super::business::{load_business_input, BusinessArgs, Overrides};

/// Arguments for the full profitability report
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub business: BusinessArgs,
}

/// Arguments for the profitability figures
#[derive(Args)]
pub struct ProfitabilityArgs {
    #[command(flatten)]
    pub business: BusinessArgs,
}

pub fn run_analyze(
    args: AnalyzeArgs,
    overrides: &Overrides,
) -> Result<Value, Box<dyn std::error::Error>> {
    let business = load_business_input(&args.business, overrides)?;
    let result = analyze_profitability(&business)?;
    info!(
        warnings = result.warnings.len(),
        elapsed_us = result.metadata.computation_time_us,
        "profitability report complete"
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_profitability(
    args: ProfitabilityArgs,
    overrides: &Overrides,
) -> Result<Value, Box<dyn std::error::Error>> {
    let business = load_business_input(&args.business, overrides)?;
    let result = calculate_profitability(&business);
    Ok(serde_json::to_value(result)?)
}
