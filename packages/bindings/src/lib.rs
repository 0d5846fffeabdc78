use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use profitability_core::input::{BusinessInputData, RawBusinessInput};
use profitability_core::profitability::CalculationResults;
use profitability_core::Currency;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_input(input_json: &str) -> NapiResult<BusinessInputData> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Normalize a raw form record: blanks become defaults and fields behind
/// closed toggles are zeroed.
#[napi]
pub fn normalize_input(raw_json: String) -> NapiResult<String> {
    let raw: RawBusinessInput = serde_json::from_str(&raw_json).map_err(to_napi_error)?;
    serde_json::to_string(&raw.normalize()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_profitability(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = profitability_core::profitability::calculate_profitability(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_profitability(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output =
        profitability_core::analysis::analyze_profitability(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_targets(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = profitability_core::targets::calculate_targets(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `target_net_profit` is a decimal string so no precision is lost in transit.
#[napi]
pub fn solve_for_target_profit(input_json: String, target_net_profit: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let target = Decimal::from_str(target_net_profit.trim()).map_err(to_napi_error)?;
    let output = profitability_core::targets::solve_for_target_profit(&input, target);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_results(results_json: String, currency: String) -> NapiResult<String> {
    let results: CalculationResults = serde_json::from_str(&results_json).map_err(to_napi_error)?;
    let output = profitability_core::format::format_results(&results, &Currency::from(currency));
    serde_json::to_string(&output).map_err(to_napi_error)
}
