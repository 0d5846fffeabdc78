use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::cost_structure::CostStructure;
use crate::format::{format_results, FormattedResults};
use crate::input::{BusinessInputData, FixedCostMode, VariableCostMode};
use crate::profitability::{calculate_profitability, CalculationResults};
use crate::targets::{calculate_targets, TargetAnalysis};
use crate::types::{with_metadata, ComputationOutput};
use crate::ProfitabilityResult;

/// Everything a caller needs to render one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityReport {
    pub results: CalculationResults,
    pub formatted: FormattedResults,
    pub targets: TargetAnalysis,
    pub cost_structure: CostStructure,
}

/// Run the calculator and the target solver on one input and wrap both in
/// the standard output envelope, with warnings for degenerate scenarios.
pub fn analyze_profitability(
    input: &BusinessInputData,
) -> ProfitabilityResult<ComputationOutput<ProfitabilityReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let cost_structure = CostStructure::from_input(input);
    let results = calculate_profitability(input);
    let targets = calculate_targets(input);
    let formatted = format_results(&results, &input.currency);

    // --- Custom cost lists ---
    if let FixedCostMode::Detailed { custom, .. } = input.fixed_cost_mode() {
        if !custom.is_empty() {
            warnings.push(format!(
                "{} custom fixed cost item(s) are listed but not included in totals",
                custom.len()
            ));
        }
    }
    if let VariableCostMode::Detailed { custom, .. } = input.variable_cost_mode() {
        if !custom.is_empty() {
            warnings.push(format!(
                "{} custom variable cost item(s) are listed but not included in totals",
                custom.len()
            ));
        }
    }

    // --- Degenerate outcomes ---
    if results.revenue_after_returns.is_zero() {
        warnings.push("Revenue after returns is zero; profit margin is undefined".to_string());
    }
    if results.break_even_units.is_infinite() {
        warnings.push(format!(
            "Contribution margin per unit is {}; break-even is unreachable",
            cost_structure.contribution_margin_per_unit
        ));
    }
    if let Some(margin) = input.desired_profit_margin {
        if margin > Decimal::ZERO && targets.units_for_desired_margin.as_deref() == Some("N/A") {
            warnings.push(format!(
                "Desired profit margin of {margin}% cannot be solved without estimated revenue"
            ));
        }
    }
    if input.include_investment && input.initial_investment.is_zero() {
        warnings.push("Initial investment is zero; ROI is unbounded".to_string());
    }
    if input.include_taxes && input.tax_rate >= dec!(100) {
        warnings.push(format!(
            "Tax rate of {}% leaves no profit after tax; positive targets are unreachable",
            input.tax_rate
        ));
    }

    let report = ProfitabilityReport {
        results,
        formatted,
        targets,
        cost_structure,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Single-period contribution margin profitability with target solving",
        &serde_json::json!({
            "time_period": input.time_period,
            "currency": input.currency,
            "fixed_cost_detail": input.include_detailed_fixed_costs,
            "variable_cost_detail": input.include_detailed_variable_costs,
            "taxes_on_positive_profit_only": input.include_taxes,
            "desired_profit_margin": input.desired_profit_margin.map(|m| m.to_string()),
        }),
        warnings,
        elapsed,
        report,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CustomFixedCost;
    use pretty_assertions::assert_eq;

    fn widget_input() -> BusinessInputData {
        BusinessInputData {
            price_per_unit: dec!(50),
            expected_units_sold: dec!(100),
            direct_variable_cost_per_unit: dec!(20),
            salaries_wages: dec!(1000),
            ..Default::default()
        }
    }

    #[test]
    fn test_report_for_healthy_scenario_has_no_warnings() {
        let out = analyze_profitability(&widget_input()).unwrap();
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert_eq!(out.result.results.net_profit, dec!(2000));
        assert_eq!(out.result.formatted.net_profit, "$2,000");
        assert_eq!(out.result.formatted.is_profitable, "Yes");
        assert_eq!(out.result.targets.price_to_break_even, "$30");
        assert_eq!(out.result.cost_structure.contribution_margin_per_unit, dec!(30));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_ignored_custom_fixed_costs_are_reported() {
        let mut input = widget_input();
        input.include_detailed_fixed_costs = true;
        input.custom_fixed_costs = vec![CustomFixedCost {
            name: "Cloud hosting".into(),
            amount: dec!(250),
        }];
        let out = analyze_profitability(&input).unwrap();
        assert_eq!(out.result.results.total_fixed_costs, dec!(1000));
        assert!(out.warnings.iter().any(|w| w.contains("custom fixed cost")));
    }

    #[test]
    fn test_zero_activity_warnings() {
        let mut input = BusinessInputData {
            rent_utilities: dec!(800),
            expected_units_sold: dec!(0),
            desired_profit_margin: Some(dec!(10)),
            ..Default::default()
        };
        input.include_investment = true;

        let out = analyze_profitability(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("profit margin is undefined")));
        assert!(out.warnings.iter().any(|w| w.contains("without estimated revenue")));
        assert!(out.warnings.iter().any(|w| w.contains("ROI is unbounded")));
    }

    #[test]
    fn test_unreachable_break_even_warning() {
        let mut input = widget_input();
        input.direct_variable_cost_per_unit = dec!(60);
        let out = analyze_profitability(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("break-even is unreachable")));
        assert_eq!(out.result.formatted.break_even_units, "Infinity");
    }

    #[test]
    fn test_envelope_serializes_sentinels_as_strings() {
        let mut input = widget_input();
        input.direct_variable_cost_per_unit = dec!(60);
        let out = analyze_profitability(&input).unwrap();
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(
            value["result"]["results"]["break_even_units"],
            serde_json::json!("Infinity")
        );
        assert_eq!(value["result"]["results"]["roi"], serde_json::json!("N/A"));
        assert_eq!(value["assumptions"]["currency"], serde_json::json!("USD"));
    }
}
