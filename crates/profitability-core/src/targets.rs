use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost_structure::CostStructure;
use crate::format::{format_currency, format_money, format_units};
use crate::input::BusinessInputData;
use crate::metric::{checked_ratio, Metric};
use crate::types::{percent_to_rate, Currency, Money, Percent};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Numeric result of solving for one target net profit. Each field is the
/// change in a single input, all others held constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSolution {
    pub target_net_profit: Money,
    /// Pre-tax profit needed; `PosInfinity` when taxes make the target
    /// unreachable
    pub target_profit_before_tax: Metric,
    /// Units to sell at the current price
    pub units: Metric,
    /// Gross price per unit at the current volume
    pub price: Metric,
    /// Reduction in direct variable cost per unit
    pub direct_variable_cost_reduction: Metric,
    /// Reduction in operational fixed costs (depreciation excluded)
    pub fixed_cost_reduction: Metric,
}

impl TargetSolution {
    fn unreachable(target_net_profit: Money) -> Self {
        Self {
            target_net_profit,
            target_profit_before_tax: Metric::PosInfinity,
            units: Metric::PosInfinity,
            price: Metric::PosInfinity,
            direct_variable_cost_reduction: Metric::PosInfinity,
            fixed_cost_reduction: Metric::PosInfinity,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.target_profit_before_tax.is_finite()
    }
}

/// One solve rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFields {
    pub units: String,
    pub price: String,
    pub direct_variable_cost_reduction: String,
    pub fixed_cost_reduction: String,
    /// Target net profit, suffixed with "(Unreachable)" when it cannot be hit
    pub target_profit_label: String,
}

impl TargetFields {
    pub fn from_solution(solution: &TargetSolution, currency: &Currency) -> Self {
        let mut target_profit_label = format_money(solution.target_net_profit, currency);
        if !solution.is_reachable() {
            target_profit_label.push_str(" (Unreachable)");
        }
        Self {
            units: format_units(solution.units),
            price: format_currency(solution.price, currency),
            direct_variable_cost_reduction: format_currency(
                solution.direct_variable_cost_reduction,
                currency,
            ),
            fixed_cost_reduction: format_currency(solution.fixed_cost_reduction, currency),
            target_profit_label,
        }
    }

    fn not_applicable(target_profit_label: String) -> Self {
        Self {
            units: "N/A".to_string(),
            price: "N/A".to_string(),
            direct_variable_cost_reduction: "N/A".to_string(),
            fixed_cost_reduction: "N/A".to_string(),
            target_profit_label,
        }
    }
}

/// Break-even targets plus, when a desired margin is set, the targets for
/// that margin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAnalysis {
    pub units_to_break_even: String,
    pub price_to_break_even: String,
    pub direct_variable_cost_reduction_to_break_even: String,
    pub fixed_cost_reduction_to_break_even: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units_for_desired_margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_for_desired_margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_variable_cost_reduction_for_desired_margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_cost_reduction_for_desired_margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculated_target_profit: Option<String>,
}

// ---------------------------------------------------------------------------
// Function 1: solve_target
// ---------------------------------------------------------------------------

/// Work backward from a target net profit to the units, price, direct cost
/// reduction and fixed cost reduction that would each reach it alone.
pub fn solve_target(input: &BusinessInputData, target_net_profit: Money) -> TargetSolution {
    let costs = CostStructure::from_input(input);

    let Some(target_pbt) = gross_up_for_tax(input, target_net_profit) else {
        debug!(%target_net_profit, tax_rate = %input.tax_rate, "target profit unreachable after tax");
        return TargetSolution::unreachable(target_net_profit);
    };

    // Contribution margin needed to cover fixed costs and leave target_pbt
    let Some(target_cm) = target_pbt
        .checked_add(costs.operational_fixed_costs)
        .and_then(|cm| cm.checked_add(costs.effective_depreciation))
    else {
        debug!(%target_net_profit, "required contribution margin overflows; target unreachable");
        return TargetSolution::unreachable(target_net_profit);
    };

    TargetSolution {
        target_net_profit,
        target_profit_before_tax: Metric::Value(target_pbt),
        units: units_target(&costs, target_cm),
        price: price_target(input, &costs, target_cm),
        direct_variable_cost_reduction: direct_cost_reduction_target(input, &costs, target_cm),
        fixed_cost_reduction: fixed_cost_reduction_target(input, &costs, target_pbt, target_cm),
    }
}

/// [`solve_target`] formatted in the input's currency.
pub fn solve_for_target_profit(input: &BusinessInputData, target_net_profit: Money) -> TargetFields {
    TargetFields::from_solution(&solve_target(input, target_net_profit), &input.currency)
}

// ---------------------------------------------------------------------------
// Function 2: calculate_targets
// ---------------------------------------------------------------------------

/// Break-even targets, and desired-margin targets when `desired_profit_margin`
/// is set above zero.
pub fn calculate_targets(input: &BusinessInputData) -> TargetAnalysis {
    let break_even = solve_for_target_profit(input, Decimal::ZERO);

    let desired = input
        .desired_profit_margin
        .filter(|margin| *margin > Decimal::ZERO)
        .map(|margin| solve_for_margin(input, margin));

    TargetAnalysis {
        units_to_break_even: break_even.units,
        price_to_break_even: break_even.price,
        direct_variable_cost_reduction_to_break_even: break_even.direct_variable_cost_reduction,
        fixed_cost_reduction_to_break_even: break_even.fixed_cost_reduction,
        units_for_desired_margin: desired.as_ref().map(|d| d.units.clone()),
        price_for_desired_margin: desired.as_ref().map(|d| d.price.clone()),
        direct_variable_cost_reduction_for_desired_margin: desired
            .as_ref()
            .map(|d| d.direct_variable_cost_reduction.clone()),
        fixed_cost_reduction_for_desired_margin: desired
            .as_ref()
            .map(|d| d.fixed_cost_reduction.clone()),
        calculated_target_profit: desired.map(|d| d.target_profit_label),
    }
}

/// Net profit that a margin represents at the current price, volume and
/// returns rate. `None` when current revenue after returns is not positive.
/// Revenue saturates the same way it does in the profitability figures.
pub fn desired_margin_target_profit(
    input: &BusinessInputData,
    desired_margin: Percent,
) -> Option<Money> {
    let costs = CostStructure::from_input(input);
    let revenue_after_returns = input
        .price_per_unit
        .saturating_mul(input.expected_units_sold)
        .saturating_mul(costs.returns_factor);
    if revenue_after_returns > Decimal::ZERO {
        Some(percent_to_rate(desired_margin).saturating_mul(revenue_after_returns))
    } else {
        None
    }
}

fn solve_for_margin(input: &BusinessInputData, desired_margin: Percent) -> TargetFields {
    match desired_margin_target_profit(input, desired_margin) {
        Some(target) => solve_for_target_profit(input, target),
        None => TargetFields::not_applicable(format!(
            "{} (Est. Revenue is zero)",
            format_money(Decimal::ZERO, &input.currency)
        )),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pre-tax profit that leaves `target_net_profit` after tax. Taxes only bite
/// on a positive target; `None` when the tax rate swallows all profit.
fn gross_up_for_tax(input: &BusinessInputData, target_net_profit: Money) -> Option<Money> {
    if input.include_taxes && input.tax_rate > Decimal::ZERO && target_net_profit > Decimal::ZERO
    {
        let retained = Decimal::ONE.saturating_sub(percent_to_rate(input.tax_rate));
        if retained <= Decimal::ZERO {
            return None;
        }
        checked_ratio(target_net_profit, retained)
    } else {
        Some(target_net_profit)
    }
}

fn units_target(costs: &CostStructure, target_cm: Money) -> Metric {
    let cm_per_unit = costs.contribution_margin_per_unit;
    if cm_per_unit > Decimal::ZERO {
        Metric::from_checked(checked_ratio(target_cm, cm_per_unit)).max_zero()
    } else if target_cm <= Decimal::ZERO {
        Metric::ZERO
    } else {
        Metric::PosInfinity
    }
}

fn price_target(input: &BusinessInputData, costs: &CostStructure, target_cm: Money) -> Metric {
    let units = input.expected_units_sold;

    if units > Decimal::ZERO {
        let Some(required_revenue) = input
            .direct_variable_cost_per_unit
            .checked_mul(units)
            .and_then(|direct_costs| direct_costs.checked_add(target_cm))
        else {
            return Metric::PosInfinity;
        };
        let Some(denominator) = units
            .checked_mul(costs.returns_factor)
            .and_then(|d| d.checked_mul(Decimal::ONE.saturating_sub(costs.effective_variable_rate)))
        else {
            return Metric::PosInfinity;
        };

        if denominator > Decimal::ZERO {
            Metric::from_checked(checked_ratio(required_revenue, denominator)).max_zero()
        } else if required_revenue <= Decimal::ZERO {
            Metric::ZERO
        } else {
            Metric::PosInfinity
        }
    } else if target_cm <= Decimal::ZERO {
        Metric::ZERO
    } else {
        // No volume: no price produces a positive contribution
        Metric::PosInfinity
    }
}

fn direct_cost_reduction_target(
    input: &BusinessInputData,
    costs: &CostStructure,
    target_cm: Money,
) -> Metric {
    let units = input.expected_units_sold;
    let current_dvc = input.direct_variable_cost_per_unit;

    if units <= Decimal::ZERO {
        return if target_cm <= Decimal::ZERO {
            Metric::ZERO
        } else {
            Metric::PosInfinity
        };
    }

    if costs.contribution_at(units) >= target_cm {
        return Metric::ZERO;
    }

    let Some(target_dvc) = checked_ratio(target_cm, units)
        .and_then(|required_cm_per_unit| costs.net_revenue_per_unit.checked_sub(required_cm_per_unit))
    else {
        return Metric::PosInfinity;
    };

    if target_dvc < Decimal::ZERO {
        // Reduction would exceed the whole direct cost
        if costs.net_revenue_per_unit.saturating_mul(units) >= target_cm {
            Metric::Value(current_dvc)
        } else {
            Metric::PosInfinity
        }
    } else {
        Metric::Value(
            current_dvc
                .saturating_sub(target_dvc)
                .max(Decimal::ZERO)
                .min(current_dvc),
        )
    }
}

fn fixed_cost_reduction_target(
    input: &BusinessInputData,
    costs: &CostStructure,
    target_pbt: Money,
    target_cm: Money,
) -> Metric {
    let current_contribution = costs.contribution_at(input.expected_units_sold);
    if current_contribution >= target_cm {
        return Metric::ZERO;
    }

    let target_operational = current_contribution
        .saturating_sub(target_pbt)
        .saturating_sub(costs.effective_depreciation)
        .max(Decimal::ZERO);
    Metric::Value(
        costs
            .operational_fixed_costs
            .saturating_sub(target_operational)
            .max(Decimal::ZERO),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
