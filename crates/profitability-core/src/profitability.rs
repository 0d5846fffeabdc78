use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost_structure::CostStructure;
use crate::input::BusinessInputData;
use crate::metric::{checked_ratio, Metric};
use crate::types::{percent_to_rate, Money};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Single-period financial snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
    /// price * units
    pub total_revenue: Money,
    /// total_revenue less estimated returns/refunds
    pub revenue_after_returns: Money,
    /// Direct costs + percentage-of-revenue costs + payment processing fees
    pub total_variable_costs: Money,
    /// revenue_after_returns - total_variable_costs
    pub contribution_margin: Money,
    /// Same as contribution_margin in this model
    pub gross_profit: Money,
    /// Operational fixed costs plus depreciation
    pub total_fixed_costs: Money,
    pub profit_before_tax: Money,
    /// Zero whenever profit_before_tax is not positive
    pub taxes_paid: Money,
    pub net_profit: Money,
    /// net_profit > 0; breaking exactly even is not profitable
    pub is_profitable: bool,
    pub break_even_units: Metric,
    /// Gross revenue at the break-even volume
    pub break_even_revenue: Metric,
    /// net_profit / revenue_after_returns as a rate
    pub profit_margin: Metric,
    /// net_profit / initial_investment as a rate
    pub roi: Metric,
}

// ---------------------------------------------------------------------------
// calculate_profitability
// ---------------------------------------------------------------------------

/// Derive revenue, costs, profit, break-even, margin and ROI for one period.
///
/// Total over any input: unreachable or undefined figures come back as
/// [`Metric`] sentinels, and money figures saturate at `Decimal::MAX` /
/// `Decimal::MIN`.
pub fn calculate_profitability(input: &BusinessInputData) -> CalculationResults {
    let costs = CostStructure::from_input(input);

    // --- Revenue ---
    let total_revenue = input.price_per_unit.saturating_mul(input.expected_units_sold);
    let returns_refunds_amount = if input.include_returns_refunds {
        total_revenue.saturating_mul(percent_to_rate(input.returns_refunds_rate))
    } else {
        Decimal::ZERO
    };
    let revenue_after_returns = total_revenue.saturating_sub(returns_refunds_amount);

    // --- Variable costs ---
    let mut total_variable_costs = input
        .direct_variable_cost_per_unit
        .saturating_mul(input.expected_units_sold);
    total_variable_costs = total_variable_costs.saturating_add(
        revenue_after_returns.saturating_mul(percent_to_rate(input.variable_cost_mode().percentage())),
    );
    if input.include_payment_processing_fees {
        total_variable_costs = total_variable_costs.saturating_add(
            revenue_after_returns.saturating_mul(percent_to_rate(input.payment_processing_fee_rate)),
        );
    }

    let contribution_margin = revenue_after_returns.saturating_sub(total_variable_costs);

    // --- Fixed costs and profit ---
    let total_fixed_costs = costs.total_fixed_costs();
    let profit_before_tax = contribution_margin.saturating_sub(total_fixed_costs);

    let taxes_paid = if input.include_taxes
        && input.tax_rate > Decimal::ZERO
        && profit_before_tax > Decimal::ZERO
    {
        profit_before_tax.saturating_mul(percent_to_rate(input.tax_rate))
    } else {
        Decimal::ZERO
    };

    let net_profit = profit_before_tax.saturating_sub(taxes_paid);

    let (break_even_units, break_even_revenue) = break_even(&costs, input.price_per_unit);

    CalculationResults {
        total_revenue,
        revenue_after_returns,
        total_variable_costs,
        contribution_margin,
        gross_profit: contribution_margin,
        total_fixed_costs,
        profit_before_tax,
        taxes_paid,
        net_profit,
        is_profitable: net_profit > Decimal::ZERO,
        break_even_units,
        break_even_revenue,
        profit_margin: profit_margin(net_profit, revenue_after_returns),
        roi: return_on_investment(input, net_profit),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Break-even volume and the gross revenue it represents.
fn break_even(costs: &CostStructure, price_per_unit: Money) -> (Metric, Metric) {
    let to_cover = costs.total_fixed_costs();
    let cm_per_unit = costs.contribution_margin_per_unit;

    if cm_per_unit > Decimal::ZERO {
        let units = checked_ratio(to_cover, cm_per_unit);
        let revenue = units.and_then(|u| u.checked_mul(price_per_unit));
        (Metric::from_checked(units), Metric::from_checked(revenue))
    } else if to_cover <= Decimal::ZERO {
        (Metric::ZERO, Metric::ZERO)
    } else {
        debug!(
            %cm_per_unit,
            %to_cover,
            "each unit contributes nothing toward fixed costs; break-even unreachable"
        );
        (Metric::PosInfinity, Metric::PosInfinity)
    }
}

fn profit_margin(net_profit: Money, revenue_after_returns: Money) -> Metric {
    if revenue_after_returns.is_zero() {
        return Metric::NotApplicable;
    }
    match checked_ratio(net_profit, revenue_after_returns) {
        Some(margin) => Metric::Value(margin),
        None if net_profit.is_zero() => Metric::ZERO,
        None => Metric::NotApplicable,
    }
}

fn return_on_investment(input: &BusinessInputData, net_profit: Money) -> Metric {
    if !input.include_investment {
        return Metric::NotApplicable;
    }
    let investment = input.initial_investment;
    if investment > Decimal::ZERO {
        match checked_ratio(net_profit, investment) {
            Some(roi) => Metric::Value(roi),
            None if net_profit.is_zero() => Metric::ZERO,
            None => Metric::NotApplicable,
        }
    } else if investment.is_zero() {
        if net_profit >= Decimal::ZERO {
            Metric::PosInfinity
        } else {
            Metric::NegInfinity
        }
    } else {
        Metric::NotApplicable
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
