use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::input::BusinessInputData;
use crate::types::{percent_to_rate, Money, Rate, Units};

/// Per-unit and per-period cost figures shared by the profitability
/// calculation and the target solver. Both derive from the same toggles,
/// so they are resolved once here.
///
/// Sums and products saturate at `Decimal::MAX` / `Decimal::MIN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostStructure {
    /// Resolved "other fixed costs" for the active fixed-cost mode
    pub other_fixed_costs: Money,
    /// Salaries + marketing + rent + other fixed, plus loan and owner draw
    /// when enabled. Excludes depreciation.
    pub operational_fixed_costs: Money,
    /// Depreciation/amortization when enabled, else zero
    pub effective_depreciation: Money,
    /// 1 - returns rate (1 when returns are disabled)
    pub returns_factor: Rate,
    /// Active variable-cost mode rate plus payment processing rate
    pub effective_variable_rate: Rate,
    /// price * returns_factor * (1 - effective_variable_rate)
    pub net_revenue_per_unit: Money,
    /// net_revenue_per_unit - direct variable cost per unit
    pub contribution_margin_per_unit: Money,
}

impl CostStructure {
    pub fn from_input(input: &BusinessInputData) -> Self {
        let other_fixed_costs = input.fixed_cost_mode().amount();

        let mut operational_fixed_costs = input
            .salaries_wages
            .saturating_add(input.marketing_costs)
            .saturating_add(input.rent_utilities)
            .saturating_add(other_fixed_costs);
        if input.include_loan {
            operational_fixed_costs = operational_fixed_costs.saturating_add(input.loan_payment);
        }
        if input.include_owner_draw {
            operational_fixed_costs = operational_fixed_costs.saturating_add(input.owner_draw);
        }

        let effective_depreciation = if input.include_depreciation {
            input.depreciation_amortization
        } else {
            Decimal::ZERO
        };

        let returns_factor = if input.include_returns_refunds {
            Decimal::ONE.saturating_sub(percent_to_rate(input.returns_refunds_rate))
        } else {
            Decimal::ONE
        };

        let mut effective_variable_rate = percent_to_rate(input.variable_cost_mode().percentage());
        if input.include_payment_processing_fees {
            effective_variable_rate = effective_variable_rate
                .saturating_add(percent_to_rate(input.payment_processing_fee_rate));
        }

        let net_revenue_per_unit = input
            .price_per_unit
            .saturating_mul(returns_factor)
            .saturating_mul(Decimal::ONE.saturating_sub(effective_variable_rate));
        let contribution_margin_per_unit =
            net_revenue_per_unit.saturating_sub(input.direct_variable_cost_per_unit);

        Self {
            other_fixed_costs,
            operational_fixed_costs,
            effective_depreciation,
            returns_factor,
            effective_variable_rate,
            net_revenue_per_unit,
            contribution_margin_per_unit,
        }
    }

    /// Everything the contribution margin has to cover before any profit.
    pub fn total_fixed_costs(&self) -> Money {
        self.operational_fixed_costs
            .saturating_add(self.effective_depreciation)
    }

    /// Total contribution at a given volume.
    pub fn contribution_at(&self, units: Units) -> Money {
        self.contribution_margin_per_unit.saturating_mul(units)
    }
}
