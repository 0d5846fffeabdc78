use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Currency, Money, Percent, TimePeriod, Units};

// ---------------------------------------------------------------------------
// Types: Normalized input
// ---------------------------------------------------------------------------

/// A named fixed cost entered in detailed mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFixedCost {
    pub name: String,
    pub amount: Money,
}

/// A named variable cost entered in detailed mode, as a percentage of
/// revenue after returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomVariableCost {
    pub name: String,
    pub percentage: Percent,
}

/// Revenue and cost inputs for a single period.
///
/// Every field is always present. Optional costs are paired with an
/// `include_*` gate and the engine reads the amount only when its gate is
/// on, so a stale value behind a closed gate never leaks into a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessInputData {
    // --- Unit economics ---
    pub price_per_unit: Money,
    pub expected_units_sold: Units,
    pub direct_variable_cost_per_unit: Money,

    // --- Fixed costs, always active ---
    pub salaries_wages: Money,
    pub marketing_costs: Money,
    pub rent_utilities: Money,

    // --- Fixed costs, simple vs detailed ---
    pub include_detailed_fixed_costs: bool,
    /// Used when `include_detailed_fixed_costs` is false
    pub other_fixed_costs: Money,
    pub software_subscriptions: Money,
    pub professional_fees: Money,
    pub insurance: Money,
    pub licenses_and_permits: Money,
    pub other_detailed_fixed_costs: Money,
    pub custom_fixed_costs: Vec<CustomFixedCost>,

    // --- Variable costs, simple vs detailed ---
    pub include_other_variable_costs: bool,
    /// Used when simple variable costs are on and detailed are off
    pub other_variable_costs_percentage: Percent,
    pub include_detailed_variable_costs: bool,
    pub sales_commissions_percentage: Percent,
    pub variable_shipping_fulfillment_percentage: Percent,
    pub other_specific_variable_cost_percentage: Percent,
    pub custom_variable_costs: Vec<CustomVariableCost>,

    // --- Gated adjustments ---
    pub include_investment: bool,
    pub initial_investment: Money,
    pub include_taxes: bool,
    pub tax_rate: Percent,
    pub include_loan: bool,
    pub loan_payment: Money,
    pub include_depreciation: bool,
    pub depreciation_amortization: Money,
    pub include_payment_processing_fees: bool,
    pub payment_processing_fee_rate: Percent,
    pub include_returns_refunds: bool,
    pub returns_refunds_rate: Percent,
    pub include_owner_draw: bool,
    pub owner_draw: Money,

    // --- Goal ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_profit_margin: Option<Percent>,

    // --- Presentation ---
    pub time_period: TimePeriod,
    pub currency: Currency,
}

impl Default for BusinessInputData {
    fn default() -> Self {
        Self {
            price_per_unit: dec!(1),
            expected_units_sold: Decimal::ZERO,
            direct_variable_cost_per_unit: Decimal::ZERO,
            salaries_wages: Decimal::ZERO,
            marketing_costs: Decimal::ZERO,
            rent_utilities: Decimal::ZERO,
            include_detailed_fixed_costs: false,
            other_fixed_costs: Decimal::ZERO,
            software_subscriptions: Decimal::ZERO,
            professional_fees: Decimal::ZERO,
            insurance: Decimal::ZERO,
            licenses_and_permits: Decimal::ZERO,
            other_detailed_fixed_costs: Decimal::ZERO,
            custom_fixed_costs: Vec::new(),
            include_other_variable_costs: false,
            other_variable_costs_percentage: Decimal::ZERO,
            include_detailed_variable_costs: false,
            sales_commissions_percentage: Decimal::ZERO,
            variable_shipping_fulfillment_percentage: Decimal::ZERO,
            other_specific_variable_cost_percentage: Decimal::ZERO,
            custom_variable_costs: Vec::new(),
            include_investment: false,
            initial_investment: Decimal::ZERO,
            include_taxes: false,
            tax_rate: Decimal::ZERO,
            include_loan: false,
            loan_payment: Decimal::ZERO,
            include_depreciation: false,
            depreciation_amortization: Decimal::ZERO,
            include_payment_processing_fees: false,
            payment_processing_fee_rate: Decimal::ZERO,
            include_returns_refunds: false,
            returns_refunds_rate: Decimal::ZERO,
            include_owner_draw: false,
            owner_draw: Decimal::ZERO,
            desired_profit_margin: None,
            time_period: TimePeriod::Monthly,
            currency: Currency::USD,
        }
    }
}

// ---------------------------------------------------------------------------
// Cost-detail modes
// ---------------------------------------------------------------------------

/// The "other fixed costs" branch selected by `include_detailed_fixed_costs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixedCostMode<'a> {
    Simple {
        other_fixed_costs: Money,
    },
    Detailed {
        software_subscriptions: Money,
        professional_fees: Money,
        insurance: Money,
        licenses_and_permits: Money,
        other_detailed_fixed_costs: Money,
        /// Carried for display; not part of [`FixedCostMode::amount`].
        custom: &'a [CustomFixedCost],
    },
}

impl FixedCostMode<'_> {
    /// Amount this mode contributes to operational fixed costs.
    pub fn amount(&self) -> Money {
        match self {
            FixedCostMode::Simple { other_fixed_costs } => *other_fixed_costs,
            FixedCostMode::Detailed {
                software_subscriptions,
                professional_fees,
                insurance,
                licenses_and_permits,
                other_detailed_fixed_costs,
                ..
            } => {
                software_subscriptions
                    .saturating_add(*professional_fees)
                    .saturating_add(*insurance)
                    .saturating_add(*licenses_and_permits)
                    .saturating_add(*other_detailed_fixed_costs)
            }
        }
    }
}

/// The variable-cost branch beyond direct cost per unit. Detailed wins over
/// simple when both toggles are on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableCostMode<'a> {
    Off,
    Simple {
        other_variable_costs_percentage: Percent,
    },
    Detailed {
        sales_commissions_percentage: Percent,
        variable_shipping_fulfillment_percentage: Percent,
        other_specific_variable_cost_percentage: Percent,
        /// Carried for display; not part of [`VariableCostMode::percentage`].
        custom: &'a [CustomVariableCost],
    },
}

impl VariableCostMode<'_> {
    /// Combined percentage of revenue after returns for this mode.
    pub fn percentage(&self) -> Percent {
        match self {
            VariableCostMode::Off => Decimal::ZERO,
            VariableCostMode::Simple {
                other_variable_costs_percentage,
            } => *other_variable_costs_percentage,
            VariableCostMode::Detailed {
                sales_commissions_percentage,
                variable_shipping_fulfillment_percentage,
                other_specific_variable_cost_percentage,
                ..
            } => {
                sales_commissions_percentage
                    .saturating_add(*variable_shipping_fulfillment_percentage)
                    .saturating_add(*other_specific_variable_cost_percentage)
            }
        }
    }
}

impl BusinessInputData {
    pub fn fixed_cost_mode(&self) -> FixedCostMode<'_> {
        if self.include_detailed_fixed_costs {
            FixedCostMode::Detailed {
                software_subscriptions: self.software_subscriptions,
                professional_fees: self.professional_fees,
                insurance: self.insurance,
                licenses_and_permits: self.licenses_and_permits,
                other_detailed_fixed_costs: self.other_detailed_fixed_costs,
                custom: &self.custom_fixed_costs,
            }
        } else {
            FixedCostMode::Simple {
                other_fixed_costs: self.other_fixed_costs,
            }
        }
    }

    pub fn variable_cost_mode(&self) -> VariableCostMode<'_> {
        if self.include_detailed_variable_costs {
            VariableCostMode::Detailed {
                sales_commissions_percentage: self.sales_commissions_percentage,
                variable_shipping_fulfillment_percentage: self
                    .variable_shipping_fulfillment_percentage,
                other_specific_variable_cost_percentage: self
                    .other_specific_variable_cost_percentage,
                custom: &self.custom_variable_costs,
            }
        } else if self.include_other_variable_costs {
            VariableCostMode::Simple {
                other_variable_costs_percentage: self.other_variable_costs_percentage,
            }
        } else {
            VariableCostMode::Off
        }
    }
}

// ---------------------------------------------------------------------------
// Types: Raw form input
// ---------------------------------------------------------------------------

/// Input as captured from a form: numeric fields may be blank and the
/// inactive branch of each toggle may still hold whatever was typed before.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBusinessInput {
    pub price_per_unit: Option<Money>,
    pub expected_units_sold: Option<Units>,
    pub direct_variable_cost_per_unit: Option<Money>,
    pub salaries_wages: Option<Money>,
    pub marketing_costs: Option<Money>,
    pub rent_utilities: Option<Money>,

    pub include_detailed_fixed_costs: bool,
    pub other_fixed_costs: Option<Money>,
    pub software_subscriptions: Option<Money>,
    pub professional_fees: Option<Money>,
    pub insurance: Option<Money>,
    pub licenses_and_permits: Option<Money>,
    pub other_detailed_fixed_costs: Option<Money>,
    pub custom_fixed_costs: Vec<CustomFixedCost>,

    pub include_other_variable_costs: bool,
    pub other_variable_costs_percentage: Option<Percent>,
    pub include_detailed_variable_costs: bool,
    pub sales_commissions_percentage: Option<Percent>,
    pub variable_shipping_fulfillment_percentage: Option<Percent>,
    pub other_specific_variable_cost_percentage: Option<Percent>,
    pub custom_variable_costs: Vec<CustomVariableCost>,

    pub include_investment: bool,
    pub initial_investment: Option<Money>,
    pub include_taxes: bool,
    pub tax_rate: Option<Percent>,
    pub include_loan: bool,
    pub loan_payment: Option<Money>,
    pub include_depreciation: bool,
    pub depreciation_amortization: Option<Money>,
    pub include_payment_processing_fees: bool,
    pub payment_processing_fee_rate: Option<Percent>,
    pub include_returns_refunds: bool,
    pub returns_refunds_rate: Option<Percent>,
    pub include_owner_draw: bool,
    pub owner_draw: Option<Money>,

    pub desired_profit_margin: Option<Percent>,

    pub time_period: Option<TimePeriod>,
    /// ISO code, a symbol, or `"OTHER"` to use `custom_currency`
    pub currency: Option<String>,
    pub custom_currency: Option<String>,
}

/// Value of a gated field: the entered amount when the gate is on, zero
/// otherwise.
fn gated(enabled: bool, value: Option<Decimal>) -> Decimal {
    if enabled {
        value.unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

impl RawBusinessInput {
    /// Resolve blanks to defaults and zero every field hidden behind a
    /// closed toggle. No range checking happens here.
    pub fn normalize(self) -> BusinessInputData {
        let detailed_fixed = self.include_detailed_fixed_costs;
        let detailed_variable = self.include_detailed_variable_costs;
        let simple_variable = self.include_other_variable_costs && !detailed_variable;

        let currency = match self.currency.as_deref().map(str::trim) {
            Some("OTHER") => match self.custom_currency.as_deref().map(str::trim) {
                Some(custom) if !custom.is_empty() => Currency::from(custom),
                _ => Currency::Other("???".to_string()),
            },
            Some(code) if !code.is_empty() => Currency::from(code),
            _ => Currency::USD,
        };

        BusinessInputData {
            price_per_unit: self.price_per_unit.unwrap_or(dec!(1)),
            expected_units_sold: self.expected_units_sold.unwrap_or(Decimal::ZERO),
            direct_variable_cost_per_unit: self
                .direct_variable_cost_per_unit
                .unwrap_or(Decimal::ZERO),
            salaries_wages: self.salaries_wages.unwrap_or(Decimal::ZERO),
            marketing_costs: self.marketing_costs.unwrap_or(Decimal::ZERO),
            rent_utilities: self.rent_utilities.unwrap_or(Decimal::ZERO),

            include_detailed_fixed_costs: detailed_fixed,
            other_fixed_costs: gated(!detailed_fixed, self.other_fixed_costs),
            software_subscriptions: gated(detailed_fixed, self.software_subscriptions),
            professional_fees: gated(detailed_fixed, self.professional_fees),
            insurance: gated(detailed_fixed, self.insurance),
            licenses_and_permits: gated(detailed_fixed, self.licenses_and_permits),
            other_detailed_fixed_costs: gated(detailed_fixed, self.other_detailed_fixed_costs),
            custom_fixed_costs: self.custom_fixed_costs,

            include_other_variable_costs: self.include_other_variable_costs,
            other_variable_costs_percentage: gated(
                simple_variable,
                self.other_variable_costs_percentage,
            ),
            include_detailed_variable_costs: detailed_variable,
            sales_commissions_percentage: gated(
                detailed_variable,
                self.sales_commissions_percentage,
            ),
            variable_shipping_fulfillment_percentage: gated(
                detailed_variable,
                self.variable_shipping_fulfillment_percentage,
            ),
            other_specific_variable_cost_percentage: gated(
                detailed_variable,
                self.other_specific_variable_cost_percentage,
            ),
            custom_variable_costs: self.custom_variable_costs,

            include_investment: self.include_investment,
            initial_investment: gated(self.include_investment, self.initial_investment),
            include_taxes: self.include_taxes,
            tax_rate: gated(self.include_taxes, self.tax_rate),
            include_loan: self.include_loan,
            loan_payment: gated(self.include_loan, self.loan_payment),
            include_depreciation: self.include_depreciation,
            depreciation_amortization: gated(
                self.include_depreciation,
                self.depreciation_amortization,
            ),
            include_payment_processing_fees: self.include_payment_processing_fees,
            payment_processing_fee_rate: gated(
                self.include_payment_processing_fees,
                self.payment_processing_fee_rate,
            ),
            include_returns_refunds: self.include_returns_refunds,
            returns_refunds_rate: gated(self.include_returns_refunds, self.returns_refunds_rate),
            include_owner_draw: self.include_owner_draw,
            owner_draw: gated(self.include_owner_draw, self.owner_draw),

            desired_profit_margin: self.desired_profit_margin,
            time_period: self.time_period.unwrap_or_default(),
            currency,
        }
    }
}

impl From<RawBusinessInput> for BusinessInputData {
    fn from(raw: RawBusinessInput) -> Self {
        raw.normalize()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
