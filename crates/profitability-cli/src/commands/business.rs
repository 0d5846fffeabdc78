use clap::Args;
use rust_decimal::Decimal;
use tracing::debug;

use profitability_core::input::{BusinessInputData, RawBusinessInput};
use profitability_core::{Currency, TimePeriod};

use crate::input;

/// Global options applied after the input record is loaded.
#[derive(Debug, Default)]
pub struct Overrides {
    pub currency: Option<String>,
    pub period: Option<TimePeriod>,
}

/// Business scenario supplied as a file, piped JSON, or individual flags.
///
/// Percentages are percentage points (`--tax-rate 21` is 21%). Passing an
/// optional cost or rate switches its toggle on. Detailed cost breakdowns
/// are only available through `--input`.
#[derive(Args, Debug, Default)]
#[command(allow_hyphen_values = true)]
pub struct BusinessArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Selling price per unit
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Expected units sold in the period
    #[arg(long)]
    pub units: Option<Decimal>,

    /// Direct variable cost per unit
    #[arg(long)]
    pub direct_cost: Option<Decimal>,

    /// Salaries and wages
    #[arg(long)]
    pub salaries: Option<Decimal>,

    /// Marketing costs
    #[arg(long)]
    pub marketing: Option<Decimal>,

    /// Rent and utilities
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Other fixed costs
    #[arg(long)]
    pub other_fixed: Option<Decimal>,

    /// Other variable costs as a percentage of revenue after returns
    #[arg(long)]
    pub variable_cost_pct: Option<Decimal>,

    /// Payment processing fee percentage
    #[arg(long)]
    pub payment_fee_rate: Option<Decimal>,

    /// Returns and refunds percentage of gross revenue
    #[arg(long)]
    pub returns_rate: Option<Decimal>,

    /// Income tax percentage, applied to positive profit only
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Loan repayment for the period
    #[arg(long)]
    pub loan_payment: Option<Decimal>,

    /// Depreciation and amortization for the period
    #[arg(long)]
    pub depreciation: Option<Decimal>,

    /// Owner's draw for the period
    #[arg(long)]
    pub owner_draw: Option<Decimal>,

    /// Initial investment, enables ROI
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Desired net profit margin percentage for target solving
    #[arg(long)]
    pub desired_margin: Option<Decimal>,
}

/// Load and normalize the scenario, then apply global overrides.
pub fn load_business_input(
    args: &BusinessArgs,
    overrides: &Overrides,
) -> Result<BusinessInputData, Box<dyn std::error::Error>> {
    let raw: RawBusinessInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        raw_from_flags(args)?
    };

    let mut business = raw.normalize();
    apply_overrides(&mut business, overrides);
    debug!(
        currency = %business.currency,
        period = %business.time_period,
        "loaded business input"
    );
    Ok(business)
}

fn raw_from_flags(args: &BusinessArgs) -> Result<RawBusinessInput, Box<dyn std::error::Error>> {
    Ok(RawBusinessInput {
        price_per_unit: Some(args.price.ok_or("--price is required (or provide --input)")?),
        expected_units_sold: Some(args.units.ok_or("--units is required (or provide --input)")?),
        direct_variable_cost_per_unit: args.direct_cost,
        salaries_wages: args.salaries,
        marketing_costs: args.marketing,
        rent_utilities: args.rent,
        other_fixed_costs: args.other_fixed,

        include_other_variable_costs: args.variable_cost_pct.is_some(),
        other_variable_costs_percentage: args.variable_cost_pct,
        include_payment_processing_fees: args.payment_fee_rate.is_some(),
        payment_processing_fee_rate: args.payment_fee_rate,
        include_returns_refunds: args.returns_rate.is_some(),
        returns_refunds_rate: args.returns_rate,
        include_taxes: args.tax_rate.is_some(),
        tax_rate: args.tax_rate,
        include_loan: args.loan_payment.is_some(),
        loan_payment: args.loan_payment,
        include_depreciation: args.depreciation.is_some(),
        depreciation_amortization: args.depreciation,
        include_owner_draw: args.owner_draw.is_some(),
        owner_draw: args.owner_draw,
        include_investment: args.investment.is_some(),
        initial_investment: args.investment,

        desired_profit_margin: args.desired_margin,
        ..Default::default()
    })
}

fn apply_overrides(business: &mut BusinessInputData, overrides: &Overrides) {
    if let Some(ref code) = overrides.currency {
        business.currency = Currency::from(code.as_str());
    }
    if let Some(period) = overrides.period {
        business.time_period = period;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flags_open_their_toggles() {
        let args = BusinessArgs {
            price: Some(dec!(50)),
            units: Some(dec!(100)),
            salaries: Some(dec!(1000)),
            tax_rate: Some(dec!(20)),
            investment: Some(dec!(10000)),
            ..Default::default()
        };
        let business = raw_from_flags(&args).unwrap().normalize();

        assert!(business.include_taxes);
        assert_eq!(business.tax_rate, dec!(20));
        assert!(business.include_investment);
        assert!(!business.include_loan);
        assert!(!business.include_returns_refunds);
        assert_eq!(business.salaries_wages, dec!(1000));
    }

    #[test]
    fn test_price_and_units_are_required_without_input() {
        let args = BusinessArgs {
            units: Some(dec!(10)),
            ..Default::default()
        };
        let err = raw_from_flags(&args).unwrap_err();
        assert!(err.to_string().contains("--price"));
    }

    #[test]
    fn test_overrides_replace_currency_and_period() {
        let mut business = BusinessInputData::default();
        apply_overrides(
            &mut business,
            &Overrides {
                currency: Some("eur".into()),
                period: Some(TimePeriod::Annually),
            },
        );
        assert_eq!(business.currency, Currency::EUR);
        assert_eq!(business.time_period, TimePeriod::Annually);
    }
}
