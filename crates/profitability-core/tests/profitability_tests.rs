use profitability_core::input::{BusinessInputData, CustomVariableCost, RawBusinessInput};
use profitability_core::profitability::calculate_profitability;
use profitability_core::{Currency, Metric, TimePeriod};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn widget_shop() -> BusinessInputData {
    BusinessInputData {
        price_per_unit: dec!(50),
        expected_units_sold: dec!(100),
        direct_variable_cost_per_unit: dec!(20),
        salaries_wages: dec!(1000),
        ..Default::default()
    }
}

/// A busier scenario with every gate open.
fn loaded_bakery() -> BusinessInputData {
    BusinessInputData {
        price_per_unit: dec!(4.5),
        expected_units_sold: dec!(6_000),
        direct_variable_cost_per_unit: dec!(1.2),
        salaries_wages: dec!(8_000),
        marketing_costs: dec!(600),
        rent_utilities: dec!(2_400),
        other_fixed_costs: dec!(350),
        include_other_variable_costs: true,
        other_variable_costs_percentage: dec!(4),
        include_investment: true,
        initial_investment: dec!(40_000),
        include_taxes: true,
        tax_rate: dec!(21),
        include_loan: true,
        loan_payment: dec!(900),
        include_depreciation: true,
        depreciation_amortization: dec!(300),
        include_payment_processing_fees: true,
        payment_processing_fee_rate: dec!(2.9),
        include_returns_refunds: true,
        returns_refunds_rate: dec!(3),
        include_owner_draw: true,
        owner_draw: dec!(1_500),
        ..Default::default()
    }
}

/// Orders break-even volumes with `Infinity` above every finite value.
fn break_even_rank(units: Metric) -> Option<Decimal> {
    match units {
        Metric::PosInfinity => None,
        other => other.value(),
    }
}

fn assert_near_zero(value: Decimal, tolerance: Decimal) {
    assert!(
        value.abs() <= tolerance,
        "expected |{}| <= {}",
        value,
        tolerance
    );
}

// ===========================================================================
// Concrete scenarios
// ===========================================================================

#[test]
fn test_widget_shop_snapshot() {
    let r = calculate_profitability(&widget_shop());

    assert_eq!(r.total_revenue, dec!(5000));
    assert_eq!(r.total_variable_costs, dec!(2000));
    assert_eq!(r.contribution_margin, dec!(3000));
    assert_eq!(r.total_fixed_costs, dec!(1000));
    assert_eq!(r.net_profit, dec!(2000));
    assert!(r.is_profitable);
    assert_eq!(r.profit_margin, Metric::Value(dec!(0.4)));

    // 1000 / 30
    let units = r.break_even_units.value().unwrap();
    assert!((units - dec!(33.333)).abs() < dec!(0.001));
    let revenue = r.break_even_revenue.value().unwrap();
    assert!((revenue - dec!(1666.67)).abs() < dec!(0.01));
}

#[test]
fn test_zero_activity_baseline() {
    let input = BusinessInputData {
        price_per_unit: dec!(1),
        ..Default::default()
    };
    let r = calculate_profitability(&input);

    assert_eq!(r.total_revenue, Decimal::ZERO);
    assert_eq!(r.net_profit, Decimal::ZERO);
    assert!(!r.is_profitable);
    assert_eq!(r.break_even_units, Metric::ZERO);
    assert_eq!(r.profit_margin, Metric::NotApplicable);
    assert_eq!(r.roi, Metric::NotApplicable);
}

#[test]
fn test_unreachable_break_even_when_unit_margin_is_negative() {
    let mut input = widget_shop();
    input.direct_variable_cost_per_unit = dec!(55);
    let r = calculate_profitability(&input);

    assert_eq!(r.break_even_units, Metric::PosInfinity);
    assert_eq!(r.break_even_revenue, Metric::PosInfinity);
    assert!(!r.is_profitable);
}

#[test]
fn test_loaded_bakery_all_gates_open() {
    let r = calculate_profitability(&loaded_bakery());

    // 27000 revenue, 3% returns
    assert_eq!(r.total_revenue, dec!(27000));
    assert_eq!(r.revenue_after_returns, dec!(26190));
    // 7200 direct + 6.9% of 26190
    assert_eq!(r.total_variable_costs, dec!(9007.11));
    // 8000 + 600 + 2400 + 350 + 900 + 1500 + 300
    assert_eq!(r.total_fixed_costs, dec!(14050));
    assert_eq!(r.profit_before_tax, dec!(3132.89));
    assert_eq!(r.taxes_paid, dec!(657.9069));
    assert_eq!(r.net_profit, dec!(2474.9831));
    assert!(r.is_profitable);

    let roi = r.roi.value().unwrap();
    assert!((roi - dec!(0.0619)).abs() < dec!(0.0001));
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_break_even_identity_holds() {
    let scenarios = [widget_shop(), loaded_bakery(), {
        let mut s = widget_shop();
        s.include_returns_refunds = true;
        s.returns_refunds_rate = dec!(12.5);
        s.include_detailed_variable_costs = true;
        s.sales_commissions_percentage = dec!(7);
        s.rent_utilities = dec!(777.77);
        s
    }];

    for scenario in scenarios {
        let r = calculate_profitability(&scenario);
        let Metric::Value(units) = r.break_even_units else {
            panic!("expected a finite break-even, got {:?}", r.break_even_units);
        };

        let mut at_break_even = scenario.clone();
        at_break_even.expected_units_sold = units;
        let be = calculate_profitability(&at_break_even);

        assert_near_zero(be.net_profit, dec!(0.000001));
        if let Metric::Value(revenue) = r.break_even_revenue {
            assert_near_zero(be.total_revenue - revenue, dec!(0.000001));
        }
    }
}

#[test]
fn test_detailed_and_simple_modes_are_mutually_exclusive() {
    let mut simple = widget_shop();
    simple.other_fixed_costs = dec!(500);
    simple.software_subscriptions = dec!(9_999);
    simple.include_other_variable_costs = true;
    simple.other_variable_costs_percentage = dec!(10);
    simple.sales_commissions_percentage = dec!(50);

    let r = calculate_profitability(&simple);
    assert_eq!(r.total_fixed_costs, dec!(1500));
    assert_eq!(r.total_variable_costs, dec!(2500));

    let mut detailed = simple.clone();
    detailed.include_detailed_fixed_costs = true;
    detailed.include_detailed_variable_costs = true;

    let r = calculate_profitability(&detailed);
    // other_fixed_costs drops out; software subscriptions count
    assert_eq!(r.total_fixed_costs, dec!(10999));
    // 50% commissions replace the 10% simple rate
    assert_eq!(r.total_variable_costs, dec!(4500));
}

#[test]
fn test_more_returns_shrink_revenue_and_push_out_break_even() {
    let mut input = loaded_bakery();
    let mut previous: Option<(Decimal, Option<Decimal>)> = None;

    for rate in [dec!(0), dec!(5), dec!(15), dec!(40), dec!(75), dec!(100)] {
        input.returns_refunds_rate = rate;
        let r = calculate_profitability(&input);
        let revenue = r.revenue_after_returns;
        let break_even = break_even_rank(r.break_even_units);

        if let Some((prev_revenue, prev_break_even)) = previous {
            assert!(
                revenue < prev_revenue,
                "returns {}% did not shrink revenue: {} -> {}",
                rate,
                prev_revenue,
                revenue
            );
            let pushed_out = match (prev_break_even, break_even) {
                (_, None) => true,
                (None, Some(_)) => false,
                (Some(prev), Some(now)) => now >= prev,
            };
            assert!(
                pushed_out,
                "returns {}% pulled break-even in: {:?} -> {:?}",
                rate,
                prev_break_even,
                break_even
            );
        }
        previous = Some((revenue, break_even));
    }

    // Everything comes back at 100%: no unit contributes anything
    assert_eq!(
        calculate_profitability(&input).break_even_units,
        Metric::PosInfinity
    );
}

#[test]
fn test_huge_volumes_saturate_instead_of_overflowing() {
    let input = BusinessInputData {
        price_per_unit: dec!(1_000_000_000_000_000),
        expected_units_sold: dec!(1_000_000_000_000_000),
        ..Default::default()
    };
    let r = calculate_profitability(&input);

    assert_eq!(r.total_revenue, Decimal::MAX);
    assert_eq!(r.revenue_after_returns, Decimal::MAX);
    assert_eq!(r.net_profit, Decimal::MAX);
    assert!(r.is_profitable);
    assert_eq!(r.break_even_units, Metric::ZERO);
    assert_eq!(r.break_even_revenue, Metric::ZERO);
    assert_eq!(r.profit_margin, Metric::Value(dec!(1)));
}

#[test]
fn test_huge_direct_costs_saturate_to_a_loss() {
    let input = BusinessInputData {
        price_per_unit: dec!(1),
        expected_units_sold: dec!(1_000_000_000_000_000),
        direct_variable_cost_per_unit: dec!(1_000_000_000_000_000),
        ..Default::default()
    };
    let r = calculate_profitability(&input);

    assert_eq!(r.total_variable_costs, Decimal::MAX);
    assert!(r.net_profit < Decimal::ZERO);
    assert!(!r.is_profitable);
}

#[test]
fn test_tax_never_creates_profit() {
    for units in [dec!(0), dec!(10), dec!(33), dec!(34), dec!(100), dec!(1_000)] {
        let mut input = widget_shop();
        input.expected_units_sold = units;
        input.include_taxes = true;
        input.tax_rate = dec!(30);

        let r = calculate_profitability(&input);
        assert!(r.net_profit <= r.profit_before_tax);
        assert!(r.taxes_paid >= Decimal::ZERO);
        if r.profit_before_tax <= Decimal::ZERO {
            assert_eq!(r.net_profit, r.profit_before_tax);
        }
    }
}

#[test]
fn test_custom_variable_costs_do_not_change_totals() {
    let mut input = widget_shop();
    input.include_detailed_variable_costs = true;
    input.sales_commissions_percentage = dec!(5);
    let baseline = calculate_profitability(&input);

    input.custom_variable_costs = vec![CustomVariableCost {
        name: "Affiliate payouts".into(),
        percentage: dec!(15),
    }];
    let with_custom = calculate_profitability(&input);

    assert_eq!(baseline, with_custom);
}

// ===========================================================================
// Normalization
// ===========================================================================

#[test]
fn test_raw_form_input_normalizes_before_calculation() {
    let raw: RawBusinessInput = serde_json::from_value(serde_json::json!({
        "price_per_unit": "50",
        "expected_units_sold": "100",
        "direct_variable_cost_per_unit": "20",
        "salaries_wages": "1000",
        "other_fixed_costs": "400",
        "include_detailed_fixed_costs": true,
        "insurance": "100",
        "include_taxes": false,
        "tax_rate": "25",
        "currency": "OTHER",
        "custom_currency": "chf",
        "time_period": "annually"
    }))
    .unwrap();

    let input = raw.normalize();
    assert_eq!(input.other_fixed_costs, Decimal::ZERO);
    assert_eq!(input.insurance, dec!(100));
    assert_eq!(input.tax_rate, Decimal::ZERO);
    assert_eq!(input.currency, Currency::CHF);
    assert_eq!(input.time_period, TimePeriod::Annually);

    let r = calculate_profitability(&input);
    assert_eq!(r.total_fixed_costs, dec!(1100));
    assert_eq!(r.taxes_paid, Decimal::ZERO);
    assert_eq!(r.net_profit, dec!(1900));
}

#[test]
fn test_blank_form_uses_defaults() {
    let input: BusinessInputData = RawBusinessInput::default().into();
    assert_eq!(input, BusinessInputData::default());
    assert_eq!(input.price_per_unit, dec!(1));
    assert_eq!(input.currency, Currency::USD);
}
