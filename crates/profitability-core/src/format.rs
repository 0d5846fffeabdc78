//! Display formatting for results and targets.
//!
//! Amounts render en-US style (`$1,234.56`). Sentinels render as the
//! literal strings `"Infinity"`, `"-Infinity"` and `"N/A"`, which is how
//! target fields carry unreachable outcomes to the caller.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::metric::Metric;
use crate::profitability::CalculationResults;
use crate::types::{Currency, CurrencyStyle, Money};

const SMALL_AMOUNT: Decimal = dec!(0.005);

// ---------------------------------------------------------------------------
// Public formatters
// ---------------------------------------------------------------------------

/// Format a monetary metric in the given currency.
///
/// Whole amounts drop the decimals (`$5,000`), fractional amounts show two
/// (`$1,666.67`), and non-zero amounts below half a cent widen to four
/// (`$0.0025`) so they do not collapse to zero.
pub fn format_currency(value: Metric, currency: &Currency) -> String {
    match value {
        Metric::Value(v) => format_money(v, currency),
        other => sentinel(other),
    }
}

/// [`format_currency`] for a plain amount.
pub fn format_money(value: Money, currency: &Currency) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    match currency.style() {
        CurrencyStyle::Symbol(symbol) => format!("{sign}{symbol}{}", grouped_amount(value.abs())),
        CurrencyStyle::Code(code) => format!("{sign}{code} {}", grouped_amount(value.abs())),
        CurrencyStyle::RawSymbol(symbol) => format!("{symbol}{}", fixed(value, 2)),
        CurrencyStyle::Suffix(text) => format!("{} {text}", fixed(value, 2)),
    }
}

/// Format a rate as a percentage with two decimals: 0.4 => `"40.00%"`.
/// Anything that is not a finite value is `"N/A"`.
pub fn format_percentage(value: Metric) -> String {
    match value {
        Metric::Value(v) => match v.checked_mul(dec!(100)) {
            Some(pct) => format!("{}%", fixed(pct, 2)),
            None => "N/A".to_string(),
        },
        _ => "N/A".to_string(),
    }
}

/// Format a unit count: whole numbers get thousands separators
/// (`"1,250"`), fractional counts get two plain decimals (`"33.33"`).
pub fn format_units(value: Metric) -> String {
    match value {
        Metric::Value(v) if v.fract().is_zero() => {
            let sign = if v.is_sign_negative() && !v.is_zero() {
                "-"
            } else {
                ""
            };
            format!("{sign}{}", group_thousands(&v.abs().trunc().to_string()))
        }
        Metric::Value(v) => fixed(v, 2),
        other => sentinel(other),
    }
}

// ---------------------------------------------------------------------------
// Formatted results
// ---------------------------------------------------------------------------

/// [`CalculationResults`] rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedResults {
    pub total_revenue: String,
    pub revenue_after_returns: String,
    pub total_variable_costs: String,
    pub contribution_margin: String,
    pub gross_profit: String,
    pub total_fixed_costs: String,
    pub profit_before_tax: String,
    pub taxes_paid: String,
    pub net_profit: String,
    /// "Yes" or "No"
    pub is_profitable: String,
    pub break_even_units: String,
    pub break_even_revenue: String,
    pub profit_margin: String,
    pub roi: String,
}

pub fn format_results(results: &CalculationResults, currency: &Currency) -> FormattedResults {
    let money = |v: Money| format_money(v, currency);
    FormattedResults {
        total_revenue: money(results.total_revenue),
        revenue_after_returns: money(results.revenue_after_returns),
        total_variable_costs: money(results.total_variable_costs),
        contribution_margin: money(results.contribution_margin),
        gross_profit: money(results.gross_profit),
        total_fixed_costs: money(results.total_fixed_costs),
        profit_before_tax: money(results.profit_before_tax),
        taxes_paid: money(results.taxes_paid),
        net_profit: money(results.net_profit),
        is_profitable: if results.is_profitable { "Yes" } else { "No" }.to_string(),
        break_even_units: format_units(results.break_even_units),
        break_even_revenue: format_currency(results.break_even_revenue, currency),
        profit_margin: format_percentage(results.profit_margin),
        roi: format_percentage(results.roi),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sentinel(value: Metric) -> String {
    match value {
        Metric::PosInfinity => "Infinity".to_string(),
        Metric::NegInfinity => "-Infinity".to_string(),
        _ => "N/A".to_string(),
    }
}

/// Round half away from zero to exactly `dp` decimals, no grouping.
fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Grouped non-negative amount with the decimal rules of `format_currency`.
fn grouped_amount(abs: Decimal) -> String {
    let (int_part, frac_part) = if !abs.is_zero() && abs < SMALL_AMOUNT {
        let digits = fixed(abs, 4);
        let (int_part, frac) = split_decimal(&digits);
        let trimmed = frac.trim_end_matches('0');
        let frac = if trimmed.len() < 2 {
            format!("{trimmed:0<2}")
        } else {
            trimmed.to_string()
        };
        (int_part.to_string(), Some(frac))
    } else if abs.fract().is_zero() {
        (abs.trunc().to_string(), None)
    } else {
        let digits = fixed(abs, 2);
        let (int_part, frac) = split_decimal(&digits);
        (int_part.to_string(), Some(frac.to_string()))
    };

    let grouped = group_thousands(&int_part);
    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}

fn split_decimal(digits: &str) -> (&str, &str) {
    digits.split_once('.').unwrap_or((digits, ""))
}

fn group_thousands(int_digits: &str) -> String {
    let len = int_digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn usd() -> Currency {
        Currency::USD
    }

    #[test]
    fn test_currency_whole_and_fractional() {
        assert_eq!(format_money(dec!(5000), &usd()), "$5,000");
        assert_eq!(format_money(dec!(0), &usd()), "$0");
        assert_eq!(format_money(dec!(1666.666666), &usd()), "$1,666.67");
        assert_eq!(format_money(dec!(2.5), &usd()), "$2.50");
        assert_eq!(format_money(dec!(2.999), &usd()), "$3.00");
        assert_eq!(format_money(dec!(1234567.891), &usd()), "$1,234,567.89");
    }

    #[test]
    fn test_currency_negative_sign_precedes_symbol() {
        assert_eq!(format_money(dec!(-800), &usd()), "-$800");
        assert_eq!(format_money(dec!(-1234.5), &Currency::EUR), "-€1,234.50");
    }

    #[test]
    fn test_currency_small_amounts_widen_precision() {
        assert_eq!(format_money(dec!(0.0025), &usd()), "$0.0025");
        assert_eq!(format_money(dec!(0.001), &usd()), "$0.001");
        assert_eq!(format_money(dec!(0.004), &usd()), "$0.004");
        assert_eq!(format_money(dec!(0.00001), &usd()), "$0.00");
    }

    #[test]
    fn test_currency_styles() {
        assert_eq!(format_money(dec!(1500.5), &Currency::GBP), "£1,500.50");
        assert_eq!(format_money(dec!(1500), &Currency::CHF), "CHF 1,500");
        assert_eq!(format_money(dec!(1500), &Currency::from("SEK")), "SEK 1,500");
        assert_eq!(format_money(dec!(1500), &Currency::from("฿")), "฿1500.00");
        assert_eq!(format_money(dec!(1500), &Currency::from("kr")), "1500.00 kr");
    }

    #[test]
    fn test_currency_sentinels() {
        assert_eq!(format_currency(Metric::PosInfinity, &usd()), "Infinity");
        assert_eq!(format_currency(Metric::NegInfinity, &usd()), "-Infinity");
        assert_eq!(format_currency(Metric::NotApplicable, &usd()), "N/A");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(Metric::Value(dec!(0.4))), "40.00%");
        assert_eq!(format_percentage(Metric::Value(dec!(-0.12345))), "-12.35%");
        assert_eq!(format_percentage(Metric::PosInfinity), "N/A");
        assert_eq!(format_percentage(Metric::NotApplicable), "N/A");
    }

    #[test]
    fn test_units() {
        assert_eq!(format_units(Metric::Value(dec!(1250))), "1,250");
        assert_eq!(format_units(Metric::Value(dec!(33.3333))), "33.33");
        assert_eq!(format_units(Metric::Value(dec!(1234.5))), "1234.50");
        assert_eq!(format_units(Metric::Value(dec!(0))), "0");
        assert_eq!(format_units(Metric::PosInfinity), "Infinity");
        assert_eq!(format_units(Metric::NotApplicable), "N/A");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("12345678"), "12,345,678");
    }
}
