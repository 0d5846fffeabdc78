use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProfitabilityError;

/// A calculated figure that may be unbounded or undefined.
///
/// Break-even points, margins and targets are not always finite numbers: a
/// business whose units lose money can never break even by volume, and ROI
/// has no meaning without an investment. Those outcomes are data, not
/// errors, so they travel through the engine as variants of this type and
/// only become strings (`"Infinity"`, `"N/A"`) at the formatting boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Metric {
    /// A representable decimal result.
    Value(Decimal),
    /// Unbounded above: the target cannot be reached.
    PosInfinity,
    /// Unbounded below.
    NegInfinity,
    /// Not meaningful for the current inputs.
    NotApplicable,
}

impl Metric {
    pub const ZERO: Metric = Metric::Value(Decimal::ZERO);

    /// Lift a checked arithmetic result. Overflow means the true value is
    /// beyond anything representable, which the engine treats as unbounded.
    pub fn from_checked(value: Option<Decimal>) -> Self {
        match value {
            Some(v) => Metric::Value(v),
            None => Metric::PosInfinity,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Metric::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Metric::Value(_))
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Metric::PosInfinity | Metric::NegInfinity)
    }

    /// Clamp a finite value at zero; sentinels pass through.
    pub fn max_zero(self) -> Self {
        match self {
            Metric::Value(v) => Metric::Value(v.max(Decimal::ZERO)),
            other => other,
        }
    }
}

/// `numerator / denominator`, or `None` when the denominator is zero or the
/// quotient overflows.
pub fn checked_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        numerator.checked_div(denominator)
    }
}

impl From<Decimal> for Metric {
    fn from(v: Decimal) -> Self {
        Metric::Value(v)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v}"),
            Metric::PosInfinity => f.write_str("Infinity"),
            Metric::NegInfinity => f.write_str("-Infinity"),
            Metric::NotApplicable => f.write_str("N/A"),
        }
    }
}

impl FromStr for Metric {
    type Err = ProfitabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Infinity" => Ok(Metric::PosInfinity),
            "-Infinity" => Ok(Metric::NegInfinity),
            "N/A" => Ok(Metric::NotApplicable),
            other => Decimal::from_str(other)
                .or_else(|_| Decimal::from_scientific(other))
                .map(Metric::Value)
                .map_err(|e| ProfitabilityError::InvalidInput {
                    field: "metric".into(),
                    reason: format!("'{other}' is not a number or sentinel: {e}"),
                }),
        }
    }
}

impl From<Metric> for String {
    fn from(m: Metric) -> Self {
        m.to_string()
    }
}

impl TryFrom<String> for Metric {
    type Error = ProfitabilityError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checked_ratio_zero_denominator() {
        assert_eq!(checked_ratio(dec!(10), dec!(0)), None);
        assert_eq!(checked_ratio(dec!(10), dec!(4)), Some(dec!(2.5)));
    }

    #[test]
    fn test_checked_ratio_overflow_is_none() {
        assert_eq!(checked_ratio(Decimal::MAX, dec!(0.0001)), None);
        assert_eq!(
            Metric::from_checked(checked_ratio(Decimal::MAX, dec!(0.0001))),
            Metric::PosInfinity
        );
    }

    #[test]
    fn test_max_zero_leaves_sentinels() {
        assert_eq!(Metric::Value(dec!(-3)).max_zero(), Metric::ZERO);
        assert_eq!(Metric::PosInfinity.max_zero(), Metric::PosInfinity);
        assert_eq!(Metric::NotApplicable.max_zero(), Metric::NotApplicable);
    }

    #[test]
    fn test_serde_uses_sentinel_strings() {
        let values = vec![
            Metric::Value(dec!(33.5)),
            Metric::PosInfinity,
            Metric::NegInfinity,
            Metric::NotApplicable,
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["33.5","Infinity","-Infinity","N/A"]"#);
        let back: Vec<Metric> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("lots".parse::<Metric>().is_err());
    }
}
