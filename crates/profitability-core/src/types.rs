use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProfitabilityError;
use crate::ProfitabilityResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// User-facing percentage points (5 = 5%). Convert with [`percent_to_rate`]
/// before using in arithmetic.
pub type Percent = Decimal;

/// Unit counts. Fractional values appear in break-even and target results.
pub type Units = Decimal;

/// Convert percentage points into a rate: 15 => 0.15.
pub fn percent_to_rate(pct: Percent) -> Rate {
    pct / dec!(100)
}

/// Currency used to render monetary values.
///
/// Known ISO codes carry an en-US display symbol. Anything else is kept
/// verbatim in `Other`, which may be an unlisted ISO code ("SEK") or a bare
/// symbol ("฿").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    GBP,
    #[default]
    USD,
    EUR,
    CHF,
    JPY,
    CAD,
    AUD,
    NZD,
    HKD,
    SGD,
    INR,
    CNY,
    KRW,
    MXN,
    BRL,
    ILS,
    Other(String),
}

/// How a currency is laid out around an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyStyle<'a> {
    /// Symbol glued to a grouped amount: `$1,234.50`
    Symbol(&'a str),
    /// ISO code, space, grouped amount: `CHF 1,234.50`
    Code(&'a str),
    /// Unrecognised symbol glued to a fixed two-decimal amount: `฿1234.50`
    RawSymbol(&'a str),
    /// Unrecognised text after a fixed two-decimal amount: `1234.50 kr`
    Suffix(&'a str),
}

impl Currency {
    pub fn code(&self) -> &str {
        match self {
            Currency::GBP => "GBP",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::CHF => "CHF",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::NZD => "NZD",
            Currency::HKD => "HKD",
            Currency::SGD => "SGD",
            Currency::INR => "INR",
            Currency::CNY => "CNY",
            Currency::KRW => "KRW",
            Currency::MXN => "MXN",
            Currency::BRL => "BRL",
            Currency::ILS => "ILS",
            Currency::Other(s) => s.as_str(),
        }
    }

    pub fn style(&self) -> CurrencyStyle<'_> {
        match self {
            Currency::GBP => CurrencyStyle::Symbol("£"),
            Currency::USD => CurrencyStyle::Symbol("$"),
            Currency::EUR => CurrencyStyle::Symbol("€"),
            Currency::JPY => CurrencyStyle::Symbol("¥"),
            Currency::CAD => CurrencyStyle::Symbol("CA$"),
            Currency::AUD => CurrencyStyle::Symbol("A$"),
            Currency::NZD => CurrencyStyle::Symbol("NZ$"),
            Currency::HKD => CurrencyStyle::Symbol("HK$"),
            Currency::INR => CurrencyStyle::Symbol("₹"),
            Currency::CNY => CurrencyStyle::Symbol("CN¥"),
            Currency::KRW => CurrencyStyle::Symbol("₩"),
            Currency::MXN => CurrencyStyle::Symbol("MX$"),
            Currency::BRL => CurrencyStyle::Symbol("R$"),
            Currency::ILS => CurrencyStyle::Symbol("₪"),
            Currency::CHF | Currency::SGD => CurrencyStyle::Code(self.code()),
            Currency::Other(s) => {
                if is_iso_code(s) {
                    CurrencyStyle::Code(s)
                } else if s.chars().next().is_some_and(|c| !c.is_alphanumeric()) {
                    CurrencyStyle::RawSymbol(s)
                } else {
                    CurrencyStyle::Suffix(s)
                }
            }
        }
    }
}

fn is_iso_code(s: &str) -> bool {
    s.len() == 3 && s.chars().all(|c| c.is_ascii_uppercase())
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();
        match upper.as_str() {
            "GBP" => Currency::GBP,
            "USD" => Currency::USD,
            "EUR" => Currency::EUR,
            "CHF" => Currency::CHF,
            "JPY" => Currency::JPY,
            "CAD" => Currency::CAD,
            "AUD" => Currency::AUD,
            "NZD" => Currency::NZD,
            "HKD" => Currency::HKD,
            "SGD" => Currency::SGD,
            "INR" => Currency::INR,
            "CNY" => Currency::CNY,
            "KRW" => Currency::KRW,
            "MXN" => Currency::MXN,
            "BRL" => Currency::BRL,
            "ILS" => Currency::ILS,
            _ if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) => {
                Currency::Other(upper)
            }
            _ => Currency::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Currency::from(s.as_str())
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Length of the period every amount in an input record refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    #[default]
    Monthly,
    Annually,
}

impl TimePeriod {
    /// Singular label used in "per Month" / "per Year" captions.
    pub fn label(&self) -> &'static str {
        match self {
            TimePeriod::Monthly => "Month",
            TimePeriod::Annually => "Year",
        }
    }
}

impl FromStr for TimePeriod {
    type Err = ProfitabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(TimePeriod::Monthly),
            "annually" | "annual" | "yearly" | "year" => Ok(TimePeriod::Annually),
            other => Err(ProfitabilityError::InvalidInput {
                field: "time_period".into(),
                reason: format!("expected 'monthly' or 'annually', got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePeriod::Monthly => f.write_str("monthly"),
            TimePeriod::Annually => f.write_str("annually"),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ProfitabilityResult<ComputationOutput<T>> {
    Ok(ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions)?,
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    })
}
