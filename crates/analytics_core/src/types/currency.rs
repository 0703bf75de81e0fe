//! ISO 4217 currency codes with metadata.
//!
//! Covers the currencies referenced by the treasury conventions and the SIMM
//! interest-rate threshold groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CurrencyError;

/// ISO 4217 currency code.
///
/// # Examples
///
/// ```
/// use analytics_core::types::Currency;
///
/// let nok: Currency = "nok".parse().unwrap();
/// assert_eq!(nok, Currency::NOK);
/// assert_eq!(nok.code(), "NOK");
/// assert_eq!(Currency::KRW.decimal_places(), 0);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    /// Australian Dollar
    AUD,
    /// Canadian Dollar
    CAD,
    /// Swiss Franc
    CHF,
    /// Danish Krone
    DKK,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Hong Kong Dollar
    HKD,
    /// Japanese Yen
    JPY,
    /// South Korean Won
    KRW,
    /// Mexican Peso
    MXN,
    /// Norwegian Krone
    NOK,
    /// New Zealand Dollar
    NZD,
    /// Swedish Krona
    SEK,
    /// Singapore Dollar
    SGD,
    /// New Taiwan Dollar
    TWD,
    /// United States Dollar
    USD,
}

impl Currency {
    /// All supported currencies in code order.
    pub const ALL: [Currency; 16] = [
        Currency::AUD,
        Currency::CAD,
        Currency::CHF,
        Currency::DKK,
        Currency::EUR,
        Currency::GBP,
        Currency::HKD,
        Currency::JPY,
        Currency::KRW,
        Currency::MXN,
        Currency::NOK,
        Currency::NZD,
        Currency::SEK,
        Currency::SGD,
        Currency::TWD,
        Currency::USD,
    ];

    /// Returns the three-letter ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::CHF => "CHF",
            Currency::DKK => "DKK",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::HKD => "HKD",
            Currency::JPY => "JPY",
            Currency::KRW => "KRW",
            Currency::MXN => "MXN",
            Currency::NOK => "NOK",
            Currency::NZD => "NZD",
            Currency::SEK => "SEK",
            Currency::SGD => "SGD",
            Currency::TWD => "TWD",
            Currency::USD => "USD",
        }
    }

    /// Returns the number of minor-unit decimal places.
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY | Currency::KRW => 0,
            _ => 2,
        }
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, CurrencyError> {
        let upper = s.trim().to_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.code() == upper)
            .ok_or_else(|| CurrencyError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    /// Formats as ISO 4217 code.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
