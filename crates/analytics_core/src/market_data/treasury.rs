//! Government bond (govvie) conventions.
//!
//! Static table of sovereign benchmark settings keyed by treasury code, and the
//! benchmark code used for each currency.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::market_data::error::MarketDataError;
use crate::types::{Currency, DayCountConvention, Frequency};
use DayCountConvention::{Actual360, Actual365Fixed, ActualActual, Thirty360};
use Frequency::{Annual, SemiAnnual};

/// Conventions of a sovereign bond family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreasurySetting {
    /// Treasury code, e.g. `"UST"`.
    pub code: &'static str,
    /// Issue currency.
    pub currency: Currency,
    /// Coupon frequency.
    pub frequency: Frequency,
    /// Accrual day count.
    pub day_count: DayCountConvention,
    /// Holiday calendar code.
    pub calendar: &'static str,
}

impl fmt::Display for TreasurySetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<6} | {} | {:>2}/yr | {} | {}",
            self.code,
            self.currency,
            self.frequency.periods_per_year(),
            self.day_count,
            self.calendar
        )
    }
}

const fn setting(
    code: &'static str,
    currency: Currency,
    frequency: Frequency,
    day_count: DayCountConvention,
    calendar: &'static str,
) -> TreasurySetting {
    TreasurySetting {
        code,
        currency,
        frequency,
        day_count,
        calendar,
    }
}

/// Every built-in treasury setting, ordered by code.
pub const TREASURY_SETTINGS: [TreasurySetting; 16] = [
    setting("AGB", Currency::AUD, SemiAnnual, ActualActual, "AUD"),
    setting("BTPS", Currency::EUR, SemiAnnual, ActualActual, "EUR"),
    setting("CAN", Currency::CAD, SemiAnnual, Actual365Fixed, "CAD"),
    setting("DBR", Currency::EUR, Annual, ActualActual, "EUR"),
    setting("DGB", Currency::DKK, Annual, ActualActual, "DKK"),
    setting("FRTR", Currency::EUR, Annual, ActualActual, "EUR"),
    setting("GGB", Currency::EUR, Annual, ActualActual, "EUR"),
    setting("GILT", Currency::GBP, SemiAnnual, ActualActual, "GBP"),
    setting("GSWISS", Currency::CHF, Annual, Thirty360, "CHF"),
    setting("JGB", Currency::JPY, SemiAnnual, Actual365Fixed, "JPY"),
    setting("MBONO", Currency::MXN, SemiAnnual, Actual360, "MXN"),
    setting("NGB", Currency::NOK, Annual, ActualActual, "NOK"),
    setting("NZGB", Currency::NZD, SemiAnnual, ActualActual, "NZD"),
    setting("SGB", Currency::SEK, Annual, Thirty360, "SEK"),
    setting("SPGB", Currency::EUR, Annual, ActualActual, "EUR"),
    setting("UST", Currency::USD, SemiAnnual, ActualActual, "USD"),
];

/// Setting for a treasury code (case-insensitive).
///
/// # Example
///
/// ```
/// use analytics_core::market_data::treasury::treasury_setting;
/// use analytics_core::types::{Currency, Frequency};
///
/// let gilt = treasury_setting("gilt").unwrap();
/// assert_eq!(gilt.currency, Currency::GBP);
/// assert_eq!(gilt.frequency, Frequency::SemiAnnual);
/// ```
pub fn treasury_setting(code: &str) -> Result<TreasurySetting, MarketDataError> {
    let code = code.trim();
    TREASURY_SETTINGS
        .iter()
        .find(|s| s.code.eq_ignore_ascii_case(code))
        .copied()
        .ok_or_else(|| MarketDataError::UnknownTreasuryCode(code.to_string()))
}

/// Benchmark treasury code for `currency`, if one is registered.
///
/// Euro issuance benchmarks against the German Bund.
pub fn benchmark_code(currency: Currency) -> Option<&'static str> {
    let code = match currency {
        Currency::AUD => "AGB",
        Currency::CAD => "CAN",
        Currency::CHF => "GSWISS",
        Currency::DKK => "DGB",
        Currency::EUR => "DBR",
        Currency::GBP => "GILT",
        Currency::JPY => "JGB",
        Currency::MXN => "MBONO",
        Currency::NOK => "NGB",
        Currency::NZD => "NZGB",
        Currency::SEK => "SGB",
        Currency::USD => "UST",
        _ => return None,
    };
    Some(code)
}

/// Benchmark setting for a currency code such as `"USD"`.
pub fn benchmark_setting(currency: &str) -> Result<TreasurySetting, MarketDataError> {
    let currency = Currency::from_str(currency)
        .map_err(|_| MarketDataError::UnknownTreasuryCode(currency.to_string()))?;
    let code = benchmark_code(currency)
        .ok_or_else(|| MarketDataError::UnknownTreasuryCode(currency.to_string()))?;
    treasury_setting(code)
}
