//! Interest rate concentration thresholds, SIMM 2.4.
//!
//! Currencies fall into four risk groups by volatility and trading
//! frequency. Delta thresholds are in USD mm per bp, vega thresholds in
//! USD mm. A currency without an explicit group belongs to group 1.

use std::fmt;

use serde::Serialize;

use crate::error::MarginError;

/// Interest rate volatility regime of a currency group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityType {
    /// Low volatility
    Low,
    /// Regular volatility
    Regular,
    /// High volatility
    High,
}

/// Trading frequency of a currency group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeFrequency {
    /// Well traded
    WellTraded,
    /// Less well traded
    LessWellTraded,
}

impl fmt::Display for VolatilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Regular => "REGULAR",
            Self::High => "HIGH",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for TradeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::WellTraded => "WELL TRADED",
            Self::LessWellTraded => "LESS WELL TRADED",
        };
        write!(f, "{s}")
    }
}

/// Delta and vega concentration thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeltaVegaThreshold {
    /// Delta threshold
    pub delta: f64,
    /// Vega threshold
    pub vega: f64,
}

/// A currency risk group and its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IrThreshold {
    /// Group number, 1 to 4
    pub group: u8,
    /// Volatility regime
    pub volatility_type: VolatilityType,
    /// Trading frequency
    pub trade_frequency: TradeFrequency,
    /// Member currencies; group 1 is the catch-all `"Other"`
    pub currencies: &'static [&'static str],
    /// Concentration thresholds
    pub threshold: DeltaVegaThreshold,
}

/// Risk groups ordered by group number.
pub const IR_THRESHOLDS_24: [IrThreshold; 4] = [
    IrThreshold {
        group: 1,
        volatility_type: VolatilityType::High,
        trade_frequency: TradeFrequency::LessWellTraded,
        currencies: &["Other"],
        threshold: DeltaVegaThreshold {
            delta: 22.0,
            vega: 83.0,
        },
    },
    IrThreshold {
        group: 2,
        volatility_type: VolatilityType::Regular,
        trade_frequency: TradeFrequency::WellTraded,
        currencies: &["USD", "EUR", "GBP"],
        threshold: DeltaVegaThreshold {
            delta: 240.0,
            vega: 2600.0,
        },
    },
    IrThreshold {
        group: 3,
        volatility_type: VolatilityType::Regular,
        trade_frequency: TradeFrequency::LessWellTraded,
        currencies: &[
            "AUD", "CAD", "CHF", "DKK", "HKD", "KRW", "NOK", "NZD", "SEK", "SGD", "TWD",
        ],
        threshold: DeltaVegaThreshold {
            delta: 44.0,
            vega: 270.0,
        },
    },
    IrThreshold {
        group: 4,
        volatility_type: VolatilityType::Low,
        trade_frequency: TradeFrequency::WellTraded,
        currencies: &["JPY"],
        threshold: DeltaVegaThreshold {
            delta: 120.0,
            vega: 980.0,
        },
    },
];

/// Group of an explicitly mapped currency (case-insensitive).
pub fn currency_group(currency: &str) -> Option<u8> {
    let currency = currency.trim();
    IR_THRESHOLDS_24
        .iter()
        .skip(1)
        .find(|t| t.currencies.iter().any(|c| c.eq_ignore_ascii_case(currency)))
        .map(|t| t.group)
}

/// Threshold for a currency, falling back to group 1.
///
/// # Examples
///
/// ```
/// use analytics_margin::rates::threshold_for_currency;
///
/// assert_eq!(threshold_for_currency("jpy").group, 4);
/// assert_eq!(threshold_for_currency("BRL").threshold.delta, 22.0);
/// ```
pub fn threshold_for_currency(currency: &str) -> &'static IrThreshold {
    let group = currency_group(currency).unwrap_or(1);
    &IR_THRESHOLDS_24[usize::from(group) - 1]
}

/// Threshold for a group number.
pub fn threshold_for_group(group: u8) -> Result<&'static IrThreshold, MarginError> {
    IR_THRESHOLDS_24
        .iter()
        .find(|t| t.group == group)
        .ok_or(MarginError::UnknownRiskGroup(group))
}

/// Every explicitly mapped currency with its group, in table order.
pub fn currency_groups() -> impl Iterator<Item = (&'static str, u8)> {
    IR_THRESHOLDS_24
        .iter()
        .skip(1)
        .flat_map(|t| t.currencies.iter().map(move |&c| (c, t.group)))
}
