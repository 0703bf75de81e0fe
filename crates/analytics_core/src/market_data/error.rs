//! Market data errors.

use thiserror::Error;

/// Failures of curve queries and convention lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Maturity before the curve epoch, or a zero-length zero-rate query.
    #[error("maturity {t} is not after the curve epoch")]
    NegativeMaturity {
        /// Offending year fraction
        t: f64,
    },

    /// Forward interval whose end does not follow its start.
    #[error("empty rate interval [{start}, {end}]")]
    EmptyInterval {
        /// Interval start
        start: f64,
        /// Interval end
        end: f64,
    },

    /// No treasury convention registered for the code or currency.
    #[error("unknown treasury code: {0}")]
    UnknownTreasuryCode(String),
}
