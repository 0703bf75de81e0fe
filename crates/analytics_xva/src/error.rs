//! Error types for exposure and CSA calculations.

use analytics_core::market_data::MarketDataError;
use analytics_core::types::DateError;
use thiserror::Error;

/// XVA analytics errors.
///
/// # Examples
///
/// ```
/// use analytics_xva::XvaError;
///
/// let err = XvaError::DimensionMismatch { expected: 3, got: 2 };
/// assert!(err.to_string().contains("expected 3"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XvaError {
    /// Input rejected at construction or evaluation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Scenario paths and time grid disagree.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Date outside the valid range of a curve or path.
    #[error("Date {date} outside [{start}, {end}]")]
    DateOutOfRange {
        /// Offending date
        date: String,
        /// Range start
        start: String,
        /// Range end
        end: String,
    },

    /// Date arithmetic failure.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Underlying curve failure.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}
