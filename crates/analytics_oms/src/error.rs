//! Error types for order-management analytics.

use analytics_core::types::SolverError;
use thiserror::Error;

/// Venue and reservation pricing errors.
///
/// # Examples
///
/// ```
/// use analytics_oms::OmsError;
///
/// let err = OmsError::InvalidOrder { field: "size", value: -5.0 };
/// assert!(err.to_string().contains("size"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OmsError {
    /// Venue code is empty or otherwise unusable.
    #[error("Invalid venue code: {0:?}")]
    InvalidVenueCode(String),

    /// Fee schedule does not match the venue type.
    #[error("Fee schedule of venue {code}: {reason}")]
    InvalidFeeSchedule {
        /// Venue code
        code: String,
        /// Why the schedule was rejected
        reason: String,
    },

    /// Order field is not finite or not positive.
    #[error("Invalid order {field} = {value}")]
    InvalidOrder {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// Pricer input rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Root finding on the utility balance failed.
    #[error(transparent)]
    Solver(#[from] SolverError),
}
