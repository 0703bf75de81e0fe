//! Error types for execution analytics.

use analytics_core::types::{DistributionError, LinalgError, SolverError};
use thiserror::Error;

/// Execution analytics errors.
///
/// # Examples
///
/// ```
/// use analytics_execution::ExecutionError;
///
/// let err = ExecutionError::InvalidParameter { name: "risk_aversion", value: -1.0 };
/// assert!(format!("{}", err).contains("risk_aversion"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// Parameter outside its admissible range or not finite.
    #[error("Invalid parameter {name} = {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Order specification is not usable.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Trajectory arrays are inconsistent.
    #[error("Invalid trajectory: {0}")]
    InvalidTrajectory(String),

    /// The scheme requires a different transaction function shape.
    #[error("Unsupported impact function: {0}")]
    UnsupportedImpact(&'static str),

    /// Greek arrays are inconsistent or non-finite.
    #[error("Invalid greek: {0}")]
    InvalidGreek(String),

    /// Root finding failure.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Linear algebra failure.
    #[error(transparent)]
    Linalg(#[from] LinalgError),

    /// Distribution failure.
    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

/// Reject non-finite values.
pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<f64, ExecutionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExecutionError::InvalidParameter { name, value })
    }
}

/// Reject negative or non-finite values.
pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<f64, ExecutionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ExecutionError::InvalidParameter { name, value })
    }
}

/// Reject non-positive or non-finite values.
pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64, ExecutionError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ExecutionError::InvalidParameter { name, value })
    }
}
