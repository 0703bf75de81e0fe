//! Error types for margin calculations.

use thiserror::Error;

/// SIMM margin errors.
///
/// # Examples
///
/// ```
/// use analytics_margin::MarginError;
///
/// let err = MarginError::UnknownBucket("13".to_string());
/// assert!(err.to_string().contains("13"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarginError {
    /// Bucket label not present in the risk class settings.
    #[error("Unknown bucket: {0}")]
    UnknownBucket(String),

    /// Risk group number outside the threshold table.
    #[error("Unknown risk group: {0}")]
    UnknownRiskGroup(u8),

    /// Sensitivity is not finite.
    #[error("Invalid sensitivity {label} = {value}")]
    InvalidSensitivity {
        /// Risk factor label
        label: String,
        /// Offending value
        value: f64,
    },

    /// Nothing to aggregate.
    #[error("Empty sensitivity set: {0}")]
    EmptySensitivities(&'static str),
}
