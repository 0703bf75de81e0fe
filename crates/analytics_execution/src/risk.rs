//! Risk-aversion-parameterised objectives over the shortfall distribution.

use serde::Serialize;

use crate::error::{check_non_negative, ExecutionError};

/// Objective combining expected shortfall `E` and its variance `V`.
pub trait ObjectiveUtility {
    /// Risk aversion λ.
    fn risk_aversion(&self) -> f64;

    /// Objective value for the given shortfall moments.
    fn utility(&self, expectation: f64, variance: f64) -> f64;
}

/// `U = E + λ·V`.
///
/// # Examples
/// ```
/// use analytics_execution::risk::{MeanVarianceObjective, ObjectiveUtility};
///
/// let objective = MeanVarianceObjective::new(1e-6).unwrap();
/// assert!((objective.utility(100.0, 2.0e6) - 102.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanVarianceObjective {
    risk_aversion: f64,
}

impl MeanVarianceObjective {
    /// Creates the objective; λ must be finite and non-negative.
    pub fn new(risk_aversion: f64) -> Result<Self, ExecutionError> {
        check_non_negative("risk_aversion", risk_aversion)?;
        Ok(Self { risk_aversion })
    }
}

impl ObjectiveUtility for MeanVarianceObjective {
    fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    fn utility(&self, expectation: f64, variance: f64) -> f64 {
        expectation + self.risk_aversion * variance
    }
}

/// `U = E + λ·√V`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanStdDevObjective {
    risk_aversion: f64,
}

impl MeanStdDevObjective {
    /// Creates the objective; λ must be finite and non-negative.
    pub fn new(risk_aversion: f64) -> Result<Self, ExecutionError> {
        check_non_negative("risk_aversion", risk_aversion)?;
        Ok(Self { risk_aversion })
    }
}

impl ObjectiveUtility for MeanStdDevObjective {
    fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    fn utility(&self, expectation: f64, variance: f64) -> f64 {
        expectation + self.risk_aversion * variance.max(0.0).sqrt()
    }
}
