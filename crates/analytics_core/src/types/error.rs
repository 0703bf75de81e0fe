//! Error types for structured error handling.
//!
//! This module provides:
//! - `DateError`: Errors from date construction, parsing and tenor arithmetic
//! - `CurrencyError`: Errors from currency parsing
//! - `SolverError`: Errors from root-finding solvers
//! - `LinalgError`: Errors from dense matrix operations
//! - `SpecialFunctionError`: Domain errors from special-function estimators
//! - `DistributionError`: Errors from distribution construction and sampling tests

use std::fmt;
use thiserror::Error;

/// Date construction and parsing errors.
///
/// # Variants
/// - `InvalidDate`: Components do not form a calendar date
/// - `ParseError`: Input string is not ISO 8601 (`YYYY-MM-DD`)
/// - `InvalidTenor`: Tenor string such as `3M` could not be parsed
///
/// # Examples
/// ```
/// use analytics_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid calendar date.
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Date string could not be parsed.
    ParseError(String),

    /// Tenor string could not be parsed.
    InvalidTenor(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::InvalidDate { year, month, day } => {
                write!(f, "Invalid date: {}-{}-{}", year, month, day)
            }
            DateError::ParseError(msg) => write!(f, "Date parse error: {}", msg),
            DateError::InvalidTenor(tenor) => write!(f, "Invalid tenor: {}", tenor),
        }
    }
}

impl std::error::Error for DateError {}

/// Currency parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// ISO code not recognised.
    UnknownCurrency(String),
}

impl fmt::Display for CurrencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyError::UnknownCurrency(code) => write!(f, "Unknown currency: {}", code),
        }
    }
}

impl std::error::Error for CurrencyError {}

/// Root-finding solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: Solver failed to converge within iteration limit
/// - `DerivativeNearZero`: Derivative too small for Newton-Raphson
/// - `NoBracket`: Function values at bracket endpoints have same sign
/// - `NumericalInstability`: General numerical instability
///
/// # Examples
/// ```
/// use analytics_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Derivative near zero (division by zero risk in Newton-Raphson).
    #[error("Derivative near zero at x = {x}")]
    DerivativeNearZero {
        /// The x value where derivative was near zero
        x: f64,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Dense linear algebra errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Dimension found
        got: usize,
    },

    /// Matrix rows have different lengths or the matrix is empty.
    #[error("Matrix is not rectangular")]
    NotRectangular,

    /// Operation requires a square matrix.
    #[error("Matrix is not square: {rows} x {cols}")]
    NotSquare {
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
    },

    /// Matrix cannot be inverted.
    #[error("Matrix is singular")]
    Singular,

    /// Cholesky factorisation met a non-positive pivot.
    #[error("Matrix is not positive definite (pivot {index})")]
    NotPositiveDefinite {
        /// Diagonal index of the failing pivot
        index: usize,
    },

    /// Vector has zero modulus and cannot be normalised.
    #[error("Vector has zero modulus")]
    ZeroVector,

    /// Non-finite entry encountered.
    #[error("Non-finite entry at ({row}, {col})")]
    NonFinite {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },
}

/// Special-function evaluation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecialFunctionError {
    /// Argument lies on a pole of the function.
    #[error("Pole at s = {s}")]
    Pole {
        /// Pole location
        s: f64,
    },

    /// Argument outside the function's domain.
    #[error("Argument {x} outside domain: {reason}")]
    OutOfDomain {
        /// Offending argument
        x: f64,
        /// Domain description
        reason: &'static str,
    },

    /// Series or continued fraction failed to converge.
    #[error("Series did not converge after {iterations} terms")]
    NotConverged {
        /// Terms evaluated
        iterations: usize,
    },
}

/// Probability distribution and statistical test errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// Distribution parameter is out of range.
    #[error("Invalid parameter {name} = {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Probability outside `[0, 1]`.
    #[error("Invalid probability: {0}")]
    InvalidProbability(f64),

    /// Sample is empty or too small.
    #[error("Insufficient sample: got {got}, need {need}")]
    InsufficientSample {
        /// Sample size provided
        got: usize,
        /// Minimum sample size
        need: usize,
    },

    /// Wrapped special-function failure.
    #[error(transparent)]
    SpecialFunction(#[from] SpecialFunctionError),

    /// Wrapped solver failure (e.g. inverse CDF).
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Wrapped linear algebra failure (e.g. Cholesky of a correlation matrix).
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// Spline basis construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplineError {
    /// Knots are not strictly increasing or too few.
    #[error("Invalid knots: {0}")]
    InvalidKnots(&'static str),

    /// Basis order below the supported minimum.
    #[error("Invalid basis order {order}, minimum {minimum}")]
    InvalidOrder {
        /// Requested order
        order: usize,
        /// Minimum order
        minimum: usize,
    },

    /// Shape-control parameter out of range.
    #[error("Invalid tension: {0}")]
    InvalidTension(f64),

    /// Basis index beyond the basis set.
    #[error("Basis index {index} out of range ({count} functions)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of basis functions
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_error_display() {
        let err = DateError::ParseError("bad".to_string());
        assert_eq!(format!("{}", err), "Date parse error: bad");
        let err = DateError::InvalidTenor("7Q".to_string());
        assert_eq!(format!("{}", err), "Invalid tenor: 7Q");
    }

    #[test]
    fn test_currency_error_display() {
        let err = CurrencyError::UnknownCurrency("XYZ".to_string());
        assert_eq!(format!("{}", err), "Unknown currency: XYZ");
    }

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::NoBracket { a: 0.0, b: 1.0 };
        assert_eq!(format!("{}", err), "No bracket: f(0) and f(1) have same sign");
    }

    #[test]
    fn test_linalg_error_display() {
        assert_eq!(format!("{}", LinalgError::Singular), "Matrix is singular");
        let err = LinalgError::NotSquare { rows: 2, cols: 3 };
        assert_eq!(format!("{}", err), "Matrix is not square: 2 x 3");
    }

    #[test]
    fn test_distribution_error_from_solver() {
        let err: DistributionError = SolverError::MaxIterationsExceeded { iterations: 5 }.into();
        assert!(format!("{}", err).contains("5 iterations"));
    }

    #[test]
    fn test_error_trait_implementation() {
        let _: &dyn std::error::Error = &DateError::ParseError(String::new());
        let _: &dyn std::error::Error = &SpecialFunctionError::Pole { s: -1.0 };
    }
}
