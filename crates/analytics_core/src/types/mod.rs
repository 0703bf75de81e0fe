//! Core time, currency and error types.
//!
//! This module provides:
//! - `time`: Dates, tenors, day count conventions and coupon frequencies
//! - `currency`: ISO 4217 currency codes with metadata
//! - `error`: Structured error types for dates, currencies, solvers, linear
//!   algebra, special functions, splines and distributions
//!
//! # Re-exports
//!
//! Commonly used types are re-exported at this module level.

pub mod currency;
pub mod error;
pub mod time;

pub use currency::Currency;
pub use error::{
    CurrencyError, DateError, DistributionError, LinalgError, SolverError, SpecialFunctionError,
    SplineError,
};
pub use time::{Date, DayCountConvention, Frequency, Tenor};
