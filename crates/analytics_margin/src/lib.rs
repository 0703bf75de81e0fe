//! # analytics_margin: ISDA SIMM Parameters and Delta Margin
//!
//! - Interest rate concentration thresholds, SIMM 2.4 (`rates`)
//! - Credit qualifying 2.1 and non-qualifying 2.0 settings (`credit`)
//! - Credit delta margin aggregation across buckets (`margin`)
//!
//! Tables are compile-time constants; lookups never allocate.

#![warn(missing_docs)]

pub mod credit;
pub mod error;
pub mod margin;
pub mod rates;

pub use error::MarginError;
