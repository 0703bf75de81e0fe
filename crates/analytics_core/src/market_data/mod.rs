//! Discount curves and sovereign bond conventions.

pub mod curve;
pub mod error;
pub mod treasury;

pub use curve::{FlatCurve, YieldCurve};
pub use error::MarketDataError;
pub use treasury::{benchmark_code, benchmark_setting, treasury_setting, TreasurySetting};
