//! CLI command implementations
//!
//! Each submodule holds one sample driver: its clap arguments, a `compute`
//! step returning a serialisable report, and `run`.

pub mod ac_drift;
pub mod ac_frontier;
pub mod basis_curve;
pub mod bessel;
pub mod control_greeks;
pub mod correlation_backtest;
pub mod exponential_gap;
pub mod exposure;
pub mod gamma;
pub mod impact_exponent;
pub mod kohlrausch;
pub mod matrix;
pub mod reservation;
pub mod sequence_bounds;
pub mod simm_crnq_delta;
pub mod simm_crq;
pub mod simm_ir_thresholds;
pub mod soft_heap;
pub mod treasury;
pub mod venue;

use analytics_execution::dynamics::{ArithmeticPriceDynamics, PriceEvolutionParameters};
use analytics_execution::impact::{PriceMarketImpact, TransactionFunction};
use analytics_execution::strategy::OrderSpecification;

use crate::Result;

/// Linear impact parameters of the Almgren-Chriss sample trade:
/// S₀ = 50, σ = 0.95, γ = 2.5e-7, η = 2.5e-6, ε = 0.0625.
pub(crate) fn almgren_chriss_parameters(drift: f64) -> Result<PriceEvolutionParameters> {
    Ok(PriceEvolutionParameters::new(
        ArithmeticPriceDynamics::flat(50.0, drift, 0.95)?,
        PriceMarketImpact::new(
            TransactionFunction::linear(2.5e-7, 0.0)?,
            TransactionFunction::linear(2.5e-6, 0.0625)?,
        ),
    ))
}

/// Liquidation of 1,000,000 shares over five days.
pub(crate) fn almgren_chriss_order(intervals: usize) -> Result<OrderSpecification> {
    Ok(OrderSpecification::new(1.0e6, 5.0, intervals)?)
}
