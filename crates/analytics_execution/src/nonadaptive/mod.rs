//! Static (non-adaptive) optimal execution schemes.
//!
//! Each scheme fixes its trajectory at the start of trading by minimising a
//! mean-variance objective of the implementation shortfall:
//!
//! - [`DiscreteAlmgrenChrissDrift`]: discrete nodes, linear impact, price drift
//! - [`ContinuousAlmgrenChriss`]: continuous time, linear temporary impact
//! - [`ContinuousPowerImpact`]: continuous time, power-law temporary impact

mod continuous;
mod discrete_drift;
mod power_impact;

pub use continuous::ContinuousAlmgrenChriss;
pub use discrete_drift::DiscreteAlmgrenChrissDrift;
pub use power_impact::ContinuousPowerImpact;

use crate::dynamics::PriceEvolutionParameters;
use crate::error::ExecutionError;
use crate::optimum::TrajectoryOptimum;
use crate::risk::MeanVarianceObjective;
use crate::strategy::OrderSpecification;

/// A generator of a static optimal trajectory.
pub trait StaticOptimalScheme {
    /// Order being executed.
    fn order(&self) -> &OrderSpecification;

    /// Price dynamics and impact.
    fn parameters(&self) -> &PriceEvolutionParameters;

    /// Objective being minimised.
    fn objective(&self) -> &MeanVarianceObjective;

    /// Computes the optimal trajectory and its cost moments.
    fn generate(&self) -> Result<TrajectoryOptimum, ExecutionError>;
}

/// `sinh(κ(T - t)) / sinh(κT)` without overflow; the κ → 0 limit is `1 - t/T`.
pub(crate) fn decay_profile(kappa: f64, t: f64, horizon: f64) -> f64 {
    if kappa == 0.0 {
        return 1.0 - t / horizon;
    }
    (-kappa * t).exp() * (-2.0 * kappa * (horizon - t)).exp_m1() / (-2.0 * kappa * horizon).exp_m1()
}

/// Temporary impact cost relative to volatility, `η(X/T)/(σ√T)`.
pub(crate) fn market_power(eta: f64, start_holdings: f64, horizon: f64, sigma: f64) -> f64 {
    eta * (start_holdings / horizon) / (sigma * horizon.sqrt())
}
