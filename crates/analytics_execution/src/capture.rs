//! Implementation shortfall of a discrete trajectory.
//!
//! For interval `k` with sell size `mₖ = -nₖ`, rate `vₖ = mₖ/τₖ` and
//! holdings `xₖ₊₁` carried after the trade:
//!
//! ```text
//! E = Σ τₖ xₖ₊₁ g(vₖ) + Σ mₖ h(vₖ) - α Σ τₖ xₖ₊₁
//! V = Σ σ²ₖ xₖ₊₁² + Σ (mₖ s(vₖ))²
//! ```
//!
//! where `σ²ₖ` is the price variance accrued over the interval and `s` the
//! optional temporary impact volatility.

use analytics_core::statistics::Normal;
use serde::Serialize;
use tracing::debug;

use crate::dynamics::PriceEvolutionParameters;
use crate::error::ExecutionError;
use crate::strategy::TradingTrajectory;

/// Shortfall contributions of one trading interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShortfallNode {
    /// Interval start
    pub start: f64,
    /// Interval end
    pub end: f64,
    /// Holdings after the trade
    pub holdings: f64,
    /// Holdings change
    pub trade: f64,
    /// Permanent impact cost τ x g(v)
    pub permanent_cost: f64,
    /// Temporary impact cost m h(v)
    pub temporary_cost: f64,
    /// Drift gain α τ x
    pub drift_gain: f64,
    /// Price risk σ² x²
    pub market_variance: f64,
    /// Temporary impact noise (m s(v))²
    pub impact_variance: f64,
}

impl ShortfallNode {
    /// Net expected cost of the interval.
    pub fn expectation(&self) -> f64 {
        self.permanent_cost + self.temporary_cost - self.drift_gain
    }

    /// Shortfall variance of the interval.
    pub fn variance(&self) -> f64 {
        self.market_variance + self.impact_variance
    }
}

/// Gaussian synopsis of the implementation shortfall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortfallDistribution {
    /// Expected shortfall
    pub expectation: f64,
    /// Shortfall variance
    pub variance: f64,
    /// Per-interval contributions
    pub nodes: Vec<ShortfallNode>,
}

impl ShortfallDistribution {
    /// √V.
    pub fn std_dev(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }

    /// Normal law with the shortfall moments.
    pub fn to_normal(&self) -> Result<Normal, ExecutionError> {
        Ok(Normal::new(self.expectation, self.std_dev())?)
    }
}

/// Evaluates shortfall moments of a fixed trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryShortfallEstimator {
    trajectory: TradingTrajectory,
}

impl TrajectoryShortfallEstimator {
    /// Wraps the trajectory.
    pub fn new(trajectory: TradingTrajectory) -> Self {
        Self { trajectory }
    }

    /// The trajectory being evaluated.
    pub fn trajectory(&self) -> &TradingTrajectory {
        &self.trajectory
    }

    /// Per-interval cost breakdown and total moments.
    pub fn estimate(
        &self,
        params: &PriceEvolutionParameters,
    ) -> Result<ShortfallDistribution, ExecutionError> {
        let dynamics = params.dynamics();
        let impact = params.impact();
        let alpha = dynamics.drift();
        let nodes: Vec<ShortfallNode> = self
            .trajectory
            .time_nodes()
            .windows(2)
            .zip(&self.trajectory.holdings()[1..])
            .zip(self.trajectory.trade_list())
            .map(|((w, &holdings), &trade)| {
                let (start, end) = (w[0], w[1]);
                let tau = end - start;
                let sold = -trade;
                let rate = sold / tau;
                let impact_sd = impact
                    .temporary_volatility()
                    .map_or(0.0, |s| sold * s.evaluate(rate));
                ShortfallNode {
                    start,
                    end,
                    holdings,
                    trade,
                    permanent_cost: tau * holdings * impact.permanent().evaluate(rate),
                    temporary_cost: sold * impact.temporary().evaluate(rate),
                    drift_gain: alpha * tau * holdings,
                    market_variance: dynamics.interval_variance(start, end) * holdings * holdings,
                    impact_variance: impact_sd * impact_sd,
                }
            })
            .collect();

        let expectation = nodes.iter().map(ShortfallNode::expectation).sum::<f64>();
        let variance = nodes.iter().map(ShortfallNode::variance).sum::<f64>();
        if !expectation.is_finite() || !variance.is_finite() {
            return Err(ExecutionError::InvalidTrajectory(
                "shortfall moments are not finite".to_string(),
            ));
        }
        debug!(
            intervals = nodes.len(),
            expectation, variance, "estimated trajectory shortfall"
        );
        Ok(ShortfallDistribution {
            expectation,
            variance,
            nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::ArithmeticPriceDynamics;
    use crate::impact::{PriceMarketImpact, TransactionFunction};
    use crate::strategy::OrderSpecification;
    use analytics_core::statistics::R1Distribution;
    use approx::assert_relative_eq;

    fn params(gamma: f64, eta: f64, epsilon: f64, alpha: f64, sigma: f64) -> PriceEvolutionParameters {
        PriceEvolutionParameters::new(
            ArithmeticPriceDynamics::flat(50.0, alpha, sigma).unwrap(),
            PriceMarketImpact::new(
                TransactionFunction::linear(gamma, 0.0).unwrap(),
                TransactionFunction::linear(eta, epsilon).unwrap(),
            ),
        )
    }

    #[test]
    fn test_twap_closed_form() {
        // Linear schedule: E = γX²/2 + εX + (η - γτ/2) X²/T, V = σ²τ Σ x_k².
        let (x, t, n) = (1.0e6, 5.0, 5);
        let (gamma, eta, epsilon, sigma) = (2.5e-7, 2.5e-6, 0.0625, 0.95);
        let order = OrderSpecification::new(x, t, n).unwrap();
        let traj = TradingTrajectory::linear(&order).unwrap();
        let d = TrajectoryShortfallEstimator::new(traj)
            .estimate(&params(gamma, eta, epsilon, 0.0, sigma))
            .unwrap();
        let tau = t / n as f64;
        let expected_e = 0.5 * gamma * x * x + epsilon * x + (eta - 0.5 * gamma * tau) * x * x / t;
        assert_relative_eq!(d.expectation, expected_e, max_relative = 1e-12);
        let expected_v = sigma * sigma * tau * x * x * (0.64 + 0.36 + 0.16 + 0.04);
        assert_relative_eq!(d.variance, expected_v, max_relative = 1e-12);
        assert_eq!(d.nodes.len(), 5);
    }

    #[test]
    fn test_drift_reduces_cost() {
        let order = OrderSpecification::new(1000.0, 1.0, 4).unwrap();
        let traj = TradingTrajectory::linear(&order).unwrap();
        let est = TrajectoryShortfallEstimator::new(traj);
        let flat = est.estimate(&params(0.0, 1e-3, 0.0, 0.0, 1.0)).unwrap();
        let drift = est.estimate(&params(0.0, 1e-3, 0.0, 0.2, 1.0)).unwrap();
        let gain = 0.2 * 0.25 * (750.0 + 500.0 + 250.0);
        assert_relative_eq!(flat.expectation - drift.expectation, gain, max_relative = 1e-12);
        assert_relative_eq!(flat.variance, drift.variance);
    }

    #[test]
    fn test_impact_volatility_adds_variance() {
        let order = OrderSpecification::new(100.0, 1.0, 2).unwrap();
        let traj = TradingTrajectory::linear(&order).unwrap();
        let base = params(0.0, 0.01, 0.0, 0.0, 0.0);
        let noisy = PriceEvolutionParameters::new(
            *base.dynamics(),
            base.impact()
                .clone()
                .with_temporary_volatility(TransactionFunction::linear(0.0, 0.1).unwrap()),
        );
        let est = TrajectoryShortfallEstimator::new(traj);
        assert_eq!(est.estimate(&base).unwrap().variance, 0.0);
        let v = est.estimate(&noisy).unwrap().variance;
        assert_relative_eq!(v, 2.0 * (50.0 * 0.1_f64).powi(2), max_relative = 1e-12);
        let normal = est.estimate(&noisy).unwrap().to_normal().unwrap();
        assert_relative_eq!(normal.mean(), 2.0 * 50.0 * 0.01 * 100.0);
    }
}
