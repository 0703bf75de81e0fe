//! Continuous-time Almgren-Chriss with linear temporary impact.
//!
//! `h(v) = ε + ηv`, `κ = √(λσ²/η)` and `x(t) = X sinh(κ(T - t))/sinh(κT)`.
//! With `u = κT`:
//!
//! ```text
//! E = γX²/2 + ε|X| + ηX² κ (u/(2 sinh²u) + 1/(2 tanh u)) - αX tanh(u/2)/κ
//! V = σ²X² (1/(2κ tanh u) - T/(2 sinh²u))
//! ```
//!
//! Below `u = 1e-3` the moments switch to their series in `u²`, which keeps
//! them smooth through λ = 0.

use num_dual::{Dual64, DualNum};
use tracing::debug;

use super::{decay_profile, market_power, StaticOptimalScheme};
use crate::dynamics::PriceEvolutionParameters;
use crate::error::ExecutionError;
use crate::optimum::{OptimumDetail, TrajectoryOptimum};
use crate::risk::{MeanVarianceObjective, ObjectiveUtility};
use crate::strategy::{OrderSpecification, TradingTrajectory};

const SERIES_THRESHOLD: f64 = 1e-6;

/// Shortfall moments of the continuous trajectory, differentiable in λ.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ObjectiveMoments {
    pub(crate) expectation: Dual64,
    pub(crate) variance: Dual64,
}

/// Continuous Almgren-Chriss scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousAlmgrenChriss {
    order: OrderSpecification,
    params: PriceEvolutionParameters,
    objective: MeanVarianceObjective,
}

impl ContinuousAlmgrenChriss {
    /// Creates the scheme.
    pub fn new(
        order: OrderSpecification,
        params: PriceEvolutionParameters,
        objective: MeanVarianceObjective,
    ) -> Self {
        Self {
            order,
            params,
            objective,
        }
    }

    fn temporary_slope(&self) -> Result<f64, ExecutionError> {
        let temporary = self.params.impact().temporary();
        if !temporary.is_linear() {
            return Err(ExecutionError::UnsupportedImpact(
                "continuous Almgren-Chriss requires linear temporary impact",
            ));
        }
        let eta = temporary.coefficient();
        if eta > 0.0 {
            Ok(eta)
        } else {
            Err(ExecutionError::InvalidParameter {
                name: "temporary_impact",
                value: eta,
            })
        }
    }

    /// κ = √(λσ²/η).
    pub fn kappa(&self) -> Result<f64, ExecutionError> {
        let sigma = self.params.dynamics().epoch_volatility();
        Ok((self.objective.risk_aversion() * sigma * sigma / self.temporary_slope()?).sqrt())
    }

    /// Holdings x(t) for t in [0, T].
    pub fn holdings(&self, t: f64) -> Result<f64, ExecutionError> {
        let horizon = self.order.horizon();
        let t = t.clamp(0.0, horizon);
        Ok(self.order.start_holdings() * decay_profile(self.kappa()?, t, horizon))
    }

    /// Sell rate -dx/dt.
    pub fn trade_rate(&self, t: f64) -> Result<f64, ExecutionError> {
        let kappa = self.kappa()?;
        let horizon = self.order.horizon();
        let x = self.order.start_holdings();
        let t = t.clamp(0.0, horizon);
        if kappa == 0.0 {
            return Ok(x / horizon);
        }
        Ok(x * kappa * (-kappa * t).exp() * (1.0 + (-2.0 * kappa * (horizon - t)).exp())
            / -(-2.0 * kappa * horizon).exp_m1())
    }

    /// E and V as functions of a (dual) risk aversion.
    pub(crate) fn objective_moments(&self, lambda: Dual64) -> Result<ObjectiveMoments, ExecutionError> {
        let eta = self.temporary_slope()?;
        let gamma = self.params.permanent_slope()?;
        let epsilon = self.params.impact().temporary().offset();
        let dynamics = self.params.dynamics();
        let sigma_sq = dynamics.epoch_volatility().powi(2);
        let alpha = dynamics.drift();
        let x = self.order.start_holdings();
        let horizon = self.order.horizon();
        let c = |v: f64| Dual64::from(v);
        let one = c(1.0);
        let two = c(2.0);

        let kappa_sq = lambda * c(sigma_sq / eta);
        let (rate_integral, holdings_integral, holdings_sq_integral) =
            if kappa_sq.re * horizon * horizon < SERIES_THRESHOLD {
                let u_sq = kappa_sq * c(horizon * horizon);
                (
                    (one + u_sq * u_sq / c(45.0)) / c(horizon),
                    c(horizon) * (c(0.5) - u_sq / c(24.0)),
                    c(horizon) * (one / c(3.0) - two * u_sq / c(45.0)),
                )
            } else {
                let kappa = kappa_sq.sqrt();
                let u = kappa * c(horizon);
                let sinh_sq = u.sinh() * u.sinh();
                let tanh_u = u.tanh();
                (
                    kappa * (u / (two * sinh_sq) + one / (two * tanh_u)),
                    (u / two).tanh() / kappa,
                    one / (two * kappa * tanh_u) - c(horizon) / (two * sinh_sq),
                )
            };

        let expectation = c(0.5 * gamma * x * x + epsilon * x.abs()) + c(eta * x * x) * rate_integral
            - c(alpha * x) * holdings_integral;
        let variance = c(sigma_sq * x * x) * holdings_sq_integral;
        Ok(ObjectiveMoments {
            expectation,
            variance,
        })
    }
}

impl StaticOptimalScheme for ContinuousAlmgrenChriss {
    fn order(&self) -> &OrderSpecification {
        &self.order
    }

    fn parameters(&self) -> &PriceEvolutionParameters {
        &self.params
    }

    fn objective(&self) -> &MeanVarianceObjective {
        &self.objective
    }

    fn generate(&self) -> Result<TrajectoryOptimum, ExecutionError> {
        let kappa = self.kappa()?;
        let lambda = self.objective.risk_aversion();
        let moments = self.objective_moments(Dual64::from(lambda))?;
        let (expectation, variance) = (moments.expectation.re, moments.variance.re);
        let horizon = self.order.horizon();
        let x = self.order.start_holdings();
        let nodes = self.order.time_nodes();
        let last = nodes.len() - 1;
        let holdings = nodes
            .iter()
            .enumerate()
            .map(|(i, &t)| if i == last { 0.0 } else { x * decay_profile(kappa, t, horizon) })
            .collect();
        let trajectory = TradingTrajectory::from_holdings(nodes, holdings)?;

        debug!(kappa, lambda, expectation, variance, "generated continuous Almgren-Chriss trajectory");

        Ok(TrajectoryOptimum {
            trajectory,
            risk_aversion: lambda,
            expected_shortfall: expectation,
            shortfall_variance: variance,
            objective_utility: self.objective.utility(expectation, variance),
            characteristic_time: if kappa > 0.0 { 1.0 / kappa } else { f64::INFINITY },
            market_power: market_power(
                self.temporary_slope()?,
                x,
                horizon,
                self.params.dynamics().epoch_volatility(),
            ),
            detail: OptimumDetail::LinearImpact { kappa },
        })
    }
}
