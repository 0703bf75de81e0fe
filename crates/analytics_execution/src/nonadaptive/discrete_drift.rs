//! Discrete Almgren-Chriss trajectory with price drift.
//!
//! With `η̃ = η - γτ/2` and `κ̃² = λσ²/η̃`, the decay rate solves
//! `2(cosh κτ - 1) = κ̃²τ²`. The optimal holdings are
//!
//! ```text
//! x(t) = X sinh(κ(T - t))/sinh(κT) + x̄ (1 - (sinh(κ(T - t)) + sinh(κt))/sinh(κT))
//! ```
//!
//! with residual holdings `x̄ = α/(2λσ²)`. The drift term is evaluated as
//! `x̄ (1 - e^{-κt})(1 - e^{-κ(T-t)})/(1 + e^{-κT})`, and as
//! `α t (T - t)/(4η̃)` for a risk-neutral trader.

use tracing::debug;

use super::{decay_profile, market_power, StaticOptimalScheme};
use crate::capture::TrajectoryShortfallEstimator;
use crate::dynamics::PriceEvolutionParameters;
use crate::error::ExecutionError;
use crate::optimum::{OptimumDetail, TrajectoryOptimum};
use crate::risk::{MeanVarianceObjective, ObjectiveUtility};
use crate::strategy::{OrderSpecification, TradingTrajectory};

/// Discrete-node Almgren-Chriss scheme with linear impact and drift.
///
/// # Examples
/// ```
/// use analytics_execution::dynamics::{ArithmeticPriceDynamics, PriceEvolutionParameters};
/// use analytics_execution::impact::{PriceMarketImpact, TransactionFunction};
/// use analytics_execution::nonadaptive::{DiscreteAlmgrenChrissDrift, StaticOptimalScheme};
/// use analytics_execution::risk::MeanVarianceObjective;
/// use analytics_execution::strategy::OrderSpecification;
///
/// let params = PriceEvolutionParameters::new(
///     ArithmeticPriceDynamics::flat(50.0, 0.0, 0.95).unwrap(),
///     PriceMarketImpact::new(
///         TransactionFunction::linear(2.5e-7, 0.0).unwrap(),
///         TransactionFunction::linear(2.5e-6, 0.0625).unwrap(),
///     ),
/// );
/// let scheme = DiscreteAlmgrenChrissDrift::new(
///     OrderSpecification::new(1.0e6, 5.0, 5).unwrap(),
///     params,
///     MeanVarianceObjective::new(1e-6).unwrap(),
/// );
/// let optimum = scheme.generate().unwrap();
/// let holdings = optimum.trajectory.holdings();
/// assert_eq!(holdings[0], 1.0e6);
/// assert!(holdings[5].abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteAlmgrenChrissDrift {
    order: OrderSpecification,
    params: PriceEvolutionParameters,
    objective: MeanVarianceObjective,
}

impl DiscreteAlmgrenChrissDrift {
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

    /// η̃ = η - γτ/2, the effective temporary impact slope.
    pub fn adjusted_temporary_slope(&self) -> Result<f64, ExecutionError> {
        let temporary = self.params.impact().temporary();
        if !temporary.is_linear() {
            return Err(ExecutionError::UnsupportedImpact(
                "discrete Almgren-Chriss requires linear temporary impact",
            ));
        }
        let gamma = self.params.permanent_slope()?;
        let eta_tilde = temporary.coefficient() - 0.5 * gamma * self.order.tau();
        if eta_tilde > 0.0 {
            Ok(eta_tilde)
        } else {
            Err(ExecutionError::InvalidParameter {
                name: "eta_tilde",
                value: eta_tilde,
            })
        }
    }
}

impl StaticOptimalScheme for DiscreteAlmgrenChrissDrift {
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
        let eta_tilde = self.adjusted_temporary_slope()?;
        let dynamics = self.params.dynamics();
        let alpha = dynamics.drift();
        let sigma = dynamics.epoch_volatility();
        let lambda = self.objective.risk_aversion();
        let x = self.order.start_holdings();
        let horizon = self.order.horizon();
        let tau = self.order.tau();
        let nodes = self.order.time_nodes();

        let lambda_sigma_sq = lambda * sigma * sigma;
        let kappa_tilde_sq = lambda_sigma_sq / eta_tilde;
        let half_kts = 0.5 * kappa_tilde_sq * tau * tau;
        // acosh(1 + y) evaluated without cancellation for small y
        let kappa = (half_kts + (half_kts * (half_kts + 2.0)).sqrt()).ln_1p() / tau;

        let residual_holdings = (lambda_sigma_sq > 0.0).then(|| 0.5 * alpha / lambda_sigma_sq);
        let holdings_adjustment: Vec<f64> = nodes
            .iter()
            .map(|&t| match residual_holdings {
                Some(residual) if kappa > 0.0 => {
                    residual * (-(-kappa * t).exp_m1()) * (-(-kappa * (horizon - t)).exp_m1())
                        / (1.0 + (-kappa * horizon).exp())
                }
                _ => alpha * t * (horizon - t) / (4.0 * eta_tilde),
            })
            .collect();
        let holdings: Vec<f64> = nodes
            .iter()
            .zip(&holdings_adjustment)
            .enumerate()
            .map(|(i, (&t, &adjustment))| {
                if i == 0 {
                    x
                } else if i + 1 == nodes.len() {
                    0.0
                } else {
                    x * decay_profile(kappa, t, horizon) + adjustment
                }
            })
            .collect();
        let trade_adjustment: Vec<f64> = holdings_adjustment.windows(2).map(|w| w[1] - w[0]).collect();
        let drift_gain = alpha * tau * holdings_adjustment[1..].iter().sum::<f64>();

        let trajectory = TradingTrajectory::from_holdings(nodes, holdings)?;
        let shortfall = TrajectoryShortfallEstimator::new(trajectory.clone()).estimate(&self.params)?;

        debug!(
            kappa,
            lambda,
            drift_gain,
            expectation = shortfall.expectation,
            variance = shortfall.variance,
            "generated discrete Almgren-Chriss drift trajectory"
        );

        Ok(TrajectoryOptimum {
            trajectory,
            risk_aversion: lambda,
            expected_shortfall: shortfall.expectation,
            shortfall_variance: shortfall.variance,
            objective_utility: self.objective.utility(shortfall.expectation, shortfall.variance),
            characteristic_time: if kappa > 0.0 { 1.0 / kappa } else { f64::INFINITY },
            market_power: market_power(
                self.params.impact().temporary().coefficient(),
                x,
                horizon,
                sigma,
            ),
            detail: OptimumDetail::DriftAdjusted {
                kappa_tilde: kappa_tilde_sq.sqrt(),
                kappa,
                residual_holdings,
                drift_gain,
                holdings_adjustment,
                trade_adjustment,
            },
        })
    }
}
