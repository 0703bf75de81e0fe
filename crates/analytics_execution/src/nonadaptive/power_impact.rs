//! Continuous execution under power-law temporary impact `h(v) = η vᵏ`.
//!
//! The mean-variance optimum has characteristic time
//! `T* = (kηX^{k-1}/(λσ²))^{1/(k+1)}` and, with `c = (k+1)/(3k+1)`,
//!
//! ```text
//! E = γX²/2 + cη(X/T*)^{k+1} T*,   V = cσ²T*X²
//! ```
//!
//! Holdings decay hyperbolically for k < 1, exponentially for k = 1 and
//! reach zero at `T_max = (k+1)/(k-1)·T*` for k > 1. The moments are those of
//! the full liquidation; the order horizon sets the sampling grid and the
//! window of the cost-to-go functions.

use analytics_core::math::quadrature::GaussLegendre;
use tracing::debug;

use super::{market_power, StaticOptimalScheme};
use crate::dynamics::PriceEvolutionParameters;
use crate::error::ExecutionError;
use crate::optimum::{OptimumDetail, TrajectoryOptimum};
use crate::risk::{MeanVarianceObjective, ObjectiveUtility};
use crate::strategy::{OrderSpecification, TradingTrajectory};

const QUADRATURE_POINTS: usize = 64;
const UNIT_EXPONENT_TOLERANCE: f64 = 1e-12;

/// Almgren (2003) power-law impact scheme.
///
/// # Examples
/// ```
/// use analytics_execution::dynamics::{ArithmeticPriceDynamics, PriceEvolutionParameters};
/// use analytics_execution::impact::{MarketObservables, PriceMarketImpact};
/// use analytics_execution::nonadaptive::ContinuousPowerImpact;
/// use analytics_execution::risk::MeanVarianceObjective;
/// use analytics_execution::strategy::OrderSpecification;
///
/// let obs = MarketObservables {
///     price: 50.0,
///     daily_volume: 1_000_000.0,
///     bid_ask_spread: 0.0,
///     execution_factor: 0.1,
///     permanent_factor: 0.0,
///     temporary_factor: 0.01,
/// };
/// let scheme = ContinuousPowerImpact::new(
///     OrderSpecification::new(100_000.0, 5.0, 50).unwrap(),
///     PriceEvolutionParameters::new(
///         ArithmeticPriceDynamics::flat(50.0, 0.0, 1.0).unwrap(),
///         PriceMarketImpact::power(&obs, 1.0).unwrap(),
///     ),
///     MeanVarianceObjective::new(1e-6).unwrap(),
/// );
/// let t_star = scheme.characteristic_time().unwrap();
/// assert!((t_star - 5.0_f64.sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousPowerImpact {
    order: OrderSpecification,
    params: PriceEvolutionParameters,
    objective: MeanVarianceObjective,
}

#[derive(Debug, Clone, Copy)]
struct PowerInputs {
    eta: f64,
    exponent: f64,
    gamma: f64,
    sigma: f64,
    t_star: f64,
}

impl ContinuousPowerImpact {
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

    fn inputs(&self) -> Result<PowerInputs, ExecutionError> {
        let temporary = self.params.impact().temporary();
        if temporary.is_linear() {
            return Err(ExecutionError::UnsupportedImpact(
                "power impact scheme requires a power temporary impact",
            ));
        }
        let (eta, exponent) = (temporary.coefficient(), temporary.exponent());
        if eta <= 0.0 {
            return Err(ExecutionError::InvalidParameter {
                name: "temporary_impact",
                value: eta,
            });
        }
        let gamma = self.params.permanent_slope()?;
        let sigma = self.params.dynamics().epoch_volatility();
        let lambda_sigma_sq = self.objective.risk_aversion() * sigma * sigma;
        if lambda_sigma_sq <= 0.0 {
            return Err(ExecutionError::InvalidParameter {
                name: "risk_aversion_variance",
                value: lambda_sigma_sq,
            });
        }
        let x = self.order.start_holdings().abs();
        if x == 0.0 {
            return Err(ExecutionError::InvalidOrder(
                "power impact scheme requires non-zero holdings".to_string(),
            ));
        }
        let t_star = (exponent * eta * x.powf(exponent - 1.0) / lambda_sigma_sq)
            .powf(1.0 / (exponent + 1.0));
        Ok(PowerInputs {
            eta,
            exponent,
            gamma,
            sigma,
            t_star,
        })
    }

    /// T*.
    pub fn characteristic_time(&self) -> Result<f64, ExecutionError> {
        Ok(self.inputs()?.t_star)
    }

    /// Completion time `(k+1)/(k-1)·T*`, defined for k > 1.
    pub fn max_horizon(&self) -> Result<Option<f64>, ExecutionError> {
        let p = self.inputs()?;
        Ok(max_horizon(p.exponent, p.t_star))
    }

    /// Holdings x(t).
    pub fn holdings(&self, t: f64) -> Result<f64, ExecutionError> {
        let p = self.inputs()?;
        Ok(self.order.start_holdings() * profile(p.exponent, p.t_star, t.max(0.0)))
    }

    /// Sell rate `-dx/dt = (X/T*)·(x/X)^{2/(k+1)}`.
    pub fn trade_rate(&self, t: f64) -> Result<f64, ExecutionError> {
        let p = self.inputs()?;
        Ok(rate(self.order.start_holdings(), p.exponent, p.t_star, t.max(0.0)))
    }

    /// Expected impact cost incurred over `[t, T]`.
    pub fn cost_expectation_to_go(&self, t: f64) -> Result<f64, ExecutionError> {
        let p = self.inputs()?;
        let x = self.order.start_holdings();
        self.integrate_to_go(&p, t, |s| {
            let v = rate(x, p.exponent, p.t_star, s);
            p.eta * v.abs().powf(p.exponent + 1.0)
                + p.gamma * x * profile(p.exponent, p.t_star, s) * v
        })
    }

    /// Shortfall variance accrued over `[t, T]`.
    pub fn cost_variance_to_go(&self, t: f64) -> Result<f64, ExecutionError> {
        let p = self.inputs()?;
        let x = self.order.start_holdings();
        let sigma_sq = p.sigma * p.sigma;
        self.integrate_to_go(&p, t, |s| {
            let h = x * profile(p.exponent, p.t_star, s);
            sigma_sq * h * h
        })
    }

    fn integrate_to_go<F>(&self, p: &PowerInputs, t: f64, f: F) -> Result<f64, ExecutionError>
    where
        F: Fn(f64) -> f64,
    {
        let horizon = self.order.horizon();
        let start = t.clamp(0.0, horizon);
        let end = max_horizon(p.exponent, p.t_star).map_or(horizon, |t_max| t_max.min(horizon));
        if end <= start {
            return Ok(0.0);
        }
        let rule = GaussLegendre::new(QUADRATURE_POINTS)?;
        Ok(rule.integrate(f, start, end))
    }
}

fn is_unit(exponent: f64) -> bool {
    (exponent - 1.0).abs() < UNIT_EXPONENT_TOLERANCE
}

fn max_horizon(exponent: f64, t_star: f64) -> Option<f64> {
    (exponent > 1.0 && !is_unit(exponent)).then(|| (exponent + 1.0) / (exponent - 1.0) * t_star)
}

/// x(t)/X.
fn profile(k: f64, t_star: f64, t: f64) -> f64 {
    if is_unit(k) {
        (-t / t_star).exp()
    } else if k < 1.0 {
        (1.0 + (1.0 - k) * t / ((1.0 + k) * t_star)).powf(-(1.0 + k) / (1.0 - k))
    } else {
        (1.0 - (k - 1.0) * t / ((k + 1.0) * t_star))
            .max(0.0)
            .powf((k + 1.0) / (k - 1.0))
    }
}

fn rate(x: f64, k: f64, t_star: f64, t: f64) -> f64 {
    x / t_star * profile(k, t_star, t).powf(2.0 / (k + 1.0))
}

impl StaticOptimalScheme for ContinuousPowerImpact {
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
        let p = self.inputs()?;
        let k = p.exponent;
        let x = self.order.start_holdings();
        let x_abs = x.abs();
        let c = (k + 1.0) / (3.0 * k + 1.0);
        let expectation =
            0.5 * p.gamma * x * x + c * p.eta * (x_abs / p.t_star).powf(k + 1.0) * p.t_star;
        let variance = c * p.sigma * p.sigma * p.t_star * x * x;
        let hyperboloid_boundary =
            c.powf(k + 1.0) * p.eta * p.sigma.powf(2.0 * k) * x_abs.powf(3.0 * k + 1.0);

        let nodes = self.order.time_nodes();
        let holdings = nodes.iter().map(|&t| x * profile(k, p.t_star, t)).collect();
        let trajectory = TradingTrajectory::from_holdings(nodes, holdings)?;
        let max_horizon = max_horizon(k, p.t_star);

        debug!(
            exponent = k,
            t_star = p.t_star,
            expectation,
            variance,
            "generated power impact trajectory"
        );

        Ok(TrajectoryOptimum {
            trajectory,
            risk_aversion: self.objective.risk_aversion(),
            expected_shortfall: expectation,
            shortfall_variance: variance,
            objective_utility: self.objective.utility(expectation, variance),
            characteristic_time: p.t_star,
            market_power: market_power(p.eta, x, self.order.horizon(), p.sigma),
            detail: OptimumDetail::PowerImpact {
                exponent: k,
                max_horizon,
                hyperboloid_boundary,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::ArithmeticPriceDynamics;
    use crate::impact::{PriceMarketImpact, TransactionFunction};
    use approx::assert_relative_eq;

    fn scheme(k: f64, horizon: f64, gamma: f64) -> ContinuousPowerImpact {
        let eta = 0.5 / (1.0e5_f64).powf(k);
        ContinuousPowerImpact::new(
            OrderSpecification::new(1.0e5, horizon, 40).unwrap(),
            PriceEvolutionParameters::new(
                ArithmeticPriceDynamics::flat(50.0, 0.0, 1.0).unwrap(),
                PriceMarketImpact::new(
                    TransactionFunction::linear(gamma, 0.0).unwrap(),
                    TransactionFunction::power(eta, k).unwrap(),
                ),
            ),
            MeanVarianceObjective::new(1e-6).unwrap(),
        )
    }

    #[test]
    fn test_unit_exponent_matches_exponential_decay() {
        let s = scheme(1.0, 5.0, 0.0);
        let t_star = s.characteristic_time().unwrap();
        assert_relative_eq!(t_star, 5.0_f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(s.holdings(t_star).unwrap(), 1.0e5 / std::f64::consts::E, max_relative = 1e-12);
        assert!(s.max_horizon().unwrap().is_none());
        let opt = s.generate().unwrap();
        assert_relative_eq!(opt.expected_shortfall, 0.5 * 5e-6 * 1e10 / t_star, max_relative = 1e-12);
        assert_relative_eq!(opt.shortfall_variance, 0.5 * t_star * 1e10, max_relative = 1e-12);
    }

    #[test]
    fn test_superlinear_completes_at_max_horizon() {
        let s = scheme(1.5, 40.0, 0.0);
        let t_max = s.max_horizon().unwrap().unwrap();
        let t_star = s.characteristic_time().unwrap();
        assert_relative_eq!(t_max, 5.0 * t_star, max_relative = 1e-12);
        assert_eq!(s.holdings(t_max + 1.0).unwrap(), 0.0);
        assert!(s.holdings(0.5 * t_max).unwrap() > 0.0);
        let opt = s.generate().unwrap();
        assert_relative_eq!(
            s.cost_expectation_to_go(0.0).unwrap(),
            opt.expected_shortfall,
            max_relative = 1e-8
        );
        assert_relative_eq!(
            s.cost_variance_to_go(0.0).unwrap(),
            opt.shortfall_variance,
            max_relative = 1e-8
        );
        assert_eq!(s.cost_variance_to_go(t_max).unwrap(), 0.0);
    }

    #[test]
    fn test_permanent_cost_to_go() {
        let gamma = 1e-7;
        let s = scheme(1.5, 40.0, gamma);
        let opt = s.generate().unwrap();
        assert_relative_eq!(
            s.cost_expectation_to_go(0.0).unwrap(),
            opt.expected_shortfall,
            max_relative = 1e-8
        );
    }

    #[test]
    fn test_hyperboloid_boundary() {
        for k in [0.4, 1.0, 1.3] {
            let opt = scheme(k, 5.0, 0.0).generate().unwrap();
            let OptimumDetail::PowerImpact {
                hyperboloid_boundary,
                ..
            } = opt.detail
            else {
                panic!("unexpected detail");
            };
            assert_relative_eq!(
                opt.expected_shortfall * opt.shortfall_variance.powf(k),
                hyperboloid_boundary,
                max_relative = 1e-10
            );
        }
    }

    #[test]
    fn test_trade_rate_is_holdings_derivative() {
        for k in [0.5, 1.0, 1.5] {
            let s = scheme(k, 5.0, 0.0);
            let h = 1e-5;
            let t = 1.3;
            let numeric = -(s.holdings(t + h).unwrap() - s.holdings(t - h).unwrap()) / (2.0 * h);
            assert_relative_eq!(s.trade_rate(t).unwrap(), numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_requires_power_impact_and_risk() {
        let linear = ContinuousPowerImpact::new(
            OrderSpecification::new(1.0e5, 5.0, 10).unwrap(),
            PriceEvolutionParameters::new(
                ArithmeticPriceDynamics::flat(50.0, 0.0, 1.0).unwrap(),
                PriceMarketImpact::new(
                    TransactionFunction::linear(0.0, 0.0).unwrap(),
                    TransactionFunction::linear(1e-6, 0.0).unwrap(),
                ),
            ),
            MeanVarianceObjective::new(1e-6).unwrap(),
        );
        assert!(matches!(linear.generate(), Err(ExecutionError::UnsupportedImpact(_))));
        let neutral = ContinuousPowerImpact::new(
            *linear.order(),
            scheme(0.5, 5.0, 0.0).parameters().clone(),
            MeanVarianceObjective::new(0.0).unwrap(),
        );
        assert!(neutral.characteristic_time().is_err());
    }
}
