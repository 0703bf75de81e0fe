//! Principal bid estimation on top of the power-law impact optimum.
//!
//! A dealer buying `X` units at a discount `π` per unit earns `πX - E` with
//! variance `V` when liquidating along the power-impact optimum. Scaling by
//! the characteristic time gives the horizon measure, whose mean over its
//! standard deviation is the information ratio. Over free horizons `T`
//!
//! ```text
//! IR(T) = (A - B/Tᵏ) / (σX√c T),   A = πX - γX²/2,   B = cηX^{k+1}
//! ```
//!
//! peaks at `T = ((k+1)B/A)^{1/k}` with value `A·k/(k+1)/(σX√c T)`.

use serde::Serialize;

use crate::error::{check_finite, ExecutionError};
use crate::nonadaptive::{ContinuousPowerImpact, StaticOptimalScheme};
use crate::optimum::TrajectoryOptimum;

/// Gaussian profit measure of a principal trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrincipalMeasure {
    /// Expected gross profit
    pub mean: f64,
    /// Variance of the gross profit
    pub variance: f64,
}

impl PrincipalMeasure {
    /// √variance.
    pub fn std_dev(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }
}

/// Almgren (2003) principal bid estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct Almgren2003Estimator {
    optimum: TrajectoryOptimum,
    start_holdings: f64,
    permanent_slope: f64,
    temporary_coefficient: f64,
    exponent: f64,
    volatility: f64,
}

impl Almgren2003Estimator {
    /// Generates the power-impact optimum backing the estimator.
    pub fn new(scheme: &ContinuousPowerImpact) -> Result<Self, ExecutionError> {
        let optimum = scheme.generate()?;
        let params = scheme.parameters();
        let temporary = params.impact().temporary();
        Ok(Self {
            optimum,
            start_holdings: scheme.order().start_holdings(),
            permanent_slope: params.permanent_slope()?,
            temporary_coefficient: temporary.coefficient(),
            exponent: temporary.exponent(),
            volatility: params.dynamics().epoch_volatility(),
        })
    }

    /// Underlying optimum.
    pub fn optimum(&self) -> &TrajectoryOptimum {
        &self.optimum
    }

    fn fraction(&self) -> f64 {
        (self.exponent + 1.0) / (3.0 * self.exponent + 1.0)
    }

    /// Gross profit `πX - E` and its variance.
    pub fn principal_measure(&self, discount: f64) -> Result<PrincipalMeasure, ExecutionError> {
        check_finite("principal_discount", discount)?;
        Ok(PrincipalMeasure {
            mean: discount * self.start_holdings - self.optimum.expected_shortfall,
            variance: self.optimum.shortfall_variance,
        })
    }

    /// Principal measure per unit characteristic time.
    pub fn horizon_principal_measure(&self, discount: f64) -> Result<PrincipalMeasure, ExecutionError> {
        let measure = self.principal_measure(discount)?;
        let t_star = self.optimum.characteristic_time;
        Ok(PrincipalMeasure {
            mean: measure.mean / t_star,
            variance: measure.variance / t_star,
        })
    }

    /// Horizon mean over horizon standard deviation.
    pub fn information_ratio(&self, discount: f64) -> Result<f64, ExecutionError> {
        let measure = self.horizon_principal_measure(discount)?;
        Ok(measure.mean / measure.std_dev())
    }

    /// Discount at which the expected profit is zero, `E/X`.
    pub fn breakeven_principal_discount(&self) -> f64 {
        self.optimum.expected_shortfall / self.start_holdings
    }

    fn gain_and_cost(&self, discount: f64) -> Result<(f64, f64), ExecutionError> {
        check_finite("principal_discount", discount)?;
        let x = self.start_holdings;
        let gain = discount * x - 0.5 * self.permanent_slope * x * x;
        if gain <= 0.0 {
            return Err(ExecutionError::InvalidParameter {
                name: "principal_discount",
                value: discount,
            });
        }
        let cost = self.fraction() * self.temporary_coefficient * x.abs().powf(self.exponent + 1.0);
        Ok((gain, cost))
    }

    /// Horizon maximising the information ratio.
    ///
    /// # Errors
    /// `InvalidParameter` when the discount does not cover the permanent
    /// impact cost.
    pub fn optimal_information_ratio_horizon(&self, discount: f64) -> Result<f64, ExecutionError> {
        let (gain, cost) = self.gain_and_cost(discount)?;
        let k = self.exponent;
        Ok(((k + 1.0) * cost / gain).powf(1.0 / k))
    }

    /// Information ratio at the optimal horizon.
    pub fn optimal_information_ratio(&self, discount: f64) -> Result<f64, ExecutionError> {
        let (gain, _) = self.gain_and_cost(discount)?;
        let horizon = self.optimal_information_ratio_horizon(discount)?;
        let k = self.exponent;
        Ok(gain * k / (k + 1.0)
            / (self.volatility * self.start_holdings.abs() * self.fraction().sqrt() * horizon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{ArithmeticPriceDynamics, PriceEvolutionParameters};
    use crate::impact::{MarketObservables, PriceMarketImpact};
    use crate::risk::MeanVarianceObjective;
    use crate::strategy::OrderSpecification;
    use approx::assert_relative_eq;

    fn estimator(k: f64) -> Almgren2003Estimator {
        let obs = MarketObservables {
            price: 50.0,
            daily_volume: 1_000_000.0,
            bid_ask_spread: 0.0,
            execution_factor: 0.1,
            permanent_factor: 0.0,
            temporary_factor: 0.01,
        };
        let scheme = ContinuousPowerImpact::new(
            OrderSpecification::new(100_000.0, 5.0, 50).unwrap(),
            PriceEvolutionParameters::new(
                ArithmeticPriceDynamics::flat(50.0, 0.0, 1.0).unwrap(),
                PriceMarketImpact::power(&obs, k).unwrap(),
            ),
            MeanVarianceObjective::new(1e-6).unwrap(),
        );
        Almgren2003Estimator::new(&scheme).unwrap()
    }

    #[test]
    fn test_unit_exponent_measures() {
        let e = estimator(1.0);
        assert_relative_eq!(e.breakeven_principal_discount(), 0.1118, epsilon = 1e-4);
        let m = e.principal_measure(0.15).unwrap();
        assert_relative_eq!(m.mean, 3819.66, epsilon = 0.01);
        assert_relative_eq!(m.std_dev(), 105_737.3, epsilon = 0.1);
        assert_relative_eq!(e.information_ratio(0.15).unwrap(), 0.0242, epsilon = 1e-4);
        assert_relative_eq!(e.optimal_information_ratio(0.15).unwrap(), 0.0318, epsilon = 1e-4);
        assert_relative_eq!(e.optimal_information_ratio_horizon(0.15).unwrap(), 10.0 / 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_optimal_ratio_dominates() {
        for k in [0.5, 1.0, 1.5] {
            let e = estimator(k);
            let ir = e.information_ratio(0.15).unwrap();
            let best = e.optimal_information_ratio(0.15).unwrap();
            assert!(best >= ir - 1e-12, "k = {k}: {best} < {ir}");
        }
    }

    #[test]
    fn test_breakeven_discount_zeroes_profit() {
        let e = estimator(0.7);
        let m = e.principal_measure(e.breakeven_principal_discount()).unwrap();
        assert!(m.mean.abs() < 1e-6);
        assert!(e.optimal_information_ratio_horizon(0.0).is_err());
    }
}
