//! Sensitivities of execution objectives.
//!
//! - [`control_nodes_greeks`]: jacobian and hessian of the discrete shortfall
//!   moments with respect to the interior holdings `x₁ … x_{N-1}`. The
//!   jacobian is computed in forward mode with `Dual64`; the hessian of the
//!   linear-impact objective is tri-diagonal and is assembled in closed form.
//! - [`risk_aversion_greeks`]: derivatives of the continuous Almgren-Chriss
//!   moments with respect to λ.

use num_dual::Dual64;
use serde::Serialize;

use crate::dynamics::PriceEvolutionParameters;
use crate::error::ExecutionError;
use crate::nonadaptive::{ContinuousAlmgrenChriss, StaticOptimalScheme};
use crate::risk::{MeanVarianceObjective, ObjectiveUtility};
use crate::strategy::TradingTrajectory;

/// Value, jacobian and hessian of a function of the control nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlNodesGreek {
    value: f64,
    jacobian: Vec<f64>,
    hessian: Vec<Vec<f64>>,
}

impl ControlNodesGreek {
    /// Creates the greek.
    ///
    /// # Errors
    /// `InvalidGreek` when the jacobian is empty, the hessian is not square
    /// of the same size or any entry is non-finite.
    pub fn new(value: f64, jacobian: Vec<f64>, hessian: Vec<Vec<f64>>) -> Result<Self, ExecutionError> {
        if !value.is_finite() {
            return Err(ExecutionError::InvalidGreek("non-finite value".to_string()));
        }
        let n = jacobian.len();
        if n == 0 || hessian.len() != n || hessian.iter().any(|row| row.len() != n) {
            return Err(ExecutionError::InvalidGreek(format!(
                "jacobian of length {n} with {} hessian rows",
                hessian.len()
            )));
        }
        if jacobian.iter().chain(hessian.iter().flatten()).any(|v| !v.is_finite()) {
            return Err(ExecutionError::InvalidGreek("non-finite entry".to_string()));
        }
        Ok(Self {
            value,
            jacobian,
            hessian,
        })
    }

    /// Function value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// First derivatives.
    pub fn jacobian(&self) -> &[f64] {
        &self.jacobian
    }

    /// Second derivatives.
    pub fn hessian(&self) -> &[Vec<f64>] {
        &self.hessian
    }
}

/// Greeks of E, V and E + λV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryGreeks {
    /// Expected shortfall
    pub expectation: ControlNodesGreek,
    /// Shortfall variance
    pub variance: ControlNodesGreek,
    /// Mean-variance objective
    pub objective: ControlNodesGreek,
}

struct LinearCoefficients {
    gamma: f64,
    permanent_offset: f64,
    eta: f64,
    epsilon: f64,
    alpha: f64,
}

impl LinearCoefficients {
    fn from_params(params: &PriceEvolutionParameters) -> Result<Self, ExecutionError> {
        let impact = params.impact();
        if !impact.temporary().is_linear() {
            return Err(ExecutionError::UnsupportedImpact(
                "control node greeks require linear temporary impact",
            ));
        }
        if impact.temporary_volatility().is_some() {
            return Err(ExecutionError::UnsupportedImpact(
                "control node greeks do not support temporary impact volatility",
            ));
        }
        Ok(Self {
            gamma: params.permanent_slope()?,
            permanent_offset: impact.permanent().offset(),
            eta: impact.temporary().coefficient(),
            epsilon: impact.temporary().offset(),
            alpha: params.dynamics().drift(),
        })
    }
}

/// E and V of holdings `x` as dual numbers.
///
/// Sign terms use the trade signs of the real trajectory, so the offsets
/// contribute `ε·(sgn mⱼ₋₁ - sgn mⱼ)` to the derivative away from zero
/// trades.
fn dual_moments(
    x: &[Dual64],
    taus: &[f64],
    sigma_sq: &[f64],
    signs: &[f64],
    coef: &LinearCoefficients,
) -> (Dual64, Dual64) {
    let c = |v: f64| Dual64::from(v);
    let mut expectation = c(0.0);
    let mut variance = c(0.0);
    for k in 0..taus.len() {
        let sold = x[k] - x[k + 1];
        let after = x[k + 1];
        expectation = expectation
            + c(coef.gamma) * after * sold
            + c(taus[k] * coef.permanent_offset * signs[k]) * after
            + c(coef.epsilon * signs[k]) * sold
            + c(coef.eta / taus[k]) * sold * sold
            - c(coef.alpha * taus[k]) * after;
        variance = variance + c(sigma_sq[k]) * after * after;
    }
    (expectation, variance)
}

/// Jacobian and hessian of E, V and E + λV with respect to interior holdings.
///
/// # Errors
/// `InvalidTrajectory` when there are no interior nodes, `UnsupportedImpact`
/// for non-linear temporary impact or impact volatility.
pub fn control_nodes_greeks(
    trajectory: &TradingTrajectory,
    params: &PriceEvolutionParameters,
    objective: &MeanVarianceObjective,
) -> Result<TrajectoryGreeks, ExecutionError> {
    let coef = LinearCoefficients::from_params(params)?;
    let n = trajectory.num_intervals();
    if n < 2 {
        return Err(ExecutionError::InvalidTrajectory(
            "greeks need at least one interior node".to_string(),
        ));
    }
    let nodes = trajectory.time_nodes();
    let holdings = trajectory.holdings();
    let taus = trajectory.interval_lengths();
    let sigma_sq: Vec<f64> = nodes
        .windows(2)
        .map(|w| params.dynamics().interval_variance(w[0], w[1]))
        .collect();
    let signs: Vec<f64> = trajectory
        .trade_list()
        .iter()
        .map(|&n| if n == 0.0 { 0.0 } else { -n.signum() })
        .collect();
    let lambda = objective.risk_aversion();

    let real: Vec<Dual64> = holdings.iter().map(|&h| Dual64::from(h)).collect();
    let (e0, v0) = dual_moments(&real, &taus, &sigma_sq, &signs, &coef);

    let interior = n - 1;
    let mut e_jacobian = Vec::with_capacity(interior);
    let mut v_jacobian = Vec::with_capacity(interior);
    for j in 1..n {
        let mut seeded = real.clone();
        seeded[j] = Dual64::new(holdings[j], 1.0);
        let (e, v) = dual_moments(&seeded, &taus, &sigma_sq, &signs, &coef);
        e_jacobian.push(e.eps);
        v_jacobian.push(v.eps);
    }

    let mut e_hessian = vec![vec![0.0; interior]; interior];
    let mut v_hessian = vec![vec![0.0; interior]; interior];
    for row in 0..interior {
        // interior node j = row + 1 closes interval j - 1 and opens interval j
        let j = row + 1;
        e_hessian[row][row] = 2.0 * coef.eta / taus[j - 1] + 2.0 * coef.eta / taus[j] - 2.0 * coef.gamma;
        v_hessian[row][row] = 2.0 * sigma_sq[j - 1];
        if row + 1 < interior {
            let off = coef.gamma - 2.0 * coef.eta / taus[j];
            e_hessian[row][row + 1] = off;
            e_hessian[row + 1][row] = off;
        }
    }

    let u_jacobian = e_jacobian
        .iter()
        .zip(&v_jacobian)
        .map(|(e, v)| e + lambda * v)
        .collect();
    let u_hessian = e_hessian
        .iter()
        .zip(&v_hessian)
        .map(|(er, vr)| er.iter().zip(vr).map(|(e, v)| e + lambda * v).collect())
        .collect();

    Ok(TrajectoryGreeks {
        objective: ControlNodesGreek::new(objective.utility(e0.re, v0.re), u_jacobian, u_hessian)?,
        expectation: ControlNodesGreek::new(e0.re, e_jacobian, e_hessian)?,
        variance: ControlNodesGreek::new(v0.re, v_jacobian, v_hessian)?,
    })
}

/// Continuous Almgren-Chriss moments and their λ-derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAversionGreeks {
    /// λ
    pub risk_aversion: f64,
    /// E
    pub expectation: f64,
    /// V
    pub variance: f64,
    /// dE/dλ
    pub expectation_delta: f64,
    /// dV/dλ
    pub variance_delta: f64,
    /// d(E + λV)/dλ
    pub objective_delta: f64,
}

/// λ-greeks of the continuous Almgren-Chriss optimum.
pub fn risk_aversion_greeks(
    scheme: &ContinuousAlmgrenChriss,
) -> Result<RiskAversionGreeks, ExecutionError> {
    let lambda = scheme.objective().risk_aversion();
    let moments = scheme.objective_moments(Dual64::new(lambda, 1.0))?;
    let (expectation, variance) = (moments.expectation.re, moments.variance.re);
    let (expectation_delta, variance_delta) = (moments.expectation.eps, moments.variance.eps);
    Ok(RiskAversionGreeks {
        risk_aversion: lambda,
        expectation,
        variance,
        expectation_delta,
        variance_delta,
        objective_delta: expectation_delta + variance + lambda * variance_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::TrajectoryShortfallEstimator;
    use crate::dynamics::ArithmeticPriceDynamics;
    use crate::impact::{PriceMarketImpact, TransactionFunction};
    use crate::nonadaptive::DiscreteAlmgrenChrissDrift;
    use crate::strategy::OrderSpecification;
    use approx::assert_relative_eq;

    fn params(epsilon: f64, alpha: f64) -> PriceEvolutionParameters {
        PriceEvolutionParameters::new(
            ArithmeticPriceDynamics::flat(50.0, alpha, 0.95).unwrap(),
            PriceMarketImpact::new(
                TransactionFunction::linear(2.5e-7, 0.0).unwrap(),
                TransactionFunction::linear(2.5e-6, epsilon).unwrap(),
            ),
        )
    }

    fn order() -> OrderSpecification {
        OrderSpecification::new(1.0e6, 5.0, 10).unwrap()
    }

    #[test]
    fn test_greek_validation() {
        assert!(ControlNodesGreek::new(1.0, vec![], vec![]).is_err());
        assert!(ControlNodesGreek::new(1.0, vec![1.0, 2.0], vec![vec![1.0, 0.0]]).is_err());
        assert!(ControlNodesGreek::new(f64::NAN, vec![1.0], vec![vec![1.0]]).is_err());
        let g = ControlNodesGreek::new(1.0, vec![1.0], vec![vec![2.0]]).unwrap();
        assert_eq!(g.hessian()[0][0], 2.0);
    }

    #[test]
    fn test_value_matches_estimator() {
        let p = params(0.0625, 0.02);
        let traj = TradingTrajectory::linear(&order()).unwrap();
        let greeks = control_nodes_greeks(&traj, &p, &MeanVarianceObjective::new(1e-6).unwrap()).unwrap();
        let est = TrajectoryShortfallEstimator::new(traj).estimate(&p).unwrap();
        assert_relative_eq!(greeks.expectation.value(), est.expectation, max_relative = 1e-12);
        assert_relative_eq!(greeks.variance.value(), est.variance, max_relative = 1e-12);
    }

    #[test]
    fn test_optimal_trajectory_has_zero_jacobian() {
        for alpha in [0.0, 0.05] {
            let p = params(0.0, alpha);
            let objective = MeanVarianceObjective::new(1e-6).unwrap();
            let opt = DiscreteAlmgrenChrissDrift::new(order(), p.clone(), objective)
                .generate()
                .unwrap();
            let greeks = control_nodes_greeks(&opt.trajectory, &p, &objective).unwrap();
            let scale = greeks.expectation.jacobian().iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            for g in greeks.objective.jacobian() {
                assert!(g.abs() < 1e-8 * scale.max(1.0), "gradient {g}");
            }
        }
    }

    #[test]
    fn test_uniform_grid_hessian() {
        let p = params(0.0, 0.0);
        let lambda = 2e-6;
        let traj = TradingTrajectory::linear(&order()).unwrap();
        let greeks = control_nodes_greeks(&traj, &p, &MeanVarianceObjective::new(lambda).unwrap()).unwrap();
        let tau = 0.5;
        let eta_tilde = 2.5e-6 - 0.5 * 2.5e-7 * tau;
        let h = greeks.objective.hessian();
        assert_eq!(h.len(), 9);
        assert_relative_eq!(
            h[3][3],
            4.0 * eta_tilde / tau + 2.0 * lambda * 0.95 * 0.95 * tau,
            max_relative = 1e-12
        );
        assert_relative_eq!(h[3][4], -2.0 * eta_tilde / tau, max_relative = 1e-12);
        assert_eq!(h[0][5], 0.0);
    }

    #[test]
    fn test_hessian_matches_jacobian_differences() {
        let p = params(0.0, 0.0);
        let objective = MeanVarianceObjective::new(1e-6).unwrap();
        let base = TradingTrajectory::linear(&order()).unwrap();
        let greeks = control_nodes_greeks(&base, &p, &objective).unwrap();
        let bump = 10.0;
        let mut holdings = base.holdings().to_vec();
        holdings[4] += bump;
        let bumped = TradingTrajectory::from_holdings(base.time_nodes().to_vec(), holdings).unwrap();
        let bumped_greeks = control_nodes_greeks(&bumped, &p, &objective).unwrap();
        for row in 0..9 {
            let fd = (bumped_greeks.objective.jacobian()[row] - greeks.objective.jacobian()[row]) / bump;
            assert_relative_eq!(fd, greeks.objective.hessian()[row][3], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_risk_aversion_greeks_envelope() {
        // Without drift the trajectory is optimal, so dE/dλ + λ dV/dλ = 0
        let lambda = 2e-6;
        let scheme = ContinuousAlmgrenChriss::new(
            order(),
            params(0.0, 0.0),
            MeanVarianceObjective::new(lambda).unwrap(),
        );
        let g = risk_aversion_greeks(&scheme).unwrap();
        assert!(g.expectation_delta > 0.0);
        assert!(g.variance_delta < 0.0);
        assert_relative_eq!(g.expectation_delta, -lambda * g.variance_delta, max_relative = 1e-9);
        assert_relative_eq!(g.objective_delta, g.variance, max_relative = 1e-9);
    }

    #[test]
    fn test_risk_aversion_greeks_match_finite_difference() {
        let make = |lambda: f64| {
            ContinuousAlmgrenChriss::new(
                order(),
                params(0.0625, 0.01),
                MeanVarianceObjective::new(lambda).unwrap(),
            )
        };
        let (lambda, h) = (1e-6, 1e-10);
        let g = risk_aversion_greeks(&make(lambda)).unwrap();
        let up = risk_aversion_greeks(&make(lambda + h)).unwrap();
        let down = risk_aversion_greeks(&make(lambda - h)).unwrap();
        assert_relative_eq!(
            g.variance_delta,
            (up.variance - down.variance) / (2.0 * h),
            max_relative = 1e-5
        );
        let zero = risk_aversion_greeks(&make(0.0)).unwrap();
        assert!(zero.expectation_delta.is_finite());
        assert!(zero.variance_delta < 0.0);
    }
}
