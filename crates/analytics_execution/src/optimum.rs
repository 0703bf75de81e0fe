//! Optimal trajectory results and efficient frontiers.

use serde::Serialize;
use tracing::debug;

use crate::error::ExecutionError;
use crate::nonadaptive::StaticOptimalScheme;
use crate::risk::MeanVarianceObjective;
use crate::strategy::TradingTrajectory;

/// Scheme-specific quantities of an optimum.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum OptimumDetail {
    /// Discrete Almgren-Chriss with price drift.
    DriftAdjusted {
        /// κ̃ = √(λσ²/η̃)
        kappa_tilde: f64,
        /// Discrete decay rate κ
        kappa: f64,
        /// α/(2λσ²); `None` for a risk-neutral trader
        residual_holdings: Option<f64>,
        /// Expected gain from the drift adjustment
        drift_gain: f64,
        /// Drift contribution to the holdings
        holdings_adjustment: Vec<f64>,
        /// Drift contribution to the trade list
        trade_adjustment: Vec<f64>,
    },
    /// Continuous Almgren-Chriss with linear temporary impact.
    LinearImpact {
        /// κ = √(λσ²/η)
        kappa: f64,
    },
    /// Continuous power-law temporary impact.
    PowerImpact {
        /// Temporary impact exponent k
        exponent: f64,
        /// Completion time `(k+1)/(k-1)·T*` when k > 1
        max_horizon: Option<f64>,
        /// Constant of the hyperboloid frontier `E·Vᵏ`
        hyperboloid_boundary: f64,
    },
}

/// Optimal static trajectory with its cost moments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryOptimum {
    /// Holdings sampled on the order's nodes
    pub trajectory: TradingTrajectory,
    /// Risk aversion λ the optimum was generated for
    pub risk_aversion: f64,
    /// Expected implementation shortfall E
    pub expected_shortfall: f64,
    /// Shortfall variance V
    pub shortfall_variance: f64,
    /// Objective value E + λV
    pub objective_utility: f64,
    /// Characteristic decay time of the trajectory
    pub characteristic_time: f64,
    /// Temporary impact cost relative to volatility, `η(X/T)/(σ√T)`
    pub market_power: f64,
    /// Scheme-specific output
    pub detail: OptimumDetail,
}

impl TrajectoryOptimum {
    /// `(V, E)` point of the efficient frontier.
    pub fn frontier_point(&self) -> FrontierPoint {
        FrontierPoint {
            risk_aversion: self.risk_aversion,
            variance: self.shortfall_variance,
            expectation: self.expected_shortfall,
        }
    }

    /// √V.
    pub fn shortfall_std_dev(&self) -> f64 {
        self.shortfall_variance.max(0.0).sqrt()
    }
}

/// One point of the efficient frontier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrontierPoint {
    /// λ
    pub risk_aversion: f64,
    /// V
    pub variance: f64,
    /// E
    pub expectation: f64,
}

/// Optima swept over a grid of risk aversions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficientFrontier {
    points: Vec<FrontierPoint>,
}

impl EfficientFrontier {
    /// Generates one optimum per λ, using `build` to construct the scheme.
    ///
    /// # Errors
    /// Propagates construction and generation failures, and rejects an
    /// empty grid.
    pub fn trace<S, F>(risk_aversions: &[f64], mut build: F) -> Result<Self, ExecutionError>
    where
        S: StaticOptimalScheme,
        F: FnMut(MeanVarianceObjective) -> Result<S, ExecutionError>,
    {
        if risk_aversions.is_empty() {
            return Err(ExecutionError::InvalidOrder(
                "empty risk aversion grid".to_string(),
            ));
        }
        let points = risk_aversions
            .iter()
            .map(|&lambda| {
                let scheme = build(MeanVarianceObjective::new(lambda)?)?;
                Ok(scheme.generate()?.frontier_point())
            })
            .collect::<Result<Vec<_>, ExecutionError>>()?;
        debug!(points = points.len(), "traced efficient frontier");
        Ok(Self { points })
    }

    /// Frontier points in grid order.
    pub fn points(&self) -> &[FrontierPoint] {
        &self.points
    }

    /// Whether E rises and V falls as λ increases.
    pub fn is_monotone(&self) -> bool {
        let mut sorted = self.points.clone();
        sorted.sort_by(|a, b| a.risk_aversion.total_cmp(&b.risk_aversion));
        sorted.windows(2).all(|w| {
            let scale_e = w[0].expectation.abs().max(1.0) * 1e-10;
            let scale_v = w[0].variance.abs().max(1.0) * 1e-10;
            w[1].expectation >= w[0].expectation - scale_e && w[1].variance <= w[0].variance + scale_v
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(risk_aversion: f64, variance: f64, expectation: f64) -> FrontierPoint {
        FrontierPoint {
            risk_aversion,
            variance,
            expectation,
        }
    }

    #[test]
    fn test_monotone_frontier() {
        let frontier = EfficientFrontier {
            points: vec![point(1e-6, 4.0, 2.0), point(1e-7, 9.0, 1.0)],
        };
        assert!(frontier.is_monotone());
        let broken = EfficientFrontier {
            points: vec![point(1e-6, 10.0, 2.0), point(1e-7, 9.0, 1.0)],
        };
        assert!(!broken.is_monotone());
    }
}
