//! Control-node and risk-aversion greeks of Almgren-Chriss trajectories
//!
//! The jacobian of E + λV vanishes at the discrete optimum and not along
//! the straight-line (TWAP) schedule; the λ-greeks of the continuous
//! optimum show the frontier slope `dE/dV = -λ`.

use analytics_execution::nonadaptive::{
    ContinuousAlmgrenChriss, DiscreteAlmgrenChrissDrift, StaticOptimalScheme,
};
use analytics_execution::risk::MeanVarianceObjective;
use analytics_execution::sensitivity::{
    control_nodes_greeks, risk_aversion_greeks, RiskAversionGreeks, TrajectoryGreeks,
};
use analytics_execution::strategy::TradingTrajectory;
use clap::Args;
use serde::Serialize;
use tracing::info;

use super::{almgren_chriss_order, almgren_chriss_parameters};
use crate::output::{emit, fmt_num, Report, RunContext};
use crate::Result;

const LAMBDA_GRID: [f64; 5] = [1e-7, 5e-7, 1e-6, 2e-6, 1e-5];

/// Arguments of `control-greeks`
#[derive(Args, Debug, Clone)]
pub struct ControlGreeksArgs {
    /// Risk aversion λ of the control-node greeks
    #[arg(long, default_value_t = 2e-6)]
    pub risk_aversion: f64,

    /// Number of trading intervals
    #[arg(long, default_value_t = 5)]
    pub intervals: usize,
}

/// Greeks of one trajectory
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryGreeksRow {
    pub label: String,
    pub holdings: Vec<f64>,
    pub greeks: TrajectoryGreeks,
    /// Largest |∂(E + λV)/∂xₖ|
    pub max_objective_gradient: f64,
}

/// Result of `control-greeks`
#[derive(Debug, Clone, Serialize)]
pub struct ControlGreeksReport {
    pub risk_aversion: f64,
    pub trajectories: Vec<TrajectoryGreeksRow>,
    pub risk_aversion_greeks: Vec<RiskAversionGreeks>,
}

impl Report for ControlGreeksReport {
    fn title(&self) -> String {
        format!("Trajectory Greeks (λ = {:e})", self.risk_aversion)
    }

    fn print_text(&self) {
        for row in &self.trajectories {
            println!("{}:", row.label);
            println!("  {:<20} {}", "E:", fmt_num(row.greeks.expectation.value(), 2));
            println!("  {:<20} {}", "V:", fmt_num(row.greeks.variance.value(), 2));
            println!("  {:<20} {}", "E + λV:", fmt_num(row.greeks.objective.value(), 2));
            println!("  {:<20} {}", "max |∂U/∂x|:", fmt_num(row.max_objective_gradient, 6));
            println!("  {:>6} {:>16} {:>14} {:>14}", "node", "holdings", "∂U/∂x", "∂²U/∂x²");
            let objective = &row.greeks.objective;
            for (k, (g, h)) in objective.jacobian().iter().zip(objective.hessian()).enumerate() {
                println!(
                    "  {:>6} {:>16.2} {:>14} {:>14}",
                    k + 1,
                    row.holdings[k + 1],
                    fmt_num(*g, 6),
                    fmt_num(h[k], 6)
                );
            }
            println!();
        }

        println!("Continuous optimum λ-greeks:");
        println!(
            "{:>10} {:>14} {:>16} {:>14} {:>14} {:>14}",
            "λ", "E", "V", "dE/dλ", "dV/dλ", "dU/dλ"
        );
        for g in &self.risk_aversion_greeks {
            println!(
                "{:>10} {:>14} {:>16} {:>14} {:>14} {:>14}",
                fmt_num(g.risk_aversion, 2),
                fmt_num(g.expectation, 0),
                fmt_num(g.variance, 0),
                fmt_num(g.expectation_delta, 0),
                fmt_num(g.variance_delta, 0),
                fmt_num(g.objective_delta, 2)
            );
        }
    }
}

fn greeks_row(
    label: &str,
    trajectory: &TradingTrajectory,
    args: &ControlGreeksArgs,
) -> Result<TrajectoryGreeksRow> {
    let params = almgren_chriss_parameters(0.0)?;
    let objective = MeanVarianceObjective::new(args.risk_aversion)?;
    let greeks = control_nodes_greeks(trajectory, &params, &objective)?;
    let max_objective_gradient = greeks
        .objective
        .jacobian()
        .iter()
        .fold(0.0_f64, |acc, g| acc.max(g.abs()));
    Ok(TrajectoryGreeksRow {
        label: label.to_string(),
        holdings: trajectory.holdings().to_vec(),
        greeks,
        max_objective_gradient,
    })
}

/// Greeks of the TWAP and optimal schedules plus λ-greeks
pub fn compute(args: &ControlGreeksArgs) -> Result<ControlGreeksReport> {
    let order = almgren_chriss_order(args.intervals)?;
    let params = almgren_chriss_parameters(0.0)?;

    let twap = TradingTrajectory::linear(&order)?;
    let optimum = DiscreteAlmgrenChrissDrift::new(
        order,
        params.clone(),
        MeanVarianceObjective::new(args.risk_aversion)?,
    )
    .generate()?;

    let trajectories = vec![
        greeks_row("TWAP", &twap, args)?,
        greeks_row("Discrete optimum", &optimum.trajectory, args)?,
    ];

    let risk_aversion_greeks = LAMBDA_GRID
        .iter()
        .map(|&lambda| {
            let scheme =
                ContinuousAlmgrenChriss::new(order, params.clone(), MeanVarianceObjective::new(lambda)?);
            Ok(risk_aversion_greeks(&scheme)?)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ControlGreeksReport {
        risk_aversion: args.risk_aversion,
        trajectories,
        risk_aversion_greeks,
    })
}

/// Run the control-greeks command
pub fn run(args: &ControlGreeksArgs, ctx: &RunContext) -> Result<()> {
    info!(risk_aversion = args.risk_aversion, "computing trajectory greeks");
    emit(&compute(args)?, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ControlGreeksArgs {
        ControlGreeksArgs {
            risk_aversion: 2e-6,
            intervals: 5,
        }
    }

    #[test]
    fn test_optimum_is_stationary_and_twap_is_not() {
        let report = compute(&args()).unwrap();
        let twap = &report.trajectories[0];
        let optimum = &report.trajectories[1];
        assert_eq!(twap.greeks.objective.jacobian().len(), 4);
        let scale = optimum.greeks.expectation.value() / 1.0e6;
        assert!(optimum.max_objective_gradient < 1e-6 * scale);
        assert!(twap.max_objective_gradient > 1e3 * optimum.max_objective_gradient);
        assert!(optimum.greeks.objective.value() < twap.greeks.objective.value());
    }

    #[test]
    fn test_frontier_slope_is_minus_lambda() {
        let report = compute(&args()).unwrap();
        for g in &report.risk_aversion_greeks {
            assert!(g.expectation_delta > 0.0);
            assert!(g.variance_delta < 0.0);
            let slope = g.expectation_delta / g.variance_delta;
            assert!((slope + g.risk_aversion).abs() < 1e-6 * g.risk_aversion);
        }
    }
}
