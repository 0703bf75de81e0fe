//! Discrete Almgren-Chriss liquidation with a price drift
//!
//! Prints the optimal holdings next to the drift-free optimum so the
//! adjustment `α/(2λσ²)` profile is visible node by node.

use analytics_execution::nonadaptive::{DiscreteAlmgrenChrissDrift, StaticOptimalScheme};
use analytics_execution::optimum::{OptimumDetail, TrajectoryOptimum};
use analytics_execution::risk::MeanVarianceObjective;
use clap::Args;
use serde::Serialize;
use tracing::info;

use super::{almgren_chriss_order, almgren_chriss_parameters};
use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

/// Arguments of `ac-drift`
#[derive(Args, Debug, Clone)]
pub struct AcDriftArgs {
    /// Price drift α per day
    #[arg(long, default_value_t = 0.02)]
    pub drift: f64,

    /// Risk aversion λ
    #[arg(long, default_value_t = 2e-6)]
    pub risk_aversion: f64,

    /// Number of trading intervals
    #[arg(long, default_value_t = 10)]
    pub intervals: usize,
}

/// One trading node
#[derive(Debug, Clone, Serialize)]
pub struct DriftNode {
    pub time: f64,
    pub holdings: f64,
    pub drift_free_holdings: f64,
    pub adjustment: f64,
}

/// Result of `ac-drift`
#[derive(Debug, Clone, Serialize)]
pub struct AcDriftReport {
    pub drift: f64,
    pub risk_aversion: f64,
    pub kappa: f64,
    pub residual_holdings: Option<f64>,
    pub drift_gain: f64,
    pub expected_shortfall: f64,
    pub shortfall_variance: f64,
    pub objective_utility: f64,
    pub drift_free_objective_utility: f64,
    pub nodes: Vec<DriftNode>,
}

impl Report for AcDriftReport {
    fn title(&self) -> String {
        format!(
            "Discrete Almgren-Chriss with Drift (α = {}, λ = {:e})",
            self.drift, self.risk_aversion
        )
    }

    fn print_text(&self) {
        println!("{:<22} {}", "κ:", fmt_num(self.kappa, 6));
        if let Some(residual) = self.residual_holdings {
            println!("{:<22} {}", "Residual holdings:", fmt_num(residual, 2));
        }
        println!("{:<22} {}", "Drift gain:", fmt_num(self.drift_gain, 2));
        println!("{:<22} {}", "E:", fmt_num(self.expected_shortfall, 2));
        println!("{:<22} {}", "V:", fmt_num(self.shortfall_variance, 2));
        println!("{:<22} {}", "E + λV:", fmt_num(self.objective_utility, 2));
        println!("{:<22} {}", "E + λV (no drift):", fmt_num(self.drift_free_objective_utility, 2));
        println!();
        println!("{:>8} {:>16} {:>16} {:>14}", "t", "holdings", "no drift", "adjustment");
        for node in &self.nodes {
            println!(
                "{:>8.3} {:>16.2} {:>16.2} {:>14.2}",
                node.time, node.holdings, node.drift_free_holdings, node.adjustment
            );
        }
    }
}

fn optimum(args: &AcDriftArgs, drift: f64) -> Result<TrajectoryOptimum> {
    let scheme = DiscreteAlmgrenChrissDrift::new(
        almgren_chriss_order(args.intervals)?,
        almgren_chriss_parameters(drift)?,
        MeanVarianceObjective::new(args.risk_aversion)?,
    );
    Ok(scheme.generate()?)
}

/// Generates the drifting and drift-free optima
pub fn compute(args: &AcDriftArgs) -> Result<AcDriftReport> {
    let drifting = optimum(args, args.drift)?;
    let drift_free = optimum(args, 0.0)?;

    let OptimumDetail::DriftAdjusted {
        kappa,
        residual_holdings,
        drift_gain,
        ref holdings_adjustment,
        ..
    } = drifting.detail
    else {
        return Err(CliError::InvalidArgument(
            "discrete scheme returned a foreign optimum".to_string(),
        ));
    };

    let nodes = drifting
        .trajectory
        .time_nodes()
        .iter()
        .zip(drifting.trajectory.holdings())
        .zip(drift_free.trajectory.holdings())
        .zip(holdings_adjustment)
        .map(|(((&time, &holdings), &drift_free_holdings), &adjustment)| DriftNode {
            time,
            holdings,
            drift_free_holdings,
            adjustment,
        })
        .collect();

    Ok(AcDriftReport {
        drift: args.drift,
        risk_aversion: args.risk_aversion,
        kappa,
        residual_holdings,
        drift_gain,
        expected_shortfall: drifting.expected_shortfall,
        shortfall_variance: drifting.shortfall_variance,
        objective_utility: drifting.objective_utility,
        drift_free_objective_utility: drift_free.objective_utility,
        nodes,
    })
}

/// Run the ac-drift command
pub fn run(args: &AcDriftArgs, ctx: &RunContext) -> Result<()> {
    info!(drift = args.drift, intervals = args.intervals, "generating drift trajectory");
    emit(&compute(args)?, ctx)
}
