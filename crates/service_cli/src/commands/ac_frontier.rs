//! Efficient frontier of the continuous Almgren-Chriss liquidation

use analytics_execution::nonadaptive::ContinuousAlmgrenChriss;
use analytics_execution::optimum::{EfficientFrontier, FrontierPoint};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use super::{almgren_chriss_order, almgren_chriss_parameters};
use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

/// Arguments of `ac-frontier`
#[derive(Args, Debug, Clone)]
pub struct AcFrontierArgs {
    /// Smallest positive risk aversion of the sweep
    #[arg(long, default_value_t = 1e-8)]
    pub min_risk_aversion: f64,

    /// Largest risk aversion of the sweep
    #[arg(long, default_value_t = 1e-4)]
    pub max_risk_aversion: f64,

    /// Log-spaced points between the bounds, plus λ = 0
    #[arg(long, default_value_t = 9)]
    pub points: usize,

    /// Number of trading intervals
    #[arg(long, default_value_t = 20)]
    pub intervals: usize,
}

/// Result of `ac-frontier`
#[derive(Debug, Clone, Serialize)]
pub struct AcFrontierReport {
    pub points: Vec<FrontierPoint>,
    pub monotone: bool,
}

impl Report for AcFrontierReport {
    fn title(&self) -> String {
        "Continuous Almgren-Chriss Efficient Frontier".to_string()
    }

    fn print_text(&self) {
        println!("{:>12} {:>18} {:>16} {:>14}", "λ", "V", "E", "√V");
        for p in &self.points {
            println!(
                "{:>12} {:>18} {:>16} {:>14}",
                fmt_num(p.risk_aversion, 2),
                fmt_num(p.variance, 0),
                fmt_num(p.expectation, 0),
                fmt_num(p.variance.sqrt(), 0)
            );
        }
        println!();
        println!("Monotone: {}", if self.monotone { "yes" } else { "no" });
    }
}

fn risk_aversion_grid(args: &AcFrontierArgs) -> Result<Vec<f64>> {
    if !(args.min_risk_aversion > 0.0 && args.max_risk_aversion > args.min_risk_aversion) {
        return Err(CliError::InvalidArgument(format!(
            "risk aversion bounds must satisfy 0 < min < max, got [{}, {}]",
            args.min_risk_aversion, args.max_risk_aversion
        )));
    }
    if args.points < 2 {
        return Err(CliError::InvalidArgument(
            "at least two frontier points required".to_string(),
        ));
    }
    let (lo, hi) = (args.min_risk_aversion.ln(), args.max_risk_aversion.ln());
    let step = (hi - lo) / (args.points - 1) as f64;
    Ok(std::iter::once(0.0)
        .chain((0..args.points).map(|i| (lo + step * i as f64).exp()))
        .collect())
}

/// Traces the frontier
pub fn compute(args: &AcFrontierArgs) -> Result<AcFrontierReport> {
    let order = almgren_chriss_order(args.intervals)?;
    let params = almgren_chriss_parameters(0.0)?;
    let frontier = EfficientFrontier::trace(&risk_aversion_grid(args)?, |objective| {
        Ok(ContinuousAlmgrenChriss::new(order, params.clone(), objective))
    })?;
    let monotone = frontier.is_monotone();
    if !monotone {
        warn!("efficient frontier is not monotone");
    }
    Ok(AcFrontierReport {
        points: frontier.points().to_vec(),
        monotone,
    })
}

/// Run the ac-frontier command
pub fn run(args: &AcFrontierArgs, ctx: &RunContext) -> Result<()> {
    info!(points = args.points, "tracing efficient frontier");
    emit(&compute(args)?, ctx)
}
