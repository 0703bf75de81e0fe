//! Gamma function estimators side by side
//!
//! Compares the Lanczos approximation, the Euler integral quadrature and
//! Nemes' estimate, and lists Γ-derivatives and pole residues.

use analytics_core::math::special::{
    gamma, ln_gamma, nemes_gamma, pole_residue, EulerIntegralEstimator,
};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

const ARGUMENTS: [f64; 12] = [-1.5, -0.5, 0.25, 0.5, 1.0, 1.5, 2.0, 2.5, 3.5, 5.0, 8.0, 10.0];

/// Arguments of `gamma`
#[derive(Args, Debug, Clone)]
pub struct GammaArgs {
    /// Highest derivative order of the Euler integral
    #[arg(long, default_value_t = 2)]
    pub max_derivative: u32,

    /// Poles listed, s = 0, -1, ..., -max_pole
    #[arg(long, default_value_t = 5)]
    pub max_pole: u32,

    /// Gauss-Laguerre order of the Euler integral
    #[arg(long, default_value_t = EulerIntegralEstimator::DEFAULT_ORDER)]
    pub quadrature_order: usize,
}

/// Estimates at one argument
#[derive(Debug, Clone, Serialize)]
pub struct GammaRow {
    pub s: f64,
    pub lanczos: f64,
    pub euler_integral: f64,
    /// `None` where the estimator is undefined (s ≤ 0)
    pub nemes: Option<f64>,
    pub ln_gamma: Option<f64>,
    /// Γ', Γ'', ... up to the requested order
    pub derivatives: Option<Vec<f64>>,
}

/// Residue at a pole
#[derive(Debug, Clone, Serialize)]
pub struct PoleRow {
    pub pole: f64,
    pub residue: f64,
}

/// Result of `gamma`
#[derive(Debug, Clone, Serialize)]
pub struct GammaReport {
    pub rows: Vec<GammaRow>,
    pub poles: Vec<PoleRow>,
}

impl Report for GammaReport {
    fn title(&self) -> String {
        "Gamma Function Estimators".to_string()
    }

    fn print_text(&self) {
        println!(
            "{:>6} {:>18} {:>18} {:>18} {:>14}  derivatives",
            "s", "Lanczos", "Euler integral", "Nemes", "ln Γ"
        );
        let optional = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| fmt_num(v, 10));
        for row in &self.rows {
            let derivatives = row.derivatives.as_ref().map_or_else(
                || "-".to_string(),
                |d| d.iter().map(|v| fmt_num(*v, 8)).collect::<Vec<_>>().join(" "),
            );
            println!(
                "{:>6} {:>18} {:>18} {:>18} {:>14}  {}",
                row.s,
                fmt_num(row.lanczos, 10),
                fmt_num(row.euler_integral, 10),
                optional(row.nemes),
                optional(row.ln_gamma),
                derivatives
            );
        }
        println!();
        println!("{:>6} {:>14}", "pole", "residue");
        for pole in &self.poles {
            println!("{:>6} {:>14}", pole.pole, fmt_num(pole.residue, 8));
        }
    }
}

/// Evaluates every estimator on the argument grid
pub fn compute(args: &GammaArgs) -> Result<GammaReport> {
    if args.max_derivative == 0 {
        return Err(CliError::InvalidArgument(
            "max derivative order must be at least 1".to_string(),
        ));
    }
    let euler = EulerIntegralEstimator::new(args.quadrature_order)?;

    let rows = ARGUMENTS
        .iter()
        .map(|&s| {
            let derivatives = if s > 0.0 {
                Some(
                    (1..=args.max_derivative)
                        .map(|n| euler.derivative(s, n))
                        .collect::<std::result::Result<Vec<_>, _>>()?,
                )
            } else {
                None
            };
            let row = GammaRow {
                s,
                lanczos: gamma(s)?,
                euler_integral: euler.evaluate(s)?,
                nemes: nemes_gamma(s).ok(),
                ln_gamma: ln_gamma(s).ok(),
                derivatives,
            };
            debug!(s, lanczos = row.lanczos, euler = row.euler_integral, "gamma row");
            Ok(row)
        })
        .collect::<Result<Vec<_>>>()?;

    let poles = (0..=args.max_pole)
        .map(|n| PoleRow {
            pole: -f64::from(n),
            residue: pole_residue(n),
        })
        .collect();

    Ok(GammaReport { rows, poles })
}

/// Run the gamma command
pub fn run(args: &GammaArgs, ctx: &RunContext) -> Result<()> {
    info!(order = args.quadrature_order, "evaluating gamma estimators");
    emit(&compute(args)?, ctx)
}
