//! Kohlrausch stretched exponential density, CDF and quantile grids

use analytics_core::statistics::{R1Distribution, StretchedExponential};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::Result;

const TIMES: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 1.0, 2.0, 5.0, 10.0];
const BETAS: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
const P_VALUES: [f64; 9] = [0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40, 0.45];

/// Arguments of `kohlrausch`
#[derive(Args, Debug, Clone)]
pub struct KohlrauschArgs {
    /// Characteristic time τ
    #[arg(long, default_value_t = 1.0)]
    pub tau: f64,
}

/// Values of one β
#[derive(Debug, Clone, Serialize)]
pub struct BetaRow {
    pub beta: f64,
    pub density: Vec<f64>,
    pub cumulative: Vec<f64>,
    pub inverse_cumulative: Vec<f64>,
    pub mean: f64,
    pub variance: f64,
}

/// Result of `kohlrausch`
#[derive(Debug, Clone, Serialize)]
pub struct KohlrauschReport {
    pub tau: f64,
    pub times: Vec<f64>,
    pub p_values: Vec<f64>,
    pub rows: Vec<BetaRow>,
}

fn print_grid(label: &str, header: &[f64], rows: &[BetaRow], pick: impl Fn(&BetaRow) -> &[f64]) {
    println!("{label}:");
    print!("{:>6}", "beta");
    for h in header {
        print!(" {:>12}", h);
    }
    println!();
    for row in rows {
        print!("{:>6.1}", row.beta);
        for v in pick(row) {
            print!(" {:>12}", fmt_num(*v, 8));
        }
        println!();
    }
    println!();
}

impl Report for KohlrauschReport {
    fn title(&self) -> String {
        format!("Kohlrausch Stretched Exponential (tau = {})", self.tau)
    }

    fn print_text(&self) {
        print_grid("Density by t", &self.times, &self.rows, |r| r.density.as_slice());
        print_grid("CDF by t", &self.times, &self.rows, |r| r.cumulative.as_slice());
        print_grid("Quantile by p", &self.p_values, &self.rows, |r| r.inverse_cumulative.as_slice());
        println!("{:>6} {:>16} {:>16}", "beta", "mean", "variance");
        for row in &self.rows {
            println!(
                "{:>6.1} {:>16} {:>16}",
                row.beta,
                fmt_num(row.mean, 6),
                fmt_num(row.variance, 6)
            );
        }
    }
}

fn beta_row(tau: f64, beta: f64) -> Result<BetaRow> {
    let law = StretchedExponential::new(tau, beta)?;
    Ok(BetaRow {
        beta,
        density: TIMES.iter().map(|&t| law.density(t)).collect(),
        cumulative: TIMES
            .iter()
            .map(|&t| law.cumulative(t))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        inverse_cumulative: P_VALUES
            .iter()
            .map(|&p| law.inverse_cumulative(p))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        mean: law.mean(),
        variance: law.variance(),
    })
}

/// Evaluates the grids for every β
pub fn compute(args: &KohlrauschArgs) -> Result<KohlrauschReport> {
    let rows = BETAS
        .iter()
        .map(|&beta| beta_row(args.tau, beta))
        .collect::<Result<Vec<_>>>()?;
    Ok(KohlrauschReport {
        tau: args.tau,
        times: TIMES.to_vec(),
        p_values: P_VALUES.to_vec(),
        rows,
    })
}

/// Run the kohlrausch command
pub fn run(args: &KohlrauschArgs, ctx: &RunContext) -> Result<()> {
    info!(tau = args.tau, "evaluating stretched exponential grids");
    emit(&compute(args)?, ctx)
}
