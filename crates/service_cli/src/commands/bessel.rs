//! Modified Bessel function of the first kind over an order and argument grid

use analytics_core::math::special::{gamma, ModifiedBesselFirstKind};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

const SERIES_TERMS: i32 = 60;

/// Arguments of `bessel`
#[derive(Args, Debug, Clone)]
pub struct BesselArgs {
    /// Orders α
    #[arg(long, value_delimiter = ',', default_values_t = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0])]
    pub orders: Vec<f64>,

    /// Arguments z > 0
    #[arg(long, value_delimiter = ',', default_values_t = [0.5, 1.0, 2.0, 5.0, 10.0])]
    pub arguments: Vec<f64>,
}

/// `I_α(z)` on one order
#[derive(Debug, Clone, Serialize)]
pub struct BesselRow {
    pub order: f64,
    pub values: Vec<f64>,
    /// Largest relative gap to the power series
    pub max_series_error: f64,
}

/// Result of `bessel`
#[derive(Debug, Clone, Serialize)]
pub struct BesselReport {
    pub arguments: Vec<f64>,
    pub rows: Vec<BesselRow>,
}

impl Report for BesselReport {
    fn title(&self) -> String {
        "Modified Bessel Function I_α(z)".to_string()
    }

    fn print_text(&self) {
        print!("{:>6}", "α \\ z");
        for z in &self.arguments {
            print!(" {:>16}", z);
        }
        println!(" {:>12}", "series err");
        for row in &self.rows {
            print!("{:>6}", row.order);
            for v in &row.values {
                print!(" {:>16}", fmt_num(*v, 8));
            }
            println!(" {:>12}", fmt_num(row.max_series_error, 2));
        }
    }
}

/// `Σ (z/2)^{2k+α} / (k! Γ(k+α+1))`, skipping terms at poles of Γ
fn power_series(alpha: f64, z: f64) -> f64 {
    (0..SERIES_TERMS)
        .filter_map(|k| {
            let k = f64::from(k);
            let denominator = gamma(k + 1.0).ok()? * gamma(k + alpha + 1.0).ok()?;
            Some((0.5 * z).powf(2.0 * k + alpha) / denominator)
        })
        .sum()
}

/// Evaluates the grid and its power series check
pub fn compute(args: &BesselArgs) -> Result<BesselReport> {
    if args.orders.is_empty() || args.arguments.is_empty() {
        return Err(CliError::InvalidArgument(
            "at least one order and one argument required".to_string(),
        ));
    }
    let bessel = ModifiedBesselFirstKind::new()?;
    let rows = args
        .orders
        .iter()
        .map(|&alpha| {
            let values = args
                .arguments
                .iter()
                .map(|&z| bessel.evaluate(alpha, z))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let max_series_error = args
                .arguments
                .iter()
                .zip(&values)
                .map(|(&z, &v)| ((v - power_series(alpha, z)) / v).abs())
                .fold(0.0_f64, f64::max);
            Ok(BesselRow {
                order: alpha,
                values,
                max_series_error,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BesselReport {
        arguments: args.arguments.clone(),
        rows,
    })
}

/// Run the bessel command
pub fn run(args: &BesselArgs, ctx: &RunContext) -> Result<()> {
    info!(orders = args.orders.len(), arguments = args.arguments.len(), "evaluating Bessel grid");
    emit(&compute(args)?, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_order_closed_form() {
        // I_{1/2}(z) = √(2/(πz)) sinh z
        let report = compute(&BesselArgs {
            orders: vec![0.5],
            arguments: vec![1.0, 3.0],
        })
        .unwrap();
        for (z, v) in report.arguments.iter().zip(&report.rows[0].values) {
            let exact = (2.0 / (std::f64::consts::PI * z)).sqrt() * z.sinh();
            assert!((v - exact).abs() < 1e-8 * exact, "z = {z}");
        }
    }

    #[test]
    fn test_grid_matches_series() {
        let report = compute(&BesselArgs {
            orders: vec![0.0, 1.5, 2.3],
            arguments: vec![0.7, 2.5, 4.0],
        })
        .unwrap();
        assert!(report.rows.iter().all(|r| r.max_series_error < 1e-7));
    }

    #[test]
    fn test_rejects_non_positive_argument() {
        let result = compute(&BesselArgs {
            orders: vec![1.0],
            arguments: vec![0.0],
        });
        assert!(matches!(result, Err(CliError::SpecialFunction(_))));
    }
}
