//! Correlation backtest of an equity / FX pair
//!
//! The realised cross product of correlated SNP500 and CHF/USD increments is
//! tested against an ensemble of simulated cross products.

use analytics_core::statistics::{
    gap_test, sample_correlation, CohortGrid, Ensemble, GapLossWeight, NormalSampleCohort,
    PitHistogram,
};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

const EQUITY_LABEL: &str = "SNP500-USD";
const FX_LABEL: &str = "CHF/USD";
const ANNUAL_MEANS: [f64; 2] = [0.06, 0.01];
const ANNUAL_VOLATILITIES: [f64; 2] = [0.1, 0.1];

/// Arguments of `correlation-backtest`
#[derive(Args, Debug, Clone)]
pub struct CorrelationBacktestArgs {
    /// Equity / FX correlation
    #[arg(long, default_value_t = 0.5)]
    pub correlation: f64,

    /// Samples in the hypothesis ensemble
    #[arg(long, default_value_t = 26)]
    pub samples: usize,

    /// Increments per factor
    #[arg(long, default_value_t = 390)]
    pub vertices: usize,

    /// Horizon in years
    #[arg(long, default_value_t = 0.25)]
    pub horizon: f64,

    /// Histogram quantile count
    #[arg(long, default_value_t = 20)]
    pub quantiles: usize,

    /// p-value threshold of the test statistic
    #[arg(long, default_value_t = 0.95)]
    pub p_value_threshold: f64,
}

impl Default for CorrelationBacktestArgs {
    fn default() -> Self {
        Self {
            correlation: 0.5,
            samples: 26,
            vertices: 390,
            horizon: 0.25,
            quantiles: 20,
            p_value_threshold: 0.95,
        }
    }
}

/// Result of `correlation-backtest`
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationBacktestReport {
    pub seed: u64,
    pub correlation: f64,
    /// Pearson correlation of the realised increments
    pub realised_correlation: f64,
    pub distance: f64,
    pub histogram: PitHistogram,
}

impl Report for CorrelationBacktestReport {
    fn title(&self) -> String {
        format!("{EQUITY_LABEL} x {FX_LABEL} Correlation Backtest")
    }

    fn print_text(&self) {
        println!("{:<24} {}", "Input correlation:", self.correlation);
        println!("{:<24} {}", "Realised correlation:", fmt_num(self.realised_correlation, 4));
        println!("{:<24} {}", "Anderson-Darling distance:", fmt_num(self.distance, 6));
        println!();
        let h = &self.histogram;
        println!("{:>14} {:>12} {:>12}", "statistic", "cumulative", "incremental");
        for ((s, c), i) in h
            .test_statistics
            .iter()
            .zip(&h.p_value_cumulative)
            .zip(&h.p_value_incremental)
        {
            println!("{:>14} {:>12.4} {:>12.4}", fmt_num(*s, 8), c, i);
        }
        println!();
        println!("{:<24} {}", "Threshold statistic:", fmt_num(h.threshold_test_statistic, 8));
    }
}

fn correlation_matrix(rho: f64) -> Vec<Vec<f64>> {
    vec![vec![1.0, rho], vec![rho, 1.0]]
}

/// Simulates the realised pair and the hypothesis ensemble, then runs the gap test
pub fn compute(args: &CorrelationBacktestArgs, seed: u64) -> Result<CorrelationBacktestReport> {
    if !(-1.0..=1.0).contains(&args.correlation) {
        return Err(CliError::InvalidArgument(format!(
            "correlation must lie in [-1, 1], got {}",
            args.correlation
        )));
    }
    let labels = [EQUITY_LABEL.to_string(), FX_LABEL.to_string()];
    let correlation = correlation_matrix(args.correlation);
    let grid = CohortGrid {
        vertex_count: args.vertices,
        horizon: args.horizon,
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let cohort = |rng: &mut StdRng| {
        NormalSampleCohort::correlated(
            &labels,
            &ANNUAL_MEANS,
            &ANNUAL_VOLATILITIES,
            &correlation,
            grid,
            rng,
        )
    };

    let realised = cohort(&mut rng)?;
    let sample = realised.reduce(EQUITY_LABEL, FX_LABEL)?;
    let realised_correlation = match (realised.path(EQUITY_LABEL), realised.path(FX_LABEL)) {
        (Some(a), Some(b)) => sample_correlation(a, b)?,
        _ => return Err(CliError::InvalidArgument("cohort is missing a factor".to_string())),
    };
    debug!(realised_correlation, "simulated realised cohort");

    let members = (0..args.samples)
        .map(|_| Ok(cohort(&mut rng)?.reduce(EQUITY_LABEL, FX_LABEL)?))
        .collect::<Result<Vec<_>>>()?;
    let ensemble = Ensemble::new(&members)?;

    let outcome = gap_test(&sample, &ensemble, GapLossWeight::AndersonDarling);
    let histogram = outcome.histogram(args.quantiles, args.p_value_threshold)?;

    Ok(CorrelationBacktestReport {
        seed,
        correlation: args.correlation,
        realised_correlation,
        distance: outcome.distance,
        histogram,
    })
}

/// Run the correlation-backtest command
pub fn run(args: &CorrelationBacktestArgs, ctx: &RunContext) -> Result<()> {
    info!(
        correlation = args.correlation,
        samples = args.samples,
        "backtesting correlation"
    );
    emit(&compute(args, ctx.seed)?, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_shape() {
        let report = compute(&CorrelationBacktestArgs::default(), 42).unwrap();
        let h = &report.histogram;
        assert_eq!(h.test_statistics.len(), 21);
        assert!(h.test_statistics.windows(2).all(|w| w[0] <= w[1]));
        assert!((h.p_value_cumulative[20] - 1.0).abs() < 1e-12);
        let total: f64 = h.p_value_incremental.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(h.threshold_test_statistic <= h.test_statistics[20]);
        assert!(report.distance > 0.0);
    }

    #[test]
    fn test_realised_correlation_tracks_input() {
        let report = compute(&CorrelationBacktestArgs::default(), 7).unwrap();
        assert!((report.realised_correlation - 0.5).abs() < 0.2);
        let report = compute(
            &CorrelationBacktestArgs {
                correlation: -0.5,
                ..CorrelationBacktestArgs::default()
            },
            7,
        )
        .unwrap();
        assert!(report.realised_correlation < 0.0);
    }

    #[test]
    fn test_invalid_correlation() {
        let args = CorrelationBacktestArgs {
            correlation: 1.5,
            ..CorrelationBacktestArgs::default()
        };
        assert!(matches!(compute(&args, 1), Err(CliError::InvalidArgument(_))));
    }
}
