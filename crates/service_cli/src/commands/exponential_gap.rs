//! Anderson-Darling gap scan of an exponential sample across hypothesis rates
//!
//! A sample drawn at `sample_lambda` is compared with ensembles drawn at each
//! hypothesis rate. The p-value ranks the sample distance among the distances
//! of fresh samples drawn under the hypothesis.

use analytics_core::statistics::{
    empirical_p_value, gap_test, Ensemble, Exponential, GapLossWeight, R1Distribution, Sample,
};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

const MAX_NULL_SAMPLES: usize = 200;

/// Arguments of `exponential-gap`
#[derive(Args, Debug, Clone)]
pub struct ExponentialGapArgs {
    /// Draws per sample
    #[arg(long, default_value_t = 2000)]
    pub draws: usize,

    /// Samples pooled into each hypothesis ensemble
    #[arg(long, default_value_t = 600)]
    pub samples: usize,

    /// Rate of the tested sample
    #[arg(long, default_value_t = 1.0)]
    pub sample_lambda: f64,

    /// Smallest hypothesis rate
    #[arg(long, default_value_t = 0.2)]
    pub min_lambda: f64,

    /// Largest hypothesis rate
    #[arg(long, default_value_t = 2.5)]
    pub max_lambda: f64,

    /// Hypothesis rate step
    #[arg(long, default_value_t = 0.1)]
    pub step: f64,
}

/// Distance against one hypothesis
#[derive(Debug, Clone, Serialize)]
pub struct HypothesisRow {
    pub lambda: f64,
    pub distance: f64,
    pub p_value: f64,
}

/// Result of `exponential-gap`
#[derive(Debug, Clone, Serialize)]
pub struct ExponentialGapReport {
    pub seed: u64,
    pub sample_lambda: f64,
    pub sample_mean: f64,
    pub weight: GapLossWeight,
    pub hypotheses: Vec<HypothesisRow>,
    /// Hypothesis with the smallest distance
    pub best_lambda: f64,
}

impl Report for ExponentialGapReport {
    fn title(&self) -> String {
        format!("Exponential Gap Discriminant ({:?})", self.weight)
    }

    fn print_text(&self) {
        println!("{:<16} {}", "Sample lambda:", self.sample_lambda);
        println!("{:<16} {}", "Sample mean:", fmt_num(self.sample_mean, 6));
        println!();
        println!("{:>8} {:>14} {:>10}", "lambda", "distance", "p-value");
        for h in &self.hypotheses {
            println!(
                "{:>8.2} {:>14} {:>10.4}",
                h.lambda,
                fmt_num(h.distance, 8),
                h.p_value
            );
        }
        println!();
        println!("{:<16} {:.2}", "Closest lambda:", self.best_lambda);
    }
}

fn hypothesis_grid(args: &ExponentialGapArgs) -> Result<Vec<f64>> {
    if !(args.min_lambda > 0.0 && args.max_lambda >= args.min_lambda && args.step > 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "invalid hypothesis grid [{}, {}] step {}",
            args.min_lambda, args.max_lambda, args.step
        )));
    }
    let count = ((args.max_lambda - args.min_lambda) / args.step + 1e-9).floor() as usize + 1;
    Ok((0..count)
        .map(|i| args.min_lambda + i as f64 * args.step)
        .collect())
}

fn draw_sample(law: &Exponential, draws: usize, rng: &mut StdRng) -> Result<Sample> {
    let values = (0..draws)
        .map(|_| law.random(rng))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Sample::new(values)?)
}

fn scan(
    sample: &Sample,
    lambda: f64,
    args: &ExponentialGapArgs,
    seed: u64,
) -> Result<HypothesisRow> {
    let law = Exponential::new(lambda)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let members = (0..args.samples)
        .map(|_| draw_sample(&law, args.draws, &mut rng))
        .collect::<Result<Vec<_>>>()?;
    let ensemble = Ensemble::new(&members)?;
    let weight = GapLossWeight::AndersonDarling;

    let distance = gap_test(sample, &ensemble, weight).distance;
    let null = (0..args.samples.min(MAX_NULL_SAMPLES))
        .map(|_| Ok(gap_test(&draw_sample(&law, args.draws, &mut rng)?, &ensemble, weight).distance))
        .collect::<Result<Vec<_>>>()?;
    let p_value = empirical_p_value(distance, &null)?;
    debug!(lambda, distance, p_value, "scanned hypothesis");
    Ok(HypothesisRow {
        lambda,
        distance,
        p_value,
    })
}

/// Draws the sample and scans the hypothesis grid
pub fn compute(args: &ExponentialGapArgs, seed: u64) -> Result<ExponentialGapReport> {
    if args.draws == 0 || args.samples == 0 {
        return Err(CliError::InvalidArgument(
            "draws and samples must be positive".to_string(),
        ));
    }
    let lambdas = hypothesis_grid(args)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let sample = draw_sample(&Exponential::new(args.sample_lambda)?, args.draws, &mut rng)?;

    let hypotheses = lambdas
        .par_iter()
        .enumerate()
        .map(|(i, &lambda)| scan(&sample, lambda, args, seed.wrapping_add(i as u64 + 1)))
        .collect::<Result<Vec<_>>>()?;

    let best_lambda = hypotheses
        .iter()
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
        .map(|h| h.lambda)
        .unwrap_or(args.sample_lambda);

    Ok(ExponentialGapReport {
        seed,
        sample_lambda: args.sample_lambda,
        sample_mean: sample.mean(),
        weight: GapLossWeight::AndersonDarling,
        hypotheses,
        best_lambda,
    })
}

/// Run the exponential-gap command
pub fn run(args: &ExponentialGapArgs, ctx: &RunContext) -> Result<()> {
    info!(
        draws = args.draws,
        samples = args.samples,
        sample_lambda = args.sample_lambda,
        "scanning exponential hypotheses"
    );
    emit(&compute(args, ctx.seed)?, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_args() -> ExponentialGapArgs {
        ExponentialGapArgs {
            draws: 400,
            samples: 40,
            sample_lambda: 1.0,
            min_lambda: 0.5,
            max_lambda: 2.0,
            step: 0.5,
        }
    }

    #[test]
    fn test_grid_includes_endpoints() {
        let grid = hypothesis_grid(&ExponentialGapArgs {
            min_lambda: 0.2,
            max_lambda: 2.5,
            step: 0.1,
            ..small_args()
        })
        .unwrap();
        assert_eq!(grid.len(), 24);
        assert!((grid[23] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_true_rate_is_closest() {
        let report = compute(&small_args(), 42).unwrap();
        assert_eq!(report.hypotheses.len(), 4);
        assert_eq!(report.best_lambda, 1.0);
        let matched = &report.hypotheses[1];
        for (i, h) in report.hypotheses.iter().enumerate() {
            if i != 1 {
                assert!(h.p_value <= matched.p_value);
            }
        }
        assert_eq!(report.hypotheses[3].p_value, 0.0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let a = compute(&small_args(), 9).unwrap();
        let b = compute(&small_args(), 9).unwrap();
        let da: Vec<f64> = a.hypotheses.iter().map(|h| h.distance).collect();
        let db: Vec<f64> = b.hypotheses.iter().map(|h| h.distance).collect();
        assert_eq!(da, db);
    }

    #[test]
    fn test_invalid_grid() {
        let args = ExponentialGapArgs {
            step: 0.0,
            ..small_args()
        };
        assert!(matches!(compute(&args, 1), Err(CliError::InvalidArgument(_))));
    }
}
