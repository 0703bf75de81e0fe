//! Concentration bounds on uniform unit sequences
//!
//! Two grids are printed: one at the population mean `p = 1/2` and one at
//! the empirical mean of the drawn sequence.

use analytics_core::statistics::{TailBounds, Uniform, UnitSequence};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

/// Arguments of `sequence-bounds`
#[derive(Args, Debug, Clone)]
pub struct SequenceBoundsArgs {
    /// Sequence sizes of the population-mean grid
    #[arg(long, value_delimiter = ',', default_values_t = [10usize, 20, 50, 100, 250])]
    pub population_sizes: Vec<usize>,

    /// Sequence sizes of the empirical-mean grid
    #[arg(long, value_delimiter = ',', default_values_t = [100usize, 200, 300, 500, 999])]
    pub empirical_sizes: Vec<usize>,

    /// Tolerances t in P(S/n >= p + t)
    #[arg(long, value_delimiter = ',', default_values_t = [0.01, 0.03, 0.05, 0.07, 0.10])]
    pub tolerances: Vec<f64>,
}

impl Default for SequenceBoundsArgs {
    fn default() -> Self {
        Self {
            population_sizes: vec![10, 20, 50, 100, 250],
            empirical_sizes: vec![100, 200, 300, 500, 999],
            tolerances: vec![0.01, 0.03, 0.05, 0.07, 0.10],
        }
    }
}

/// Bounds of one (size, tolerance) pair
#[derive(Debug, Clone, Serialize)]
pub struct BoundRow {
    pub size: usize,
    pub mean: f64,
    pub tolerance: f64,
    pub chernoff_binomial: f64,
    pub chernoff_poisson: f64,
    pub karp_hagerup_rub: TailBounds,
}

/// Result of `sequence-bounds`
#[derive(Debug, Clone, Serialize)]
pub struct SequenceBoundsReport {
    pub seed: u64,
    pub population: Vec<BoundRow>,
    pub empirical: Vec<BoundRow>,
}

fn print_rows(rows: &[BoundRow]) {
    println!(
        "{:>5} {:>8} {:>6} {:>12} {:>12} {:>12} {:>12}",
        "n", "p", "t", "binomial", "poisson", "KHR upper", "KHR lower"
    );
    for r in rows {
        println!(
            "{:>5} {:>8.4} {:>6.2} {:>12} {:>12} {:>12} {:>12}",
            r.size,
            r.mean,
            r.tolerance,
            fmt_num(r.chernoff_binomial, 6),
            fmt_num(r.chernoff_poisson, 6),
            fmt_num(r.karp_hagerup_rub.upper, 6),
            fmt_num(r.karp_hagerup_rub.lower, 6)
        );
    }
}

impl Report for SequenceBoundsReport {
    fn title(&self) -> String {
        format!("Unit Sequence Tail Bounds (seed {})", self.seed)
    }

    fn print_text(&self) {
        println!("Population mean:");
        print_rows(&self.population);
        println!();
        println!("Empirical mean:");
        print_rows(&self.empirical);
    }
}

fn grid(
    sizes: &[usize],
    tolerances: &[f64],
    use_population: bool,
    rng: &mut StdRng,
) -> Result<Vec<BoundRow>> {
    let uniform = Uniform::standard();
    let mut rows = Vec::with_capacity(sizes.len() * tolerances.len());
    for &size in sizes {
        let sequence = UnitSequence::generate(&uniform, size, use_population, rng)?;
        debug!(size, mean = sequence.mean(), use_population, "drew unit sequence");
        for &tolerance in tolerances {
            rows.push(BoundRow {
                size,
                mean: sequence.mean(),
                tolerance,
                chernoff_binomial: sequence.chernoff_binomial_upper_bound(tolerance)?,
                chernoff_poisson: sequence.chernoff_poisson_upper_bound(tolerance)?,
                karp_hagerup_rub: sequence.karp_hagerup_rub_bounds(tolerance)?,
            });
        }
    }
    Ok(rows)
}

/// Draws the sequences and evaluates every bound
pub fn compute(args: &SequenceBoundsArgs, seed: u64) -> Result<SequenceBoundsReport> {
    if args.tolerances.is_empty() {
        return Err(CliError::InvalidArgument("at least one tolerance is required".to_string()));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(SequenceBoundsReport {
        seed,
        population: grid(&args.population_sizes, &args.tolerances, true, &mut rng)?,
        empirical: grid(&args.empirical_sizes, &args.tolerances, false, &mut rng)?,
    })
}

/// Run the sequence-bounds command
pub fn run(args: &SequenceBoundsArgs, ctx: &RunContext) -> Result<()> {
    info!(seed = ctx.seed, "evaluating unit sequence bounds");
    emit(&compute(args, ctx.seed)?, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_shape() {
        let report = compute(&SequenceBoundsArgs::default(), 42).unwrap();
        assert_eq!(report.population.len(), 25);
        assert_eq!(report.empirical.len(), 25);
        assert!(report.population.iter().all(|r| r.mean == 0.5));
        assert!(report.empirical.iter().all(|r| (r.mean - 0.5).abs() < 0.1));
    }

    #[test]
    fn test_bounds_are_probabilities_and_ordered() {
        let report = compute(&SequenceBoundsArgs::default(), 7).unwrap();
        for r in report.population.iter().chain(&report.empirical) {
            for b in [r.chernoff_binomial, r.chernoff_poisson, r.karp_hagerup_rub.upper] {
                assert!((0.0..=1.0).contains(&b));
            }
            assert!(r.chernoff_binomial <= r.chernoff_poisson + 1e-12);
        }
    }

    #[test]
    fn test_larger_tolerance_tightens_bound() {
        let report = compute(&SequenceBoundsArgs::default(), 1).unwrap();
        for block in report.population.chunks(5) {
            for pair in block.windows(2) {
                assert!(pair[1].chernoff_binomial < pair[0].chernoff_binomial);
            }
        }
    }

    #[test]
    fn test_zero_size_fails() {
        let args = SequenceBoundsArgs {
            population_sizes: vec![0],
            ..SequenceBoundsArgs::default()
        };
        assert!(matches!(compute(&args, 1), Err(CliError::Distribution(_))));
    }
}
