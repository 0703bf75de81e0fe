//! Exposure profile over Brownian-bridged random-walk pillars
//!
//! Each path draws annual pillar exposures as a random walk from zero and
//! fills the monthly dates in between with a Pykhtin bridge.

use std::collections::BTreeMap;

use analytics_core::types::{Date, Tenor};
use analytics_xva::exposure::{ExposureProfile, LocalVolatility, PykhtinBrownianBridgePath};
use clap::{Args, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

const DAYS_PER_YEAR: f64 = 365.25;

/// Local volatility shape between pillars
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VolatilityShape {
    /// Constant σ
    Flat,
    /// σ scaled by the interpolated exposure
    Proportional,
}

/// Arguments of `exposure`
#[derive(Args, Debug, Clone)]
pub struct ExposureArgs {
    /// Scenario paths
    #[arg(long, default_value_t = 1000)]
    pub paths: usize,

    /// Annual pillars after the epoch
    #[arg(long, default_value_t = 5)]
    pub years: u32,

    /// Annual volatility of the pillar random walk
    #[arg(long, default_value_t = 1.0)]
    pub pillar_volatility: f64,

    /// Local volatility of the bridge
    #[arg(long, default_value_t = 0.5)]
    pub local_volatility: f64,

    /// Local volatility shape
    #[arg(long, value_enum, default_value_t = VolatilityShape::Flat)]
    pub shape: VolatilityShape,

    /// PFE confidence level
    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,

    /// Simulation epoch (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-02")]
    pub epoch: String,
}

impl Default for ExposureArgs {
    fn default() -> Self {
        Self {
            paths: 1000,
            years: 5,
            pillar_volatility: 1.0,
            local_volatility: 0.5,
            shape: VolatilityShape::Flat,
            confidence: 0.95,
            epoch: "2024-01-02".to_string(),
        }
    }
}

/// Result of `exposure`
#[derive(Debug, Clone, Serialize)]
pub struct ExposureReport {
    pub seed: u64,
    pub paths: usize,
    pub local_volatility: LocalVolatility,
    pub dates: Vec<Date>,
    pub profile: ExposureProfile,
}

impl Report for ExposureReport {
    fn title(&self) -> String {
        format!("Bridged Exposure Profile ({} paths)", self.paths)
    }

    fn print_text(&self) {
        let p = &self.profile;
        println!(
            "{:>11} {:>7} {:>10} {:>10} {:>10}",
            "date", "t", "EE", "ENE", "PFE"
        );
        for (i, date) in self.dates.iter().enumerate() {
            println!(
                "{:>11} {:>7.3} {:>10} {:>10} {:>10}",
                date.to_string(),
                p.time_grid[i],
                fmt_num(p.expected_exposure[i], 4),
                fmt_num(p.expected_negative_exposure[i], 4),
                fmt_num(p.potential_future_exposure[i], 4)
            );
        }
        println!();
        println!("{:<16} {}", "EPE:", fmt_num(p.expected_positive_exposure, 4));
        println!("{:<16} {}", "EEPE (1Y):", fmt_num(p.effective_epe, 4));
        println!("{:<16} {} at {:.0}%", "Peak PFE:", fmt_num(p.peak_pfe, 4), p.confidence * 100.0);
    }
}

struct Schedule {
    pillars: Vec<Date>,
    wander_dates: Vec<Date>,
    local_volatility: BTreeMap<Date, LocalVolatility>,
}

fn schedule(epoch: Date, years: u32, local_volatility: LocalVolatility) -> Result<Schedule> {
    let pillars = (0..=years)
        .map(|y| epoch.add_tenor(Tenor::Years(y)))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let wander_dates = (0..=12 * years)
        .map(|m| epoch.add_tenor(Tenor::Months(m)))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Schedule {
        local_volatility: pillars.iter().skip(1).map(|&d| (d, local_volatility)).collect(),
        pillars,
        wander_dates,
    })
}

fn simulate_path(schedule: &Schedule, pillar_volatility: f64, seed: u64) -> Result<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut level = 0.0;
    let mut previous = schedule.pillars[0];
    let mut pillars = BTreeMap::new();
    for &date in &schedule.pillars {
        let dt = (date - previous) as f64 / DAYS_PER_YEAR;
        let z: f64 = StandardNormal.sample(&mut rng);
        level += pillar_volatility * dt.sqrt() * z;
        pillars.insert(date, level);
        previous = date;
    }
    let path = PykhtinBrownianBridgePath::new(&pillars, &schedule.local_volatility)?;
    let wander: BTreeMap<Date, f64> = schedule
        .wander_dates
        .iter()
        .map(|&d| (d, StandardNormal.sample(&mut rng)))
        .collect();
    Ok(path.dense_exposure(&wander)?.into_values().collect())
}

/// Simulates the paths and computes the exposure metrics
pub fn compute(args: &ExposureArgs, seed: u64) -> Result<ExposureReport> {
    if args.paths == 0 || args.years == 0 {
        return Err(CliError::InvalidArgument(
            "paths and years must be positive".to_string(),
        ));
    }
    if !(args.confidence > 0.0 && args.confidence < 1.0) {
        return Err(CliError::InvalidArgument(format!(
            "confidence must lie in (0, 1), got {}",
            args.confidence
        )));
    }
    let epoch = Date::parse(&args.epoch)?;
    let local_volatility = match args.shape {
        VolatilityShape::Flat => LocalVolatility::Flat(args.local_volatility),
        VolatilityShape::Proportional => LocalVolatility::Proportional(args.local_volatility),
    };
    let schedule = schedule(epoch, args.years, local_volatility)?;

    let values = (0..args.paths)
        .into_par_iter()
        .map(|i| simulate_path(&schedule, args.pillar_volatility, seed.wrapping_add(i as u64)))
        .collect::<Result<Vec<_>>>()?;

    let mut dates = schedule.wander_dates.clone();
    dates.extend(&schedule.pillars);
    dates.sort_unstable();
    dates.dedup();
    let time_grid: Vec<f64> = dates
        .iter()
        .map(|&d| (d - epoch) as f64 / DAYS_PER_YEAR)
        .collect();
    debug!(dates = dates.len(), paths = values.len(), "simulated exposure paths");

    let profile = ExposureProfile::compute(&values, &time_grid, args.confidence)?;
    Ok(ExposureReport {
        seed,
        paths: args.paths,
        local_volatility,
        dates,
        profile,
    })
}

/// Run the exposure command
pub fn run(args: &ExposureArgs, ctx: &RunContext) -> Result<()> {
    info!(
        paths = args.paths,
        years = args.years,
        shape = ?args.shape,
        "simulating bridged exposure"
    );
    emit(&compute(args, ctx.seed)?, ctx)
}
