//! Analytics CLI - sample drivers for the analytics workspace
//!
//! Every subcommand runs one model end to end and prints its results as a
//! text table or, with `--output json`, as a JSON document.
//!
//! # Commands
//!
//! - Optimal execution: `impact-exponent`, `ac-drift`, `ac-frontier`,
//!   `control-greeks`
//! - Special functions and linear algebra: `gamma`, `bessel`, `matrix`
//! - SIMM: `simm-ir-thresholds`, `simm-crq`, `simm-crnq-delta`
//! - Statistics: `sequence-bounds`, `exponential-gap`,
//!   `correlation-backtest`, `kohlrausch`, `soft-heap`
//! - Market data and XVA: `treasury`, `basis-curve`, `exposure`
//! - Order management: `venue`, `reservation`
//!
//! # Configuration
//!
//! `--config analytics.toml`, then `ANALYTICS_LOG_LEVEL`, `ANALYTICS_SEED`,
//! `ANALYTICS_OUTPUT` and `ANALYTICS_THREADS`, then the global flags.
//! `RUST_LOG` overrides the log level when set.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::*;
use config::{build_config, CliArgs as ConfigCliArgs};
use output::RunContext;

/// Quantitative analytics sample drivers
#[derive(Parser)]
#[command(name = "analytics")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Seed of the random drivers
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format (text, json)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Worker threads for parallel exposure metrics
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

impl From<&Cli> for ConfigCliArgs {
    fn from(cli: &Cli) -> Self {
        ConfigCliArgs {
            config_file: cli.config.clone(),
            log_level: cli.log_level.clone(),
            seed: cli.seed,
            output: cli.output.clone(),
            threads: cli.threads,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Principal bid measures across temporary impact exponents
    ImpactExponent(impact_exponent::ImpactExponentArgs),

    /// Discrete Almgren-Chriss trajectory with price drift
    AcDrift(ac_drift::AcDriftArgs),

    /// Efficient frontier of the continuous Almgren-Chriss scheme
    AcFrontier(ac_frontier::AcFrontierArgs),

    /// Control-node and risk-aversion greeks of optimal trajectories
    ControlGreeks(control_greeks::ControlGreeksArgs),

    /// Gamma function estimators, poles and derivatives
    Gamma(gamma::GammaArgs),

    /// Modified Bessel function of the first kind
    Bessel(bessel::BesselArgs),

    /// Matrix inversion and decompositions
    Matrix(matrix::MatrixArgs),

    /// SIMM v2.4 interest rate concentration thresholds
    SimmIrThresholds(simm_ir_thresholds::SimmIrThresholdsArgs),

    /// SIMM v2.1 credit qualifying parameters
    SimmCrq(simm_crq::SimmCrqArgs),

    /// SIMM v2.0 credit non-qualifying delta margin
    SimmCrnqDelta(simm_crnq_delta::SimmCrnqDeltaArgs),

    /// Government bond conventions
    Treasury(treasury::TreasuryArgs),

    /// Tail bounds of unit random sequences
    SequenceBounds(sequence_bounds::SequenceBoundsArgs),

    /// Anderson-Darling gap test of exponential samples
    ExponentialGap(exponential_gap::ExponentialGapArgs),

    /// PIT histogram backtest of a factor correlation
    CorrelationBacktest(correlation_backtest::CorrelationBacktestArgs),

    /// Kohlrausch stretched exponential distribution
    Kohlrausch(kohlrausch::KohlrauschArgs),

    /// Soft heap insert, meld and extract
    SoftHeap(soft_heap::SoftHeapArgs),

    /// CSA overnight plus basis discounting
    BasisCurve(basis_curve::BasisCurveArgs),

    /// Brownian bridge exposure profile
    Exposure(exposure::ExposureArgs),

    /// Post and sweep fees across venues
    Venue(venue::VenueArgs),

    /// Utility indifference bid and ask of a claim
    Reservation(reservation::ReservationArgs),
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&ConfigCliArgs::from(&cli))?;

    init_tracing(config.log_level.as_filter_str());
    debug!(
        log_level = %config.log_level,
        seed = config.seed,
        output = %config.output,
        threads = ?config.threads,
        "configuration loaded"
    );

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let ctx = RunContext {
        output: config.output,
        seed: config.seed,
    };

    match &cli.command {
        Commands::ImpactExponent(args) => impact_exponent::run(args, &ctx),
        Commands::AcDrift(args) => ac_drift::run(args, &ctx),
        Commands::AcFrontier(args) => ac_frontier::run(args, &ctx),
        Commands::ControlGreeks(args) => control_greeks::run(args, &ctx),
        Commands::Gamma(args) => gamma::run(args, &ctx),
        Commands::Bessel(args) => bessel::run(args, &ctx),
        Commands::Matrix(args) => matrix::run(args, &ctx),
        Commands::SimmIrThresholds(args) => simm_ir_thresholds::run(args, &ctx),
        Commands::SimmCrq(args) => simm_crq::run(args, &ctx),
        Commands::SimmCrnqDelta(args) => simm_crnq_delta::run(args, &ctx),
        Commands::Treasury(args) => treasury::run(args, &ctx),
        Commands::SequenceBounds(args) => sequence_bounds::run(args, &ctx),
        Commands::ExponentialGap(args) => exponential_gap::run(args, &ctx),
        Commands::CorrelationBacktest(args) => correlation_backtest::run(args, &ctx),
        Commands::Kohlrausch(args) => kohlrausch::run(args, &ctx),
        Commands::SoftHeap(args) => soft_heap::run(args, &ctx),
        Commands::BasisCurve(args) => basis_curve::run(args, &ctx),
        Commands::Exposure(args) => exposure::run(args, &ctx),
        Commands::Venue(args) => venue::run(args, &ctx),
        Commands::Reservation(args) => reservation::run(args, &ctx),
    }?;

    info!("done");
    Ok(())
}
