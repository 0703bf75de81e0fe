//! Principal bid measures across temporary impact exponents
//!
//! A dealer buys 100,000 shares at a discount and liquidates them along the
//! power-impact optimum. Each row shows the profit measures for one
//! exponent `k` of the temporary impact `η vᵏ`.

use analytics_execution::dynamics::{ArithmeticPriceDynamics, PriceEvolutionParameters};
use analytics_execution::impact::{MarketObservables, PriceMarketImpact};
use analytics_execution::nonadaptive::ContinuousPowerImpact;
use analytics_execution::principal::Almgren2003Estimator;
use analytics_execution::risk::MeanVarianceObjective;
use analytics_execution::strategy::OrderSpecification;
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::Result;

const EXPONENTS: [f64; 21] = [
    0.20, 0.25, 0.30, 0.35, 0.40, 0.45, 0.50, 0.55, 0.60, 0.65, 0.70, 0.75, 0.80, 0.85, 0.90,
    0.95, 1.00, 1.10, 1.20, 1.35, 1.50,
];

/// Arguments of `impact-exponent`
#[derive(Args, Debug, Clone)]
pub struct ImpactExponentArgs {
    /// Principal discount per share
    #[arg(long, default_value_t = 0.15)]
    pub discount: f64,

    /// Risk aversion λ of the liquidation
    #[arg(long, default_value_t = 1e-6)]
    pub risk_aversion: f64,

    /// Shares bought
    #[arg(long, default_value_t = 100_000.0)]
    pub shares: f64,

    /// Liquidation horizon in days
    #[arg(long, default_value_t = 5.0)]
    pub horizon: f64,
}

/// Measures for one exponent
#[derive(Debug, Clone, Serialize)]
pub struct ExponentRow {
    pub exponent: f64,
    pub breakeven_discount: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub horizon_mean: f64,
    pub horizon_std_dev: f64,
    pub information_ratio: f64,
    /// `None` when the discount does not cover permanent impact
    pub optimal_information_ratio: Option<f64>,
    pub optimal_horizon: Option<f64>,
}

/// Result of `impact-exponent`
#[derive(Debug, Clone, Serialize)]
pub struct ImpactExponentReport {
    pub discount: f64,
    pub rows: Vec<ExponentRow>,
}

impl Report for ImpactExponentReport {
    fn title(&self) -> String {
        format!("Principal Bid vs Impact Exponent (discount {})", self.discount)
    }

    fn print_text(&self) {
        println!(
            "{:>6} {:>10} {:>12} {:>12} {:>12} {:>12} {:>10} {:>10} {:>10}",
            "k", "breakeven", "mean", "std", "h-mean", "h-std", "IR", "IR*", "T*"
        );
        for row in &self.rows {
            let optional = |v: Option<f64>, digits| v.map_or_else(|| "-".to_string(), |v| fmt_num(v, digits));
            println!(
                "{:>6.2} {:>10} {:>12} {:>12} {:>12} {:>12} {:>10} {:>10} {:>10}",
                row.exponent,
                fmt_num(row.breakeven_discount, 4),
                fmt_num(row.mean, 0),
                fmt_num(row.std_dev, 0),
                fmt_num(row.horizon_mean, 0),
                fmt_num(row.horizon_std_dev, 0),
                fmt_num(row.information_ratio, 4),
                optional(row.optimal_information_ratio, 4),
                optional(row.optimal_horizon, 3),
            );
        }
    }
}

fn estimator(args: &ImpactExponentArgs, exponent: f64) -> Result<Almgren2003Estimator> {
    let observables = MarketObservables {
        price: 50.0,
        daily_volume: 1_000_000.0,
        bid_ask_spread: 0.0,
        execution_factor: 0.1,
        permanent_factor: 0.0,
        temporary_factor: 0.01,
    };
    let scheme = ContinuousPowerImpact::new(
        OrderSpecification::new(args.shares, args.horizon, 50)?,
        PriceEvolutionParameters::new(
            ArithmeticPriceDynamics::flat(observables.price, 0.0, 1.0)?,
            PriceMarketImpact::power(&observables, exponent)?,
        ),
        MeanVarianceObjective::new(args.risk_aversion)?,
    );
    Ok(Almgren2003Estimator::new(&scheme)?)
}

/// Sweeps the exponent grid
pub fn compute(args: &ImpactExponentArgs) -> Result<ImpactExponentReport> {
    let rows = EXPONENTS
        .iter()
        .map(|&k| {
            let e = estimator(args, k)?;
            let measure = e.principal_measure(args.discount)?;
            let horizon = e.horizon_principal_measure(args.discount)?;
            let row = ExponentRow {
                exponent: k,
                breakeven_discount: e.breakeven_principal_discount(),
                mean: measure.mean,
                std_dev: measure.std_dev(),
                horizon_mean: horizon.mean,
                horizon_std_dev: horizon.std_dev(),
                information_ratio: e.information_ratio(args.discount)?,
                optimal_information_ratio: e.optimal_information_ratio(args.discount).ok(),
                optimal_horizon: e.optimal_information_ratio_horizon(args.discount).ok(),
            };
            debug!(k, ir = row.information_ratio, "exponent row");
            Ok(row)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ImpactExponentReport {
        discount: args.discount,
        rows,
    })
}

/// Run the impact-exponent command
pub fn run(args: &ImpactExponentArgs, ctx: &RunContext) -> Result<()> {
    info!(discount = args.discount, "sweeping impact exponents");
    emit(&compute(args)?, ctx)
}
