//! Multilateral CSA basis curve off a flat overnight curve

use analytics_core::market_data::FlatCurve;
use analytics_core::types::{Date, Tenor};
use analytics_xva::csa::MultilateralBasisCurve;
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::Result;

/// Arguments of `basis-curve`
#[derive(Args, Debug, Clone)]
pub struct BasisCurveArgs {
    /// Curve epoch (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-02")]
    pub epoch: String,

    /// Flat overnight rate
    #[arg(long, default_value_t = 0.03)]
    pub overnight_rate: f64,

    /// Constant CSA basis over the overnight rate
    #[arg(long, default_value_t = 0.005)]
    pub basis: f64,

    /// Tenors from the epoch
    #[arg(long, value_delimiter = ',', default_values_t = [
        Tenor::Months(1), Tenor::Months(3), Tenor::Months(6), Tenor::Years(1),
        Tenor::Years(2), Tenor::Years(5), Tenor::Years(10),
    ])]
    pub tenors: Vec<Tenor>,
}

impl Default for BasisCurveArgs {
    fn default() -> Self {
        Self {
            epoch: "2024-01-02".to_string(),
            overnight_rate: 0.03,
            basis: 0.005,
            tenors: vec![
                Tenor::Months(1),
                Tenor::Months(3),
                Tenor::Months(6),
                Tenor::Years(1),
                Tenor::Years(2),
                Tenor::Years(5),
                Tenor::Years(10),
            ],
        }
    }
}

/// Curve values at one tenor
#[derive(Debug, Clone, Serialize)]
pub struct TenorPoint {
    pub tenor: Tenor,
    pub date: Date,
    pub discount_factor: f64,
    /// Trapezoid average of the discount factor from the epoch
    pub effective_discount_factor: f64,
    pub rate: f64,
    /// Rate from the previous tenor, absent at the first one
    pub forward_rate: Option<f64>,
}

/// Result of `basis-curve`
#[derive(Debug, Clone, Serialize)]
pub struct BasisCurveReport {
    pub epoch: Date,
    pub overnight_rate: f64,
    pub basis: f64,
    pub points: Vec<TenorPoint>,
}

impl Report for BasisCurveReport {
    fn title(&self) -> String {
        format!("CSA Basis Curve from {}", self.epoch)
    }

    fn print_text(&self) {
        println!("{:<16} {}", "Overnight rate:", self.overnight_rate);
        println!("{:<16} {}", "Basis:", self.basis);
        println!();
        println!(
            "{:>5} {:>11} {:>10} {:>10} {:>9} {:>9}",
            "tenor", "date", "df", "eff df", "rate", "forward"
        );
        for p in &self.points {
            println!(
                "{:>5} {:>11} {:>10} {:>10} {:>9} {:>9}",
                p.tenor.to_string(),
                p.date.to_string(),
                fmt_num(p.discount_factor, 6),
                fmt_num(p.effective_discount_factor, 6),
                fmt_num(p.rate, 5),
                p.forward_rate.map_or_else(|| "-".to_string(), |r| fmt_num(r, 5))
            );
        }
    }
}

/// Evaluates the curve at every tenor
pub fn compute(args: &BasisCurveArgs) -> Result<BasisCurveReport> {
    let epoch = Date::parse(&args.epoch)?;
    let curve = MultilateralBasisCurve::new(epoch, FlatCurve::new(args.overnight_rate), args.basis)?;

    let mut points = Vec::with_capacity(args.tenors.len());
    let mut previous: Option<Date> = None;
    for &tenor in &args.tenors {
        let date = epoch.add_tenor(tenor)?;
        let forward_rate = match previous {
            Some(start) if start < date => Some(curve.rate(start, date)?),
            _ => None,
        };
        let point = TenorPoint {
            tenor,
            date,
            discount_factor: curve.discount_factor(date)?,
            effective_discount_factor: curve.effective_discount_factor(epoch, date)?,
            rate: curve.rate_to(date)?,
            forward_rate,
        };
        debug!(%tenor, df = point.discount_factor, "evaluated basis curve");
        points.push(point);
        previous = Some(date);
    }

    Ok(BasisCurveReport {
        epoch,
        overnight_rate: args.overnight_rate,
        basis: args.basis,
        points,
    })
}

/// Run the basis-curve command
pub fn run(args: &BasisCurveArgs, ctx: &RunContext) -> Result<()> {
    info!(epoch = %args.epoch, basis = args.basis, "evaluating CSA basis curve");
    emit(&compute(args)?, ctx)
}
