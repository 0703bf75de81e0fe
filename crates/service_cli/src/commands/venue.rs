//! Post and sweep fees on a regular and an inverted venue

use analytics_oms::venue::{FeeRates, FeeSchedule, VenueSettings};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

/// Arguments of `venue`
#[derive(Args, Debug, Clone)]
pub struct VenueArgs {
    /// Ticker to quote
    #[arg(long, default_value = "MSFT")]
    pub ticker: String,

    /// Quote price
    #[arg(long, default_value_t = 410.0)]
    pub price: f64,

    /// Order size in shares
    #[arg(long, default_value_t = 200.0)]
    pub size: f64,

    /// Regular venue code
    #[arg(long, default_value = "XNAS")]
    pub regular_code: String,

    /// Regular venue maker and taker rates per share
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_values_t = [-0.0020, 0.0030])]
    pub regular_rates: Vec<f64>,

    /// Inverted venue code
    #[arg(long, default_value = "BATY")]
    pub inverted_code: String,

    /// Inverted venue maker and taker rates per share
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_values_t = [0.0018, -0.0015])]
    pub inverted_rates: Vec<f64>,
}

impl Default for VenueArgs {
    fn default() -> Self {
        Self {
            ticker: "MSFT".to_string(),
            price: 410.0,
            size: 200.0,
            regular_code: "XNAS".to_string(),
            regular_rates: vec![-0.0020, 0.0030],
            inverted_code: "BATY".to_string(),
            inverted_rates: vec![0.0018, -0.0015],
        }
    }
}

/// Fees of one venue
#[derive(Debug, Clone, Serialize)]
pub struct VenueQuote {
    pub code: String,
    pub inverted: bool,
    pub rates: FeeRates,
    pub post_fee: f64,
    pub sweep_fee: f64,
    /// Sweep fee less post fee
    pub post_sweep_spread: f64,
}

/// Result of `venue`
#[derive(Debug, Clone, Serialize)]
pub struct VenueReport {
    pub ticker: String,
    pub price: f64,
    pub size: f64,
    pub venues: Vec<VenueQuote>,
    /// Venue with the lowest post fee
    pub cheapest_post: String,
    /// Venue with the lowest sweep fee
    pub cheapest_sweep: String,
}

impl Report for VenueReport {
    fn title(&self) -> String {
        format!("Venue Fees: {} x {} @ {}", self.ticker, self.size, self.price)
    }

    fn print_text(&self) {
        println!(
            "{:<6} {:<9} {:>9} {:>9} {:>10} {:>10} {:>10}",
            "venue", "type", "maker", "taker", "post", "sweep", "spread"
        );
        for v in &self.venues {
            println!(
                "{:<6} {:<9} {:>9} {:>9} {:>10} {:>10} {:>10}",
                v.code,
                if v.inverted { "inverted" } else { "regular" },
                v.rates.maker,
                v.rates.taker,
                fmt_num(v.post_fee, 4),
                fmt_num(v.sweep_fee, 4),
                fmt_num(v.post_sweep_spread, 4)
            );
        }
        println!();
        println!("{:<16} {}", "Cheapest post:", self.cheapest_post);
        println!("{:<16} {}", "Cheapest sweep:", self.cheapest_sweep);
    }
}

fn rates(values: &[f64], label: &str) -> Result<FeeRates> {
    match values {
        [maker, taker] => Ok(FeeRates::new(*maker, *taker)),
        _ => Err(CliError::InvalidArgument(format!(
            "{label} needs a maker and a taker rate, got {} values",
            values.len()
        ))),
    }
}

fn quote(venue: &VenueSettings, args: &VenueArgs) -> Result<VenueQuote> {
    let (ticker, price, size) = (args.ticker.as_str(), args.price, args.size);
    Ok(VenueQuote {
        code: venue.code().to_string(),
        inverted: venue.is_inverted(),
        rates: venue.pricing_rebate_function().rates(ticker),
        post_fee: venue.post_fee(ticker, price, size)?,
        sweep_fee: venue.sweep_fee(ticker, price, size)?,
        post_sweep_spread: venue.post_sweep_spread(ticker, price, size)?,
    })
}

fn cheapest(venues: &[VenueQuote], fee: impl Fn(&VenueQuote) -> f64) -> String {
    venues
        .iter()
        .min_by(|a, b| fee(a).total_cmp(&fee(b)))
        .map(|v| v.code.clone())
        .unwrap_or_default()
}

/// Quotes the order on both venues
pub fn compute(args: &VenueArgs) -> Result<VenueReport> {
    let regular_rates = rates(&args.regular_rates, "regular venue")?;
    let inverted_rates = rates(&args.inverted_rates, "inverted venue")?;
    let regular = VenueSettings::regular(
        args.regular_code.clone(),
        FeeSchedule::per_share(regular_rates.maker, regular_rates.taker),
    )?
    .with_jurisdiction("US");
    let inverted = VenueSettings::inverted(
        args.inverted_code.clone(),
        FeeSchedule::per_share(inverted_rates.maker, inverted_rates.taker),
    )?
    .with_jurisdiction("US");

    let venues = vec![quote(&regular, args)?, quote(&inverted, args)?];
    Ok(VenueReport {
        ticker: args.ticker.clone(),
        price: args.price,
        size: args.size,
        cheapest_post: cheapest(&venues, |v| v.post_fee),
        cheapest_sweep: cheapest(&venues, |v| v.sweep_fee),
        venues,
    })
}

/// Run the venue command
pub fn run(args: &VenueArgs, ctx: &RunContext) -> Result<()> {
    info!(ticker = %args.ticker, price = args.price, size = args.size, "quoting venue fees");
    emit(&compute(args)?, ctx)
}
