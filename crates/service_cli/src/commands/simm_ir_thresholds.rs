//! SIMM 2.4 interest rate concentration thresholds

use analytics_margin::rates::{currency_group, threshold_for_currency, IrThreshold, IR_THRESHOLDS_24};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::output::{emit, Report, RunContext};
use crate::Result;

/// Arguments of `simm-ir-thresholds`
#[derive(Args, Debug, Clone)]
pub struct SimmIrThresholdsArgs {
    /// Currencies to look up
    #[arg(long, value_delimiter = ',', default_values_t = ["USD".to_string(), "JPY".to_string(), "CHF".to_string(), "BRL".to_string()])]
    pub currencies: Vec<String>,
}

/// Threshold resolved for one currency
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyThreshold {
    pub currency: String,
    pub group: u8,
    /// Whether the currency fell back to the catch-all group
    pub defaulted: bool,
    pub delta: f64,
    pub vega: f64,
}

/// Result of `simm-ir-thresholds`
#[derive(Debug, Clone, Serialize)]
pub struct SimmIrThresholdsReport {
    pub groups: Vec<IrThreshold>,
    pub lookups: Vec<CurrencyThreshold>,
}

impl Report for SimmIrThresholdsReport {
    fn title(&self) -> String {
        "SIMM 2.4 Interest Rate Concentration Thresholds".to_string()
    }

    fn print_text(&self) {
        println!(
            "{:<6} {:<9} {:<17} {:>8} {:>8}  currencies",
            "group", "vol", "frequency", "delta", "vega"
        );
        for g in &self.groups {
            println!(
                "{:<6} {:<9} {:<17} {:>8} {:>8}  {}",
                g.group,
                g.volatility_type.to_string(),
                g.trade_frequency.to_string(),
                g.threshold.delta,
                g.threshold.vega,
                g.currencies.join(" ")
            );
        }
        println!();
        println!("{:<10} {:>6} {:>8} {:>8}", "currency", "group", "delta", "vega");
        for l in &self.lookups {
            let marker = if l.defaulted { " (other)" } else { "" };
            println!(
                "{:<10} {:>6} {:>8} {:>8}{}",
                l.currency, l.group, l.delta, l.vega, marker
            );
        }
    }
}

/// Resolves the requested currencies
pub fn compute(args: &SimmIrThresholdsArgs) -> Result<SimmIrThresholdsReport> {
    let lookups = args
        .currencies
        .iter()
        .map(|currency| {
            let threshold = threshold_for_currency(currency);
            debug!(currency = %currency, group = threshold.group, "resolved IR threshold");
            CurrencyThreshold {
                currency: currency.trim().to_uppercase(),
                group: threshold.group,
                defaulted: currency_group(currency).is_none(),
                delta: threshold.threshold.delta,
                vega: threshold.threshold.vega,
            }
        })
        .collect();

    Ok(SimmIrThresholdsReport {
        groups: IR_THRESHOLDS_24.to_vec(),
        lookups,
    })
}

/// Run the simm-ir-thresholds command
pub fn run(args: &SimmIrThresholdsArgs, ctx: &RunContext) -> Result<()> {
    info!(currencies = args.currencies.len(), "looking up IR thresholds");
    emit(&compute(args)?, ctx)
}
