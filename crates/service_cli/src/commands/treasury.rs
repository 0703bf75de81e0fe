//! Government bond conventions by treasury code or benchmark currency

use analytics_core::market_data::treasury::TREASURY_SETTINGS;
use analytics_core::market_data::{benchmark_code, benchmark_setting, treasury_setting, TreasurySetting};
use analytics_core::types::Currency;
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output::{emit, Report, RunContext};
use crate::{CliError, Result};

/// Arguments of `treasury`
#[derive(Args, Debug, Clone, Default)]
pub struct TreasuryArgs {
    /// Treasury code, e.g. UST or GILT
    #[arg(long, conflicts_with = "currency")]
    pub code: Option<String>,

    /// Currency whose benchmark convention is printed
    #[arg(long)]
    pub currency: Option<String>,
}

/// Benchmark code of a currency
#[derive(Debug, Clone, Serialize)]
pub struct Benchmark {
    pub currency: Currency,
    pub code: Option<&'static str>,
}

/// Result of `treasury`
#[derive(Debug, Clone, Serialize)]
pub struct TreasuryReport {
    pub settings: Vec<TreasurySetting>,
    /// Filled when the whole table is listed
    pub benchmarks: Vec<Benchmark>,
}

impl Report for TreasuryReport {
    fn title(&self) -> String {
        "Government Bond Conventions".to_string()
    }

    fn print_text(&self) {
        println!("{:<6} | ccy | freq   | day count | calendar", "code");
        for s in &self.settings {
            println!("{s}");
        }
        if !self.benchmarks.is_empty() {
            println!();
            println!("Benchmarks:");
            for b in &self.benchmarks {
                println!("  {} -> {}", b.currency, b.code.unwrap_or("-"));
            }
        }
    }
}

/// Resolves the requested conventions
pub fn compute(args: &TreasuryArgs) -> Result<TreasuryReport> {
    match (&args.code, &args.currency) {
        (Some(_), Some(_)) => Err(CliError::InvalidArgument(
            "pass either a treasury code or a currency".to_string(),
        )),
        (Some(code), None) => Ok(TreasuryReport {
            settings: vec![treasury_setting(code)?],
            benchmarks: Vec::new(),
        }),
        (None, Some(currency)) => Ok(TreasuryReport {
            settings: vec![benchmark_setting(currency)?],
            benchmarks: Vec::new(),
        }),
        (None, None) => Ok(TreasuryReport {
            settings: TREASURY_SETTINGS.to_vec(),
            benchmarks: Currency::ALL
                .iter()
                .map(|&currency| Benchmark {
                    currency,
                    code: benchmark_code(currency),
                })
                .collect(),
        }),
    }
}

/// Run the treasury command
pub fn run(args: &TreasuryArgs, ctx: &RunContext) -> Result<()> {
    info!(code = ?args.code, currency = ?args.currency, "looking up treasury conventions");
    emit(&compute(args)?, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_table() {
        let report = compute(&TreasuryArgs::default()).unwrap();
        assert_eq!(report.settings.len(), 16);
        assert_eq!(report.benchmarks.len(), Currency::ALL.len());
        let hkd = report.benchmarks.iter().find(|b| b.currency == Currency::HKD).unwrap();
        assert!(hkd.code.is_none());
    }

    #[test]
    fn test_code_and_currency_lookup() {
        let by_code = compute(&TreasuryArgs {
            code: Some("jgb".to_string()),
            currency: None,
        })
        .unwrap();
        assert_eq!(by_code.settings[0].currency, Currency::JPY);

        let by_currency = compute(&TreasuryArgs {
            code: None,
            currency: Some("EUR".to_string()),
        })
        .unwrap();
        assert_eq!(by_currency.settings[0].code, "DBR");
    }

    #[test]
    fn test_unknown_code() {
        let result = compute(&TreasuryArgs {
            code: Some("XYZ".to_string()),
            currency: None,
        });
        assert!(matches!(result, Err(CliError::MarketData(_))));
    }
}
