//! Reservation bid and ask of a claim on a normal terminal underlier
//!
//! The agent values terminal wealth with exponential utility
//! `U(w) = −exp(−a·w)`, or linearly when the risk aversion is zero.

use analytics_core::statistics::Normal;
use analytics_oms::reservation::{expectation, Endowment, ReservationPricer};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

/// Claim payoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Claim {
    /// max(S − K, 0)
    Call,
    /// max(K − S, 0)
    Put,
    /// S − K
    Forward,
}

impl Claim {
    fn payoff(self, strike: f64) -> impl Fn(f64) -> f64 {
        move |s: f64| match self {
            Claim::Call => (s - strike).max(0.0),
            Claim::Put => (strike - s).max(0.0),
            Claim::Forward => s - strike,
        }
    }
}

/// Arguments of `reservation`
#[derive(Args, Debug, Clone)]
pub struct ReservationArgs {
    /// Exponential utility risk aversion a (0 for risk neutral)
    #[arg(long, default_value_t = 0.01)]
    pub risk_aversion: f64,

    /// Mean of the terminal underlier price
    #[arg(long, default_value_t = 100.0)]
    pub mean: f64,

    /// Standard deviation of the terminal underlier price
    #[arg(long, default_value_t = 10.0)]
    pub sigma: f64,

    /// Claim type
    #[arg(long, value_enum, default_value_t = Claim::Call)]
    pub claim: Claim,

    /// Claim strike
    #[arg(long, default_value_t = 100.0)]
    pub strike: f64,

    /// Riskless units held
    #[arg(long, default_value_t = 10.0)]
    pub riskless_units: f64,

    /// Underlier units held
    #[arg(long, default_value_t = 0.0)]
    pub underlier_units: f64,

    /// Terminal price of one riskless unit
    #[arg(long, default_value_t = 1.0)]
    pub riskless_price: f64,

    /// Claim quantities; positive buys, negative sells
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_values_t = [-2.0, -1.0, 1.0, 2.0])]
    pub quantities: Vec<f64>,
}

impl Default for ReservationArgs {
    fn default() -> Self {
        Self {
            risk_aversion: 0.01,
            mean: 100.0,
            sigma: 10.0,
            claim: Claim::Call,
            strike: 100.0,
            riskless_units: 10.0,
            underlier_units: 0.0,
            riskless_price: 1.0,
            quantities: vec![-2.0, -1.0, 1.0, 2.0],
        }
    }
}

/// Reservation price of one quantity
#[derive(Debug, Clone, Serialize)]
pub struct QuantityPrice {
    pub quantity: f64,
    pub price: f64,
    /// Price less the discounted expected payoff
    pub risk_premium: f64,
}

/// Result of `reservation`
#[derive(Debug, Clone, Serialize)]
pub struct ReservationReport {
    pub claim: Claim,
    pub strike: f64,
    pub risk_aversion: f64,
    /// Discounted expected payoff
    pub fair_value: f64,
    pub prices: Vec<QuantityPrice>,
}

impl Report for ReservationReport {
    fn title(&self) -> String {
        format!(
            "Reservation Prices: {:?} K={} (a = {})",
            self.claim, self.strike, self.risk_aversion
        )
    }

    fn print_text(&self) {
        println!("{:<14} {}", "Fair value:", fmt_num(self.fair_value, 6));
        println!();
        println!("{:>9} {:>6} {:>12} {:>12}", "quantity", "side", "price", "premium");
        for p in &self.prices {
            let side = if p.quantity > 0.0 { "bid" } else { "ask" };
            println!(
                "{:>9} {:>6} {:>12} {:>12}",
                p.quantity,
                side,
                fmt_num(p.price, 6),
                fmt_num(p.risk_premium, 6)
            );
        }
    }
}

/// Solves the reservation price of every quantity
pub fn compute(args: &ReservationArgs) -> Result<ReservationReport> {
    if !(args.risk_aversion >= 0.0 && args.risk_aversion.is_finite()) {
        return Err(CliError::InvalidArgument(format!(
            "risk aversion must be non-negative, got {}",
            args.risk_aversion
        )));
    }
    let a = args.risk_aversion;
    let utility = move |w: f64| if a > 0.0 { -(-a * w).exp() } else { w };
    let pricer = ReservationPricer::new(utility, args.claim.payoff(args.strike));
    let riskless_units = args.riskless_units;
    let endowment = Endowment::new(
        move |_: f64| riskless_units,
        args.underlier_units,
        args.riskless_price,
    )?;
    let terminal = Normal::new(args.mean, args.sigma)?;
    let fair_value = expectation(&terminal, |s| pricer.payoff(s))? / args.riskless_price;
    debug!(fair_value, "expected claim payoff");

    let prices = args
        .quantities
        .iter()
        .map(|&quantity| {
            let price = pricer.indifference_price(&endowment, &terminal, quantity)?;
            Ok(QuantityPrice {
                quantity,
                price,
                risk_premium: price - fair_value,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ReservationReport {
        claim: args.claim,
        strike: args.strike,
        risk_aversion: a,
        fair_value,
        prices,
    })
}

/// Run the reservation command
pub fn run(args: &ReservationArgs, ctx: &RunContext) -> Result<()> {
    info!(
        claim = ?args.claim,
        strike = args.strike,
        risk_aversion = args.risk_aversion,
        "solving reservation prices"
    );
    emit(&compute(args)?, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bid_below_fair_below_ask() {
        let report = compute(&ReservationArgs::default()).unwrap();
        // E[(S - K)+] = σ / √(2π) at the money
        let atm = 10.0 / (2.0 * std::f64::consts::PI).sqrt();
        assert_relative_eq!(report.fair_value, atm, max_relative = 1e-6);
        let by_quantity = |q: f64| report.prices.iter().find(|p| p.quantity == q).unwrap().price;
        assert!(by_quantity(1.0) < report.fair_value);
        assert!(by_quantity(-1.0) > report.fair_value);
        assert!(by_quantity(2.0) < by_quantity(1.0));
        assert!(by_quantity(-2.0) > by_quantity(-1.0));
    }

    #[test]
    fn test_forward_closed_form() {
        // p = μ − K − a·q·σ²/2 for a linear claim
        let args = ReservationArgs {
            claim: Claim::Forward,
            quantities: vec![1.0, -1.0],
            ..ReservationArgs::default()
        };
        let report = compute(&args).unwrap();
        assert_relative_eq!(report.prices[0].price, -0.5, epsilon = 1e-6);
        assert_relative_eq!(report.prices[1].price, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_risk_neutral_price_is_fair() {
        let args = ReservationArgs {
            risk_aversion: 0.0,
            claim: Claim::Put,
            ..ReservationArgs::default()
        };
        let report = compute(&args).unwrap();
        for p in &report.prices {
            assert!(p.risk_premium.abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_quantity_fails() {
        let args = ReservationArgs {
            quantities: vec![0.0],
            ..ReservationArgs::default()
        };
        assert!(matches!(compute(&args), Err(CliError::Oms(_))));
    }
}
