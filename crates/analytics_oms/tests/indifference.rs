//! Reservation prices against closed forms for linear and exponential utility.

use analytics_core::statistics::{Normal, Uniform};
use analytics_oms::reservation::{expectation, Endowment, ReservationPricer};
use analytics_oms::OmsError;
use approx::assert_relative_eq;
use proptest::prelude::*;

const RISK_AVERSION: f64 = 0.01;

fn cara(wealth: f64) -> f64 {
    -(-RISK_AVERSION * wealth).exp()
}

#[test]
fn test_exponential_utility_forward_price() {
    // p = (μ − a·q·σ²/2) / B for a linear claim on a normal underlier
    let pricer = ReservationPricer::new(cara, |s: f64| s);
    let endowment = Endowment::new(|_: f64| 10.0, 0.0, 1.0).unwrap();
    let terminal = Normal::new(100.0, 10.0).unwrap();
    let price = pricer.indifference_price(&endowment, &terminal, 1.0).unwrap();
    assert_relative_eq!(price, 99.5, epsilon = 1e-6);

    let two_units = pricer.indifference_price(&endowment, &terminal, 2.0).unwrap();
    assert_relative_eq!(two_units, 99.0, epsilon = 1e-6);
}

#[test]
fn test_risk_aversion_separates_bid_and_ask() {
    let pricer = ReservationPricer::new(cara, |s: f64| (s - 100.0).max(0.0));
    let endowment = Endowment::new(|_: f64| 50.0, 0.0, 1.0).unwrap();
    let terminal = Normal::new(100.0, 15.0).unwrap();
    let fair = expectation(&terminal, |s| pricer.payoff(s)).unwrap();
    let bid = pricer.indifference_price(&endowment, &terminal, 1.0).unwrap();
    let ask = pricer.indifference_price(&endowment, &terminal, -1.0).unwrap();
    assert!(bid < fair, "bid {bid} fair {fair}");
    assert!(ask > fair, "ask {ask} fair {fair}");
}

#[test]
fn test_claims_adjusted_utility_is_balanced_at_price() {
    let pricer = ReservationPricer::new(cara, |s: f64| s);
    let endowment = Endowment::new(|units: f64| 20.0 - units, 0.5, 1.02).unwrap();
    let terminal = Normal::new(100.0, 10.0).unwrap();
    let price = pricer.indifference_price(&endowment, &terminal, 1.0).unwrap();
    let base = pricer.indifference_utility_value(&endowment, &terminal).unwrap();
    let adjusted = pricer
        .claims_adjusted_utility_value(&endowment, &terminal, 1.0, price)
        .unwrap();
    assert_relative_eq!(adjusted, base, max_relative = 1e-8);
}

#[test]
fn test_rejects_bad_inputs() {
    assert!(matches!(
        Endowment::new(|_: f64| 1.0, 0.0, 0.0),
        Err(OmsError::InvalidInput(_))
    ));
    assert!(Endowment::new(|_: f64| 1.0, f64::NAN, 1.0).is_err());
    let pricer = ReservationPricer::new(|w: f64| w, |s: f64| s);
    let endowment = Endowment::new(|_: f64| 1.0, 0.0, 1.0).unwrap();
    let terminal = Uniform::standard();
    assert!(pricer.indifference_price(&endowment, &terminal, 0.0).is_err());
    // a constant objective never changes sign
    assert!(matches!(
        pricer.claims_adjusted_price(|_| 1.0, 0.0),
        Err(OmsError::Solver(_))
    ));
}

proptest! {
    #[test]
    fn prop_risk_neutral_price_is_discounted_expected_payoff(
        riskless_price in 0.5f64..2.0,
        claim_units in 0.1f64..10.0,
    ) {
        let pricer = ReservationPricer::new(|w: f64| w, |s: f64| (s - 100.0).max(0.0));
        let endowment = Endowment::new(|_: f64| 100.0, 1.0, riskless_price).unwrap();
        let terminal = Uniform::new(50.0, 150.0).unwrap();
        let price = pricer.indifference_price(&endowment, &terminal, claim_units).unwrap();
        prop_assert!((price - 12.5 / riskless_price).abs() < 1e-6);
    }
}
