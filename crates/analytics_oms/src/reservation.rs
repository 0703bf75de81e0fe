//! Utility indifference (reservation) pricing of a contingent claim.
//!
//! An agent holds `Δ` units of a risky underlier and `n(Δ)` units of a
//! riskless asset. With terminal riskless price `B` and terminal underlier
//! price `S`, terminal wealth is `W = B·n(Δ) + S·Δ`. Buying `q` units of a
//! claim with payoff `g(S)` at price `p` changes it to
//!
//! ```text
//! W' = W − p·q·B + q·g(S)
//! ```
//!
//! The reservation price is the `p` solving `E[U(W')] = E[U(W)]`.
//! Expectations integrate over the terminal underlier distribution with the
//! composite Boole rule; infinite supports are truncated at
//! [`TAIL_STD_DEVS`] standard deviations from the mean.

use analytics_core::math::quadrature::boole;
use analytics_core::math::solvers::BrentSolver;
use analytics_core::statistics::R1Distribution;
use tracing::debug;

use crate::error::OmsError;

/// Boole panels used for every expectation.
pub const EXPECTATION_PANELS: usize = 1024;

/// Truncation of infinite supports, in standard deviations.
pub const TAIL_STD_DEVS: f64 = 12.0;

/// Holdings whose terminal utility is being priced against.
pub struct Endowment<R> {
    riskless_units: R,
    underlier_units: f64,
    terminal_riskless_price: f64,
}

impl<R: Fn(f64) -> f64> Endowment<R> {
    /// Creates the endowment.
    ///
    /// `riskless_units` maps underlier units to riskless units, usually the
    /// budget constraint of the initial portfolio.
    ///
    /// # Errors
    /// `InvalidInput` for non-finite units or a non-positive riskless price.
    pub fn new(riskless_units: R, underlier_units: f64, terminal_riskless_price: f64) -> Result<Self, OmsError> {
        if !underlier_units.is_finite() {
            return Err(OmsError::InvalidInput(format!("underlier units {underlier_units}")));
        }
        if !(terminal_riskless_price.is_finite() && terminal_riskless_price > 0.0) {
            return Err(OmsError::InvalidInput(format!(
                "terminal riskless price {terminal_riskless_price}"
            )));
        }
        Ok(Self {
            riskless_units,
            underlier_units,
            terminal_riskless_price,
        })
    }

    /// Units of the underlier held.
    pub fn underlier_units(&self) -> f64 {
        self.underlier_units
    }

    /// Terminal price of one riskless unit.
    pub fn terminal_riskless_price(&self) -> f64 {
        self.terminal_riskless_price
    }

    /// Terminal wealth when the underlier ends at `terminal_underlier_price`.
    pub fn terminal_wealth(&self, terminal_underlier_price: f64) -> f64 {
        self.terminal_riskless_price * (self.riskless_units)(self.underlier_units)
            + terminal_underlier_price * self.underlier_units
    }
}

/// Reservation pricer built from a private valuation (utility) function and
/// the claim payoff.
///
/// # Examples
///
/// ```
/// use analytics_core::statistics::Uniform;
/// use analytics_oms::reservation::{Endowment, ReservationPricer};
///
/// // risk-neutral agent: the reservation price is the expected payoff
/// let pricer = ReservationPricer::new(|w: f64| w, |s: f64| (s - 100.0).max(0.0));
/// let endowment = Endowment::new(|_: f64| 1_000.0, 0.0, 1.0).unwrap();
/// let terminal = Uniform::new(80.0, 120.0).unwrap();
/// let price = pricer.indifference_price(&endowment, &terminal, 1.0).unwrap();
/// assert!((price - 5.0).abs() < 1e-6);
/// ```
pub struct ReservationPricer<U, P> {
    utility: U,
    payoff: P,
}

impl<U, P> ReservationPricer<U, P>
where
    U: Fn(f64) -> f64,
    P: Fn(f64) -> f64,
{
    /// Creates the pricer.
    pub fn new(utility: U, payoff: P) -> Self {
        Self { utility, payoff }
    }

    /// Private valuation of a terminal wealth.
    pub fn utility(&self, wealth: f64) -> f64 {
        (self.utility)(wealth)
    }

    /// Claim payoff at a terminal underlier price.
    pub fn payoff(&self, terminal_underlier_price: f64) -> f64 {
        (self.payoff)(terminal_underlier_price)
    }

    /// Utility of the endowment alone at one terminal price.
    pub fn claims_unadjusted_utility<R: Fn(f64) -> f64>(
        &self,
        endowment: &Endowment<R>,
        terminal_underlier_price: f64,
    ) -> f64 {
        self.utility(endowment.terminal_wealth(terminal_underlier_price))
    }

    /// Utility of the endowment plus `claim_units` claims at one terminal
    /// price, before paying for them.
    pub fn claims_adjusted_utility<R: Fn(f64) -> f64>(
        &self,
        endowment: &Endowment<R>,
        terminal_underlier_price: f64,
        claim_units: f64,
    ) -> f64 {
        self.utility(
            endowment.terminal_wealth(terminal_underlier_price)
                + claim_units * self.payoff(terminal_underlier_price),
        )
    }

    /// E[U(W)] over the terminal distribution.
    pub fn indifference_utility_value<R: Fn(f64) -> f64>(
        &self,
        endowment: &Endowment<R>,
        terminal: &dyn R1Distribution,
    ) -> Result<f64, OmsError> {
        expectation(terminal, |s| self.claims_unadjusted_utility(endowment, s))
    }

    /// E[U(W − p·q·B + q·g(S))] over the terminal distribution.
    pub fn claims_adjusted_utility_value<R: Fn(f64) -> f64>(
        &self,
        endowment: &Endowment<R>,
        terminal: &dyn R1Distribution,
        claim_units: f64,
        claim_price: f64,
    ) -> Result<f64, OmsError> {
        if !claim_units.is_finite() || !claim_price.is_finite() {
            return Err(OmsError::InvalidInput(format!(
                "claim units {claim_units} at price {claim_price}"
            )));
        }
        let cost = claim_price * claim_units * endowment.terminal_riskless_price;
        expectation(terminal, |s| {
            self.utility(endowment.terminal_wealth(s) - cost + claim_units * self.payoff(s))
        })
    }

    /// Root of `objective` found by Brent's method from a bracket grown
    /// around `initial_price`.
    ///
    /// # Errors
    /// `Solver` when no sign change is found or Brent fails to converge.
    pub fn claims_adjusted_price<F>(&self, objective: F, initial_price: f64) -> Result<f64, OmsError>
    where
        F: Fn(f64) -> f64,
    {
        if !initial_price.is_finite() {
            return Err(OmsError::InvalidInput(format!("initial price {initial_price}")));
        }
        let step = (0.1 * initial_price.abs()).max(1.0);
        let solver = BrentSolver::with_defaults();
        Ok(solver.find_root_expanding(objective, initial_price - step, initial_price + step)?)
    }

    /// Reservation price per claim unit for buying `claim_units` claims.
    ///
    /// # Errors
    /// `InvalidInput` for zero or non-finite units; `Solver` when the utility
    /// balance has no root.
    pub fn indifference_price<R: Fn(f64) -> f64>(
        &self,
        endowment: &Endowment<R>,
        terminal: &dyn R1Distribution,
        claim_units: f64,
    ) -> Result<f64, OmsError> {
        if !claim_units.is_finite() || claim_units == 0.0 {
            return Err(OmsError::InvalidInput(format!("claim units {claim_units}")));
        }
        let reference = self.indifference_utility_value(endowment, terminal)?;
        let expected_payoff = expectation(terminal, |s| self.payoff(s))?;
        let guess = expected_payoff / endowment.terminal_riskless_price;
        let price = self.claims_adjusted_price(
            |p| {
                self.claims_adjusted_utility_value(endowment, terminal, claim_units, p)
                    .map_or(f64::NAN, |v| v - reference)
            },
            guess,
        )?;
        debug!(claim_units, reference, guess, price, "solved reservation price");
        Ok(price)
    }
}

/// Finite integration bounds for a distribution.
pub fn integration_bounds(distribution: &dyn R1Distribution) -> Result<(f64, f64), OmsError> {
    let (lower, upper) = distribution.support();
    let mean = distribution.mean();
    let spread = TAIL_STD_DEVS * distribution.variance().sqrt();
    let lo = if lower.is_finite() { lower } else { mean - spread };
    let hi = if upper.is_finite() { upper } else { mean + spread };
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(OmsError::InvalidInput(format!("integration bounds [{lo}, {hi}]")));
    }
    Ok((lo, hi))
}

/// E[f(X)] by Boole quadrature of `f·density` over the (truncated) support.
pub fn expectation<F>(distribution: &dyn R1Distribution, f: F) -> Result<f64, OmsError>
where
    F: Fn(f64) -> f64,
{
    let (lo, hi) = integration_bounds(distribution)?;
    Ok(boole(|x| f(x) * distribution.density(x), lo, hi, EXPECTATION_PANELS))
}
