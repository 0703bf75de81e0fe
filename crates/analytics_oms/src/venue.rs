//! Exchange venue settings and maker / taker fee schedules.
//!
//! A *regular* (maker-taker) venue pays a rebate to liquidity providers and
//! charges liquidity takers; an *inverted* (taker-maker) venue does the
//! opposite. Fees are quoted per share, negative values are rebates.
//!
//! Charges are capped at the access fee limit: 0.3 cents per share, or 0.3%
//! of the price for quotes under one dollar.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use crate::error::OmsError;

/// Per-share access fee cap for quotes of at least one dollar.
pub const ACCESS_FEE_CAP: f64 = 0.003;

/// Access fee cap as a fraction of price for sub-dollar quotes.
pub const SUB_DOLLAR_ACCESS_FEE_RATE: f64 = 0.003;

/// Maker and taker rates per share.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeRates {
    /// Rate charged for posting liquidity
    pub maker: f64,
    /// Rate charged for removing liquidity
    pub taker: f64,
}

impl FeeRates {
    /// Creates the rates.
    pub const fn new(maker: f64, taker: f64) -> Self {
        Self { maker, taker }
    }
}

/// Maker / taker fee and rebate function of a venue.
pub trait PricingRebateFunction {
    /// Fee for posting `size` shares of `ticker` at `price`.
    fn maker_fee(&self, ticker: &str, price: f64, size: f64) -> Result<f64, OmsError>;

    /// Fee for taking `size` shares of `ticker` at `price`.
    fn taker_fee(&self, ticker: &str, price: f64, size: f64) -> Result<f64, OmsError>;
}

/// Per-share fee schedule with optional ticker overrides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeSchedule {
    default_rates: FeeRates,
    overrides: BTreeMap<String, FeeRates>,
}

impl FeeSchedule {
    /// Single rate pair for every ticker.
    pub fn per_share(maker: f64, taker: f64) -> Self {
        Self {
            default_rates: FeeRates::new(maker, taker),
            overrides: BTreeMap::new(),
        }
    }

    /// Adds a ticker specific rate pair.
    pub fn with_override(mut self, ticker: impl Into<String>, rates: FeeRates) -> Self {
        self.overrides.insert(ticker.into(), rates);
        self
    }

    /// Rates applied to `ticker`.
    pub fn rates(&self, ticker: &str) -> FeeRates {
        self.overrides
            .get(ticker)
            .copied()
            .unwrap_or(self.default_rates)
    }

    /// Every rate pair in the schedule, default first.
    fn all_rates(&self) -> impl Iterator<Item = &FeeRates> {
        std::iter::once(&self.default_rates).chain(self.overrides.values())
    }

    fn fee(rate: f64, price: f64, size: f64) -> Result<f64, OmsError> {
        if !(price.is_finite() && price > 0.0) {
            return Err(OmsError::InvalidOrder {
                field: "price",
                value: price,
            });
        }
        if !(size.is_finite() && size >= 0.0) {
            return Err(OmsError::InvalidOrder {
                field: "size",
                value: size,
            });
        }
        let cap = if price < 1.0 {
            SUB_DOLLAR_ACCESS_FEE_RATE * price
        } else {
            ACCESS_FEE_CAP
        };
        Ok(rate.min(cap) * size)
    }
}

impl PricingRebateFunction for FeeSchedule {
    fn maker_fee(&self, ticker: &str, price: f64, size: f64) -> Result<f64, OmsError> {
        Self::fee(self.rates(ticker).maker, price, size)
    }

    fn taker_fee(&self, ticker: &str, price: f64, size: f64) -> Result<f64, OmsError> {
        Self::fee(self.rates(ticker).taker, price, size)
    }
}

/// Trading venue with its fee schedule.
///
/// # Examples
///
/// ```
/// use analytics_oms::venue::{FeeSchedule, VenueSettings};
///
/// let venue = VenueSettings::regular("XNAS", FeeSchedule::per_share(-0.0020, 0.0030)).unwrap();
/// assert!((venue.post_fee("AAPL", 180.0, 100.0).unwrap() + 0.2).abs() < 1e-12);
/// assert!((venue.sweep_fee("AAPL", 180.0, 100.0).unwrap() - 0.3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueSettings<F = FeeSchedule> {
    code: String,
    jurisdiction: String,
    local_identifier: String,
    inverted: bool,
    pricing: F,
}

impl<F: PricingRebateFunction> VenueSettings<F> {
    /// Creates a venue with an arbitrary pricing function.
    ///
    /// # Errors
    /// `InvalidVenueCode` for a blank code.
    pub fn new(code: impl Into<String>, pricing: F, inverted: bool) -> Result<Self, OmsError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(OmsError::InvalidVenueCode(code));
        }
        Ok(Self {
            code,
            jurisdiction: String::new(),
            local_identifier: String::new(),
            inverted,
            pricing,
        })
    }

    /// Sets the regulatory jurisdiction.
    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = jurisdiction.into();
        self
    }

    /// Sets the venue's local identifier.
    pub fn with_local_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.local_identifier = identifier.into();
        self
    }

    /// Venue code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Regulatory jurisdiction; empty when unset.
    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    /// Local identifier; empty when unset.
    pub fn local_identifier(&self) -> &str {
        &self.local_identifier
    }

    /// Whether the venue is taker-maker.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Pricing and rebate function.
    pub fn pricing_rebate_function(&self) -> &F {
        &self.pricing
    }

    /// Fee for a passive order resting on the book.
    pub fn post_fee(&self, ticker: &str, price: f64, size: f64) -> Result<f64, OmsError> {
        let fee = self.pricing.maker_fee(ticker, price, size)?;
        trace!(venue = %self.code, ticker, price, size, fee, "post fee");
        Ok(fee)
    }

    /// Fee for an aggressive order sweeping the book.
    pub fn sweep_fee(&self, ticker: &str, price: f64, size: f64) -> Result<f64, OmsError> {
        let fee = self.pricing.taker_fee(ticker, price, size)?;
        trace!(venue = %self.code, ticker, price, size, fee, "sweep fee");
        Ok(fee)
    }
}

impl VenueSettings<FeeSchedule> {
    /// Maker-taker venue: every maker rate is at most its taker rate.
    ///
    /// # Errors
    /// `InvalidFeeSchedule` when some maker rate exceeds its taker rate.
    pub fn regular(code: impl Into<String>, schedule: FeeSchedule) -> Result<Self, OmsError> {
        let venue = Self::new(code, schedule, false)?;
        if venue.pricing.all_rates().any(|r| r.maker > r.taker) {
            return Err(OmsError::InvalidFeeSchedule {
                code: venue.code,
                reason: "maker rate above taker rate on a regular venue".to_string(),
            });
        }
        Ok(venue)
    }

    /// Taker-maker venue: every taker rate is at most its maker rate.
    ///
    /// # Errors
    /// `InvalidFeeSchedule` when some taker rate exceeds its maker rate.
    pub fn inverted(code: impl Into<String>, schedule: FeeSchedule) -> Result<Self, OmsError> {
        let venue = Self::new(code, schedule, true)?;
        if venue.pricing.all_rates().any(|r| r.taker > r.maker) {
            return Err(OmsError::InvalidFeeSchedule {
                code: venue.code,
                reason: "taker rate above maker rate on an inverted venue".to_string(),
            });
        }
        Ok(venue)
    }

    /// Net cost of posting on this venue versus sweeping it, per order.
    pub fn post_sweep_spread(&self, ticker: &str, price: f64, size: f64) -> Result<f64, OmsError> {
        Ok(self.sweep_fee(ticker, price, size)? - self.post_fee(ticker, price, size)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_regular_venue_rebates_makers() {
        let venue = VenueSettings::regular("XNYS", FeeSchedule::per_share(-0.0015, 0.0030))
            .unwrap()
            .with_jurisdiction("US");
        assert!(!venue.is_inverted());
        assert_eq!(venue.jurisdiction(), "US");
        assert_relative_eq!(venue.post_fee("IBM", 150.0, 1_000.0).unwrap(), -1.5, epsilon = 1e-12);
        assert_relative_eq!(venue.sweep_fee("IBM", 150.0, 1_000.0).unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(venue.post_sweep_spread("IBM", 150.0, 1_000.0).unwrap(), 4.5, epsilon = 1e-12);
    }

    #[test]
    fn test_inverted_venue_pays_takers() {
        let venue = VenueSettings::inverted("EDGA", FeeSchedule::per_share(0.0030, -0.0002)).unwrap();
        assert!(venue.is_inverted());
        assert!(venue.post_fee("IBM", 150.0, 100.0).unwrap() > 0.0);
        assert!(venue.sweep_fee("IBM", 150.0, 100.0).unwrap() < 0.0);
    }

    #[test]
    fn test_schedule_must_match_venue_type() {
        let inverted_rates = FeeSchedule::per_share(0.0030, -0.0002);
        assert!(matches!(
            VenueSettings::regular("BAD", inverted_rates.clone()),
            Err(OmsError::InvalidFeeSchedule { .. })
        ));
        let mixed = FeeSchedule::per_share(-0.002, 0.003).with_override("XYZ", FeeRates::new(0.003, 0.001));
        assert!(VenueSettings::regular("MIX", mixed).is_err());
        assert!(matches!(
            VenueSettings::regular("  ", FeeSchedule::per_share(0.0, 0.0)),
            Err(OmsError::InvalidVenueCode(_))
        ));
    }

    #[test]
    fn test_access_fee_cap() {
        let venue = VenueSettings::regular("CAP", FeeSchedule::per_share(-0.002, 0.005)).unwrap();
        assert_relative_eq!(venue.sweep_fee("ABC", 20.0, 100.0).unwrap(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(venue.sweep_fee("ABC", 0.5, 100.0).unwrap(), 0.15, epsilon = 1e-12);
        // rebates are not capped
        assert_relative_eq!(venue.post_fee("ABC", 0.5, 100.0).unwrap(), -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_ticker_override_and_order_checks() {
        let schedule =
            FeeSchedule::per_share(-0.002, 0.003).with_override("SPY", FeeRates::new(-0.0032, 0.0030));
        let venue = VenueSettings::regular("ARCX", schedule).unwrap();
        assert_relative_eq!(venue.post_fee("SPY", 450.0, 100.0).unwrap(), -0.32, epsilon = 1e-12);
        assert_relative_eq!(venue.post_fee("QQQ", 450.0, 100.0).unwrap(), -0.2, epsilon = 1e-12);
        assert!(venue.post_fee("SPY", 0.0, 100.0).is_err());
        assert!(venue.sweep_fee("SPY", 10.0, f64::NAN).is_err());
    }
}
