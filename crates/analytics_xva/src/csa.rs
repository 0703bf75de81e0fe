//! CSA discounting off an overnight curve plus a constant basis.
//!
//! Dates convert to year fractions as `days / 365.25` from the curve epoch.

use analytics_core::market_data::YieldCurve;
use analytics_core::types::{Date, Tenor};
use tracing::warn;

use crate::error::XvaError;

const DAYS_PER_YEAR: f64 = 365.25;
const EFFECTIVE_DF_INTERVALS: u32 = 5;

/// Multilateral CSA curve: overnight discounting shifted by a flat basis.
///
/// # Examples
///
/// ```
/// use analytics_core::market_data::FlatCurve;
/// use analytics_core::types::Date;
/// use analytics_xva::csa::MultilateralBasisCurve;
///
/// let epoch = Date::from_ymd(2024, 1, 2).unwrap();
/// let curve = MultilateralBasisCurve::new(epoch, FlatCurve::new(0.03), 0.01).unwrap();
/// let one_year = epoch.add_days(365).unwrap();
/// let r = curve.rate(epoch, one_year).unwrap();
/// assert!((r - 0.04).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct MultilateralBasisCurve<C> {
    epoch: Date,
    overnight: C,
    basis: f64,
}

impl<C: YieldCurve<f64>> MultilateralBasisCurve<C> {
    /// Creates the curve.
    ///
    /// # Errors
    /// `InvalidInput` for a non-finite basis.
    pub fn new(epoch: Date, overnight: C, basis: f64) -> Result<Self, XvaError> {
        if !basis.is_finite() {
            return Err(XvaError::InvalidInput(format!("basis {basis}")));
        }
        Ok(Self {
            epoch,
            overnight,
            basis,
        })
    }

    /// Curve epoch.
    pub fn epoch(&self) -> Date {
        self.epoch
    }

    /// Overnight curve.
    pub fn overnight_curve(&self) -> &C {
        &self.overnight
    }

    /// Constant basis over the overnight rate.
    pub fn basis(&self) -> f64 {
        self.basis
    }

    fn year_fraction(&self, date: Date) -> Result<f64, XvaError> {
        let days = date - self.epoch;
        if days < 0 {
            return Err(XvaError::DateOutOfRange {
                date: date.to_string(),
                start: self.epoch.to_string(),
                end: "open".to_string(),
            });
        }
        Ok(days as f64 / DAYS_PER_YEAR)
    }

    fn discount_factor_at(&self, t: f64) -> Result<f64, XvaError> {
        Ok(self.overnight.discount_factor(t)? * (-self.basis * t).exp())
    }

    /// Discount factor to `date`; 1 at the epoch.
    pub fn discount_factor(&self, date: Date) -> Result<f64, XvaError> {
        self.discount_factor_at(self.year_fraction(date)?)
    }

    /// Discount factor to the epoch shifted by `tenor`.
    pub fn discount_factor_tenor(&self, tenor: Tenor) -> Result<f64, XvaError> {
        self.discount_factor(self.epoch.add_tenor(tenor)?)
    }

    /// Average discount factor over `[start, end]` by the trapezoid rule.
    ///
    /// # Errors
    /// `InvalidInput` unless `epoch <= start < end`.
    pub fn effective_discount_factor(&self, start: Date, end: Date) -> Result<f64, XvaError> {
        let (t1, t2) = self.ordered(start, end)?;
        let h = (t2 - t1) / f64::from(EFFECTIVE_DF_INTERVALS);
        let mut area = 0.0;
        let mut left = self.discount_factor_at(t1)?;
        for i in 1..=EFFECTIVE_DF_INTERVALS {
            let right = self.discount_factor_at(t1 + h * f64::from(i))?;
            area += 0.5 * (left + right) * h;
            left = right;
        }
        Ok(area / (t2 - t1))
    }

    /// Effective discount factor between two tenors from the epoch.
    pub fn effective_discount_factor_tenor(&self, start: Tenor, end: Tenor) -> Result<f64, XvaError> {
        self.effective_discount_factor(self.epoch.add_tenor(start)?, self.epoch.add_tenor(end)?)
    }

    /// Continuously compounded rate between two dates.
    ///
    /// # Errors
    /// `InvalidInput` unless `epoch <= start < end`.
    pub fn rate(&self, start: Date, end: Date) -> Result<f64, XvaError> {
        let (t1, t2) = self.ordered(start, end)?;
        let df1 = self.discount_factor_at(t1)?;
        let df2 = self.discount_factor_at(t2)?;
        Ok((df1 / df2).ln() / (t2 - t1))
    }

    /// Rate from the epoch to `date`.
    pub fn rate_to(&self, date: Date) -> Result<f64, XvaError> {
        self.rate(self.epoch, date)
    }

    /// Rate between two tenors from the epoch, e.g. `"1Y"` to `"2Y"`.
    pub fn rate_for_tenor(&self, start: Tenor, end: Tenor) -> Result<f64, XvaError> {
        self.rate(self.epoch.add_tenor(start)?, self.epoch.add_tenor(end)?)
    }

    fn ordered(&self, start: Date, end: Date) -> Result<(f64, f64), XvaError> {
        if end <= start {
            warn!(%start, %end, "rejected empty CSA date interval");
            return Err(XvaError::InvalidInput(format!(
                "interval [{start}, {end}] is empty"
            )));
        }
        Ok((self.year_fraction(start)?, self.year_fraction(end)?))
    }
}
