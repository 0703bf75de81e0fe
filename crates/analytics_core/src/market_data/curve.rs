//! Continuously compounded discount curves over year fractions.

use num_traits::Float;

use crate::market_data::error::MarketDataError;

fn as_f64<T: Float>(t: T) -> f64 {
    t.to_f64().unwrap_or(f64::NAN)
}

/// Discount curve queried by year fraction from its own epoch.
///
/// Implementors provide `discount_factor`; zero and forward rates follow from
/// it as `r(t) = −ln D(t) / t` and `f(t₁, t₂) = ln(D(t₁) / D(t₂)) / (t₂ − t₁)`.
///
/// # Examples
///
/// ```
/// use analytics_core::market_data::{FlatCurve, YieldCurve};
///
/// let curve = FlatCurve::new(0.04_f64);
/// let df = curve.discount_factor(2.0).unwrap();
/// assert!((df - (-0.08_f64).exp()).abs() < 1e-14);
/// assert!((curve.forward_rate(1.0, 3.0).unwrap() - 0.04).abs() < 1e-14);
/// ```
pub trait YieldCurve<T: Float> {
    /// Discount factor `D(t)` for `t ≥ 0`, with `D(0) = 1`.
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Zero rate to `t > 0`.
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::NegativeMaturity { t: as_f64(t) });
        }
        Ok(-self.discount_factor(t)?.ln() / t)
    }

    /// Forward rate over `[t1, t2]`.
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        if t2 <= t1 {
            return Err(MarketDataError::EmptyInterval {
                start: as_f64(t1),
                end: as_f64(t2),
            });
        }
        let ratio = self.discount_factor(t1)? / self.discount_factor(t2)?;
        Ok(ratio.ln() / (t2 - t1))
    }
}

/// Curve with one rate at every maturity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve<T: Float> {
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Curve at `rate`.
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// The constant rate.
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Same curve moved in parallel by `spread`.
    pub fn shifted(&self, spread: T) -> Self {
        Self::new(self.rate + spread)
    }
}

impl<T: Float> YieldCurve<T> for FlatCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::NegativeMaturity { t: as_f64(t) });
        }
        Ok((-self.rate * t).exp())
    }
}
