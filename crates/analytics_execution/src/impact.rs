//! Market impact transaction functions.
//!
//! A transaction function maps a trade rate `v` (units per unit time) to a
//! price displacement. Permanent impact `g(v)` shifts the price for the rest
//! of the execution; temporary impact `h(v)` only affects the fill of the
//! current interval.
//!
//! ## Parametrisation from observables
//!
//! With reference rate `R = f·V` (execution factor times daily volume):
//!
//! - permanent slope `γ = p·S₀ / R`
//! - linear temporary slope `η = q·S₀ / R`, offset `ε = spread / 2`
//! - power temporary coefficient `η = q·S₀ / Rᵏ`
//!
//! so that trading at the reference rate moves the price by the fractions
//! `p` and `q` of `S₀`.

use serde::Serialize;

use crate::error::{check_non_negative, check_positive, ExecutionError};

/// Price impact of trading at rate `v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TransactionFunction {
    /// h(v) = ε·sgn(v) + η·v
    Linear {
        /// Slope η
        coefficient: f64,
        /// Fixed cost ε per unit traded
        offset: f64,
    },
    /// h(v) = η·|v|ᵏ·sgn(v)
    Power {
        /// Coefficient η
        coefficient: f64,
        /// Exponent k
        exponent: f64,
    },
}

impl TransactionFunction {
    /// Linear impact with slope and offset.
    pub fn linear(coefficient: f64, offset: f64) -> Result<Self, ExecutionError> {
        check_non_negative("impact_coefficient", coefficient)?;
        check_non_negative("impact_offset", offset)?;
        Ok(Self::Linear {
            coefficient,
            offset,
        })
    }

    /// Power-law impact.
    pub fn power(coefficient: f64, exponent: f64) -> Result<Self, ExecutionError> {
        check_non_negative("impact_coefficient", coefficient)?;
        check_positive("impact_exponent", exponent)?;
        Ok(Self::Power {
            coefficient,
            exponent,
        })
    }

    /// Impact at trade rate `v`.
    pub fn evaluate(&self, v: f64) -> f64 {
        if v == 0.0 {
            return 0.0;
        }
        match *self {
            Self::Linear {
                coefficient,
                offset,
            } => offset * v.signum() + coefficient * v,
            Self::Power {
                coefficient,
                exponent,
            } => coefficient * v.abs().powf(exponent) * v.signum(),
        }
    }

    /// dh/dv away from the origin.
    pub fn derivative(&self, v: f64) -> f64 {
        match *self {
            Self::Linear { coefficient, .. } => coefficient,
            Self::Power {
                coefficient,
                exponent,
            } => exponent * coefficient * v.abs().powf(exponent - 1.0),
        }
    }

    /// Whether the function is of the linear family.
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear { .. })
    }

    /// η.
    pub fn coefficient(&self) -> f64 {
        match *self {
            Self::Linear { coefficient, .. } | Self::Power { coefficient, .. } => coefficient,
        }
    }

    /// k (one for the linear family).
    pub fn exponent(&self) -> f64 {
        match *self {
            Self::Linear { .. } => 1.0,
            Self::Power { exponent, .. } => exponent,
        }
    }

    /// ε (zero for the power family).
    pub fn offset(&self) -> f64 {
        match *self {
            Self::Linear { offset, .. } => offset,
            Self::Power { .. } => 0.0,
        }
    }
}

/// Market observables used to calibrate impact coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketObservables {
    /// Reference price S₀
    pub price: f64,
    /// Daily traded volume V
    pub daily_volume: f64,
    /// Bid-ask spread
    pub bid_ask_spread: f64,
    /// Fraction f of daily volume defining the reference rate
    pub execution_factor: f64,
    /// Permanent move p (fraction of price) at the reference rate
    pub permanent_factor: f64,
    /// Temporary move q (fraction of price) at the reference rate
    pub temporary_factor: f64,
}

impl MarketObservables {
    fn reference_rate(&self) -> Result<f64, ExecutionError> {
        check_positive("price", self.price)?;
        check_positive("daily_volume", self.daily_volume)?;
        check_non_negative("bid_ask_spread", self.bid_ask_spread)?;
        check_non_negative("permanent_factor", self.permanent_factor)?;
        check_non_negative("temporary_factor", self.temporary_factor)?;
        Ok(check_positive("execution_factor", self.execution_factor)? * self.daily_volume)
    }
}

/// Permanent and temporary impact of a trader, with optional temporary noise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceMarketImpact {
    permanent: TransactionFunction,
    temporary: TransactionFunction,
    temporary_volatility: Option<TransactionFunction>,
}

impl PriceMarketImpact {
    /// Bundles the two impact functions.
    pub fn new(permanent: TransactionFunction, temporary: TransactionFunction) -> Self {
        Self {
            permanent,
            temporary,
            temporary_volatility: None,
        }
    }

    /// Adds a standard deviation function for the temporary impact.
    pub fn with_temporary_volatility(mut self, volatility: TransactionFunction) -> Self {
        self.temporary_volatility = Some(volatility);
        self
    }

    /// Linear permanent and linear temporary impact from observables.
    ///
    /// # Examples
    /// ```
    /// use analytics_execution::impact::{MarketObservables, PriceMarketImpact};
    ///
    /// let obs = MarketObservables {
    ///     price: 50.0,
    ///     daily_volume: 1_000_000.0,
    ///     bid_ask_spread: 0.0,
    ///     execution_factor: 0.1,
    ///     permanent_factor: 0.1,
    ///     temporary_factor: 0.01,
    /// };
    /// let impact = PriceMarketImpact::linear(&obs).unwrap();
    /// assert!((impact.permanent().coefficient() - 5.0e-5).abs() < 1e-18);
    /// assert!((impact.temporary().evaluate(100_000.0) - 0.5).abs() < 1e-12);
    /// ```
    pub fn linear(observables: &MarketObservables) -> Result<Self, ExecutionError> {
        let rate = observables.reference_rate()?;
        let scale = observables.price / rate;
        Ok(Self::new(
            TransactionFunction::linear(observables.permanent_factor * scale, 0.0)?,
            TransactionFunction::linear(
                observables.temporary_factor * scale,
                0.5 * observables.bid_ask_spread,
            )?,
        ))
    }

    /// Linear permanent and power-law temporary impact from observables.
    pub fn power(observables: &MarketObservables, exponent: f64) -> Result<Self, ExecutionError> {
        let rate = observables.reference_rate()?;
        check_positive("impact_exponent", exponent)?;
        Ok(Self::new(
            TransactionFunction::linear(
                observables.permanent_factor * observables.price / rate,
                0.0,
            )?,
            TransactionFunction::power(
                observables.temporary_factor * observables.price / rate.powf(exponent),
                exponent,
            )?,
        ))
    }

    /// Permanent impact g(v).
    #[inline]
    pub fn permanent(&self) -> &TransactionFunction {
        &self.permanent
    }

    /// Temporary impact h(v).
    #[inline]
    pub fn temporary(&self) -> &TransactionFunction {
        &self.temporary
    }

    /// Standard deviation of the temporary impact, if modelled.
    #[inline]
    pub fn temporary_volatility(&self) -> Option<&TransactionFunction> {
        self.temporary_volatility.as_ref()
    }
}
