//! Arithmetic price dynamics.
//!
//! The unaffected price follows `dS = α dt + σ(t) dW`. Market impact is
//! layered on top by [`PriceEvolutionParameters`], which pairs the dynamics
//! with a [`PriceMarketImpact`].

use serde::Serialize;

use crate::error::{check_finite, check_non_negative, check_positive, ExecutionError};
use crate::impact::PriceMarketImpact;

/// Price volatility as a function of time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum VolatilityFunction {
    /// Constant σ.
    Flat(f64),
    /// σ(t) = initial + slope·t.
    Linear {
        /// Volatility at t = 0
        initial: f64,
        /// Change per unit time
        slope: f64,
    },
}

impl VolatilityFunction {
    /// σ(t).
    pub fn evaluate(&self, t: f64) -> f64 {
        match *self {
            Self::Flat(sigma) => sigma,
            Self::Linear { initial, slope } => (initial + slope * t).abs(),
        }
    }

    /// ∫₀ᵗ σ(s)² ds.
    pub fn integrated_variance(&self, t: f64) -> f64 {
        match *self {
            Self::Flat(sigma) => sigma * sigma * t,
            Self::Linear { initial, slope } => {
                initial * initial * t + initial * slope * t * t + slope * slope * t.powi(3) / 3.0
            }
        }
    }

    fn validate(&self) -> Result<(), ExecutionError> {
        match *self {
            Self::Flat(sigma) => check_non_negative("volatility", sigma).map(|_| ()),
            Self::Linear { initial, slope } => {
                check_non_negative("volatility", initial)?;
                check_finite("volatility_slope", slope).map(|_| ())
            }
        }
    }
}

/// Arithmetic Brownian motion with drift for the unaffected price.
///
/// # Examples
/// ```
/// use analytics_execution::dynamics::ArithmeticPriceDynamics;
///
/// let dynamics = ArithmeticPriceDynamics::flat(50.0, 0.1, 1.0).unwrap();
/// assert!((dynamics.expectation(2.0) - 50.2).abs() < 1e-12);
/// assert_eq!(dynamics.variance(2.0), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArithmeticPriceDynamics {
    initial_price: f64,
    drift: f64,
    volatility: VolatilityFunction,
}

impl ArithmeticPriceDynamics {
    /// Creates the dynamics.
    ///
    /// # Errors
    /// `InvalidParameter` for a non-positive price, non-finite drift or
    /// negative volatility.
    pub fn new(
        initial_price: f64,
        drift: f64,
        volatility: VolatilityFunction,
    ) -> Result<Self, ExecutionError> {
        check_positive("initial_price", initial_price)?;
        check_finite("drift", drift)?;
        volatility.validate()?;
        Ok(Self {
            initial_price,
            drift,
            volatility,
        })
    }

    /// Constant-volatility dynamics.
    pub fn flat(initial_price: f64, drift: f64, sigma: f64) -> Result<Self, ExecutionError> {
        Self::new(initial_price, drift, VolatilityFunction::Flat(sigma))
    }

    /// Initial price S₀.
    #[inline]
    pub fn initial_price(&self) -> f64 {
        self.initial_price
    }

    /// Drift α per unit time.
    #[inline]
    pub fn drift(&self) -> f64 {
        self.drift
    }

    /// Volatility function.
    #[inline]
    pub fn volatility_function(&self) -> VolatilityFunction {
        self.volatility
    }

    /// σ(t).
    pub fn volatility(&self, t: f64) -> f64 {
        self.volatility.evaluate(t)
    }

    /// σ at the start of the execution.
    pub fn epoch_volatility(&self) -> f64 {
        self.volatility.evaluate(0.0)
    }

    /// E[S(t)] = S₀ + αt.
    pub fn expectation(&self, t: f64) -> f64 {
        self.initial_price + self.drift * t
    }

    /// Var[S(t)].
    pub fn variance(&self, t: f64) -> f64 {
        self.volatility.integrated_variance(t)
    }

    /// Price variance accumulated over `[start, end]`.
    pub fn interval_variance(&self, start: f64, end: f64) -> f64 {
        self.variance(end) - self.variance(start)
    }
}

/// Price dynamics together with the market impact of the trader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceEvolutionParameters {
    dynamics: ArithmeticPriceDynamics,
    impact: PriceMarketImpact,
}

impl PriceEvolutionParameters {
    /// Pairs dynamics and impact.
    pub fn new(dynamics: ArithmeticPriceDynamics, impact: PriceMarketImpact) -> Self {
        Self { dynamics, impact }
    }

    /// Unaffected price dynamics.
    #[inline]
    pub fn dynamics(&self) -> &ArithmeticPriceDynamics {
        &self.dynamics
    }

    /// Market impact functions.
    #[inline]
    pub fn impact(&self) -> &PriceMarketImpact {
        &self.impact
    }

    /// Slope γ of a linear permanent impact.
    ///
    /// # Errors
    /// `UnsupportedImpact` when the permanent impact is not linear.
    pub fn permanent_slope(&self) -> Result<f64, ExecutionError> {
        let permanent = self.impact.permanent();
        if permanent.is_linear() {
            Ok(permanent.coefficient())
        } else {
            Err(ExecutionError::UnsupportedImpact(
                "permanent impact must be linear",
            ))
        }
    }
}
