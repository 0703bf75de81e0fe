//! Modified Bessel function of the first kind.
//!
//! Uses the integral representation valid for `z > 0` and any real order:
//!
//! `I_α(z) = (1/π) ∫₀^π e^{z cos θ} cos(αθ) dθ − (sin(απ)/π) ∫₀^∞ e^{−z cosh t − αt} dt`
//!
//! The second term vanishes for integer orders.

use std::f64::consts::PI;

use crate::math::quadrature::GaussLegendre;
use crate::types::{SolverError, SpecialFunctionError};

/// Quadrature-based estimator of `I_α(z)`.
#[derive(Debug, Clone)]
pub struct ModifiedBesselFirstKind {
    rule: GaussLegendre,
}

/// Exponent at which the tail integrand is considered negligible.
const TAIL_CUTOFF: f64 = 45.0;

impl ModifiedBesselFirstKind {
    /// Build the estimator with a 32-point Gauss-Legendre panel rule.
    pub fn new() -> Result<Self, SolverError> {
        Ok(Self {
            rule: GaussLegendre::new(32)?,
        })
    }

    fn panels<F>(&self, f: F, a: f64, b: f64, count: usize) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let width = (b - a) / count as f64;
        (0..count)
            .map(|i| {
                let lo = a + i as f64 * width;
                self.rule.integrate(&f, lo, lo + width)
            })
            .sum()
    }

    /// Evaluate `I_α(z)` for `z > 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use analytics_core::math::special::ModifiedBesselFirstKind;
    ///
    /// let bessel = ModifiedBesselFirstKind::new().unwrap();
    /// let i0 = bessel.evaluate(0.0, 1.0).unwrap();
    /// assert!((i0 - 1.266_065_877_752_008).abs() < 1e-12);
    /// ```
    pub fn evaluate(&self, alpha: f64, z: f64) -> Result<f64, SpecialFunctionError> {
        if !alpha.is_finite() {
            return Err(SpecialFunctionError::OutOfDomain {
                x: alpha,
                reason: "Bessel order must be finite",
            });
        }
        if !(z > 0.0) || !z.is_finite() {
            return Err(SpecialFunctionError::OutOfDomain {
                x: z,
                reason: "Bessel argument must be positive",
            });
        }

        let angular_panels = 4 + (z.abs() + alpha.abs()) as usize / 4;
        let head = self.panels(
            |theta| (z * theta.cos()).exp() * (alpha * theta).cos(),
            0.0,
            PI,
            angular_panels,
        ) / PI;

        let weight = (alpha * PI).sin();
        if weight.abs() < 1e-15 {
            return Ok(head);
        }

        // Extend the tail until z cosh t + αt reaches the cutoff.
        let mut upper = 1.0_f64;
        while z * upper.cosh() + alpha * upper < TAIL_CUTOFF && upper < 700.0 {
            upper += 1.0;
        }
        let tail = self.panels(
            |t| (-z * t.cosh() - alpha * t).exp(),
            0.0,
            upper,
            upper.ceil() as usize,
        );
        Ok(head - weight / PI * tail)
    }
}
