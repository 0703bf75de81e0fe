//! Gamma function estimators.
//!
//! - [`gamma`] / [`ln_gamma`]: Lanczos approximation (g = 7, nine terms)
//! - [`nemes_gamma`]: Nemes' closed-form asymptotic estimate
//! - [`EulerIntegralEstimator`]: quadrature of the Euler integral of the second
//!   kind, including derivatives of any order
//! - [`factorial`] and [`pole_residue`]
//!
//! Non-positive integers are poles and yield [`SpecialFunctionError::Pole`].

use std::f64::consts::{E, PI};

use crate::math::quadrature::GaussLaguerre;
use crate::types::{SolverError, SpecialFunctionError};

const LANCZOS_G: f64 = 7.0;

const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

fn check_pole(s: f64) -> Result<(), SpecialFunctionError> {
    if !s.is_finite() {
        return Err(SpecialFunctionError::OutOfDomain {
            x: s,
            reason: "argument must be finite",
        });
    }
    if s <= 0.0 && s == s.round() {
        return Err(SpecialFunctionError::Pole { s });
    }
    Ok(())
}

fn lanczos_sum(x: f64) -> f64 {
    LANCZOS_COEFFICIENTS[1..]
        .iter()
        .enumerate()
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, &c)| {
            acc + c / (x + i as f64 + 1.0)
        })
}

/// Γ(s) by the Lanczos approximation, with reflection below one half.
///
/// # Examples
///
/// ```
/// use analytics_core::math::special::gamma;
///
/// assert!((gamma(0.5).unwrap() - std::f64::consts::PI.sqrt()).abs() < 1e-13);
/// assert!(gamma(-2.0).is_err());
/// ```
pub fn gamma(s: f64) -> Result<f64, SpecialFunctionError> {
    check_pole(s)?;
    if s < 0.5 {
        return Ok(PI / ((PI * s).sin() * gamma(1.0 - s)?));
    }
    let x = s - 1.0;
    let t = x + LANCZOS_G + 0.5;
    Ok((2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * lanczos_sum(x))
}

/// ln Γ(s) for `s > 0`.
pub fn ln_gamma(s: f64) -> Result<f64, SpecialFunctionError> {
    if !(s > 0.0) || !s.is_finite() {
        return Err(SpecialFunctionError::OutOfDomain {
            x: s,
            reason: "ln_gamma requires a positive argument",
        });
    }
    if s < 0.5 {
        return Ok((PI / (PI * s).sin()).ln() - ln_gamma(1.0 - s)?);
    }
    let x = s - 1.0;
    let t = x + LANCZOS_G + 0.5;
    Ok(0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + lanczos_sum(x).ln())
}

/// Nemes' estimate `√(2π/z) · ((z + 1/(12z − 1/(10z))) / e)^z`.
///
/// Relative error falls below 1e-7 for `z ≥ 8`.
pub fn nemes_gamma(z: f64) -> Result<f64, SpecialFunctionError> {
    if !(z > 0.0) || !z.is_finite() {
        return Err(SpecialFunctionError::OutOfDomain {
            x: z,
            reason: "Nemes estimate requires a positive argument",
        });
    }
    let shifted = z + 1.0 / (12.0 * z - 1.0 / (10.0 * z));
    Ok((2.0 * PI / z).sqrt() * (shifted / E).powf(z))
}

/// `n!` as a floating point number.
pub fn factorial(n: u32) -> f64 {
    (1..=n).map(f64::from).product()
}

/// Residue of Γ at the pole `s = −n`: `(−1)^n / n!`.
pub fn pole_residue(n: u32) -> f64 {
    let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
    sign / factorial(n)
}

/// Euler integral of the second kind `Γ^{(n)}(s) = ∫₀^∞ (ln t)^n t^{s−1} e^{−t} dt`
/// evaluated by Gauss-Laguerre quadrature.
///
/// The integral is split at `t = 1`. On `[0, 1]` the substitution
/// `t = e^{−z/s}` maps onto a Laguerre weight; on `[1, ∞)` the shift
/// `t = 1 + x` does the same.
#[derive(Debug, Clone)]
pub struct EulerIntegralEstimator {
    laguerre: GaussLaguerre,
}

impl EulerIntegralEstimator {
    /// Default quadrature order.
    pub const DEFAULT_ORDER: usize = 48;

    /// Build an estimator with `order` Laguerre nodes.
    pub fn new(order: usize) -> Result<Self, SolverError> {
        Ok(Self {
            laguerre: GaussLaguerre::new(order)?,
        })
    }

    /// Build an estimator with [`DEFAULT_ORDER`](Self::DEFAULT_ORDER) nodes.
    pub fn with_defaults() -> Result<Self, SolverError> {
        Self::new(Self::DEFAULT_ORDER)
    }

    fn integral(&self, s: f64, n: i32) -> f64 {
        let head = self.laguerre.integrate(|z| {
            let y = z / s;
            (-y).powi(n) * (-(-y).exp()).exp()
        }) / s;
        let tail = self
            .laguerre
            .integrate(|x| (1.0 + x).ln().powi(n) * (1.0 + x).powf(s - 1.0))
            / E;
        head + tail
    }

    /// Γ(s). Arguments are shifted into `[1, 2)` by the recurrence
    /// `Γ(s + 1) = sΓ(s)` before integration.
    pub fn evaluate(&self, s: f64) -> Result<f64, SpecialFunctionError> {
        check_pole(s)?;
        let mut x = s;
        let mut factor = 1.0;
        while x < 1.0 {
            factor /= x;
            x += 1.0;
        }
        while x >= 2.0 {
            x -= 1.0;
            factor *= x;
        }
        Ok(factor * self.integral(x, 0))
    }

    /// n-th derivative of Γ at `s > 0`.
    pub fn derivative(&self, s: f64, order: u32) -> Result<f64, SpecialFunctionError> {
        if !(s > 0.0) || !s.is_finite() {
            return Err(SpecialFunctionError::OutOfDomain {
                x: s,
                reason: "Euler integral derivatives require a positive argument",
            });
        }
        let n = i32::try_from(order).map_err(|_| SpecialFunctionError::OutOfDomain {
            x: f64::from(order),
            reason: "derivative order too large",
        })?;
        Ok(self.integral(s, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;

    const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

    #[test]
    fn test_gamma_integers() {
        for n in 1..15u32 {
            assert_relative_eq!(gamma(f64::from(n) + 1.0).unwrap(), factorial(n), max_relative = 1e-13);
        }
    }

    #[test]
    fn test_gamma_negative_half() {
        // Γ(-1/2) = -2√π
        assert_relative_eq!(gamma(-0.5).unwrap(), -2.0 * PI.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_gamma_poles() {
        assert_eq!(gamma(0.0), Err(SpecialFunctionError::Pole { s: 0.0 }));
        assert!(matches!(gamma(-3.0), Err(SpecialFunctionError::Pole { .. })));
    }

    #[test]
    fn test_ln_gamma_matches_gamma() {
        for s in [0.1, 0.7, 3.3, 20.5] {
            assert_relative_eq!(ln_gamma(s).unwrap(), gamma(s).unwrap().ln(), max_relative = 1e-12);
        }
        assert!(ln_gamma(-1.0).is_err());
    }

    #[test]
    fn test_nemes_large_arguments() {
        for z in [8.0, 12.5, 30.0] {
            assert_relative_eq!(nemes_gamma(z).unwrap(), gamma(z).unwrap(), max_relative = 1e-7);
        }
    }

    #[test]
    fn test_pole_residue() {
        assert_eq!(pole_residue(0), 1.0);
        assert_eq!(pole_residue(1), -1.0);
        assert_relative_eq!(pole_residue(3), -1.0 / 6.0);
    }

    #[test]
    fn test_residue_matches_limit() {
        // (s + 2) Γ(s) → Res_{s=-2} as s → -2
        let h = 1e-7;
        let s = -2.0 + h;
        assert_relative_eq!(h * gamma(s).unwrap(), pole_residue(2), max_relative = 1e-5);
    }

    #[test]
    fn test_euler_integral_values() {
        let estimator = EulerIntegralEstimator::with_defaults().unwrap();
        for s in [0.3, 0.5, 1.0, 1.7, 4.2, 9.0, -1.5] {
            assert_relative_eq!(
                estimator.evaluate(s).unwrap(),
                gamma(s).unwrap(),
                max_relative = 1e-6
            );
        }
    }

    #[test]
    fn test_euler_integral_derivatives_at_one() {
        let estimator = EulerIntegralEstimator::with_defaults().unwrap();
        assert_abs_diff_eq!(
            estimator.derivative(1.0, 1).unwrap(),
            -EULER_MASCHERONI,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            estimator.derivative(1.0, 2).unwrap(),
            EULER_MASCHERONI.powi(2) + PI * PI / 6.0,
            epsilon = 1e-5
        );
        assert!(estimator.derivative(0.0, 1).is_err());
    }

    proptest! {
        #[test]
        fn prop_gamma_recurrence(s in 0.05f64..25.0) {
            let lhs = gamma(s + 1.0).unwrap();
            let rhs = s * gamma(s).unwrap();
            prop_assert!((lhs - rhs).abs() <= 1e-11 * lhs.abs());
        }
    }
}
