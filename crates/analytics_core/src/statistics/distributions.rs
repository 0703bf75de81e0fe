//! Univariate probability distributions.
//!
//! All distributions implement [`R1Distribution`]: support, density, CDF,
//! inverse CDF, moments and sampling. The inverse CDF defaults to Brent root
//! finding on the CDF; closed forms override it where available.
//!
//! # Example
//!
//! ```
//! use analytics_core::statistics::{R1Distribution, StretchedExponential};
//!
//! // β = 1 reduces to the exponential distribution
//! let kohlrausch = StretchedExponential::new(1.0, 1.0).unwrap();
//! let p = kohlrausch.cumulative(1.0).unwrap();
//! assert!((p - (1.0 - (-1.0_f64).exp())).abs() < 1e-12);
//! ```

use rand::RngCore;
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal as NormalSampler};

use crate::math::solvers::{BrentSolver, SolverConfig};
use crate::math::special::{gamma, regularized_lower_gamma};
use crate::types::DistributionError;

/// A probability distribution on (a subset of) the real line.
pub trait R1Distribution: Send + Sync {
    /// Closed support `(lower, upper)`; infinite bounds allowed.
    fn support(&self) -> (f64, f64);

    /// Probability density at `x` (zero outside the support).
    fn density(&self, x: f64) -> f64;

    /// Cumulative distribution `P(X ≤ x)`.
    fn cumulative(&self, x: f64) -> Result<f64, DistributionError>;

    /// Mean.
    fn mean(&self) -> f64;

    /// Variance.
    fn variance(&self) -> f64;

    /// Mode.
    fn mode(&self) -> f64;

    /// Quantile for probability `p ∈ (0, 1)`.
    fn inverse_cumulative(&self, p: f64) -> Result<f64, DistributionError> {
        check_probability(p)?;
        let (lower, upper) = self.support();
        let centre = self.mean();
        let spread = self.variance().sqrt().max(1e-8);
        let lo = if lower.is_finite() { lower } else { centre - spread };
        let hi = if upper.is_finite() { upper } else { centre + spread };
        let solver = BrentSolver::new(SolverConfig::new(1e-13, 200));
        let objective = |x: f64| {
            let clamped = x.clamp(lower, upper);
            self.cumulative(clamped).unwrap_or(f64::NAN) - p
        };
        let (a, b) = solver.expand_bracket(&objective, lo, hi)?;
        let root = solver.find_root(objective, a.max(lower), b.min(upper))?;
        Ok(root)
    }

    /// Draw one variate.
    fn random(&self, rng: &mut dyn RngCore) -> Result<f64, DistributionError> {
        let u: f64 = rng.gen_range(f64::EPSILON..1.0);
        self.inverse_cumulative(u)
    }
}

pub(crate) fn check_probability(p: f64) -> Result<(), DistributionError> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(DistributionError::InvalidProbability(p))
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, DistributionError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(DistributionError::InvalidParameter { name, value })
    }
}

/// Uniform distribution on `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    lower: f64,
    upper: f64,
}

impl Uniform {
    /// Build with `lower < upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, DistributionError> {
        if !lower.is_finite() {
            return Err(DistributionError::InvalidParameter {
                name: "lower",
                value: lower,
            });
        }
        if !(upper > lower) || !upper.is_finite() {
            return Err(DistributionError::InvalidParameter {
                name: "upper",
                value: upper,
            });
        }
        Ok(Self { lower, upper })
    }

    /// The unit interval.
    pub fn standard() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
        }
    }
}

impl R1Distribution for Uniform {
    fn support(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    fn density(&self, x: f64) -> f64 {
        if x < self.lower || x > self.upper {
            0.0
        } else {
            1.0 / (self.upper - self.lower)
        }
    }

    fn cumulative(&self, x: f64) -> Result<f64, DistributionError> {
        Ok(((x - self.lower) / (self.upper - self.lower)).clamp(0.0, 1.0))
    }

    fn mean(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }

    fn variance(&self) -> f64 {
        (self.upper - self.lower).powi(2) / 12.0
    }

    fn mode(&self) -> f64 {
        self.mean()
    }

    fn inverse_cumulative(&self, p: f64) -> Result<f64, DistributionError> {
        check_probability(p)?;
        Ok(self.lower + p * (self.upper - self.lower))
    }

    fn random(&self, rng: &mut dyn RngCore) -> Result<f64, DistributionError> {
        Ok(rng.gen_range(self.lower..self.upper))
    }
}

/// Exponential distribution with rate λ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    /// Build with a positive rate.
    pub fn new(rate: f64) -> Result<Self, DistributionError> {
        Ok(Self {
            rate: positive("rate", rate)?,
        })
    }

    /// Rate parameter λ.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl R1Distribution for Exponential {
    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn density(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.rate * (-self.rate * x).exp()
        }
    }

    fn cumulative(&self, x: f64) -> Result<f64, DistributionError> {
        Ok(if x <= 0.0 {
            0.0
        } else {
            -(-self.rate * x).exp_m1()
        })
    }

    fn mean(&self) -> f64 {
        1.0 / self.rate
    }

    fn variance(&self) -> f64 {
        1.0 / (self.rate * self.rate)
    }

    fn mode(&self) -> f64 {
        0.0
    }

    fn inverse_cumulative(&self, p: f64) -> Result<f64, DistributionError> {
        check_probability(p)?;
        Ok(-(-p).ln_1p() / self.rate)
    }

    fn random(&self, rng: &mut dyn RngCore) -> Result<f64, DistributionError> {
        let sampler = Exp::new(self.rate).map_err(|_| DistributionError::InvalidParameter {
            name: "rate",
            value: self.rate,
        })?;
        Ok(sampler.sample(rng))
    }
}

/// Normal distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    mean: f64,
    sigma: f64,
}

impl Normal {
    /// Build with a positive standard deviation.
    pub fn new(mean: f64, sigma: f64) -> Result<Self, DistributionError> {
        if !mean.is_finite() {
            return Err(DistributionError::InvalidParameter {
                name: "mean",
                value: mean,
            });
        }
        Ok(Self {
            mean,
            sigma: positive("sigma", sigma)?,
        })
    }

    /// Standard normal N(0, 1).
    pub fn standard() -> Self {
        Self {
            mean: 0.0,
            sigma: 1.0,
        }
    }
}

/// Standard normal CDF Φ(x) through `erf(x/√2) = P(1/2, x²/2)`.
pub fn norm_cdf(x: f64) -> Result<f64, DistributionError> {
    if x.is_nan() {
        return Err(DistributionError::InvalidParameter {
            name: "x",
            value: x,
        });
    }
    let half_erf = 0.5 * regularized_lower_gamma(0.5, 0.5 * x * x)?;
    Ok(if x >= 0.0 { 0.5 + half_erf } else { 0.5 - half_erf })
}

/// Standard normal density φ(x).
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

impl R1Distribution for Normal {
    fn support(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }

    fn density(&self, x: f64) -> f64 {
        norm_pdf((x - self.mean) / self.sigma) / self.sigma
    }

    fn cumulative(&self, x: f64) -> Result<f64, DistributionError> {
        norm_cdf((x - self.mean) / self.sigma)
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    fn mode(&self) -> f64 {
        self.mean
    }

    fn random(&self, rng: &mut dyn RngCore) -> Result<f64, DistributionError> {
        let sampler = NormalSampler::new(self.mean, self.sigma).map_err(|_| {
            DistributionError::InvalidParameter {
                name: "sigma",
                value: self.sigma,
            }
        })?;
        Ok(sampler.sample(rng))
    }
}

/// Kohlrausch stretched exponential distribution on `[0, ∞)`.
///
/// Density `β / (τ Γ(1/β)) · exp(−(t/τ)^β)`; the CDF is the regularised lower
/// incomplete gamma `P(1/β, (t/τ)^β)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchedExponential {
    tau: f64,
    beta: f64,
    normalizer: f64,
}

impl StretchedExponential {
    /// Build from the characteristic time τ and stretching exponent β.
    pub fn new(tau: f64, beta: f64) -> Result<Self, DistributionError> {
        let tau = positive("tau", tau)?;
        let beta = positive("beta", beta)?;
        let normalizer = beta / (tau * gamma(1.0 / beta)?);
        Ok(Self {
            tau,
            beta,
            normalizer,
        })
    }

    /// Stretching exponent β.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Characteristic time τ.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    fn moment(&self, k: f64) -> f64 {
        let g = |x: f64| gamma(x).unwrap_or(f64::NAN);
        self.tau.powf(k) * g((k + 1.0) / self.beta) / g(1.0 / self.beta)
    }
}

impl R1Distribution for StretchedExponential {
    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn density(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        self.normalizer * (-(t / self.tau).powf(self.beta)).exp()
    }

    fn cumulative(&self, t: f64) -> Result<f64, DistributionError> {
        if t <= 0.0 {
            return Ok(0.0);
        }
        Ok(regularized_lower_gamma(
            1.0 / self.beta,
            (t / self.tau).powf(self.beta),
        )?)
    }

    fn mean(&self) -> f64 {
        self.moment(1.0)
    }

    fn variance(&self) -> f64 {
        self.moment(2.0) - self.moment(1.0).powi(2)
    }

    fn mode(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::quadrature::simpson;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_norm_cdf_values() {
        assert_abs_diff_eq!(norm_cdf(0.0).unwrap(), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_cdf(1.96).unwrap(), 0.975_002_104_851_780, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_cdf(-1.0).unwrap(), 0.158_655_253_931_457, epsilon = 1e-12);
    }

    #[test]
    fn test_normal_inverse_roundtrip() {
        let n = Normal::new(1.0, 2.0).unwrap();
        for p in [0.01, 0.3, 0.5, 0.9] {
            let x = n.inverse_cumulative(p).unwrap();
            assert_abs_diff_eq!(n.cumulative(x).unwrap(), p, epsilon = 1e-10);
        }
        assert!(n.inverse_cumulative(1.0).is_err());
    }

    #[test]
    fn test_exponential_closed_forms() {
        let e = Exponential::new(2.0).unwrap();
        assert_relative_eq!(e.mean(), 0.5);
        assert_relative_eq!(e.inverse_cumulative(0.5).unwrap(), 2.0_f64.ln() / 2.0);
        assert!(Exponential::new(0.0).is_err());
    }

    #[test]
    fn test_uniform() {
        let u = Uniform::new(2.0, 6.0).unwrap();
        assert_eq!(u.cumulative(1.0).unwrap(), 0.0);
        assert_eq!(u.cumulative(4.0).unwrap(), 0.5);
        assert_eq!(u.density(7.0), 0.0);
        assert_relative_eq!(u.variance(), 16.0 / 12.0);
        assert!(Uniform::new(1.0, 1.0).is_err());
    }

    #[test]
    fn test_stretched_exponential_normalised() {
        for beta in [0.3, 0.6, 1.0, 2.0] {
            let d = StretchedExponential::new(1.0, beta).unwrap();
            let upper = 60.0_f64.powf(1.0 / beta);
            let mass = d.cumulative(upper).unwrap();
            assert_abs_diff_eq!(mass, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_stretched_exponential_cdf_matches_density() {
        let d = StretchedExponential::new(1.5, 0.7).unwrap();
        let integral = simpson(|t| d.density(t), 0.0, 2.0, 2000);
        assert_abs_diff_eq!(integral, d.cumulative(2.0).unwrap(), epsilon = 1e-4);
    }

    #[test]
    fn test_stretched_exponential_inverse() {
        let d = StretchedExponential::new(1.0, 0.5).unwrap();
        for p in [0.05, 0.25, 0.45] {
            let t = d.inverse_cumulative(p).unwrap();
            assert_abs_diff_eq!(d.cumulative(t).unwrap(), p, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_stretched_exponential_moments_at_beta_one() {
        let d = StretchedExponential::new(2.0, 1.0).unwrap();
        assert_relative_eq!(d.mean(), 2.0, max_relative = 1e-12);
        assert_relative_eq!(d.variance(), 4.0, max_relative = 1e-10);
    }

    #[test]
    fn test_random_sample_mean() {
        let mut rng = StdRng::seed_from_u64(42);
        let d = Exponential::new(1.0).unwrap();
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| d.random(&mut rng).unwrap()).sum::<f64>() / n as f64;
        assert_abs_diff_eq!(mean, 1.0, epsilon = 0.05);
    }
}
