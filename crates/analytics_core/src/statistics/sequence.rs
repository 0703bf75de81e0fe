//! Concentration bounds for sums of unit random sequences.
//!
//! A unit sequence holds draws in `[0, 1]`; its sum `S = Σ Xᵢ` over `n` draws
//! has mean `μ = n·p`. The bounds below cap the upper tail
//! `P(S/n ≥ p + t)` and, for Karp-Hagerup-Rub, the lower tail
//! `P(S/n ≤ p − t)` for a tolerance `t`.
//!
//! The mean `p` is taken from the generating distribution when one is
//! supplied, otherwise from the empirical draws.

use rand::RngCore;
use serde::Serialize;

use super::distributions::R1Distribution;
use crate::types::DistributionError;

/// Upper and lower tail bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TailBounds {
    /// Bound on `P(S ≤ (1 − δ)μ)`.
    pub lower: f64,
    /// Bound on `P(S ≥ (1 + δ)μ)`.
    pub upper: f64,
}

/// Draws in `[0, 1]` with the mean used by the bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSequence {
    draws: Vec<f64>,
    mean: f64,
}

impl UnitSequence {
    /// Build from draws, using the empirical mean.
    pub fn from_draws(draws: Vec<f64>) -> Result<Self, DistributionError> {
        if draws.is_empty() {
            return Err(DistributionError::InsufficientSample { got: 0, need: 1 });
        }
        if let Some(&bad) = draws.iter().find(|x| !(0.0..=1.0).contains(*x)) {
            return Err(DistributionError::InvalidParameter {
                name: "draw",
                value: bad,
            });
        }
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        Ok(Self { draws, mean })
    }

    /// Build from draws with a known population mean.
    pub fn with_population_mean(draws: Vec<f64>, mean: f64) -> Result<Self, DistributionError> {
        if !(mean > 0.0 && mean < 1.0) {
            return Err(DistributionError::InvalidParameter { name: "mean", value: mean });
        }
        let mut sequence = Self::from_draws(draws)?;
        sequence.mean = mean;
        Ok(sequence)
    }

    /// Draw `size` variates from `distribution`. With `use_population` the
    /// bounds use the distribution mean rather than the empirical one.
    pub fn generate<D: R1Distribution + ?Sized>(
        distribution: &D,
        size: usize,
        use_population: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Self, DistributionError> {
        let draws = (0..size)
            .map(|_| distribution.random(rng))
            .collect::<Result<Vec<_>, _>>()?;
        if use_population {
            Self::with_population_mean(draws, distribution.mean())
        } else {
            Self::from_draws(draws)
        }
    }

    /// Number of draws.
    pub fn size(&self) -> usize {
        self.draws.len()
    }

    /// Mean used by the bounds.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// The draws.
    pub fn draws(&self) -> &[f64] {
        &self.draws
    }

    fn check_tolerance(&self, tolerance: f64) -> Result<(), DistributionError> {
        if tolerance > 0.0 && tolerance.is_finite() {
            Ok(())
        } else {
            Err(DistributionError::InvalidParameter {
                name: "tolerance",
                value: tolerance,
            })
        }
    }

    /// Chernoff binomial bound `(p/q)^{nq} ((1−p)/(1−q))^{n(1−q)}` with
    /// `q = p + t`. Returns zero once `q ≥ 1`.
    pub fn chernoff_binomial_upper_bound(&self, tolerance: f64) -> Result<f64, DistributionError> {
        self.check_tolerance(tolerance)?;
        let n = self.size() as f64;
        let p = self.mean;
        let q = p + tolerance;
        if q >= 1.0 {
            return Ok(0.0);
        }
        let log_bound = n * (q * (p / q).ln() + (1.0 - q) * ((1.0 - p) / (1.0 - q)).ln());
        Ok(log_bound.exp().min(1.0))
    }

    /// Poisson-style Chernoff bound `(e^δ / (1+δ)^{1+δ})^μ` with `δ = t/p`.
    pub fn chernoff_poisson_upper_bound(&self, tolerance: f64) -> Result<f64, DistributionError> {
        self.check_tolerance(tolerance)?;
        let mu = self.size() as f64 * self.mean;
        let delta = tolerance / self.mean;
        let log_bound = mu * (delta - (1.0 + delta) * delta.ln_1p());
        Ok(log_bound.exp().min(1.0))
    }

    /// Karp-Hagerup-Rub bounds: upper `exp(−μδ²/(2 + δ))`, lower
    /// `exp(−μδ²/2)` with `δ = t/p`.
    pub fn karp_hagerup_rub_bounds(&self, tolerance: f64) -> Result<TailBounds, DistributionError> {
        self.check_tolerance(tolerance)?;
        let mu = self.size() as f64 * self.mean;
        let delta = tolerance / self.mean;
        let upper = (-mu * delta * delta / (2.0 + delta)).exp().min(1.0);
        let lower = if delta >= 1.0 {
            0.0
        } else {
            (-0.5 * mu * delta * delta).exp()
        };
        Ok(TailBounds { lower, upper })
    }
}
