//! Normed function spaces.
//!
//! A [`NormedFunctionSpace`] pairs a real-valued function with an Lp norm.
//! Sample norms are taken over explicit points; population norms are taken
//! against the input measure: a probability distribution for
//! [`NormedR1ToR1`], an empirical point cloud for [`NormedRdToR1`].
//! Covering numbers are the norm divided by the cover radius.

use crate::math::quadrature::GaussLegendre;
use crate::statistics::R1Distribution;
use crate::types::DistributionError;

/// Lp exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PNorm {
    /// Finite `p ≥ 1`.
    Finite(u32),
    /// `p = ∞`.
    Supremum,
}

impl PNorm {
    fn combine<I: Iterator<Item = f64>>(self, values: I, weight: f64) -> f64 {
        match self {
            PNorm::Supremum => values.map(f64::abs).fold(0.0, f64::max),
            PNorm::Finite(p) => {
                let p = f64::from(p.max(1));
                (weight * values.map(|v| v.abs().powf(p)).sum::<f64>()).powf(1.0 / p)
            }
        }
    }
}

fn check_cover(cover: f64) -> Result<(), DistributionError> {
    if cover > 0.0 && cover.is_finite() {
        Ok(())
    } else {
        Err(DistributionError::InvalidParameter { name: "cover", value: cover })
    }
}

/// A function with a norm over its inputs.
pub trait NormedFunctionSpace {
    /// Input point.
    type Point;

    /// Function value at `x`.
    fn apply(&self, x: &Self::Point) -> f64;

    /// Norm exponent.
    fn p_norm(&self) -> PNorm;

    /// Population Lp norm against the input measure.
    fn population_metric_norm(&self) -> Result<f64, DistributionError>;

    /// `|f|` at the population mode.
    fn population_ess(&self) -> f64;

    /// `max |f(x)|` over `samples`.
    fn sample_supremum_norm(&self, samples: &[Self::Point]) -> Result<f64, DistributionError> {
        if samples.is_empty() {
            return Err(DistributionError::InsufficientSample { got: 0, need: 1 });
        }
        Ok(PNorm::Supremum.combine(samples.iter().map(|x| self.apply(x)), 1.0))
    }

    /// `(Σ |f(x)|^p)^{1/p}` over `samples`, or the supremum for `p = ∞`.
    fn sample_metric_norm(&self, samples: &[Self::Point]) -> Result<f64, DistributionError> {
        if samples.is_empty() {
            return Err(DistributionError::InsufficientSample { got: 0, need: 1 });
        }
        Ok(self.p_norm().combine(samples.iter().map(|x| self.apply(x)), 1.0))
    }

    /// Sample metric norm per unit cover.
    fn sample_covering_number(&self, samples: &[Self::Point], cover: f64) -> Result<f64, DistributionError> {
        check_cover(cover)?;
        Ok(self.sample_metric_norm(samples)? / cover)
    }

    /// Sample supremum norm per unit cover.
    fn sample_supremum_covering_number(
        &self,
        samples: &[Self::Point],
        cover: f64,
    ) -> Result<f64, DistributionError> {
        check_cover(cover)?;
        Ok(self.sample_supremum_norm(samples)? / cover)
    }

    /// Population supremum norm, the essential value at the mode.
    fn population_supremum_metric_norm(&self) -> f64 {
        self.population_ess()
    }

    /// Population metric norm per unit cover.
    fn population_covering_number(&self, cover: f64) -> Result<f64, DistributionError> {
        check_cover(cover)?;
        Ok(self.population_metric_norm()? / cover)
    }

    /// Population supremum norm per unit cover.
    fn population_supremum_covering_number(&self, cover: f64) -> Result<f64, DistributionError> {
        check_cover(cover)?;
        Ok(self.population_supremum_metric_norm() / cover)
    }
}

/// Boxed scalar function of one variable.
pub type R1Function = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Boxed scalar function of a vector.
pub type RdFunction = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// `f: R → R` normed against a distribution.
pub struct NormedR1ToR1 {
    function: R1Function,
    distribution: Box<dyn R1Distribution>,
    p_norm: PNorm,
    quadrature: GaussLegendre,
}

impl std::fmt::Debug for NormedR1ToR1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormedR1ToR1")
            .field("p_norm", &self.p_norm)
            .field("support", &self.distribution.support())
            .finish_non_exhaustive()
    }
}

impl NormedR1ToR1 {
    /// Quadrature order of the population norm.
    pub const QUADRATURE_ORDER: usize = 64;

    /// Build from a function, its input distribution and a norm.
    pub fn new(
        function: R1Function,
        distribution: Box<dyn R1Distribution>,
        p_norm: PNorm,
    ) -> Result<Self, DistributionError> {
        Ok(Self {
            function,
            distribution,
            p_norm,
            quadrature: GaussLegendre::new(Self::QUADRATURE_ORDER)?,
        })
    }

    /// Input distribution.
    pub fn distribution(&self) -> &dyn R1Distribution {
        self.distribution.as_ref()
    }
}

impl NormedFunctionSpace for NormedR1ToR1 {
    type Point = f64;

    fn apply(&self, x: &f64) -> f64 {
        (self.function)(*x)
    }

    fn p_norm(&self) -> PNorm {
        self.p_norm
    }

    /// `(∫₀¹ |f(F⁻¹(u))|^p du)^{1/p}`; the quantile substitution keeps the
    /// integration interval finite for any support.
    fn population_metric_norm(&self) -> Result<f64, DistributionError> {
        let PNorm::Finite(p) = self.p_norm else {
            return Ok(self.population_ess());
        };
        let p = f64::from(p.max(1));
        let mut total = 0.0;
        for (&node, &weight) in self.quadrature.nodes().iter().zip(self.quadrature.weights()) {
            let u = 0.5 * (node + 1.0);
            let x = self.distribution.inverse_cumulative(u)?;
            total += 0.5 * weight * (self.function)(x).abs().powf(p);
        }
        Ok(total.powf(1.0 / p))
    }

    fn population_ess(&self) -> f64 {
        (self.function)(self.distribution.mode()).abs()
    }
}

/// `f: Rᵈ → R` normed against an empirical population.
pub struct NormedRdToR1 {
    dimension: usize,
    function: RdFunction,
    population: Vec<Vec<f64>>,
    mode: Vec<f64>,
    p_norm: PNorm,
}

impl std::fmt::Debug for NormedRdToR1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormedRdToR1")
            .field("dimension", &self.dimension)
            .field("population", &self.population.len())
            .field("p_norm", &self.p_norm)
            .finish_non_exhaustive()
    }
}

impl NormedRdToR1 {
    /// Build from a function on `dimension`-vectors, a population and its mode.
    pub fn new(
        dimension: usize,
        function: RdFunction,
        population: Vec<Vec<f64>>,
        mode: Vec<f64>,
        p_norm: PNorm,
    ) -> Result<Self, DistributionError> {
        if dimension == 0 || population.is_empty() {
            return Err(DistributionError::InsufficientSample {
                got: population.len(),
                need: 1,
            });
        }
        if let Some(bad) = population.iter().chain(std::iter::once(&mode)).find(|x| x.len() != dimension) {
            return Err(crate::types::LinalgError::DimensionMismatch {
                expected: dimension,
                got: bad.len(),
            }
            .into());
        }
        Ok(Self {
            dimension,
            function,
            population,
            mode,
            p_norm,
        })
    }

    /// Input dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl NormedFunctionSpace for NormedRdToR1 {
    type Point = Vec<f64>;

    fn apply(&self, x: &Vec<f64>) -> f64 {
        (self.function)(x.as_slice())
    }

    fn p_norm(&self) -> PNorm {
        self.p_norm
    }

    /// Lp norm under the empirical measure of the population.
    fn population_metric_norm(&self) -> Result<f64, DistributionError> {
        let weight = 1.0 / self.population.len() as f64;
        Ok(self
            .p_norm
            .combine(self.population.iter().map(|x| (self.function)(x.as_slice())), weight))
    }

    fn population_ess(&self) -> f64 {
        (self.function)(self.mode.as_slice()).abs()
    }
}

/// A finite class of normed functions with a Maurey constant.
#[derive(Debug)]
pub struct FiniteFunctionClass<S> {
    maurey_constant: f64,
    members: Vec<S>,
}

impl<S: NormedFunctionSpace> FiniteFunctionClass<S> {
    /// Build from a non-empty member list.
    pub fn new(maurey_constant: f64, members: Vec<S>) -> Result<Self, DistributionError> {
        if members.is_empty() {
            return Err(DistributionError::InsufficientSample { got: 0, need: 1 });
        }
        if !(maurey_constant > 0.0) {
            return Err(DistributionError::InvalidParameter {
                name: "maurey_constant",
                value: maurey_constant,
            });
        }
        Ok(Self {
            maurey_constant,
            members,
        })
    }

    /// Maurey constant.
    pub fn maurey_constant(&self) -> f64 {
        self.maurey_constant
    }

    /// Number of members.
    pub fn cardinality(&self) -> usize {
        self.members.len()
    }

    /// Members.
    pub fn members(&self) -> &[S] {
        &self.members
    }

    /// Largest sample supremum norm across members.
    pub fn sample_supremum_norm(&self, samples: &[S::Point]) -> Result<f64, DistributionError> {
        self.members
            .iter()
            .map(|m| m.sample_supremum_norm(samples))
            .try_fold(0.0, |acc, n| n.map(|n| f64::max(acc, n)))
    }

    /// Largest population supremum norm across members.
    pub fn population_supremum_norm(&self) -> f64 {
        self.members
            .iter()
            .map(|m| m.population_supremum_metric_norm())
            .fold(0.0, f64::max)
    }

    /// Log covering number bound at radius `cover`:
    /// `min(ln |F|, (C·B/cover)² ln |F|)` with `B` the population supremum norm.
    pub fn log_covering_number_bound(&self, cover: f64) -> Result<f64, DistributionError> {
        check_cover(cover)?;
        let ln_card = (self.cardinality() as f64).ln();
        let scale = self.maurey_constant * self.population_supremum_norm() / cover;
        Ok(ln_card.min(scale * scale * ln_card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::{Normal, Uniform};
    use approx::assert_relative_eq;

    fn square_on_unit() -> NormedR1ToR1 {
        NormedR1ToR1::new(Box::new(|x| x * x), Box::new(Uniform::standard()), PNorm::Finite(2)).unwrap()
    }

    #[test]
    fn test_sample_norms() {
        let space = square_on_unit();
        let samples = [0.5, -1.0, 2.0];
        assert_relative_eq!(space.sample_supremum_norm(&samples).unwrap(), 4.0);
        let l2 = (0.0625_f64 + 1.0 + 16.0).sqrt();
        assert_relative_eq!(space.sample_metric_norm(&samples).unwrap(), l2);
        assert_relative_eq!(space.sample_covering_number(&samples, 2.0).unwrap(), l2 / 2.0);
        assert!(space.sample_covering_number(&samples, 0.0).is_err());
        assert!(space.sample_metric_norm(&[]).is_err());
    }

    #[test]
    fn test_population_norm_uniform() {
        // ∫₀¹ x⁴ dx = 1/5
        let space = square_on_unit();
        assert_relative_eq!(space.population_metric_norm().unwrap(), 0.2_f64.sqrt(), max_relative = 1e-10);
        assert_relative_eq!(space.population_ess(), 0.25);
    }

    #[test]
    fn test_population_norm_normal() {
        // E[X²] = 1 for a standard normal
        let space = NormedR1ToR1::new(Box::new(|x| x), Box::new(Normal::standard()), PNorm::Finite(2)).unwrap();
        assert_relative_eq!(space.population_metric_norm().unwrap(), 1.0, max_relative = 2e-2);
        assert_eq!(space.population_supremum_covering_number(1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_rd_space() {
        let population = vec![vec![1.0, 0.0], vec![0.0, 2.0]];
        let space = NormedRdToR1::new(
            2,
            Box::new(|x: &[f64]| x[0] + x[1]),
            population,
            vec![1.0, 1.0],
            PNorm::Finite(1),
        )
        .unwrap();
        assert_relative_eq!(space.population_metric_norm().unwrap(), 1.5);
        assert_relative_eq!(space.population_supremum_metric_norm(), 2.0);
        assert!(NormedRdToR1::new(3, Box::new(|_: &[f64]| 0.0), vec![vec![1.0]], vec![0.0; 3], PNorm::Supremum).is_err());
    }

    #[test]
    fn test_finite_class_bound() {
        let members = (1..=4)
            .map(|k| {
                let k = f64::from(k);
                NormedR1ToR1::new(Box::new(move |x| k * x), Box::new(Uniform::standard()), PNorm::Supremum)
                    .unwrap()
            })
            .collect();
        let class = FiniteFunctionClass::new(1.0, members).unwrap();
        assert_eq!(class.cardinality(), 4);
        assert_relative_eq!(class.population_supremum_norm(), 2.0);
        assert_relative_eq!(class.sample_supremum_norm(&[1.0, -3.0]).unwrap(), 12.0);
        let ln4 = 4.0_f64.ln();
        assert_relative_eq!(class.log_covering_number_bound(4.0).unwrap(), 0.25 * ln4);
        assert_relative_eq!(class.log_covering_number_bound(0.5).unwrap(), ln4);
    }
}
