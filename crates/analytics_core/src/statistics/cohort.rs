//! Labelled cohorts of normal increments.
//!
//! Each risk factor receives `vertex_count` increments
//! `μ·dt + σ·√dt·Z` over a horizon split into equal steps. Correlated cohorts
//! draw `Z` through the Cholesky factor of the supplied correlation matrix.

use std::collections::BTreeMap;

use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};

use super::gap_test::Sample;
use crate::math::linalg::{cholesky_banachiewicz, product_matrix_vector};
use crate::types::{DistributionError, LinalgError};

/// Increments per labelled risk factor.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalSampleCohort {
    paths: BTreeMap<String, Vec<f64>>,
}

/// Parameters shared by every factor of a cohort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortGrid {
    /// Increments per factor.
    pub vertex_count: usize,
    /// Horizon in years.
    pub horizon: f64,
}

fn check_factors(
    labels: &[String],
    means: &[f64],
    volatilities: &[f64],
    grid: CohortGrid,
) -> Result<(), DistributionError> {
    if labels.is_empty() || grid.vertex_count == 0 {
        return Err(DistributionError::InsufficientSample { got: 0, need: 1 });
    }
    for other in [means.len(), volatilities.len()] {
        if other != labels.len() {
            return Err(LinalgError::DimensionMismatch {
                expected: labels.len(),
                got: other,
            }
            .into());
        }
    }
    if !(grid.horizon > 0.0) {
        return Err(DistributionError::InvalidParameter {
            name: "horizon",
            value: grid.horizon,
        });
    }
    if let Some(&bad) = volatilities.iter().find(|v| !(**v >= 0.0)) {
        return Err(DistributionError::InvalidParameter {
            name: "volatility",
            value: bad,
        });
    }
    Ok(())
}

impl NormalSampleCohort {
    /// Independent increments per factor.
    pub fn independent(
        labels: &[String],
        means: &[f64],
        volatilities: &[f64],
        grid: CohortGrid,
        rng: &mut dyn RngCore,
    ) -> Result<Self, DistributionError> {
        check_factors(labels, means, volatilities, grid)?;
        let dt = grid.horizon / grid.vertex_count as f64;
        let paths = labels
            .iter()
            .zip(means.iter().zip(volatilities))
            .map(|(label, (&mu, &sigma))| {
                let path = (0..grid.vertex_count)
                    .map(|_| {
                        let z: f64 = StandardNormal.sample(rng);
                        mu * dt + sigma * dt.sqrt() * z
                    })
                    .collect();
                (label.clone(), path)
            })
            .collect();
        Ok(Self { paths })
    }

    /// Increments correlated through `correlation`.
    pub fn correlated(
        labels: &[String],
        means: &[f64],
        volatilities: &[f64],
        correlation: &[Vec<f64>],
        grid: CohortGrid,
        rng: &mut dyn RngCore,
    ) -> Result<Self, DistributionError> {
        check_factors(labels, means, volatilities, grid)?;
        if correlation.len() != labels.len() {
            return Err(LinalgError::DimensionMismatch {
                expected: labels.len(),
                got: correlation.len(),
            }
            .into());
        }
        let factor = cholesky_banachiewicz(correlation)?;
        let dt = grid.horizon / grid.vertex_count as f64;
        let mut paths: Vec<Vec<f64>> = vec![Vec::with_capacity(grid.vertex_count); labels.len()];
        for _ in 0..grid.vertex_count {
            let independent: Vec<f64> = (0..labels.len()).map(|_| StandardNormal.sample(rng)).collect();
            let z = product_matrix_vector(&factor, &independent)?;
            for (j, path) in paths.iter_mut().enumerate() {
                path.push(means[j] * dt + volatilities[j] * dt.sqrt() * z[j]);
            }
        }
        Ok(Self {
            paths: labels.iter().cloned().zip(paths).collect(),
        })
    }

    /// Increments of `label`.
    pub fn path(&self, label: &str) -> Option<&[f64]> {
        self.paths.get(label).map(Vec::as_slice)
    }

    /// Labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    /// Element-wise product of two factors' increments.
    pub fn reduce(&self, first: &str, second: &str) -> Result<Sample, DistributionError> {
        let missing = || DistributionError::InsufficientSample { got: 0, need: 1 };
        let a = self.path(first).ok_or_else(missing)?;
        let b = self.path(second).ok_or_else(missing)?;
        Sample::new(a.iter().zip(b).map(|(x, y)| x * y).collect())
    }
}

/// Pearson correlation of two equal-length series.
pub fn sample_correlation(a: &[f64], b: &[f64]) -> Result<f64, DistributionError> {
    if a.len() != b.len() {
        return Err(LinalgError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        }
        .into());
    }
    if a.len() < 2 {
        return Err(DistributionError::InsufficientSample { got: a.len(), need: 2 });
    }
    let n = a.len() as f64;
    let (ma, mb) = (a.iter().sum::<f64>() / n, b.iter().sum::<f64>() / n);
    let (mut cov, mut va, mut vb) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        cov += (x - ma) * (y - mb);
        va += (x - ma).powi(2);
        vb += (y - mb).powi(2);
    }
    Ok(cov / (va * vb).sqrt())
}
