//! Distribution gap tests.
//!
//! A [`Sample`] is compared against an [`Ensemble`] of hypothesis samples
//! through the probability integral transform (PIT): each sample draw `x` maps
//! to `u = F_ens(x)`, and the squared gap between the sample CDF and `u` is
//! weighted by a [`GapLossWeight`]. Cramér-von Mises weights all quantiles
//! equally; Anderson-Darling weights the tails by `1 / (u(1 − u))`.

use serde::Serialize;
use tracing::debug;

use crate::types::DistributionError;

/// Sorted draws of a single realisation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    draws: Vec<f64>,
}

fn sorted(mut draws: Vec<f64>) -> Result<Vec<f64>, DistributionError> {
    if let Some(&bad) = draws.iter().find(|x| !x.is_finite()) {
        return Err(DistributionError::InvalidParameter { name: "draw", value: bad });
    }
    draws.sort_by(f64::total_cmp);
    Ok(draws)
}

/// Fraction of `sorted` that is `≤ x`.
fn empirical_cdf(sorted: &[f64], x: f64) -> f64 {
    sorted.partition_point(|&d| d <= x) as f64 / sorted.len() as f64
}

impl Sample {
    /// Build from (unsorted) draws; at least one finite draw.
    pub fn new(draws: Vec<f64>) -> Result<Self, DistributionError> {
        if draws.is_empty() {
            return Err(DistributionError::InsufficientSample { got: 0, need: 1 });
        }
        Ok(Self { draws: sorted(draws)? })
    }

    /// Sorted draws.
    pub fn draws(&self) -> &[f64] {
        &self.draws
    }

    /// Number of draws.
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    /// Always false; samples hold at least one draw.
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Empirical CDF.
    pub fn cdf(&self, x: f64) -> f64 {
        empirical_cdf(&self.draws, x)
    }

    /// Sample mean.
    pub fn mean(&self) -> f64 {
        self.draws.iter().sum::<f64>() / self.len() as f64
    }
}

/// Pooled hypothesis samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    pooled: Vec<f64>,
    sample_count: usize,
}

impl Ensemble {
    /// Pool the draws of `samples`.
    pub fn new(samples: &[Sample]) -> Result<Self, DistributionError> {
        if samples.is_empty() {
            return Err(DistributionError::InsufficientSample { got: 0, need: 1 });
        }
        let pooled = samples.iter().flat_map(|s| s.draws.iter().copied()).collect();
        Ok(Self {
            pooled: sorted(pooled)?,
            sample_count: samples.len(),
        })
    }

    /// Number of pooled samples.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Pooled empirical CDF.
    pub fn cdf(&self, x: f64) -> f64 {
        empirical_cdf(&self.pooled, x)
    }

    /// Pooled draw count.
    pub fn len(&self) -> usize {
        self.pooled.len()
    }

    /// Always false; ensembles hold at least one sample.
    pub fn is_empty(&self) -> bool {
        self.pooled.is_empty()
    }
}

/// Weight applied to the squared PIT gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GapLossWeight {
    /// Unit weight.
    CramerVonMises,
    /// `1 / (u(1 − u))`.
    AndersonDarling,
}

impl GapLossWeight {
    /// Weight at PIT value `u`.
    pub fn weight(&self, u: f64) -> f64 {
        match self {
            GapLossWeight::CramerVonMises => 1.0,
            GapLossWeight::AndersonDarling => 1.0 / (u * (1.0 - u)),
        }
    }
}

/// One point of the weighted PIT.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitPoint {
    /// Sample draw.
    pub draw: f64,
    /// Ensemble CDF at the draw.
    pub transform: f64,
    /// Sample CDF at the draw (mid-rank).
    pub sample_cdf: f64,
    /// Weighted squared gap.
    pub weighted_gap: f64,
}

/// Result of a gap test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapTestOutcome {
    /// Weighted PIT, in draw order.
    pub points: Vec<PitPoint>,
    /// Mean weighted gap.
    pub distance: f64,
}

/// Compare `sample` against `ensemble` under `weight`.
///
/// Ensemble CDF values are clamped to `[1/(2m), 1 − 1/(2m)]` for `m` pooled
/// draws so the Anderson-Darling weight stays finite.
pub fn gap_test(sample: &Sample, ensemble: &Ensemble, weight: GapLossWeight) -> GapTestOutcome {
    let n = sample.len() as f64;
    let floor = 0.5 / ensemble.len() as f64;
    let points: Vec<PitPoint> = sample
        .draws
        .iter()
        .enumerate()
        .map(|(i, &draw)| {
            let transform = ensemble.cdf(draw).clamp(floor, 1.0 - floor);
            let sample_cdf = (i as f64 + 0.5) / n;
            let gap = sample_cdf - transform;
            PitPoint {
                draw,
                transform,
                sample_cdf,
                weighted_gap: gap * gap * weight.weight(transform),
            }
        })
        .collect();
    let distance = points.iter().map(|p| p.weighted_gap).sum::<f64>() / n;
    debug!(draws = sample.len(), pooled = ensemble.len(), distance, "gap test");
    GapTestOutcome { points, distance }
}

/// Fraction of `null_distances` at least as large as `distance`.
pub fn empirical_p_value(distance: f64, null_distances: &[f64]) -> Result<f64, DistributionError> {
    if null_distances.is_empty() {
        return Err(DistributionError::InsufficientSample { got: 0, need: 1 });
    }
    let exceed = null_distances.iter().filter(|&&d| d >= distance).count();
    Ok(exceed as f64 / null_distances.len() as f64)
}

/// Quantile histogram of the weighted gaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitHistogram {
    /// Gap at each quantile `k / q`, `k = 0..=q`.
    pub test_statistics: Vec<f64>,
    /// Fraction of gaps at or below each test statistic.
    pub p_value_cumulative: Vec<f64>,
    /// First difference of the cumulative p-values.
    pub p_value_incremental: Vec<f64>,
    /// Gap at the threshold p-value.
    pub threshold_test_statistic: f64,
}

fn quantile(sorted: &[f64], level: f64) -> f64 {
    let position = level.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = position.floor() as usize;
    let hi = position.ceil() as usize;
    let frac = position - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

impl GapTestOutcome {
    /// Histogram with `quantile_count` bins and threshold level `p_value_threshold`.
    pub fn histogram(
        &self,
        quantile_count: usize,
        p_value_threshold: f64,
    ) -> Result<PitHistogram, DistributionError> {
        if quantile_count == 0 {
            return Err(DistributionError::InvalidParameter {
                name: "quantile_count",
                value: 0.0,
            });
        }
        if !(0.0..=1.0).contains(&p_value_threshold) {
            return Err(DistributionError::InvalidProbability(p_value_threshold));
        }
        let mut gaps: Vec<f64> = self.points.iter().map(|p| p.weighted_gap).collect();
        if gaps.is_empty() {
            return Err(DistributionError::InsufficientSample { got: 0, need: 1 });
        }
        gaps.sort_by(f64::total_cmp);

        let q = quantile_count as f64;
        let test_statistics: Vec<f64> = (0..=quantile_count)
            .map(|k| quantile(&gaps, k as f64 / q))
            .collect();
        let p_value_cumulative: Vec<f64> = test_statistics
            .iter()
            .map(|&s| empirical_cdf(&gaps, s))
            .collect();
        let p_value_incremental = p_value_cumulative
            .iter()
            .scan(0.0, |prev, &p| {
                let inc = p - *prev;
                *prev = p;
                Some(inc)
            })
            .collect();
        Ok(PitHistogram {
            test_statistics,
            p_value_cumulative,
            p_value_incremental,
            threshold_test_statistic: quantile(&gaps, p_value_threshold),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grid(n: usize, scale: f64) -> Sample {
        Sample::new((0..n).map(|i| scale * (i as f64 + 0.5) / n as f64).collect()).unwrap()
    }

    #[test]
    fn test_identical_sample_has_small_distance() {
        let sample = grid(200, 1.0);
        let ensemble = Ensemble::new(&[grid(200, 1.0), grid(200, 1.0)]).unwrap();
        let outcome = gap_test(&sample, &ensemble, GapLossWeight::CramerVonMises);
        assert!(outcome.distance < 1e-4);
    }

    #[test]
    fn test_distance_grows_with_mismatch() {
        let sample = grid(300, 1.0);
        let near = Ensemble::new(&[grid(300, 1.1)]).unwrap();
        let far = Ensemble::new(&[grid(300, 2.0)]).unwrap();
        for weight in [GapLossWeight::CramerVonMises, GapLossWeight::AndersonDarling] {
            let d_near = gap_test(&sample, &near, weight).distance;
            let d_far = gap_test(&sample, &far, weight).distance;
            assert!(d_far > d_near, "{weight:?}: {d_far} <= {d_near}");
        }
    }

    #[test]
    fn test_anderson_darling_weights_tails() {
        let ad = GapLossWeight::AndersonDarling;
        assert_abs_diff_eq!(ad.weight(0.5), 4.0);
        assert!(ad.weight(0.01) > ad.weight(0.2));
    }

    #[test]
    fn test_histogram_shape() {
        let outcome = gap_test(
            &grid(100, 1.0),
            &Ensemble::new(&[grid(100, 1.5)]).unwrap(),
            GapLossWeight::AndersonDarling,
        );
        let hist = outcome.histogram(20, 0.95).unwrap();
        assert_eq!(hist.test_statistics.len(), 21);
        assert!(hist.test_statistics.windows(2).all(|w| w[0] <= w[1]));
        assert_abs_diff_eq!(*hist.p_value_cumulative.last().unwrap(), 1.0);
        assert_abs_diff_eq!(hist.p_value_incremental.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(hist.threshold_test_statistic <= hist.test_statistics[20]);
        assert!(outcome.histogram(0, 0.5).is_err());
    }

    #[test]
    fn test_empirical_p_value() {
        let null = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(empirical_p_value(0.25, &null).unwrap(), 0.5);
        assert_eq!(empirical_p_value(1.0, &null).unwrap(), 0.0);
        assert!(empirical_p_value(0.1, &[]).is_err());
    }

    #[test]
    fn test_sample_rejects_nan() {
        assert!(Sample::new(vec![1.0, f64::NAN]).is_err());
        assert!(Ensemble::new(&[]).is_err());
    }
}
