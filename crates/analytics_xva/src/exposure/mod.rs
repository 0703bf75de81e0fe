//! Exposure paths and exposure metrics.
//!
//! - [`bridge`]: Pykhtin Brownian bridge between sparse pillar exposures
//! - [`ExposureCalculator`]: EE, ENE, PFE, EPE and EEPE over scenario paths
//! - [`ExposureProfile`]: every metric for one scenario set
//!
//! Per-date metrics are evaluated in parallel across dates with rayon.

pub mod bridge;

pub use bridge::{BrownianBridgeSegment, LocalVolatility, PillarVertex, PykhtinBrownianBridgePath};

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::XvaError;

/// Exposure metric calculations over simulated values
/// `values[scenario][time]`.
pub struct ExposureCalculator;

impl ExposureCalculator {
    fn check_grid(values: &[Vec<f64>]) -> Result<usize, XvaError> {
        let first = values
            .first()
            .ok_or_else(|| XvaError::InvalidInput("no scenarios".to_string()))?;
        let n_times = first.len();
        if let Some(path) = values.iter().find(|p| p.len() != n_times) {
            return Err(XvaError::DimensionMismatch {
                expected: n_times,
                got: path.len(),
            });
        }
        Ok(n_times)
    }

    fn per_date<F>(values: &[Vec<f64>], f: F) -> Result<Vec<f64>, XvaError>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        let n_times = Self::check_grid(values)?;
        let n_scenarios = values.len() as f64;
        Ok((0..n_times)
            .into_par_iter()
            .map(|t| values.iter().map(|path| f(path[t])).sum::<f64>() / n_scenarios)
            .collect())
    }

    /// EE(t) = E[max(V(t), 0)].
    ///
    /// # Examples
    ///
    /// ```
    /// use analytics_xva::exposure::ExposureCalculator;
    ///
    /// let values = vec![
    ///     vec![10.0, 20.0, 15.0],
    ///     vec![5.0, -10.0, 25.0],
    ///     vec![-5.0, 15.0, 10.0],
    /// ];
    /// let ee = ExposureCalculator::expected_exposure(&values).unwrap();
    /// assert!((ee[0] - 5.0).abs() < 1e-12);
    /// ```
    pub fn expected_exposure(values: &[Vec<f64>]) -> Result<Vec<f64>, XvaError> {
        Self::per_date(values, |v| v.max(0.0))
    }

    /// ENE(t) = E[max(-V(t), 0)].
    pub fn expected_negative_exposure(values: &[Vec<f64>]) -> Result<Vec<f64>, XvaError> {
        Self::per_date(values, |v| (-v).max(0.0))
    }

    /// PFE(t, α): the α-quantile of max(V(t), 0), nearest rank.
    pub fn potential_future_exposure(values: &[Vec<f64>], confidence: f64) -> Result<Vec<f64>, XvaError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(XvaError::InvalidInput(format!("confidence {confidence}")));
        }
        let n_times = Self::check_grid(values)?;
        let n_scenarios = values.len();
        let index = (((n_scenarios - 1) as f64 * confidence).round() as usize).min(n_scenarios - 1);
        Ok((0..n_times)
            .into_par_iter()
            .map(|t| {
                let mut exposures: Vec<f64> = values.iter().map(|path| path[t].max(0.0)).collect();
                exposures.sort_by(f64::total_cmp);
                exposures[index]
            })
            .collect())
    }

    /// Time average of a profile by the trapezoid rule.
    fn time_average(profile: &[f64], time_grid: &[f64], horizon: f64) -> Result<f64, XvaError> {
        if profile.len() != time_grid.len() {
            return Err(XvaError::DimensionMismatch {
                expected: time_grid.len(),
                got: profile.len(),
            });
        }
        if time_grid.windows(2).any(|w| w[1] <= w[0]) {
            return Err(XvaError::InvalidInput("time grid must increase".to_string()));
        }
        let Some(&first) = profile.first() else {
            return Err(XvaError::InvalidInput("empty profile".to_string()));
        };
        let mut integral = 0.0;
        let mut covered = 0.0;
        for (i, w) in time_grid.windows(2).enumerate() {
            if w[0] >= horizon {
                break;
            }
            let end = w[1].min(horizon);
            let weight = (end - w[0]) / (w[1] - w[0]);
            let right = profile[i] + weight * (profile[i + 1] - profile[i]);
            integral += 0.5 * (profile[i] + right) * (end - w[0]);
            covered += end - w[0];
        }
        Ok(if covered > 0.0 { integral / covered } else { first })
    }

    /// EPE = (1/T) ∫ EE(t) dt over the whole grid.
    pub fn expected_positive_exposure(ee: &[f64], time_grid: &[f64]) -> Result<f64, XvaError> {
        Self::time_average(ee, time_grid, f64::INFINITY)
    }

    /// Effective EE: the running maximum of EE.
    pub fn effective_expected_exposure(ee: &[f64]) -> Vec<f64> {
        ee.iter()
            .scan(0.0_f64, |running, &v| {
                *running = running.max(v);
                Some(*running)
            })
            .collect()
    }

    /// EEPE: time average of effective EE up to `horizon`.
    pub fn effective_epe(ee: &[f64], time_grid: &[f64], horizon: f64) -> Result<f64, XvaError> {
        Self::time_average(&Self::effective_expected_exposure(ee), time_grid, horizon)
    }

    /// Maximum of a PFE profile.
    pub fn peak_pfe(pfe: &[f64]) -> f64 {
        pfe.iter().copied().fold(0.0_f64, f64::max)
    }
}

/// Exposure metrics of one scenario set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureProfile {
    /// Time grid in years
    pub time_grid: Vec<f64>,
    /// Expected exposure per date
    pub expected_exposure: Vec<f64>,
    /// Expected negative exposure per date
    pub expected_negative_exposure: Vec<f64>,
    /// PFE per date at `confidence`
    pub potential_future_exposure: Vec<f64>,
    /// PFE quantile level
    pub confidence: f64,
    /// Time-averaged EE
    pub expected_positive_exposure: f64,
    /// Time-averaged effective EE up to one year
    pub effective_epe: f64,
    /// Maximum PFE
    pub peak_pfe: f64,
}

impl ExposureProfile {
    /// Regulatory EEPE horizon in years.
    pub const EEPE_HORIZON: f64 = 1.0;

    /// Computes every metric.
    ///
    /// # Errors
    /// `DimensionMismatch` when paths and grid lengths differ.
    pub fn compute(values: &[Vec<f64>], time_grid: &[f64], confidence: f64) -> Result<Self, XvaError> {
        let n_times = ExposureCalculator::check_grid(values)?;
        if n_times != time_grid.len() {
            return Err(XvaError::DimensionMismatch {
                expected: time_grid.len(),
                got: n_times,
            });
        }
        let ee = ExposureCalculator::expected_exposure(values)?;
        let ene = ExposureCalculator::expected_negative_exposure(values)?;
        let pfe = ExposureCalculator::potential_future_exposure(values, confidence)?;
        let epe = ExposureCalculator::expected_positive_exposure(&ee, time_grid)?;
        let eepe = ExposureCalculator::effective_epe(&ee, time_grid, Self::EEPE_HORIZON)?;
        let peak_pfe = ExposureCalculator::peak_pfe(&pfe);
        debug!(
            scenarios = values.len(),
            dates = n_times,
            epe,
            eepe,
            peak_pfe,
            "computed exposure profile"
        );
        Ok(Self {
            time_grid: time_grid.to_vec(),
            expected_exposure: ee,
            expected_negative_exposure: ene,
            potential_future_exposure: pfe,
            confidence,
            expected_positive_exposure: epe,
            effective_epe: eepe,
            peak_pfe,
        })
    }
}
