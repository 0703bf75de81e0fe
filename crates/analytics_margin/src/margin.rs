//! Credit delta margin by the sensitivity-based approach.
//!
//! Within bucket `b` each component (issuer / seniority) carries tenor
//! sensitivities `s`. With concentration factor
//! `CR = max(1, √(|Σ s| / T_b))` per component and risk weight `RW_b`:
//!
//! ```text
//! WS_k = RW_b · s_k · CR_k
//! K_b² = Σ_k Σ_l ρ_kl f_kl WS_k WS_l,   f_kl = min(CR)/max(CR)
//! S_b  = max(min(Σ_k WS_k, K_b), -K_b)
//! Δ    = √(Σ_b K_b² + Σ_{b≠c} γ_bc S_b S_c) + K_residual
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::credit::{BucketId, CreditRiskClassSettings};
use crate::error::MarginError;

/// Thresholds are quoted in millions per basis point.
const THRESHOLD_UNIT: f64 = 1.0e6;

/// Sensitivities of one risk factor keyed by tenor label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskFactorTenorSensitivity {
    sensitivities: BTreeMap<String, f64>,
}

impl RiskFactorTenorSensitivity {
    /// Creates the tenor map, rejecting non-finite entries.
    pub fn new(sensitivities: BTreeMap<String, f64>) -> Result<Self, MarginError> {
        if let Some((tenor, &value)) = sensitivities.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MarginError::InvalidSensitivity {
                label: tenor.clone(),
                value,
            });
        }
        Ok(Self { sensitivities })
    }

    /// Adds to the sensitivity of a tenor.
    pub fn accumulate(&mut self, tenor: &str, value: f64) -> Result<(), MarginError> {
        let entry = self.sensitivities.entry(tenor.to_string()).or_insert(0.0);
        *entry += value;
        if entry.is_finite() {
            Ok(())
        } else {
            Err(MarginError::InvalidSensitivity {
                label: tenor.to_string(),
                value: *entry,
            })
        }
    }

    /// Tenor sensitivities.
    pub fn sensitivities(&self) -> &BTreeMap<String, f64> {
        &self.sensitivities
    }

    /// Net sensitivity across tenors.
    pub fn net(&self) -> f64 {
        self.sensitivities.values().sum()
    }
}

/// Component sensitivities of one bucket.
pub type BucketSensitivity = BTreeMap<String, RiskFactorTenorSensitivity>;

/// Weighted sensitivity of a single risk factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedSensitivity {
    /// Component name
    pub component: String,
    /// Tenor label
    pub tenor: String,
    /// Concentration risk factor of the component
    pub concentration: f64,
    /// RW · s · CR
    pub value: f64,
}

/// Aggregate of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketAggregate {
    /// Bucket
    pub bucket: BucketId,
    /// Weighted sensitivities in component then tenor order
    pub weighted_sensitivities: Vec<WeightedSensitivity>,
    /// Covariance contribution per component pair `a_b` (a ≤ b); sums to K²
    pub component_covariance: BTreeMap<String, f64>,
    /// K_b²
    pub variance: f64,
    /// Σ WS
    pub net_weighted_sensitivity: f64,
    /// Σ WS clamped to [-K_b, K_b]
    pub clamped_sensitivity: f64,
}

impl BucketAggregate {
    /// K_b.
    pub fn margin(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }
}

/// Aggregate of a risk measure across buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMeasureAggregate {
    /// Bucket aggregates, residual last
    pub buckets: BTreeMap<BucketId, BucketAggregate>,
    /// Σ K_b² + Σ γ S_b S_c over numbered buckets
    pub core_variance: f64,
    /// K² of the residual bucket
    pub residual_variance: f64,
}

impl RiskMeasureAggregate {
    /// √core + √residual.
    pub fn margin(&self) -> f64 {
        self.core_variance.max(0.0).sqrt() + self.residual_variance.max(0.0).sqrt()
    }
}

/// Sensitivities of a risk measure across buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskMeasureSensitivity {
    buckets: BTreeMap<BucketId, BucketSensitivity>,
}

impl RiskMeasureSensitivity {
    /// Creates the sensitivity set.
    pub fn new(buckets: BTreeMap<BucketId, BucketSensitivity>) -> Self {
        Self { buckets }
    }

    /// Bucket sensitivities.
    pub fn buckets(&self) -> &BTreeMap<BucketId, BucketSensitivity> {
        &self.buckets
    }

    /// Delta margin aggregate under `settings`.
    ///
    /// # Errors
    /// `EmptySensitivities` when no bucket carries a sensitivity,
    /// `UnknownBucket` for buckets outside the settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use analytics_margin::credit::{BucketId, CRNQ_20};
    /// use analytics_margin::margin::{RiskFactorTenorSensitivity, RiskMeasureSensitivity};
    ///
    /// let tenors = BTreeMap::from([("5Y".to_string(), 10.0)]);
    /// let bucket = BTreeMap::from([("01a".to_string(), RiskFactorTenorSensitivity::new(tenors).unwrap())]);
    /// let sensitivity = RiskMeasureSensitivity::new(BTreeMap::from([(BucketId::Numbered(1), bucket)]));
    /// let aggregate = sensitivity.linear_aggregate(&CRNQ_20).unwrap();
    /// assert!((aggregate.margin() - 2800.0).abs() < 1e-9);
    /// ```
    pub fn linear_aggregate(
        &self,
        settings: &CreditRiskClassSettings,
    ) -> Result<RiskMeasureAggregate, MarginError> {
        if self.buckets.values().all(|b| b.values().all(|c| c.sensitivities.is_empty())) {
            return Err(MarginError::EmptySensitivities("credit delta"));
        }
        let buckets = self
            .buckets
            .iter()
            .map(|(&id, sensitivity)| Ok((id, bucket_aggregate(id, sensitivity, settings)?)))
            .collect::<Result<BTreeMap<_, _>, MarginError>>()?;

        let numbered: Vec<&BucketAggregate> = buckets.values().filter(|b| !b.bucket.is_residual()).collect();
        let mut core_variance = numbered.iter().map(|b| b.variance).sum::<f64>();
        for (i, a) in numbered.iter().enumerate() {
            for b in &numbered[i + 1..] {
                let gamma = settings.cross_bucket_correlation(a.bucket, b.bucket)?;
                core_variance += 2.0 * gamma * a.clamped_sensitivity * b.clamped_sensitivity;
            }
        }
        let residual_variance = buckets
            .get(&BucketId::Residual)
            .map_or(0.0, |b| b.variance);

        debug!(
            risk_class = settings.name,
            version = settings.version,
            buckets = buckets.len(),
            core_variance,
            residual_variance,
            "aggregated credit delta margin"
        );

        Ok(RiskMeasureAggregate {
            buckets,
            core_variance,
            residual_variance,
        })
    }
}

fn bucket_aggregate(
    id: BucketId,
    sensitivity: &BucketSensitivity,
    settings: &CreditRiskClassSettings,
) -> Result<BucketAggregate, MarginError> {
    let risk_weight = settings.risk_weight(id)?;
    let threshold = settings.concentration_threshold(id)? * THRESHOLD_UNIT;

    let weighted_sensitivities: Vec<WeightedSensitivity> = sensitivity
        .iter()
        .flat_map(|(component, tenors)| {
            let concentration = (tenors.net().abs() / threshold).sqrt().max(1.0);
            tenors.sensitivities.iter().map(move |(tenor, &s)| WeightedSensitivity {
                component: component.clone(),
                tenor: tenor.clone(),
                concentration,
                value: risk_weight * s * concentration,
            })
        })
        .collect();

    let mut component_covariance: BTreeMap<String, f64> = BTreeMap::new();
    for (i, k) in weighted_sensitivities.iter().enumerate() {
        for (j, l) in weighted_sensitivities.iter().enumerate().skip(i) {
            let same_issuer = k.component == l.component;
            let rho = if i == j {
                1.0
            } else {
                settings.intra_bucket.between(id.is_residual(), same_issuer)
            };
            let f = k.concentration.min(l.concentration) / k.concentration.max(l.concentration);
            let multiplicity = if i == j { 1.0 } else { 2.0 };
            let key = format!("{}_{}", k.component, l.component);
            *component_covariance.entry(key).or_insert(0.0) += multiplicity * rho * f * k.value * l.value;
        }
    }

    let variance = component_covariance.values().sum::<f64>();
    let margin = variance.max(0.0).sqrt();
    let net_weighted_sensitivity = weighted_sensitivities.iter().map(|w| w.value).sum::<f64>();
    let clamped_sensitivity = net_weighted_sensitivity.clamp(-margin, margin);

    debug!(
        bucket = %id,
        factors = weighted_sensitivities.len(),
        margin,
        net_weighted_sensitivity,
        "aggregated credit bucket"
    );

    Ok(BucketAggregate {
        bucket: id,
        weighted_sensitivities,
        component_covariance,
        variance,
        net_weighted_sensitivity,
        clamped_sensitivity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credit::{CRNQ_20, CRQ_21};
    use approx::assert_relative_eq;

    fn tenors(pairs: &[(&str, f64)]) -> RiskFactorTenorSensitivity {
        RiskFactorTenorSensitivity::new(pairs.iter().map(|&(t, s)| (t.to_string(), s)).collect()).unwrap()
    }

    fn bucket(components: &[(&str, &[(&str, f64)])]) -> BucketSensitivity {
        components
            .iter()
            .map(|&(name, pairs)| (name.to_string(), tenors(pairs)))
            .collect()
    }

    #[test]
    fn test_single_component_two_tenors() {
        let s = RiskMeasureSensitivity::new(BTreeMap::from([(
            BucketId::Numbered(1),
            bucket(&[("01a", &[("1Y", 3.0), ("5Y", -1.0)])]),
        )]));
        let agg = s.linear_aggregate(&CRNQ_20).unwrap();
        let (a, b) = (280.0 * 3.0, -280.0);
        let k_sq = a * a + b * b + 2.0 * 0.57 * a * b;
        assert_relative_eq!(agg.core_variance, k_sq, max_relative = 1e-12);
        assert_relative_eq!(agg.margin(), k_sq.sqrt(), max_relative = 1e-12);
        let bucket = &agg.buckets[&BucketId::Numbered(1)];
        assert_eq!(bucket.component_covariance.len(), 1);
        assert_relative_eq!(bucket.clamped_sensitivity, a + b);
    }

    #[test]
    fn test_cross_bucket_uses_clamped_sums() {
        let s = RiskMeasureSensitivity::new(BTreeMap::from([
            (BucketId::Numbered(1), bucket(&[("01a", &[("5Y", 1.0)])])),
            (BucketId::Numbered(2), bucket(&[("02a", &[("5Y", -1.0)])])),
        ]));
        let agg = s.linear_aggregate(&CRNQ_20).unwrap();
        let expected = 280.0_f64.powi(2) + 1300.0_f64.powi(2) - 2.0 * 0.21 * 280.0 * 1300.0;
        assert_relative_eq!(agg.core_variance, expected, max_relative = 1e-12);
        assert_eq!(agg.residual_variance, 0.0);
    }

    #[test]
    fn test_residual_added_separately() {
        let s = RiskMeasureSensitivity::new(BTreeMap::from([
            (BucketId::Numbered(3), bucket(&[("A", &[("5Y", 2.0)])])),
            (BucketId::Residual, bucket(&[("R1", &[("5Y", 1.0)]), ("R2", &[("5Y", 1.0)])])),
        ]));
        let agg = s.linear_aggregate(&CRQ_21).unwrap();
        let residual = 187.0_f64.powi(2) * (2.0 + 2.0 * 0.5);
        assert_relative_eq!(agg.residual_variance, residual, max_relative = 1e-12);
        assert_relative_eq!(agg.margin(), 144.0 + residual.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_concentration_scales_large_positions() {
        // 4x the IG threshold gives CR = 2
        let s = RiskMeasureSensitivity::new(BTreeMap::from([(
            BucketId::Numbered(1),
            bucket(&[("01a", &[("5Y", 4.0 * 9.5e6)])]),
        )]));
        let agg = s.linear_aggregate(&CRNQ_20).unwrap();
        let ws = &agg.buckets[&BucketId::Numbered(1)].weighted_sensitivities[0];
        assert_relative_eq!(ws.concentration, 2.0);
        assert_relative_eq!(agg.margin(), 280.0 * 4.0 * 9.5e6 * 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        let empty = RiskMeasureSensitivity::default();
        assert_eq!(
            empty.linear_aggregate(&CRNQ_20),
            Err(MarginError::EmptySensitivities("credit delta"))
        );
        let unknown = RiskMeasureSensitivity::new(BTreeMap::from([(
            BucketId::Numbered(9),
            bucket(&[("x", &[("5Y", 1.0)])]),
        )]));
        assert!(matches!(
            unknown.linear_aggregate(&CRNQ_20),
            Err(MarginError::UnknownBucket(_))
        ));
        assert!(RiskFactorTenorSensitivity::new(BTreeMap::from([("1Y".to_string(), f64::NAN)])).is_err());
    }

    #[test]
    fn test_accumulate() {
        let mut t = RiskFactorTenorSensitivity::default();
        t.accumulate("1Y", 2.0).unwrap();
        t.accumulate("1Y", -0.5).unwrap();
        t.accumulate("2Y", 1.0).unwrap();
        assert_eq!(t.net(), 2.5);
        assert!(t.accumulate("2Y", f64::INFINITY).is_err());
    }
}
