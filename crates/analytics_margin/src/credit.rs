//! Credit risk class settings.
//!
//! Two calibrations are carried: credit qualifying (CRQ) 2.1 and credit
//! non-qualifying (CRNQ) 2.0. Risk weights are in bp, concentration
//! thresholds in USD mm per bp.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::MarginError;
use CreditQuality::{HighYieldNonRated as Hy, InvestmentGrade as Ig};

/// Credit quality of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CreditQuality {
    /// Investment grade
    InvestmentGrade,
    /// High yield or not rated
    HighYieldNonRated,
}

impl fmt::Display for CreditQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvestmentGrade => write!(f, "IG"),
            Self::HighYieldNonRated => write!(f, "HY/NR"),
        }
    }
}

/// Bucket label: a numbered bucket or the residual bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketId {
    /// Numbered bucket
    Numbered(u8),
    /// Residual bucket
    Residual,
}

impl BucketId {
    /// Whether this is the residual bucket.
    pub fn is_residual(&self) -> bool {
        matches!(self, Self::Residual)
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numbered(n) => write!(f, "{n}"),
            Self::Residual => write!(f, "residual"),
        }
    }
}

impl FromStr for BucketId {
    type Err = MarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("residual") {
            return Ok(Self::Residual);
        }
        s.parse::<u8>()
            .map(Self::Numbered)
            .map_err(|_| MarginError::UnknownBucket(s.to_string()))
    }
}

impl Serialize for BucketId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A numbered credit bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditBucket {
    /// Bucket number
    pub number: u8,
    /// Credit quality
    pub quality: CreditQuality,
    /// Delta risk weight
    pub risk_weight: f64,
    /// Delta concentration threshold
    pub concentration_threshold: f64,
    /// Sectors mapped to the bucket
    pub sectors: &'static [&'static str],
}

/// Intra-bucket correlations between risk factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntraBucketCorrelation {
    /// Same issuer and seniority, numbered buckets
    pub same_issuer: f64,
    /// Different issuer or seniority, numbered buckets
    pub different_issuer: f64,
    /// Same issuer and seniority, residual bucket
    pub residual_same_issuer: f64,
    /// Different issuer or seniority, residual bucket
    pub residual_different_issuer: f64,
}

impl IntraBucketCorrelation {
    /// Correlation between two risk factors of a bucket.
    pub fn between(&self, residual: bool, same_issuer: bool) -> f64 {
        match (residual, same_issuer) {
            (false, true) => self.same_issuer,
            (false, false) => self.different_issuer,
            (true, true) => self.residual_same_issuer,
            (true, false) => self.residual_different_issuer,
        }
    }
}

/// Cross-bucket correlation structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossBucketCorrelation {
    /// Full matrix indexed by bucket number - 1
    Matrix(&'static [&'static [f64]]),
    /// Single correlation for every pair of distinct buckets
    Uniform(f64),
}

/// Base correlation risk settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaseCorrelationSettings {
    /// Risk weight of a base correlation sensitivity
    pub risk_weight: f64,
    /// Correlation between base correlation indices
    pub correlation: f64,
}

/// Parameters of a credit risk class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditRiskClassSettings {
    /// Risk class name
    pub name: &'static str,
    /// Calibration version
    pub version: &'static str,
    /// Numbered buckets ordered by number
    pub buckets: &'static [CreditBucket],
    /// Residual bucket risk weight
    pub residual_risk_weight: f64,
    /// Residual bucket concentration threshold
    pub residual_concentration_threshold: f64,
    /// Vega risk weight
    pub vega_risk_weight: f64,
    /// Base correlation settings, where applicable
    pub base_correlation: Option<BaseCorrelationSettings>,
    /// Intra-bucket correlations
    pub intra_bucket: IntraBucketCorrelation,
    /// Cross-bucket correlations
    pub cross_bucket: CrossBucketCorrelation,
}

const SOVEREIGNS: &[&str] = &["Sovereigns", "Central Banks"];
const FINANCIALS: &[&str] = &["Financials", "Government Backed Financials"];
const BASIC_MATERIALS: &[&str] = &["Basic Materials", "Energy", "Industrials"];
const CONSUMER: &[&str] = &["Consumer"];
const TECHNOLOGY: &[&str] = &["Technology", "Telecommunications"];
const HEALTH_CARE: &[&str] = &[
    "Health Care",
    "Utilities",
    "Local Government",
    "Government Backed Corporates",
];
const MORTGAGE_BACKED: &[&str] = &["RMBS", "CMBS"];

const fn bucket(
    number: u8,
    quality: CreditQuality,
    risk_weight: f64,
    concentration_threshold: f64,
    sectors: &'static [&'static str],
) -> CreditBucket {
    CreditBucket {
        number,
        quality,
        risk_weight,
        concentration_threshold,
        sectors,
    }
}

const CRQ_21_BUCKETS: [CreditBucket; 12] = [
    bucket(1, Ig, 69.0, 0.95, SOVEREIGNS),
    bucket(2, Ig, 107.0, 0.29, FINANCIALS),
    bucket(3, Ig, 72.0, 0.29, BASIC_MATERIALS),
    bucket(4, Ig, 55.0, 0.29, CONSUMER),
    bucket(5, Ig, 48.0, 0.29, TECHNOLOGY),
    bucket(6, Ig, 41.0, 0.29, HEALTH_CARE),
    bucket(7, Hy, 166.0, 0.95, SOVEREIGNS),
    bucket(8, Hy, 187.0, 0.29, FINANCIALS),
    bucket(9, Hy, 177.0, 0.29, BASIC_MATERIALS),
    bucket(10, Hy, 187.0, 0.29, CONSUMER),
    bucket(11, Hy, 129.0, 0.29, TECHNOLOGY),
    bucket(12, Hy, 136.0, 0.29, HEALTH_CARE),
];

const CRQ_21_CROSS_BUCKET: &[&[f64]] = &[
    &[1.00, 0.38, 0.38, 0.35, 0.37, 0.33, 0.36, 0.31, 0.32, 0.33, 0.32, 0.31],
    &[0.38, 1.00, 0.46, 0.44, 0.45, 0.43, 0.33, 0.36, 0.38, 0.39, 0.38, 0.36],
    &[0.38, 0.46, 1.00, 0.49, 0.49, 0.47, 0.34, 0.34, 0.39, 0.40, 0.40, 0.37],
    &[0.35, 0.44, 0.49, 1.00, 0.48, 0.48, 0.31, 0.32, 0.36, 0.40, 0.38, 0.36],
    &[0.37, 0.45, 0.49, 0.48, 1.00, 0.48, 0.33, 0.33, 0.38, 0.39, 0.41, 0.37],
    &[0.33, 0.43, 0.47, 0.48, 0.48, 1.00, 0.29, 0.31, 0.35, 0.36, 0.36, 0.35],
    &[0.36, 0.33, 0.34, 0.31, 0.33, 0.29, 1.00, 0.28, 0.30, 0.31, 0.30, 0.28],
    &[0.31, 0.36, 0.34, 0.32, 0.33, 0.31, 0.28, 1.00, 0.30, 0.31, 0.30, 0.29],
    &[0.32, 0.38, 0.39, 0.36, 0.38, 0.35, 0.30, 0.30, 1.00, 0.34, 0.34, 0.33],
    &[0.33, 0.39, 0.40, 0.40, 0.39, 0.36, 0.31, 0.31, 0.34, 1.00, 0.36, 0.33],
    &[0.32, 0.38, 0.40, 0.38, 0.41, 0.36, 0.30, 0.30, 0.34, 0.36, 1.00, 0.33],
    &[0.31, 0.36, 0.37, 0.36, 0.37, 0.35, 0.28, 0.29, 0.33, 0.33, 0.33, 1.00],
];

/// Credit qualifying, SIMM 2.1.
pub const CRQ_21: CreditRiskClassSettings = CreditRiskClassSettings {
    name: "Credit Qualifying",
    version: "2.1",
    buckets: &CRQ_21_BUCKETS,
    residual_risk_weight: 187.0,
    residual_concentration_threshold: 0.29,
    vega_risk_weight: 0.27,
    base_correlation: Some(BaseCorrelationSettings {
        risk_weight: 20.0,
        correlation: 0.10,
    }),
    intra_bucket: IntraBucketCorrelation {
        same_issuer: 0.96,
        different_issuer: 0.39,
        residual_same_issuer: 0.50,
        residual_different_issuer: 0.50,
    },
    cross_bucket: CrossBucketCorrelation::Matrix(CRQ_21_CROSS_BUCKET),
};

const CRNQ_20_BUCKETS: [CreditBucket; 2] = [
    bucket(1, Ig, 280.0, 9.5, MORTGAGE_BACKED),
    bucket(2, Hy, 1300.0, 0.5, MORTGAGE_BACKED),
];

/// Credit non-qualifying, SIMM 2.0.
pub const CRNQ_20: CreditRiskClassSettings = CreditRiskClassSettings {
    name: "Credit Non-Qualifying",
    version: "2.0",
    buckets: &CRNQ_20_BUCKETS,
    residual_risk_weight: 1300.0,
    residual_concentration_threshold: 0.5,
    vega_risk_weight: 0.27,
    base_correlation: None,
    intra_bucket: IntraBucketCorrelation {
        same_issuer: 0.57,
        different_issuer: 0.20,
        residual_same_issuer: 0.50,
        residual_different_issuer: 0.50,
    },
    cross_bucket: CrossBucketCorrelation::Uniform(0.21),
};

impl CreditRiskClassSettings {
    /// Numbered bucket by number.
    pub fn bucket(&self, number: u8) -> Result<&CreditBucket, MarginError> {
        self.buckets
            .iter()
            .find(|b| b.number == number)
            .ok_or_else(|| MarginError::UnknownBucket(number.to_string()))
    }

    /// Delta risk weight of a bucket, including the residual bucket.
    pub fn risk_weight(&self, id: BucketId) -> Result<f64, MarginError> {
        match id {
            BucketId::Numbered(n) => Ok(self.bucket(n)?.risk_weight),
            BucketId::Residual => Ok(self.residual_risk_weight),
        }
    }

    /// Delta concentration threshold of a bucket.
    pub fn concentration_threshold(&self, id: BucketId) -> Result<f64, MarginError> {
        match id {
            BucketId::Numbered(n) => Ok(self.bucket(n)?.concentration_threshold),
            BucketId::Residual => Ok(self.residual_concentration_threshold),
        }
    }

    /// Correlation between two distinct numbered buckets.
    ///
    /// # Errors
    /// `UnknownBucket` when either bucket is residual or not in the table.
    pub fn cross_bucket_correlation(&self, a: BucketId, b: BucketId) -> Result<f64, MarginError> {
        let index = |id: BucketId| match id {
            BucketId::Numbered(n) => self
                .buckets
                .iter()
                .position(|bucket| bucket.number == n)
                .ok_or_else(|| MarginError::UnknownBucket(id.to_string())),
            BucketId::Residual => Err(MarginError::UnknownBucket(id.to_string())),
        };
        let (i, j) = (index(a)?, index(b)?);
        if i == j {
            return Ok(1.0);
        }
        match self.cross_bucket {
            CrossBucketCorrelation::Uniform(rho) => Ok(rho),
            CrossBucketCorrelation::Matrix(m) => m
                .get(i)
                .and_then(|row| row.get(j))
                .copied()
                .ok_or_else(|| MarginError::UnknownBucket(b.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_id_parse() {
        assert_eq!("3".parse::<BucketId>().unwrap(), BucketId::Numbered(3));
        assert_eq!("Residual".parse::<BucketId>().unwrap(), BucketId::Residual);
        assert!("x".parse::<BucketId>().is_err());
        assert!(BucketId::Numbered(12) < BucketId::Residual);
        assert_eq!(BucketId::Residual.to_string(), "residual");
    }

    #[test]
    fn test_crq_cross_bucket_matrix_symmetric() {
        let CrossBucketCorrelation::Matrix(m) = CRQ_21.cross_bucket else {
            panic!("matrix expected");
        };
        assert_eq!(m.len(), CRQ_21.buckets.len());
        for i in 0..m.len() {
            assert_eq!(m[i].len(), m.len());
            assert_eq!(m[i][i], 1.0);
            for j in 0..m.len() {
                assert_eq!(m[i][j], m[j][i], "({i}, {j})");
            }
        }
    }

    #[test]
    fn test_bucket_numbers_sequential() {
        for settings in [CRQ_21, CRNQ_20] {
            for (i, b) in settings.buckets.iter().enumerate() {
                assert_eq!(usize::from(b.number), i + 1);
            }
        }
    }

    #[test]
    fn test_lookups() {
        assert_eq!(CRQ_21.risk_weight(BucketId::Numbered(8)).unwrap(), 187.0);
        assert_eq!(CRNQ_20.risk_weight(BucketId::Residual).unwrap(), 1300.0);
        assert!(CRNQ_20.risk_weight(BucketId::Numbered(3)).is_err());
        let n = BucketId::Numbered;
        assert_eq!(CRQ_21.cross_bucket_correlation(n(2), n(5)).unwrap(), 0.45);
        assert_eq!(CRNQ_20.cross_bucket_correlation(n(1), n(2)).unwrap(), 0.21);
        assert_eq!(CRNQ_20.cross_bucket_correlation(n(1), n(1)).unwrap(), 1.0);
        assert!(CRNQ_20.cross_bucket_correlation(n(1), BucketId::Residual).is_err());
    }

    #[test]
    fn test_intra_bucket_between() {
        let c = CRQ_21.intra_bucket;
        assert_eq!(c.between(false, true), 0.96);
        assert_eq!(c.between(true, false), 0.50);
    }
}
