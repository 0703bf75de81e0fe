//! Brownian bridge interpolation of exposure between pillar dates.
//!
//! Between pillars `(t_i, V_i)` and `(t_j, V_j)` the exposure at `t` is
//!
//! ```text
//! V(t) = V_i + (t - t_i)/(t_j - t_i)·(V_j - V_i)
//!        + σ(V̄(t)) · √((t - t_i)(t_j - t)/(t_j - t_i)) · Z(t)
//! ```
//!
//! where `V̄` is the linear part and `Z(t)` the standard normal wander drawn
//! for date `t` (Pykhtin 2009). Time is measured in years of 365.25 days.

use std::collections::BTreeMap;

use analytics_core::types::Date;
use serde::Serialize;

use crate::error::XvaError;

const DAYS_PER_YEAR: f64 = 365.25;

/// Local volatility of the exposure process on a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalVolatility {
    /// Constant σ
    Flat(f64),
    /// σ·|V̄(t)|
    Proportional(f64),
}

impl LocalVolatility {
    /// σ at the interpolated exposure level.
    pub fn evaluate(&self, exposure: f64) -> f64 {
        match *self {
            Self::Flat(sigma) => sigma,
            Self::Proportional(sigma) => sigma * exposure.abs(),
        }
    }

    fn validate(&self) -> Result<(), XvaError> {
        let (Self::Flat(sigma) | Self::Proportional(sigma)) = *self;
        if sigma.is_finite() && sigma >= 0.0 {
            Ok(())
        } else {
            Err(XvaError::InvalidInput(format!("local volatility {sigma}")))
        }
    }
}

/// Exposure observed at a pillar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PillarVertex {
    /// Pillar date
    pub date: Date,
    /// Exposure value
    pub exposure: f64,
}

/// Bridge between two consecutive pillars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrownianBridgeSegment {
    left: PillarVertex,
    right: PillarVertex,
    local_volatility: LocalVolatility,
}

impl BrownianBridgeSegment {
    /// Creates the segment.
    ///
    /// # Errors
    /// `InvalidInput` unless `left.date < right.date` with finite exposures
    /// and a valid local volatility.
    pub fn new(
        left: PillarVertex,
        right: PillarVertex,
        local_volatility: LocalVolatility,
    ) -> Result<Self, XvaError> {
        if right.date <= left.date {
            return Err(XvaError::InvalidInput(format!(
                "pillar {} does not follow {}",
                right.date, left.date
            )));
        }
        if !left.exposure.is_finite() || !right.exposure.is_finite() {
            return Err(XvaError::InvalidInput("non-finite pillar exposure".to_string()));
        }
        local_volatility.validate()?;
        Ok(Self {
            left,
            right,
            local_volatility,
        })
    }

    /// Left pillar.
    pub fn left(&self) -> PillarVertex {
        self.left
    }

    /// Right pillar.
    pub fn right(&self) -> PillarVertex {
        self.right
    }

    /// Whether `date` lies in `[left, right]`.
    pub fn contains(&self, date: Date) -> bool {
        self.left.date <= date && date <= self.right.date
    }

    /// Bridged exposure at `date` given the normal wander `z`.
    pub fn exposure(&self, date: Date, z: f64) -> Result<f64, XvaError> {
        if !self.contains(date) {
            return Err(XvaError::DateOutOfRange {
                date: date.to_string(),
                start: self.left.date.to_string(),
                end: self.right.date.to_string(),
            });
        }
        let span = (self.right.date - self.left.date) as f64 / DAYS_PER_YEAR;
        let elapsed = (date - self.left.date) as f64 / DAYS_PER_YEAR;
        let remaining = span - elapsed;
        let linear = self.left.exposure + elapsed / span * (self.right.exposure - self.left.exposure);
        let sigma = self.local_volatility.evaluate(linear);
        Ok(linear + sigma * (elapsed * remaining / span).max(0.0).sqrt() * z)
    }
}

/// Sparse pillar exposures of one path with per-segment local volatility.
#[derive(Debug, Clone, PartialEq)]
pub struct PykhtinBrownianBridgePath {
    segments: Vec<BrownianBridgeSegment>,
    start: Date,
    end: Date,
}

impl PykhtinBrownianBridgePath {
    /// Builds the path.
    ///
    /// `local_volatility` is keyed by the right pillar date of each segment.
    ///
    /// # Errors
    /// `InvalidInput` for fewer than two pillars or a segment without a
    /// local volatility.
    pub fn new(
        pillars: &BTreeMap<Date, f64>,
        local_volatility: &BTreeMap<Date, LocalVolatility>,
    ) -> Result<Self, XvaError> {
        if pillars.len() < 2 {
            return Err(XvaError::InvalidInput(format!(
                "{} pillar(s), need at least 2",
                pillars.len()
            )));
        }
        let vertices: Vec<PillarVertex> = pillars
            .iter()
            .map(|(&date, &exposure)| PillarVertex { date, exposure })
            .collect();
        let segments = vertices
            .windows(2)
            .map(|w| {
                let vol = local_volatility.get(&w[1].date).ok_or_else(|| {
                    XvaError::InvalidInput(format!("no local volatility for {}", w[1].date))
                })?;
                BrownianBridgeSegment::new(w[0], w[1], *vol)
            })
            .collect::<Result<Vec<_>, XvaError>>()?;
        Ok(Self {
            segments,
            start: vertices[0].date,
            end: vertices[vertices.len() - 1].date,
        })
    }

    /// Segments in date order.
    pub fn segments(&self) -> &[BrownianBridgeSegment] {
        &self.segments
    }

    /// First and last pillar dates.
    pub fn span(&self) -> (Date, Date) {
        (self.start, self.end)
    }

    /// Dense exposure on the pillar dates and every wander date.
    ///
    /// Pillars keep their values; wander dates outside the pillar span are
    /// rejected.
    pub fn dense_exposure(&self, wander: &BTreeMap<Date, f64>) -> Result<BTreeMap<Date, f64>, XvaError> {
        let mut dense: BTreeMap<Date, f64> = self
            .segments
            .iter()
            .flat_map(|s| [(s.left.date, s.left.exposure), (s.right.date, s.right.exposure)])
            .collect();
        for (&date, &z) in wander {
            if dense.contains_key(&date) {
                continue;
            }
            let segment = self
                .segments
                .iter()
                .find(|s| s.contains(date))
                .ok_or_else(|| XvaError::DateOutOfRange {
                    date: date.to_string(),
                    start: self.start.to_string(),
                    end: self.end.to_string(),
                })?;
            dense.insert(date, segment.exposure(date, z)?);
        }
        Ok(dense)
    }
}
