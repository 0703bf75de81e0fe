//! Segment basis functions and B-spline bases.
//!
//! A segment basis function is supported on `[leading, trailing]`, peaks at the
//! interior `following` knot, and exposes its integral (`normalizer`) and
//! normalised cumulative so it can be used as a local density.
//!
//! [`BSplineBasis`] evaluates the full Cox-de Boor basis over a clamped or
//! open knot vector.

use crate::types::SplineError;

/// The three knots of a segment basis function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisKnots {
    leading: f64,
    following: f64,
    trailing: f64,
}

impl BasisKnots {
    /// Knots with `leading < following < trailing`.
    pub fn new(leading: f64, following: f64, trailing: f64) -> Result<Self, SplineError> {
        if !(leading.is_finite() && following.is_finite() && trailing.is_finite()) {
            return Err(SplineError::InvalidKnots("knots must be finite"));
        }
        if !(leading < following && following < trailing) {
            return Err(SplineError::InvalidKnots("knots must be strictly increasing"));
        }
        Ok(Self {
            leading,
            following,
            trailing,
        })
    }

    /// Left end of the support.
    pub fn leading(&self) -> f64 {
        self.leading
    }

    /// Interior knot.
    pub fn following(&self) -> f64 {
        self.following
    }

    /// Right end of the support.
    pub fn trailing(&self) -> f64 {
        self.trailing
    }
}

/// A basis function on one knot segment.
pub trait SegmentBasisFunction {
    /// Basis order (polynomial degree plus one for polynomial bases).
    fn order(&self) -> usize;

    /// Knots of the support.
    fn knots(&self) -> &BasisKnots;

    /// Value at `x`; zero outside the support.
    fn evaluate(&self, x: f64) -> f64;

    /// Derivative of the given order at `x`.
    fn derivative(&self, x: f64, order: u32) -> f64;

    /// `∫_{leading}^{x} f`, clamped to the support.
    fn antiderivative(&self, x: f64) -> f64;

    /// `∫_{begin}^{end} f`.
    fn integrate(&self, begin: f64, end: f64) -> f64 {
        self.antiderivative(end) - self.antiderivative(begin)
    }

    /// Integral over the whole support.
    fn normalizer(&self) -> f64 {
        self.antiderivative(self.knots().trailing)
    }

    /// Fraction of the integral accumulated up to `x`.
    fn normalized_cumulative(&self, x: f64) -> f64 {
        self.antiderivative(x) / self.normalizer()
    }
}

/// Piecewise-linear hat (order-2 B-spline).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HatBasis {
    knots: BasisKnots,
}

impl HatBasis {
    /// Hat rising from `leading` to one at `following`, back to zero at `trailing`.
    pub fn new(knots: BasisKnots) -> Self {
        Self { knots }
    }
}

impl SegmentBasisFunction for HatBasis {
    fn order(&self) -> usize {
        2
    }

    fn knots(&self) -> &BasisKnots {
        &self.knots
    }

    fn evaluate(&self, x: f64) -> f64 {
        let BasisKnots { leading: l, following: f, trailing: t } = self.knots;
        if x <= l || x >= t {
            0.0
        } else if x <= f {
            (x - l) / (f - l)
        } else {
            (t - x) / (t - f)
        }
    }

    fn derivative(&self, x: f64, order: u32) -> f64 {
        let BasisKnots { leading: l, following: f, trailing: t } = self.knots;
        match order {
            0 => self.evaluate(x),
            1 if x > l && x <= f => 1.0 / (f - l),
            1 if x > f && x < t => -1.0 / (t - f),
            _ => 0.0,
        }
    }

    fn antiderivative(&self, x: f64) -> f64 {
        let BasisKnots { leading: l, following: f, trailing: t } = self.knots;
        let x = x.clamp(l, t);
        if x <= f {
            (x - l).powi(2) / (2.0 * (f - l))
        } else {
            0.5 * (f - l) + ((t - f).powi(2) - (t - x).powi(2)) / (2.0 * (t - f))
        }
    }
}

/// Hyperbolic tension basis: `sinh(τ(x − l)) / sinh(τ(f − l))` rising,
/// mirrored on the falling side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TensionBasis {
    knots: BasisKnots,
    tension: f64,
}

impl TensionBasis {
    /// Build with a positive tension τ.
    pub fn new(knots: BasisKnots, tension: f64) -> Result<Self, SplineError> {
        if !(tension > 0.0 && tension.is_finite()) {
            return Err(SplineError::InvalidTension(tension));
        }
        Ok(Self { knots, tension })
    }

    /// Tension τ.
    pub fn tension(&self) -> f64 {
        self.tension
    }
}

impl SegmentBasisFunction for TensionBasis {
    fn order(&self) -> usize {
        2
    }

    fn knots(&self) -> &BasisKnots {
        &self.knots
    }

    fn evaluate(&self, x: f64) -> f64 {
        self.derivative(x, 0)
    }

    fn derivative(&self, x: f64, order: u32) -> f64 {
        let BasisKnots { leading: l, following: f, trailing: t } = self.knots;
        let tau = self.tension;
        if x <= l || x >= t {
            return 0.0;
        }
        let scale = tau.powi(order as i32);
        let shape = |y: f64| if order % 2 == 0 { y.sinh() } else { y.cosh() };
        if x <= f {
            scale * shape(tau * (x - l)) / (tau * (f - l)).sinh()
        } else {
            let sign = if order % 2 == 0 { 1.0 } else { -1.0 };
            sign * scale * shape(tau * (t - x)) / (tau * (t - f)).sinh()
        }
    }

    fn antiderivative(&self, x: f64) -> f64 {
        let BasisKnots { leading: l, following: f, trailing: t } = self.knots;
        let tau = self.tension;
        let x = x.clamp(l, t);
        let rising = |y: f64| ((tau * (y - l)).cosh() - 1.0) / (tau * (tau * (f - l)).sinh());
        if x <= f {
            rising(x)
        } else {
            rising(f)
                + ((tau * (t - f)).cosh() - (tau * (t - x)).cosh()) / (tau * (tau * (t - f)).sinh())
        }
    }
}

/// B-spline basis of a given degree over a non-decreasing knot vector.
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineBasis {
    knots: Vec<f64>,
    degree: usize,
}

impl BSplineBasis {
    /// Build from knots (non-decreasing, at least `degree + 2`).
    pub fn new(knots: Vec<f64>, degree: usize) -> Result<Self, SplineError> {
        if knots.len() < degree + 2 {
            return Err(SplineError::InvalidKnots("need at least degree + 2 knots"));
        }
        if knots.iter().any(|k| !k.is_finite()) || knots.windows(2).any(|w| w[0] > w[1]) {
            return Err(SplineError::InvalidKnots("knots must be finite and non-decreasing"));
        }
        if knots[0] >= knots[knots.len() - 1] {
            return Err(SplineError::InvalidKnots("knot span is empty"));
        }
        Ok(Self { knots, degree })
    }

    /// Clamped knot vector: `degree + 1` copies of each end around `breakpoints`.
    pub fn clamped(breakpoints: &[f64], degree: usize) -> Result<Self, SplineError> {
        let (Some(&first), Some(&last)) = (breakpoints.first(), breakpoints.last()) else {
            return Err(SplineError::InvalidKnots("no breakpoints"));
        };
        let mut knots = vec![first; degree];
        knots.extend_from_slice(breakpoints);
        knots.extend(std::iter::repeat(last).take(degree));
        Self::new(knots, degree)
    }

    /// Polynomial degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Knot vector.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Number of basis functions.
    pub fn len(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// True when the basis is empty (never, once constructed).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interval on which the basis sums to one.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.len()])
    }

    fn check_index(&self, index: usize) -> Result<(), SplineError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(SplineError::IndexOutOfRange {
                index,
                count: self.len(),
            })
        }
    }

    /// Cox-de Boor recursion for `B_{i,k}(x)`. The last non-empty knot
    /// interval is closed so the basis reaches the right end.
    fn cox_de_boor(&self, i: usize, k: usize, x: f64) -> f64 {
        let t = &self.knots;
        if k == 0 {
            let last = t[t.len() - 1];
            let inside = t[i] <= x && x < t[i + 1];
            let right_end = x == last && t[i] < t[i + 1] && t[i + 1] == last;
            return if inside || right_end { 1.0 } else { 0.0 };
        }
        let mut value = 0.0;
        let rising = t[i + k] - t[i];
        if rising > 0.0 {
            value += (x - t[i]) / rising * self.cox_de_boor(i, k - 1, x);
        }
        let falling = t[i + k + 1] - t[i + 1];
        if falling > 0.0 {
            value += (t[i + k + 1] - x) / falling * self.cox_de_boor(i + 1, k - 1, x);
        }
        value
    }

    /// Value of basis function `index` at `x`.
    pub fn evaluate(&self, index: usize, x: f64) -> Result<f64, SplineError> {
        self.check_index(index)?;
        Ok(self.cox_de_boor(index, self.degree, x))
    }

    /// Values of all basis functions at `x`.
    pub fn evaluate_all(&self, x: f64) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.cox_de_boor(i, self.degree, x))
            .collect()
    }

    /// First derivative of basis function `index` at `x`.
    pub fn derivative(&self, index: usize, x: f64) -> Result<f64, SplineError> {
        self.check_index(index)?;
        let p = self.degree;
        if p == 0 {
            return Ok(0.0);
        }
        let t = &self.knots;
        let term = |i: usize| {
            let width = t[i + p] - t[i];
            if width > 0.0 {
                p as f64 * self.cox_de_boor(i, p - 1, x) / width
            } else {
                0.0
            }
        };
        Ok(term(index) - term(index + 1))
    }
}
