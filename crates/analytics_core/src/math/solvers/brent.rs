//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's bracketing root finder.
///
/// Combines bisection, secant and inverse quadratic interpolation. Convergence
/// is guaranteed once a sign change is bracketed.
///
/// # Example
///
/// ```
/// use analytics_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
/// let root = solver.find_root(|x: f64| x.cos() - x, 0.0, 1.0).unwrap();
/// assert!((root.cos() - root).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with [`SolverConfig::default`].
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Find a root of `f` inside `[a, b]`.
    ///
    /// # Errors
    ///
    /// - `SolverError::NoBracket` if `f(a)` and `f(b)` have the same sign
    /// - `SolverError::MaxIterationsExceeded` if not converged
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let zero = T::zero();
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();
        let eps = T::epsilon();

        let (mut a, mut b) = (a, b);
        let (mut fa, mut fb) = (f(a), f(b));
        if fa == zero {
            return Ok(a);
        }
        if fb == zero {
            return Ok(b);
        }
        if fa.signum() == fb.signum() {
            return Err(no_bracket(a, b));
        }

        let (mut c, mut fc) = (b, fb);
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.config.max_iterations {
            if fb.signum() == fc.signum() {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol = two * eps * b.abs() + self.config.tolerance / two;
            let xm = (c - b) / two;
            if xm.abs() <= tol || fb == zero || fb.abs() < self.config.tolerance {
                return Ok(b);
            }

            if e.abs() >= tol && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (two * xm * s, T::one() - s)
                } else {
                    let q0 = fa / fc;
                    let r = fb / fc;
                    (
                        s * (two * xm * q0 * (q0 - r) - (b - a) * (r - T::one())),
                        (q0 - T::one()) * (r - T::one()) * (s - T::one()),
                    )
                };
                if p > zero {
                    q = -q;
                }
                p = p.abs();
                let bound = (three * xm * q - (tol * q).abs()).min((e * q).abs());
                if two * p < bound {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }

            a = b;
            fa = fb;
            b = if d.abs() > tol {
                b + d
            } else if xm > zero {
                b + tol
            } else {
                b - tol
            };
            fb = f(b);
            if !fb.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "objective returned a non-finite value".to_string(),
                ));
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Find a root starting from `[a, b]`, geometrically widening the interval
    /// until a sign change is bracketed.
    ///
    /// The interval grows by a factor of 1.6 on the side with the smaller
    /// `|f|` at most `max_bracket_expansions` times.
    pub fn find_root_expanding<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let (lo, hi) = self.expand_bracket(&f, a, b)?;
        self.find_root(f, lo, hi)
    }

    /// Widen `[a, b]` until `f` changes sign across it.
    pub fn expand_bracket<F>(&self, f: &F, a: T, b: T) -> Result<(T, T), SolverError>
    where
        F: Fn(T) -> T,
    {
        let factor = T::from(1.6).unwrap();
        let (mut lo, mut hi) = if a < b { (a, b) } else { (b, a) };
        if lo == hi {
            hi = lo + T::one();
        }
        let (mut f_lo, mut f_hi) = (f(lo), f(hi));
        for _ in 0..self.config.max_bracket_expansions {
            if f_lo.signum() != f_hi.signum() || f_lo == T::zero() || f_hi == T::zero() {
                return Ok((lo, hi));
            }
            if f_lo.abs() < f_hi.abs() {
                lo = lo + factor * (lo - hi);
                f_lo = f(lo);
            } else {
                hi = hi + factor * (hi - lo);
                f_hi = f(hi);
            }
        }
        Err(no_bracket(lo, hi))
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}

fn no_bracket<T: Float>(a: T, b: T) -> SolverError {
    SolverError::NoBracket {
        a: a.to_f64().unwrap_or(f64::NAN),
        b: b.to_f64().unwrap_or(f64::NAN),
    }
}
