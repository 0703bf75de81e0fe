//! Newton-Raphson iteration.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Newton root finder over a closure returning `(f(x), f'(x))`.
///
/// Evaluating value and slope together suits recurrences such as orthogonal
/// polynomials, where both come out of the same pass.
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> NewtonRaphsonSolver<T> {
    /// Solver with the given stopping rules.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Solver with [`SolverConfig::default`].
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Stopping rules in use.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Iterates `x ← x − f(x)/f'(x)` from `x0`.
    ///
    /// Stops when `|f(x)|` or the relative step falls under the tolerance.
    ///
    /// # Errors
    ///
    /// - `DerivativeNearZero` for a slope under 1e-30 in magnitude
    /// - `NumericalInstability` for a non-finite iterate
    /// - `MaxIterationsExceeded` otherwise
    pub fn find_root<F>(&self, f: F, x0: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> (T, T),
    {
        let flat = T::from(1e-30).unwrap();
        let tol = self.config.tolerance;
        let mut x = x0;
        for _ in 0..self.config.max_iterations {
            let (value, slope) = f(x);
            if value.abs() < tol {
                return Ok(x);
            }
            if slope.abs() < flat {
                return Err(SolverError::DerivativeNearZero {
                    x: x.to_f64().unwrap_or(f64::NAN),
                });
            }
            let step = value / slope;
            x = x - step;
            if !x.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "Newton iterate left the finite range".to_string(),
                ));
            }
            if step.abs() < tol * (T::one() + x.abs()) {
                return Ok(x);
            }
        }
        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cube_root() {
        let solver = NewtonRaphsonSolver::with_defaults();
        let root = solver.find_root(|x: f64| (x * x * x - 5.0, 3.0 * x * x), 2.0).unwrap();
        assert_abs_diff_eq!(root, 5.0_f64.cbrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_flat_slope() {
        let solver = NewtonRaphsonSolver::with_defaults();
        let result = solver.find_root(|x: f64| (x * x + 1.0, 2.0 * x), 0.0);
        assert!(matches!(result, Err(SolverError::DerivativeNearZero { .. })));
    }

    #[test]
    fn test_divergent_iteration_stops() {
        // atan overshoots from |x0| > 1.39 and never settles
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-12, 3));
        let result = solver.find_root(|x: f64| (x.atan(), 1.0 / (1.0 + x * x)), 1.5);
        assert!(result.is_err());
    }
}
