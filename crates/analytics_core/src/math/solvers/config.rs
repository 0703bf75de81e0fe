//! Stopping rules shared by the root finders.

use num_traits::Float;

/// Tolerance and iteration limits of a root search.
///
/// ```
/// use analytics_core::math::solvers::SolverConfig;
///
/// let loose: SolverConfig<f64> = SolverConfig::fast();
/// let tight = SolverConfig::new(1e-13, 300).with_bracket_expansions(10);
/// assert!(tight.tolerance < loose.tolerance);
/// assert_eq!(tight.max_bracket_expansions, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Accepted `|f(x)|`, and the bracket half-width at which Brent stops.
    pub tolerance: T,
    /// Iterations before `MaxIterationsExceeded`.
    pub max_iterations: usize,
    /// Geometric widenings allowed while searching for a sign change.
    pub max_bracket_expansions: usize,
}

impl<T: Float> SolverConfig<T> {
    /// Config with the given tolerance and iteration cap.
    ///
    /// A non-positive tolerance or a zero cap falls back to the default value
    /// of that field.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        let default = Self::default();
        Self {
            tolerance: if tolerance > T::zero() {
                tolerance
            } else {
                default.tolerance
            },
            max_iterations: if max_iterations > 0 {
                max_iterations
            } else {
                default.max_iterations
            },
            ..default
        }
    }

    /// Replaces the bracket expansion budget.
    pub fn with_bracket_expansions(mut self, expansions: usize) -> Self {
        self.max_bracket_expansions = expansions;
        self
    }

    /// 1e-14 over at most 500 iterations.
    pub fn high_precision() -> Self {
        Self::new(T::from(1e-14).unwrap(), 500)
    }

    /// 1e-6 over at most 50 iterations.
    pub fn fast() -> Self {
        Self::new(T::from(1e-6).unwrap(), 50)
    }
}

impl<T: Float> Default for SolverConfig<T> {
    /// 1e-10 over at most 100 iterations, 60 bracket expansions.
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap(),
            max_iterations: 100,
            max_bracket_expansions: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config: SolverConfig<f64> = SolverConfig::default();
        assert_eq!(config.tolerance, 1e-10);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.max_bracket_expansions, 60);
    }

    #[test]
    fn test_invalid_limits_fall_back() {
        let config: SolverConfig<f64> = SolverConfig::new(-1.0, 0);
        assert_eq!(config, SolverConfig::default());
        let config: SolverConfig<f64> = SolverConfig::new(1e-12, 0);
        assert_eq!(config.tolerance, 1e-12);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn test_presets() {
        let hp: SolverConfig<f64> = SolverConfig::high_precision();
        let fast: SolverConfig<f64> = SolverConfig::fast();
        assert!(hp.tolerance < fast.tolerance);
        assert!(hp.max_iterations > fast.max_iterations);
        assert_eq!(fast.with_bracket_expansions(0).max_bracket_expansions, 0);
    }
}
