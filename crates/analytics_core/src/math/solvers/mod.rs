//! Root-finding solvers.
//!
//! - [`BrentSolver`]: Robust bracketing method, with optional bracket expansion
//! - [`NewtonRaphsonSolver`]: Quadratic convergence from a derivative
//!
//! Both use [`SolverConfig`] for tolerance and iteration limits and report
//! failures as [`SolverError`](crate::types::SolverError).
//!
//! ```
//! use analytics_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
//!
//! let solver = NewtonRaphsonSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| (x * x - 2.0, 2.0 * x), 1.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

mod brent;
mod config;
mod newton_raphson;

pub use brent::BrentSolver;
pub use config::SolverConfig;
pub use newton_raphson::NewtonRaphsonSolver;
