//! Numerical integration rules.
//!
//! - [`GaussLegendre`]: n-point rule on a finite interval
//! - [`GaussLaguerre`]: n-point rule for `∫₀^∞ e^{-x} f(x) dx`
//! - [`trapezoid`], [`simpson`], [`boole`]: composite Newton-Cotes rules
//!
//! Gauss nodes are located with [`NewtonRaphsonSolver`] on the three-term
//! recurrences of the Legendre and Laguerre polynomials.
//!
//! # Example
//!
//! ```
//! use analytics_core::math::quadrature::{GaussLaguerre, GaussLegendre};
//!
//! let gl = GaussLegendre::new(16).unwrap();
//! let area = gl.integrate(|x: f64| x.sin(), 0.0, std::f64::consts::PI);
//! assert!((area - 2.0).abs() < 1e-12);
//!
//! // ∫₀^∞ x² e^{-x} dx = 2
//! let lag = GaussLaguerre::new(8).unwrap();
//! assert!((lag.integrate(|x: f64| x * x) - 2.0).abs() < 1e-10);
//! ```

use std::f64::consts::PI;

use crate::math::solvers::{NewtonRaphsonSolver, SolverConfig};
use crate::types::SolverError;

/// Gauss-Legendre nodes and weights on `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

/// Legendre `(P_n(x), P'_n(x))` via the Bonnet recurrence.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let (mut p0, mut p1) = (1.0, x);
    if n == 0 {
        return (1.0, 0.0);
    }
    for k in 2..=n {
        let kf = k as f64;
        let p2 = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    let derivative = n as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, derivative)
}

impl GaussLegendre {
    /// Build the `n`-point rule.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::NumericalInstability` when `n == 0`, or the
    /// underlying Newton failure when a node does not converge.
    pub fn new(n: usize) -> Result<Self, SolverError> {
        if n == 0 {
            return Err(SolverError::NumericalInstability(
                "quadrature order must be positive".to_string(),
            ));
        }
        let solver = NewtonRaphsonSolver::new(SolverConfig::high_precision());
        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];
        let half = n.div_ceil(2);
        for i in 0..half {
            let guess = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
            let x = if n % 2 == 1 && i == half - 1 {
                0.0
            } else {
                solver.find_root(|x| legendre(n, x), guess)?
            };
            let (_, dp) = legendre(n, x);
            let w = 2.0 / ((1.0 - x * x) * dp * dp);
            nodes[i] = -x;
            nodes[n - 1 - i] = x;
            weights[i] = w;
            weights[n - 1 - i] = w;
        }
        Ok(Self { nodes, weights })
    }

    /// Nodes on `[-1, 1]` in ascending order.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights matching [`nodes`](Self::nodes).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Integrate `f` over `[a, b]`.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let mid = 0.5 * (a + b);
        let half = 0.5 * (b - a);
        half * self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(mid + half * x))
            .sum::<f64>()
    }
}

/// Gauss-Laguerre nodes and weights for the weight `e^{-x}` on `[0, ∞)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLaguerre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

/// Laguerre `(L_n(x), L_{n-1}(x))`.
fn laguerre_pair(n: usize, x: f64) -> (f64, f64) {
    let (mut prev, mut curr) = (0.0, 1.0);
    for j in 1..=n {
        let jf = j as f64;
        let next = ((2.0 * jf - 1.0 - x) * curr - (jf - 1.0) * prev) / jf;
        prev = curr;
        curr = next;
    }
    (curr, prev)
}

impl GaussLaguerre {
    /// Build the `n`-point rule.
    ///
    /// Weights follow `w_i = x_i / ((n+1)² L_{n+1}(x_i)²)`.
    pub fn new(n: usize) -> Result<Self, SolverError> {
        if n == 0 {
            return Err(SolverError::NumericalInstability(
                "quadrature order must be positive".to_string(),
            ));
        }
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-12, 200));
        let nf = n as f64;
        let value_and_slope = |x: f64| {
            let (ln, ln1) = laguerre_pair(n, x);
            (ln, nf * (ln - ln1) / x)
        };

        let mut nodes: Vec<f64> = Vec::with_capacity(n);
        for i in 0..n {
            let guess = match i {
                0 => 3.0 / (1.0 + 2.4 * nf),
                1 => nodes[0] + 15.0 / (1.0 + 2.5 * nf),
                _ => {
                    let ai = (i - 1) as f64;
                    nodes[i - 1]
                        + (1.0 + 2.55 * ai) / (1.9 * ai) * (nodes[i - 1] - nodes[i - 2])
                }
            };
            nodes.push(solver.find_root(&value_and_slope, guess)?);
        }

        let weights = nodes
            .iter()
            .map(|&x| {
                let next = laguerre_pair(n + 1, x).0;
                x / ((nf + 1.0).powi(2) * next * next)
            })
            .collect();
        Ok(Self { nodes, weights })
    }

    /// Nodes in ascending order.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights matching [`nodes`](Self::nodes).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Approximate `∫₀^∞ e^{-x} f(x) dx`.
    pub fn integrate<F>(&self, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(x))
            .sum()
    }
}

/// Composite trapezoid rule with `n` panels (at least one).
pub fn trapezoid<F>(f: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = n.max(1);
    let h = (b - a) / n as f64;
    let interior: f64 = (1..n).map(|i| f(a + i as f64 * h)).sum();
    h * (0.5 * (f(a) + f(b)) + interior)
}

/// Composite Simpson rule; `n` is rounded up to an even panel count.
pub fn simpson<F>(f: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = n.max(2).next_multiple_of(2);
    let h = (b - a) / n as f64;
    let sum: f64 = (1..n)
        .map(|i| {
            let coef = if i % 2 == 1 { 4.0 } else { 2.0 };
            coef * f(a + i as f64 * h)
        })
        .sum();
    h / 3.0 * (f(a) + f(b) + sum)
}

/// Composite Boole rule; `n` is rounded up to a multiple of four panels.
///
/// Exact for polynomials up to degree five.
pub fn boole<F>(f: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = n.max(4).next_multiple_of(4);
    let h = (b - a) / n as f64;
    let sum: f64 = (0..=n)
        .map(|i| {
            let coef = if i == 0 || i == n {
                7.0
            } else {
                match i % 4 {
                    0 => 14.0,
                    2 => 12.0,
                    _ => 32.0,
                }
            };
            coef * f(a + i as f64 * h)
        })
        .sum();
    2.0 * h / 45.0 * sum
}
