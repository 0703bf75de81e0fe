//! Mathematical utilities.
//!
//! This module provides:
//! - `linalg`: Dense matrix operations, inversion, decompositions
//! - `solvers`: Root-finding algorithms (Newton-Raphson, Brent)
//! - `quadrature`: Gauss-Legendre, Gauss-Laguerre and Newton-Cotes rules
//! - `special`: Gamma, incomplete gamma, modified Bessel, Fuchsian descriptors
//! - `spline`: Segment basis functions and B-spline bases
//! - `spaces`: Normed function spaces and covering numbers
//! - `soft_heap`: Kaplan-Zwick soft priority queue

pub mod linalg;
pub mod quadrature;
pub mod soft_heap;
pub mod solvers;
pub mod spaces;
pub mod special;
pub mod spline;
