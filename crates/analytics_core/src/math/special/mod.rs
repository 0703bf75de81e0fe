//! Special functions.
//!
//! - [`gamma`](mod@gamma): Lanczos, Nemes and Euler-integral estimators of Γ
//! - [`incomplete`]: regularised incomplete gamma functions
//! - [`bessel`]: modified Bessel function of the first kind
//! - [`fuchsian`]: Fuchsian equation descriptor

pub mod bessel;
pub mod fuchsian;
pub mod gamma;
pub mod incomplete;

pub use bessel::ModifiedBesselFirstKind;
pub use fuchsian::{FuchsianEquation, KleinGroupFunction};
pub use gamma::{factorial, gamma, ln_gamma, nemes_gamma, pole_residue, EulerIntegralEstimator};
pub use incomplete::{regularized_lower_gamma, regularized_upper_gamma};
