//! # analytics_core: Numerical Foundation for the Analytics Workspace
//!
//! ## Foundation Role
//!
//! analytics_core is the bottom layer of the workspace, providing:
//! - Dense linear algebra helpers (`math::linalg`)
//! - Root-finding solvers and quadrature rules (`math::solvers`, `math::quadrature`)
//! - Special functions: gamma, incomplete gamma, modified Bessel (`math::special`)
//! - Spline segment bases (`math::spline`) and normed function spaces (`math::spaces`)
//! - A Kaplan-Zwick soft heap (`math::soft_heap`)
//! - Probability distributions, sequence bounds and gap tests (`statistics`)
//! - Time and currency types with structured errors (`types`)
//! - Yield curves and treasury bond conventions (`market_data`)
//!
//! ## Dependency Principle
//!
//! This crate has no dependencies on other analytics_* crates:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - serde: Serialisation of result and convention types
//! - rand / rand_distr: Seeded sampling for distributions and cohorts
//! - tracing: Diagnostic events from iterative routines
//!
//! ## Usage Examples
//!
//! ```rust
//! use analytics_core::math::special::gamma;
//! use analytics_core::types::{Currency, Date, DayCountConvention};
//!
//! // Date operations
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 7, 1).unwrap();
//! let yf = DayCountConvention::Actual365Fixed.year_fraction_dates(start, end);
//! # assert!((yf - 0.4986).abs() < 1e-3);
//!
//! // Currency information
//! assert_eq!(Currency::JPY.decimal_places(), 0);
//!
//! // Γ(5) = 4!
//! let g = gamma(5.0).unwrap();
//! # assert!((g - 24.0).abs() < 1e-8);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod statistics;
pub mod types;
