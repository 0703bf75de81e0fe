//! # analytics_execution: Optimal Execution of Large Orders
//!
//! ## Execution Layer
//!
//! analytics_execution builds on analytics_core to provide:
//! - Arithmetic price dynamics and market impact functions (`dynamics`, `impact`)
//! - Order specifications and discrete trajectories (`strategy`)
//! - Mean-variance objectives (`risk`)
//! - Implementation shortfall estimation of any trajectory (`capture`)
//! - Static optimal schemes: discrete with drift, continuous linear and
//!   power-law impact (`nonadaptive`)
//! - Efficient frontiers (`optimum`)
//! - Control-node greeks via dual numbers (`sensitivity`)
//! - Principal bid estimation (`principal`)
//!
//! ## Conventions
//!
//! - Holdings are sampled on `N + 1` nodes and the trade list holds the
//!   `N` signed differences, so a liquidation has negative trades.
//! - Shortfall is measured against the initial price: positive values are
//!   costs.
//!
//! ## Usage Examples
//!
//! ```rust
//! use analytics_execution::dynamics::{ArithmeticPriceDynamics, PriceEvolutionParameters};
//! use analytics_execution::impact::{PriceMarketImpact, TransactionFunction};
//! use analytics_execution::nonadaptive::{ContinuousAlmgrenChriss, StaticOptimalScheme};
//! use analytics_execution::risk::MeanVarianceObjective;
//! use analytics_execution::strategy::OrderSpecification;
//!
//! let scheme = ContinuousAlmgrenChriss::new(
//!     OrderSpecification::new(1.0e6, 5.0, 5).unwrap(),
//!     PriceEvolutionParameters::new(
//!         ArithmeticPriceDynamics::flat(50.0, 0.0, 0.95).unwrap(),
//!         PriceMarketImpact::new(
//!             TransactionFunction::linear(2.5e-7, 0.0).unwrap(),
//!             TransactionFunction::linear(2.5e-6, 0.0625).unwrap(),
//!         ),
//!     ),
//!     MeanVarianceObjective::new(2e-6).unwrap(),
//! );
//! let optimum = scheme.generate().unwrap();
//! assert_eq!(optimum.trajectory.final_holdings(), 0.0);
//! assert!(optimum.expected_shortfall > 0.0);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod capture;
pub mod dynamics;
pub mod error;
pub mod impact;
pub mod nonadaptive;
pub mod optimum;
pub mod principal;
pub mod risk;
pub mod sensitivity;
pub mod strategy;

pub use error::ExecutionError;
