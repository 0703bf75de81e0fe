//! # analytics_xva: Exposure and CSA Analytics
//!
//! ## Components
//!
//! - `exposure::bridge`: Pykhtin Brownian bridge filling dense exposure
//!   dates between sparse pillar valuations
//! - `exposure`: EE, ENE, PFE, EPE and EEPE across scenario paths, computed
//!   in parallel with rayon
//! - `csa`: multilateral CSA discounting (overnight curve plus basis)
//!
//! ## Example
//!
//! ```
//! use analytics_xva::exposure::ExposureProfile;
//!
//! let paths = vec![vec![0.0, 4.0, -2.0], vec![0.0, -1.0, 6.0]];
//! let profile = ExposureProfile::compute(&paths, &[0.0, 0.5, 1.0], 0.95).unwrap();
//! assert_eq!(profile.expected_exposure, vec![0.0, 2.0, 3.0]);
//! ```

#![warn(missing_docs)]

pub mod csa;
pub mod error;
pub mod exposure;

pub use error::XvaError;
