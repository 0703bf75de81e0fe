//! # analytics_oms: Order Management Analytics
//!
//! ## Components
//!
//! - `venue`: regular (maker-taker) and inverted (taker-maker) venues with
//!   per-share fee schedules; post and sweep fees
//! - `reservation`: utility indifference pricing of contingent claims over a
//!   terminal underlier distribution
//!
//! ## Example
//!
//! ```
//! use analytics_oms::venue::{FeeSchedule, VenueSettings};
//!
//! let venue = VenueSettings::inverted("BATY", FeeSchedule::per_share(0.0018, -0.0015)).unwrap();
//! assert!(venue.sweep_fee("MSFT", 410.0, 200.0).unwrap() < 0.0);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod reservation;
pub mod venue;

pub use error::OmsError;
