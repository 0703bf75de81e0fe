//! Probability distributions and sample statistics.
//!
//! - [`distributions`]: the [`R1Distribution`] trait with uniform, exponential,
//!   normal and Kohlrausch stretched-exponential laws
//! - [`sequence`]: concentration bounds for unit random sequences
//! - [`gap_test`]: PIT-based distance tests between a sample and an ensemble
//! - [`cohort`]: labelled (correlated) normal increment cohorts

pub mod cohort;
pub mod distributions;
pub mod gap_test;
pub mod sequence;

pub use cohort::{sample_correlation, CohortGrid, NormalSampleCohort};
pub use distributions::{
    norm_cdf, norm_pdf, Exponential, Normal, R1Distribution, StretchedExponential, Uniform,
};
pub use gap_test::{
    empirical_p_value, gap_test, Ensemble, GapLossWeight, GapTestOutcome, PitHistogram,
    PitPoint, Sample,
};
pub use sequence::{TailBounds, UnitSequence};
