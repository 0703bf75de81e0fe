//! Integration tests for module exports.
//!
//! Verify that public modules and types are reachable via absolute paths.

/// Types module re-exports.
#[test]
fn test_types_module_exports() {
    use analytics_core::types::{Currency, Date, DayCountConvention, Frequency, Tenor};

    let start = Date::from_ymd(2024, 1, 31).unwrap();
    let end = start.add_tenor("1M".parse::<Tenor>().unwrap()).unwrap();
    assert_eq!(end, Date::from_ymd(2024, 2, 29).unwrap());
    assert_eq!(Currency::USD.code(), "USD");
    assert_eq!(Frequency::Quarterly.periods_per_year(), 4);
    assert!(DayCountConvention::Actual360.year_fraction_dates(start, end) > 0.0);
}

/// Math module paths.
#[test]
fn test_math_module_exports() {
    use analytics_core::math::linalg::{identity, invert, InversionMethod};
    use analytics_core::math::quadrature::GaussLegendre;
    use analytics_core::math::soft_heap::SoftHeap;
    use analytics_core::math::solvers::{BrentSolver, NewtonRaphsonSolver, SolverConfig};
    use analytics_core::math::special::{gamma, ModifiedBesselFirstKind};
    use analytics_core::math::spline::{BSplineBasis, BasisKnots, HatBasis, SegmentBasisFunction};

    let inv = invert(&identity(3), InversionMethod::GaussianElimination).unwrap();
    assert_eq!(inv, identity(3));
    assert!(GaussLegendre::new(4).is_ok());
    let _ = BrentSolver::<f64>::new(SolverConfig::fast());
    let _ = NewtonRaphsonSolver::<f64>::with_defaults();
    assert!(gamma(3.0).unwrap() > 1.99);
    assert!(ModifiedBesselFirstKind::new().is_ok());
    let hat = HatBasis::new(BasisKnots::new(0.0, 1.0, 2.0).unwrap());
    assert_eq!(hat.normalizer(), 1.0);
    assert_eq!(BSplineBasis::clamped(&[0.0, 1.0], 2).unwrap().len(), 3);
    let mut heap: SoftHeap<u32, ()> = SoftHeap::new(4);
    heap.insert(1, ());
    assert_eq!(heap.len(), 1);
}

/// Statistics and market data paths.
#[test]
fn test_statistics_and_market_data_exports() {
    use analytics_core::market_data::{benchmark_setting, FlatCurve, YieldCurve};
    use analytics_core::statistics::{
        gap_test, Ensemble, GapLossWeight, R1Distribution, Sample, StretchedExponential,
    };

    let d = StretchedExponential::new(1.0, 0.5).unwrap();
    assert!(d.density(0.5) > 0.0);
    let sample = Sample::new(vec![0.1, 0.2, 0.3]).unwrap();
    let ensemble = Ensemble::new(&[sample.clone()]).unwrap();
    assert!(gap_test(&sample, &ensemble, GapLossWeight::CramerVonMises).distance >= 0.0);
    assert_eq!(benchmark_setting("USD").unwrap().code, "UST");
    assert!(FlatCurve::new(0.01_f64).discount_factor(1.0).unwrap() < 1.0);
}
