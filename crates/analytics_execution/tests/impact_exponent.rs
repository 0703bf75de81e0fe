//! Principal bid measures across temporary impact exponents.

use analytics_execution::dynamics::{ArithmeticPriceDynamics, PriceEvolutionParameters};
use analytics_execution::impact::{MarketObservables, PriceMarketImpact};
use analytics_execution::nonadaptive::ContinuousPowerImpact;
use analytics_execution::principal::Almgren2003Estimator;
use analytics_execution::risk::MeanVarianceObjective;
use analytics_execution::strategy::OrderSpecification;
use approx::assert_abs_diff_eq;

const DISCOUNT: f64 = 0.15;

fn estimator(k: f64) -> Almgren2003Estimator {
    let obs = MarketObservables {
        price: 50.0,
        daily_volume: 1_000_000.0,
        bid_ask_spread: 0.0,
        execution_factor: 0.1,
        permanent_factor: 0.0,
        temporary_factor: 0.01,
    };
    let scheme = ContinuousPowerImpact::new(
        OrderSpecification::new(100_000.0, 5.0, 50).unwrap(),
        PriceEvolutionParameters::new(
            ArithmeticPriceDynamics::flat(50.0, 0.0, 1.0).unwrap(),
            PriceMarketImpact::power(&obs, k).unwrap(),
        ),
        MeanVarianceObjective::new(1e-6).unwrap(),
    );
    Almgren2003Estimator::new(&scheme).unwrap()
}

struct Row {
    k: f64,
    breakeven: f64,
    mean: f64,
    std_dev: f64,
    horizon_mean: f64,
    horizon_std_dev: f64,
    ratio: f64,
    optimal_ratio: f64,
    optimal_horizon: f64,
}

fn check(row: &Row) {
    let e = estimator(row.k);
    let m = e.principal_measure(DISCOUNT).unwrap();
    let h = e.horizon_principal_measure(DISCOUNT).unwrap();
    assert_abs_diff_eq!(e.breakeven_principal_discount(), row.breakeven, epsilon = 1e-4);
    assert_abs_diff_eq!(m.mean, row.mean, epsilon = 1.0);
    assert_abs_diff_eq!(m.std_dev(), row.std_dev, epsilon = 1.0);
    assert_abs_diff_eq!(h.mean, row.horizon_mean, epsilon = 1.0);
    assert_abs_diff_eq!(h.std_dev(), row.horizon_std_dev, epsilon = 1.0);
    assert_abs_diff_eq!(e.information_ratio(DISCOUNT).unwrap(), row.ratio, epsilon = 1e-4);
    assert_abs_diff_eq!(
        e.optimal_information_ratio(DISCOUNT).unwrap(),
        row.optimal_ratio,
        epsilon = 1e-4
    );
    assert_abs_diff_eq!(
        e.optimal_information_ratio_horizon(DISCOUNT).unwrap(),
        row.optimal_horizon,
        epsilon = 1e-2
    );
}

#[test]
fn test_concave_impact_row() {
    check(&Row {
        k: 0.2,
        breakeven: 0.375,
        mean: -22_500.0,
        std_dev: 86_603.0,
        horizon_mean: -22_500.0,
        horizon_std_dev: 86_603.0,
        ratio: -0.2598,
        optimal_ratio: 0.0001,
        optimal_horizon: 243.0,
    });
}

#[test]
fn test_linear_impact_row() {
    check(&Row {
        k: 1.0,
        breakeven: 0.1118,
        mean: 3_820.0,
        std_dev: 105_737.0,
        horizon_mean: 1_708.0,
        horizon_std_dev: 70_711.0,
        ratio: 0.0242,
        optimal_ratio: 0.0318,
        optimal_horizon: 3.333,
    });
}

#[test]
fn test_convex_impact_row() {
    check(&Row {
        k: 1.5,
        breakeven: 0.0678,
        mean: 8_216.0,
        std_dev: 100_879.0,
        horizon_mean: 3_670.0,
        horizon_std_dev: 67_420.0,
        ratio: 0.0544,
        optimal_ratio: 0.0549,
        optimal_horizon: 2.43,
    });
}

#[test]
fn test_breakeven_falls_with_exponent() {
    let ks = [0.2, 0.4, 0.6, 0.8, 1.0, 1.2, 1.5];
    let breakevens: Vec<f64> = ks
        .iter()
        .map(|&k| estimator(k).breakeven_principal_discount())
        .collect();
    assert!(breakevens.windows(2).all(|w| w[1] < w[0]), "{breakevens:?}");
}
