//! Cross-scheme properties of static optimal trajectories.

use analytics_execution::capture::TrajectoryShortfallEstimator;
use analytics_execution::dynamics::{ArithmeticPriceDynamics, PriceEvolutionParameters};
use analytics_execution::impact::{PriceMarketImpact, TransactionFunction};
use analytics_execution::nonadaptive::{
    ContinuousAlmgrenChriss, DiscreteAlmgrenChrissDrift, StaticOptimalScheme,
};
use analytics_execution::optimum::EfficientFrontier;
use analytics_execution::risk::MeanVarianceObjective;
use analytics_execution::sensitivity::control_nodes_greeks;
use analytics_execution::strategy::OrderSpecification;
use approx::assert_relative_eq;
use proptest::prelude::*;

fn params(alpha: f64) -> PriceEvolutionParameters {
    PriceEvolutionParameters::new(
        ArithmeticPriceDynamics::flat(50.0, alpha, 0.95).unwrap(),
        PriceMarketImpact::new(
            TransactionFunction::linear(2.5e-7, 0.0).unwrap(),
            TransactionFunction::linear(2.5e-6, 0.0625).unwrap(),
        ),
    )
}

#[test]
fn test_continuous_frontier_is_monotone() {
    let order = OrderSpecification::new(1.0e6, 5.0, 20).unwrap();
    let lambdas = [0.0, 1e-7, 1e-6, 5e-6, 2e-5];
    let frontier = EfficientFrontier::trace(&lambdas, |objective| {
        Ok(ContinuousAlmgrenChriss::new(order, params(0.0), objective))
    })
    .unwrap();
    assert_eq!(frontier.points().len(), lambdas.len());
    assert!(frontier.is_monotone());
}

#[test]
fn test_discrete_frontier_is_monotone() {
    let order = OrderSpecification::new(1.0e6, 5.0, 10).unwrap();
    let frontier = EfficientFrontier::trace(&[1e-7, 1e-6, 1e-5], |objective| {
        Ok(DiscreteAlmgrenChrissDrift::new(order, params(0.02), objective))
    })
    .unwrap();
    assert!(frontier.is_monotone());
}

#[test]
fn test_discrete_optimum_is_stationary() {
    let order = OrderSpecification::new(1.0e6, 5.0, 8).unwrap();
    let objective = MeanVarianceObjective::new(2e-6).unwrap();
    let scheme = DiscreteAlmgrenChrissDrift::new(order, params(0.0), objective);
    let optimum = scheme.generate().unwrap();
    let greeks = control_nodes_greeks(&optimum.trajectory, scheme.parameters(), &objective).unwrap();
    let scale = optimum.expected_shortfall / 1.0e6;
    for g in greeks.objective.jacobian() {
        assert!(g.abs() < 1e-6 * scale, "gradient {g}");
    }
}

#[test]
fn test_estimator_reproduces_discrete_moments() {
    let order = OrderSpecification::new(1.0e6, 5.0, 10).unwrap();
    let scheme = DiscreteAlmgrenChrissDrift::new(
        order,
        params(0.0),
        MeanVarianceObjective::new(1e-6).unwrap(),
    );
    let optimum = scheme.generate().unwrap();
    let estimate = TrajectoryShortfallEstimator::new(optimum.trajectory.clone())
        .estimate(scheme.parameters())
        .unwrap();
    assert_relative_eq!(estimate.expectation, optimum.expected_shortfall, max_relative = 1e-9);
    assert_relative_eq!(estimate.variance, optimum.shortfall_variance, max_relative = 1e-9);
}

proptest! {
    #[test]
    fn prop_risk_neutral_discrete_is_twap(
        holdings in 1.0e3f64..1.0e7,
        intervals in 2usize..40,
    ) {
        let order = OrderSpecification::new(holdings, 1.0, intervals).unwrap();
        let optimum = DiscreteAlmgrenChrissDrift::new(
            order,
            params(0.0),
            MeanVarianceObjective::new(0.0).unwrap(),
        )
        .generate()
        .unwrap();
        for (i, h) in optimum.trajectory.holdings().iter().enumerate() {
            let twap = holdings * (1.0 - i as f64 / intervals as f64);
            prop_assert!((h - twap).abs() <= 1e-9 * holdings);
        }
    }

    #[test]
    fn prop_continuous_holdings_decrease(
        lambda in 0.0f64..1e-4,
        intervals in 1usize..60,
    ) {
        let order = OrderSpecification::new(1.0e6, 5.0, intervals).unwrap();
        let optimum = ContinuousAlmgrenChriss::new(
            order,
            params(0.0),
            MeanVarianceObjective::new(lambda).unwrap(),
        )
        .generate()
        .unwrap();
        let holdings = optimum.trajectory.holdings();
        prop_assert_eq!(holdings[0], 1.0e6);
        prop_assert_eq!(holdings[intervals], 0.0);
        prop_assert!(holdings.windows(2).all(|w| w[1] <= w[0]));
    }
}
