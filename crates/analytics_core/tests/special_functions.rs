//! Cross-checks between independent special-function estimators.

use analytics_core::math::special::{
    gamma, nemes_gamma, regularized_lower_gamma, EulerIntegralEstimator, ModifiedBesselFirstKind,
};
use analytics_core::statistics::{R1Distribution, StretchedExponential};
use approx::{assert_abs_diff_eq, assert_relative_eq};

#[test]
fn test_euler_integral_matches_lanczos_grid() {
    let estimator = EulerIntegralEstimator::with_defaults().unwrap();
    for i in 1..=40 {
        let s = 0.25 * f64::from(i);
        assert_relative_eq!(
            estimator.evaluate(s).unwrap(),
            gamma(s).unwrap(),
            max_relative = 1e-6
        );
    }
}

#[test]
fn test_nemes_tracks_lanczos() {
    for s in [10.0, 15.5, 40.0] {
        assert_relative_eq!(nemes_gamma(s).unwrap(), gamma(s).unwrap(), max_relative = 1e-7);
    }
}

#[test]
fn test_bessel_series_agreement() {
    // I_n(z) = Σ (z/2)^{2k+n} / (k! Γ(k+n+1))
    let bessel = ModifiedBesselFirstKind::new().unwrap();
    for (alpha, z) in [(0.0_f64, 2.5_f64), (1.5, 0.7), (2.3, 4.0)] {
        let series: f64 = (0..40)
            .map(|k| {
                let k = f64::from(k);
                (0.5 * z).powf(2.0 * k + alpha) / (gamma(k + 1.0).unwrap() * gamma(k + alpha + 1.0).unwrap())
            })
            .sum();
        assert_relative_eq!(bessel.evaluate(alpha, z).unwrap(), series, max_relative = 1e-8);
    }
}

#[test]
fn test_kohlrausch_table() {
    let betas: Vec<f64> = (1..=9).map(|i| 0.1 * f64::from(i)).collect();
    let times = [0.1, 0.2, 0.3, 0.4, 0.5, 1.0, 2.0, 5.0, 10.0];
    for &beta in &betas {
        let d = StretchedExponential::new(1.0, beta).unwrap();
        let cdfs: Vec<f64> = times.iter().map(|&t| d.cumulative(t).unwrap()).collect();
        assert!(cdfs.windows(2).all(|w| w[0] < w[1]));
        let densities: Vec<f64> = times.iter().map(|&t| d.density(t)).collect();
        assert!(densities.windows(2).all(|w| w[0] > w[1]));
        for p in [0.05, 0.15, 0.25, 0.35, 0.45] {
            let t = d.inverse_cumulative(p).unwrap();
            assert_abs_diff_eq!(d.cumulative(t).unwrap(), p, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_incomplete_gamma_exponential_case() {
    // P(1, x) = 1 − e^{−x}
    for x in [0.1, 1.0, 3.0, 12.0] {
        assert_abs_diff_eq!(regularized_lower_gamma(1.0, x).unwrap(), 1.0 - (-x).exp(), epsilon = 1e-13);
    }
}
