//! Statistical validation of the wind-resource synthesizer.
//!
//! Checks that generated series actually follow the configured Weibull and
//! von Mises distributions, against analytic moments and a method-of-moments
//! refit.

use windfarm_core::math::{angular_distance_deg, circular_mean_deg, gamma, weibull_mean};
use windfarm_core::{FarmConfig, WindResourceSynthesizer};

fn synthesizer(mutate: impl FnOnce(&mut FarmConfig)) -> WindResourceSynthesizer {
    let mut cfg = FarmConfig::default();
    mutate(&mut cfg);
    WindResourceSynthesizer::new(&cfg).unwrap()
}

/// Invert CV² = Γ(1+2/k)/Γ(1+1/k)² − 1 for k by bisection.
fn fit_weibull_shape(cv: f64) -> f64 {
    let cv_of = |k: f64| (gamma(1.0 + 2.0 / k) / gamma(1.0 + 1.0 / k).powi(2) - 1.0).sqrt();
    let (mut lo, mut hi) = (0.3_f64, 20.0_f64);
    // CV is strictly decreasing in k.
    for _ in 0..80 {
        let mid = f64::midpoint(lo, hi);
        if cv_of(mid) > cv {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    f64::midpoint(lo, hi)
}

#[test]
fn weibull_mean_recovered_k2_c8_seed42() {
    // k = 2, c = 8: analytic mean = 8·Γ(1.5) ≈ 7.09 m/s.
    let synth = synthesizer(|c| {
        c.wind.weibull_k = 2.0;
        c.wind.weibull_c = 8.0;
        c.wind.speed_persistence = 0.0;
    });
    let cond = synth.generate_time_series(1000, Some(42)).unwrap();
    let mean = cond.speeds().sum::<f64>() / cond.len() as f64;
    let expected = weibull_mean(2.0, 8.0);
    assert!(
        (mean - expected).abs() / expected < 0.05,
        "sample mean {mean:.3} m/s outside 5% of Weibull mean {expected:.3} m/s"
    );
}

#[test]
fn weibull_parameters_recovered_by_moment_fit() {
    let (k, c) = (2.3, 9.5);
    let synth = synthesizer(|cfg| {
        cfg.wind.weibull_k = k;
        cfg.wind.weibull_c = c;
        cfg.wind.speed_persistence = 0.0;
    });
    let cond = synth.generate_time_series(4000, Some(42)).unwrap();
    let n = cond.len() as f64;
    let mean = cond.speeds().sum::<f64>() / n;
    let var = cond.speeds().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    let k_fit = fit_weibull_shape(var.sqrt() / mean);
    let c_fit = mean / gamma(1.0 + 1.0 / k_fit);

    assert!(
        (k_fit - k).abs() / k < 0.10,
        "fitted shape {k_fit:.3} outside 10% of configured {k}"
    );
    assert!(
        (c_fit - c).abs() / c < 0.05,
        "fitted scale {c_fit:.3} outside 5% of configured {c}"
    );
}

#[test]
fn circular_mean_matches_configured_direction() {
    for mean_dir in [0.0, 45.0, 187.5, 350.0] {
        let synth = synthesizer(|cfg| {
            cfg.wind.mean_direction_deg = mean_dir;
            cfg.wind.direction_concentration = 6.0;
        });
        let cond = synth.generate_time_series(3000, Some(42)).unwrap();
        let dirs: Vec<f64> = cond.directions().collect();
        let circ_mean = circular_mean_deg(&dirs).unwrap();
        assert!(
            angular_distance_deg(circ_mean, mean_dir) < 5.0,
            "circular mean {circ_mean:.1}° too far from configured {mean_dir}°"
        );
    }
}

#[test]
fn repeated_generation_is_bit_identical() {
    let synth = synthesizer(|_| {});
    for seed in [0, 1, 42, u64::MAX] {
        let a = synth.generate_time_series(512, Some(seed)).unwrap();
        let b = synth.generate_time_series(512, Some(seed)).unwrap();
        assert_eq!(a, b, "seed {seed} not reproducible");
    }
}

#[test]
fn summary_capacity_factor_reacts_to_resource() {
    let weak = synthesizer(|c| c.wind.weibull_c = 4.0);
    let strong = synthesizer(|c| c.wind.weibull_c = 11.0);

    let weak_cond = weak.generate_time_series(2000, Some(5)).unwrap();
    let strong_cond = strong.generate_time_series(2000, Some(5)).unwrap();

    let cf_weak = weak.summarize(&weak_cond).unwrap().capacity_factor;
    let cf_strong = strong.summarize(&strong_cond).unwrap().capacity_factor;
    assert!(
        cf_strong > cf_weak,
        "capacity factor should grow with the resource: {cf_weak} vs {cf_strong}"
    );
    assert!((0.0..=1.0).contains(&cf_weak));
    assert!((0.0..=1.0).contains(&cf_strong));
}
