//! End-to-end comparison runs: strategy ordering, shared wind streams,
//! wake-model purity, and the optimizer's non-regression against grid.

use windfarm_core::{
    FarmConfig, LayoutGenerator, OptimizationScenarioRunner, PlacementMethod, ScenarioError,
    WakeAwarePowerModel, WindResourceSynthesizer,
};

#[test]
fn three_method_comparison_seed_42() {
    // methods = [grid, optimized, random], n_scenarios = 5, seed = 42.
    let runner = OptimizationScenarioRunner::new(&FarmConfig::default()).unwrap();
    let methods = [
        PlacementMethod::Grid,
        PlacementMethod::Optimized,
        PlacementMethod::Random,
    ];
    let cmp = runner.run(&methods, 5, 8, 200, 42).unwrap();

    assert_eq!(cmp.methods(), &methods[..]);
    assert_eq!(cmp.power_outputs().len(), 3);
    for (&method, &power) in cmp.methods().iter().zip(cmp.power_outputs()) {
        assert!(power >= 0.0, "{method} produced negative power {power}");
    }
}

#[test]
fn optimized_beats_or_matches_grid_on_same_wind() {
    // Strongly channelled wind so the optimizer's dominant-direction proxy
    // matches the sampled series.
    let mut cfg = FarmConfig::default();
    cfg.wind.mean_direction_deg = 270.0;
    cfg.wind.direction_concentration = 40.0;
    cfg.wind.speed_persistence = 0.0;

    let synthesizer = WindResourceSynthesizer::new(&cfg).unwrap();
    let generator = LayoutGenerator::new(&cfg).unwrap();
    let model = WakeAwarePowerModel::new(&cfg).unwrap();

    let wind = synthesizer.generate_time_series(500, Some(42)).unwrap();
    let grid = generator.generate(9, PlacementMethod::Grid, 42).unwrap();
    let optimized = generator.generate(9, PlacementMethod::Optimized, 42).unwrap();

    let grid_total = model.evaluate(&grid, &wind).unwrap().farm_total_kw;
    let optimized_total = model.evaluate(&optimized, &wind).unwrap().farm_total_kw;
    assert!(
        optimized_total >= grid_total,
        "optimization regressed on its own objective: grid {grid_total:.1} kW, \
         optimized {optimized_total:.1} kW"
    );
}

#[test]
fn wake_evaluation_is_idempotent_across_runner_calls() {
    let runner = OptimizationScenarioRunner::new(&FarmConfig::default()).unwrap();
    let methods = [PlacementMethod::Grid, PlacementMethod::Optimized];
    let a = runner.run_scenarios(&methods, 3, 6, 100, 17).unwrap();
    let b = runner.run_scenarios(&methods, 3, 6, 100, 17).unwrap();
    assert_eq!(a, b);
}

#[test]
fn capacity_factors_stay_in_unit_interval() {
    let runner = OptimizationScenarioRunner::new(&FarmConfig::default()).unwrap();
    let scenarios = runner
        .run_scenarios(&[PlacementMethod::Grid, PlacementMethod::Random], 3, 6, 150, 11)
        .unwrap();
    for s in &scenarios {
        assert!(
            (0.0..=1.0).contains(&s.result.capacity_factor),
            "capacity factor {} out of range",
            s.result.capacity_factor
        );
        for &kw in s.result.per_turbine_kw.values() {
            assert!((0.0..=2000.0 + 1e-9).contains(&kw));
        }
    }
}

#[test]
fn infeasible_method_aborts_and_names_itself() {
    let runner = OptimizationScenarioRunner::new(&FarmConfig::default()).unwrap();
    // 25 turbines cannot satisfy 300 m spacing in a 1 km square.
    let err = runner
        .run(&[PlacementMethod::Grid], 2, 25, 50, 42)
        .unwrap_err();
    match err {
        ScenarioError::MethodFailed { method, .. } => {
            assert_eq!(method, PlacementMethod::Grid);
        }
        other => panic!("expected MethodFailed, got {other:?}"),
    }
}
