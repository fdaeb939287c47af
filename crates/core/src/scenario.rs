//! Multi-strategy comparison runs.
//!
//! The runner evaluates each requested placement strategy against the same
//! synthetic wind streams and assembles an index-aligned comparison. Wind
//! sub-seeds depend only on (top seed, scenario index) and layout sub-seeds
//! only on (top seed, method), so every method sees identical wind at a
//! given scenario index and the comparison isolates the effect of layout
//! strategy.
//!
//! Methods are independent, so they are dispatched to rayon workers and
//! joined back in request order; parallel execution order never affects any
//! produced value.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FarmConfig;
use crate::error::{ConfigError, PlacementError, ScenarioError};
use crate::layout::{Layout, LayoutGenerator, PlacementMethod};
use crate::math;
use crate::wake::{PowerResult, WakeAwarePowerModel};
use crate::wind::{WindCondition, WindResourceSynthesizer};

/// Stream labels for sub-seed derivation.
const STREAM_WIND: u64 = 0x57_49_4e_44;
const STREAM_LAYOUT: u64 = 0x4c_41_59_4f;

/// One evaluated (strategy, wind stream) pair. Immutable after evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationScenario {
    /// Placement strategy that produced the layout.
    pub method: PlacementMethod,

    /// Index of the wind stream this scenario was evaluated against.
    pub scenario_index: usize,

    /// The generated layout (one per method, shared across its scenarios).
    pub layout: Layout,

    /// The wind series for this scenario index.
    pub wind_condition: WindCondition,

    /// Evaluated power metrics.
    pub result: PowerResult,
}

/// Index-aligned strategy comparison.
///
/// `power_outputs[i]` is the mean farm total (kW) for `methods[i]`, in the
/// order the methods were requested. Never re-sorted by value; callers who
/// want "best first" sort externally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    methods: Vec<PlacementMethod>,
    power_outputs: Vec<f64>,
}

impl Comparison {
    /// Methods in request order.
    #[must_use]
    pub fn methods(&self) -> &[PlacementMethod] {
        &self.methods
    }

    /// Mean farm totals (kW) aligned with [`Self::methods`].
    #[must_use]
    pub fn power_outputs(&self) -> &[f64] {
        &self.power_outputs
    }

    /// The (method, mean farm total) pair with the highest output.
    ///
    /// Read-only convenience; the stored order is untouched.
    #[must_use]
    pub fn best(&self) -> Option<(PlacementMethod, f64)> {
        self.methods
            .iter()
            .zip(&self.power_outputs)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&m, &p)| (m, p))
    }

    /// Mean farm total (kW) for a method, if it was part of the run.
    #[must_use]
    pub fn power_for(&self, method: PlacementMethod) -> Option<f64> {
        self.methods
            .iter()
            .position(|&m| m == method)
            .map(|i| self.power_outputs[i])
    }
}

/// Orchestrates layout generation, wind synthesis, and power evaluation
/// across placement strategies.
#[derive(Debug, Clone)]
pub struct OptimizationScenarioRunner {
    config: FarmConfig,
}

impl OptimizationScenarioRunner {
    /// Create a runner, validating the configuration up front.
    pub fn new(config: &FarmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
        })
    }

    /// Run every method against `n_scenarios` shared wind streams of
    /// `n_points` samples each and build the comparison.
    ///
    /// Any single method failure aborts the whole run; no partial
    /// comparison is produced.
    pub fn run(
        &self,
        methods: &[PlacementMethod],
        n_scenarios: usize,
        n_turbines: usize,
        n_points: usize,
        seed: u64,
    ) -> Result<Comparison, ScenarioError> {
        let scenarios = self.run_scenarios(methods, n_scenarios, n_turbines, n_points, seed)?;
        Ok(build_comparison(methods, &scenarios))
    }

    /// Like [`Self::run`] but returns every evaluated scenario for callers
    /// that want per-method detail (tables, plots, persistence).
    pub fn run_scenarios(
        &self,
        methods: &[PlacementMethod],
        n_scenarios: usize,
        n_turbines: usize,
        n_points: usize,
        seed: u64,
    ) -> Result<Vec<OptimizationScenario>, ScenarioError> {
        if methods.is_empty() {
            return Err(ScenarioError::NoMethods);
        }
        if n_scenarios == 0 {
            return Err(ScenarioError::ZeroScenarios);
        }

        let synthesizer = WindResourceSynthesizer::new(&self.config)?;
        let generator = LayoutGenerator::new(&self.config)?;
        let model = WakeAwarePowerModel::new(&self.config)?;

        // One wind stream per scenario index, shared by every method so the
        // comparison isolates layout effects from wind variability.
        let winds: Vec<WindCondition> = (0..n_scenarios)
            .map(|i| {
                let wind_seed = math::derive_seed(seed, STREAM_WIND, i as u64);
                synthesizer.generate_time_series(n_points, Some(wind_seed))
            })
            .collect::<Result<_, _>>()?;

        debug!(
            methods = methods.len(),
            n_scenarios, n_turbines, n_points, "dispatching comparison run"
        );

        let per_method: Vec<Vec<OptimizationScenario>> = methods
            .par_iter()
            .map(|&method| self.evaluate_method(method, &generator, &model, &winds, n_turbines, seed))
            .collect::<Result<_, _>>()?;

        Ok(per_method.into_iter().flatten().collect())
    }

    /// Generate one layout for `method` and evaluate it against every wind
    /// stream.
    fn evaluate_method(
        &self,
        method: PlacementMethod,
        generator: &LayoutGenerator,
        model: &WakeAwarePowerModel,
        winds: &[WindCondition],
        n_turbines: usize,
        seed: u64,
    ) -> Result<Vec<OptimizationScenario>, ScenarioError> {
        let layout_seed = math::derive_seed(seed, STREAM_LAYOUT, method_salt(method));
        let layout = generator
            .generate(n_turbines, method, layout_seed)
            .map_err(|source| ScenarioError::MethodFailed { method, source })?;

        winds
            .iter()
            .enumerate()
            .map(|(scenario_index, wind_condition)| {
                let result = model
                    .evaluate(&layout, wind_condition)
                    .map_err(|e| ScenarioError::MethodFailed {
                        method,
                        source: PlacementError::Config(e),
                    })?;
                Ok(OptimizationScenario {
                    method,
                    scenario_index,
                    layout: layout.clone(),
                    wind_condition: wind_condition.clone(),
                    result,
                })
            })
            .collect()
    }
}

/// Stable per-method salt so a method's layout stream does not depend on
/// its position in the request list.
fn method_salt(method: PlacementMethod) -> u64 {
    match method {
        PlacementMethod::Grid => 0,
        PlacementMethod::Random => 1,
        PlacementMethod::Optimized => 2,
    }
}

/// Mean farm totals per method, aligned with the requested order.
///
/// Averages over the matching scenario count rather than `n_scenarios`, so a
/// method listed more than once still reports its own mean at every entry.
fn build_comparison(methods: &[PlacementMethod], scenarios: &[OptimizationScenario]) -> Comparison {
    let power_outputs = methods
        .iter()
        .map(|&method| {
            let totals: Vec<f64> = scenarios
                .iter()
                .filter(|s| s.method == method)
                .map(|s| s.result.farm_total_kw)
                .collect();
            totals.iter().sum::<f64>() / totals.len() as f64
        })
        .collect();
    Comparison {
        methods: methods.to_vec(),
        power_outputs,
    }
}
