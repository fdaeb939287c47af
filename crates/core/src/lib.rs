//! Wind-Farm Analysis Core Library
//!
//! Synthesizes plausible wind-resource time series, lays out turbines under
//! competing placement strategies, estimates farm energy yield with a
//! Jensen-type wake interference model, and compares strategies numerically.
//!
//! The engine is pure computation over immutable inputs: it reads no files,
//! holds no global state, and reports failures only through typed errors.
//! External collaborators (plotting, persistence, CLIs) consume the three
//! public data shapes ([`WindCondition`], [`Layout`] and [`Comparison`])
//! as opaque serializable records.
//!
//! All randomness flows from explicit seeds; sub-streams are derived per
//! component and scenario index, so results are reproducible bit-for-bit
//! even under parallel evaluation.

pub mod config;
pub mod error;
pub mod layout;
pub mod math;
pub mod scenario;
pub mod wake;
pub mod wind;

// Re-export the component entry points and data shapes
pub use config::{FarmConfig, FarmGeometry, TurbineSpec, WakeModelConfig, WindResourceConfig};
pub use error::{ConfigError, PlacementError, ScenarioError};
pub use layout::{Layout, LayoutGenerator, PlacementMethod, TurbinePosition};
pub use scenario::{Comparison, OptimizationScenario, OptimizationScenarioRunner};
pub use wake::{PowerResult, WakeAwarePowerModel, power_curve};
pub use wind::{WindCondition, WindResourceSynthesizer, WindSample, WindSummary};
