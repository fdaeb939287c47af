//! Typed error taxonomy for the wind-farm engine.
//!
//! The core never logs or prints: every failure is surfaced as one of these
//! error values for the caller (CLI, orchestration) to report. No component
//! returns partial results on failure.

use thiserror::Error;

use crate::layout::PlacementMethod;

/// Invalid distribution or physical parameters.
///
/// Fatal to the call that detected it; never retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Weibull shape parameter k must be strictly positive.
    #[error("Weibull shape parameter k must be > 0, got {0}")]
    WeibullShape(f64),

    /// Weibull scale parameter c must be strictly positive.
    #[error("Weibull scale parameter c must be > 0, got {0}")]
    WeibullScale(f64),

    /// Von Mises concentration must be non-negative and finite.
    #[error("direction concentration must be >= 0 and finite, got {0}")]
    DirectionConcentration(f64),

    /// AR(1) persistence must stay below 1 or the series never forgets.
    #[error("speed persistence must be in [0, 1), got {0}")]
    SpeedPersistence(f64),

    /// Air density must be strictly positive.
    #[error("air density must be > 0 kg/m³, got {0}")]
    AirDensity(f64),

    /// Farm rectangle must have positive width and length.
    #[error("farm dimensions must be positive, got {width} m × {length} m")]
    FarmDimensions { width: f64, length: f64 },

    /// Minimum turbine spacing must be strictly positive.
    #[error("minimum spacing must be > 0 m, got {0}")]
    MinSpacing(f64),

    /// Rotor diameter must be strictly positive.
    #[error("rotor diameter must be > 0 m, got {0}")]
    RotorDiameter(f64),

    /// Rated power must be strictly positive.
    #[error("rated power must be > 0 kW, got {0}")]
    RatedPower(f64),

    /// Power curve speeds must be ordered cut-in < rated < cut-out.
    #[error(
        "power curve requires 0 <= cut-in < rated < cut-out, \
         got cut-in {cut_in} m/s, rated {rated} m/s, cut-out {cut_out} m/s"
    )]
    PowerCurveSpeeds { cut_in: f64, rated: f64, cut_out: f64 },

    /// Thrust coefficient outside (0, 1) has no physical wake solution.
    #[error("thrust coefficient must be in (0, 1), got {0}")]
    ThrustCoefficient(f64),

    /// Wake expansion coefficient must be strictly positive.
    #[error("wake expansion coefficient must be > 0, got {0}")]
    WakeExpansion(f64),

    /// A time series of zero samples has no defined statistics.
    #[error("n_points must be > 0")]
    EmptyTimeSeries,
}

/// Turbine placement failed: the request is infeasible or the sampler ran
/// out of attempts. The caller may relax spacing or reduce the count and
/// retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    /// At least one turbine must be requested.
    #[error("n_turbines must be > 0")]
    ZeroTurbines,

    /// Area-based feasibility check rejected the request up front.
    #[error(
        "{n_turbines} turbines with {min_spacing} m spacing cannot fit in \
         {farm_area} m² of farm area"
    )]
    Infeasible {
        n_turbines: usize,
        min_spacing: f64,
        farm_area: f64,
    },

    /// No row × column arrangement satisfies the spacing constraint.
    #[error(
        "no grid arrangement of {n_turbines} turbines satisfies {min_spacing} m \
         spacing within {width} m × {length} m"
    )]
    NoFeasibleGrid {
        n_turbines: usize,
        min_spacing: f64,
        width: f64,
        length: f64,
    },

    /// Random rejection sampling exhausted its per-turbine retry budget.
    #[error(
        "random placement exhausted {attempts} attempts while placing turbine \
         {placed} of {n_turbines}"
    )]
    RetryBudgetExhausted {
        attempts: usize,
        placed: usize,
        n_turbines: usize,
    },

    /// Invalid geometry or turbine parameters detected during placement.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A multi-method comparison run failed.
///
/// Identifies the failing method and carries the underlying cause; the whole
/// run is aborted and no partial comparison is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    /// At least one scenario must be requested.
    #[error("n_scenarios must be > 0")]
    ZeroScenarios,

    /// At least one placement method must be requested.
    #[error("at least one placement method is required")]
    NoMethods,

    /// Layout generation or evaluation failed for one of the methods.
    #[error("comparison run aborted: method `{method}` failed")]
    MethodFailed {
        method: PlacementMethod,
        #[source]
        source: PlacementError,
    },

    /// Invalid shared configuration detected before dispatch.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
