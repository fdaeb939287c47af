//! Fully-resolved engine parameters.
//!
//! The core never reads files or the environment: callers resolve whatever
//! configuration format they use into a [`FarmConfig`] and pass it by value
//! into each component call. There is no process-wide mutable configuration
//! state.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Standard air density at sea level (kg/m³).
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225;

/// Wind-resource distribution parameters.
///
/// Speeds follow a two-parameter Weibull distribution; directions follow a
/// von Mises distribution around a mean heading. Typical onshore sites have
/// k ≈ 1.8–2.5 and c within a few m/s of the mean speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindResourceConfig {
    /// Weibull shape parameter k (dimensionless, > 0).
    ///
    /// - k ≈ 1.2: highly variable wind (gusty inland sites)
    /// - k ≈ 2.0: typical onshore site (Rayleigh distribution)
    /// - k ≈ 3.0: very steady wind (trade-wind coasts)
    pub weibull_k: f64,

    /// Weibull scale parameter c in m/s (> 0). Mean speed = c·Γ(1 + 1/k).
    pub weibull_c: f64,

    /// Mean wind direction in degrees (0 = North, 90 = East, meteorological
    /// "coming from" convention).
    pub mean_direction_deg: f64,

    /// Von Mises concentration κ (>= 0).
    ///
    /// - 0: directions uniform over the full circle
    /// - 2: broad directional preference
    /// - 10+: strongly channelled wind (valley or sea-breeze sites)
    pub direction_concentration: f64,

    /// AR(1) persistence of the speed series (0 = independent samples,
    /// values near 1 = slowly evolving wind). Must stay in [0, 1).
    ///
    /// Real wind is temporally correlated; hourly series typically show
    /// lag-1 autocorrelation of 0.7–0.9.
    pub speed_persistence: f64,

    /// Air density in kg/m³ used for power-density estimates.
    pub air_density: f64,
}

impl Default for WindResourceConfig {
    /// Moderate onshore site: Rayleigh-like speeds around 7 m/s, wind
    /// channelled from the west.
    fn default() -> Self {
        Self {
            weibull_k: 2.0,
            weibull_c: 8.0,
            mean_direction_deg: 270.0,
            direction_concentration: 4.0,
            speed_persistence: 0.7,
            air_density: AIR_DENSITY_SEA_LEVEL,
        }
    }
}

impl WindResourceConfig {
    /// Validate distribution parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weibull_k <= 0.0 || !self.weibull_k.is_finite() {
            return Err(ConfigError::WeibullShape(self.weibull_k));
        }
        if self.weibull_c <= 0.0 || !self.weibull_c.is_finite() {
            return Err(ConfigError::WeibullScale(self.weibull_c));
        }
        if self.direction_concentration < 0.0 || !self.direction_concentration.is_finite() {
            return Err(ConfigError::DirectionConcentration(
                self.direction_concentration,
            ));
        }
        if !(0.0..1.0).contains(&self.speed_persistence) {
            return Err(ConfigError::SpeedPersistence(self.speed_persistence));
        }
        if self.air_density <= 0.0 || !self.air_density.is_finite() {
            return Err(ConfigError::AirDensity(self.air_density));
        }
        Ok(())
    }
}

/// Farm rectangle and spacing constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarmGeometry {
    /// Farm extent along x in meters (> 0).
    pub farm_width_m: f64,

    /// Farm extent along y in meters (> 0).
    pub farm_length_m: f64,

    /// Minimum allowed distance between any two turbines in meters (> 0),
    /// typically 3–7 rotor diameters.
    pub min_spacing_m: f64,
}

impl Default for FarmGeometry {
    fn default() -> Self {
        Self {
            farm_width_m: 1000.0,
            farm_length_m: 1000.0,
            min_spacing_m: 300.0,
        }
    }
}

impl FarmGeometry {
    /// Farm area in m².
    #[must_use]
    pub fn area_m2(&self) -> f64 {
        self.farm_width_m * self.farm_length_m
    }

    /// Validate farm dimensions and spacing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width_ok = self.farm_width_m > 0.0 && self.farm_width_m.is_finite();
        let length_ok = self.farm_length_m > 0.0 && self.farm_length_m.is_finite();
        if !width_ok || !length_ok {
            return Err(ConfigError::FarmDimensions {
                width: self.farm_width_m,
                length: self.farm_length_m,
            });
        }
        if self.min_spacing_m <= 0.0 || !self.min_spacing_m.is_finite() {
            return Err(ConfigError::MinSpacing(self.min_spacing_m));
        }
        Ok(())
    }
}

/// Turbine power-curve and rotor parameters.
///
/// Defaults approximate a generic 2 MW onshore machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurbineSpec {
    /// Rated electrical power in kW (> 0).
    pub rated_power_kw: f64,

    /// Cut-in speed in m/s: no production below this.
    pub cut_in_speed_ms: f64,

    /// Rated speed in m/s: production is flat at rated above this.
    pub rated_speed_ms: f64,

    /// Cut-out speed in m/s: the turbine shuts down at or above this.
    pub cut_out_speed_ms: f64,

    /// Rotor diameter in meters (> 0).
    pub rotor_diameter_m: f64,

    /// Thrust coefficient Ct in (0, 1), used by the wake deficit model.
    /// Treated as constant over the operating range (Jensen-type model).
    pub thrust_coefficient: f64,
}

impl Default for TurbineSpec {
    fn default() -> Self {
        Self {
            rated_power_kw: 2000.0,
            cut_in_speed_ms: 3.0,
            rated_speed_ms: 12.0,
            cut_out_speed_ms: 25.0,
            rotor_diameter_m: 80.0,
            thrust_coefficient: 0.8,
        }
    }
}

impl TurbineSpec {
    /// Rotor radius in meters.
    #[must_use]
    pub fn rotor_radius_m(&self) -> f64 {
        self.rotor_diameter_m / 2.0
    }

    /// Validate power curve and rotor parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rated_power_kw <= 0.0 || !self.rated_power_kw.is_finite() {
            return Err(ConfigError::RatedPower(self.rated_power_kw));
        }
        if self.rotor_diameter_m <= 0.0 || !self.rotor_diameter_m.is_finite() {
            return Err(ConfigError::RotorDiameter(self.rotor_diameter_m));
        }
        let ordered = self.cut_in_speed_ms >= 0.0
            && self.cut_in_speed_ms < self.rated_speed_ms
            && self.rated_speed_ms < self.cut_out_speed_ms;
        if !ordered {
            return Err(ConfigError::PowerCurveSpeeds {
                cut_in: self.cut_in_speed_ms,
                rated: self.rated_speed_ms,
                cut_out: self.cut_out_speed_ms,
            });
        }
        let ct_ok = self.thrust_coefficient > 0.0 && self.thrust_coefficient < 1.0;
        if !ct_ok {
            return Err(ConfigError::ThrustCoefficient(self.thrust_coefficient));
        }
        Ok(())
    }
}

/// Jensen wake-model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WakeModelConfig {
    /// Linear wake expansion coefficient k_w (> 0).
    ///
    /// - 0.04–0.05: offshore (low ambient turbulence)
    /// - 0.07–0.10: onshore
    pub expansion_coefficient: f64,
}

impl Default for WakeModelConfig {
    fn default() -> Self {
        Self {
            expansion_coefficient: 0.075,
        }
    }
}

impl WakeModelConfig {
    /// Validate wake parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expansion_coefficient <= 0.0 || !self.expansion_coefficient.is_finite() {
            return Err(ConfigError::WakeExpansion(self.expansion_coefficient));
        }
        Ok(())
    }
}

/// Complete resolved parameter set consumed by every engine component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FarmConfig {
    /// Wind-resource distribution parameters.
    pub wind: WindResourceConfig,

    /// Farm rectangle and spacing constraint.
    pub geometry: FarmGeometry,

    /// Turbine power-curve and rotor parameters.
    pub turbine: TurbineSpec,

    /// Wake-model parameters.
    pub wake: WakeModelConfig,
}

impl FarmConfig {
    /// Validate every parameter group; first failure wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wind.validate()?;
        self.geometry.validate()?;
        self.turbine.validate()?;
        self.wake.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(FarmConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_weibull_parameters() {
        let mut cfg = FarmConfig::default();
        cfg.wind.weibull_k = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::WeibullShape(0.0)));

        let mut cfg = FarmConfig::default();
        cfg.wind.weibull_c = -1.0;
        assert_eq!(cfg.validate(), Err(ConfigError::WeibullScale(-1.0)));
    }

    #[test]
    fn rejects_nan_parameters() {
        let mut cfg = FarmConfig::default();
        cfg.wind.weibull_k = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_unordered_power_curve() {
        let mut cfg = FarmConfig::default();
        cfg.turbine.rated_speed_ms = cfg.turbine.cut_in_speed_ms;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::PowerCurveSpeeds { .. })
        ));
    }

    #[test]
    fn rejects_negative_farm_dimensions() {
        let mut cfg = FarmConfig::default();
        cfg.geometry.farm_width_m = -10.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::FarmDimensions { .. })
        ));
    }
}
