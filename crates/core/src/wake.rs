//! Jensen-type wake interference and farm power evaluation.
//!
//! For each wind sample the turbine positions are rotated into the wind
//! frame; an upstream turbine shadows a downstream one when the downstream
//! rotor center falls inside the linearly expanding wake cone. The
//! single-wake speed deficit follows the Jensen (Park) model and
//! overlapping wakes combine by root-sum-of-squares, the energy-conserving
//! combination of Katic et al.
//!
//! The whole model is a pure function of (layout, wind condition,
//! configuration): no hidden state, identical inputs give identical
//! results.
//!
//! # References
//!
//! - Jensen, N.O. (1983). "A note on wind generator interaction."
//!   Risø-M-2411, Risø National Laboratory.
//! - Katic, I., Højstrup, J. & Jensen, N.O. (1986). "A simple model for
//!   cluster efficiency." EWEC '86 Proceedings, 407-410.

use nalgebra::Vector2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::{FarmConfig, TurbineSpec};
use crate::error::ConfigError;
use crate::layout::{Layout, TurbinePosition};
use crate::wind::WindCondition;

/// Farm power metrics for one (layout, wind condition) pair.
///
/// Derived data: recomputed per evaluation, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerResult {
    /// Mean power per turbine over the wind series, keyed by turbine id (kW).
    pub per_turbine_kw: FxHashMap<u32, f64>,

    /// Sum of per-turbine mean powers (kW).
    pub farm_total_kw: f64,

    /// Farm capacity factor: farm total over installed rated capacity,
    /// in [0, 1].
    pub capacity_factor: f64,

    /// Farm power density over the farm rectangle (W/m²).
    pub power_density_w_m2: f64,
}

/// Evaluates wake-aware farm power for a validated configuration.
#[derive(Debug, Clone)]
pub struct WakeAwarePowerModel {
    config: FarmConfig,
}

impl WakeAwarePowerModel {
    /// Create a power model, validating the configuration up front.
    pub fn new(config: &FarmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
        })
    }

    /// Evaluate per-turbine and farm-aggregate power.
    ///
    /// Per-turbine power is the mean over all wind samples; the farm total
    /// is their sum. Pure: no internal state survives the call.
    pub fn evaluate(
        &self,
        layout: &Layout,
        wind_condition: &WindCondition,
    ) -> Result<PowerResult, ConfigError> {
        if wind_condition.is_empty() {
            return Err(ConfigError::EmptyTimeSeries);
        }

        let positions = layout.positions();
        let n_samples = wind_condition.len() as f64;

        // Accumulate in layout order so summation order is deterministic.
        let mut sums = vec![0.0_f64; positions.len()];
        for sample in wind_condition.samples() {
            let speeds =
                effective_speeds(positions, sample.direction_deg, sample.speed_ms, &self.config);
            for (sum, speed) in sums.iter_mut().zip(&speeds) {
                *sum += power_curve(*speed, &self.config.turbine);
            }
        }

        let means: Vec<f64> = sums.into_iter().map(|s| s / n_samples).collect();
        let farm_total_kw: f64 = means.iter().sum();
        let installed_kw = self.config.turbine.rated_power_kw * positions.len() as f64;
        let capacity_factor = if positions.is_empty() {
            0.0
        } else {
            farm_total_kw / installed_kw
        };

        let per_turbine_kw = positions
            .iter()
            .zip(means)
            .map(|(p, mean)| (p.id, mean))
            .collect();

        Ok(PowerResult {
            per_turbine_kw,
            farm_total_kw,
            capacity_factor,
            power_density_w_m2: farm_total_kw * 1000.0 / self.config.geometry.area_m2(),
        })
    }
}

/// Piecewise turbine power curve (kW).
///
/// Zero below cut-in and at/above cut-out, cubic ramp between cut-in and
/// rated, flat at rated power in between.
#[must_use]
pub fn power_curve(speed_ms: f64, turbine: &TurbineSpec) -> f64 {
    if speed_ms < turbine.cut_in_speed_ms || speed_ms >= turbine.cut_out_speed_ms {
        0.0
    } else if speed_ms >= turbine.rated_speed_ms {
        turbine.rated_power_kw
    } else {
        let v3 = speed_ms.powi(3);
        let cut_in3 = turbine.cut_in_speed_ms.powi(3);
        let rated3 = turbine.rated_speed_ms.powi(3);
        turbine.rated_power_kw * (v3 - cut_in3) / (rated3 - cut_in3)
    }
}

/// Wake-reduced effective speed at every turbine for one wind sample,
/// in layout order.
pub(crate) fn effective_speeds(
    positions: &[TurbinePosition],
    direction_deg: f64,
    ambient_speed_ms: f64,
    config: &FarmConfig,
) -> Vec<f64> {
    // Meteorological convention: `direction_deg` is where the wind comes
    // from, so the flow vector points the opposite way.
    let dir_rad = direction_deg.to_radians();
    let flow = Vector2::new(-dir_rad.sin(), -dir_rad.cos());
    let crosswind = Vector2::new(-flow.y, flow.x);

    let frame: Vec<(f64, f64)> = positions
        .iter()
        .map(|p| (p.point().dot(&flow), p.point().dot(&crosswind)))
        .collect();

    let rotor_radius = config.turbine.rotor_radius_m();
    let k_w = config.wake.expansion_coefficient;
    let ct = config.turbine.thrust_coefficient;
    let initial_deficit = 1.0 - (1.0 - ct).sqrt();

    frame
        .iter()
        .map(|&(down_d, cross_d)| {
            // Katic sum-of-squares combination of all upstream wakes.
            let mut deficit_sq = 0.0_f64;
            for &(down_u, cross_u) in &frame {
                let dx = down_d - down_u;
                if dx <= 0.0 {
                    continue;
                }
                let wake_radius = rotor_radius + k_w * dx;
                if (cross_d - cross_u).abs() >= wake_radius {
                    continue;
                }
                let deficit = initial_deficit / (1.0 + k_w * dx / rotor_radius).powi(2);
                deficit_sq += deficit * deficit;
            }
            let total_deficit = deficit_sq.sqrt().min(1.0);
            ambient_speed_ms * (1.0 - total_deficit)
        })
        .collect()
}

/// Farm power for a single (direction, speed) condition: the layout
/// optimizer's proxy objective.
pub(crate) fn farm_power_single(
    positions: &[TurbinePosition],
    direction_deg: f64,
    speed_ms: f64,
    config: &FarmConfig,
) -> f64 {
    effective_speeds(positions, direction_deg, speed_ms, config)
        .into_iter()
        .map(|v| power_curve(v, &config.turbine))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wind::WindSample;
    use approx::assert_relative_eq;

    fn two_turbine_layout(spacing: f64) -> Layout {
        Layout::from_positions(vec![
            TurbinePosition {
                id: 0,
                x_m: 0.0,
                y_m: 500.0,
            },
            TurbinePosition {
                id: 1,
                x_m: spacing,
                y_m: 500.0,
            },
        ])
    }

    fn steady_wind(direction_deg: f64, speed_ms: f64, n: usize) -> WindCondition {
        WindCondition::from_samples(vec![
            WindSample {
                speed_ms,
                direction_deg,
            };
            n
        ])
    }

    #[test]
    fn power_curve_piecewise_regions() {
        let t = TurbineSpec::default();
        assert_eq!(power_curve(0.0, &t), 0.0);
        assert_eq!(power_curve(2.9, &t), 0.0);
        assert_eq!(power_curve(12.0, &t), 2000.0);
        assert_eq!(power_curve(20.0, &t), 2000.0);
        assert_eq!(power_curve(25.0, &t), 0.0);
        assert_eq!(power_curve(30.0, &t), 0.0);

        // Cubic ramp is monotone and bounded by rated power.
        let mid = power_curve(8.0, &t);
        assert!(mid > 0.0 && mid < 2000.0);
        assert!(power_curve(9.0, &t) > mid);
    }

    #[test]
    fn aligned_downstream_turbine_loses_power() {
        let model = WakeAwarePowerModel::new(&FarmConfig::default()).unwrap();
        // Wind from the west (270°) blows along +x: turbine 1 sits in the
        // wake of turbine 0.
        let wind = steady_wind(270.0, 8.0, 4);
        let result = model.evaluate(&two_turbine_layout(400.0), &wind).unwrap();

        let upstream = result.per_turbine_kw[&0];
        let downstream = result.per_turbine_kw[&1];
        assert!(
            downstream < upstream * 0.95,
            "expected wake loss: upstream {upstream} kW, downstream {downstream} kW"
        );
    }

    #[test]
    fn crosswind_turbines_are_unaffected() {
        let model = WakeAwarePowerModel::new(&FarmConfig::default()).unwrap();
        // Wind from the north (0°): the two turbines sit side by side
        // across the flow and neither shadows the other.
        let wind = steady_wind(0.0, 8.0, 4);
        let result = model.evaluate(&two_turbine_layout(400.0), &wind).unwrap();
        assert_relative_eq!(
            result.per_turbine_kw[&0],
            result.per_turbine_kw[&1],
            epsilon = 1e-9
        );
    }

    #[test]
    fn deficit_decays_with_distance() {
        let cfg = FarmConfig::default();
        let near = effective_speeds(
            two_turbine_layout(300.0).positions(),
            270.0,
            8.0,
            &cfg,
        )[1];
        let far = effective_speeds(
            two_turbine_layout(900.0).positions(),
            270.0,
            8.0,
            &cfg,
        )[1];
        assert!(
            far > near,
            "deficit should decay downstream: near {near}, far {far}"
        );
        assert!(near < 8.0 && far < 8.0);
    }

    #[test]
    fn overlapping_wakes_combine_sub_additively() {
        let cfg = FarmConfig::default();
        // Two upstream turbines both waking a third, all on the flow axis.
        let positions = vec![
            TurbinePosition {
                id: 0,
                x_m: 0.0,
                y_m: 500.0,
            },
            TurbinePosition {
                id: 1,
                x_m: 400.0,
                y_m: 500.0,
            },
            TurbinePosition {
                id: 2,
                x_m: 800.0,
                y_m: 500.0,
            },
        ];
        let speeds = effective_speeds(&positions, 270.0, 8.0, &cfg);

        let single_deficit = 1.0 - effective_speeds(
            two_turbine_layout(400.0).positions(),
            270.0,
            8.0,
            &cfg,
        )[1] / 8.0;
        let double_deficit = 1.0 - speeds[2] / 8.0;
        assert!(double_deficit > single_deficit * 0.9);
        assert!(
            double_deficit < 2.5 * single_deficit,
            "sum-of-squares must stay well below linear summation"
        );
    }

    #[test]
    fn evaluation_is_pure() {
        let model = WakeAwarePowerModel::new(&FarmConfig::default()).unwrap();
        let layout = two_turbine_layout(500.0);
        let wind = steady_wind(225.0, 9.5, 16);
        let a = model.evaluate(&layout, &wind).unwrap();
        let b = model.evaluate(&layout, &wind).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn capacity_factor_and_totals_are_bounded() {
        let model = WakeAwarePowerModel::new(&FarmConfig::default()).unwrap();
        let layout = two_turbine_layout(400.0);
        let wind = steady_wind(270.0, 11.0, 8);
        let result = model.evaluate(&layout, &wind).unwrap();

        assert!(result.farm_total_kw >= 0.0);
        assert!((0.0..=1.0).contains(&result.capacity_factor));
        for &kw in result.per_turbine_kw.values() {
            assert!(
                kw <= 2000.0 + 1e-9,
                "per-turbine power {kw} exceeds rated"
            );
        }
        assert_relative_eq!(
            result.power_density_w_m2,
            result.farm_total_kw * 1000.0 / 1e6,
            epsilon = 1e-9
        );
    }

    #[test]
    fn empty_wind_condition_is_rejected() {
        let model = WakeAwarePowerModel::new(&FarmConfig::default()).unwrap();
        let layout = two_turbine_layout(400.0);
        let wind = WindCondition::from_samples(vec![]);
        assert_eq!(
            model.evaluate(&layout, &wind),
            Err(ConfigError::EmptyTimeSeries)
        );
    }
}
