//! Turbine placement under spacing constraints.
//!
//! Three strategies over the farm rectangle `[0, width] × [0, length]`:
//!
//! - `Grid`: densest near-square regular lattice that satisfies the spacing
//!   constraint. Deterministic, no randomness.
//! - `Random`: uniform rejection sampling with a bounded per-turbine retry
//!   budget.
//! - `Optimized`: greedy farthest-point seeding followed by bounded local
//!   perturbation hill-climbing on a dominant-wind wake objective. The grid
//!   layout is always evaluated as a starting candidate, so the result is
//!   never worse than grid on the objective.
//!
//! Every strategy returns exactly the requested number of turbines or fails
//! with [`PlacementError`]; partial layouts are never returned.

use nalgebra::Vector2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{FarmConfig, FarmGeometry};
use crate::error::{ConfigError, PlacementError};
use crate::math;
use crate::wake;

/// Hexagonal close-packing density: the fraction of the plane coverable by
/// equal discs. Requests above this bound cannot be satisfied by any
/// arrangement.
pub const PACKING_FUDGE_FACTOR: f64 = 0.9069;

/// Retry budget per turbine for random rejection sampling.
const RANDOM_RETRY_BUDGET: usize = 1000;

/// Bounded hill-climbing iterations for the optimized strategy.
const OPTIMIZER_MAX_ITERS: usize = 250;

/// Candidate pool size multiplier for greedy farthest-point seeding.
const GREEDY_POOL_PER_TURBINE: usize = 50;

/// Placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMethod {
    /// Regular near-square lattice.
    Grid,
    /// Uniform rejection sampling.
    Random,
    /// Wake-aware heuristic search.
    Optimized,
}

impl PlacementMethod {
    /// Stable lowercase name used in comparisons and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Random => "random",
            Self::Optimized => "optimized",
        }
    }
}

impl std::fmt::Display for PlacementMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turbine location within the farm rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurbinePosition {
    /// Unique turbine id, assigned in placement order.
    pub id: u32,
    /// Easting within the farm in meters.
    pub x_m: f64,
    /// Northing within the farm in meters.
    pub y_m: f64,
}

impl TurbinePosition {
    /// Position as a 2D vector.
    #[must_use]
    pub fn point(&self) -> Vector2<f64> {
        Vector2::new(self.x_m, self.y_m)
    }
}

/// Ordered turbine positions with unique ids.
///
/// Invariants (enforced by the generator, checkable via the query methods):
/// all positions inside the farm rectangle and pairwise distances of at
/// least the configured minimum spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    positions: Vec<TurbinePosition>,
}

impl Layout {
    /// Wrap a position list. Intended for tests and external data; the
    /// generator is the usual producer.
    #[must_use]
    pub fn from_positions(positions: Vec<TurbinePosition>) -> Self {
        Self { positions }
    }

    /// Positions in placement order.
    #[must_use]
    pub fn positions(&self) -> &[TurbinePosition] {
        &self.positions
    }

    /// Number of turbines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when the layout holds no turbines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Smallest pairwise distance, or `None` for fewer than two turbines.
    #[must_use]
    pub fn min_pairwise_spacing_m(&self) -> Option<f64> {
        let mut min: Option<f64> = None;
        for (i, a) in self.positions.iter().enumerate() {
            for b in &self.positions[i + 1..] {
                let d = (a.point() - b.point()).norm();
                min = Some(min.map_or(d, |m: f64| m.min(d)));
            }
        }
        min
    }

    /// True when every position lies inside the farm rectangle.
    #[must_use]
    pub fn within_bounds(&self, geometry: &FarmGeometry) -> bool {
        self.positions.iter().all(|p| {
            (0.0..=geometry.farm_width_m).contains(&p.x_m)
                && (0.0..=geometry.farm_length_m).contains(&p.y_m)
        })
    }
}

/// Builds turbine layouts for a validated configuration.
#[derive(Debug, Clone)]
pub struct LayoutGenerator {
    config: FarmConfig,
}

impl LayoutGenerator {
    /// Create a generator, validating the configuration up front.
    pub fn new(config: &FarmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
        })
    }

    /// Generate exactly `n_turbines` positions with the chosen strategy.
    ///
    /// The seed drives the `Random` and `Optimized` strategies; `Grid`
    /// ignores it. Identical inputs produce identical layouts.
    pub fn generate(
        &self,
        n_turbines: usize,
        method: PlacementMethod,
        seed: u64,
    ) -> Result<Layout, PlacementError> {
        if n_turbines == 0 {
            return Err(PlacementError::ZeroTurbines);
        }
        self.check_area_feasibility(n_turbines)?;

        let layout = match method {
            PlacementMethod::Grid => self.generate_grid(n_turbines)?,
            PlacementMethod::Random => self.generate_random(n_turbines, seed)?,
            PlacementMethod::Optimized => self.generate_optimized(n_turbines, seed)?,
        };
        debug_assert_eq!(layout.len(), n_turbines);
        Ok(layout)
    }

    /// Up-front area check: each turbine claims an exclusion disc of radius
    /// `min_spacing / 2`; those discs cannot cover more of the farm than
    /// hexagonal close packing allows.
    fn check_area_feasibility(&self, n_turbines: usize) -> Result<(), PlacementError> {
        let geometry = &self.config.geometry;
        let disc_area =
            std::f64::consts::PI * (geometry.min_spacing_m / 2.0).powi(2) * n_turbines as f64;
        if disc_area > geometry.area_m2() * PACKING_FUDGE_FACTOR {
            return Err(PlacementError::Infeasible {
                n_turbines,
                min_spacing: geometry.min_spacing_m,
                farm_area: geometry.area_m2(),
            });
        }
        Ok(())
    }

    /// Densest feasible near-square lattice, filled row-major.
    fn generate_grid(&self, n_turbines: usize) -> Result<Layout, PlacementError> {
        let geometry = &self.config.geometry;
        let spacing = geometry.min_spacing_m;

        // Enumerate row × column shapes, keep feasible ones, prefer the
        // squarest, break ties on the larger lattice step.
        let mut best: Option<(usize, usize, f64)> = None;
        for cols in 1..=n_turbines {
            let rows = n_turbines.div_ceil(cols);
            let step_x = lattice_step(geometry.farm_width_m, cols);
            let step_y = lattice_step(geometry.farm_length_m, rows);
            if step_x < spacing || step_y < spacing {
                continue;
            }
            let min_step = step_x.min(step_y);
            let squareness = cols.abs_diff(rows);
            let better = match best {
                None => true,
                Some((bc, br, bstep)) => {
                    let best_squareness = bc.abs_diff(br);
                    squareness < best_squareness
                        || (squareness == best_squareness && min_step > bstep)
                }
            };
            if better {
                best = Some((cols, rows, min_step));
            }
        }

        let Some((cols, rows, _)) = best else {
            return Err(PlacementError::NoFeasibleGrid {
                n_turbines,
                min_spacing: spacing,
                width: geometry.farm_width_m,
                length: geometry.farm_length_m,
            });
        };

        let positions = (0..n_turbines)
            .map(|i| {
                let col = i % cols;
                let row = i / cols;
                TurbinePosition {
                    id: i as u32,
                    x_m: lattice_coord(geometry.farm_width_m, cols, col),
                    y_m: lattice_coord(geometry.farm_length_m, rows, row),
                }
            })
            .collect();
        Ok(Layout::from_positions(positions))
    }

    /// Uniform rejection sampling with a bounded retry budget per turbine.
    fn generate_random(&self, n_turbines: usize, seed: u64) -> Result<Layout, PlacementError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.fill_random(n_turbines, &mut rng)
    }

    fn fill_random(&self, n_turbines: usize, rng: &mut StdRng) -> Result<Layout, PlacementError> {
        let geometry = &self.config.geometry;
        let spacing = geometry.min_spacing_m;

        let mut accepted: Vec<Vector2<f64>> = Vec::with_capacity(n_turbines);
        for placed in 0..n_turbines {
            let mut found = false;
            for _ in 0..RANDOM_RETRY_BUDGET {
                let candidate = Vector2::new(
                    rng.random_range(0.0..=geometry.farm_width_m),
                    rng.random_range(0.0..=geometry.farm_length_m),
                );
                if accepted.iter().all(|p| (p - candidate).norm() >= spacing) {
                    accepted.push(candidate);
                    found = true;
                    break;
                }
            }
            if !found {
                return Err(PlacementError::RetryBudgetExhausted {
                    attempts: RANDOM_RETRY_BUDGET,
                    placed: placed + 1,
                    n_turbines,
                });
            }
        }
        Ok(positions_from_points(&accepted))
    }

    /// Wake-aware heuristic: greedy farthest-point seeding, then bounded
    /// hill-climbing on the dominant-wind proxy objective. Grid is always a
    /// starting candidate, so the returned layout scores at least as well
    /// as grid. Converges to the best layout found within the iteration
    /// budget; it never hangs and never returns an infeasible layout.
    fn generate_optimized(&self, n_turbines: usize, seed: u64) -> Result<Layout, PlacementError> {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut candidates: Vec<Layout> = Vec::new();
        if let Ok(grid) = self.generate_grid(n_turbines) {
            candidates.push(grid);
        }
        if let Some(greedy) = self.greedy_farthest_point(n_turbines, &mut rng) {
            candidates.push(greedy);
        }
        if candidates.is_empty() {
            // Sparse farms where no lattice fits can still accept scattered
            // positions.
            candidates.push(self.fill_random(n_turbines, &mut rng)?);
        }

        let mut scored: Vec<(Vec<TurbinePosition>, f64)> = candidates
            .into_iter()
            .map(|layout| {
                let score = self.proxy_objective(&layout);
                (layout.positions().to_vec(), score)
            })
            .collect();
        // Ties keep insertion order, which puts grid first.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (mut positions, mut best_score) = scored.swap_remove(0);

        let geometry = self.config.geometry;
        let spacing = geometry.min_spacing_m;
        let perturbation = Normal::new(0.0, spacing / 2.0)
            .map_err(|_| ConfigError::MinSpacing(spacing))
            .map_err(PlacementError::Config)?;

        let mut improvements = 0usize;
        for _ in 0..OPTIMIZER_MAX_ITERS {
            let idx = rng.random_range(0..positions.len());
            let old = positions[idx];
            let moved = TurbinePosition {
                id: old.id,
                x_m: (old.x_m + perturbation.sample(&mut rng))
                    .clamp(0.0, geometry.farm_width_m),
                y_m: (old.y_m + perturbation.sample(&mut rng))
                    .clamp(0.0, geometry.farm_length_m),
            };

            let feasible = positions.iter().enumerate().all(|(j, p)| {
                j == idx || (p.point() - moved.point()).norm() >= spacing
            });
            if !feasible {
                continue;
            }

            positions[idx] = moved;
            let score = self.proxy_objective(&Layout::from_positions(positions.clone()));
            if score > best_score {
                best_score = score;
                improvements += 1;
            } else {
                positions[idx] = old;
            }
        }
        debug!(
            improvements,
            iterations = OPTIMIZER_MAX_ITERS,
            objective_kw = best_score,
            "optimized placement converged"
        );

        Ok(Layout::from_positions(positions))
    }

    /// Greedy farthest-point-first selection from a seeded uniform candidate
    /// pool. Maximizes the minimum pairwise distance of the chosen set;
    /// returns `None` when the pool cannot yield a feasible layout.
    fn greedy_farthest_point(&self, n_turbines: usize, rng: &mut StdRng) -> Option<Layout> {
        let geometry = &self.config.geometry;
        let pool: Vec<Vector2<f64>> = (0..n_turbines * GREEDY_POOL_PER_TURBINE)
            .map(|_| {
                Vector2::new(
                    rng.random_range(0.0..=geometry.farm_width_m),
                    rng.random_range(0.0..=geometry.farm_length_m),
                )
            })
            .collect();

        let mut chosen: Vec<Vector2<f64>> = vec![pool[0]];
        while chosen.len() < n_turbines {
            let next = pool
                .iter()
                .map(|candidate| {
                    let nearest = chosen
                        .iter()
                        .map(|p| (p - candidate).norm())
                        .fold(f64::INFINITY, f64::min);
                    (candidate, nearest)
                })
                .max_by(|a, b| a.1.total_cmp(&b.1))?;
            if next.1 < geometry.min_spacing_m {
                return None;
            }
            chosen.push(*next.0);
        }
        Some(positions_from_points(&chosen))
    }

    /// Proxy for expected farm power: the wake-aware farm output at the
    /// Weibull mean speed, averaged over the dominant direction and two
    /// flanking probes. Cheap enough to evaluate inside the hill-climbing
    /// loop while still penalizing rows aligned with the prevailing wind.
    fn proxy_objective(&self, layout: &Layout) -> f64 {
        let wind = &self.config.wind;
        let mean_speed = math::weibull_mean(wind.weibull_k, wind.weibull_c);
        let probes = [
            math::normalize_deg(wind.mean_direction_deg - 15.0),
            wind.mean_direction_deg,
            math::normalize_deg(wind.mean_direction_deg + 15.0),
        ];
        probes
            .iter()
            .map(|&dir| wake::farm_power_single(layout.positions(), dir, mean_speed, &self.config))
            .sum::<f64>()
            / probes.len() as f64
    }
}

/// Lattice step along one axis for `count` turbines spanning `extent`.
fn lattice_step(extent: f64, count: usize) -> f64 {
    if count > 1 {
        extent / (count - 1) as f64
    } else {
        // A single row or column imposes no spacing along this axis.
        f64::INFINITY
    }
}

/// Lattice coordinate of `index` out of `count` along an axis of `extent`;
/// a single turbine sits at the axis midpoint.
fn lattice_coord(extent: f64, count: usize, index: usize) -> f64 {
    if count > 1 {
        extent / (count - 1) as f64 * index as f64
    } else {
        extent / 2.0
    }
}

fn positions_from_points(points: &[Vector2<f64>]) -> Layout {
    Layout::from_positions(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| TurbinePosition {
                id: i as u32,
                x_m: p.x,
                y_m: p.y,
            })
            .collect(),
    )
}
