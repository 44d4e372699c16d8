//! `RouteOptimizer`: sequencing chosen places into an open walk from an
//! origin.

use std::iter;
use std::time::{Duration, Instant};

use geo::Coord;
use roam_core::{
    HaversineTravelCost, OptimizationMethod, OptimizedRoute, RouteError, RouteLeg,
    TravelCostProvider, TravelMode, Waypoint,
};

use crate::exact::{held_karp, permutations};
use crate::heuristic::{nearest_neighbour, two_opt};
use crate::matrix::CostMatrix;

/// Identifier used for the departure point of the first leg.
pub const ORIGIN_ID: &str = "origin";

/// Configuration for [`RouteOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RouteOptimizerConfig {
    /// Largest point count, origin included, solved exactly.
    pub exact_limit: usize,
    /// Largest waypoint count solved by plain enumeration rather than
    /// Held–Karp.
    pub permutation_limit: usize,
}

impl Default for RouteOptimizerConfig {
    fn default() -> Self {
        Self {
            exact_limit: 10,
            permutation_limit: 4,
        }
    }
}

/// Orders waypoints to minimise the distance walked from a fixed origin.
///
/// Small instances are solved exactly; larger ones use nearest neighbour
/// polished by 2-opt. Every stage degrades to the next one on failure, so
/// the only error callers see is an empty waypoint list or a malformed
/// matrix that the haversine fallback cannot repair.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roam_core::{OptimizationMethod, TravelMode, Waypoint};
/// use roam_solver_tsp::RouteOptimizer;
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let stops = vec![
///     Waypoint::new("far", Coord { x: 0.02, y: 0.0 }),
///     Waypoint::new("near", Coord { x: 0.01, y: 0.0 }),
/// ];
/// let route = RouteOptimizer::default().optimize(origin, &stops, TravelMode::Walking)?;
/// assert_eq!(route.waypoint_ids(), vec!["near", "far"]);
/// assert_eq!(route.method, OptimizationMethod::Exact);
/// assert!(route.improvement > 0.0);
/// # Ok::<(), roam_core::RouteError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RouteOptimizer<P = HaversineTravelCost> {
    provider: P,
    config: RouteOptimizerConfig,
}

impl Default for RouteOptimizer<HaversineTravelCost> {
    fn default() -> Self {
        Self::new(HaversineTravelCost)
    }
}

impl<P> RouteOptimizer<P>
where
    P: TravelCostProvider,
{
    /// Construct an optimizer using default configuration.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, RouteOptimizerConfig::default())
    }

    /// Construct an optimizer with explicit configuration.
    #[must_use]
    pub const fn with_config(provider: P, config: RouteOptimizerConfig) -> Self {
        Self { provider, config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RouteOptimizerConfig {
        &self.config
    }

    /// Order `waypoints` into a route starting at `origin`.
    ///
    /// The returned route contains every waypoint exactly once and never
    /// covers more distance than visiting them in the given order.
    ///
    /// # Errors
    /// Returns [`RouteError::NoWaypoints`] when `waypoints` is empty, and
    /// [`RouteError::MatrixShape`] or [`RouteError::SolverFailed`] when no
    /// usable cost matrix can be built.
    pub fn optimize(
        &self,
        origin: Coord<f64>,
        waypoints: &[Waypoint],
        mode: TravelMode,
    ) -> Result<OptimizedRoute, RouteError> {
        if waypoints.is_empty() {
            return Err(RouteError::NoWaypoints);
        }
        let started_at = Instant::now();
        let points: Vec<Coord<f64>> = iter::once(origin)
            .chain(waypoints.iter().map(|waypoint| waypoint.location))
            .collect();
        let matrix = self.cost_matrix(&points, mode)?;

        let naive = matrix.naive_order();
        let naive_distance_m = matrix.path_distance(&naive);
        let (order, method) = self.solve(&matrix);
        let (order, method) = if matrix.path_distance(&order) > naive_distance_m {
            log::debug!("{method} ordering is longer than the input order; keeping input");
            (naive, OptimizationMethod::Unoptimized)
        } else {
            (order, method)
        };

        let route = assemble(origin, waypoints, &matrix, &order, method, naive_distance_m);
        log::debug!(
            "optimised {} waypoints with {} in {:?} ({:.1} m, {:.1}% saved)",
            waypoints.len(),
            route.method,
            started_at.elapsed(),
            route.total_distance_m,
            route.improvement * 100.0,
        );
        Ok(route)
    }

    fn cost_matrix(&self, points: &[Coord<f64>], mode: TravelMode) -> Result<CostMatrix, RouteError> {
        match self.provider.cost_matrix(points, mode) {
            Ok(costs) => match CostMatrix::new(costs, points.len()) {
                Ok(matrix) => match matrix.check_usable() {
                    Ok(()) => return Ok(matrix),
                    Err(error) => {
                        log::warn!("travel-cost provider returned {error}; using haversine");
                    }
                },
                Err(error) => log::warn!("travel-cost provider returned a bad matrix: {error}; using haversine"),
            },
            Err(error) => log::warn!("travel-cost provider failed: {error}; using haversine"),
        }
        let costs = HaversineTravelCost
            .cost_matrix(points, mode)
            .map_err(|error| RouteError::SolverFailed {
                message: error.to_string(),
            })?;
        CostMatrix::new(costs, points.len())
    }

    fn solve(&self, matrix: &CostMatrix) -> (Vec<usize>, OptimizationMethod) {
        if matrix.size() <= self.config.exact_limit {
            let exact = if matrix.waypoints() <= self.config.permutation_limit {
                permutations(matrix)
            } else {
                held_karp(matrix)
            };
            match exact {
                Ok(order) if is_complete(&order, matrix.waypoints()) => {
                    return (order, OptimizationMethod::Exact);
                }
                Ok(_) => log::warn!("exact solver dropped waypoints; using heuristic"),
                Err(error) => log::warn!("exact solver failed: {error}; using heuristic"),
            }
        }
        match nearest_neighbour(matrix) {
            Ok(order) => {
                let polished = two_opt(matrix, order);
                if is_complete(&polished, matrix.waypoints()) {
                    return (polished, OptimizationMethod::NearestNeighbor);
                }
                log::warn!("heuristic dropped waypoints; keeping input order");
            }
            Err(error) => log::warn!("heuristic failed: {error}; keeping input order"),
        }
        (matrix.naive_order(), OptimizationMethod::Unoptimized)
    }
}

/// Whether `order` visits each waypoint index `1..=count` exactly once.
fn is_complete(order: &[usize], count: usize) -> bool {
    let mut seen = vec![false; count];
    order.len() == count
        && order.iter().all(|&index| {
            index
                .checked_sub(1)
                .and_then(|slot| seen.get_mut(slot))
                .is_some_and(|visited| !std::mem::replace(visited, true))
        })
}

fn waypoint_at(waypoints: &[Waypoint], index: usize) -> Option<&Waypoint> {
    index.checked_sub(1).and_then(|slot| waypoints.get(slot))
}

fn assemble(
    origin: Coord<f64>,
    waypoints: &[Waypoint],
    matrix: &CostMatrix,
    order: &[usize],
    method: OptimizationMethod,
    naive_distance_m: f64,
) -> OptimizedRoute {
    let mut ordered = Vec::with_capacity(order.len());
    let mut legs = Vec::with_capacity(order.len());
    let mut previous = 0;
    for &index in order {
        let Some(waypoint) = waypoint_at(waypoints, index) else {
            continue;
        };
        let from = waypoint_at(waypoints, previous)
            .map_or_else(|| ORIGIN_ID.to_owned(), |stop| stop.id.clone());
        let edge = matrix.edge(previous, index);
        legs.push(RouteLeg {
            from,
            to: waypoint.id.clone(),
            distance_m: edge.distance_m,
            duration: edge.duration,
        });
        ordered.push(waypoint.clone());
        previous = index;
    }
    let total_distance_m: f64 = legs.iter().map(|leg| leg.distance_m).sum();
    let total_duration = legs
        .iter()
        .fold(Duration::ZERO, |total, leg| total.saturating_add(leg.duration));
    OptimizedRoute {
        origin,
        waypoints: ordered,
        legs,
        total_distance_m,
        total_duration,
        method,
        improvement: improvement(naive_distance_m, total_distance_m),
        naive_distance_m,
    }
}

fn improvement(naive: f64, optimized: f64) -> f64 {
    if !naive.is_finite() || naive <= 0.0 || !optimized.is_finite() {
        return 0.0;
    }
    ((naive - optimized) / naive).clamp(0.0, 1.0)
}
