//! Validated square cost matrix over the origin and waypoints.

use std::time::Duration;

use roam_core::{RouteError, TravelCost, TravelCostMatrix};

use crate::error::StageError;

const MISSING: TravelCost = TravelCost {
    distance_m: f64::INFINITY,
    duration: Duration::ZERO,
};

/// Travel costs where index `0` is the origin and `1..size` the waypoints.
#[derive(Debug, Clone)]
pub(crate) struct CostMatrix {
    costs: TravelCostMatrix,
}

impl CostMatrix {
    /// Wrap `costs`, checking it is `size × size`.
    pub(crate) fn new(costs: TravelCostMatrix, size: usize) -> Result<Self, RouteError> {
        if costs.len() != size {
            return Err(RouteError::MatrixShape {
                expected: size,
                actual: costs.len(),
            });
        }
        if let Some(row) = costs.iter().find(|row| row.len() != size) {
            return Err(RouteError::MatrixShape {
                expected: size,
                actual: row.len(),
            });
        }
        Ok(Self { costs })
    }

    /// Number of points including the origin.
    pub(crate) fn size(&self) -> usize {
        self.costs.len()
    }

    /// Number of waypoints.
    pub(crate) fn waypoints(&self) -> usize {
        self.size().saturating_sub(1)
    }

    pub(crate) fn edge(&self, from: usize, to: usize) -> TravelCost {
        self.costs
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(MISSING)
    }

    pub(crate) fn distance(&self, from: usize, to: usize) -> f64 {
        self.edge(from, to).distance_m
    }

    /// Fail on the first edge a solver cannot reason about.
    pub(crate) fn check_usable(&self) -> Result<(), StageError> {
        for (from, row) in self.costs.iter().enumerate() {
            for (to, edge) in row.iter().enumerate() {
                let cost = edge.distance_m;
                if !cost.is_finite() || cost < 0.0 {
                    return Err(StageError::UnusableCost { from, to, cost });
                }
            }
        }
        Ok(())
    }

    /// Distance of the open path starting at the origin and visiting `order`.
    pub(crate) fn path_distance(&self, order: &[usize]) -> f64 {
        let mut previous = 0;
        let mut total = 0.0;
        for &next in order {
            total += self.distance(previous, next);
            previous = next;
        }
        total
    }

    /// The input order: waypoints `1..size` as given.
    pub(crate) fn naive_order(&self) -> Vec<usize> {
        (1..self.size()).collect()
    }
}
