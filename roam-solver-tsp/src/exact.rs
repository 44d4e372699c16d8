//! Exact open-path solvers anchored at the origin.

use crate::error::StageError;
use crate::matrix::CostMatrix;

/// Largest instance Held–Karp will allocate tables for.
pub(crate) const HELD_KARP_LIMIT: usize = 16;

const NO_PARENT: usize = usize::MAX;

/// Enumerate every ordering of the waypoints, pruning partial paths that
/// already cost more than the best complete one.
pub(crate) fn permutations(matrix: &CostMatrix) -> Result<Vec<usize>, StageError> {
    matrix.check_usable()?;
    let mut search = Search {
        matrix,
        prefix: Vec::with_capacity(matrix.waypoints()),
        best: None,
    };
    let mut remaining = matrix.naive_order();
    search.extend(&mut remaining, 0, 0.0);
    Ok(search.best.map(|(order, _)| order).unwrap_or_default())
}

struct Search<'a> {
    matrix: &'a CostMatrix,
    prefix: Vec<usize>,
    best: Option<(Vec<usize>, f64)>,
}

impl Search<'_> {
    fn extend(&mut self, remaining: &mut Vec<usize>, last: usize, cost: f64) {
        if self.best.as_ref().is_some_and(|(_, best)| cost >= *best) && !remaining.is_empty() {
            return;
        }
        if remaining.is_empty() {
            if self.best.as_ref().is_none_or(|(_, best)| cost < *best) {
                self.best = Some((self.prefix.clone(), cost));
            }
            return;
        }
        for position in 0..remaining.len() {
            let next = remaining.remove(position);
            self.prefix.push(next);
            let step = self.matrix.distance(last, next);
            self.extend(remaining, next, cost + step);
            self.prefix.pop();
            remaining.insert(position, next);
        }
    }
}

/// Held–Karp dynamic programme over subsets of waypoints.
///
/// `O(2^n · n²)` time and `O(2^n · n)` memory for `n` waypoints.
pub(crate) fn held_karp(matrix: &CostMatrix) -> Result<Vec<usize>, StageError> {
    let n = matrix.waypoints();
    if n > HELD_KARP_LIMIT {
        return Err(StageError::TooLarge {
            waypoints: n,
            limit: HELD_KARP_LIMIT,
        });
    }
    matrix.check_usable()?;
    if n == 0 {
        return Ok(Vec::new());
    }

    let subsets = 1_usize << n;
    let slot = |mask: usize, end: usize| mask * n + end;
    let mut cost = vec![f64::INFINITY; subsets * n];
    let mut parent = vec![NO_PARENT; subsets * n];

    for end in 0..n {
        if let Some(cell) = cost.get_mut(slot(1 << end, end)) {
            *cell = matrix.distance(0, end + 1);
        }
    }
    for mask in 1..subsets {
        for end in (0..n).filter(|end| mask & (1 << end) != 0) {
            let Some(&current) = cost.get(slot(mask, end)) else {
                continue;
            };
            if !current.is_finite() {
                continue;
            }
            for next in (0..n).filter(|next| mask & (1 << next) == 0) {
                let extended = mask | (1 << next);
                let candidate = current + matrix.distance(end + 1, next + 1);
                let index = slot(extended, next);
                if cost.get(index).is_some_and(|existing| candidate < *existing) {
                    if let Some(cell) = cost.get_mut(index) {
                        *cell = candidate;
                    }
                    if let Some(cell) = parent.get_mut(index) {
                        *cell = end;
                    }
                }
            }
        }
    }

    let full = subsets - 1;
    let mut end = (0..n)
        .filter_map(|end| cost.get(slot(full, end)).map(|total| (end, *total)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(end, _)| end)
        .unwrap_or(0);
    let mut mask = full;
    let mut order = Vec::with_capacity(n);
    loop {
        order.push(end + 1);
        let previous = parent.get(slot(mask, end)).copied().unwrap_or(NO_PARENT);
        mask &= !(1 << end);
        if previous == NO_PARENT || mask == 0 {
            break;
        }
        end = previous;
    }
    order.reverse();
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roam_core::{TravelCost, TravelCostMatrix};
    use rstest::rstest;
    use std::time::Duration;

    fn line_matrix(positions: &[f64]) -> CostMatrix {
        let costs: TravelCostMatrix = positions
            .iter()
            .map(|from| {
                positions
                    .iter()
                    .map(|to| TravelCost {
                        distance_m: (from - to).abs(),
                        duration: Duration::ZERO,
                    })
                    .collect()
            })
            .collect();
        CostMatrix::new(costs, positions.len()).unwrap_or_else(|error| panic!("{error}"))
    }

    #[rstest]
    fn permutations_walk_the_line() {
        let matrix = line_matrix(&[0.0, 3.0, 1.0, 2.0]);
        assert_eq!(permutations(&matrix), Ok(vec![2, 3, 1]));
    }

    #[rstest]
    fn held_karp_walks_the_line() {
        let matrix = line_matrix(&[0.0, 5.0, 1.0, 4.0, 2.0, 3.0]);
        assert_eq!(held_karp(&matrix), Ok(vec![2, 4, 5, 3, 1]));
    }

    #[rstest]
    fn solvers_agree_on_cost() {
        let matrix = line_matrix(&[0.0, 7.0, -2.0, 4.0, 1.0, -5.0]);
        let brute = permutations(&matrix).unwrap_or_default();
        let dynamic = held_karp(&matrix).unwrap_or_default();
        assert_eq!(matrix.path_distance(&brute), matrix.path_distance(&dynamic));
    }

    #[rstest]
    fn held_karp_refuses_huge_instances() {
        let positions: Vec<f64> = (0_u32..18).map(f64::from).collect();
        let matrix = line_matrix(&positions);
        assert!(matches!(held_karp(&matrix), Err(StageError::TooLarge { .. })));
    }
}
