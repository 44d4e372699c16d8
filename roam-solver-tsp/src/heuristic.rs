//! Greedy construction followed by 2-opt local search.

use crate::error::StageError;
use crate::matrix::CostMatrix;

const MAX_PASSES: usize = 50;
const EPSILON: f64 = 1e-9;

/// Visit the closest unvisited waypoint next, starting at the origin.
pub(crate) fn nearest_neighbour(matrix: &CostMatrix) -> Result<Vec<usize>, StageError> {
    matrix.check_usable()?;
    let mut remaining = matrix.naive_order();
    let mut order = Vec::with_capacity(remaining.len());
    let mut current = 0;
    while !remaining.is_empty() {
        let Some((position, _)) = remaining
            .iter()
            .enumerate()
            .min_by(|a, b| {
                matrix
                    .distance(current, *a.1)
                    .total_cmp(&matrix.distance(current, *b.1))
            })
        else {
            break;
        };
        let next = remaining.remove(position);
        order.push(next);
        current = next;
    }
    Ok(order)
}

/// Reverse segments while doing so shortens the path.
///
/// The full path is re-evaluated for each move so asymmetric matrices are
/// handled correctly.
pub(crate) fn two_opt(matrix: &CostMatrix, mut order: Vec<usize>) -> Vec<usize> {
    let len = order.len();
    if len < 3 {
        return order;
    }
    let mut best = matrix.path_distance(&order);
    for _ in 0..MAX_PASSES {
        let mut improved = false;
        for start in 0..len - 1 {
            for end in start + 1..len {
                reverse(&mut order, start, end);
                let candidate = matrix.path_distance(&order);
                if candidate + EPSILON < best {
                    best = candidate;
                    improved = true;
                } else {
                    reverse(&mut order, start, end);
                }
            }
        }
        if !improved {
            break;
        }
    }
    order
}

fn reverse(order: &mut [usize], start: usize, end: usize) {
    if let Some(segment) = order.get_mut(start..=end) {
        segment.reverse();
    }
}
