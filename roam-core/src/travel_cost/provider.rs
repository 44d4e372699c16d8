//! Travel-cost provider trait and matrix alias for coordinate pairs.

use std::sync::Arc;
use std::time::Duration;

use geo::Coord;

use super::error::TravelCostError;
use crate::TravelMode;

/// Cost of travelling between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TravelCost {
    /// Distance in metres.
    pub distance_m: f64,
    /// Travel time.
    pub duration: Duration,
}

impl TravelCost {
    /// A zero-cost edge, used on the matrix diagonal.
    pub const ZERO: Self = Self {
        distance_m: 0.0,
        duration: Duration::ZERO,
    };
}

/// Adjacency matrix of travel costs.
pub type TravelCostMatrix = Vec<Vec<TravelCost>>;

/// Fetch pairwise travel costs for a set of points.
///
/// Implementers must return a square `n×n` matrix where `n == points.len()`.
/// `matrix[i][j]` is the cost from `points[i]` to `points[j]`; it need not
/// equal `matrix[j][i]`.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use roam_core::{TravelCost, TravelCostError, TravelCostMatrix, TravelCostProvider, TravelMode};
///
/// struct Unit;
///
/// impl TravelCostProvider for Unit {
///     fn cost_matrix(
///         &self,
///         points: &[Coord<f64>],
///         _mode: TravelMode,
///     ) -> Result<TravelCostMatrix, TravelCostError> {
///         if points.is_empty() {
///             return Err(TravelCostError::EmptyInput);
///         }
///         Ok(vec![vec![TravelCost::ZERO; points.len()]; points.len()])
///     }
/// }
///
/// let matrix = Unit.cost_matrix(&[Coord { x: 0.0, y: 0.0 }], TravelMode::Walking)?;
/// assert_eq!(matrix.len(), 1);
/// # Ok::<(), TravelCostError>(())
/// ```
pub trait TravelCostProvider: Send + Sync {
    /// Return a matrix of travel costs for `points`.
    ///
    /// Implementations must return `Err(TravelCostError::EmptyInput)` when
    /// `points` is empty.
    fn cost_matrix(
        &self,
        points: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<TravelCostMatrix, TravelCostError>;
}

impl<T> TravelCostProvider for Arc<T>
where
    T: TravelCostProvider + ?Sized,
{
    fn cost_matrix(
        &self,
        points: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<TravelCostMatrix, TravelCostError> {
        (**self).cost_matrix(points, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::UnitTravelCostProvider;

    fn sample_points() -> Vec<Coord<f64>> {
        vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }]
    }

    #[rstest]
    fn returns_square_matrix() {
        let points = sample_points();
        let matrix = UnitTravelCostProvider
            .cost_matrix(&points, TravelMode::Walking)
            .expect("expected square matrix from UnitTravelCostProvider");
        assert_eq!(matrix.len(), points.len());
        assert!(matrix.iter().all(|row| row.len() == points.len()));
        assert_eq!(matrix[0][0], TravelCost::ZERO);
        assert_eq!(matrix[0][1].duration, Duration::from_secs(1));
    }

    #[rstest]
    fn errors_on_empty_input() {
        let err = UnitTravelCostProvider
            .cost_matrix(&[], TravelMode::Driving)
            .expect_err("expected EmptyInput for empty slice");
        assert_eq!(err, TravelCostError::EmptyInput);
    }
}
