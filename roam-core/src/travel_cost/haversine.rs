//! Great-circle travel costs with constant per-mode speeds.

use std::time::Duration;

use geo::{Coord, Distance, Haversine, Point};

use super::{TravelCost, TravelCostError, TravelCostMatrix, TravelCostProvider};
use crate::TravelMode;

/// Assumed walking speed.
pub const WALKING_SPEED_KMH: f64 = 5.0;
/// Assumed urban driving speed.
pub const DRIVING_SPEED_KMH: f64 = 30.0;

/// Great-circle distance between two coordinates in metres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roam_core::haversine_m;
///
/// let london = Coord { x: -0.1278, y: 51.5074 };
/// let paris = Coord { x: 2.3522, y: 48.8566 };
/// let metres = haversine_m(london, paris);
/// assert!((340_000.0..345_000.0).contains(&metres));
/// ```
#[must_use]
pub fn haversine_m(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to))
}

/// [`TravelCostProvider`] deriving costs from haversine distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineTravelCost;

impl HaversineTravelCost {
    const fn speed_mps(mode: TravelMode) -> f64 {
        let kmh = match mode {
            TravelMode::Walking => WALKING_SPEED_KMH,
            TravelMode::Driving => DRIVING_SPEED_KMH,
        };
        kmh * 1_000.0 / 3_600.0
    }

    /// Cost of a single edge.
    #[must_use]
    pub fn edge(from: Coord<f64>, to: Coord<f64>, mode: TravelMode) -> TravelCost {
        let distance_m = haversine_m(from, to);
        let seconds = distance_m / Self::speed_mps(mode);
        TravelCost {
            distance_m,
            duration: Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO),
        }
    }
}

impl TravelCostProvider for HaversineTravelCost {
    fn cost_matrix(
        &self,
        points: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<TravelCostMatrix, TravelCostError> {
        if points.is_empty() {
            return Err(TravelCostError::EmptyInput);
        }
        Ok(points
            .iter()
            .map(|from| {
                points
                    .iter()
                    .map(|to| Self::edge(*from, *to, mode))
                    .collect()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn diagonal_is_zero() {
        let points = [Coord { x: 0.0, y: 0.0 }, Coord { x: 0.01, y: 0.0 }];
        let matrix = HaversineTravelCost
            .cost_matrix(&points, TravelMode::Walking)
            .expect("matrix");
        assert_eq!(matrix[0][0].distance_m, 0.0);
        assert_eq!(matrix[1][1].duration, Duration::ZERO);
    }

    #[rstest]
    fn matrix_is_symmetric() {
        let points = [Coord { x: 0.0, y: 0.0 }, Coord { x: 0.02, y: 0.01 }];
        let matrix = HaversineTravelCost
            .cost_matrix(&points, TravelMode::Walking)
            .expect("matrix");
        assert!((matrix[0][1].distance_m - matrix[1][0].distance_m).abs() < 1e-9);
    }

    #[rstest]
    fn driving_is_six_times_faster_than_walking() {
        let from = Coord { x: 0.0, y: 0.0 };
        let to = Coord { x: 0.05, y: 0.0 };
        let walk = HaversineTravelCost::edge(from, to, TravelMode::Walking);
        let drive = HaversineTravelCost::edge(from, to, TravelMode::Driving);
        assert_eq!(walk.distance_m, drive.distance_m);
        let ratio = walk.duration.as_secs_f64() / drive.duration.as_secs_f64();
        assert!((ratio - 6.0).abs() < 1e-6);
    }

    #[rstest]
    fn one_kilometre_walk_takes_twelve_minutes() {
        // 0.008_993_2 degrees of latitude is roughly one kilometre.
        let edge = HaversineTravelCost::edge(
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 0.0, y: 0.008_993_2 },
            TravelMode::Walking,
        );
        assert!((edge.distance_m - 1_000.0).abs() < 1.0);
        assert!((edge.duration.as_secs_f64() - 720.0).abs() < 1.0);
    }

    #[rstest]
    fn empty_input_is_rejected() {
        assert_eq!(
            HaversineTravelCost.cost_matrix(&[], TravelMode::Walking),
            Err(TravelCostError::EmptyInput)
        );
    }
}
