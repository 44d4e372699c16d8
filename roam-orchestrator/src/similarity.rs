//! Pairwise similarity of places, used to spread MMR selections.

use roam_core::category::{dominant_interest, normalise_category};
use roam_core::{Place, ScoredCandidate};

/// Similarity of two places sharing a category.
pub const SAME_CATEGORY: f64 = 1.0;
/// Similarity of two places whose categories lead with the same interest.
pub const SAME_INTEREST: f64 = 0.6;

/// Similarity in `0.0..=1.0` between two places.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roam_core::Place;
/// use roam_orchestrator::place_similarity;
///
/// let at = Coord { x: 0.0, y: 0.0 };
/// let bistro = Place::new("a", "A", "bistro", at);
/// let diner = Place::new("b", "B", "Diner", at);
/// let park = Place::new("c", "C", "park", at);
/// assert_eq!(place_similarity(&bistro, &diner), 0.6);
/// assert_eq!(place_similarity(&bistro, &park), 0.0);
/// ```
#[must_use]
pub fn place_similarity(a: &Place, b: &Place) -> f64 {
    if normalise_category(&a.category) == normalise_category(&b.category) {
        return SAME_CATEGORY;
    }
    match (dominant_interest(&a.category), dominant_interest(&b.category)) {
        (Some(left), Some(right)) if left == right => SAME_INTEREST,
        _ => 0.0,
    }
}

pub(crate) fn candidate_similarity(a: &ScoredCandidate, b: &ScoredCandidate) -> f64 {
    place_similarity(&a.place, &b.place)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;

    fn place(category: &str) -> Place {
        Place::new("p", "p", category, Coord { x: 0.0, y: 0.0 })
    }

    #[rstest]
    #[case("museum", " Museum ", SAME_CATEGORY)]
    #[case("museum", "historic", SAME_INTEREST)]
    #[case("museum", "spa", 0.0)]
    #[case("spaceport", "moonbase", 0.0)]
    fn similarity_table(#[case] left: &str, #[case] right: &str, #[case] expected: f64) {
        assert_eq!(place_similarity(&place(left), &place(right)), expected);
        assert_eq!(place_similarity(&place(right), &place(left)), expected);
    }
}
