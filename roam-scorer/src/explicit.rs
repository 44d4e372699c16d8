//! Stated-taste scoring against the user's interest vector.

use roam_core::{
    Interest, NEUTRAL_WEIGHT, Place, Scorer, ScoringContext, TasteProfile, UserSnapshot,
    category, sanitise,
};

/// Scores how well a place's interest vector matches the taste profile.
///
/// The score is the place-weighted mean of the user's interest weights over
/// the dimensions the place's category maps to. Users without a profile, and
/// places whose category is unknown, score exactly [`NEUTRAL_WEIGHT`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roam_core::{Interest, InterestVector, Place, TasteProfile};
/// use roam_scorer::ExplicitScorer;
///
/// let mut profile = TasteProfile::neutral("u1");
/// profile.interests = InterestVector::new().with_weight(Interest::Food, 0.9);
/// let cafe = Place::new("p1", "Corner Cafe", "cafe", Coord { x: 0.0, y: 0.0 });
///
/// let score = ExplicitScorer.score_profile(Some(&profile), &cafe);
/// assert!(score > 0.8);
/// assert_eq!(ExplicitScorer.score_profile(None, &cafe), 0.5);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitScorer;

impl ExplicitScorer {
    /// Score `place` against an optional taste profile.
    #[must_use]
    pub fn score_profile(&self, profile: Option<&TasteProfile>, place: &Place) -> f64 {
        let Some(profile) = profile else {
            return NEUTRAL_WEIGHT;
        };
        let place_vector = category::map_to_interests(&place.category);
        let total = place_vector.total();
        if place_vector.is_empty() || total <= 0.0 {
            return NEUTRAL_WEIGHT;
        }
        let weighted: f64 = place_vector
            .iter()
            .map(|(interest, weight)| weight * profile.weight(interest))
            .sum();
        sanitise(weighted / total)
    }

    /// Interest contributing most to the explicit score.
    ///
    /// Ties keep the earlier dimension in [`Interest::ALL`]. Returns `None`
    /// for unknown categories.
    #[must_use]
    pub fn top_interest(&self, profile: Option<&TasteProfile>, place: &Place) -> Option<Interest> {
        let place_vector = category::map_to_interests(&place.category);
        let mut best: Option<(Interest, f64)> = None;
        for (interest, weight) in place_vector.iter() {
            let user = profile.map_or(NEUTRAL_WEIGHT, |profile| profile.weight(interest));
            let product = weight * user;
            if best.is_none_or(|(_, current)| product > current) {
                best = Some((interest, product));
            }
        }
        best.map(|(interest, _)| interest)
    }
}

impl Scorer for ExplicitScorer {
    fn score(&self, snapshot: &UserSnapshot, place: &Place, _context: &ScoringContext) -> f64 {
        self.score_profile(snapshot.profile.as_ref(), place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use roam_core::InterestVector;
    use rstest::{fixture, rstest};

    fn place(category: &str) -> Place {
        Place::new("p", "p", category, Coord { x: 0.0, y: 0.0 })
    }

    #[fixture]
    fn foodie() -> TasteProfile {
        let mut profile = TasteProfile::neutral("u");
        profile.interests = InterestVector::new()
            .with_weight(Interest::Food, 0.9)
            .with_weight(Interest::Culture, 0.2);
        profile
    }

    #[rstest]
    #[case("")]
    #[case("spaceport")]
    fn unknown_category_is_neutral(foodie: TasteProfile, #[case] category: &str) {
        assert_eq!(
            ExplicitScorer.score_profile(Some(&foodie), &place(category)),
            NEUTRAL_WEIGHT
        );
    }

    #[rstest]
    fn food_outscores_museum(foodie: TasteProfile) {
        let restaurant = ExplicitScorer.score_profile(Some(&foodie), &place("restaurant"));
        let museum = ExplicitScorer.score_profile(Some(&foodie), &place("museum"));
        assert!(restaurant > museum, "{restaurant} <= {museum}");
    }

    #[rstest]
    fn top_interest_prefers_strongest_product(foodie: TasteProfile) {
        assert_eq!(
            ExplicitScorer.top_interest(Some(&foodie), &place("restaurant")),
            Some(Interest::Food)
        );
        assert_eq!(ExplicitScorer.top_interest(Some(&foodie), &place("??")), None);
    }
}
