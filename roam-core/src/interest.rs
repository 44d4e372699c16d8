//! Interest dimensions and weighted interest vectors.
//!
//! Both places (via the category mapper) and users (via their taste profile)
//! are described as an [`InterestVector`] over the closed [`Interest`] set.
//!
//! # Examples
//! ```
//! use roam_core::{Interest, InterestVector};
//!
//! let vector = InterestVector::new()
//!     .with_weight(Interest::Food, 0.9)
//!     .with_weight(Interest::Culture, 0.2);
//! assert_eq!(vector.weight(Interest::Food), Some(0.9));
//! assert_eq!(Interest::Food.as_code(), "FOOD");
//! ```

use std::collections::BTreeMap;

/// Broad taste dimensions used to compare users with places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Interest {
    /// Museums, heritage and landmarks.
    Culture,
    /// Restaurants, cafes and markets.
    Food,
    /// Parks, gardens and viewpoints.
    Nature,
    /// Bars, clubs and late venues.
    Nightlife,
    /// Malls, boutiques and markets.
    Shopping,
    /// Galleries, street art and studios.
    Art,
    /// Spas, yoga and relaxation.
    Wellness,
    /// Gyms, stadiums and outdoor activity.
    Sports,
}

impl Interest {
    /// Every interest in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Culture,
        Self::Food,
        Self::Nature,
        Self::Nightlife,
        Self::Shopping,
        Self::Art,
        Self::Wellness,
        Self::Sports,
    ];

    /// Return the interest as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use roam_core::Interest;
    ///
    /// assert_eq!(Interest::Nightlife.as_str(), "nightlife");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Culture => "culture",
            Self::Food => "food",
            Self::Nature => "nature",
            Self::Nightlife => "nightlife",
            Self::Shopping => "shopping",
            Self::Art => "art",
            Self::Wellness => "wellness",
            Self::Sports => "sports",
        }
    }

    /// Return the uppercase code used inside reason codes.
    #[must_use]
    pub const fn as_code(self) -> &'static str {
        match self {
            Self::Culture => "CULTURE",
            Self::Food => "FOOD",
            Self::Nature => "NATURE",
            Self::Nightlife => "NIGHTLIFE",
            Self::Shopping => "SHOPPING",
            Self::Art => "ART",
            Self::Wellness => "WELLNESS",
            Self::Sports => "SPORTS",
        }
    }
}

impl std::fmt::Display for Interest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "culture" => Ok(Self::Culture),
            "food" => Ok(Self::Food),
            "nature" => Ok(Self::Nature),
            "nightlife" => Ok(Self::Nightlife),
            "shopping" => Ok(Self::Shopping),
            "art" => Ok(Self::Art),
            "wellness" => Ok(Self::Wellness),
            "sports" => Ok(Self::Sports),
            _ => Err(format!("unknown interest '{s}'")),
        }
    }
}

/// Weights over the [`Interest`] dimensions, each in `0.0..=1.0`.
///
/// Weights are independent; they need not sum to one. Iteration follows the
/// [`Interest`] declaration order so downstream arithmetic is deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct InterestVector {
    weights: BTreeMap<Interest, f64>,
}

impl InterestVector {
    /// Construct an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a vector assigning `weight` to every dimension.
    ///
    /// # Examples
    /// ```
    /// use roam_core::{Interest, InterestVector};
    ///
    /// let neutral = InterestVector::uniform(0.5);
    /// assert_eq!(neutral.weight(Interest::Sports), Some(0.5));
    /// assert_eq!(neutral.len(), 8);
    /// ```
    #[must_use]
    pub fn uniform(weight: f64) -> Self {
        Interest::ALL
            .into_iter()
            .fold(Self::new(), |vector, interest| {
                vector.with_weight(interest, weight)
            })
    }

    /// Return the weight for `interest`, if present.
    #[must_use]
    pub fn weight(&self, interest: Interest) -> Option<f64> {
        self.weights.get(&interest).copied()
    }

    /// Insert or update a weight, clamping it into `0.0..=1.0`.
    ///
    /// Non-finite weights are stored as `0.0`.
    pub fn set_weight(&mut self, interest: Interest, weight: f64) {
        let clamped = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.weights.insert(interest, clamped);
    }

    /// Add a weight while returning `self` for chaining.
    #[must_use]
    pub fn with_weight(mut self, interest: Interest, weight: f64) -> Self {
        self.set_weight(interest, weight);
        self
    }

    /// Iterate over `(interest, weight)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Interest, f64)> + '_ {
        self.weights.iter().map(|(interest, weight)| (*interest, *weight))
    }

    /// Number of dimensions carrying a weight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Report whether no dimension carries a weight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Return the heaviest dimension, preferring earlier declarations on ties.
    #[must_use]
    pub fn dominant(&self) -> Option<Interest> {
        self.iter()
            .fold(None, |best: Option<(Interest, f64)>, (interest, weight)| {
                match best {
                    Some((_, best_weight)) if best_weight >= weight => best,
                    _ => Some((interest, weight)),
                }
            })
            .map(|(interest, _)| interest)
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }
}

impl FromIterator<(Interest, f64)> for InterestVector {
    fn from_iter<I: IntoIterator<Item = (Interest, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |vector, (interest, weight)| {
                vector.with_weight(interest, weight)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    fn display_matches_as_str() {
        assert_eq!(Interest::Art.to_string(), Interest::Art.as_str());
    }

    #[rstest]
    fn parsing_rejects_unknown() {
        let err = Interest::from_str("astrology").expect_err("unknown interest");
        assert!(err.contains("unknown interest"));
    }

    #[rstest]
    #[case(" Food ", Interest::Food)]
    #[case("WELLNESS", Interest::Wellness)]
    fn parsing_is_case_insensitive(#[case] raw: &str, #[case] expected: Interest) {
        assert_eq!(Interest::from_str(raw), Ok(expected));
    }

    #[rstest]
    fn set_weight_clamps_out_of_range() {
        let mut vector = InterestVector::new();
        vector.set_weight(Interest::Food, 1.4);
        vector.set_weight(Interest::Art, -0.2);
        vector.set_weight(Interest::Nature, f64::NAN);
        assert_eq!(vector.weight(Interest::Food), Some(1.0));
        assert_eq!(vector.weight(Interest::Art), Some(0.0));
        assert_eq!(vector.weight(Interest::Nature), Some(0.0));
    }

    #[rstest]
    fn iteration_follows_declaration_order() {
        let vector = InterestVector::new()
            .with_weight(Interest::Sports, 0.1)
            .with_weight(Interest::Culture, 0.9);
        let order: Vec<_> = vector.iter().map(|(interest, _)| interest).collect();
        assert_eq!(order, vec![Interest::Culture, Interest::Sports]);
    }
}
