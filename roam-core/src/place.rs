//! Candidate places returned by external catalogue searches.

use chrono::{DateTime, Utc};
use geo::Coord;

/// A time window during which a place carries a paid placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SponsorshipWindow {
    /// Inclusive start of the window.
    pub starts_at: DateTime<Utc>,
    /// Exclusive end of the window.
    pub ends_at: DateTime<Utc>,
}

impl SponsorshipWindow {
    /// Report whether `now` falls inside the window.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now && now < self.ends_at
    }
}

/// A location worth suggesting.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Places are
/// fetched per request and never mutated afterwards.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roam_core::Place;
///
/// let place = Place::new("p1", "Trattoria", "restaurant", Coord { x: -0.12, y: 51.5 })
///     .with_rating(4.5, 200);
///
/// assert_eq!(place.category, "restaurant");
/// assert_eq!(place.review_count, 200);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    /// Stable identifier assigned by the catalogue.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form category label, e.g. `"restaurant"`.
    pub category: String,
    /// Optional cuisine label for food places.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cuisine: Option<String>,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Average rating on a 0–5 scale, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rating: Option<f64>,
    /// Number of reviews behind `rating`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub review_count: u32,
    /// Tag naming the catalogue that produced the place.
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: String,
    /// Paid placement window, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sponsorship: Option<SponsorshipWindow>,
}

impl Place {
    /// Construct a place without rating, cuisine or sponsorship.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        location: Coord<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            cuisine: None,
            location,
            rating: None,
            review_count: 0,
            source: String::new(),
            sponsorship: None,
        }
    }

    /// Attach a rating and its review count.
    #[must_use]
    pub fn with_rating(mut self, rating: f64, review_count: u32) -> Self {
        self.rating = Some(rating);
        self.review_count = review_count;
        self
    }

    /// Attach a cuisine label.
    #[must_use]
    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    /// Attach a source tag.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Attach a sponsorship window.
    #[must_use]
    pub fn with_sponsorship(mut self, window: SponsorshipWindow) -> Self {
        self.sponsorship = Some(window);
        self
    }

    /// Report whether the place carries an active sponsorship at `now`.
    #[must_use]
    pub fn is_sponsored_at(&self, now: DateTime<Utc>) -> bool {
        self.sponsorship.is_some_and(|window| window.contains(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    #[rstest]
    fn place_without_sponsorship_is_never_sponsored(now: DateTime<Utc>) {
        let place = Place::new("p", "Park", "park", Coord { x: 0.0, y: 0.0 });
        assert!(!place.is_sponsored_at(now));
    }

    #[rstest]
    #[case(TimeDelta::hours(-1), TimeDelta::hours(1), true)]
    #[case(TimeDelta::zero(), TimeDelta::hours(1), true)]
    #[case(TimeDelta::hours(-2), TimeDelta::zero(), false)]
    #[case(TimeDelta::hours(1), TimeDelta::hours(2), false)]
    fn sponsorship_window_bounds(
        now: DateTime<Utc>,
        #[case] start: TimeDelta,
        #[case] end: TimeDelta,
        #[case] expected: bool,
    ) {
        let place = Place::new("p", "Cafe", "cafe", Coord { x: 0.0, y: 0.0 }).with_sponsorship(
            SponsorshipWindow {
                starts_at: now + start,
                ends_at: now + end,
            },
        );
        assert_eq!(place.is_sponsored_at(now), expected);
    }
}
