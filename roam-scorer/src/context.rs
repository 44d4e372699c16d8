//! Situational fit of a place to the time of day, weather and season.

use roam_core::{
    ContextInsights, Interest, NEUTRAL_WEIGHT, Place, Scorer, ScoringContext, Season, TimeOfDay,
    UserSnapshot, Weather, category, sanitise,
};

/// Scores how well a place suits the moment of the request.
///
/// The place is judged by its dominant interest. Unknown categories fit
/// neutrally. Without insights there is nothing to judge and
/// [`ContextScorer::fit`] returns `None`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roam_core::{ContextInsights, Place, Season, TimeOfDay, Weather};
/// use roam_scorer::ContextScorer;
///
/// let park = Place::new("p", "Park", "park", Coord { x: 0.0, y: 0.0 });
/// let wet = ContextInsights {
///     time_of_day: TimeOfDay::Afternoon,
///     weather: Weather::Rain,
///     season: Season::Autumn,
/// };
/// let dry = ContextInsights { weather: Weather::Clear, ..wet };
///
/// let scorer = ContextScorer;
/// assert!(scorer.fit(&park, Some(&wet)) < scorer.fit(&park, Some(&dry)));
/// assert_eq!(scorer.fit(&park, None), None);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextScorer;

impl ContextScorer {
    /// Fit of `place` to `insights`, or `None` when insights are missing.
    #[must_use]
    pub fn fit(&self, place: &Place, insights: Option<&ContextInsights>) -> Option<f64> {
        let insights = insights?;
        let Some(interest) = category::dominant_interest(&place.category) else {
            return Some(NEUTRAL_WEIGHT);
        };
        let total = time_fit(interest, insights.time_of_day)
            + weather_fit(interest, insights.weather)
            + season_fit(interest, insights.season);
        Some(sanitise(total / 3.0))
    }
}

impl Scorer for ContextScorer {
    fn score(&self, _snapshot: &UserSnapshot, place: &Place, context: &ScoringContext) -> f64 {
        self.fit(place, context.insights.as_ref()).unwrap_or(0.0)
    }
}

const fn time_fit(interest: Interest, time: TimeOfDay) -> f64 {
    use TimeOfDay::{Afternoon, Evening, Midday, Morning, Night};

    match (interest, time) {
        (Interest::Food, Midday) => 1.0,
        (Interest::Food, Evening) => 0.9,
        (Interest::Food, Morning) => 0.6,
        (Interest::Food, Afternoon) => 0.5,
        (Interest::Food, Night) => 0.4,
        (Interest::Nightlife, Night) => 1.0,
        (Interest::Nightlife, Evening) => 0.9,
        (Interest::Nightlife, Afternoon) => 0.2,
        (Interest::Nightlife, Midday) => 0.1,
        (Interest::Nightlife, Morning) => 0.0,
        (Interest::Culture | Interest::Art, Afternoon) => 0.9,
        (Interest::Culture | Interest::Art, Morning | Midday) => 0.8,
        (Interest::Culture | Interest::Art, Evening) => 0.5,
        (Interest::Culture | Interest::Art, Night) => 0.2,
        (Interest::Nature | Interest::Sports, Morning) => 0.9,
        (Interest::Nature | Interest::Sports, Midday | Afternoon) => 0.8,
        (Interest::Nature | Interest::Sports, Evening) => 0.4,
        (Interest::Nature | Interest::Sports, Night) => 0.1,
        (Interest::Shopping, Afternoon) => 0.9,
        (Interest::Shopping, Midday) => 0.8,
        (Interest::Shopping, Morning | Evening) => 0.6,
        (Interest::Shopping, Night) => 0.1,
        (Interest::Wellness, Morning) => 0.9,
        (Interest::Wellness, Afternoon | Evening) => 0.7,
        (Interest::Wellness, Midday) => 0.6,
        (Interest::Wellness, Night) => 0.3,
    }
}

const fn weather_fit(interest: Interest, weather: Weather) -> f64 {
    use Weather::{Clear, Cloudy, Hot, Rain, Snow};

    match interest {
        Interest::Nature | Interest::Sports => match weather {
            Clear => 1.0,
            Cloudy => 0.7,
            Hot => 0.5,
            Snow => 0.2,
            Rain => 0.1,
        },
        Interest::Culture | Interest::Art | Interest::Shopping | Interest::Wellness => {
            match weather {
                Rain => 0.9,
                Snow | Hot => 0.8,
                Cloudy => 0.7,
                Clear => 0.6,
            }
        }
        Interest::Food | Interest::Nightlife => match weather {
            Clear => 0.8,
            Cloudy | Hot => 0.7,
            Rain => 0.6,
            Snow => 0.5,
        },
    }
}

const fn season_fit(interest: Interest, season: Season) -> f64 {
    match (interest, season) {
        (Interest::Nature | Interest::Sports, Season::Summer) => 1.0,
        (Interest::Nature | Interest::Sports, Season::Spring) => 0.9,
        (Interest::Nature | Interest::Sports, Season::Autumn) => 0.7,
        (Interest::Nature | Interest::Sports, Season::Winter) => 0.3,
        (Interest::Wellness, Season::Winter) => 0.9,
        (Interest::Wellness, Season::Autumn) => 0.8,
        (Interest::Wellness, Season::Spring) => 0.6,
        (Interest::Wellness, Season::Summer) => 0.5,
        (Interest::Nightlife, Season::Summer) => 0.9,
        _ => 0.7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;

    fn place(category: &str) -> Place {
        Place::new("p", "p", category, Coord { x: 0.0, y: 0.0 })
    }

    fn insights(time_of_day: TimeOfDay, weather: Weather) -> ContextInsights {
        ContextInsights {
            time_of_day,
            weather,
            season: Season::Summer,
        }
    }

    #[rstest]
    fn nightlife_prefers_night() {
        let bar = place("nightclub");
        let night = ContextScorer.fit(&bar, Some(&insights(TimeOfDay::Night, Weather::Clear)));
        let morning = ContextScorer.fit(&bar, Some(&insights(TimeOfDay::Morning, Weather::Clear)));
        assert!(night > morning);
    }

    #[rstest]
    fn meal_times_favour_food() {
        let diner = place("restaurant");
        let lunch = ContextScorer.fit(&diner, Some(&insights(TimeOfDay::Midday, Weather::Cloudy)));
        let late = ContextScorer.fit(&diner, Some(&insights(TimeOfDay::Night, Weather::Cloudy)));
        assert!(lunch > late);
    }

    #[rstest]
    fn unknown_category_is_neutral() {
        let fit = ContextScorer.fit(
            &place("spaceport"),
            Some(&insights(TimeOfDay::Night, Weather::Snow)),
        );
        assert_eq!(fit, Some(NEUTRAL_WEIGHT));
    }

    #[rstest]
    #[case(TimeOfDay::Morning)]
    #[case(TimeOfDay::Night)]
    fn every_fit_is_in_range(#[case] time: TimeOfDay) {
        for category in ["park", "museum", "spa", "mall", "bar", "gym", "cafe"] {
            for weather in [Weather::Clear, Weather::Cloudy, Weather::Rain, Weather::Snow, Weather::Hot] {
                let fit = ContextScorer
                    .fit(&place(category), Some(&insights(time, weather)))
                    .unwrap_or(-1.0);
                assert!((0.0..=1.0).contains(&fit), "{category} {fit}");
            }
        }
    }
}
