//! Map free-form place categories onto interest dimensions.
//!
//! The mapping is a static table: each recognised category contributes one to
//! three [`Interest`] dimensions with independent weights. Unknown categories
//! map to an empty vector rather than an error so callers can fall back to
//! neutral scores.
//!
//! # Examples
//! ```
//! use roam_core::{Interest, category};
//!
//! let vector = category::map_to_interests("Art Gallery");
//! assert_eq!(vector.weight(Interest::Art), Some(1.0));
//! assert_eq!(category::dominant_interest("art-gallery"), Some(Interest::Art));
//! assert!(category::map_to_interests("spaceport").is_empty());
//! ```

use crate::{Interest, InterestVector};

/// Categories accepted by the food-only intent filter.
pub const FOOD_CATEGORIES: &[&str] = &[
    "food",
    "restaurant",
    "cafe",
    "coffee_shop",
    "bakery",
    "fast_food",
    "bistro",
    "diner",
    "food_court",
    "ice_cream",
    "dessert",
];

/// Normalise a raw category label for table lookups.
///
/// Whitespace is trimmed, letters are lowercased and interior spaces or
/// hyphens become underscores.
///
/// # Examples
/// ```
/// use roam_core::category::normalise_category;
///
/// assert_eq!(normalise_category("  Coffee-Shop "), "coffee_shop");
/// ```
#[must_use]
pub fn normalise_category(category: &str) -> String {
    category
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn table(normalised: &str) -> &'static [(Interest, f64)] {
    use Interest::{Art, Culture, Food, Nature, Nightlife, Shopping, Sports, Wellness};

    match normalised {
        "food" | "restaurant" | "bistro" | "diner" | "food_court" => &[(Food, 1.0)],
        "fast_food" | "bakery" | "ice_cream" | "dessert" => &[(Food, 0.9)],
        "cafe" | "coffee_shop" => &[(Food, 0.8), (Culture, 0.2)],
        "bar" => &[(Nightlife, 0.9), (Food, 0.3)],
        "pub" => &[(Nightlife, 0.8), (Food, 0.4)],
        "nightclub" | "nightlife" => &[(Nightlife, 1.0)],
        "museum" => &[(Culture, 1.0), (Art, 0.5)],
        "culture" | "historic" | "monument" | "landmark" => &[(Culture, 0.9)],
        "library" => &[(Culture, 0.8)],
        "gallery" | "art_gallery" => &[(Art, 1.0), (Culture, 0.5)],
        "art" | "street_art" => &[(Art, 1.0)],
        "theatre" | "theater" => &[(Culture, 0.8), (Art, 0.6), (Nightlife, 0.3)],
        "cinema" => &[(Culture, 0.5), (Art, 0.4), (Nightlife, 0.4)],
        "park" => &[(Nature, 1.0), (Sports, 0.3)],
        "nature" | "garden" => &[(Nature, 0.9)],
        "beach" => &[(Nature, 0.8), (Sports, 0.3), (Wellness, 0.2)],
        "viewpoint" => &[(Nature, 0.8), (Culture, 0.2)],
        "zoo" => &[(Nature, 0.7), (Culture, 0.3)],
        "aquarium" => &[(Nature, 0.6), (Culture, 0.4)],
        "shopping" | "mall" | "boutique" => &[(Shopping, 1.0)],
        "market" => &[(Shopping, 0.7), (Food, 0.5)],
        "spa" | "wellness" => &[(Wellness, 1.0)],
        "yoga" => &[(Wellness, 0.9), (Sports, 0.3)],
        "gym" => &[(Sports, 0.9), (Wellness, 0.4)],
        "stadium" => &[(Sports, 1.0), (Nightlife, 0.2)],
        "sports" | "climbing" | "swimming_pool" => &[(Sports, 1.0)],
        _ => &[],
    }
}

/// Map a category label onto weighted interest dimensions.
///
/// Pure and total: unknown or empty labels yield an empty vector.
#[must_use]
pub fn map_to_interests(category: &str) -> InterestVector {
    table(&normalise_category(category))
        .iter()
        .copied()
        .collect()
}

/// Return the highest-weighted interest for `category`.
///
/// Ties resolve to the dimension declared first in [`Interest::ALL`].
#[must_use]
pub fn dominant_interest(category: &str) -> Option<Interest> {
    map_to_interests(category).dominant()
}

/// Report whether `category` belongs to the food allow-list.
#[must_use]
pub fn is_food_category(category: &str) -> bool {
    let normalised = normalise_category(category);
    FOOD_CATEGORIES.contains(&normalised.as_str())
}
