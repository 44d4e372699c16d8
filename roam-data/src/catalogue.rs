//! A place catalogue read from a JSON file.
//!
//! The file holds an array of [`Place`] objects:
//!
//! ```json
//! [
//!   {
//!     "id": "louvre",
//!     "name": "Musée du Louvre",
//!     "category": "museum",
//!     "location": { "x": 2.3376, "y": 48.8606 },
//!     "rating": 4.7,
//!     "review_count": 250000
//!   }
//! ]
//! ```

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use geo::Coord;
use roam_core::{Place, PlaceQuery, PlaceSearch, SearchError, category, haversine_m};
use thiserror::Error;

/// Failure to load a [`JsonPlaceCatalogue`].
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// The file could not be opened.
    #[error("failed to open catalogue {path}: {source}")]
    Open {
        /// Catalogue path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a JSON array of places.
    #[error("failed to parse catalogue {path}: {source}")]
    Parse {
        /// Catalogue path.
        path: Utf8PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory catalogue searched by haversine radius.
///
/// A search keeps places within the query radius, narrows them by the
/// category hint when one is given and returns the nearest first, up to the
/// query limit. A hint matches a place when it equals the normalised
/// category or names the category's dominant interest, so `"food"` finds
/// restaurants and cafés alike.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roam_core::{Place, PlaceQuery, PlaceSearch};
/// use roam_data::JsonPlaceCatalogue;
///
/// let catalogue = JsonPlaceCatalogue::from_places(vec![
///     Place::new("cafe", "Cafe", "cafe", Coord { x: 0.001, y: 0.0 }),
///     Place::new("park", "Park", "park", Coord { x: 0.002, y: 0.0 }),
/// ]);
/// let query = PlaceQuery {
///     latitude: 0.0,
///     longitude: 0.0,
///     radius_m: 1_000.0,
///     category_hint: Some("food".into()),
///     limit: 10,
/// };
/// let found = catalogue.search(&query)?;
/// assert_eq!(found.len(), 1);
/// # Ok::<(), roam_core::SearchError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonPlaceCatalogue {
    places: Vec<Place>,
}

impl JsonPlaceCatalogue {
    /// Wrap an already-loaded list of places.
    #[must_use]
    pub const fn from_places(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// Load the catalogue at `path`.
    ///
    /// # Errors
    /// Returns [`CatalogueError::Open`] when the file cannot be read and
    /// [`CatalogueError::Parse`] when it is not an array of places.
    pub fn from_path(path: &Utf8Path) -> Result<Self, CatalogueError> {
        let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
            CatalogueError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let places: Vec<Place> =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                CatalogueError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        log::debug!("loaded {} places from {path}", places.len());
        Ok(Self { places })
    }

    /// Number of places held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Whether the catalogue holds no places.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl PlaceSearch for JsonPlaceCatalogue {
    fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, SearchError> {
        let centre = Coord {
            x: query.longitude,
            y: query.latitude,
        };
        let hint = query
            .category_hint
            .as_deref()
            .map(category::normalise_category)
            .filter(|hint| !hint.is_empty());
        let mut found: Vec<(f64, &Place)> = self
            .places
            .iter()
            .filter(|place| hint.as_deref().is_none_or(|hint| matches_hint(place, hint)))
            .map(|place| (haversine_m(centre, place.location), place))
            .filter(|(distance, _)| *distance <= query.radius_m)
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        Ok(found
            .into_iter()
            .take(query.limit)
            .map(|(_, place)| place.clone())
            .collect())
    }
}

fn matches_hint(place: &Place, hint: &str) -> bool {
    category::normalise_category(&place.category) == hint
        || category::dominant_interest(&place.category)
            .is_some_and(|interest| interest.as_str() == hint)
}
