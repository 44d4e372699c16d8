//! `TravelCostProvider` over OSRM's Table API.
//!
//! The trait is synchronous so the engine stays embeddable in synchronous
//! callers. The provider bridges to async HTTP by blocking on a Tokio
//! runtime it owns, or on the caller's multi-threaded runtime when there is
//! one.

use std::time::Duration;

use geo::Coord;
use reqwest::Client;
use roam_core::{TravelCost, TravelCostError, TravelCostMatrix, TravelCostProvider, TravelMode};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::osrm::TableResponse;

/// Failure to construct an [`HttpTravelCostProvider`].
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The base URL does not parse.
    #[error("invalid OSRM base URL {url:?}: {source}")]
    BaseUrl {
        /// Offending URL.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The Tokio runtime could not be built.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "roam-routing/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpTravelCostProvider`].
#[derive(Debug, Clone)]
pub struct HttpTravelCostProviderConfig {
    /// Base URL of the OSRM service, e.g. `"http://localhost:5000"`.
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpTravelCostProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTravelCostProviderConfig {
    /// Configuration for `base_url` with default timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Travel costs from an OSRM Table service.
///
/// Pairs OSRM cannot route come back as infinite distance with
/// [`Duration::MAX`]; the route optimizer treats such matrices as unusable
/// and falls back accordingly.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime, and inside a `current_thread` runtime, the
/// provider blocks on its own runtime. Inside a multi-threaded runtime it
/// uses [`tokio::task::block_in_place`] on the caller's handle.
pub struct HttpTravelCostProvider {
    client: Client,
    config: HttpTravelCostProviderConfig,
    base: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpTravelCostProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTravelCostProvider")
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpTravelCostProvider {
    /// Create a provider for `base_url` with default settings.
    ///
    /// # Errors
    /// See [`HttpTravelCostProvider::with_config`].
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpTravelCostProviderConfig::new(base_url))
    }

    /// Create a provider from explicit configuration.
    ///
    /// # Errors
    /// Returns [`ProviderBuildError`] when the base URL is invalid or the
    /// HTTP client or runtime cannot be built.
    pub fn with_config(config: HttpTravelCostProviderConfig) -> Result<Self, ProviderBuildError> {
        let base = parse_base(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            base,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpTravelCostProviderConfig {
        &self.config
    }

    /// Table API URL for `points` under `mode`.
    ///
    /// The path is `table/v1/{profile}/{lon,lat;...}` relative to the base
    /// URL, with distance and duration annotations requested.
    fn table_url(&self, points: &[Coord<f64>], mode: TravelMode) -> Result<Url, TravelCostError> {
        let coords = points
            .iter()
            .map(|point| format!("{},{}", point.x, point.y))
            .collect::<Vec<_>>()
            .join(";");
        let mut url = self
            .base
            .join(&format!("table/v1/{}/{coords}", mode.as_str()))
            .map_err(|err| TravelCostError::InvalidResponse {
                message: format!("cannot build table URL: {err}"),
            })?;
        url.set_query(Some("annotations=duration,distance"));
        Ok(url)
    }

    async fn fetch(&self, url: Url, size: usize) -> Result<TravelCostMatrix, TravelCostError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.unavailable(&err, &url))?;
        let table: TableResponse =
            response
                .json()
                .await
                .map_err(|err| TravelCostError::InvalidResponse {
                    message: err.to_string(),
                })?;
        convert(table, size)
    }

    fn unavailable(&self, error: &reqwest::Error, url: &Url) -> TravelCostError {
        let message = if error.is_timeout() {
            format!(
                "{url} timed out after {}s",
                self.config.timeout.as_secs()
            )
        } else if let Some(status) = error.status() {
            format!("{url} answered HTTP {}", status.as_u16())
        } else {
            format!("{url}: {error}")
        };
        TravelCostError::Unavailable { message }
    }
}

impl TravelCostProvider for HttpTravelCostProvider {
    fn cost_matrix(
        &self,
        points: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<TravelCostMatrix, TravelCostError> {
        if points.is_empty() {
            return Err(TravelCostError::EmptyInput);
        }
        let url = self.table_url(points, mode)?;
        log::debug!("requesting {}x{} {mode:?} matrix", points.len(), points.len());
        let future = self.fetch(url, points.len());
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

/// Parse `raw` so that relative joins append to its path.
fn parse_base(raw: &str) -> Result<Url, ProviderBuildError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|source| ProviderBuildError::BaseUrl {
        url: raw.to_owned(),
        source,
    })
}

/// Zip OSRM's duration and distance tables into a cost matrix.
fn convert(table: TableResponse, size: usize) -> Result<TravelCostMatrix, TravelCostError> {
    if !table.is_ok() {
        return Err(TravelCostError::InvalidResponse {
            message: format!(
                "{}: {}",
                table.code,
                table.message.unwrap_or_default()
            ),
        });
    }
    let durations = table.durations.ok_or_else(|| missing("durations"))?;
    let distances = table.distances.ok_or_else(|| missing("distances"))?;
    if durations.len() != size || distances.len() != size {
        return Err(TravelCostError::InvalidResponse {
            message: format!("expected {size} rows from OSRM"),
        });
    }
    durations
        .into_iter()
        .zip(distances)
        .map(|(duration_row, distance_row)| {
            if duration_row.len() != size || distance_row.len() != size {
                return Err(TravelCostError::InvalidResponse {
                    message: format!("expected {size} columns from OSRM"),
                });
            }
            Ok(duration_row
                .into_iter()
                .zip(distance_row)
                .map(|(duration, distance)| cell(duration, distance))
                .collect())
        })
        .collect()
}

fn cell(duration: Option<f64>, distance: Option<f64>) -> TravelCost {
    let usable = |value: Option<f64>| value.filter(|v| v.is_finite() && *v >= 0.0);
    let duration = usable(duration).and_then(|seconds| Duration::try_from_secs_f64(seconds).ok());
    match (duration, usable(distance)) {
        (Some(duration), Some(metres)) => TravelCost {
            distance_m: metres,
            duration,
        },
        _ => TravelCost {
            distance_m: f64::INFINITY,
            duration: Duration::MAX,
        },
    }
}

fn missing(annotation: &str) -> TravelCostError {
    TravelCostError::InvalidResponse {
        message: format!("OSRM response missing {annotation}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn provider(base: &str) -> HttpTravelCostProvider {
        HttpTravelCostProvider::new(base).unwrap_or_else(|err| panic!("provider should build: {err}"))
    }

    fn points() -> Vec<Coord<f64>> {
        vec![Coord { x: -0.1, y: 51.5 }, Coord { x: -0.2, y: 51.6 }]
    }

    fn table(code: &str) -> TableResponse {
        TableResponse {
            code: code.to_owned(),
            message: None,
            durations: Some(vec![vec![Some(0.0), Some(120.5)], vec![Some(118.0), Some(0.0)]]),
            distances: Some(vec![vec![Some(0.0), Some(160.0)], vec![Some(155.0), Some(0.0)]]),
        }
    }

    #[rstest]
    #[case("http://osrm.example.com", TravelMode::Walking)]
    #[case("http://osrm.example.com/", TravelMode::Walking)]
    #[case("http://osrm.example.com", TravelMode::Driving)]
    fn table_url_lists_coordinates(#[case] base: &str, #[case] mode: TravelMode) {
        let url = provider(base)
            .table_url(&points(), mode)
            .unwrap_or_else(|err| panic!("url should build: {err}"));
        assert_eq!(
            url.as_str(),
            format!(
                "http://osrm.example.com/table/v1/{}/-0.1,51.5;-0.2,51.6?annotations=duration,distance",
                mode.as_str()
            )
        );
    }

    #[rstest]
    fn table_url_keeps_a_base_path() {
        let url = provider("http://example.com/osrm")
            .table_url(&points(), TravelMode::Walking)
            .unwrap_or_else(|err| panic!("url should build: {err}"));
        assert!(url.path().starts_with("/osrm/table/v1/walking/"));
    }

    #[rstest]
    fn invalid_base_urls_are_rejected() {
        assert!(matches!(
            HttpTravelCostProvider::new("not a url"),
            Err(ProviderBuildError::BaseUrl { .. })
        ));
    }

    #[rstest]
    fn successful_tables_zip_annotations() {
        let matrix = convert(table("Ok"), 2).unwrap_or_default();
        let edge = matrix.first().and_then(|row| row.get(1)).copied();
        assert_eq!(
            edge,
            Some(TravelCost {
                distance_m: 160.0,
                duration: Duration::from_secs_f64(120.5),
            })
        );
        assert_eq!(matrix.get(1).and_then(|row| row.get(1)).copied(), Some(TravelCost::ZERO));
    }

    #[rstest]
    #[case(Some(f64::NAN), Some(10.0))]
    #[case(Some(-1.0), Some(10.0))]
    #[case(None, Some(10.0))]
    #[case(Some(10.0), None)]
    #[case(Some(10.0), Some(f64::INFINITY))]
    fn unroutable_cells_are_infinite(#[case] duration: Option<f64>, #[case] distance: Option<f64>) {
        let cost = cell(duration, distance);
        assert!(cost.distance_m.is_infinite());
        assert_eq!(cost.duration, Duration::MAX);
    }

    #[rstest]
    fn service_errors_are_reported() {
        let mut response = table("NoTable");
        response.message = Some("Too many coordinates".to_owned());
        assert_eq!(
            convert(response, 2),
            Err(TravelCostError::InvalidResponse {
                message: "NoTable: Too many coordinates".to_owned(),
            })
        );
    }

    #[rstest]
    fn missing_or_misshapen_tables_are_rejected() {
        let mut response = table("Ok");
        response.distances = None;
        assert!(matches!(
            convert(response, 2),
            Err(TravelCostError::InvalidResponse { .. })
        ));
        assert!(matches!(
            convert(table("Ok"), 3),
            Err(TravelCostError::InvalidResponse { .. })
        ));
    }

    #[rstest]
    fn empty_input_is_rejected_without_a_request() {
        assert_eq!(
            provider("http://localhost:5000").cost_matrix(&[], TravelMode::Walking),
            Err(TravelCostError::EmptyInput)
        );
    }
}
