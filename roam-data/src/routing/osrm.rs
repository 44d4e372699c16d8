//! Response types for the OSRM Table service.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#table-service>

use serde::Deserialize;

/// OSRM Table API response.
///
/// Successful responses carry a matrix per requested annotation; failures
/// carry a `code` other than `"Ok"` and usually a message.
#[derive(Debug, Deserialize)]
pub(crate) struct TableResponse {
    /// Status code such as `"Ok"`, `"InvalidQuery"` or `"NoTable"`.
    pub code: String,
    /// Error description when `code` is not `"Ok"`.
    pub message: Option<String>,
    /// Travel times in seconds; `null` where no route exists.
    pub durations: Option<Vec<Vec<Option<f64>>>>,
    /// Travel distances in metres; `null` where no route exists.
    pub distances: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    pub(crate) fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}
