use thiserror::Error;

/// Transport-level failures of a series fetch.
///
/// A fetch that succeeds but yields no usable rows is not an error; see
/// [`crate::SeriesFetch::Empty`].
#[derive(Debug, Error)]
pub enum WeatherDataError {
    // Also covers timeouts, see reqwest::Error::is_timeout
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON observations for station {station}")]
    JsonParse {
        station: i64,
        #[source]
        source: serde_json::Error,
    },

    // CSV parsing runs on the blocking pool
    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
