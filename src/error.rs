use crate::stations::error::ResolveStationError;
use crate::weather_data::error::WeatherDataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmhiError {
    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error(transparent)]
    ResolveStation(#[from] ResolveStationError),

    #[error("Failed to build table")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("No station found for city: {city}")]
    StationNotFound { city: String },

    #[error("No temperature data available for {city} (station {station_id})")]
    EmptySeries { city: String, station_id: i64 },

    #[error("No temperature data available for any of: {}", .0.join(", "))]
    NoDataForCities(Vec<String>),

    #[error("Search query must be at least {min} characters long, got '{query}'")]
    QueryTooShort { query: String, min: usize },
}

impl SmhiError {
    /// True for the "nothing to show" outcomes, as opposed to broken transport.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            SmhiError::StationNotFound { .. }
                | SmhiError::EmptySeries { .. }
                | SmhiError::NoDataForCities(_)
                | SmhiError::ResolveStation(ResolveStationError::NotFound(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_message_names_cities() {
        let err = SmhiError::NoDataForCities(vec!["Malmö".to_string(), "Umeå".to_string()]);
        assert_eq!(
            err.to_string(),
            "No temperature data available for any of: Malmö, Umeå"
        );
        assert!(err.is_no_data());
    }

    #[test]
    fn test_query_too_short_is_not_no_data() {
        let err = SmhiError::QueryTooShort {
            query: "a".to_string(),
            min: 2,
        };
        assert!(!err.is_no_data());
    }
}
