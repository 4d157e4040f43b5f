//! Client configuration. Everything has a default; nothing is read from the
//! environment or from files.

use crate::types::source::Source;
use bon::Builder;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://opendata-download-metobs.smhi.se/api/version/latest";

/// Curated city table. Lookups against it are case-sensitive.
pub const MAJOR_CITIES: [(&str, i64); 5] = [
    ("Stockholm", 97400), // Stockholm-Observatoriekullen
    ("Göteborg", 72420),  // Göteborg A
    ("Malmö", 53430),     // Malmö A
    ("Uppsala", 97510),   // Uppsala Aut
    ("Umeå", 140480),     // Umeå flygplats
];

/// Settings for [`crate::Smhi`].
///
/// # Examples
///
/// ```
/// use smhi_temps::{SmhiConfig, Source};
/// use std::time::Duration;
///
/// let config = SmhiConfig::builder()
///     .csv_timeout(Duration::from_secs(60))
///     .sources(vec![Source::RecentJson, Source::MonthlyCsv])
///     .build();
/// assert_eq!(config.json_timeout, Duration::from_secs(10));
/// assert_eq!(config.cities.len(), 5);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct SmhiConfig {
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub base_url: String,
    /// Timeout for JSON documents (station directory, recent observations).
    #[builder(default = Duration::from_secs(10))]
    pub json_timeout: Duration,
    /// Timeout for CSV documents, which can be a lot larger.
    #[builder(default = Duration::from_secs(30))]
    pub csv_timeout: Duration,
    /// Sources fetched per city. Their series are concatenated before aggregation.
    #[builder(default = vec![Source::RecentJson])]
    pub sources: Vec<Source>,
    /// Curated city table, in the order multi-city requests report them.
    #[builder(default = default_cities())]
    pub cities: Vec<(String, i64)>,
}

impl Default for SmhiConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_cities() -> Vec<(String, i64)> {
    MAJOR_CITIES
        .iter()
        .map(|(name, id)| (name.to_string(), *id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SmhiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.csv_timeout, Duration::from_secs(30));
        assert_eq!(config.sources, vec![Source::RecentJson]);
        assert_eq!(config.cities[0], ("Stockholm".to_string(), 97400));
        assert_eq!(config.cities[4], ("Umeå".to_string(), 140480));
    }

    #[test]
    fn test_overrides() {
        let config = SmhiConfig::builder()
            .base_url("http://localhost:8080")
            .cities(vec![("Kiruna".to_string(), 180940)])
            .build();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.cities.len(), 1);
        assert_eq!(config.json_timeout, Duration::from_secs(10));
    }
}
