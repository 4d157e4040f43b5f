//! Entry point of the crate: resolves city names to SMHI stations, fetches
//! their air-temperature series and reduces them to monthly means, for one
//! city or for several cities side by side.

use crate::aggregate::monthly_means;
use crate::combine::combine;
use crate::config::SmhiConfig;
use crate::error::SmhiError;
use crate::normalize::normalize;
use crate::stations::directory::HttpStationDirectory;
use crate::stations::error::ResolveStationError;
use crate::stations::resolve_station::{StationResolver, DEFAULT_SEARCH_LIMIT};
use crate::types::comparison::{CityComparison, CityFailure, CityTemperature};
use crate::types::monthly::MonthlyMeans;
use crate::types::observation::{CanonicalSeries, RawSeries};
use crate::types::source::Source;
use crate::types::station::{ResolvedStation, Station};
use crate::weather_data::downloader::Downloader;
use crate::weather_data::fetcher::{SeriesFetch, SeriesFetcher};
use crate::weather_data::historical_csv::HistoricalCsvFetcher;
use crate::weather_data::monthly_csv::MonthlyCsvFetcher;
use crate::weather_data::recent_json::RecentJsonFetcher;
use bon::bon;
use futures_util::future::join_all;
use log::{debug, info, warn};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Shortest query accepted by [`Smhi::search_stations`].
pub const MIN_QUERY_CHARS: usize = 2;

/// The client for SMHI air-temperature data.
///
/// Every call is self-contained: the station directory and the observation
/// documents are downloaded per request and nothing is cached between calls.
///
/// # Examples
///
/// ```no_run
/// # use smhi_temps::{Smhi, SmhiError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), SmhiError> {
/// let smhi = Smhi::new()?;
/// let stockholm = smhi.city_temperature().city("Stockholm").call().await?;
/// for mean in &stockholm.monthly_means {
///     println!("{}: {:.2} °C", mean.month, mean.temperature);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Smhi {
    resolver: StationResolver,
    fetchers: Vec<Arc<dyn SeriesFetcher>>,
    sources: Vec<Source>,
    cities: Vec<String>,
}

#[bon]
impl Smhi {
    /// Creates a client against the public SMHI API with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`SmhiError::HttpClient`] if the HTTP client cannot be initialised.
    pub fn new() -> Result<Self, SmhiError> {
        Self::with_config(SmhiConfig::default())
    }

    /// Creates a client from a custom [`SmhiConfig`].
    ///
    /// All three sources are wired up; `config.sources` only picks the ones
    /// used when a request does not name its own.
    pub fn with_config(config: SmhiConfig) -> Result<Self, SmhiError> {
        let client = Client::builder().build().map_err(SmhiError::HttpClient)?;
        let downloader = Downloader::new(client.clone(), &config.base_url);
        let fetchers = [Source::RecentJson, Source::HistoricalCsv, Source::MonthlyCsv]
            .into_iter()
            .map(|source| {
                let timeout = source.timeout(config.json_timeout, config.csv_timeout);
                http_fetcher(source, downloader.clone(), timeout)
            })
            .collect();
        let directory =
            HttpStationDirectory::new(client, &config.base_url, config.json_timeout);

        Ok(Self {
            resolver: StationResolver::new(Arc::new(directory), config.cities.clone()),
            fetchers,
            sources: config.sources,
            cities: config.cities.into_iter().map(|(name, _)| name).collect(),
        })
    }

    /// Assembles a client from its parts, e.g. an in-memory station directory
    /// or custom fetchers. Every given fetcher is used by default.
    pub fn from_parts(
        resolver: StationResolver,
        fetchers: Vec<Arc<dyn SeriesFetcher>>,
        cities: Vec<String>,
    ) -> Self {
        let sources = fetchers.iter().map(|f| f.source()).collect();
        Self {
            resolver,
            fetchers,
            sources,
            cities,
        }
    }

    /// Cities used by [`Smhi::compare_cities`] when none are given.
    pub fn default_cities(&self) -> &[String] {
        &self.cities
    }

    /// Resolves a city name to a station: curated table first, then an exact
    /// and then a substring match against the active stations in the directory.
    ///
    /// # Errors
    ///
    /// Returns [`SmhiError::StationNotFound`] if no active station matches, or
    /// [`SmhiError::ResolveStation`] if the directory could not be fetched.
    pub async fn resolve_station(&self, city: &str) -> Result<ResolvedStation, SmhiError> {
        self.resolve_shared(city, &OnceCell::new()).await
    }

    async fn resolve_shared(
        &self,
        city: &str,
        directory: &OnceCell<Vec<Station>>,
    ) -> Result<ResolvedStation, SmhiError> {
        self.resolver
            .resolve_with(city, directory)
            .await
            .map_err(|e| match e {
                ResolveStationError::NotFound(_) => SmhiError::StationNotFound {
                    city: city.to_string(),
                },
                other => SmhiError::ResolveStation(other),
            })
    }

    /// Searches the active stations by name. Exact (case-insensitive) matches
    /// come first, then substring matches, each in directory order.
    ///
    /// # Arguments
    ///
    /// * `.query(&str)`: **Required.** At least two characters.
    /// * `.limit(usize)`: Optional. Maximum number of stations. Defaults to `10`.
    ///
    /// # Errors
    ///
    /// Returns [`SmhiError::QueryTooShort`] for queries under two characters, or
    /// [`SmhiError::ResolveStation`] if the directory could not be fetched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use smhi_temps::{Smhi, SmhiError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), SmhiError> {
    /// let smhi = Smhi::new()?;
    /// let stations = smhi.search_stations().query("Lund").limit(3).call().await?;
    /// assert!(stations.len() <= 3);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn search_stations(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Station>, SmhiError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(SmhiError::QueryTooShort {
                query: query.to_string(),
                min: MIN_QUERY_CHARS,
            });
        }
        let stations = self
            .resolver
            .search(query, limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
            .await?;
        debug!("Search for '{}' returned {} stations", query, stations.len());
        Ok(stations)
    }

    /// Monthly mean temperatures for one city.
    ///
    /// The configured sources are fetched concurrently and their series are
    /// concatenated before aggregation. A source that fails or has no rows is
    /// skipped; the city only fails when no source yields any data.
    ///
    /// # Arguments
    ///
    /// * `.city(&str)`: **Required.** City or station name.
    /// * `.sources(Vec<Source>)`: Optional. Sources to read. Defaults to the configured sources.
    ///
    /// # Errors
    ///
    /// * [`SmhiError::StationNotFound`] if the name matches no active station.
    /// * [`SmhiError::EmptySeries`] if no source yielded a temperature.
    /// * [`SmhiError::ResolveStation`] if the station directory could not be fetched.
    #[builder]
    pub async fn city_temperature(
        &self,
        city: &str,
        sources: Option<Vec<Source>>,
    ) -> Result<CityTemperature, SmhiError> {
        let sources = sources.unwrap_or_else(|| self.sources.clone());
        self.temperature_for(city, &sources, &OnceCell::new()).await
    }

    /// Monthly means for several cities, fetched concurrently, plus the
    /// combined cross-city table.
    ///
    /// Cities are reported in request order, with repeated names collapsed to
    /// their first occurrence. Cities that fail are listed in
    /// [`CityComparison::failures`] and left out of the table; they never abort
    /// the others. The station directory is downloaded at most once per call.
    ///
    /// # Arguments
    ///
    /// * `.cities(Vec<String>)`: Optional. Defaults to the curated major cities.
    /// * `.sources(Vec<Source>)`: Optional. Defaults to the configured sources.
    ///
    /// # Errors
    ///
    /// Returns [`SmhiError::NoDataForCities`] naming every requested city when
    /// none of them yielded data.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use smhi_temps::{Smhi, SmhiError, Source};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), SmhiError> {
    /// let smhi = Smhi::new()?;
    /// let comparison = smhi
    ///     .compare_cities()
    ///     .cities(vec!["Stockholm".to_string(), "Kiruna".to_string()])
    ///     .sources(vec![Source::RecentJson, Source::MonthlyCsv])
    ///     .call()
    ///     .await?;
    /// println!("{}", comparison.table.to_dataframe()?);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn compare_cities(
        &self,
        cities: Option<Vec<String>>,
        sources: Option<Vec<Source>>,
    ) -> Result<CityComparison, SmhiError> {
        let mut cities = cities.unwrap_or_else(|| self.cities.clone());
        let mut seen = HashSet::new();
        cities.retain(|city| seen.insert(city.clone()));
        let sources = sources.unwrap_or_else(|| self.sources.clone());
        let sources = &sources;
        let directory = &OnceCell::new();

        let results = join_all(cities.iter().map(|city| async move {
            (city, self.temperature_for(city, sources, directory).await)
        }))
        .await;

        let mut found = Vec::new();
        let mut failures = Vec::new();
        for (city, result) in results {
            match result {
                Ok(temperature) => found.push(temperature),
                Err(e) => {
                    warn!("No data for {}: {}", city, e);
                    failures.push(CityFailure::new(city.clone(), e));
                }
            }
        }

        if found.is_empty() {
            return Err(SmhiError::NoDataForCities(cities));
        }
        info!(
            "Compared {} cities ({} without data)",
            found.len(),
            failures.len()
        );

        let means: Vec<(String, MonthlyMeans)> = found
            .iter()
            .map(|temperature| (temperature.city.clone(), temperature.monthly_means.clone()))
            .collect();
        Ok(CityComparison {
            table: combine(&means),
            cities: found,
            failures,
        })
    }

    /// [`Smhi::compare_cities`] over the curated major cities with the configured sources.
    pub async fn compare_major_cities(&self) -> Result<CityComparison, SmhiError> {
        self.compare_cities().call().await
    }

    async fn temperature_for(
        &self,
        city: &str,
        sources: &[Source],
        directory: &OnceCell<Vec<Station>>,
    ) -> Result<CityTemperature, SmhiError> {
        let station = self.resolve_shared(city, directory).await?;
        let series = self.fetch_series(station.id, sources).await;
        let monthly_means = monthly_means(&series);
        if monthly_means.is_empty() {
            return Err(SmhiError::EmptySeries {
                city: city.to_string(),
                station_id: station.id,
            });
        }
        info!(
            "{}: {} monthly means from station {} ({})",
            city,
            monthly_means.len(),
            station.id,
            station.name
        );
        Ok(CityTemperature {
            city: city.to_string(),
            station_id: station.id,
            station_name: station.name,
            monthly_means,
        })
    }

    /// Concatenated series of every requested source. Failing sources are logged and skipped.
    async fn fetch_series(&self, station_id: i64, sources: &[Source]) -> CanonicalSeries {
        let selected: Vec<&Arc<dyn SeriesFetcher>> = self
            .fetchers
            .iter()
            .filter(|fetcher| sources.contains(&fetcher.source()))
            .collect();
        if selected.is_empty() {
            warn!("No fetcher configured for sources {:?}", sources);
        }

        let results = join_all(selected.iter().map(|fetcher| fetcher.fetch(station_id))).await;

        let mut series = CanonicalSeries::default();
        for (fetcher, result) in selected.iter().zip(results) {
            match result {
                Ok(SeriesFetch::Series(observations)) => {
                    series.extend(normalize(RawSeries::Canonical(observations)));
                }
                Ok(SeriesFetch::Empty(reason)) => {
                    info!(
                        "{} station {}: no data ({})",
                        fetcher.source(),
                        station_id,
                        reason
                    );
                }
                Err(e) => {
                    warn!("{} station {} failed: {}", fetcher.source(), station_id, e);
                }
            }
        }
        series
    }
}

fn http_fetcher(
    source: Source,
    downloader: Downloader,
    timeout: Duration,
) -> Arc<dyn SeriesFetcher> {
    match source {
        Source::RecentJson => Arc::new(RecentJsonFetcher::new(downloader, timeout)),
        Source::HistoricalCsv => Arc::new(HistoricalCsvFetcher::new(downloader, timeout)),
        Source::MonthlyCsv => Arc::new(MonthlyCsvFetcher::new(downloader, timeout)),
    }
}
