use crate::stations::directory::StationDirectory;
use crate::stations::error::ResolveStationError;
use crate::types::station::{ResolvedStation, Station};
use log::debug;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Maps city names to SMHI stations: curated table first, then the directory.
#[derive(Clone)]
pub struct StationResolver {
    directory: Arc<dyn StationDirectory>,
    curated: Vec<(String, i64)>,
}

impl StationResolver {
    pub fn new(directory: Arc<dyn StationDirectory>, curated: Vec<(String, i64)>) -> Self {
        Self { directory, curated }
    }

    /// Case-sensitive lookup in the curated table.
    pub fn curated_id(&self, city: &str) -> Option<i64> {
        self.curated
            .iter()
            .find(|(name, _)| name == city)
            .map(|(_, id)| *id)
    }

    /// Resolves a city name. Surrounding whitespace is ignored; a blank name
    /// never matches.
    pub async fn resolve(&self, city: &str) -> Result<ResolvedStation, ResolveStationError> {
        self.resolve_with(city, &OnceCell::new()).await
    }

    /// Like [`StationResolver::resolve`], but reads the directory through
    /// `directory` so several lookups of one request download it at most once.
    pub(crate) async fn resolve_with(
        &self,
        city: &str,
        directory: &OnceCell<Vec<Station>>,
    ) -> Result<ResolvedStation, ResolveStationError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ResolveStationError::NotFound(city.to_string()));
        }
        if let Some(id) = self.curated_id(city) {
            debug!("'{}' resolved from curated table to station {}", city, id);
            return Ok(ResolvedStation {
                id,
                name: city.to_string(),
                station: None,
            });
        }

        let stations = directory
            .get_or_try_init(|| self.directory.stations())
            .await?;
        find_station(stations, city)
            .cloned()
            .map(ResolvedStation::from)
            .ok_or_else(|| ResolveStationError::NotFound(city.to_string()))
    }

    /// Active stations matching `query`, exact matches first. Never consults the curated table.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Station>, ResolveStationError> {
        let stations = self.directory.stations().await?;
        Ok(search_stations(&stations, query, limit)
            .into_iter()
            .cloned()
            .collect())
    }
}

fn is_exact(station: &Station, needle: &str) -> bool {
    station.active && station.name.to_lowercase() == needle
}

fn is_partial(station: &Station, needle: &str) -> bool {
    station.active && station.name.to_lowercase().contains(needle)
}

/// Exact case-insensitive name match among active stations, falling back to
/// the first active station whose name contains `name`.
pub fn find_station<'a>(stations: &'a [Station], name: &str) -> Option<&'a Station> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Some(station) = stations.iter().find(|s| is_exact(s, &needle)) {
        debug!("'{}' matched station {} exactly", name, station.id);
        return Some(station);
    }
    let station = stations.iter().find(|s| is_partial(s, &needle));
    match station {
        Some(station) => debug!("'{}' matched station {} by substring", name, station.id),
        None => debug!(
            "'{}' matched none of {} directory stations",
            name,
            stations.len()
        ),
    }
    station
}

/// Exact matches, then substring matches, each in directory order, truncated to `limit`.
pub fn search_stations<'a>(stations: &'a [Station], query: &str, limit: usize) -> Vec<&'a Station> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let exact = stations.iter().filter(|s| is_exact(s, &needle));
    let partial = stations
        .iter()
        .filter(|s| is_partial(s, &needle) && !is_exact(s, &needle));
    exact.chain(partial).take(limit).collect()
}
