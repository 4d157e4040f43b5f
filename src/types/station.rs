//! Data structures for SMHI weather stations as listed in the station directory
//! (`parameter/1.json`), plus the result of resolving a city name to a station.

use serde::{Deserialize, Serialize};

/// A single SMHI weather station.
///
/// Field names follow the camelCase keys of the SMHI station directory.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// The SMHI station identifier (e.g. `97400`).
    pub id: i64,
    /// Display name (e.g. "Stockholm-Observatoriekullen A").
    pub name: String,
    /// Organisation operating the station.
    #[serde(default)]
    pub owner: String,
    /// Owner category (e.g. "CLIMATE"), if reported.
    #[serde(default)]
    pub owner_category: Option<String>,
    /// Latitude in WGS84 decimal degrees.
    pub latitude: f64,
    /// Longitude in WGS84 decimal degrees.
    pub longitude: f64,
    /// Height above sea level in meters, if reported.
    #[serde(default)]
    pub height: Option<f64>,
    /// Whether the station currently reports data. Missing means inactive.
    #[serde(default)]
    pub active: bool,
}

/// The top-level station directory document. Only the station list is used.
#[derive(Debug, Deserialize)]
pub(crate) struct StationDirectoryDocument {
    #[serde(default)]
    pub station: Vec<Station>,
}

/// Outcome of resolving a city name.
///
/// `station` holds the full directory entry when the name was found by searching
/// the directory. It is `None` when the name came from the curated city table, in
/// which case `name` is the city name as given.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ResolvedStation {
    pub id: i64,
    pub name: String,
    pub station: Option<Station>,
}

impl From<Station> for ResolvedStation {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            name: station.name.clone(),
            station: Some(station),
        }
    }
}
