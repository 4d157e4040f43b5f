use crate::types::observation::Observation;
use crate::types::source::Source;
use crate::weather_data::error::WeatherDataError;
use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeDelta};
use std::fmt;

/// Length of the trailing window kept by the latest-months fetchers.
pub const RECENT_WINDOW_DAYS: i64 = 365;

/// Why a fetch produced no observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The document was readable but no row survived parsing and filtering.
    NoRows,
    /// A CSV document had no recognisable header row.
    HeaderNotFound,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoRows => write!(f, "no usable rows"),
            EmptyReason::HeaderNotFound => write!(f, "header row not found"),
        }
    }
}

/// Outcome of a fetch that reached the source.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesFetch {
    Series(Vec<Observation>),
    Empty(EmptyReason),
}

impl SeriesFetch {
    pub(crate) fn from_rows(observations: Vec<Observation>) -> Self {
        if observations.is_empty() {
            SeriesFetch::Empty(EmptyReason::NoRows)
        } else {
            SeriesFetch::Series(observations)
        }
    }

    pub fn observations(self) -> Vec<Observation> {
        match self {
            SeriesFetch::Series(observations) => observations,
            SeriesFetch::Empty(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SeriesFetch::Empty(_))
    }
}

/// Common contract of the three retrieval variants.
///
/// `Ok(SeriesFetch::Empty(_))` means the source legitimately had nothing;
/// `Err(_)` means the source could not be read at all.
#[async_trait]
pub trait SeriesFetcher: Send + Sync {
    fn source(&self) -> Source;

    async fn fetch(&self, station_id: i64) -> Result<SeriesFetch, WeatherDataError>;
}

/// Inclusive `[now - 365 days, now]` check.
pub(crate) fn within_recent_window(time: &NaiveDateTime, now: &NaiveDateTime) -> bool {
    let start = *now - TimeDelta::days(RECENT_WINDOW_DAYS);
    start <= *time && time <= now
}
