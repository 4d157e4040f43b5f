use crate::types::observation::{Observation, QualityFlag};
use crate::types::source::Source;
use crate::weather_data::downloader::Downloader;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::fetcher::{within_recent_window, SeriesFetch, SeriesFetcher};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RecentDocument {
    #[serde(default)]
    value: Vec<Value>,
}

/// Latest-months JSON feed, trimmed to the trailing 365 days.
#[derive(Debug, Clone)]
pub struct RecentJsonFetcher {
    downloader: Downloader,
    timeout: Duration,
}

impl RecentJsonFetcher {
    pub fn new(downloader: Downloader, timeout: Duration) -> Self {
        Self {
            downloader,
            timeout,
        }
    }
}

#[async_trait]
impl SeriesFetcher for RecentJsonFetcher {
    fn source(&self) -> Source {
        Source::RecentJson
    }

    async fn fetch(&self, station_id: i64) -> Result<SeriesFetch, WeatherDataError> {
        let body = self
            .downloader
            .download(Source::RecentJson, station_id, self.timeout)
            .await?;
        parse_recent_json(&body, station_id, Utc::now().naive_utc())
    }
}

/// Parses a recent-observations document. Entries outside `[now - 365d, now]`
/// and entries without a usable date or value are dropped one by one.
pub fn parse_recent_json(
    body: &str,
    station_id: i64,
    now: NaiveDateTime,
) -> Result<SeriesFetch, WeatherDataError> {
    let document: RecentDocument =
        serde_json::from_str(body).map_err(|e| WeatherDataError::JsonParse {
            station: station_id,
            source: e,
        })?;
    let rows_in = document.value.len();

    let observations: Vec<Observation> = document
        .value
        .iter()
        .filter_map(parse_entry)
        .filter(|obs| within_recent_window(&obs.time, &now))
        .collect();

    debug!(
        "{} station {}: {} rows in, {} rows out",
        Source::RecentJson,
        station_id,
        rows_in,
        observations.len()
    );
    Ok(SeriesFetch::from_rows(observations))
}

fn parse_entry(entry: &Value) -> Option<Observation> {
    let time = entry
        .get("date")
        .and_then(Value::as_i64)
        .and_then(DateTime::from_timestamp_millis)?
        .naive_utc();
    let temperature = match entry.get("value")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|t| t.is_finite())?;
    let quality = entry
        .get("quality")
        .and_then(Value::as_str)
        .and_then(QualityFlag::parse);

    Some(Observation {
        time,
        temperature: Some(temperature),
        quality,
    })
}
