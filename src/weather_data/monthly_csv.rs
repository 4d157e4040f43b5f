use crate::types::observation::{Observation, QualityFlag};
use crate::types::source::Source;
use crate::weather_data::csv_layout::{
    data_rows, has_date_time_and_temperature_tokens, locate_header, parse_temperature,
    parse_timestamp,
};
use crate::weather_data::downloader::Downloader;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::fetcher::{within_recent_window, EmptyReason, SeriesFetch, SeriesFetcher};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use log::{debug, warn};
use std::time::Duration;

/// Header prefix SMHI currently writes for hourly air temperature.
pub const EXACT_HEADER_PREFIX: &str = "Datum;Tid (UTC);Lufttemperatur;Kvalitet";

/// Latest-months CSV feed with per-row quality flags.
#[derive(Debug, Clone)]
pub struct MonthlyCsvFetcher {
    downloader: Downloader,
    timeout: Duration,
}

impl MonthlyCsvFetcher {
    pub fn new(downloader: Downloader, timeout: Duration) -> Self {
        Self {
            downloader,
            timeout,
        }
    }
}

#[async_trait]
impl SeriesFetcher for MonthlyCsvFetcher {
    fn source(&self) -> Source {
        Source::MonthlyCsv
    }

    async fn fetch(&self, station_id: i64) -> Result<SeriesFetch, WeatherDataError> {
        let body = self
            .downloader
            .download(Source::MonthlyCsv, station_id, self.timeout)
            .await?;
        let now = Utc::now().naive_utc();
        let fetch =
            tokio::task::spawn_blocking(move || parse_monthly_csv(&body, station_id, now)).await?;
        Ok(fetch)
    }
}

/// Parses a latest-months document.
///
/// Steps, in order: locate the header (exact prefix first, token match second),
/// parse rows, keep only approved rows if any row is approved, keep the trailing
/// 365 days, drop rows without a temperature.
pub fn parse_monthly_csv(body: &str, station_id: i64, now: NaiveDateTime) -> SeriesFetch {
    let located = locate_header(body, |line| line.starts_with(EXACT_HEADER_PREFIX))
        .or_else(|| locate_header(body, has_date_time_and_temperature_tokens));
    let Some((layout, rows)) = located else {
        warn!(
            "{} station {}: header row not found",
            Source::MonthlyCsv,
            station_id
        );
        return SeriesFetch::Empty(EmptyReason::HeaderNotFound);
    };

    let mut rows_in = 0;
    let mut parsed = Vec::new();
    for record in data_rows(rows) {
        rows_in += 1;
        let Some(time) = layout
            .timestamp_text(&record)
            .as_deref()
            .and_then(parse_timestamp)
        else {
            continue;
        };
        parsed.push(Observation {
            time,
            temperature: record.get(layout.temperature).and_then(parse_temperature),
            quality: layout
                .quality
                .and_then(|idx| record.get(idx))
                .and_then(QualityFlag::parse),
        });
    }

    let has_approved = parsed
        .iter()
        .any(|obs| obs.quality.as_ref().is_some_and(QualityFlag::is_approved));
    let observations: Vec<Observation> = parsed
        .into_iter()
        .filter(|obs| !has_approved || obs.quality.as_ref().is_some_and(QualityFlag::is_approved))
        .filter(|obs| within_recent_window(&obs.time, &now))
        .filter(|obs| obs.temperature.is_some())
        .collect();

    debug!(
        "{} station {}: {} rows in, {} rows out (quality filter {})",
        Source::MonthlyCsv,
        station_id,
        rows_in,
        observations.len(),
        if has_approved { "applied" } else { "skipped" }
    );
    SeriesFetch::from_rows(observations)
}
