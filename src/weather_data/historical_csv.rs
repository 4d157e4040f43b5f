use crate::types::observation::{Observation, QualityFlag};
use crate::types::source::Source;
use crate::weather_data::csv_layout::{
    data_rows, has_date_and_temperature_tokens, locate_header, parse_temperature,
    parse_timestamp, row_has_missing_token,
};
use crate::weather_data::downloader::Downloader;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::fetcher::{EmptyReason, SeriesFetch, SeriesFetcher};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;

/// Quality-controlled archive CSV. Covers the full station history, so no
/// time window is applied.
#[derive(Debug, Clone)]
pub struct HistoricalCsvFetcher {
    downloader: Downloader,
    timeout: Duration,
}

impl HistoricalCsvFetcher {
    pub fn new(downloader: Downloader, timeout: Duration) -> Self {
        Self {
            downloader,
            timeout,
        }
    }
}

#[async_trait]
impl SeriesFetcher for HistoricalCsvFetcher {
    fn source(&self) -> Source {
        Source::HistoricalCsv
    }

    async fn fetch(&self, station_id: i64) -> Result<SeriesFetch, WeatherDataError> {
        let body = self
            .downloader
            .download(Source::HistoricalCsv, station_id, self.timeout)
            .await?;
        // Archives can run to several megabytes.
        let fetch =
            tokio::task::spawn_blocking(move || parse_historical_csv(&body, station_id)).await?;
        Ok(fetch)
    }
}

/// Parses an archive document: skips the metadata preamble, finds the header
/// by its date and temperature columns, and reads every row below it.
pub fn parse_historical_csv(body: &str, station_id: i64) -> SeriesFetch {
    let Some((layout, rows)) = locate_header(body, has_date_and_temperature_tokens) else {
        warn!(
            "{} station {}: header row not found",
            Source::HistoricalCsv,
            station_id
        );
        return SeriesFetch::Empty(EmptyReason::HeaderNotFound);
    };

    let mut rows_in = 0;
    let mut observations = Vec::new();
    for record in data_rows(rows) {
        rows_in += 1;
        if row_has_missing_token(&record) {
            continue;
        }
        let Some(temperature) = record.get(layout.temperature).and_then(parse_temperature) else {
            continue;
        };
        let Some(time) = layout
            .timestamp_text(&record)
            .as_deref()
            .and_then(parse_timestamp)
        else {
            continue;
        };
        let quality = layout
            .quality
            .and_then(|idx| record.get(idx))
            .and_then(QualityFlag::parse);
        observations.push(Observation {
            time,
            temperature: Some(temperature),
            quality,
        });
    }

    debug!(
        "{} station {}: {} rows in, {} rows out",
        Source::HistoricalCsv,
        station_id,
        rows_in,
        observations.len()
    );
    SeriesFetch::from_rows(observations)
}
