//! Defines the retrieval variants offered by the SMHI observation API.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One of the three SMHI retrieval variants for air temperature (parameter 1).
///
/// All variants produce the same canonical observation series; they differ in
/// period, document format and how much parsing they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// JSON feed of the latest months. Filtered to the trailing 365 days.
    RecentJson,
    /// Quality-controlled archive as CSV, with a metadata preamble of varying length.
    HistoricalCsv,
    /// CSV feed of the latest months, with per-row quality flags.
    MonthlyCsv,
}

impl Source {
    pub(crate) fn period_segment(&self) -> &'static str {
        match self {
            Source::RecentJson | Source::MonthlyCsv => "latest-months",
            Source::HistoricalCsv => "corrected-archive",
        }
    }

    pub(crate) fn file_name(&self) -> &'static str {
        match self {
            Source::RecentJson => "data.json",
            Source::HistoricalCsv | Source::MonthlyCsv => "data.csv",
        }
    }

    /// Path of the data document for a station, relative to the API base url.
    pub(crate) fn data_path(&self, station_id: i64) -> String {
        format!(
            "parameter/1/station/{}/period/{}/{}",
            station_id,
            self.period_segment(),
            self.file_name()
        )
    }

    /// Picks the JSON or CSV timeout, whichever applies to this source.
    pub(crate) fn timeout(&self, json_timeout: Duration, csv_timeout: Duration) -> Duration {
        match self {
            Source::RecentJson => json_timeout,
            Source::HistoricalCsv | Source::MonthlyCsv => csv_timeout,
        }
    }
}

/// # Examples
///
/// ```
/// use smhi_temps::Source;
///
/// assert_eq!(Source::RecentJson.to_string(), "recent-json");
/// ```
impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::RecentJson => "recent-json",
            Source::HistoricalCsv => "historical-csv",
            Source::MonthlyCsv => "monthly-csv",
        };
        write!(f, "{}", name)
    }
}
