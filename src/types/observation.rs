//! Observation records and the canonical series passed from fetchers to the aggregator.

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-reading validation marker reported by SMHI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum QualityFlag {
    /// `G`: checked and approved.
    Approved,
    /// `Y`: suspect or aggregated.
    Suspect,
    Other(String),
}

impl QualityFlag {
    /// Parses a raw quality cell. Empty cells carry no flag.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" => None,
            "G" => Some(QualityFlag::Approved),
            "Y" => Some(QualityFlag::Suspect),
            other => Some(QualityFlag::Other(other.to_string())),
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, QualityFlag::Approved)
    }
}

/// A single temperature reading in degrees Celsius.
///
/// `time` is naive, as reported by the source. `temperature` is `None` for a
/// measurement gap; gaps are skipped by aggregation rather than read as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub quality: Option<QualityFlag>,
}

impl Observation {
    pub fn new(time: NaiveDateTime, temperature: f64) -> Self {
        Self {
            time,
            temperature: Some(temperature),
            quality: None,
        }
    }
}

/// A loosely shaped observation as some upstream payloads deliver it. Any field
/// may be missing. `date` is a millisecond epoch timestamp.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObservationRecord {
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub quality: Option<String>,
}

impl ObservationRecord {
    pub(crate) fn time(&self) -> Option<NaiveDateTime> {
        self.date
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc())
    }
}

/// Input accepted by [`crate::normalize`].
#[derive(Debug, Clone)]
pub enum RawSeries {
    /// Fetcher output: already timestamped.
    Canonical(Vec<Observation>),
    /// Loose records whose date or value may be missing.
    Records(Vec<ObservationRecord>),
}

/// Normalized observations for one station.
///
/// Order is the order the source delivered. Duplicate timestamps are kept.
/// `undated` holds valid temperatures whose timestamp was missing; they are
/// grouped under [`crate::MonthKey::Unknown`] by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalSeries {
    pub observations: Vec<Observation>,
    pub undated: Vec<f64>,
}

impl CanonicalSeries {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            observations,
            undated: Vec::new(),
        }
    }

    /// True when there is no reading with a temperature, dated or not.
    pub fn is_empty(&self) -> bool {
        self.undated.is_empty() && self.observations.iter().all(|o| o.temperature.is_none())
    }

    pub fn len(&self) -> usize {
        self.observations.len() + self.undated.len()
    }

    /// Appends another series, keeping duplicates.
    pub fn extend(&mut self, other: CanonicalSeries) {
        self.observations.extend(other.observations);
        self.undated.extend(other.undated);
    }

    /// Dated observations as a `DataFrame` with columns `time` and `temperature`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let times: Vec<NaiveDateTime> = self.observations.iter().map(|o| o.time).collect();
        let temperatures: Vec<Option<f64>> =
            self.observations.iter().map(|o| o.temperature).collect();
        DataFrame::new(vec![
            Column::new("time".into(), times),
            Column::new("temperature".into(), temperatures),
        ])
    }
}
