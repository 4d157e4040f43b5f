//! Helpers shared by the two CSV fetchers: header discovery, column layout,
//! and cell parsing (comma decimals, missing-value token, timestamps).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{StringRecord, Trim};

/// A field holding exactly this token marks the whole row as missing.
pub const MISSING_TOKEN: &str = "-";

const DATE_TOKEN: &str = "datum";
const TIME_TOKEN: &str = "tid";
const TEMPERATURE_TOKEN: &str = "temperatur";
const QUALITY_TOKEN: &str = "kvalitet";

const PRIMARY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FALLBACK_FORMAT: &str = "%Y-%m-%d %H:%M";
const PERMISSIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Column positions discovered from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeaderLayout {
    pub date: usize,
    pub time: Option<usize>,
    pub temperature: usize,
    pub quality: Option<usize>,
}

impl HeaderLayout {
    /// Finds columns by case-insensitive token match. Needs a date and a temperature column.
    pub(crate) fn from_header(line: &str) -> Option<Self> {
        let names: Vec<String> = line.split(';').map(|n| n.trim().to_lowercase()).collect();
        let find = |pred: &dyn Fn(&str) -> bool| names.iter().position(|n| pred(n));

        Some(Self {
            date: find(&|n: &str| n.contains(DATE_TOKEN))?,
            time: find(&|n: &str| n.contains(TIME_TOKEN) && !n.contains(DATE_TOKEN)),
            temperature: find(&|n: &str| n.contains(TEMPERATURE_TOKEN))?,
            quality: find(&|n: &str| n.contains(QUALITY_TOKEN)),
        })
    }

    /// Joins the date and (if present) time cells of a row.
    pub(crate) fn timestamp_text(&self, record: &StringRecord) -> Option<String> {
        let date = record.get(self.date)?;
        match self.time.and_then(|idx| record.get(idx)) {
            Some(time) if !time.is_empty() => Some(format!("{} {}", date, time)),
            _ => Some(date.to_string()),
        }
    }
}

pub(crate) fn has_date_and_temperature_tokens(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains(DATE_TOKEN) && lower.contains(TEMPERATURE_TOKEN)
}

pub(crate) fn has_date_time_and_temperature_tokens(line: &str) -> bool {
    has_date_and_temperature_tokens(line) && line.to_lowercase().contains(TIME_TOKEN)
}

/// Returns the layout of the first line accepted by `is_header` along with the
/// text that follows it. Lines before the header are metadata and are skipped.
pub(crate) fn locate_header<'a>(
    body: &'a str,
    is_header: impl Fn(&str) -> bool,
) -> Option<(HeaderLayout, &'a str)> {
    let body = body.trim_start_matches('\u{feff}');
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        offset += line.len();
        let line = line.trim_end_matches(['\r', '\n']);
        if is_header(line) {
            if let Some(layout) = HeaderLayout::from_header(line) {
                return Some((layout, &body[offset..]));
            }
        }
    }
    None
}

/// Semicolon-separated rows. Rows the reader cannot decode are skipped.
pub(crate) fn data_rows(text: &str) -> impl Iterator<Item = StringRecord> + '_ {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes())
        .into_records()
        .filter_map(Result::ok)
}

pub(crate) fn row_has_missing_token(record: &StringRecord) -> bool {
    record.iter().any(|field| field == MISSING_TOKEN)
}

/// Parses a temperature cell. Accepts comma decimals ("12,5").
pub(crate) fn parse_temperature(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == MISSING_TOKEN {
        return None;
    }
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
}

/// Primary format, then fallback format, then a best-effort parse.
pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, PRIMARY_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, FALLBACK_FORMAT))
        .ok()
        .or_else(|| parse_permissive(raw))
}

fn parse_permissive(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    let normalized = raw.replace('T', " ").replace('/', "-");
    let normalized = normalized.trim_end_matches('Z').trim();
    PERMISSIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(normalized, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(normalized, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
