use crate::types::observation::{CanonicalSeries, Observation, QualityFlag, RawSeries};
use log::debug;

/// Turns fetcher output or loose records into a [`CanonicalSeries`].
///
/// Readings without a finite temperature are dropped. Records without a date
/// keep their temperature in [`CanonicalSeries::undated`]. Order and
/// duplicates are preserved.
pub fn normalize(raw: RawSeries) -> CanonicalSeries {
    let mut series = CanonicalSeries::default();
    let rows_in = match raw {
        RawSeries::Canonical(observations) => {
            let rows_in = observations.len();
            series.observations = observations
                .into_iter()
                .filter(|obs| obs.temperature.is_some_and(f64::is_finite))
                .collect();
            rows_in
        }
        RawSeries::Records(records) => {
            let rows_in = records.len();
            for record in records {
                let Some(temperature) = record.value.filter(|t| t.is_finite()) else {
                    continue;
                };
                match record.time() {
                    Some(time) => series.observations.push(Observation {
                        time,
                        temperature: Some(temperature),
                        quality: record.quality.as_deref().and_then(QualityFlag::parse),
                    }),
                    None => series.undated.push(temperature),
                }
            }
            rows_in
        }
    };

    debug!(
        "Normalized {} rows into {} dated and {} undated readings",
        rows_in,
        series.observations.len(),
        series.undated.len()
    );
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::ObservationRecord;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_canonical_drops_gaps_and_non_finite() {
        let raw = RawSeries::Canonical(vec![
            Observation::new(at(1), 1.0),
            Observation {
                time: at(2),
                temperature: None,
                quality: None,
            },
            Observation::new(at(3), f64::NAN),
            Observation::new(at(4), f64::INFINITY),
            Observation::new(at(1), 1.0),
        ]);
        let series = normalize(raw);
        assert_eq!(
            series.observations,
            vec![Observation::new(at(1), 1.0), Observation::new(at(1), 1.0)]
        );
        assert!(series.undated.is_empty());
    }

    #[test]
    fn test_records_bucket_undated_and_skip_missing_values() {
        let jan_1_millis = at(1).and_utc().timestamp_millis();
        let raw = RawSeries::Records(vec![
            ObservationRecord {
                date: Some(jan_1_millis),
                value: Some(-2.0),
                quality: Some("G".to_string()),
            },
            ObservationRecord {
                date: None,
                value: Some(4.0),
                quality: None,
            },
            ObservationRecord {
                date: Some(jan_1_millis),
                value: None,
                quality: None,
            },
            ObservationRecord::default(),
        ]);
        let series = normalize(raw);
        assert_eq!(series.observations.len(), 1);
        assert_eq!(series.observations[0].time, at(1));
        assert_eq!(series.observations[0].quality, Some(QualityFlag::Approved));
        assert_eq!(series.undated, vec![4.0]);
    }

    #[test]
    fn test_records_from_json() {
        let records: Vec<ObservationRecord> = serde_json::from_str(
            r#"[{"date": 1704067200000, "value": 3.5}, {"value": 1.5}, {"date": 1704067200000}]"#,
        )
        .unwrap();
        let series = normalize(RawSeries::Records(records));
        assert_eq!(series.observations.len(), 1);
        assert_eq!(series.undated, vec![1.5]);
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize(RawSeries::Canonical(Vec::new())).is_empty());
        assert!(normalize(RawSeries::Records(Vec::new())).is_empty());
    }
}
