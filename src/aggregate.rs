use crate::types::month::{Month, MonthKey};
use crate::types::monthly::{MonthlyMean, MonthlyMeans};
use crate::types::observation::CanonicalSeries;
use std::collections::BTreeMap;

/// What to do with readings that have no timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownMonths {
    /// Report them under [`MonthKey::Unknown`], after every calendar month.
    #[default]
    Include,
    Drop,
}

/// Mean temperature per calendar month, rounded to two decimals, in calendar order.
///
/// Months without a single reading are absent. Undated readings are reported
/// under [`MonthKey::Unknown`]; see [`monthly_means_with`] to leave them out.
///
/// # Examples
///
/// ```
/// use smhi_temps::{monthly_means, CanonicalSeries, Month, Observation};
/// use chrono::NaiveDate;
///
/// let jan = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let series = CanonicalSeries::new(vec![
///     Observation::new(jan(5), 0.0),
///     Observation::new(jan(15), 10.0),
/// ]);
/// let means = monthly_means(&series);
/// assert_eq!(means.get(Month(2024, 1).into()), Some(5.0));
/// ```
pub fn monthly_means(series: &CanonicalSeries) -> MonthlyMeans {
    monthly_means_with(series, UnknownMonths::Include)
}

pub fn monthly_means_with(series: &CanonicalSeries, unknown: UnknownMonths) -> MonthlyMeans {
    let mut buckets: BTreeMap<MonthKey, (f64, usize)> = BTreeMap::new();

    for obs in &series.observations {
        let Some(temperature) = obs.temperature else {
            continue;
        };
        let bucket = buckets
            .entry(Month::from_datetime(&obs.time).into())
            .or_insert((0.0, 0));
        bucket.0 += temperature;
        bucket.1 += 1;
    }
    if unknown == UnknownMonths::Include {
        for temperature in &series.undated {
            let bucket = buckets.entry(MonthKey::Unknown).or_insert((0.0, 0));
            bucket.0 += temperature;
            bucket.1 += 1;
        }
    }

    MonthlyMeans(
        buckets
            .into_iter()
            .map(|(month, (sum, count))| MonthlyMean {
                month,
                temperature: round2(sum / count as f64),
            })
            .collect(),
    )
}

/// Rounds half away from zero to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::Observation;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn labels(means: &MonthlyMeans) -> Vec<String> {
        means.months()
    }

    #[test]
    fn test_mean_of_one_month() {
        let series = CanonicalSeries::new(vec![
            Observation::new(dt(2024, 1, 5), 0.0),
            Observation::new(dt(2024, 1, 15), 10.0),
        ]);
        let means = monthly_means(&series);
        assert_eq!(
            means.0,
            vec![MonthlyMean {
                month: Month(2024, 1).into(),
                temperature: 5.0,
            }]
        );
    }

    #[test]
    fn test_calendar_order_regardless_of_input_order() {
        let series = CanonicalSeries::new(vec![
            Observation::new(dt(2024, 1, 31), 3.0),
            Observation::new(dt(2024, 1, 2), 2.0),
            Observation::new(dt(2024, 1, 1), 1.0),
            Observation::new(dt(2023, 12, 31), -1.0),
            Observation::new(dt(2023, 12, 1), -2.0),
        ]);
        let means = monthly_means(&series);
        assert_eq!(labels(&means), vec!["2023-12", "2024-01"]);
        assert_eq!(means.temperatures(), vec![-1.5, 2.0]);
    }

    #[test]
    fn test_year_boundary_sorts_numerically() {
        let series = CanonicalSeries::new(vec![
            Observation::new(dt(2024, 10, 1), 1.0),
            Observation::new(dt(2024, 9, 1), 1.0),
            Observation::new(dt(999, 12, 1), 1.0),
        ]);
        assert_eq!(
            labels(&monthly_means(&series)),
            vec!["0999-12", "2024-09", "2024-10"]
        );
    }

    #[test]
    fn test_gaps_are_skipped_not_zeroed() {
        let series = CanonicalSeries::new(vec![
            Observation::new(dt(2024, 2, 1), 4.0),
            Observation {
                time: dt(2024, 2, 2),
                temperature: None,
                quality: None,
            },
            Observation {
                time: dt(2024, 3, 2),
                temperature: None,
                quality: None,
            },
        ]);
        let means = monthly_means(&series);
        assert_eq!(labels(&means), vec!["2024-02"]);
        assert_eq!(means.temperatures(), vec![4.0]);
    }

    #[test]
    fn test_duplicates_weigh_in() {
        let series = CanonicalSeries::new(vec![
            Observation::new(dt(2024, 5, 1), 10.0),
            Observation::new(dt(2024, 5, 1), 10.0),
            Observation::new(dt(2024, 5, 2), 1.0),
        ]);
        assert_eq!(monthly_means(&series).temperatures(), vec![7.0]);
    }

    #[test]
    fn test_unknown_bucket() {
        let mut series = CanonicalSeries::new(vec![Observation::new(dt(2024, 1, 1), 1.0)]);
        series.undated = vec![2.0, 3.0];

        let means = monthly_means(&series);
        assert_eq!(labels(&means), vec!["2024-01", "unknown"]);
        assert_eq!(means.get(MonthKey::Unknown), Some(2.5));

        let dropped = monthly_means_with(&series, UnknownMonths::Drop);
        assert_eq!(labels(&dropped), vec!["2024-01"]);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(2.675_1), 2.68);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(3.333_333), 3.33);

        let series = CanonicalSeries::new(vec![
            Observation::new(dt(2024, 4, 1), 1.0),
            Observation::new(dt(2024, 4, 2), 1.0),
            Observation::new(dt(2024, 4, 3), 2.0),
        ]);
        assert_eq!(monthly_means(&series).temperatures(), vec![1.33]);
    }

    #[test]
    fn test_deterministic() {
        let series = CanonicalSeries::new(
            (1..=28)
                .map(|d| Observation::new(dt(2024, 2, d), d as f64 * 0.37 - 4.1))
                .collect(),
        );
        let first = monthly_means(&series);
        let second = monthly_means(&series);
        assert_eq!(first, second);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.temperature.to_bits(), b.temperature.to_bits());
        }
    }

    #[test]
    fn test_empty_series() {
        assert!(monthly_means(&CanonicalSeries::default()).is_empty());
    }
}
