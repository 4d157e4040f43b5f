//! Response shapes for single-city and multi-city temperature requests.

use crate::error::SmhiError;
use crate::types::month::{Month, MonthKey};
use crate::types::monthly::{MonthlyMean, MonthlyMeans};
use polars::prelude::*;
use serde::Serialize;

/// Monthly mean temperatures for one city together with the station they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTemperature {
    pub city: String,
    pub station_id: i64,
    pub station_name: String,
    pub monthly_means: MonthlyMeans,
}

/// Monthly means of one city inside a [`CombinedTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMeans {
    pub city: String,
    pub monthly_means: MonthlyMeans,
}

/// One city's values along [`CombinedTable::months`]. `None` where the city
/// has no mean for that month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRow {
    pub city: String,
    pub values: Vec<Option<f64>>,
}

/// Cross-city view built by [`crate::combine`].
///
/// Cities keep the order they were passed in. The two derived views treat
/// missing data differently:
/// * `matrix` holds one value per entry of `months` for every city, with `None`
///   where that city has no mean for the month.
/// * `average` only lists months that at least one city contributed to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CombinedTable {
    pub cities: Vec<CityMeans>,
    /// Union of all cities' months, in calendar order.
    pub months: Vec<Month>,
    pub matrix: Vec<CityRow>,
    pub average: Vec<MonthlyMean>,
}

impl CombinedTable {
    /// Name of the month-label column in [`CombinedTable::to_dataframe`].
    pub const MONTH_COLUMN: &'static str = "month";
    /// Name of the cross-city average column in [`CombinedTable::to_dataframe`].
    pub const AVERAGE_COLUMN: &'static str = "average";

    /// City names in table order.
    pub fn city_names(&self) -> Vec<&str> {
        self.matrix.iter().map(|row| row.city.as_str()).collect()
    }

    pub fn means_for(&self, city: &str) -> Option<&MonthlyMeans> {
        self.cities
            .iter()
            .find(|entry| entry.city == city)
            .map(|entry| &entry.monthly_means)
    }

    /// The month-aligned values of one city.
    pub fn row(&self, city: &str) -> Option<&[Option<f64>]> {
        self.matrix
            .iter()
            .find(|row| row.city == city)
            .map(|row| row.values.as_slice())
    }

    /// Average for one month, if any city contributed to it.
    pub fn average_for(&self, month: Month) -> Option<f64> {
        self.average
            .iter()
            .find(|mean| mean.month == MonthKey::Month(month))
            .map(|mean| mean.temperature)
    }

    /// The month-aligned matrix as a `DataFrame`: a `month` column, one column
    /// per city in table order, and an `average` column. Missing values are null.
    ///
    /// # Errors
    ///
    /// Returns `PolarsError::Duplicate` if a city is named like one of the
    /// fixed columns.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        if let Some(row) = self
            .matrix
            .iter()
            .find(|row| row.city == Self::MONTH_COLUMN || row.city == Self::AVERAGE_COLUMN)
        {
            return Err(PolarsError::Duplicate(
                format!(
                    "city '{}' clashes with a fixed column of the combined table",
                    row.city
                )
                .into(),
            ));
        }

        let mut columns = Vec::with_capacity(self.matrix.len() + 2);
        let labels: Vec<String> = self.months.iter().map(|m| m.to_string()).collect();
        columns.push(Column::new(Self::MONTH_COLUMN.into(), labels));
        for row in &self.matrix {
            columns.push(Column::new(row.city.as_str().into(), row.values.clone()));
        }
        let average: Vec<Option<f64>> = self
            .months
            .iter()
            .map(|month| self.average_for(*month))
            .collect();
        columns.push(Column::new(Self::AVERAGE_COLUMN.into(), average));
        DataFrame::new(columns)
    }
}

/// A city that produced no data, and why.
#[derive(Debug, Serialize)]
pub struct CityFailure {
    pub city: String,
    pub reason: String,
    #[serde(skip)]
    pub error: SmhiError,
}

impl CityFailure {
    pub(crate) fn new(city: String, error: SmhiError) -> Self {
        Self {
            city,
            reason: error.to_string(),
            error,
        }
    }
}

/// Result of a multi-city request: every city that yielded data, the combined
/// table over those cities, and the cities that yielded none. Cities and
/// failures are listed in request order.
#[derive(Debug, Serialize)]
pub struct CityComparison {
    pub cities: Vec<CityTemperature>,
    pub table: CombinedTable,
    pub failures: Vec<CityFailure>,
}

impl CityComparison {
    pub fn city(&self, name: &str) -> Option<&CityTemperature> {
        self.cities.iter().find(|city| city.city == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_serializes_reason_only() {
        let failure = CityFailure::new(
            "Umeå".to_string(),
            SmhiError::EmptySeries {
                city: "Umeå".to_string(),
                station_id: 140480,
            },
        );
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            serde_json::json!({
                "city": "Umeå",
                "reason": "No temperature data available for Umeå (station 140480)"
            })
        );
    }

    #[test]
    fn test_average_for_missing_month() {
        let table = CombinedTable {
            months: vec![Month(2024, 1)],
            average: vec![MonthlyMean {
                month: Month(2024, 1).into(),
                temperature: -3.5,
            }],
            ..Default::default()
        };
        assert_eq!(table.average_for(Month(2024, 1)), Some(-3.5));
        assert_eq!(table.average_for(Month(2024, 2)), None);
    }

    #[test]
    fn test_to_dataframe_rejects_clashing_city() {
        let table = CombinedTable {
            months: vec![Month(2024, 1)],
            matrix: vec![
                CityRow {
                    city: "Lund".to_string(),
                    values: vec![Some(1.0)],
                },
                CityRow {
                    city: "average".to_string(),
                    values: vec![Some(2.0)],
                },
            ],
            ..Default::default()
        };
        let err = table.to_dataframe().unwrap_err();
        assert!(matches!(err, PolarsError::Duplicate(_)));
        assert!(err.to_string().contains("'average'"));
    }

    #[test]
    fn test_to_dataframe_keeps_city_order() {
        let table = CombinedTable {
            months: vec![Month(2024, 1)],
            matrix: ["Umeå", "Göteborg", "Stockholm"]
                .iter()
                .map(|city| CityRow {
                    city: city.to_string(),
                    values: vec![None],
                })
                .collect(),
            ..Default::default()
        };
        let df = table.to_dataframe().unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["month", "Umeå", "Göteborg", "Stockholm", "average"]);
    }
}
