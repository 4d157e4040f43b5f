use crate::types::month::MonthKey;
use polars::prelude::*;
use serde::Serialize;

/// Mean temperature of one calendar month, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyMean {
    pub month: MonthKey,
    pub temperature: f64,
}

/// Monthly means in chronological order. Months without data are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthlyMeans(pub Vec<MonthlyMean>);

impl MonthlyMeans {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MonthlyMean> {
        self.0.iter()
    }

    pub fn get(&self, month: MonthKey) -> Option<f64> {
        self.0
            .iter()
            .find(|mean| mean.month == month)
            .map(|mean| mean.temperature)
    }

    /// Month labels, aligned with [`MonthlyMeans::temperatures`].
    pub fn months(&self) -> Vec<String> {
        self.0.iter().map(|mean| mean.month.to_string()).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.0.iter().map(|mean| mean.temperature).collect()
    }

    /// The means as a `DataFrame` with columns `month` and `temperature`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Column::new("month".into(), self.months()),
            Column::new("temperature".into(), self.temperatures()),
        ])
    }
}

impl<'a> IntoIterator for &'a MonthlyMeans {
    type Item = &'a MonthlyMean;
    type IntoIter = std::slice::Iter<'a, MonthlyMean>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
