use crate::aggregate::round2;
use crate::types::comparison::{CityMeans, CityRow, CombinedTable};
use crate::types::month::{Month, MonthKey};
use crate::types::monthly::{MonthlyMean, MonthlyMeans};
use log::debug;
use std::collections::BTreeSet;

/// Merges per-city monthly means into a [`CombinedTable`].
///
/// Cities keep the order they are given in. The month axis is the union of
/// every city's calendar months. A city with no means at all contributes
/// nothing and does not fail the merge. Undated ([`MonthKey::Unknown`]) means
/// are left out of the axis and the average.
pub fn combine(cities: &[(String, MonthlyMeans)]) -> CombinedTable {
    let months: Vec<Month> = cities
        .iter()
        .flat_map(|(_, means)| means.iter().filter_map(|mean| mean.month.as_month()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut matrix = Vec::with_capacity(cities.len());
    for (city, means) in cities {
        if means.get(MonthKey::Unknown).is_some() {
            debug!("Leaving undated readings of {} out of the combined table", city);
        }
        let values: Vec<Option<f64>> = months
            .iter()
            .map(|month| means.get(MonthKey::Month(*month)))
            .collect();
        matrix.push(CityRow {
            city: city.clone(),
            values,
        });
    }

    let average = months
        .iter()
        .enumerate()
        .filter_map(|(idx, month)| {
            let values: Vec<f64> = matrix.iter().filter_map(|row| row.values[idx]).collect();
            if values.is_empty() {
                return None;
            }
            Some(MonthlyMean {
                month: MonthKey::Month(*month),
                temperature: round2(values.iter().sum::<f64>() / values.len() as f64),
            })
        })
        .collect();

    CombinedTable {
        cities: cities
            .iter()
            .map(|(city, means)| CityMeans {
                city: city.clone(),
                monthly_means: means.clone(),
            })
            .collect(),
        months,
        matrix,
        average,
    }
}
