use chrono::{NaiveDate, TimeDelta};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use smhi_temps::{combine, monthly_means, CanonicalSeries, Observation};

// Ten years of hourly readings, about the size of a corrected-archive download.
fn hourly_series(offset: f64) -> CanonicalSeries {
    let start = NaiveDate::from_ymd_opt(2014, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    CanonicalSeries::new(
        (0..24 * 365 * 10)
            .map(|hour| {
                let temperature = offset + ((hour % 8760) as f64 / 8760.0 * 6.28).sin() * 12.0;
                Observation::new(start + TimeDelta::hours(hour), temperature)
            })
            .collect(),
    )
}

fn bench_aggregation(c: &mut Criterion) {
    let series = hourly_series(6.0);
    c.bench_function("monthly_means", |b| {
        b.iter(|| monthly_means(black_box(&series)))
    });

    let cities: Vec<(String, _)> = ["Stockholm", "Göteborg", "Malmö", "Uppsala", "Umeå"]
        .iter()
        .enumerate()
        .map(|(i, city)| (city.to_string(), monthly_means(&hourly_series(i as f64))))
        .collect();
    c.bench_function("combine", |b| b.iter(|| combine(black_box(&cities))));
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
