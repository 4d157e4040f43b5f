use smhi_temps::{Smhi, SmhiError, Source};
use std::env;

#[tokio::main]
async fn main() -> Result<(), SmhiError> {
    configure_polars_display();
    let client = Smhi::new()?;

    let stations = client.search_stations().query("Kiruna").limit(3).call().await?;
    for station in &stations {
        println!("{} {} ({:.3}, {:.3})", station.id, station.name, station.latitude, station.longitude);
    }

    let comparison = client
        .compare_cities()
        .sources(vec![Source::RecentJson, Source::MonthlyCsv])
        .call()
        .await?;

    for failure in &comparison.failures {
        println!("No data for {}: {}", failure.city, failure.reason);
    }
    println!("{}", comparison.table.to_dataframe()?);

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 13 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "13");
}
