use anyhow::Context;
use env_logger::Env;

use aeris::config::{self, City, Settings};
use aeris::dashboard::{self, Comparison};
use aeris::openaq::Client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("Failed to load settings")?;
    env_logger::Builder::from_env(Env::default().default_filter_or(&settings.log_level)).init();

    // Cities named on the command line, or the priority cities
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cities: Vec<&'static City> = if args.is_empty() {
        config::priority_cities(settings.max_priority).collect()
    } else {
        args.iter()
            .map(|name| config::city(name))
            .collect::<Result<_, _>>()?
    };

    let client = Client::new(&settings)?;
    log::info!("Reporting on {} cities", cities.len());

    let mut summaries = Vec::with_capacity(cities.len());
    for city in cities {
        let snapshots = match client.collect_city(city).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                log::warn!("Error collecting data for {}: {e}", city.name);
                Vec::new()
            }
        };

        let summary = dashboard::summarize(city, &snapshots);
        match summary.index() {
            Some(index) => log::info!("Calculated AQI for {}: {index}", city.name),
            None => log::info!("No AQI data for {}", city.name),
        }
        println!("{summary}");
        summaries.push(summary);
    }

    dashboard::rank(&mut summaries);
    println!("{}", Comparison(&summaries));

    Ok(())
}
