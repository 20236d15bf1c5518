//! Look up a city and print its forecast
//!
//! ```sh
//! RUST_LOG=clima_weather=debug cargo run -p clima-weather --example forecast -- Recife 48h
//! ```

use std::sync::Arc;

use clima_cache::{ExpiringCache, MemoryConfig};
use clima_weather::{OpenMeteoClient, WeatherGateway};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let city = args.next().unwrap_or_else(|| "São Paulo".to_string());
    let range = args.next().unwrap_or_else(|| "24h".to_string());

    let client = Arc::new(OpenMeteoClient::with_defaults()?);
    let cache = ExpiringCache::in_memory(MemoryConfig::default())?;
    let gateway = WeatherGateway::new(client.clone(), client, cache);

    let Some(place) = gateway.search_location(&city).await? else {
        println!("No match for {city:?}");
        return Ok(());
    };
    println!(
        "{} ({}, {})",
        place.name,
        place.admin1.as_deref().unwrap_or("-"),
        place.country.as_deref().unwrap_or("-")
    );

    let weather = gateway
        .weather_data(place.latitude, place.longitude, range.as_str())
        .await?;
    let current = &weather.current;
    println!(
        "Now: {}°C, {}% humidity, wind {} km/h, {} [{}]",
        current.temperature, current.humidity, current.wind_speed, current.description, current.icon
    );

    for day in &weather.forecast {
        println!(
            "  {}  {:>3}°C / {:>3}°C  {:>5.1} mm  {}",
            day.date,
            day.max_temp,
            day.min_temp,
            day.precipitation,
            gateway.weather_description(day.weather_code)
        );
    }
    println!("{} hourly points", weather.hourly.temperature.len());

    // Second call is answered from the cache
    gateway
        .weather_data(place.latitude, place.longitude, range.as_str())
        .await?;
    let stats = gateway.cache_stats().await?;
    println!(
        "Cache: {} entries, {} hits, {} misses",
        stats.total_entries, stats.hits, stats.misses
    );

    Ok(())
}
