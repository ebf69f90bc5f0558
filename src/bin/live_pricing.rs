//! Quote a delivery from live traffic and weather, falling back to mock
//! conditions for any lookup that is unavailable.
//!
//! # Environment Variables
//! - `GOOGLE_MAPS_API_KEY` - Directions API key (mocked when unset)
//! - `OPENWEATHER_API_KEY` - Current weather API key (mocked when unset)

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use surge_pricing::application::integration::{LivePricing, LiveRequest};
use surge_pricing::application::pricing::PricingEngine;
use surge_pricing::config::Config;
use surge_pricing::domain::ports::{TrafficProvider, WeatherProvider};
use surge_pricing::infrastructure::ArtifactStore;
use surge_pricing::infrastructure::observability::init_tracing;
use surge_pricing::infrastructure::providers::http::{DEFAULT_TIMEOUT_SECS, build_client};
use surge_pricing::infrastructure::providers::{
    GoogleMapsTrafficProvider, MockConditionsProvider, OpenWeatherProvider,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Live delivery pricing", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Pickup address
    #[arg(long, default_value = "Restaurant Downtown")]
    origin: String,

    /// Drop-off address
    #[arg(long, default_value = "Anna Nagar, Chennai")]
    destination: String,

    /// Drop-off latitude for the weather lookup
    #[arg(long, requires = "longitude")]
    latitude: Option<f64>,

    /// Drop-off longitude for the weather lookup
    #[arg(long, requires = "latitude")]
    longitude: Option<f64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = Config::from_env()?;

    let store = ArtifactStore::new(&config.artifacts.model_path, &config.artifacts.encoder_path);
    let engine = Arc::new(PricingEngine::from_artifacts(
        store.load()?,
        config.pricing.policy(),
    )?);

    let client = build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    let traffic = config
        .integration
        .google_maps_api_key
        .clone()
        .map(|key| Box::new(GoogleMapsTrafficProvider::new(client.clone(), key)) as Box<dyn TrafficProvider>);
    let weather = config
        .integration
        .openweather_api_key
        .clone()
        .map(|key| Box::new(OpenWeatherProvider::new(client.clone(), key)) as Box<dyn WeatherProvider>);

    let mock = MockConditionsProvider::new();
    let live = LivePricing::new(
        engine,
        traffic,
        weather,
        Box::new(mock.clone()),
        Box::new(mock.clone()),
        Box::new(mock),
    );

    let request = LiveRequest {
        origin: args.origin,
        destination: args.destination,
        coordinates: args.latitude.zip(args.longitude),
    };
    let result = live.quote(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let f = &result.features;
    let q = &result.quote;
    println!("=== Live Pricing: {} -> {} ===", request.origin, request.destination);
    println!("Distance:     {:.1} km", f.distance_km);
    println!(
        "Traffic:      {} s ({:.1} min, {})",
        f.traffic_duration_seconds,
        f.traffic_duration_seconds as f64 / 60.0,
        result.traffic_source
    );
    println!("Weather:      {} ({})", f.weather_condition, result.weather_source);
    println!("Time of day:  {}", f.time_of_day);
    println!("Holiday:      {}", f.is_holiday);
    println!("Multiplier:   {:.3}", q.price_multiplier);
    println!("Final price:  {:.2} (base {:.2}, +{:.1}%)", q.final_price, q.base_price, q.surge_percentage);
    println!("Status:       {}", q.status);
    Ok(())
}
