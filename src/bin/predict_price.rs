//! One-shot price prediction from the command line.
//!
//! Stdout line 1 is the multiplier; everything diagnostic goes to stderr.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use surge_pricing::application::pricing::PricingEngine;
use surge_pricing::config::{ArtifactEnvConfig, PricingEnvConfig};
use surge_pricing::domain::pricing::validation::PredictionRequest;
use surge_pricing::infrastructure::ArtifactStore;
use surge_pricing::infrastructure::observability::init_stderr_tracing;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(author, version, about = "Predict a delivery price multiplier", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    distance_km: f64,

    traffic_duration_seconds: i64,

    /// Clear, Clouds, Rain or Thunderstorm
    weather_condition: String,

    /// Morning, LunchRush, Afternoon, DinnerRush or Night
    time_of_day: String,

    #[arg(long)]
    is_holiday: bool,

    /// Model artifact path (defaults to MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Encoder artifact path (defaults to ENCODER_PATH)
    #[arg(long)]
    encoder: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_stderr_tracing();
    let args = Args::parse();

    let request = PredictionRequest {
        distance_km: args.distance_km,
        traffic_duration_seconds: args.traffic_duration_seconds,
        weather_condition: args.weather_condition,
        time_of_day: args.time_of_day,
        is_holiday: Some(args.is_holiday),
    };
    let features = match request.validate() {
        Ok(features) => features,
        Err(e) => {
            eprintln!("Invalid input:");
            for violation in &e.violations {
                eprintln!("  - {}", violation);
            }
            return Ok(ExitCode::from(1));
        }
    };

    let paths = ArtifactEnvConfig::from_env();
    let store = ArtifactStore::new(
        args.model.unwrap_or(paths.model_path),
        args.encoder.unwrap_or(paths.encoder_path),
    );
    let engine = PricingEngine::from_artifacts(store.load()?, PricingEnvConfig::from_env()?.policy())?;
    debug!("Using model {}", engine.model_info().model_version);

    let quote = engine.quote(&features)?;
    println!("{:.6}", quote.price_multiplier);
    println!("Base price: {:.2}", quote.base_price);
    println!("Final price: {:.2}", quote.final_price);
    println!("Surge: {:.1}%", quote.surge_percentage);
    println!("Status: {}", quote.status);
    Ok(ExitCode::SUCCESS)
}
