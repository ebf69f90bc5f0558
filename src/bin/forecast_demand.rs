use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use surge_pricing::application::forecast::{
    DemandForecaster, ForecastConfig, analyze, generate_demand, write_forecast_csv,
};
use surge_pricing::infrastructure::observability::init_tracing;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fit and run the hourly demand forecaster", long_about = None)]
struct Args {
    /// Days of synthetic history to fit on
    #[arg(long, default_value_t = 90)]
    days: u32,

    /// Hours to forecast after the last observation
    #[arg(long, default_value_t = 24)]
    hours: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Forecast CSV path
    #[arg(long, default_value = "data/demand_forecast.csv")]
    output: PathBuf,

    /// Fitted model JSON path
    #[arg(long, default_value = "artifacts/demand_forecast_model.json")]
    model: PathBuf,
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let history = generate_demand(args.days, Utc::now(), args.seed)?;
    info!("Generated {} hourly observations", history.len());
    println!("{}", analyze(&history));

    let forecaster = DemandForecaster::fit(&history, ForecastConfig::default())?;
    info!("Residual std: {:.4}", forecaster.residual_std());

    let points = forecaster.forecast(args.hours)?;
    ensure_parent(&args.output)?;
    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_forecast_csv(&points, file)?;
    info!("Wrote {} forecast rows to {}", points.len(), args.output.display());

    ensure_parent(&args.model)?;
    let json = serde_json::to_string_pretty(&forecaster).context("Failed to serialize forecaster")?;
    fs::write(&args.model, json)
        .with_context(|| format!("Failed to write {}", args.model.display()))?;
    info!("Saved forecaster to {}", args.model.display());

    println!(
        "Next hour demand score: {:.2}",
        forecaster.next_hour_score()?
    );
    Ok(())
}
