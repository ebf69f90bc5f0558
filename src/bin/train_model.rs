use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use surge_pricing::application::ml::data_generator::load_csv;
use surge_pricing::application::ml::gradient_boosting::BoostingParameters;
use surge_pricing::application::ml::trainer::{TrainingConfig, TrainingReport, train};
use surge_pricing::config::{ArtifactEnvConfig, ServerEnvConfig};
use surge_pricing::domain::repositories::ModelPerformanceRepository;
use surge_pricing::infrastructure::observability::init_tracing;
use surge_pricing::infrastructure::{ArtifactStore, Database, SqliteModelPerformanceRepository};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the surge pricing model", long_about = None)]
struct Args {
    /// Training data CSV produced by generate_data
    #[arg(long, default_value = "data/delivery_data.csv")]
    input: PathBuf,

    /// Model artifact path (defaults to MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Encoder artifact path (defaults to ENCODER_PATH)
    #[arg(long)]
    encoder: Option<PathBuf>,

    /// Number of boosting stages
    #[arg(long, default_value_t = 100)]
    n_estimators: usize,

    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,

    /// Maximum depth of each tree
    #[arg(long, default_value_t = 6)]
    max_depth: u16,

    /// Share of rows each stage is fitted on
    #[arg(long, default_value_t = 0.8)]
    subsample: f64,

    /// Share of rows held out for validation
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Skip writing the training run to the database
    #[arg(long)]
    no_db: bool,
}

fn print_report(report: &TrainingReport) {
    println!("=== Training Report: {} ===", report.model_version);
    println!(
        "Rows: {} train / {} validation",
        report.training_samples, report.test_samples
    );
    println!("Train      {}", report.train_metrics);
    println!("Validation {}", report.validation_metrics);
    println!("Duration: {:.2}s", report.training_duration_seconds);
    println!("\nFeature importance:");
    for fi in &report.feature_importance {
        println!("  {:<32} {:.4}", fi.feature, fi.importance);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let samples = load_csv(&args.input)?;
    info!("Loaded {} rows from {}", samples.len(), args.input.display());

    let config = TrainingConfig {
        test_size: args.test_size,
        split_seed: args.seed,
        boosting: BoostingParameters {
            n_estimators: args.n_estimators,
            learning_rate: args.learning_rate,
            max_depth: args.max_depth,
            subsample: args.subsample,
            seed: args.seed,
            ..Default::default()
        },
    };
    let model_version = format!("gbr-{}", Utc::now().format("%Y%m%d%H%M%S"));

    // Training is CPU-bound; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || train(&samples, &config, model_version))
        .await
        .context("Training task panicked")??;

    let paths = ArtifactEnvConfig::from_env();
    let store = ArtifactStore::new(
        args.model.unwrap_or(paths.model_path),
        args.encoder.unwrap_or(paths.encoder_path),
    );
    store.save(&outcome.artifacts)?;
    info!(
        "Saved artifact pair {} to {} and {}",
        outcome.artifacts.model.artifact_id,
        store.model_path().display(),
        store.encoder_path().display()
    );

    print_report(&outcome.report);

    if !args.no_db {
        let record = outcome.report.performance_record();
        let logged = async {
            let server = ServerEnvConfig::from_env()?;
            let database = Database::new(&server.database_url).await?;
            SqliteModelPerformanceRepository::new(database.pool.clone())
                .save(&record)
                .await
        }
        .await;
        match logged {
            Ok(id) => info!("Logged training run as model_performance_logs #{}", id),
            Err(e) => warn!("Failed to log model performance: {:#}", e),
        }
    }

    Ok(())
}
