//! Surge pricing server - REST prediction API
//!
//! Loads the trained model/encoder pair, opens the prediction log and serves
//! `/predict`, `/health`, `/model/info`, `/stats` and feedback patches.
//! Metrics are pushed via structured JSON logs to stdout.
//!
//! # Usage
//! ```sh
//! SERVER_PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `DATABASE_URL`, `MODEL_PATH`, `ENCODER_PATH`, `BASE_PRICE`
//! - `PREDICTION_LOG` - `sqlite` (default) or `memory` to run without a database
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use surge_pricing::application::pricing::{PricingEngine, PricingService};
use surge_pricing::config::{Config, PredictionLogBackend};
use surge_pricing::domain::repositories::PredictionRepository;
use surge_pricing::infrastructure::observability::{Metrics, MetricsReporter, init_tracing};
use surge_pricing::infrastructure::{
    ArtifactStore, Database, InMemoryPredictionRepository, SqlitePredictionRepository,
};
use surge_pricing::interfaces::api::{AppState, create_router};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Surge pricing server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let store = ArtifactStore::new(&config.artifacts.model_path, &config.artifacts.encoder_path);
    let pair = store
        .load()
        .context("Failed to load model artifacts (run train_model first)")?;
    let engine = PricingEngine::from_artifacts(pair, config.pricing.policy())?;
    info!(
        "Model loaded: {} {} ({} features)",
        engine.model_info().model_type,
        engine.model_info().model_version,
        engine.model_info().n_features
    );

    let (database, repository): (Option<Database>, Arc<dyn PredictionRepository>) =
        match config.server.prediction_log {
            PredictionLogBackend::Sqlite => {
                let database = Database::new(&config.server.database_url).await?;
                let repository: Arc<dyn PredictionRepository> =
                    Arc::new(SqlitePredictionRepository::new(database.pool.clone()));
                (Some(database), repository)
            }
            PredictionLogBackend::Memory => {
                warn!("Prediction log is in memory; predictions are lost on shutdown");
                let repository: Arc<dyn PredictionRepository> =
                    Arc::new(InMemoryPredictionRepository::new());
                (None, repository)
            }
        };

    let metrics = Metrics::new()?;
    let service = Arc::new(PricingService::new(
        engine,
        repository.clone(),
        metrics.clone(),
    ));

    if config.observability.enabled {
        let interval = config.observability.interval_seconds;
        let reporter = MetricsReporter::new(repository, metrics, interval);
        tokio::spawn(async move {
            reporter.run().await;
        });
        info!("Metrics reporter started (interval: {}s)", interval);
    } else {
        info!("Metrics reporting disabled.");
    }

    let app = create_router(AppState {
        service,
        stats_default_days: config.pricing.stats_default_days,
    });

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}. Press Ctrl+C to shutdown.", address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received. Draining connections...");
    })
    .await
    .context("Server error")?;

    if let Some(database) = database {
        database.pool.close().await;
    }
    info!("Server stopped.");
    Ok(())
}
