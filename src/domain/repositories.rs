//! Repository Pattern Abstractions
//!
//! Persistence seams for the prediction pipeline:
//! - `PredictionRepository`: append-only prediction log with a feedback patch
//! - `ModelPerformanceRepository`: one row per training run
//!
//! SQLite implementations live in `infrastructure::persistence`; the in-memory
//! ones in `infrastructure::repositories` back the tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use surge_pricing::domain::repositories::PredictionRepository;
//! use surge_pricing::infrastructure::InMemoryPredictionRepository;
//!
//! # async {
//! let repo = InMemoryPredictionRepository::new();
//! let stats = repo.stats(7).await?;
//! # anyhow::Ok(())
//! # };
//! ```

use crate::domain::model_performance::ModelPerformanceRecord;
use crate::domain::pricing::types::{PredictionFeedback, PredictionRecord, PredictionStats};
use anyhow::Result;
use async_trait::async_trait;

/// Append-only log of served predictions
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    /// Append a prediction, returning its assigned id
    async fn save(&self, record: &PredictionRecord) -> Result<i64>;

    /// Look a prediction up by id
    async fn find_by_id(&self, id: i64) -> Result<Option<PredictionRecord>>;

    /// Patch outcome fields onto an existing prediction.
    /// Fails with `RepositoryError::PredictionNotFound` when `id` is absent.
    async fn update_feedback(&self, id: i64, feedback: &PredictionFeedback) -> Result<()>;

    /// Count, mean multiplier and status histogram over the trailing `days`
    async fn stats(&self, days: i64) -> Result<PredictionStats>;
}

/// Training-run history
#[async_trait]
pub trait ModelPerformanceRepository: Send + Sync {
    async fn save(&self, record: &ModelPerformanceRecord) -> Result<i64>;

    async fn get_latest(&self) -> Result<Option<ModelPerformanceRecord>>;
}
