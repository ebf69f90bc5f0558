//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementations of the repository traits defined in
//! `domain::repositories`. Used by the tests and by the server when
//! `PREDICTION_LOG=memory`. Data is lost on restart.

use crate::domain::errors::RepositoryError;
use crate::domain::model_performance::ModelPerformanceRecord;
use crate::domain::pricing::types::{PredictionFeedback, PredictionRecord, PredictionStats};
use crate::domain::repositories::{ModelPerformanceRepository, PredictionRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of PredictionRepository
pub struct InMemoryPredictionRepository {
    records: Arc<RwLock<Vec<PredictionRecord>>>,
}

impl InMemoryPredictionRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for InMemoryPredictionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionRepository for InMemoryPredictionRepository {
    async fn save(&self, record: &PredictionRecord) -> Result<i64> {
        let mut records = self.records.write().await;
        let id = records.len() as i64 + 1;
        let mut stored = record.clone();
        stored.id = Some(id);
        records.push(stored);
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PredictionRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn update_feedback(&self, id: i64, feedback: &PredictionFeedback) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == Some(id))
            .ok_or(RepositoryError::PredictionNotFound { id })?;
        record.feedback.merge(feedback);
        record.feedback_timestamp = Some(Utc::now());
        Ok(())
    }

    async fn stats(&self, days: i64) -> Result<PredictionStats> {
        let since = PredictionStats::window_start(Utc::now(), days);
        let records = self.records.read().await;
        Ok(PredictionStats::summarize(
            records.iter().filter(|r| r.prediction_timestamp >= since),
            days,
        ))
    }
}

/// In-memory implementation of ModelPerformanceRepository
pub struct InMemoryModelPerformanceRepository {
    records: Arc<RwLock<Vec<ModelPerformanceRecord>>>,
}

impl InMemoryModelPerformanceRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryModelPerformanceRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelPerformanceRepository for InMemoryModelPerformanceRepository {
    async fn save(&self, record: &ModelPerformanceRecord) -> Result<i64> {
        let mut records = self.records.write().await;
        let id = records.len() as i64 + 1;
        let mut stored = record.clone();
        stored.id = Some(id);
        records.push(stored);
        Ok(id)
    }

    async fn get_latest(&self) -> Result<Option<ModelPerformanceRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().max_by_key(|r| r.training_date).cloned())
    }
}
