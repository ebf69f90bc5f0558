//! Request-level pricing: validate, quote, log, report.

use super::engine::{ModelInfo, PricingEngine};
use crate::domain::errors::{FieldViolation, RepositoryError, ValidationError};
use crate::domain::pricing::types::{
    PredictionFeedback, PredictionRecord, PredictionStats, RequestMetadata, SurgeStatus,
};
use crate::domain::pricing::validation::PredictionRequest;
use crate::domain::repositories::PredictionRepository;
use crate::infrastructure::observability::Metrics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Prediction with ID {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub price_multiplier: f64,
    pub base_price: f64,
    pub final_price: f64,
    pub surge_percentage: f64,
    pub prediction_timestamp: DateTime<Utc>,
    pub status: SurgeStatus,
    /// `None` when the prediction could not be logged
    pub prediction_id: Option<i64>,
    pub request_id: String,
}

/// Everything a prediction request needs, built once at startup
pub struct PricingService {
    engine: PricingEngine,
    repository: Arc<dyn PredictionRepository>,
    metrics: Metrics,
}

impl PricingService {
    pub fn new(
        engine: PricingEngine,
        repository: Arc<dyn PredictionRepository>,
        metrics: Metrics,
    ) -> Self {
        Self {
            engine,
            repository,
            metrics,
        }
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    pub fn model_info(&self) -> &ModelInfo {
        self.engine.model_info()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub async fn predict(
        &self,
        request: &PredictionRequest,
        metadata: RequestMetadata,
    ) -> Result<PredictionResponse, ServiceError> {
        let started = Instant::now();

        let features = request.validate().inspect_err(|e| {
            self.metrics.validation_rejections_total.inc();
            info!("Rejected prediction request: {}", e);
        })?;

        let quote = self.engine.quote(&features)?;
        let prediction_timestamp = Utc::now();
        let request_id = metadata.request_id.clone();

        let record = PredictionRecord::new(
            features.clone(),
            quote.clone(),
            metadata,
            prediction_timestamp,
        );
        let prediction_id = match self.repository.save(&record).await {
            Ok(id) => Some(id),
            Err(e) => {
                self.metrics.prediction_log_failures_total.inc();
                warn!("Failed to log prediction to database: {:#}", e);
                None
            }
        };

        self.metrics.record_prediction(
            quote.status,
            quote.price_multiplier,
            started.elapsed().as_secs_f64(),
        );
        info!(
            "Prediction made: {:.3}x multiplier for {} {} ({})",
            quote.price_multiplier, features.weather_condition, features.time_of_day, quote.status
        );

        Ok(PredictionResponse {
            price_multiplier: quote.price_multiplier,
            base_price: quote.base_price,
            final_price: quote.final_price,
            surge_percentage: quote.surge_percentage,
            prediction_timestamp,
            status: quote.status,
            prediction_id,
            request_id,
        })
    }

    pub async fn stats(&self, days: i64) -> Result<PredictionStats, ServiceError> {
        if days < 1 {
            return Err(ValidationError::single(FieldViolation::WindowTooSmall { value: days }).into());
        }
        Ok(self.repository.stats(days).await?)
    }

    /// Patch outcome fields onto a logged prediction and return the updated row
    pub async fn record_feedback(
        &self,
        id: i64,
        feedback: &PredictionFeedback,
    ) -> Result<PredictionRecord, ServiceError> {
        let mut violations = Vec::new();
        if let Some(rating) = feedback.customer_rating
            && !(1..=5).contains(&rating)
        {
            violations.push(FieldViolation::RatingOutOfRange { value: rating });
        }
        if let Some(actual) = feedback.actual_multiplier
            && !actual.is_finite()
        {
            violations.push(FieldViolation::NotFinite {
                field: "actual_multiplier",
            });
        }
        if !violations.is_empty() {
            return Err(ValidationError { violations }.into());
        }

        if let Err(e) = self.repository.update_feedback(id, feedback).await {
            return Err(match e.downcast_ref::<RepositoryError>() {
                Some(RepositoryError::PredictionNotFound { id }) => ServiceError::NotFound(*id),
                None => ServiceError::Internal(e),
            });
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }
}
