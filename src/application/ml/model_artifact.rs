//! Persisted training outputs.
//!
//! The model and the encoder are written as two JSON documents that carry the
//! same `artifact_id`. A model is only ever served with the encoder it was
//! trained with; `ArtifactPair::verify` enforces that.

use crate::application::ml::gradient_boosting::{BoostingParameters, GradientBoostingRegressor};
use crate::domain::errors::ArtifactError;
use crate::domain::ml::encoder::OneHotEncoder;
use crate::domain::ml::feature_registry;
use crate::domain::ml::metrics::RegressionMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

pub const MODEL_TYPE: &str = "GradientBoostingRegressor";

/// Importance of one input column, normalized so all columns sum to 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Serialize, Deserialize)]
pub struct PricingModelArtifact {
    pub format_version: u32,
    pub artifact_id: Uuid,
    pub model_version: String,
    pub model_type: String,
    pub trained_at: DateTime<Utc>,
    pub feature_names: Vec<String>,
    pub feature_importance: Vec<FeatureImportance>,
    pub train_metrics: RegressionMetrics,
    pub validation_metrics: RegressionMetrics,
    pub hyperparameters: BoostingParameters,
    pub model: GradientBoostingRegressor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderArtifact {
    pub format_version: u32,
    pub artifact_id: Uuid,
    pub fitted_at: DateTime<Utc>,
    pub encoder: OneHotEncoder,
}

/// A model and the encoder it was trained with
pub struct ArtifactPair {
    pub model: PricingModelArtifact,
    pub encoder: EncoderArtifact,
}

impl ArtifactPair {
    /// Stamp a freshly trained model and encoder with one shared id
    pub fn new(
        model_version: String,
        trained_at: DateTime<Utc>,
        model: GradientBoostingRegressor,
        encoder: OneHotEncoder,
        feature_importance: Vec<FeatureImportance>,
        train_metrics: RegressionMetrics,
        validation_metrics: RegressionMetrics,
    ) -> Self {
        let artifact_id = Uuid::new_v4();
        let hyperparameters = model.params().clone();
        Self {
            model: PricingModelArtifact {
                format_version: ARTIFACT_FORMAT_VERSION,
                artifact_id,
                model_version,
                model_type: MODEL_TYPE.to_string(),
                trained_at,
                feature_names: feature_registry::feature_names(&encoder),
                feature_importance,
                train_metrics,
                validation_metrics,
                hyperparameters,
                model,
            },
            encoder: EncoderArtifact {
                format_version: ARTIFACT_FORMAT_VERSION,
                artifact_id,
                fitted_at: trained_at,
                encoder,
            },
        }
    }

    /// Refuse pairs that were not produced by the same training run
    pub fn verify(&self) -> Result<(), ArtifactError> {
        if self.model.artifact_id != self.encoder.artifact_id {
            return Err(ArtifactError::MismatchedPair {
                model_id: self.model.artifact_id.to_string(),
                encoder_id: self.encoder.artifact_id.to_string(),
            });
        }

        let actual = feature_registry::feature_names(&self.encoder.encoder);
        if actual != self.model.feature_names || actual.len() != self.model.model.n_features() {
            return Err(ArtifactError::FeatureLayoutMismatch {
                expected: self.model.feature_names.clone(),
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted_pair() -> ArtifactPair {
        let encoder = OneHotEncoder::fit(
            feature_registry::CATEGORICAL_FEATURES,
            &[vec!["Clear", "Night"], vec!["Rain", "LunchRush"]],
        )
        .unwrap();
        let x = vec![vec![1.0, 100.0, 0.0, 0.0, 0.0], vec![2.0, 200.0, 1.0, 1.0, 0.0]];
        let y = vec![1.0, 1.5];
        let params = BoostingParameters {
            n_estimators: 3,
            max_depth: 2,
            subsample: 1.0,
            ..Default::default()
        };
        let model = GradientBoostingRegressor::fit(&x, &y, params).unwrap();
        let metrics = RegressionMetrics::compute(&y, &y);
        ArtifactPair::new(
            "v1".to_string(),
            Utc::now(),
            model,
            encoder,
            Vec::new(),
            metrics,
            metrics,
        )
    }

    #[test]
    fn test_fresh_pair_verifies() {
        let pair = fitted_pair();
        assert_eq!(pair.model.artifact_id, pair.encoder.artifact_id);
        assert_eq!(pair.model.feature_names.len(), 5);
        pair.verify().unwrap();
    }

    #[test]
    fn test_foreign_encoder_is_refused() {
        let mut pair = fitted_pair();
        pair.encoder.artifact_id = Uuid::new_v4();
        assert!(matches!(
            pair.verify(),
            Err(ArtifactError::MismatchedPair { .. })
        ));
    }

    #[test]
    fn test_layout_drift_is_refused() {
        let mut pair = fitted_pair();
        pair.encoder.encoder = OneHotEncoder::fit(
            feature_registry::CATEGORICAL_FEATURES,
            &[vec!["Clear", "Night"], vec!["Clouds", "Morning"], vec!["Rain", "LunchRush"]],
        )
        .unwrap();
        assert!(matches!(
            pair.verify(),
            Err(ArtifactError::FeatureLayoutMismatch { .. })
        ));
    }
}
