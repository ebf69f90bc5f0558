//! Encoder + regressor + pricing policy, shared by every prediction path.

use crate::application::ml::gradient_boosting::BoostingParameters;
use crate::application::ml::model_artifact::{ArtifactPair, FeatureImportance};
use crate::application::ml::predictor::MLPredictor;
use crate::application::ml::smartcore_predictor::SmartCorePredictor;
use crate::domain::errors::{ArtifactError, ModelError};
use crate::domain::ml::encoder::OneHotEncoder;
use crate::domain::ml::feature_registry;
use crate::domain::ml::metrics::RegressionMetrics;
use crate::domain::pricing::policy::PricingPolicy;
use crate::domain::pricing::types::{PricingFeatures, PricingQuote};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Description of the loaded model
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub model_version: String,
    pub artifact_id: Option<Uuid>,
    pub feature_names: Vec<String>,
    pub feature_importance: Vec<FeatureImportance>,
    pub n_features: usize,
    pub hyperparameters: Option<BoostingParameters>,
    pub validation_metrics: Option<RegressionMetrics>,
    pub trained_at: Option<DateTime<Utc>>,
    pub loaded_at: DateTime<Utc>,
}

pub struct PricingEngine {
    encoder: OneHotEncoder,
    predictor: Box<dyn MLPredictor>,
    policy: PricingPolicy,
    info: ModelInfo,
}

impl PricingEngine {
    /// Build from a verified artifact pair
    pub fn from_artifacts(pair: ArtifactPair, policy: PricingPolicy) -> Result<Self, ArtifactError> {
        pair.verify()?;
        let ArtifactPair { model, encoder } = pair;

        let info = ModelInfo {
            model_type: model.model_type.clone(),
            model_version: model.model_version.clone(),
            artifact_id: Some(model.artifact_id),
            feature_names: model.feature_names.clone(),
            feature_importance: model.feature_importance.clone(),
            n_features: model.model.n_features(),
            hyperparameters: Some(model.hyperparameters.clone()),
            validation_metrics: Some(model.validation_metrics),
            trained_at: Some(model.trained_at),
            loaded_at: Utc::now(),
        };

        Ok(Self {
            encoder: encoder.encoder,
            predictor: Box::new(SmartCorePredictor::new(model)),
            policy,
            info,
        })
    }

    /// Build around an arbitrary predictor
    pub fn with_predictor(
        encoder: OneHotEncoder,
        predictor: Box<dyn MLPredictor>,
        policy: PricingPolicy,
    ) -> Self {
        let feature_names = feature_registry::feature_names(&encoder);
        let info = ModelInfo {
            model_type: predictor.name().to_string(),
            model_version: predictor.version().to_string(),
            artifact_id: None,
            n_features: predictor.n_features(),
            feature_names,
            feature_importance: Vec::new(),
            hyperparameters: None,
            validation_metrics: None,
            trained_at: None,
            loaded_at: Utc::now(),
        };
        Self {
            encoder,
            predictor,
            policy,
            info,
        }
    }

    /// Unclamped model output
    pub fn predict_raw(&self, features: &PricingFeatures) -> Result<f64> {
        let vector = feature_registry::features_to_vector(features, &self.encoder)
            .context("Failed to encode features")?;
        if vector.len() != self.predictor.n_features() {
            return Err(ModelError::FeatureLengthMismatch {
                expected: self.predictor.n_features(),
                got: vector.len(),
            }
            .into());
        }
        let raw = self.predictor.predict(&vector)?;
        Ok(raw)
    }

    pub fn quote(&self, features: &PricingFeatures) -> Result<PricingQuote> {
        let raw = self.predict_raw(features)?;
        Ok(self.policy.quote(raw))
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn model_info(&self) -> &ModelInfo {
        &self.info
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::pricing::types::{SurgeStatus, TimeOfDay, WeatherCondition};

    /// Returns a fixed multiplier regardless of input
    pub(crate) struct FixedPredictor {
        pub value: f64,
        pub width: usize,
    }

    impl MLPredictor for FixedPredictor {
        fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
            if features.len() != self.width {
                return Err(ModelError::FeatureLengthMismatch {
                    expected: self.width,
                    got: features.len(),
                });
            }
            Ok(self.value)
        }

        fn n_features(&self) -> usize {
            self.width
        }

        fn name(&self) -> &str {
            "Fixed"
        }

        fn version(&self) -> &str {
            "test"
        }
    }

    pub(crate) fn full_encoder() -> OneHotEncoder {
        let rows: Vec<Vec<&str>> = WeatherCondition::NAMES
            .iter()
            .zip(TimeOfDay::NAMES.iter().cycle())
            .map(|(w, t)| vec![*w, *t])
            .chain(TimeOfDay::NAMES.iter().map(|t| vec!["Clear", *t]))
            .collect();
        OneHotEncoder::fit(feature_registry::CATEGORICAL_FEATURES, &rows).unwrap()
    }

    pub(crate) fn fixed_engine(value: f64) -> PricingEngine {
        PricingEngine::with_predictor(
            full_encoder(),
            Box::new(FixedPredictor { value, width: 10 }),
            PricingPolicy::default(),
        )
    }

    fn features() -> PricingFeatures {
        PricingFeatures {
            distance_km: 5.2,
            traffic_duration_seconds: 1200,
            weather_condition: WeatherCondition::Rain,
            time_of_day: TimeOfDay::DinnerRush,
            is_holiday: false,
        }
    }

    #[test]
    fn test_quote_applies_policy() {
        let quote = fixed_engine(1.62449).quote(&features()).unwrap();
        assert_eq!(quote.price_multiplier, 1.624);
        assert_eq!(quote.final_price, 162.4);
        assert_eq!(quote.surge_percentage, 62.4);
        assert_eq!(quote.status, SurgeStatus::HighSurge);
    }

    #[test]
    fn test_quote_clamps_below_floor() {
        let quote = fixed_engine(0.7).quote(&features()).unwrap();
        assert_eq!(quote.price_multiplier, 1.0);
        assert_eq!(quote.status, SurgeStatus::Normal);
        assert_eq!(quote.surge_percentage, 0.0);
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let engine = PricingEngine::with_predictor(
            full_encoder(),
            Box::new(FixedPredictor {
                value: 1.0,
                width: 4,
            }),
            PricingPolicy::default(),
        );
        assert!(engine.quote(&features()).is_err());
    }

    #[test]
    fn test_model_info_from_predictor() {
        let engine = fixed_engine(1.0);
        let info = engine.model_info();
        assert_eq!(info.model_type, "Fixed");
        assert_eq!(info.n_features, 10);
        assert_eq!(info.feature_names.len(), 10);
        assert!(info.artifact_id.is_none());
    }
}
