use super::model_artifact::PricingModelArtifact;
use super::predictor::MLPredictor;
use crate::domain::errors::ModelError;

/// Serves a boosted `smartcore` tree ensemble loaded from a model artifact
pub struct SmartCorePredictor {
    artifact: PricingModelArtifact,
}

impl SmartCorePredictor {
    pub fn new(artifact: PricingModelArtifact) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &PricingModelArtifact {
        &self.artifact
    }
}

impl MLPredictor for SmartCorePredictor {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.artifact.model.predict_one(features)
    }

    fn n_features(&self) -> usize {
        self.artifact.model.n_features()
    }

    fn name(&self) -> &str {
        &self.artifact.model_type
    }

    fn version(&self) -> &str {
        &self.artifact.model_version
    }
}
