use crate::domain::errors::ModelError;

/// Interface for the pricing regressor
pub trait MLPredictor: Send + Sync {
    /// Raw multiplier for one encoded feature vector. Not clamped.
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Width of the input vector the model was trained on
    fn n_features(&self) -> usize;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
