use thiserror::Error;

/// A single rejected field of a pricing request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldViolation {
    #[error("distance_km must be between {min} and {max}, got {value}")]
    DistanceOutOfRange { value: f64, min: f64, max: f64 },

    #[error("traffic_duration_seconds must be between {min} and {max}, got {value}")]
    TrafficDurationOutOfRange { value: i64, min: i64, max: i64 },

    #[error("Weather condition must be one of: {allowed:?}, got '{value}'")]
    UnknownWeather {
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Time of day must be one of: {allowed:?}, got '{value}'")]
    UnknownTimeOfDay {
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("customer_rating must be between 1 and 5, got {value}")]
    RatingOutOfRange { value: i64 },

    #[error("days must be at least 1, got {value}")]
    WindowTooSmall { value: i64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

/// Client-fault errors, raised before any model work happens
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", format_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while fitting or applying the one-hot encoder
#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("No values supplied for categorical column '{column}'")]
    EmptyColumn { column: String },

    #[error("Row has {got} categorical values, encoder expects {expected}")]
    ArityMismatch { expected: usize, got: usize },
}

/// Errors raised by the regressor
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Feature length mismatch: got {got}, expected {expected}")]
    FeatureLengthMismatch { expected: usize, got: usize },

    #[error("Labels ({labels}) do not match rows ({rows})")]
    LabelCountMismatch { rows: usize, labels: usize },

    #[error("Invalid hyper-parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("Matrix creation failed: {0}")]
    Matrix(String),

    #[error("Tree fit failed at stage {stage}: {reason}")]
    Fit { stage: usize, reason: String },

    #[error("Prediction failed: {0}")]
    Predict(String),
}

/// Errors raised while loading or saving the model/encoder pair
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found at {path}. Please run train_model first.")]
    Missing { path: String },

    #[error("Failed to read artifact {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Unsupported artifact format version {found} in {path} (expected {expected})")]
    UnsupportedVersion {
        path: String,
        found: u32,
        expected: u32,
    },

    #[error("Model artifact {model_id} was not trained with encoder artifact {encoder_id}")]
    MismatchedPair { model_id: String, encoder_id: String },

    #[error("Model expects features {expected:?} but encoder produces {actual:?}")]
    FeatureLayoutMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Failed to write artifact {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// Errors surfaced by prediction log repositories
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Prediction with ID {id} not found")]
    PredictionNotFound { id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_joins_all_violations() {
        let err = ValidationError {
            violations: vec![
                FieldViolation::DistanceOutOfRange {
                    value: 75.0,
                    min: 0.1,
                    max: 50.0,
                },
                FieldViolation::UnknownWeather {
                    value: "Snow".to_string(),
                    allowed: &["Clear", "Clouds"],
                },
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains("75"));
        assert!(msg.contains("Snow"));
        assert!(msg.contains("; "));
    }

    #[test]
    fn test_artifact_error_formatting() {
        let err = ArtifactError::MismatchedPair {
            model_id: "aaa".to_string(),
            encoder_id: "bbb".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("aaa"));
        assert!(msg.contains("bbb"));
    }
}
