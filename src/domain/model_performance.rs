use crate::domain::ml::metrics::RegressionMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of a training run and its validation scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformanceRecord {
    pub id: Option<i64>,
    pub model_version: String,
    pub training_date: DateTime<Utc>,
    pub model_type: String,
    pub r2_score: f64,
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
    pub training_samples: i64,
    pub test_samples: i64,
    pub training_duration_seconds: Option<f64>,
    pub feature_importance_json: Option<String>,
    pub notes: Option<String>,
}

impl ModelPerformanceRecord {
    pub fn from_metrics(
        model_version: String,
        model_type: String,
        training_date: DateTime<Utc>,
        test: &RegressionMetrics,
        training_samples: usize,
    ) -> Self {
        Self {
            id: None,
            model_version,
            training_date,
            model_type,
            r2_score: test.r2,
            mean_absolute_error: test.mae,
            mean_squared_error: test.mse,
            root_mean_squared_error: test.rmse,
            training_samples: training_samples as i64,
            test_samples: test.samples as i64,
            training_duration_seconds: None,
            feature_importance_json: None,
            notes: None,
        }
    }
}
