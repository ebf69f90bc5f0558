use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest demand score
pub const DEMAND_SCORE_MIN: f64 = 0.0;
/// Highest demand score
pub const DEMAND_SCORE_MAX: f64 = 10.0;

/// One hourly demand measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandObservation {
    pub ds: DateTime<Utc>,
    pub y: f64,
}

/// Point forecast with its uncertainty interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecastPoint {
    pub ds: DateTime<Utc>,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

pub fn clamp_score(score: f64) -> f64 {
    score.clamp(DEMAND_SCORE_MIN, DEMAND_SCORE_MAX)
}
