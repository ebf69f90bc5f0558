use super::types::{PricingFeatures, TimeOfDay, WeatherCondition};
use crate::domain::errors::{FieldViolation, ValidationError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MIN_DISTANCE_KM: f64 = 0.1;
pub const MAX_DISTANCE_KM: f64 = 50.0;
pub const MIN_TRAFFIC_SECONDS: i64 = 60;
pub const MAX_TRAFFIC_SECONDS: i64 = 7200;

/// Unvalidated prediction input as it arrives over the wire or the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub distance_km: f64,
    pub traffic_duration_seconds: i64,
    pub weather_condition: String,
    pub time_of_day: String,
    #[serde(default)]
    pub is_holiday: Option<bool>,
}

impl PredictionRequest {
    /// Check every field and collect all violations before rejecting
    pub fn validate(&self) -> Result<PricingFeatures, ValidationError> {
        let mut violations = Vec::new();

        if !self.distance_km.is_finite() {
            violations.push(FieldViolation::NotFinite {
                field: "distance_km",
            });
        } else if !(MIN_DISTANCE_KM..=MAX_DISTANCE_KM).contains(&self.distance_km) {
            violations.push(FieldViolation::DistanceOutOfRange {
                value: self.distance_km,
                min: MIN_DISTANCE_KM,
                max: MAX_DISTANCE_KM,
            });
        }

        if !(MIN_TRAFFIC_SECONDS..=MAX_TRAFFIC_SECONDS).contains(&self.traffic_duration_seconds) {
            violations.push(FieldViolation::TrafficDurationOutOfRange {
                value: self.traffic_duration_seconds,
                min: MIN_TRAFFIC_SECONDS,
                max: MAX_TRAFFIC_SECONDS,
            });
        }

        let weather = WeatherCondition::from_str(&self.weather_condition).ok();
        if weather.is_none() {
            violations.push(FieldViolation::UnknownWeather {
                value: self.weather_condition.clone(),
                allowed: WeatherCondition::NAMES,
            });
        }

        let time_of_day = TimeOfDay::from_str(&self.time_of_day).ok();
        if time_of_day.is_none() {
            violations.push(FieldViolation::UnknownTimeOfDay {
                value: self.time_of_day.clone(),
                allowed: TimeOfDay::NAMES,
            });
        }

        match (weather, time_of_day) {
            (Some(weather_condition), Some(time_of_day)) if violations.is_empty() => {
                Ok(PricingFeatures {
                    distance_km: self.distance_km,
                    traffic_duration_seconds: self.traffic_duration_seconds,
                    weather_condition,
                    time_of_day,
                    is_holiday: self.is_holiday.unwrap_or(false),
                })
            }
            _ => Err(ValidationError { violations }),
        }
    }
}
