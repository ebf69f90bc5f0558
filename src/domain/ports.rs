use crate::domain::pricing::types::WeatherCondition;
use anyhow::Result;
use async_trait::async_trait;

/// Current travel time between two addresses
#[async_trait]
pub trait TrafficProvider: Send + Sync {
    /// Duration in seconds under current traffic
    async fn traffic_duration(&self, origin: &str, destination: &str) -> Result<i64>;
}

/// Current weather at a coordinate
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherCondition>;
}

/// Road distance between two addresses
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn distance_km(&self, origin: &str, destination: &str) -> Result<f64>;
}
