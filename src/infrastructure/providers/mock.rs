use crate::application::ml::data_generator::WEATHER_WEIGHTS;
use crate::domain::ports::{DistanceProvider, TrafficProvider, WeatherProvider};
use crate::domain::pricing::policy::round_to;
use crate::domain::pricing::types::WeatherCondition;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const MOCK_TRAFFIC_SECONDS: (i64, i64) = (300, 1800);
pub const MOCK_DISTANCE_KM: (f64, f64) = (2.0, 12.0);

/// Random stand-in for every live provider
#[derive(Clone)]
pub struct MockConditionsProvider {
    rng: Arc<Mutex<StdRng>>,
}

impl MockConditionsProvider {
    pub fn new() -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::from_os_rng())),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub async fn traffic(&self) -> i64 {
        let (low, high) = MOCK_TRAFFIC_SECONDS;
        self.rng.lock().await.random_range(low..=high)
    }

    pub async fn weather(&self) -> Result<WeatherCondition> {
        let dist = WeightedIndex::new(WEATHER_WEIGHTS).context("Invalid weather weights")?;
        let idx = dist.sample(&mut *self.rng.lock().await);
        Ok(WeatherCondition::ALL[idx])
    }

    pub async fn distance(&self) -> f64 {
        let (low, high) = MOCK_DISTANCE_KM;
        let km: f64 = self.rng.lock().await.random_range(low..=high);
        round_to(km, 1)
    }
}

impl Default for MockConditionsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrafficProvider for MockConditionsProvider {
    async fn traffic_duration(&self, _origin: &str, _destination: &str) -> Result<i64> {
        Ok(self.traffic().await)
    }
}

#[async_trait]
impl WeatherProvider for MockConditionsProvider {
    async fn current_weather(&self, _latitude: f64, _longitude: f64) -> Result<WeatherCondition> {
        self.weather().await
    }
}

#[async_trait]
impl DistanceProvider for MockConditionsProvider {
    async fn distance_km(&self, _origin: &str, _destination: &str) -> Result<f64> {
        Ok(self.distance().await)
    }
}
