mod common;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use surge_pricing::application::integration::{ConditionSource, LivePricing, LiveRequest};
use surge_pricing::application::pricing::PricingEngine;
use surge_pricing::domain::ports::{TrafficProvider, WeatherProvider};
use surge_pricing::domain::pricing::policy::PricingPolicy;
use surge_pricing::domain::pricing::types::{TimeOfDay, WeatherCondition};
use surge_pricing::infrastructure::providers::MockConditionsProvider;

struct Unreachable;

#[async_trait]
impl TrafficProvider for Unreachable {
    async fn traffic_duration(&self, _: &str, _: &str) -> Result<i64> {
        bail!("dns error: failed to lookup address information")
    }
}

#[async_trait]
impl WeatherProvider for Unreachable {
    async fn current_weather(&self, _: f64, _: f64) -> Result<WeatherCondition> {
        bail!("OpenWeatherMap returned HTTP 401: Invalid API key")
    }
}

#[tokio::test]
async fn test_failing_providers_still_produce_a_quote() {
    let engine = PricingEngine::from_artifacts(
        common::train_small_model(7).artifacts,
        PricingPolicy::default(),
    )
    .unwrap();
    let mock = MockConditionsProvider::seeded(21);
    let live = LivePricing::new(
        Arc::new(engine),
        Some(Box::new(Unreachable)),
        Some(Box::new(Unreachable)),
        Box::new(mock.clone()),
        Box::new(mock.clone()),
        Box::new(mock),
    );

    let request = LiveRequest {
        origin: "Restaurant Downtown".to_string(),
        destination: "Vengadamangalam, Chennai".to_string(),
        coordinates: Some((13.0827, 80.2707)),
    };
    let now = NaiveDate::from_ymd_opt(2024, 7, 3)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap();
    let result = live.quote_at(&request, now).await.unwrap();

    assert_eq!(result.traffic_source, ConditionSource::Mock);
    assert_eq!(result.weather_source, ConditionSource::Mock);
    assert!((300..=1800).contains(&result.features.traffic_duration_seconds));
    assert!((2.0..=12.0).contains(&result.features.distance_km));
    assert_eq!(result.features.time_of_day, TimeOfDay::LunchRush);
    assert!(!result.features.is_holiday);
    assert!((1.0..=3.5).contains(&result.quote.price_multiplier));
}
