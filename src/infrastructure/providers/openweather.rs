use crate::domain::ports::WeatherProvider;
use crate::domain::pricing::types::WeatherCondition;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::str::FromStr;
use tracing::debug;

pub const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Current conditions from OpenWeatherMap
pub struct OpenWeatherProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherProvider {
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_base_url(client, api_key, CURRENT_WEATHER_URL.to_string())
    }

    pub fn with_base_url(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherCondition> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .context("OpenWeatherMap request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            bail!(
                "OpenWeatherMap returned HTTP {}: {}",
                status,
                body.message.as_deref().unwrap_or("Unknown error")
            );
        }

        let body: CurrentWeather = response
            .json()
            .await
            .context("Failed to decode OpenWeatherMap response")?;
        let main = body
            .weather
            .first()
            .map(|w| w.main.as_str())
            .ok_or_else(|| anyhow!("OpenWeatherMap response has no weather entry"))?;
        debug!("OpenWeatherMap: ({}, {}) is {}", latitude, longitude, main);
        map_condition(main)
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    #[serde(default)]
    weather: Vec<WeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    main: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Map an OpenWeatherMap `main` group onto the model's categories.
/// Drizzle counts as rain; groups the model never saw are rejected.
pub fn map_condition(main: &str) -> Result<WeatherCondition> {
    match main {
        "Drizzle" => Ok(WeatherCondition::Rain),
        other => WeatherCondition::from_str(other).map_err(|e| anyhow!(e)),
    }
}
