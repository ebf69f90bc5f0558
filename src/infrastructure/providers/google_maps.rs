use crate::domain::ports::TrafficProvider;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Traffic duration from the Google Directions API
pub struct GoogleMapsTrafficProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleMapsTrafficProvider {
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_base_url(client, api_key, DIRECTIONS_URL.to_string())
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
impl TrafficProvider for GoogleMapsTrafficProvider {
    async fn traffic_duration(&self, origin: &str, destination: &str) -> Result<i64> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("departure_time", "now"),
                ("traffic_model", "best_guess"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Directions request failed")?;

        if !response.status().is_success() {
            bail!("Directions API returned HTTP {}", response.status());
        }

        let body: DirectionsResponse = response
            .json()
            .await
            .context("Failed to decode Directions response")?;
        let seconds = duration_in_traffic(&body)?;
        debug!("Directions: {} -> {} takes {}s", origin, destination, seconds);
        Ok(seconds)
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    duration_in_traffic: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: i64,
}

fn duration_in_traffic(body: &DirectionsResponse) -> Result<i64> {
    if body.status != "OK" {
        bail!("Directions API status {}", body.status);
    }
    let seconds = body
        .routes
        .first()
        .and_then(|route| route.legs.first())
        .and_then(|leg| leg.duration_in_traffic.as_ref())
        .map(|d| d.value)
        .ok_or_else(|| anyhow!("Directions response has no duration_in_traffic"))?;
    if seconds <= 0 {
        bail!("Directions returned a non-positive duration: {}", seconds);
    }
    Ok(seconds)
}
