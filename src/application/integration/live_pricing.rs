//! Quotes a delivery from live traffic and weather.
//!
//! Each lookup that fails falls back to its mocked counterpart with a
//! warning, so a quote is produced even with no API keys configured.

use crate::application::pricing::PricingEngine;
use crate::domain::holidays::HolidayCalendar;
use crate::domain::ports::{DistanceProvider, TrafficProvider, WeatherProvider};
use crate::domain::pricing::types::{PricingFeatures, PricingQuote, TimeOfDay, WeatherCondition};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct LiveRequest {
    pub origin: String,
    pub destination: String,
    /// Weather lookup point; mocked when absent
    pub coordinates: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionSource {
    Live,
    Mock,
}

impl fmt::Display for ConditionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionSource::Live => f.write_str("live"),
            ConditionSource::Mock => f.write_str("mock"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveQuote {
    pub features: PricingFeatures,
    pub quote: PricingQuote,
    pub traffic_source: ConditionSource,
    pub weather_source: ConditionSource,
    pub looked_up_at: NaiveDateTime,
}

pub struct LivePricing {
    engine: Arc<PricingEngine>,
    traffic: Option<Box<dyn TrafficProvider>>,
    weather: Option<Box<dyn WeatherProvider>>,
    distance: Box<dyn DistanceProvider>,
    fallback_traffic: Box<dyn TrafficProvider>,
    fallback_weather: Box<dyn WeatherProvider>,
    calendar: HolidayCalendar,
}

impl LivePricing {
    /// `traffic`/`weather` are `None` when no API key is configured
    pub fn new(
        engine: Arc<PricingEngine>,
        traffic: Option<Box<dyn TrafficProvider>>,
        weather: Option<Box<dyn WeatherProvider>>,
        distance: Box<dyn DistanceProvider>,
        fallback_traffic: Box<dyn TrafficProvider>,
        fallback_weather: Box<dyn WeatherProvider>,
    ) -> Self {
        Self {
            engine,
            traffic,
            weather,
            distance,
            fallback_traffic,
            fallback_weather,
            calendar: HolidayCalendar::tamil_nadu(),
        }
    }

    pub async fn quote(&self, request: &LiveRequest) -> Result<LiveQuote> {
        self.quote_at(request, Local::now().naive_local()).await
    }

    /// Quote as if the local wall clock read `now`
    pub async fn quote_at(&self, request: &LiveRequest, now: NaiveDateTime) -> Result<LiveQuote> {
        let (traffic_duration_seconds, traffic_source) = self.lookup_traffic(request).await?;
        let (weather_condition, weather_source) = self.lookup_weather(request).await?;
        let distance_km = self
            .distance
            .distance_km(&request.origin, &request.destination)
            .await
            .context("Distance lookup failed")?;

        let features = PricingFeatures {
            distance_km,
            traffic_duration_seconds,
            weather_condition,
            time_of_day: TimeOfDay::from_hour(now.hour()),
            is_holiday: self.calendar.is_holiday(now.date()),
        };
        info!(
            "Live conditions: {:.1} km, {}s traffic ({}), {} ({}), {}, holiday={}",
            features.distance_km,
            features.traffic_duration_seconds,
            traffic_source,
            features.weather_condition,
            weather_source,
            features.time_of_day,
            features.is_holiday
        );

        let quote = self.engine.quote(&features)?;
        Ok(LiveQuote {
            features,
            quote,
            traffic_source,
            weather_source,
            looked_up_at: now,
        })
    }

    async fn lookup_traffic(&self, request: &LiveRequest) -> Result<(i64, ConditionSource)> {
        if let Some(provider) = &self.traffic {
            match provider
                .traffic_duration(&request.origin, &request.destination)
                .await
            {
                Ok(seconds) => return Ok((seconds, ConditionSource::Live)),
                Err(e) => warn!("Traffic lookup failed, using mock data: {:#}", e),
            }
        } else {
            warn!("No traffic API key configured, using mock data");
        }
        let seconds = self
            .fallback_traffic
            .traffic_duration(&request.origin, &request.destination)
            .await?;
        Ok((seconds, ConditionSource::Mock))
    }

    async fn lookup_weather(
        &self,
        request: &LiveRequest,
    ) -> Result<(WeatherCondition, ConditionSource)> {
        match (&self.weather, request.coordinates) {
            (Some(provider), Some((lat, lon))) => match provider.current_weather(lat, lon).await {
                Ok(condition) => return Ok((condition, ConditionSource::Live)),
                Err(e) => warn!("Weather lookup failed, using mock data: {:#}", e),
            },
            (None, _) => warn!("No weather API key configured, using mock data"),
            (Some(_), None) => warn!("No coordinates provided, using mock weather data"),
        }
        let condition = self.fallback_weather.current_weather(0.0, 0.0).await?;
        Ok((condition, ConditionSource::Mock))
    }
}
