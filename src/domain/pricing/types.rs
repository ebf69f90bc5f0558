use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Observed weather at pickup time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Clear,
        WeatherCondition::Clouds,
        WeatherCondition::Rain,
        WeatherCondition::Thunderstorm,
    ];

    pub const NAMES: &'static [&'static str] = &["Clear", "Clouds", "Rain", "Thunderstorm"];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Clouds => "Clouds",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Thunderstorm => "Thunderstorm",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeatherCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Clear" => Ok(WeatherCondition::Clear),
            "Clouds" => Ok(WeatherCondition::Clouds),
            "Rain" => Ok(WeatherCondition::Rain),
            "Thunderstorm" => Ok(WeatherCondition::Thunderstorm),
            other => Err(format!("Unknown weather condition: {}", other)),
        }
    }
}

/// Coarse time-of-day bucket used by the pricing model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    LunchRush,
    Afternoon,
    DinnerRush,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 5] = [
        TimeOfDay::Morning,
        TimeOfDay::LunchRush,
        TimeOfDay::Afternoon,
        TimeOfDay::DinnerRush,
        TimeOfDay::Night,
    ];

    pub const NAMES: &'static [&'static str] =
        &["Morning", "LunchRush", "Afternoon", "DinnerRush", "Night"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::LunchRush => "LunchRush",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::DinnerRush => "DinnerRush",
            TimeOfDay::Night => "Night",
        }
    }

    /// Bucket for a local wall-clock hour (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=10 => TimeOfDay::Morning,
            11..=13 => TimeOfDay::LunchRush,
            14..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::DinnerRush,
            _ => TimeOfDay::Night,
        }
    }

    pub fn is_peak(&self) -> bool {
        matches!(self, TimeOfDay::LunchRush | TimeOfDay::DinnerRush)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Morning" => Ok(TimeOfDay::Morning),
            "LunchRush" => Ok(TimeOfDay::LunchRush),
            "Afternoon" => Ok(TimeOfDay::Afternoon),
            "DinnerRush" => Ok(TimeOfDay::DinnerRush),
            "Night" => Ok(TimeOfDay::Night),
            other => Err(format!("Unknown time of day: {}", other)),
        }
    }
}

/// One labeled row of the synthetic training table.
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub distance_km: f64,
    pub traffic_duration_seconds: i64,
    pub weather_condition: WeatherCondition,
    pub time_of_day: TimeOfDay,
    pub is_holiday: bool,
    pub price_multiplier: f64,
}

impl TrainingSample {
    pub fn features(&self) -> PricingFeatures {
        PricingFeatures {
            distance_km: self.distance_km,
            traffic_duration_seconds: self.traffic_duration_seconds,
            weather_condition: self.weather_condition,
            time_of_day: self.time_of_day,
            is_holiday: self.is_holiday,
        }
    }
}

/// Validated model input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingFeatures {
    pub distance_km: f64,
    pub traffic_duration_seconds: i64,
    pub weather_condition: WeatherCondition,
    pub time_of_day: TimeOfDay,
    pub is_holiday: bool,
}

/// Pricing bucket derived from the multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurgeStatus {
    Normal,
    ModerateSurge,
    HighSurge,
}

impl SurgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurgeStatus::Normal => "NORMAL",
            SurgeStatus::ModerateSurge => "MODERATE_SURGE",
            SurgeStatus::HighSurge => "HIGH_SURGE",
        }
    }
}

impl fmt::Display for SurgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurgeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL" => Ok(SurgeStatus::Normal),
            "MODERATE_SURGE" => Ok(SurgeStatus::ModerateSurge),
            "HIGH_SURGE" => Ok(SurgeStatus::HighSurge),
            other => Err(format!("Unknown pricing status: {}", other)),
        }
    }
}

/// Priced outcome of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingQuote {
    pub price_multiplier: f64,
    pub base_price: f64,
    pub final_price: f64,
    pub surge_percentage: f64,
    pub status: SurgeStatus,
}

/// Where a prediction request came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub request_id: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Row of the append-only prediction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Option<i64>,
    pub features: PricingFeatures,
    pub quote: PricingQuote,
    pub prediction_timestamp: DateTime<Utc>,
    pub metadata: RequestMetadata,
    pub feedback: PredictionFeedback,
    pub feedback_timestamp: Option<DateTime<Utc>>,
}

impl PredictionRecord {
    pub fn new(
        features: PricingFeatures,
        quote: PricingQuote,
        metadata: RequestMetadata,
        prediction_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            features,
            quote,
            prediction_timestamp,
            metadata,
            feedback: PredictionFeedback::default(),
            feedback_timestamp: None,
        }
    }
}

/// Outcome fields patched onto a logged prediction after the fact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionFeedback {
    pub actual_multiplier: Option<f64>,
    pub customer_rating: Option<i64>,
    pub order_completed: Option<bool>,
    pub notes: Option<String>,
}

impl PredictionFeedback {
    /// Overlay the fields that are set in `patch`
    pub fn merge(&mut self, patch: &PredictionFeedback) {
        if let Some(actual) = patch.actual_multiplier {
            self.actual_multiplier = Some(actual);
        }
        if let Some(rating) = patch.customer_rating {
            self.customer_rating = Some(rating);
        }
        if let Some(completed) = patch.order_completed {
            self.order_completed = Some(completed);
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
    }
}

/// Aggregates over a trailing window of the prediction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionStats {
    pub total_predictions: i64,
    pub average_multiplier: f64,
    pub status_distribution: BTreeMap<String, i64>,
    pub period_days: i64,
}

impl PredictionStats {
    /// Start of a `days`-long window ending at `now`. Windows reaching past the
    /// representable range start at the earliest instant and cover every row.
    pub fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        TimeDelta::try_days(days)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Aggregate already-windowed records
    pub fn summarize<'a>(
        records: impl IntoIterator<Item = &'a PredictionRecord>,
        period_days: i64,
    ) -> Self {
        let mut total = 0i64;
        let mut sum = 0.0;
        let mut status_distribution = BTreeMap::new();
        for record in records {
            total += 1;
            sum += record.quote.price_multiplier;
            *status_distribution
                .entry(record.quote.status.to_string())
                .or_insert(0) += 1;
        }
        let average = if total > 0 { sum / total as f64 } else { 0.0 };
        Self {
            total_predictions: total,
            average_multiplier: (average * 1000.0).round() / 1000.0,
            status_distribution,
            period_days,
        }
    }
}
