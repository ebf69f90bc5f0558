//! Synthetic order generator for the pricing model.
//!
//! Every random draw comes from a single `StdRng`, so one seed always produces
//! the same table, row for row.

use crate::domain::holidays::HolidayCalendar;
use crate::domain::pricing::policy::round_to;
use crate::domain::pricing::types::{TimeOfDay, TrainingSample, WeatherCondition};
use anyhow::{Context, Result, bail};
use chrono::{Days, NaiveDate};
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Relative frequency of Clear, Clouds, Rain, Thunderstorm
pub const WEATHER_WEIGHTS: [u32; 4] = [40, 40, 15, 5];

/// Traffic durations at or above this saturate the traffic surcharge
const TRAFFIC_SATURATION_SECONDS: f64 = 1800.0;
const TRAFFIC_BASELINE_SECONDS: f64 = 60.0;
const MAX_TRAFFIC_SURCHARGE: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub samples: usize,
    pub seed: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: 5000,
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
        }
    }
}

pub struct DataGenerator {
    config: GeneratorConfig,
    calendar: HolidayCalendar,
}

impl DataGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            calendar: HolidayCalendar::tamil_nadu(),
        }
    }

    pub fn generate(&self) -> Result<Vec<TrainingSample>> {
        if self.config.samples == 0 {
            bail!("Sample count must be at least 1");
        }
        let span_days = (self.config.end_date - self.config.start_date).num_days();
        if span_days < 0 {
            bail!(
                "Date window is empty: {} is after {}",
                self.config.start_date,
                self.config.end_date
            );
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let weather_dist =
            WeightedIndex::new(WEATHER_WEIGHTS).context("Invalid weather weights")?;

        let mut samples = Vec::with_capacity(self.config.samples);
        for _ in 0..self.config.samples {
            let distance_km = round_to(rng.random_range(1.0..15.0), 2);
            let traffic_factor: f64 = rng.random_range(0.8..2.5);
            let traffic_duration_seconds = (distance_km * 60.0 * traffic_factor) as i64;

            let weather_condition = WeatherCondition::ALL[weather_dist.sample(&mut rng)];
            let time_of_day = *TimeOfDay::ALL
                .choose(&mut rng)
                .context("No time-of-day categories")?;

            let offset = rng.random_range(0..=span_days as u64);
            let date = self
                .config
                .start_date
                .checked_add_days(Days::new(offset))
                .context("Sampled date out of range")?;
            let is_holiday = self.calendar.is_holiday(date);

            let price_multiplier = price_multiplier(
                &mut rng,
                traffic_duration_seconds,
                weather_condition,
                time_of_day,
                is_holiday,
            );

            samples.push(TrainingSample {
                distance_km,
                traffic_duration_seconds,
                weather_condition,
                time_of_day,
                is_holiday,
                price_multiplier,
            });
        }

        info!(
            "Generated {} samples (seed {})",
            samples.len(),
            self.config.seed
        );
        Ok(samples)
    }
}

/// Ground-truth multiplier for one synthetic order
pub fn price_multiplier<R: Rng>(
    rng: &mut R,
    traffic_duration_seconds: i64,
    weather: WeatherCondition,
    time_of_day: TimeOfDay,
    is_holiday: bool,
) -> f64 {
    let mut multiplier = 1.0;

    let traffic_ratio = ((traffic_duration_seconds as f64 - TRAFFIC_BASELINE_SECONDS)
        / (TRAFFIC_SATURATION_SECONDS - TRAFFIC_BASELINE_SECONDS))
        .min(1.0);
    multiplier += (traffic_ratio * MAX_TRAFFIC_SURCHARGE).max(0.0);

    match weather {
        WeatherCondition::Rain => multiplier += rng.random_range(0.3..0.5),
        WeatherCondition::Thunderstorm => multiplier += rng.random_range(0.5..0.8),
        WeatherCondition::Clear | WeatherCondition::Clouds => {}
    }

    if time_of_day.is_peak() {
        multiplier += rng.random_range(0.2..0.4);
    }

    if is_holiday {
        multiplier += rng.random_range(0.4..0.7);
    }

    round_to(f64::max(1.0, multiplier), 3)
}

pub fn write_csv<W: Write>(samples: &[TrainingSample], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);
    for sample in samples {
        wtr.serialize(sample)
            .context("Failed to serialize training sample")?;
    }
    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

pub fn save_csv(samples: &[TrainingSample], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create training data {:?}", path))?;
    write_csv(samples, file)
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<TrainingSample>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut samples = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let sample: TrainingSample =
            result.with_context(|| format!("Malformed training row {}", line + 1))?;
        samples.push(sample);
    }
    Ok(samples)
}

pub fn load_csv(path: &Path) -> Result<Vec<TrainingSample>> {
    let file = File::open(path).with_context(|| {
        format!(
            "Training data not found at {:?}. Run generate_data first.",
            path
        )
    })?;
    read_csv(file)
}

/// Descriptive statistics of a generated table
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub samples: usize,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
    pub mean_multiplier: f64,
    pub holiday_samples: usize,
    pub weather_distribution: BTreeMap<String, usize>,
    pub time_of_day_distribution: BTreeMap<String, usize>,
}

impl DatasetSummary {
    pub fn from_samples(samples: &[TrainingSample]) -> Self {
        let mut weather_distribution = BTreeMap::new();
        let mut time_of_day_distribution = BTreeMap::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;

        for s in samples {
            *weather_distribution
                .entry(s.weather_condition.to_string())
                .or_insert(0) += 1;
            *time_of_day_distribution
                .entry(s.time_of_day.to_string())
                .or_insert(0) += 1;
            min = min.min(s.price_multiplier);
            max = max.max(s.price_multiplier);
            sum += s.price_multiplier;
        }

        let n = samples.len();
        Self {
            samples: n,
            min_multiplier: if n > 0 { min } else { 0.0 },
            max_multiplier: if n > 0 { max } else { 0.0 },
            mean_multiplier: if n > 0 { sum / n as f64 } else { 0.0 },
            holiday_samples: samples.iter().filter(|s| s.is_holiday).count(),
            weather_distribution,
            time_of_day_distribution,
        }
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Samples: {}", self.samples)?;
        writeln!(
            f,
            "Price multiplier range: {:.3} - {:.3}",
            self.min_multiplier, self.max_multiplier
        )?;
        writeln!(f, "Average price multiplier: {:.3}", self.mean_multiplier)?;
        writeln!(f, "Holiday samples: {}", self.holiday_samples)?;
        writeln!(f, "Weather condition distribution:")?;
        for (k, v) in &self.weather_distribution {
            writeln!(f, "  {:<14} {:>6}", k, v)?;
        }
        writeln!(f, "Time of day distribution:")?;
        for (k, v) in &self.time_of_day_distribution {
            writeln!(f, "  {:<14} {:>6}", k, v)?;
        }
        Ok(())
    }
}
