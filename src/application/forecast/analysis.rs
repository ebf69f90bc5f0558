use super::synthetic::is_weekend;
use crate::domain::forecast::DemandObservation;
use crate::domain::pricing::policy::round_to;
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Descriptive patterns of a demand history
#[derive(Debug, Clone, Serialize)]
pub struct DemandAnalysis {
    pub hourly_patterns: BTreeMap<u32, f64>,
    pub daily_patterns: BTreeMap<String, f64>,
    pub weekend_avg: f64,
    pub weekday_avg: f64,
    /// Five busiest hours of the day, busiest first
    pub peak_hours: Vec<(u32, f64)>,
    pub total_records: usize,
    pub date_range: Option<DateRange>,
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn group_means<K: Ord>(groups: BTreeMap<K, Vec<f64>>) -> BTreeMap<K, f64> {
    groups.into_iter().map(|(k, v)| (k, mean(&v))).collect()
}

pub fn analyze(series: &[DemandObservation]) -> DemandAnalysis {
    let mut by_hour: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    let mut by_day: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut weekend = Vec::new();
    let mut weekday = Vec::new();

    for obs in series {
        by_hour.entry(obs.ds.hour()).or_default().push(obs.y);
        by_day
            .entry(weekday_name(obs.ds.weekday()).to_string())
            .or_default()
            .push(obs.y);
        if is_weekend(&obs.ds) {
            weekend.push(obs.y);
        } else {
            weekday.push(obs.y);
        }
    }

    let hourly_patterns = group_means(by_hour);
    let mut peak_hours: Vec<(u32, f64)> = hourly_patterns.iter().map(|(h, v)| (*h, *v)).collect();
    peak_hours.sort_by(|a, b| b.1.total_cmp(&a.1));
    peak_hours.truncate(5);

    let date_range = match (series.iter().map(|o| o.ds).min(), series.iter().map(|o| o.ds).max()) {
        (Some(start), Some(end)) => Some(DateRange { start, end }),
        _ => None,
    };

    DemandAnalysis {
        hourly_patterns,
        daily_patterns: group_means(by_day),
        weekend_avg: round_to(mean(&weekend), 2),
        weekday_avg: round_to(mean(&weekday), 2),
        peak_hours,
        total_records: series.len(),
        date_range,
    }
}

impl fmt::Display for DemandAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total records: {}", self.total_records)?;
        if let Some(range) = &self.date_range {
            writeln!(f, "Date range: {} to {}", range.start, range.end)?;
        }
        writeln!(f, "Weekend average: {}", self.weekend_avg)?;
        writeln!(f, "Weekday average: {}", self.weekday_avg)?;
        let peaks: Vec<String> = self
            .peak_hours
            .iter()
            .map(|(h, v)| format!("{:02}h ({:.2})", h, v))
            .collect();
        writeln!(f, "Top 5 peak hours: {}", peaks.join(", "))
    }
}
