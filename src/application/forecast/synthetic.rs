//! Synthetic hourly demand history.

use crate::domain::forecast::{DemandObservation, clamp_score};
use anyhow::{Result, bail};
use chrono::{DateTime, Datelike, Duration, DurationRound, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const NOISE_STD: f64 = 0.1;
const WEEKEND_FACTOR: f64 = 1.3;

/// Hour-of-day demand factor
pub fn daily_factor(hour: u32) -> f64 {
    match hour {
        12..=14 => 1.5,
        18..=21 => 1.8,
        7..=10 => 0.8,
        22..=23 | 0..=6 => 0.3,
        _ => 1.0,
    }
}

pub fn is_weekend(ds: &DateTime<Utc>) -> bool {
    ds.weekday().num_days_from_monday() >= 5
}

/// Standard normal draw (Box-Muller)
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random_range(f64::EPSILON..1.0);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// One observation per hour over the `days` before `end` (inclusive of both ends)
pub fn generate_demand(days: u32, end: DateTime<Utc>, seed: u64) -> Result<Vec<DemandObservation>> {
    if days == 0 {
        bail!("days must be at least 1");
    }
    let end = end.duration_trunc(Duration::hours(1))?;
    let Some(start) = end.checked_sub_signed(Duration::days(i64::from(days))) else {
        bail!("{} days before {} is out of range", days, end);
    };
    let mut rng = StdRng::seed_from_u64(seed);

    let mut series = Vec::with_capacity(days as usize * 24 + 1);
    let mut ds = start;
    while ds <= end {
        let weekly = if is_weekend(&ds) { WEEKEND_FACTOR } else { 1.0 };
        let noise = NOISE_STD * standard_normal(&mut rng);
        series.push(DemandObservation {
            ds,
            y: clamp_score(daily_factor(ds.hour()) * weekly + noise),
        });
        ds += Duration::hours(1);
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 23, 17, 0).unwrap()
    }

    #[test]
    fn test_hourly_grid() {
        let series = generate_demand(3, end(), 42).unwrap();
        assert_eq!(series.len(), 3 * 24 + 1);
        assert_eq!(series.last().unwrap().ds.minute(), 0);
        for pair in series.windows(2) {
            assert_eq!(pair[1].ds - pair[0].ds, Duration::hours(1));
        }
    }

    #[test]
    fn test_history_before_representable_range_is_an_error() {
        let err = generate_demand(u32::MAX, end(), 42).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{}", err);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let series = generate_demand(30, end(), 1).unwrap();
        assert!(series.iter().all(|o| (0.0..=10.0).contains(&o.y)));
    }

    #[test]
    fn test_dinner_beats_night() {
        let series = generate_demand(14, end(), 7).unwrap();
        let mean_at = |h: u32| {
            let v: Vec<f64> = series
                .iter()
                .filter(|o| o.ds.hour() == h)
                .map(|o| o.y)
                .collect();
            v.iter().sum::<f64>() / v.len() as f64
        };
        assert!(mean_at(19) > mean_at(3) + 1.0);
    }

    #[test]
    fn test_seeded() {
        let a = generate_demand(5, end(), 9).unwrap();
        let b = generate_demand(5, end(), 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_days_rejected() {
        assert!(generate_demand(0, end(), 1).is_err());
    }
}
