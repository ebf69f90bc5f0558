//! Additive seasonal demand model.
//!
//! `y(t) = trend(t) + daily(t) + weekly(t) + lunch(t) + dinner(t)`, each
//! seasonal term a truncated Fourier series. The lunch and dinner terms are
//! only active during their meal hours. All coefficients are fitted jointly by
//! ridge regression; intervals come from the residual spread under a normal
//! error assumption.

use crate::domain::forecast::{DemandForecastPoint, DemandObservation, clamp_score};
use crate::domain::pricing::policy::round_to;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::ridge_regression::{
    RidgeRegression, RidgeRegressionParameters, RidgeRegressionSolverName,
};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;
use tracing::info;

type Ridge = RidgeRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

const HOURS_PER_DAY: f64 = 24.0;
const HOURS_PER_WEEK: f64 = 168.0;
const LUNCH_HOURS: std::ops::RangeInclusive<u32> = 12..=14;
const DINNER_HOURS: std::ops::RangeInclusive<u32> = 18..=21;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub daily_order: usize,
    pub weekly_order: usize,
    pub meal_order: usize,
    /// Ridge penalty
    pub alpha: f64,
    /// Coverage of the uncertainty interval, in (0, 1)
    pub interval_width: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            daily_order: 4,
            weekly_order: 3,
            meal_order: 4,
            alpha: 1e-3,
            interval_width: 0.8,
        }
    }
}

impl ForecastConfig {
    fn width(&self) -> usize {
        // constant + trend + sin/cos pairs
        2 + 2 * (self.daily_order + self.weekly_order + 2 * self.meal_order)
    }
}

fn fourier(out: &mut Vec<f64>, t_hours: f64, period: f64, order: usize, active: bool) {
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * t_hours / period;
        if active {
            out.push(angle.sin());
            out.push(angle.cos());
        } else {
            out.push(0.0);
            out.push(0.0);
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct DemandForecaster {
    config: ForecastConfig,
    origin: DateTime<Utc>,
    /// Length of the training history, scales the trend column to [0, 1]
    span_hours: f64,
    last_observation: DateTime<Utc>,
    residual_std: f64,
    z: f64,
    model: Ridge,
}

impl DemandForecaster {
    fn design_row(config: &ForecastConfig, origin: DateTime<Utc>, span_hours: f64, ds: DateTime<Utc>) -> Vec<f64> {
        let t = (ds - origin).num_seconds() as f64 / 3600.0;
        let hour = ds.hour();
        let mut row = Vec::with_capacity(config.width());
        row.push(1.0);
        row.push(t / span_hours);
        fourier(&mut row, t, HOURS_PER_DAY, config.daily_order, true);
        fourier(&mut row, t, HOURS_PER_WEEK, config.weekly_order, true);
        fourier(&mut row, t, HOURS_PER_DAY, config.meal_order, LUNCH_HOURS.contains(&hour));
        fourier(&mut row, t, HOURS_PER_DAY, config.meal_order, DINNER_HOURS.contains(&hour));
        row
    }

    pub fn fit(series: &[DemandObservation], config: ForecastConfig) -> Result<Self> {
        if !(config.interval_width > 0.0 && config.interval_width < 1.0) {
            bail!("interval_width must be in (0, 1), got {}", config.interval_width);
        }
        if series.len() < config.width() {
            bail!(
                "Need at least {} observations to fit, got {}",
                config.width(),
                series.len()
            );
        }

        let origin = series.iter().map(|o| o.ds).min().context("Empty series")?;
        let last_observation = series.iter().map(|o| o.ds).max().context("Empty series")?;
        let span_hours = ((last_observation - origin).num_seconds() as f64 / 3600.0).max(1.0);

        let rows: Vec<Vec<f64>> = series
            .iter()
            .map(|o| Self::design_row(&config, origin, span_hours, o.ds))
            .collect();
        let y: Vec<f64> = series.iter().map(|o| o.y).collect();
        let x = DenseMatrix::from_2d_vec(&rows).map_err(|e| anyhow!("Design matrix: {}", e))?;

        let params = RidgeRegressionParameters::default()
            .with_alpha(config.alpha)
            .with_normalize(false)
            .with_solver(RidgeRegressionSolverName::Cholesky);
        let model = Ridge::fit(&x, &y, params).map_err(|e| anyhow!("Ridge fit failed: {}", e))?;

        let fitted = model
            .predict(&x)
            .map_err(|e| anyhow!("Ridge predict failed: {}", e))?;
        let residual_std = (fitted
            .iter()
            .zip(&y)
            .map(|(f, t)| (t - f).powi(2))
            .sum::<f64>()
            / y.len() as f64)
            .sqrt();

        let normal = Normal::new(0.0, 1.0).map_err(|e| anyhow!("{}", e))?;
        let z = normal.inverse_cdf(0.5 + config.interval_width / 2.0);

        info!(
            "Fitted demand model on {} observations (residual std {:.4})",
            series.len(),
            residual_std
        );

        Ok(Self {
            config,
            origin,
            span_hours,
            last_observation,
            residual_std,
            z,
            model,
        })
    }

    /// Point forecasts with intervals at arbitrary timestamps
    pub fn predict(&self, timestamps: &[DateTime<Utc>]) -> Result<Vec<DemandForecastPoint>> {
        if timestamps.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<Vec<f64>> = timestamps
            .iter()
            .map(|ds| Self::design_row(&self.config, self.origin, self.span_hours, *ds))
            .collect();
        let x = DenseMatrix::from_2d_vec(&rows).map_err(|e| anyhow!("Design matrix: {}", e))?;
        let yhat = self
            .model
            .predict(&x)
            .map_err(|e| anyhow!("Ridge predict failed: {}", e))?;

        let half = self.z * self.residual_std;
        Ok(timestamps
            .iter()
            .zip(yhat)
            .map(|(ds, yhat)| DemandForecastPoint {
                ds: *ds,
                yhat,
                yhat_lower: yhat - half,
                yhat_upper: yhat + half,
            })
            .collect())
    }

    /// Hourly points following the last training observation
    pub fn forecast(&self, hours: usize) -> Result<Vec<DemandForecastPoint>> {
        let timestamps: Vec<DateTime<Utc>> = (1..=hours as i64)
            .map(|h| self.last_observation + Duration::hours(h))
            .collect();
        self.predict(&timestamps)
    }

    /// Demand score for the hour after the history, on the 0-10 scale
    pub fn next_hour_score(&self) -> Result<f64> {
        let point = self
            .forecast(1)?
            .into_iter()
            .next()
            .context("No forecast produced")?;
        Ok(round_to(clamp_score(point.yhat), 2))
    }

    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    pub fn last_observation(&self) -> DateTime<Utc> {
        self.last_observation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::forecast::synthetic::{daily_factor, generate_demand};
    use chrono::TimeZone;

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 31, 23, 0, 0).unwrap()
    }

    #[test]
    fn test_recovers_clean_daily_cycle() {
        let start = end() - Duration::days(21);
        let series: Vec<DemandObservation> = (0..21 * 24)
            .map(|h| {
                let ds = start + Duration::hours(h);
                let angle = 2.0 * PI * ds.hour() as f64 / 24.0;
                DemandObservation {
                    ds,
                    y: 3.0 + angle.sin(),
                }
            })
            .collect();

        let model = DemandForecaster::fit(&series, ForecastConfig::default()).unwrap();
        for point in model.forecast(48).unwrap() {
            let angle = 2.0 * PI * point.ds.hour() as f64 / 24.0;
            let truth = 3.0 + angle.sin();
            assert!(
                (point.yhat - truth).abs() < 0.05,
                "{}: {} vs {}",
                point.ds,
                point.yhat,
                truth
            );
        }
        assert!(model.residual_std() < 0.05);
    }

    #[test]
    fn test_intervals_are_ordered() {
        let series = generate_demand(30, end(), 42).unwrap();
        let model = DemandForecaster::fit(&series, ForecastConfig::default()).unwrap();
        let forecast = model.forecast(24 * 7).unwrap();

        assert_eq!(forecast.len(), 168);
        assert_eq!(forecast[0].ds, end() + Duration::hours(1));
        for p in &forecast {
            assert!(p.yhat_lower <= p.yhat && p.yhat <= p.yhat_upper);
        }
    }

    #[test]
    fn test_tracks_synthetic_meal_peaks() {
        // Ends on a Sunday so the forecast day is a weekday
        let sunday = Utc.with_ymd_and_hms(2024, 6, 2, 23, 0, 0).unwrap();
        let series = generate_demand(60, sunday, 3).unwrap();
        let model = DemandForecaster::fit(&series, ForecastConfig::default()).unwrap();
        let forecast = model.forecast(24).unwrap();

        let at = |h: u32| {
            forecast
                .iter()
                .find(|p| p.ds.hour() == h)
                .map(|p| p.yhat)
                .unwrap()
        };
        assert!(at(19) > at(3) + 1.0);
        assert!((at(13) - daily_factor(13)).abs() < 0.4);
    }

    #[test]
    fn test_next_hour_score_is_bounded() {
        let series = generate_demand(30, end(), 5).unwrap();
        let model = DemandForecaster::fit(&series, ForecastConfig::default()).unwrap();
        let score = model.next_hour_score().unwrap();
        assert!((0.0..=10.0).contains(&score));
        // Midnight is off-peak
        assert!(score < 1.0, "score {}", score);
    }

    #[test]
    fn test_too_short_history() {
        let series = generate_demand(1, end(), 5).unwrap();
        assert!(DemandForecaster::fit(&series[..10], ForecastConfig::default()).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let series = generate_demand(14, end(), 5).unwrap();
        let model = DemandForecaster::fit(&series, ForecastConfig::default()).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let restored: DemandForecaster = serde_json::from_str(&json).unwrap();
        let a = model.forecast(5).unwrap();
        let b = restored.forecast(5).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!((x.yhat - y.yhat).abs() < 1e-9);
        }
    }
}
