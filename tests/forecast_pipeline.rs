use chrono::{TimeZone, Timelike, Utc};
use surge_pricing::application::forecast::{
    DemandForecaster, ForecastConfig, analyze, generate_demand, write_forecast_csv,
};

#[test]
fn test_forecast_job_end_to_end() {
    let end = Utc.with_ymd_and_hms(2024, 5, 31, 23, 0, 0).unwrap();
    let history = generate_demand(90, end, 42).unwrap();
    assert_eq!(history.len(), 90 * 24 + 1);

    let analysis = analyze(&history);
    assert_eq!(analysis.total_records, history.len());
    assert!(analysis.weekend_avg > analysis.weekday_avg);
    assert!(analysis.peak_hours.iter().all(|(h, _)| (12..=21).contains(h)));

    let forecaster = DemandForecaster::fit(&history, ForecastConfig::default()).unwrap();
    let points = forecaster.forecast(24).unwrap();
    assert_eq!(points.len(), 24);
    assert_eq!(points[0].ds.hour(), 0);
    for p in &points {
        assert!(p.yhat_lower <= p.yhat && p.yhat <= p.yhat_upper);
    }

    let score = forecaster.next_hour_score().unwrap();
    assert!((0.0..=10.0).contains(&score));

    let mut csv = Vec::new();
    write_forecast_csv(&points, &mut csv).unwrap();
    let text = String::from_utf8(csv).unwrap();
    assert!(text.starts_with("ds,yhat,yhat_lower,yhat_upper"));
    assert_eq!(text.lines().count(), 25);

    let json = serde_json::to_string(&forecaster).unwrap();
    let restored: DemandForecaster = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.last_observation(), forecaster.last_observation());
}
