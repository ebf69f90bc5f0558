//! Hourly demand forecasting. Runs as an offline job and is never consulted
//! by the pricing path.

pub mod analysis;
pub mod model;
pub mod synthetic;

use crate::domain::forecast::DemandForecastPoint;
use anyhow::{Context, Result};
use std::io::Write;

pub use analysis::{DemandAnalysis, analyze};
pub use model::{DemandForecaster, ForecastConfig};
pub use synthetic::generate_demand;

pub fn write_forecast_csv<W: Write>(points: &[DemandForecastPoint], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in points {
        wtr.serialize(point)
            .context("Failed to serialize forecast point")?;
    }
    wtr.flush().context("Failed to flush forecast CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_forecast_csv_header() {
        let points = vec![DemandForecastPoint {
            ds: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            yhat: 1.5,
            yhat_lower: 1.2,
            yhat_upper: 1.8,
        }];
        let mut buf = Vec::new();
        write_forecast_csv(&points, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ds,yhat,yhat_lower,yhat_upper"));
        assert!(lines.next().unwrap().starts_with("2024-01-01T12:00:00Z,1.5,"));
    }
}
