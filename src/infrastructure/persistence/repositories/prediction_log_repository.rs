use crate::domain::errors::RepositoryError;
use crate::domain::pricing::types::{
    PredictionFeedback, PredictionRecord, PredictionStats, PricingFeatures, PricingQuote,
    RequestMetadata,
};
use crate::domain::repositories::PredictionRepository;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

pub struct SqlitePredictionRepository {
    pool: SqlitePool,
}

impl SqlitePredictionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| anyhow!("Invalid timestamp {}", ms))
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<PredictionRecord> {
    let weather: String = row.try_get("weather_condition")?;
    let time_of_day: String = row.try_get("time_of_day")?;
    let status: String = row.try_get("pricing_status")?;
    let feedback_ts: Option<i64> = row.try_get("feedback_timestamp")?;

    Ok(PredictionRecord {
        id: Some(row.try_get("id")?),
        features: PricingFeatures {
            distance_km: row.try_get("distance_km")?,
            traffic_duration_seconds: row.try_get("traffic_duration_seconds")?,
            weather_condition: FromStr::from_str(&weather).map_err(|e: String| anyhow!(e))?,
            time_of_day: FromStr::from_str(&time_of_day).map_err(|e: String| anyhow!(e))?,
            is_holiday: row.try_get("is_holiday")?,
        },
        quote: PricingQuote {
            price_multiplier: row.try_get("predicted_multiplier")?,
            base_price: row.try_get("base_price")?,
            final_price: row.try_get("final_price")?,
            surge_percentage: row.try_get("surge_percentage")?,
            status: FromStr::from_str(&status).map_err(|e: String| anyhow!(e))?,
        },
        prediction_timestamp: from_millis(row.try_get("prediction_timestamp")?)?,
        metadata: RequestMetadata {
            request_id: row
                .try_get::<Option<String>, _>("request_id")?
                .unwrap_or_default(),
            user_agent: row.try_get("user_agent")?,
            ip_address: row.try_get("ip_address")?,
        },
        feedback: PredictionFeedback {
            actual_multiplier: row.try_get("actual_multiplier")?,
            customer_rating: row.try_get("customer_rating")?,
            order_completed: row.try_get("order_completed")?,
            notes: row.try_get("feedback_notes")?,
        },
        feedback_timestamp: feedback_ts.map(from_millis).transpose()?,
    })
}

#[async_trait]
impl PredictionRepository for SqlitePredictionRepository {
    async fn save(&self, record: &PredictionRecord) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO prediction_logs
            (distance_km, traffic_duration_seconds, weather_condition, time_of_day, is_holiday,
             predicted_multiplier, base_price, final_price, surge_percentage, pricing_status,
             prediction_timestamp, request_id, user_agent, ip_address)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.features.distance_km)
        .bind(record.features.traffic_duration_seconds)
        .bind(record.features.weather_condition.as_str())
        .bind(record.features.time_of_day.as_str())
        .bind(record.features.is_holiday)
        .bind(record.quote.price_multiplier)
        .bind(record.quote.base_price)
        .bind(record.quote.final_price)
        .bind(record.quote.surge_percentage)
        .bind(record.quote.status.as_str())
        .bind(record.prediction_timestamp.timestamp_millis())
        .bind(&record.metadata.request_id)
        .bind(&record.metadata.user_agent)
        .bind(&record.metadata.ip_address)
        .execute(&self.pool)
        .await
        .context("Failed to save prediction")?;

        let id = result.last_insert_rowid();
        debug!("Logged prediction {} ({})", id, record.metadata.request_id);
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PredictionRecord>> {
        let row = sqlx::query("SELECT * FROM prediction_logs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row).transpose()
    }

    async fn update_feedback(&self, id: i64, feedback: &PredictionFeedback) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE prediction_logs SET
                actual_multiplier = COALESCE(?, actual_multiplier),
                customer_rating = COALESCE(?, customer_rating),
                order_completed = COALESCE(?, order_completed),
                feedback_notes = COALESCE(?, feedback_notes),
                feedback_timestamp = ?
            WHERE id = ?
            "#,
        )
        .bind(feedback.actual_multiplier)
        .bind(feedback.customer_rating)
        .bind(feedback.order_completed)
        .bind(&feedback.notes)
        .bind(Utc::now().timestamp_millis())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update prediction feedback")?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::PredictionNotFound { id }.into());
        }
        Ok(())
    }

    async fn stats(&self, days: i64) -> Result<PredictionStats> {
        let since = PredictionStats::window_start(Utc::now(), days).timestamp_millis();

        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total, AVG(predicted_multiplier) AS average
            FROM prediction_logs WHERE prediction_timestamp >= ?
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .context("Failed to aggregate predictions")?;
        let total: i64 = row.try_get("total")?;
        let average: Option<f64> = row.try_get("average")?;

        let rows = sqlx::query(
            r#"
            SELECT pricing_status, COUNT(*) AS count
            FROM prediction_logs WHERE prediction_timestamp >= ?
            GROUP BY pricing_status
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .context("Failed to aggregate pricing status")?;

        let mut status_distribution = BTreeMap::new();
        for row in rows {
            status_distribution.insert(row.try_get("pricing_status")?, row.try_get("count")?);
        }

        Ok(PredictionStats {
            total_predictions: total,
            average_multiplier: (average.unwrap_or(0.0) * 1000.0).round() / 1000.0,
            status_distribution,
            period_days: days,
        })
    }
}
