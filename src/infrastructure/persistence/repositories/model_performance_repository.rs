use crate::domain::model_performance::ModelPerformanceRecord;
use crate::domain::repositories::ModelPerformanceRepository;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::DateTime;
use sqlx::{Row, SqlitePool};
use tracing::info;

pub struct SqliteModelPerformanceRepository {
    pool: SqlitePool,
}

impl SqliteModelPerformanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModelPerformanceRepository for SqliteModelPerformanceRepository {
    async fn save(&self, record: &ModelPerformanceRecord) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO model_performance_logs
            (model_version, training_date, model_type, r2_score, mean_absolute_error,
             mean_squared_error, root_mean_squared_error, training_samples, test_samples,
             training_duration_seconds, feature_importance, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.model_version)
        .bind(record.training_date.timestamp_millis())
        .bind(&record.model_type)
        .bind(record.r2_score)
        .bind(record.mean_absolute_error)
        .bind(record.mean_squared_error)
        .bind(record.root_mean_squared_error)
        .bind(record.training_samples)
        .bind(record.test_samples)
        .bind(record.training_duration_seconds)
        .bind(&record.feature_importance_json)
        .bind(&record.notes)
        .execute(&self.pool)
        .await
        .context("Failed to save model performance")?;

        info!("Persisted training run {}", record.model_version);
        Ok(result.last_insert_rowid())
    }

    async fn get_latest(&self) -> Result<Option<ModelPerformanceRecord>> {
        let row = sqlx::query(
            "SELECT * FROM model_performance_logs ORDER BY training_date DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let training_ms: i64 = row.try_get("training_date")?;
        Ok(Some(ModelPerformanceRecord {
            id: Some(row.try_get("id")?),
            model_version: row.try_get("model_version")?,
            training_date: DateTime::from_timestamp_millis(training_ms)
                .ok_or_else(|| anyhow!("Invalid training date {}", training_ms))?,
            model_type: row.try_get("model_type")?,
            r2_score: row.try_get("r2_score")?,
            mean_absolute_error: row.try_get("mean_absolute_error")?,
            mean_squared_error: row.try_get("mean_squared_error")?,
            root_mean_squared_error: row.try_get("root_mean_squared_error")?,
            training_samples: row.try_get("training_samples")?,
            test_samples: row.try_get("test_samples")?,
            training_duration_seconds: row.try_get("training_duration_seconds")?,
            feature_importance_json: row.try_get("feature_importance")?,
            notes: row.try_get("notes")?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::metrics::RegressionMetrics;
    use crate::infrastructure::persistence::database::Database;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_latest_run_wins() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let repo = SqliteModelPerformanceRepository::new(db.pool);
        assert!(repo.get_latest().await.unwrap().is_none());

        let metrics = RegressionMetrics::compute(&[1.0, 1.2, 1.5], &[1.0, 1.25, 1.45]);
        let older = ModelPerformanceRecord::from_metrics(
            "v1".to_string(),
            "GradientBoostingRegressor".to_string(),
            Utc::now() - Duration::days(1),
            &metrics,
            12,
        );
        let mut newer = older.clone();
        newer.model_version = "v2".to_string();
        newer.training_date = Utc::now();
        newer.notes = Some("retrained".to_string());

        repo.save(&older).await.unwrap();
        let id = repo.save(&newer).await.unwrap();

        let latest = repo.get_latest().await.unwrap().unwrap();
        assert_eq!(latest.id, Some(id));
        assert_eq!(latest.model_version, "v2");
        assert_eq!(latest.test_samples, 3);
        assert_eq!(latest.training_samples, 12);
        assert_eq!(latest.notes.as_deref(), Some("retrained"));
    }
}
