use anyhow::{Context, Result};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

/// Shared SQLite pool holding the prediction log and the training history
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self> {
        // Ensure the directory exists if it's a file path
        if let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let in_memory = db_url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(db_url)
            .with_context(|| format!("Invalid database URL: {}", db_url))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        // Every connection to an in-memory database sees its own empty database,
        // so keep exactly one alive for the lifetime of the pool
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", db_url);

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        // 1. Prediction log (append-only, feedback columns patched later)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS prediction_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                distance_km REAL NOT NULL,
                traffic_duration_seconds INTEGER NOT NULL,
                weather_condition TEXT NOT NULL,
                time_of_day TEXT NOT NULL,
                is_holiday BOOLEAN NOT NULL DEFAULT 0,
                predicted_multiplier REAL NOT NULL,
                base_price REAL NOT NULL,
                final_price REAL NOT NULL,
                surge_percentage REAL NOT NULL,
                pricing_status TEXT NOT NULL,
                prediction_timestamp INTEGER NOT NULL,
                request_id TEXT,
                user_agent TEXT,
                ip_address TEXT,
                actual_multiplier REAL,
                customer_rating INTEGER,
                order_completed BOOLEAN,
                feedback_timestamp INTEGER,
                feedback_notes TEXT
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create prediction_logs table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_prediction_logs_time
            ON prediction_logs (prediction_timestamp);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create prediction_logs index")?;

        // 2. Training history
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS model_performance_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                model_version TEXT NOT NULL,
                training_date INTEGER NOT NULL,
                model_type TEXT NOT NULL,
                r2_score REAL NOT NULL,
                mean_absolute_error REAL NOT NULL,
                mean_squared_error REAL NOT NULL,
                root_mean_squared_error REAL NOT NULL,
                training_samples INTEGER NOT NULL,
                test_samples INTEGER NOT NULL,
                training_duration_seconds REAL,
                feature_importance TEXT,
                notes TEXT
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create model_performance_logs table")?;

        info!("Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_created() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name LIKE '%_logs' ORDER BY name",
        )
        .fetch_all(&db.pool)
        .await
        .unwrap();
        let names: Vec<String> = rows.iter().map(|r| r.try_get("name").unwrap()).collect();
        assert_eq!(names, vec!["model_performance_logs", "prediction_logs"]);
    }

    #[tokio::test]
    async fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pricing.db");
        let url = format!("sqlite://{}", path.display());
        Database::new(&url).await.unwrap();
        assert!(path.exists());
    }
}
