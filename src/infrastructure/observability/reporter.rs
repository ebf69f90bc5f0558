//! Push-based metrics reporter
//!
//! Periodically outputs metrics as structured JSON to stdout.

use crate::domain::pricing::types::{PredictionStats, SurgeStatus};
use crate::domain::repositories::PredictionRepository;
use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Metrics snapshot for JSON output
#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub service: ServiceSnapshot,
    /// Prediction log aggregates for the last 24 hours
    pub last_day: Option<PredictionStats>,
}

#[derive(Serialize)]
pub struct ServiceSnapshot {
    pub predictions_by_status: BTreeMap<String, u64>,
    pub validation_rejections: u64,
    pub log_failures: u64,
    pub last_multiplier: f64,
    pub latency: LatencySnapshot,
}

/// Cumulative prediction latency from the histogram
#[derive(Serialize)]
pub struct LatencySnapshot {
    pub count: u64,
    pub sum_seconds: f64,
    pub mean_seconds: f64,
}

/// Outputs metrics as structured JSON logs on a configurable interval
pub struct MetricsReporter {
    repository: Arc<dyn PredictionRepository>,
    metrics: Metrics,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(
        repository: Arc<dyn PredictionRepository>,
        metrics: Metrics,
        interval_seconds: u64,
    ) -> Self {
        Self {
            repository,
            metrics,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot().await;
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Prefix keeps the lines greppable in mixed logs
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Served: {} | Rejected: {} | Uptime: {}s",
                        snapshot.service.predictions_by_status.values().sum::<u64>(),
                        snapshot.service.validation_rejections,
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
        }
    }

    fn latency_snapshot(&self) -> LatencySnapshot {
        let histogram = &self.metrics.prediction_latency_seconds;
        let count = histogram.get_sample_count();
        let sum_seconds = histogram.get_sample_sum();
        LatencySnapshot {
            count,
            sum_seconds,
            mean_seconds: if count > 0 { sum_seconds / count as f64 } else { 0.0 },
        }
    }

    async fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        self.metrics.uptime_seconds.set(uptime as f64);

        let last_day = match self.repository.stats(1).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("Failed to read prediction stats: {}", e);
                None
            }
        };

        let predictions_by_status = [
            SurgeStatus::Normal,
            SurgeStatus::ModerateSurge,
            SurgeStatus::HighSurge,
        ]
        .into_iter()
        .map(|s| (s.to_string(), self.metrics.predictions_by_status(s)))
        .collect();

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            service: ServiceSnapshot {
                predictions_by_status,
                validation_rejections: self.metrics.validation_rejections_total.get() as u64,
                log_failures: self.metrics.prediction_log_failures_total.get() as u64,
                last_multiplier: self.metrics.last_multiplier.get(),
                latency: self.latency_snapshot(),
            },
            last_day,
        }
    }
}
